/*!
 * Vocabulary extraction from parsed subtitles.
 *
 * - `normalizer`: Token to canonical word form
 * - `word_bank`: Curated difficulty-tiered word bank
 * - `extractor`: Per-line frequency aggregation and ranking
 * - `report`: Top-N presentation of ranked words
 * - `export`: Raw token count CSV export
 * - `exclusions`: Persisted "too easy" list
 */

// Re-export main types for easier usage
pub use self::exclusions::{ExclusionStore, MergeOutcome, load_exclusion_set};
pub use self::export::{TokenFrequency, export_csv, token_frequencies};
pub use self::extractor::{ExtractedWord, FrequencyExtractor, WordOccurrence, extract, extract_concurrent};
pub use self::normalizer::normalize_token;
pub use self::report::VocabularyReport;
pub use self::word_bank::{Difficulty, WordBank, WordBankEntry};

// Submodules
pub mod exclusions;
pub mod export;
pub mod extractor;
pub mod normalizer;
pub mod report;
pub mod word_bank;
