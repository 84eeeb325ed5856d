/*!
 * # subvocab - vocabulary extraction from subtitles
 *
 * A Rust library that parses SRT subtitle files, matches their words against a
 * curated difficulty-tiered word bank and ranks the matches by the number of
 * lines they appear in, keeping every line as an example in context.
 *
 * ## Features
 *
 * - Lenient SRT parsing: malformed cues are dropped, never fatal
 * - Conservative token normalization (no lemmatization)
 * - Per-line deduplicated frequency ranking with stable ties
 * - Raw token count CSV export
 * - Persisted "too easy" exclusion list
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing into timed lines
 * - `vocabulary`: Extraction pipeline:
 *   - `vocabulary::normalizer`: Canonical word forms
 *   - `vocabulary::word_bank`: Difficulty-tiered word bank
 *   - `vocabulary::extractor`: Frequency aggregation and ranking
 *   - `vocabulary::report`: Top-N presentation
 *   - `vocabulary::export`: CSV export
 *   - `vocabulary::exclusions`: "Too easy" list persistence
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod vocabulary;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{SubtitleCollection, SubtitleLine, parse_srt_bytes, parse_srt_string};
pub use vocabulary::{Difficulty, ExtractedWord, WordBank, WordBankEntry, WordOccurrence, extract, normalize_token};
pub use errors::{ExclusionError, SubtitleError, WordBankError};
