/*!
 * Presentation of ranked extraction results.
 *
 * Truncation to a top-N list happens here, not in the extractor.
 */

use std::fmt::Write;

use serde::Serialize;

use crate::subtitle_processor::format_timestamp;
use crate::vocabulary::extractor::ExtractedWord;
use crate::vocabulary::word_bank::Difficulty;

/// Default number of words shown in a report
pub const DEFAULT_TOP_N: usize = 50;

/// Ranked, truncated vocabulary listing
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyReport {
    /// Source subtitle file, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Distinct matched words at or above the tier floor, before truncation
    pub total_matches: usize,

    /// Top-ranked words
    pub words: Vec<ExtractedWord>,
}

impl VocabularyReport {
    /// Keep ranked words at or above `min_difficulty`, then the first `top_n`
    /// of those; `0` keeps everything. Rank order is preserved.
    pub fn new(mut words: Vec<ExtractedWord>, min_difficulty: Difficulty, top_n: usize) -> Self {
        words.retain(|w| w.difficulty >= min_difficulty);
        let total_matches = words.len();
        if top_n > 0 {
            words.truncate(top_n);
        }

        Self {
            source: None,
            total_matches,
            words,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Render a plain-text listing with up to `max_contexts` example lines per word
    pub fn render_table(&self, max_contexts: usize) -> String {
        let mut out = String::new();

        if let Some(source) = &self.source {
            let _ = writeln!(out, "{}", source);
        }
        let _ = writeln!(
            out,
            "{} of {} matched words",
            self.words.len(),
            self.total_matches
        );

        if self.words.is_empty() {
            return out;
        }

        let word_width = self.words.iter().map(|w| w.word.chars().count()).max().unwrap_or(0);
        let rank_width = self.words.len().to_string().len();

        for (i, word) in self.words.iter().enumerate() {
            let _ = write!(
                out,
                "{:>rank_width$}. {:<word_width$}  [{:<12}] x{:<4}",
                i + 1,
                word.word,
                word.difficulty.as_str(),
                word.occurrences,
                rank_width = rank_width,
                word_width = word_width,
            );
            if let Some(translation) = &word.translation {
                let _ = write!(out, "  {}", translation);
            }
            if let Some(phonetic) = &word.phonetic {
                let _ = write!(out, "  /{}/", phonetic);
            }
            out.push('\n');

            for context in word.contexts.iter().take(max_contexts) {
                let _ = writeln!(
                    out,
                    "{:rank_width$}    [{}] {}",
                    "",
                    format_timestamp(context.start_time_ms),
                    context.text,
                    rank_width = rank_width,
                );
            }
        }

        out
    }

    /// Pretty-printed JSON of the report
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
