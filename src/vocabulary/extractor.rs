/*!
 * Word frequency extraction.
 *
 * Walks parsed subtitle lines top to bottom and aggregates every bank word
 * that is not excluded. A word counts once per line no matter how often it
 * repeats inside that line, and each counted line is kept as a context.
 * Results are ranked by occurrence count; ties keep first-discovery order.
 */

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use log::debug;
use serde::Serialize;

use crate::subtitle_processor::SubtitleLine;
use crate::vocabulary::normalizer::normalized_words;
use crate::vocabulary::word_bank::{Difficulty, WordBank, WordBankEntry};

/// One line in which a word was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordOccurrence {
    pub line_id: usize,
    pub start_time_ms: u64,
    pub end_time_ms: u64,
    /// Full cue text, not just the token
    pub text: String,
}

impl From<&SubtitleLine> for WordOccurrence {
    fn from(line: &SubtitleLine) -> Self {
        Self {
            line_id: line.id,
            start_time_ms: line.start_time_ms,
            end_time_ms: line.end_time_ms,
            text: line.text.clone(),
        }
    }
}

/// Aggregated result for one distinct bank word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedWord {
    pub word: String,
    /// Number of distinct lines containing the word
    pub occurrences: usize,
    pub difficulty: Difficulty,
    pub translation: Option<String>,
    pub phonetic: Option<String>,
    pub contexts: Vec<WordOccurrence>,
}

impl ExtractedWord {
    // Metadata is copied so the result does not borrow the bank
    fn from_entry(word: &str, entry: &WordBankEntry) -> Self {
        Self {
            word: word.to_string(),
            occurrences: 0,
            difficulty: entry.difficulty,
            translation: entry.translation.clone(),
            phonetic: entry.phonetic.clone(),
            contexts: Vec::new(),
        }
    }

    fn record(&mut self, line: &SubtitleLine) {
        self.occurrences += 1;
        self.contexts.push(WordOccurrence::from(line));
    }

    fn absorb(&mut self, other: ExtractedWord) {
        self.occurrences += other.occurrences;
        self.contexts.extend(other.contexts);
    }
}

/// Extractor bound to one bank snapshot and one exclusion set
pub struct FrequencyExtractor<'a> {
    bank: &'a WordBank,
    excluded: &'a HashSet<String>,
}

impl<'a> FrequencyExtractor<'a> {
    pub fn new(bank: &'a WordBank, excluded: &'a HashSet<String>) -> Self {
        Self { bank, excluded }
    }

    /// Extract and rank bank words from the lines
    pub fn extract(&self, lines: &[SubtitleLine]) -> Vec<ExtractedWord> {
        let mut words = self.scan(lines);
        rank(&mut words);
        words
    }

    /// Aggregate without ranking; the result is in first-discovery order
    pub fn scan(&self, lines: &[SubtitleLine]) -> Vec<ExtractedWord> {
        let mut words: Vec<ExtractedWord> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for line in lines {
            let mut seen: HashSet<String> = HashSet::new();

            for word in normalized_words(&line.text) {
                if !seen.insert(word.clone()) {
                    continue;
                }
                if self.excluded.contains(&word) {
                    continue;
                }
                let Some(entry) = self.bank.lookup(&word) else {
                    continue;
                };

                let position = *positions.entry(word.clone()).or_insert_with(|| {
                    words.push(ExtractedWord::from_entry(&word, entry));
                    words.len() - 1
                });
                words[position].record(line);
            }
        }

        words
    }
}

/// Extract and rank bank words from the lines
pub fn extract(lines: &[SubtitleLine], bank: &WordBank, excluded: &HashSet<String>) -> Vec<ExtractedWord> {
    FrequencyExtractor::new(bank, excluded).extract(lines)
}

/// Sort descending by occurrence count; the sort is stable so ties keep discovery order
pub fn rank(words: &mut [ExtractedWord]) {
    words.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));
}

/// Merge unranked partial results of consecutive line chunks.
///
/// Partials must be given in line order. Counts are summed and contexts
/// concatenated, so the output matches a single sequential scan.
pub fn merge_partials<I>(partials: I) -> Vec<ExtractedWord>
where
    I: IntoIterator<Item = Vec<ExtractedWord>>,
{
    let mut merged: Vec<ExtractedWord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for partial in partials {
        for word in partial {
            match positions.get(&word.word) {
                Some(&position) => merged[position].absorb(word),
                None => {
                    positions.insert(word.word.clone(), merged.len());
                    merged.push(word);
                }
            }
        }
    }

    merged
}

/// Extract with contiguous line chunks scanned on blocking worker threads.
///
/// Produces exactly the same ranking as [`extract`].
pub async fn extract_concurrent(
    lines: &[SubtitleLine],
    bank: Arc<WordBank>,
    excluded: Arc<HashSet<String>>,
    chunk_size: usize,
) -> Result<Vec<ExtractedWord>> {
    let chunk_size = chunk_size.max(1);
    debug!(
        "Extracting {} lines in {} chunks of up to {}",
        lines.len(),
        lines.len().div_ceil(chunk_size),
        chunk_size
    );

    let handles = lines.chunks(chunk_size).map(|chunk| {
        let chunk = chunk.to_vec();
        let bank = Arc::clone(&bank);
        let excluded = Arc::clone(&excluded);
        tokio::task::spawn_blocking(move || FrequencyExtractor::new(&bank, &excluded).scan(&chunk))
    });

    let mut partials = Vec::new();
    for result in join_all(handles).await {
        partials.push(result.context("Extraction worker panicked")?);
    }

    let mut words = merge_partials(partials);
    rank(&mut words);
    Ok(words)
}
