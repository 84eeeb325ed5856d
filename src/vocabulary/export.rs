/*!
 * Flat CSV export of token frequencies.
 *
 * The export counts raw tokens: every occurrence is counted, including
 * repeats within a single line. This deliberately differs from the ranked
 * report, which counts distinct lines. Keep the two apart.
 */

use std::collections::{HashMap, HashSet};

use crate::subtitle_processor::SubtitleLine;
use crate::vocabulary::normalizer::normalized_words;
use crate::vocabulary::word_bank::WordBank;

/// CSV header row
pub const CSV_HEADER: &str = "word,count,isDifficult,difficulty,translation,definition,phonetic";

/// Raw token count for one canonical word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFrequency {
    pub word: String,
    pub count: usize,
}

/// Count every normalized token, skipping excluded words.
///
/// Sorted descending by count; ties keep first-seen order.
pub fn token_frequencies(lines: &[SubtitleLine], excluded: &HashSet<String>) -> Vec<TokenFrequency> {
    let mut frequencies: Vec<TokenFrequency> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for word in lines.iter().flat_map(|line| normalized_words(&line.text)) {
        if excluded.contains(&word) {
            continue;
        }
        match positions.get(&word) {
            Some(&position) => frequencies[position].count += 1,
            None => {
                positions.insert(word.clone(), frequencies.len());
                frequencies.push(TokenFrequency { word, count: 1 });
            }
        }
    }

    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies
}

/// Render frequencies as CSV, enriching bank words with their metadata.
///
/// With `difficult_only`, words missing from the bank are left out.
pub fn export_csv(frequencies: &[TokenFrequency], bank: &WordBank, difficult_only: bool) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + frequencies.len() * 32);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for frequency in frequencies {
        let entry = bank.lookup(&frequency.word);
        if difficult_only && entry.is_none() {
            continue;
        }

        let fields = [
            escape_field(&frequency.word),
            frequency.count.to_string(),
            entry.is_some().to_string(),
            entry.map(|e| e.difficulty.as_str()).unwrap_or("").to_string(),
            escape_field(entry.and_then(|e| e.translation.as_deref()).unwrap_or("")),
            escape_field(entry.and_then(|e| e.definition.as_deref()).unwrap_or("")),
            escape_field(entry.and_then(|e| e.phonetic.as_deref()).unwrap_or("")),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Quote a field when it holds a separator, quote or line break (RFC 4180)
pub fn escape_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
