/*!
 * Curated word bank.
 *
 * The bank maps canonical words to a difficulty tier and optional display
 * metadata. It is loaded once per run and handed to the extractor as an
 * immutable snapshot.
 *
 * On disk the bank is JSON, either wrapped:
 *
 * ```json
 * { "entries": { "ubiquitous": { "difficulty": "advanced", "translation": "..." } },
 *   "words": ["ubiquitous", "serene"] }
 * ```
 *
 * or a bare `word -> entry` object. A file counts as wrapped only when its keys
 * are exactly `entries` and optionally `words`; anything else is read as bare.
 * Words that only appear in the flat `words` list get a foundation-tier entry
 * without metadata. When several keys normalize to the same word, the first key
 * in sorted order wins.
 */

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::WordBankError;
use crate::vocabulary::normalizer::normalize_token;

/// Difficulty tier, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Foundation,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All tiers in ascending order
    pub const ALL: [Difficulty; 3] = [Self::Foundation, Self::Intermediate, Self::Advanced];

    // @returns: Lowercase tier identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foundation => "foundation",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Resolve a raw JSON tier value; anything missing or unknown is the lowest tier
    fn from_raw(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foundation" => Ok(Self::Foundation),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(anyhow!("Invalid difficulty tier: {}", s)),
        }
    }
}

/// One canonical vocabulary item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordBankEntry {
    pub word: String,
    pub difficulty: Difficulty,
    pub translation: Option<String>,
    pub definition: Option<String>,
    pub phonetic: Option<String>,
}

impl WordBankEntry {
    /// Entry with a tier and no display metadata
    pub fn new(word: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            word: word.into(),
            difficulty,
            translation: None,
            definition: None,
            phonetic: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn with_phonetic(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic = Some(phonetic.into());
        self
    }
}

// Entry as stored on disk; the tier is kept raw so bad values degrade instead of failing the load
#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(default)]
    difficulty: Option<Value>,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    phonetic: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WrappedBank {
    entries: BTreeMap<String, RawEntry>,
    #[serde(default)]
    words: Vec<String>,
}

// Sorted maps keep key collisions deterministic
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BankFile {
    Wrapped(WrappedBank),
    Bare(BTreeMap<String, RawEntry>),
}

/// Immutable lookup table from canonical word to bank entry
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    entries: HashMap<String, WordBankEntry>,
}

impl WordBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bank from ready-made entries; keys are normalized
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = WordBankEntry>,
    {
        let mut bank = Self::new();
        for entry in entries {
            bank.insert(entry);
        }
        bank
    }

    /// Add or replace an entry. Entries whose word normalizes to nothing are ignored.
    pub fn insert(&mut self, mut entry: WordBankEntry) {
        let key = normalize_token(&entry.word);
        if key.is_empty() {
            debug!("Ignoring word bank entry without letters: {:?}", entry.word);
            return;
        }
        entry.word = key.clone();
        self.entries.insert(key, entry);
    }

    /// Look up a canonical word
    pub fn lookup(&self, word: &str) -> Option<&WordBankEntry> {
        self.entries.get(word)
    }

    /// Whether the canonical word is listed in the bank
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries per difficulty tier, in ascending tier order
    pub fn tier_counts(&self) -> Vec<(Difficulty, usize)> {
        Difficulty::ALL
            .iter()
            .map(|tier| {
                let count = self.entries.values().filter(|e| e.difficulty == *tier).count();
                (*tier, count)
            })
            .collect()
    }

    /// Parse a bank from its JSON representation
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let file: BankFile = serde_json::from_str(content)?;
        let (raw_entries, words) = match file {
            BankFile::Wrapped(wrapped) => (wrapped.entries, wrapped.words),
            BankFile::Bare(entries) => (entries, Vec::new()),
        };

        let mut bank = Self::new();
        for (word, raw) in raw_entries {
            let key = normalize_token(&word);
            if let Some(kept) = bank.entries.get(&key) {
                debug!("Word bank key {:?} collides with {:?}, keeping the first", word, kept.word);
                continue;
            }
            bank.insert(WordBankEntry {
                word,
                difficulty: Difficulty::from_raw(raw.difficulty.as_ref()),
                translation: raw.translation,
                definition: raw.definition,
                phonetic: raw.phonetic,
            });
        }

        // Companion list entries without details default to the lowest tier
        for word in words {
            let key = normalize_token(&word);
            if !key.is_empty() && !bank.contains(&key) {
                bank.insert(WordBankEntry::new(key, Difficulty::default()));
            }
        }

        Ok(bank)
    }

    /// Load a bank from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WordBankError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| WordBankError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&content).map_err(|source| WordBankError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a bank, degrading to an empty bank when the file is missing or invalid
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(bank) => {
                debug!("Loaded word bank with {} entries", bank.len());
                bank
            }
            Err(e) => {
                warn!("{}; continuing with an empty word bank", e);
                Self::new()
            }
        }
    }
}
