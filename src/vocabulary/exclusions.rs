/*!
 * Persisted "too easy" exclusion list.
 *
 * Words in this list are suppressed from every report, even when the bank
 * lists them. All mutations pass through a single lock, so at most one
 * read-merge-write cycle touches the file at a time. Writes go to a temporary
 * file in the same directory that is then renamed over the list.
 */

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::errors::ExclusionError;
use crate::vocabulary::normalizer::normalize_token;

/// Result of merging a word list into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Words that were not already present
    pub added: usize,
    /// Store size after the merge
    pub total: usize,
}

/// Parse an exclusion list: a JSON array of strings, or one word per line.
///
/// Words are normalized and empties dropped.
pub fn parse_word_list(content: &str) -> Vec<String> {
    let raw: Vec<String> = match serde_json::from_str::<Vec<String>>(content) {
        Ok(words) => words,
        Err(_) => content.lines().map(str::to_string).collect(),
    };

    raw.iter()
        .map(|w| normalize_token(w.trim()))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Load an exclusion set, degrading to empty when the file is missing or unreadable
pub fn load_exclusion_set<P: AsRef<Path>>(path: P) -> HashSet<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => parse_word_list(&content).into_iter().collect(),
        Err(e) => {
            warn!("Could not read exclusion list {:?}: {}; continuing without exclusions", path, e);
            HashSet::new()
        }
    }
}

/// Single-writer store backing the "too easy" list
pub struct ExclusionStore {
    path: PathBuf,
    words: Mutex<BTreeSet<String>>,
}

impl ExclusionStore {
    /// Open the store; a missing file starts an empty list
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let words = Self::read_from_disk(&path);
        debug!("Opened exclusion list {:?} with {} words", path, words.len());

        Self {
            path,
            words: Mutex::new(words),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.words.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.lock().is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.lock().contains(word)
    }

    /// Immutable copy for one extraction pass
    pub fn snapshot(&self) -> HashSet<String> {
        self.words.lock().iter().cloned().collect()
    }

    /// Add a single word; returns whether it was new
    pub fn mark_too_easy(&self, word: &str) -> Result<bool, ExclusionError> {
        let normalized = normalize_token(word);
        if normalized.is_empty() {
            return Err(ExclusionError::EmptyWord(word.to_string()));
        }

        let outcome = self.merge([normalized])?;
        Ok(outcome.added > 0)
    }

    /// Union a word list into the store; re-adding existing words changes nothing
    pub fn merge<I, S>(&self, words: I) -> Result<MergeOutcome, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut guard = self.words.lock();

        // Pick up edits made to the file since it was opened
        guard.extend(Self::read_from_disk(&self.path));
        let before = guard.len();

        for word in words {
            let normalized = normalize_token(word.as_ref());
            if !normalized.is_empty() {
                guard.insert(normalized);
            }
        }

        let added = guard.len() - before;
        if added > 0 {
            self.persist(&guard)?;
            debug!("Added {} words to exclusion list ({} total)", added, guard.len());
        }

        Ok(MergeOutcome {
            added,
            total: guard.len(),
        })
    }

    fn read_from_disk(path: &Path) -> BTreeSet<String> {
        match fs::read_to_string(path) {
            Ok(content) => parse_word_list(&content).into_iter().collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => {
                warn!("Could not read exclusion list {:?}: {}", path, e);
                BTreeSet::new()
            }
        }
    }

    fn persist(&self, words: &BTreeSet<String>) -> Result<(), ExclusionError> {
        let io_error = |source: std::io::Error| ExclusionError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_error)?;

        let list: Vec<&String> = words.iter().collect();
        let json = serde_json::to_string_pretty(&list)?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(io_error)?;
        temp.write_all(json.as_bytes()).map_err(io_error)?;
        temp.write_all(b"\n").map_err(io_error)?;
        temp.persist(&self.path).map_err(|e| io_error(e.error))?;

        Ok(())
    }
}
