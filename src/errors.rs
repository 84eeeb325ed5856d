/*!
 * Error types for the subvocab application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading subtitle input
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The input bytes are not valid UTF-8 text
    #[error("Subtitle input is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// The subtitle file could not be read
    #[error("Failed to read subtitle file {path:?}: {source}")]
    Read {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },
}

/// Errors that can occur when loading a word bank
#[derive(Error, Debug)]
pub enum WordBankError {
    /// The word bank file could not be read
    #[error("Failed to read word bank {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The word bank file is not valid JSON of the expected shape
    #[error("Failed to parse word bank {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors raised by the persisted "too easy" exclusion list
#[derive(Error, Debug)]
pub enum ExclusionError {
    /// The word normalizes to nothing and cannot be stored
    #[error("'{0}' does not contain a usable word")]
    EmptyWord(String),

    /// Reading or writing the exclusion file failed
    #[error("Exclusion list I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serializing the exclusion list failed
    #[error("Failed to serialize exclusion list: {0}")]
    Serialize(#[from] serde_json::Error),
}
