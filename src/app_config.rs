use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::vocabulary::Difficulty;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path to the word bank JSON file
    #[serde(default = "default_word_bank_path")]
    pub word_bank_path: String,

    /// Path to the persisted "too easy" list
    #[serde(default = "default_exclusions_path")]
    pub exclusions_path: String,

    /// Extraction and presentation settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Output file settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Extraction and presentation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Number of ranked words shown (0 = all)
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Context lines printed per word
    #[serde(default = "default_max_contexts")]
    pub max_contexts: usize,

    /// Lowest difficulty tier shown in the report
    #[serde(default)]
    pub min_difficulty: Difficulty,

    /// Line count above which extraction runs on worker threads
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Lines per worker chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            max_contexts: default_max_contexts(),
            min_difficulty: Difficulty::default(),
            parallel_threshold: default_parallel_threshold(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Output file settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExportConfig {
    /// Write `<stem>.vocab.csv` with raw token counts
    #[serde(default = "default_true")]
    pub write_csv: bool,

    /// Write `<stem>.vocab.json` with the ranked report
    #[serde(default)]
    pub write_json: bool,

    /// Only export words listed in the word bank
    #[serde(default)]
    pub difficult_only: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            write_csv: true,
            write_json: false,
            difficult_only: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_top_n() -> usize {
    crate::vocabulary::report::DEFAULT_TOP_N
}

fn default_max_contexts() -> usize {
    3
}

fn default_parallel_threshold() -> usize {
    5000
}

fn default_chunk_size() -> usize {
    2000
}

fn default_true() -> bool {
    true
}

fn default_word_bank_path() -> String {
    "word_bank.json".to_string()
}

fn default_exclusions_path() -> String {
    // Falls back to the working directory when the platform has no data dir
    dirs::data_dir()
        .map(|dir| dir.join("subvocab").join("too_easy.json"))
        .unwrap_or_else(|| PathBuf::from("too_easy.json"))
        .to_string_lossy()
        .to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.word_bank_path.trim().is_empty() {
            return Err(anyhow!("Word bank path must not be empty"));
        }

        if self.exclusions_path.trim().is_empty() {
            return Err(anyhow!("Exclusion list path must not be empty"));
        }

        if self.analysis.chunk_size == 0 {
            return Err(anyhow!("Analysis chunk size must be greater than zero"));
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration, writing a default file first when none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize default config")?;
        crate::file_utils::FileManager::write_text(path.as_ref(), &json)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            word_bank_path: default_word_bank_path(),
            exclusions_path: default_exclusions_path(),
            analysis: AnalysisConfig::default(),
            export: ExportConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
