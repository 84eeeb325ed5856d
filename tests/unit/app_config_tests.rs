/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use subvocab::app_config::{Config, LogLevel};
use subvocab::vocabulary::Difficulty;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.word_bank_path, "word_bank.json");
    assert!(config.exclusions_path.ends_with("too_easy.json"));
    assert_eq!(config.analysis.top_n, 50);
    assert_eq!(config.analysis.max_contexts, 3);
    assert_eq!(config.analysis.min_difficulty, Difficulty::Foundation);
    assert_eq!(config.analysis.parallel_threshold, 5000);
    assert_eq!(config.analysis.chunk_size, 2000);
    assert!(config.export.write_csv);
    assert!(!config.export.write_json);
    assert!(!config.export.difficult_only);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.analysis.chunk_size = 0;
    assert!(config.validate().is_err());
    config.analysis.chunk_size = 10;

    config.word_bank_path = "  ".to_string();
    assert!(config.validate().is_err());
    config.word_bank_path = "bank.json".to_string();

    config.exclusions_path = String::new();
    assert!(config.validate().is_err());
}

/// Test that partial JSON falls back to defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "word_bank_path": "custom.json",
        "analysis": { "top_n": 10, "min_difficulty": "advanced" },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.word_bank_path, "custom.json");
    assert_eq!(config.analysis.top_n, 10);
    assert_eq!(config.analysis.min_difficulty, Difficulty::Advanced);
    assert_eq!(config.analysis.max_contexts, 3);
    assert!(config.export.write_csv);
    assert_eq!(config.log_level, LogLevel::Debug);

    Ok(())
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.word_bank_path, created.word_bank_path);
    assert_eq!(loaded.analysis.top_n, created.analysis.top_n);

    Ok(())
}

/// Test that an invalid config file is reported
#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());

    Ok(())
}

/// Test log level mapping
#[test]
fn test_log_level_to_level_filter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
