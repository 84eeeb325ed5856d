/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use subvocab::file_utils::FileManager;
use crate::common;

/// Test that the report path keeps inner dots of the stem
#[test]
fn test_report_path_withDottedStem_shouldInsertVocabSuffix() {
    let subtitle = Path::new("/tmp/input/movie.en.srt");
    let output_dir = Path::new("/tmp/output");

    assert_eq!(
        FileManager::report_path(subtitle, output_dir, "csv"),
        Path::new("/tmp/output/movie.en.vocab.csv")
    );
    assert_eq!(
        FileManager::report_path(subtitle, output_dir, "json"),
        Path::new("/tmp/output/movie.en.vocab.json")
    );
}

/// Test subtitle extension detection
#[test]
fn test_is_subtitle_withMixedCase_shouldMatchSrtOnly() {
    assert!(FileManager::is_subtitle(Path::new("a.srt")));
    assert!(FileManager::is_subtitle(Path::new("b.SRT")));
    assert!(!FileManager::is_subtitle(Path::new("a.vocab.csv")));
    assert!(!FileManager::is_subtitle(Path::new("srt")));
}

/// Test recursive subtitle discovery
#[test]
fn test_find_subtitles_withNestedDirs_shouldFindSrtFilesInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;
    common::create_test_file(temp_dir.path(), "a.srt", "")?;
    common::create_test_file(&nested, "b.SRT", "")?;
    common::create_test_file(&nested, "c.srt", "")?;
    common::create_test_file(&nested, "notes.txt", "")?;

    let files = FileManager::find_subtitles(temp_dir.path())?;

    let names: Vec<String> = files
        .iter()
        .filter_map(|f| f.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    assert_eq!(names, vec!["a.srt", "b.SRT", "c.srt"]);

    Ok(())
}

/// Test that write_text creates parent directories
#[test]
fn test_write_text_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("dir").join("out.csv");

    FileManager::write_text(&path, "word,count\n")?;

    assert_eq!(FileManager::read_text(&path)?, "word,count\n");

    Ok(())
}

/// Test reading a missing file
#[test]
fn test_read_text_withMissingFile_shouldFail() {
    assert!(FileManager::read_text(Path::new("/no/such/list.txt")).is_err());
}
