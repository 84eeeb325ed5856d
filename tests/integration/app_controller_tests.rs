/*!
 * Integration tests for the application controller
 */

use std::fs;
use anyhow::Result;
use subvocab::app_controller::{Controller, FolderSummary, RunOptions};
use subvocab::vocabulary::{Difficulty, MergeOutcome, load_exclusion_set};
use crate::common;

/// Test that a single-file run writes the CSV next to the subtitle
#[tokio::test]
async fn test_run_withSampleSubtitle_shouldWriteCsvReport() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;

    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;
    let analysis = controller.run(input, &RunOptions::default()).await?;

    assert_eq!(analysis.report.words[0].word, "serene");
    assert_eq!(analysis.report.words[0].occurrences, 3);

    let csv_path = temp_dir.path().join("episode.vocab.csv");
    let csv = fs::read_to_string(&csv_path)?;
    assert!(csv.lines().any(|row| row.starts_with("serene,5,true,intermediate")));
    assert!(!temp_dir.path().join("episode.vocab.json").exists());

    Ok(())
}

/// Test that the JSON report is written when enabled
#[tokio::test]
async fn test_run_withJsonEnabled_shouldWriteReportJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let output_dir = temp_dir.path().join("out");

    let mut config = common::test_config(temp_dir.path());
    config.export.write_json = true;
    config.analysis.top_n = 2;
    let controller = Controller::with_config(config)?;

    let options = RunOptions {
        output_dir: Some(output_dir.clone()),
        ..RunOptions::default()
    };
    controller.run(input, &options).await?;

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output_dir.join("episode.vocab.json"))?)?;
    assert_eq!(json["total_matches"], 5);
    assert_eq!(json["words"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["words"][0]["word"], "serene");
    assert!(output_dir.join("episode.vocab.csv").exists());

    Ok(())
}

/// Test that existing outputs are kept unless overwrite is forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldOnlyOverwriteWhenForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let csv_path = common::create_test_file(temp_dir.path(), "episode.vocab.csv", "keep me")?;

    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;

    controller.run(input.clone(), &RunOptions::default()).await?;
    assert_eq!(fs::read_to_string(&csv_path)?, "keep me");

    let forced = RunOptions {
        force_overwrite: true,
        ..RunOptions::default()
    };
    controller.run(input, &forced).await?;
    assert!(fs::read_to_string(&csv_path)?.starts_with("word,count,isDifficult"));

    Ok(())
}

/// Test that undecodable input fails without writing anything
#[tokio::test]
async fn test_run_withInvalidUtf8_shouldFailWithoutOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input = temp_dir.path().join("broken.srt");
    fs::write(&input, [0x31u8, 0x0a, 0xff, 0xfe, 0xfd])?;

    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;
    let result = controller.run(input, &RunOptions::default()).await;

    assert!(result.is_err());
    assert!(!temp_dir.path().join("broken.vocab.csv").exists());

    Ok(())
}

/// Test that a missing bank degrades to an empty report
#[tokio::test]
async fn test_run_withMissingBank_shouldProduceEmptyReport() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;

    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;
    let analysis = controller.run(input, &RunOptions::default()).await?;

    assert!(analysis.report.is_empty());
    assert_eq!(analysis.report.total_matches, 0);

    let csv = fs::read_to_string(temp_dir.path().join("episode.vocab.csv"))?;
    assert!(csv.lines().skip(1).all(|row| row.contains(",false,")));

    Ok(())
}

/// Test that the difficulty filter applies to the report
#[tokio::test]
async fn test_analyze_file_withMinDifficulty_shouldFilterReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;

    let mut config = common::test_config(temp_dir.path());
    config.analysis.min_difficulty = Difficulty::Intermediate;
    let controller = Controller::with_config(config)?;

    let resources = controller.load_resources();
    let analysis = controller.analyze_file(&input, &resources).await?;

    let words: Vec<&str> = analysis.report.words.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(words, vec!["serene", "ubiquitous"]);

    Ok(())
}

/// Test that the tier floor picks the top advanced words, not advanced words within the overall top
#[tokio::test]
async fn test_analyze_file_withTopNAndAdvancedTier_shouldReportAdvancedWord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;

    let mut config = common::test_config(temp_dir.path());
    config.analysis.top_n = 1;
    config.analysis.min_difficulty = Difficulty::Advanced;
    let controller = Controller::with_config(config)?;

    let resources = controller.load_resources();
    let analysis = controller.analyze_file(&input, &resources).await?;

    assert_eq!(analysis.report.words.len(), 1);
    assert_eq!(analysis.report.words[0].word, "ubiquitous");
    assert_eq!(analysis.report.total_matches, 1);

    Ok(())
}

/// Test that large inputs take the worker path and give the same ranking
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_extract_words_aboveThreshold_shouldMatchSequentialRanking() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;

    let mut config = common::test_config(temp_dir.path());
    config.analysis.parallel_threshold = 1;
    config.analysis.chunk_size = 1;
    let controller = Controller::with_config(config)?;
    let resources = controller.load_resources();

    let lines = subvocab::parse_srt_string(common::SAMPLE_SRT);
    let concurrent = controller.extract_words(&lines, &resources).await?;
    let sequential = subvocab::extract(&lines, &resources.bank, &resources.excluded);

    assert_eq!(concurrent, sequential);

    Ok(())
}

/// Test folder mode with one broken file among valid ones
#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldCountFailures() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input_dir = temp_dir.path().join("season");
    fs::create_dir_all(&input_dir)?;
    common::create_test_subtitle(&input_dir, "e01.srt")?;
    common::create_test_subtitle(&input_dir, "e02.srt")?;
    fs::write(input_dir.join("e03.srt"), [0xffu8, 0xfe])?;
    common::create_test_file(&input_dir, "notes.txt", "not a subtitle")?;

    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;
    let summary = controller.run_folder(input_dir.clone(), &RunOptions::default()).await?;

    assert_eq!(summary, FolderSummary { processed: 2, failed: 1 });
    assert!(input_dir.join("e01.vocab.csv").exists());
    assert!(input_dir.join("e02.vocab.csv").exists());
    assert!(!input_dir.join("e03.vocab.csv").exists());

    Ok(())
}

/// Test folder mode on a directory without subtitles
#[tokio::test]
async fn test_run_folder_withNoSubtitles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;

    let result = controller.run_folder(temp_dir.path().to_path_buf(), &RunOptions::default()).await;

    assert!(result.is_err());

    Ok(())
}

/// Test that marked words disappear from later runs
#[tokio::test]
async fn test_mark_too_easy_thenRun_shouldSuppressWord() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_bank(temp_dir.path())?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;

    let outcome = controller.mark_too_easy(&["Serene!".to_string(), "serene".to_string()])?;
    assert_eq!(outcome, MergeOutcome { added: 1, total: 1 });

    let analysis = controller.run(input, &RunOptions::default()).await?;
    assert!(analysis.report.words.iter().all(|w| w.word != "serene"));
    assert!(analysis.frequencies.iter().all(|f| f.word != "serene"));

    Ok(())
}

/// Test that marking a word without letters is rejected
#[test]
fn test_mark_too_easy_withoutLetters_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;

    assert!(controller.mark_too_easy(&["42".to_string()]).is_err());

    Ok(())
}

/// Test that one bad word rejects the whole batch before anything is stored
#[test]
fn test_mark_too_easy_withOneLetterlessWord_shouldStoreNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::test_config(temp_dir.path());
    let exclusions_path = config.exclusions_path.clone();
    let controller = Controller::with_config(config)?;

    let result = controller.mark_too_easy(&["fine".to_string(), "42".to_string()]);

    assert!(result.is_err());
    assert!(!std::path::Path::new(&exclusions_path).exists());

    let outcome = controller.mark_too_easy(&["fine".to_string(), "Well!".to_string()])?;
    assert_eq!(outcome, MergeOutcome { added: 2, total: 2 });

    Ok(())
}

/// Test that merging a word list file is a union
#[test]
fn test_merge_too_easy_file_twice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let list = common::create_test_file(temp_dir.path(), "list.txt", "Weather\ntoday\n\n")?;
    let config = common::test_config(temp_dir.path());
    let exclusions_path = config.exclusions_path.clone();
    let controller = Controller::with_config(config)?;

    let first = controller.merge_too_easy_file(&list)?;
    let second = controller.merge_too_easy_file(&list)?;

    assert_eq!(first, MergeOutcome { added: 2, total: 2 });
    assert_eq!(second, MergeOutcome { added: 0, total: 2 });

    let stored = load_exclusion_set(&exclusions_path);
    assert!(stored.contains("weather"));
    assert!(stored.contains("today"));

    Ok(())
}
