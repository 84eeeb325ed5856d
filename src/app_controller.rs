use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleCollection, SubtitleLine};
use crate::errors::ExclusionError;
use crate::vocabulary::{
    self, ExclusionStore, ExtractedWord, MergeOutcome, TokenFrequency, VocabularyReport, WordBank,
    normalize_token,
};

// @module: Application controller for subtitle vocabulary analysis

/// Immutable inputs for one run: the bank snapshot and the exclusion set
#[derive(Debug, Clone)]
pub struct AnalysisResources {
    pub bank: Arc<WordBank>,
    pub excluded: Arc<HashSet<String>>,
}

impl AnalysisResources {
    pub fn new(bank: WordBank, excluded: HashSet<String>) -> Self {
        Self {
            bank: Arc::new(bank),
            excluded: Arc::new(excluded),
        }
    }
}

/// Everything produced for one subtitle file
#[derive(Debug)]
pub struct FileAnalysis {
    pub collection: SubtitleCollection,
    /// Ranked, truncated report (per-line counts)
    pub report: VocabularyReport,
    /// Raw token counts for the CSV export
    pub frequencies: Vec<TokenFrequency>,
}

/// Output handling for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory for output files; defaults to the subtitle's directory
    pub output_dir: Option<PathBuf>,
    pub force_overwrite: bool,
    /// Print the report table to stdout
    pub print_report: bool,
}

/// Counts from a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Main application controller for vocabulary extraction
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the word bank and exclusion set once for this run.
    ///
    /// Load failures are logged and degrade to empty inputs.
    pub fn load_resources(&self) -> AnalysisResources {
        let bank = WordBank::load_or_empty(&self.config.word_bank_path);
        let excluded = if Path::new(&self.config.exclusions_path).exists() {
            vocabulary::load_exclusion_set(&self.config.exclusions_path)
        } else {
            debug!("No exclusion list at {}", self.config.exclusions_path);
            HashSet::new()
        };

        let tiers: Vec<String> = bank
            .tier_counts()
            .iter()
            .map(|(tier, count)| format!("{} {}", count, tier))
            .collect();
        info!(
            "Word bank: {} words ({}), {} excluded",
            bank.len(),
            tiers.join(", "),
            excluded.len()
        );

        AnalysisResources::new(bank, excluded)
    }

    /// Rank bank words found in the lines, on worker threads for large inputs
    pub async fn extract_words(&self, lines: &[SubtitleLine], resources: &AnalysisResources) -> Result<Vec<ExtractedWord>> {
        let analysis = &self.config.analysis;
        if lines.len() > analysis.parallel_threshold {
            vocabulary::extract_concurrent(
                lines,
                Arc::clone(&resources.bank),
                Arc::clone(&resources.excluded),
                analysis.chunk_size,
            )
            .await
        } else {
            Ok(vocabulary::extract(lines, &resources.bank, &resources.excluded))
        }
    }

    /// Parse one subtitle file and build its report and token counts
    pub async fn analyze_file(&self, input_file: &Path, resources: &AnalysisResources) -> Result<FileAnalysis> {
        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let collection = SubtitleCollection::from_file(input_file)?;
        if collection.is_empty() {
            warn!("No subtitle lines found in {}", input_file.display());
        }

        let words = self.extract_words(&collection.lines, resources).await?;
        let analysis = &self.config.analysis;
        let report = VocabularyReport::new(words, analysis.min_difficulty, analysis.top_n)
            .with_source(input_file.display().to_string());
        let frequencies = vocabulary::token_frequencies(&collection.lines, &resources.excluded);

        debug!(
            "{}: {} lines, {} matched words, {} distinct tokens",
            input_file.display(),
            collection.len(),
            report.total_matches,
            frequencies.len()
        );

        Ok(FileAnalysis {
            collection,
            report,
            frequencies,
        })
    }

    /// Analyze a single subtitle file and write its outputs
    pub async fn run(&self, input_file: PathBuf, options: &RunOptions) -> Result<FileAnalysis> {
        let start_time = Instant::now();
        let resources = self.load_resources();

        let analysis = self.analyze_file(&input_file, &resources).await?;
        if options.print_report {
            println!("{}", analysis.report.render_table(self.config.analysis.max_contexts));
        }

        let output_dir = Self::output_dir_for(&input_file, options);
        self.write_outputs(&analysis, &resources.bank, &output_dir, options.force_overwrite)?;

        info!(
            "Analysis complete in {}.",
            Self::format_duration(start_time.elapsed())
        );

        Ok(analysis)
    }

    /// Analyze every `.srt` file under a directory, one independent report per file
    pub async fn run_folder(&self, input_dir: PathBuf, options: &RunOptions) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let subtitle_files = FileManager::find_subtitles(&input_dir)?;
        if subtitle_files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        // One bank load for the whole folder
        let resources = self.load_resources();

        let folder_pb = ProgressBar::new(subtitle_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for subtitle_file in &subtitle_files {
            let file_name = subtitle_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Analyzing: {}", file_name));

            let result = async {
                let analysis = self.analyze_file(subtitle_file, &resources).await?;
                let output_dir = Self::output_dir_for(subtitle_file, options);
                self.write_outputs(&analysis, &resources.bank, &output_dir, options.force_overwrite)?;
                Ok::<_, anyhow::Error>(analysis)
            }
            .await;

            match result {
                Ok(analysis) => {
                    if options.print_report {
                        let table = analysis.report.render_table(self.config.analysis.max_contexts);
                        folder_pb.suspend(|| println!("{}", table));
                    }
                    summary.processed += 1;
                }
                Err(e) => {
                    folder_pb.suspend(|| error!("Error processing file {}: {:#}", file_name, e));
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();
        info!(
            "Folder analysis completed: {} processed, {} errors in {}",
            summary.processed,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    /// Write the configured output files; existing files are kept unless forced
    pub fn write_outputs(
        &self,
        analysis: &FileAnalysis,
        bank: &WordBank,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        let export = &self.config.export;
        let source = &analysis.collection.source_file;
        let mut written = Vec::new();

        if export.write_csv {
            let path = FileManager::report_path(source, output_dir, "csv");
            if Self::may_write(&path, force_overwrite) {
                let csv = vocabulary::export_csv(&analysis.frequencies, bank, export.difficult_only);
                FileManager::write_text(&path, &csv)?;
                written.push(path);
            }
        }

        if export.write_json {
            let path = FileManager::report_path(source, output_dir, "json");
            if Self::may_write(&path, force_overwrite) {
                let json = analysis.report.to_json().context("Failed to serialize report")?;
                FileManager::write_text(&path, &json)?;
                written.push(path);
            }
        }

        for path in &written {
            info!("Success: {}", path.display());
        }

        Ok(written)
    }

    /// Add words to the persisted "too easy" list.
    ///
    /// Every word is checked before the list is touched; one letterless word
    /// rejects the whole batch.
    pub fn mark_too_easy(&self, words: &[String]) -> Result<MergeOutcome> {
        let mut normalized = Vec::with_capacity(words.len());
        for word in words {
            let canonical = normalize_token(word);
            if canonical.is_empty() {
                return Err(ExclusionError::EmptyWord(word.clone()).into());
            }
            normalized.push(canonical);
        }

        let store = ExclusionStore::open(&self.config.exclusions_path);
        Ok(store.merge(normalized)?)
    }

    /// Union a word list file into the persisted "too easy" list
    pub fn merge_too_easy_file(&self, list_file: &Path) -> Result<MergeOutcome> {
        let content = FileManager::read_text(list_file)?;
        let words = vocabulary::exclusions::parse_word_list(&content);

        let store = ExclusionStore::open(&self.config.exclusions_path);
        Ok(store.merge(words)?)
    }

    fn output_dir_for(input_file: &Path, options: &RunOptions) -> PathBuf {
        options
            .output_dir
            .clone()
            .or_else(|| input_file.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn may_write(path: &Path, force_overwrite: bool) -> bool {
        if path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, file already exists (use -f to force overwrite)",
                path.display()
            );
            return false;
        }
        true
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
