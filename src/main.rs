// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subvocab::app_config::{self, Config};
use subvocab::app_controller::{Controller, RunOptions};
use subvocab::vocabulary::Difficulty;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for Difficulty to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDifficulty {
    Foundation,
    Intermediate,
    Advanced,
}

impl From<CliDifficulty> for Difficulty {
    fn from(cli_difficulty: CliDifficulty) -> Self {
        match cli_difficulty {
            CliDifficulty::Foundation => Difficulty::Foundation,
            CliDifficulty::Intermediate => Difficulty::Intermediate,
            CliDifficulty::Advanced => Difficulty::Advanced,
        }
    }
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Word bank JSON file
    #[arg(short, long, global = true)]
    word_bank: Option<PathBuf>,

    /// Persisted "too easy" list
    #[arg(short, long, global = true)]
    exclusions: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug, Clone, Default)]
struct AnalyzeArgs {
    /// Number of ranked words to show (0 = all)
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Context lines printed per word
    #[arg(long)]
    contexts: Option<usize>,

    /// Lowest difficulty tier to show
    #[arg(long, value_enum)]
    min_difficulty: Option<CliDifficulty>,

    /// Write the raw token count CSV export
    #[arg(long)]
    csv: bool,

    /// Write the ranked report as JSON
    #[arg(long)]
    json: bool,

    /// Only export words listed in the word bank
    #[arg(long)]
    difficult_only: bool,

    /// Directory for output files (defaults to the subtitle's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Do not print the report table
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a subtitle file or folder (default command)
    #[command(alias = "analyse")]
    Analyze {
        /// Subtitle file or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        args: AnalyzeArgs,
    },

    /// Mark words as too easy so they never appear in reports
    TooEasy {
        /// Words to add
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Merge a word list (JSON array or one word per line) into the too-easy list
    MergeTooEasy {
        /// Word list file
        file: PathBuf,
    },

    /// Generate shell completions for subvocab
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subvocab - vocabulary extraction from subtitles
///
/// Ranks the word-bank vocabulary found in an SRT subtitle file by how many
/// lines it appears in, with the lines as examples.
#[derive(Parser, Debug)]
#[command(name = "subvocab")]
#[command(version)]
#[command(about = "Extract ranked study vocabulary from SRT subtitles")]
#[command(long_about = "subvocab parses an SRT subtitle file, matches its words against a difficulty-tiered word bank and ranks them by the number of lines they appear in.

EXAMPLES:
    subvocab movie.srt                          # Analyze using default config
    subvocab -w bank.json movie.srt             # Use a specific word bank
    subvocab -n 20 --min-difficulty advanced movie.srt
    subvocab --csv --json -o out/ movie.srt     # Write CSV and JSON outputs
    subvocab analyze /subtitles/                # Analyze every .srt in a folder
    subvocab too-easy however therefore         # Never show these words again
    subvocab merge-too-easy known_words.txt     # Merge a word list into the too-easy list
    subvocab completions bash > subvocab.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    analyze: AnalyzeArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The logger accepts everything; the effective level is set through log::set_max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = dispatch(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn dispatch(cli: CommandLineOptions) -> Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subvocab", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Analyze { input_path, args }) => {
            let controller = build_controller(&cli.common, Some(&args))?;
            run_analyze(&controller, input_path, &args).await
        }
        Some(Commands::TooEasy { words }) => {
            let controller = build_controller(&cli.common, None)?;
            let outcome = controller.mark_too_easy(&words)?;
            info!(
                "Added {} new word(s) to {} ({} total)",
                outcome.added,
                controller.config().exclusions_path,
                outcome.total
            );
            Ok(())
        }
        Some(Commands::MergeTooEasy { file }) => {
            let controller = build_controller(&cli.common, None)?;
            let outcome = controller.merge_too_easy_file(&file)?;
            info!(
                "Merged {}: {} new word(s), {} total",
                file.display(),
                outcome.added,
                outcome.total
            );
            Ok(())
        }
        None => {
            // Default behavior - analyze the top-level input path
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            let controller = build_controller(&cli.common, Some(&cli.analyze))?;
            run_analyze(&controller, input_path, &cli.analyze).await
        }
    }
}

/// Load config, apply command line overrides and build the controller
fn build_controller(common: &CommonArgs, analyze: Option<&AnalyzeArgs>) -> Result<Controller> {
    // If log level is set via command line, apply it before loading anything
    if let Some(cmd_log_level) = &common.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&common.config_path)?;

    match &common.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    if let Some(word_bank) = &common.word_bank {
        config.word_bank_path = word_bank.to_string_lossy().to_string();
    }

    if let Some(exclusions) = &common.exclusions {
        config.exclusions_path = exclusions.to_string_lossy().to_string();
    }

    if let Some(args) = analyze {
        if let Some(top) = args.top {
            config.analysis.top_n = top;
        }
        if let Some(contexts) = args.contexts {
            config.analysis.max_contexts = contexts;
        }
        if let Some(min_difficulty) = &args.min_difficulty {
            config.analysis.min_difficulty = min_difficulty.clone().into();
        }
        if args.csv {
            config.export.write_csv = true;
        }
        if args.json {
            config.export.write_json = true;
        }
        if args.difficult_only {
            config.export.difficult_only = true;
        }
    }

    Controller::with_config(config)
}

async fn run_analyze(controller: &Controller, input_path: PathBuf, args: &AnalyzeArgs) -> Result<()> {
    let options = RunOptions {
        output_dir: args.output_dir.clone(),
        force_overwrite: args.force_overwrite,
        print_report: !args.quiet,
    };

    if input_path.is_dir() {
        let summary = controller.run_folder(input_path, &options).await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) could not be analyzed", summary.failed));
        }
        Ok(())
    } else {
        controller.run(input_path, &options).await.map(|_| ())
    }
}
