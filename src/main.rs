// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use numblocks::app_config::{self, Config};
use numblocks::file_utils::FileManager;
use numblocks::markdown_export::{self, SystemClipboard};
use numblocks::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// Where exported Markdown goes besides stdout
#[derive(Args, Debug)]
struct ExportArgs {
    /// Save the Markdown table to this file, or into this directory
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Copy the Markdown table to the clipboard
    #[arg(short = 'y', long)]
    copy: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the NUM blocks of a file as a Markdown table
    Blocks {
        /// Input .txt or .rtf file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only show blocks whose number, Address line or text contains this
        #[arg(long)]
        filter: Option<String>,

        /// Print one preview line per block instead of the table
        #[arg(short, long)]
        preview: bool,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Print diagnostics for a file, or for every document in a directory
    Diagnostics {
        /// Input file or directory
        #[arg(value_name = "PATH")]
        input: PathBuf,
    },

    /// Look up addresses and print the result table
    Lookup {
        /// Input .txt or .rtf file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Addresses to look up
        #[arg(value_name = "ADDRESS")]
        addresses: Vec<String>,

        /// Read more addresses from a file, one per line
        #[arg(short, long, value_name = "FILE")]
        addresses_file: Option<PathBuf>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Print every extracted value and the raw text of each block
    Report {
        /// Input .txt or .rtf file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Generate shell completions for numblocks
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// numblocks - NUM block parser for HMI screen exports
///
/// Extracts `Numeral Display & Input` blocks from .txt and .rtf exports,
/// checks numbering and addresses, and exports Markdown tables.
#[derive(Parser, Debug)]
#[command(name = "numblocks")]
#[command(version)]
#[command(about = "NUM block parser for HMI screen exports")]
#[command(long_about = "numblocks extracts 'Numeral Display & Input' blocks from .txt and .rtf exports.

EXAMPLES:
    numblocks blocks screens.txt                      # Table of all NUM blocks
    numblocks blocks screens.rtf --filter ETHERNET    # Only matching blocks
    numblocks blocks screens.txt --preview            # Number, Address and text start
    numblocks diagnostics screens.txt                 # Count, gaps, duplicates
    numblocks diagnostics exports/                    # Every document in a directory
    numblocks lookup screens.txt 100 VUA.IJ.Buffer    # Find addresses
    numblocks lookup screens.txt -a wanted.txt -o lookup.md --copy
    numblocks lookup screens.txt 100 -o out/          # Writes out/screens.lookup.md
    numblocks report screens.txt                      # Everything extracted, per block
    numblocks completions bash > numblocks.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in numblocks.json by default. You can specify a
    different file with --config. If the file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "numblocks.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
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
        // The logger itself lets everything through; log::max_level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }

    // @returns: Symbol for log level
    fn get_symbol_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✖",
            Level::Warn => "⚠",
            Level::Info => "·",
            Level::Debug => "›",
            Level::Trace => "»",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                Self::get_symbol_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "numblocks", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let config = load_config(&cli.config_path, cli.log_level)?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Blocks { input, filter, preview, export } => {
            let run = controller.parse(&input)?;
            let selected = Controller::filter_blocks(&run.document.blocks, filter.as_deref().unwrap_or(""));
            if preview {
                for line in controller.preview_lines(&selected) {
                    println!("{}", line);
                }
                return Ok(());
            }
            let blocks: Vec<_> = selected.into_iter().cloned().collect();
            let markdown = markdown_export::blocks_to_markdown(&blocks);
            println!("{}", markdown);
            deliver(&controller, &input, "blocks", &markdown, &export)?;
        }
        Commands::Diagnostics { input } => {
            if input.is_dir() {
                for run in controller.diagnose_folder(&input)? {
                    println!("## {}", run.path.display());
                    println!("{}", run.diagnostics);
                }
            } else {
                let run = controller.parse(&input)?;
                print!("{}", run.diagnostics);
            }
        }
        Commands::Lookup { input, mut addresses, addresses_file, export } => {
            if let Some(path) = addresses_file {
                let content = FileManager::read_to_string(&path)?;
                addresses.extend(content.lines().map(|line| line.trim().to_string()));
            }
            let rows = controller.lookup(&input, &addresses)?;
            let markdown = markdown_export::lookup_rows_to_markdown(&rows);
            println!("{}", markdown);
            deliver(&controller, &input, "lookup", &markdown, &export)?;
        }
        Commands::Report { input } => {
            let run = controller.parse(&input)?;
            println!("{}", markdown_export::blocks_debug_report(&run.document.blocks));
        }
        // Handled before configuration is loaded
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// Save and copy exported Markdown; a clipboard failure only warns
fn deliver(controller: &Controller, input: &Path, suffix: &str, markdown: &str, export: &ExportArgs) -> Result<()> {
    // A directory output gets a file named after the input
    let output = export.output.as_deref().map(|path| {
        if FileManager::dir_exists(path) {
            FileManager::generate_output_path(input, path, suffix)
        } else {
            path.to_path_buf()
        }
    });

    let mut clipboard = SystemClipboard;
    if let Some(e) = controller.export_markdown(markdown, output.as_deref(), export.copy, &mut clipboard)? {
        warn!("Markdown not copied: {}", e);
    }
    Ok(())
}

// Load or create configuration, then apply command line overrides
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if FileManager::file_exists(config_path) {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        info!("Default configuration written to {}", config_path);

        config
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

    Ok(config)
}
