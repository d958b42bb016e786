use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::address_lookup::{self, LookupRow};
use crate::app_config::Config;
use crate::diagnostics::DiagnosticsReport;
use crate::errors::{DocumentError, ExportError};
use crate::file_utils::FileManager;
use crate::markdown_export::{self, ClipboardSink};
use crate::normalizer::{self, NormalizeOptions, NormalizedDocument, TextSource};
use crate::num_block::{NumBlock, ParsedDocument};

// @module: Application controller for NUM block parsing

/// Result of one parse run over a single file
#[derive(Debug)]
pub struct ParseRun {
    /// File that was parsed
    pub path: PathBuf,
    /// How the text was obtained
    pub source: TextSource,
    /// Blocks and outside text
    pub document: ParsedDocument,
    /// Diagnostics over the blocks
    pub diagnostics: DiagnosticsReport,
    /// Non-fatal RTF extraction problems
    pub warnings: Vec<DocumentError>,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a controller with default configuration
    pub fn new() -> Self {
        Self { config: Config::default() }
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::from(&self.config)
    }

    /// Read and normalize a file without splitting it
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<NormalizedDocument> {
        let path = path.as_ref();
        let normalized = normalizer::load_document(path, &self.normalize_options())
            .with_context(|| format!("Failed to load document: {}", path.display()))?;
        if !normalized.warnings.is_empty() {
            warn!(
                "{} RTF structure problem(s) in {}, output may be incomplete",
                normalized.warnings.len(),
                path.display()
            );
        }
        Ok(normalized)
    }

    /// Read, normalize, split, extract and diagnose one file
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<ParseRun> {
        let path = path.as_ref();
        let start_time = std::time::Instant::now();

        let normalized = self.load(path)?;

        let document = ParsedDocument::parse(&normalized.text);
        let diagnostics = DiagnosticsReport::build(&document.blocks);

        debug!("Parsed {} in {:?}", path.display(), start_time.elapsed());
        info!("Parsed {} blocks from {} ({})", document.len(), path.display(), normalized.source);

        Ok(ParseRun {
            path: path.to_path_buf(),
            source: normalized.source,
            document,
            diagnostics,
            warnings: normalized.warnings,
        })
    }

    /// Parse a file and look up each requested address in it
    pub fn lookup<P: AsRef<Path>, S: AsRef<str>>(&self, path: P, addresses: &[S]) -> Result<Vec<LookupRow>> {
        if addresses.iter().all(|a| a.as_ref().trim().is_empty()) {
            return Err(anyhow!("No addresses to look up"));
        }
        let run = self.parse(path)?;
        let rows = address_lookup::lookup_addresses(&run.document, addresses);
        info!("Looked up {} address(es)", rows.len());
        Ok(rows)
    }

    /// Blocks whose number, Address line or raw text contains the filter
    pub fn filter_blocks<'a>(blocks: &'a [NumBlock], filter: &str) -> Vec<&'a NumBlock> {
        blocks.iter().filter(|block| block.matches_filter(filter)).collect()
    }

    /// One line per block: its label and the first `preview_chars` characters
    pub fn preview_lines(&self, blocks: &[&NumBlock]) -> Vec<String> {
        blocks
            .iter()
            .map(|block| format!("{}: {}", block, block.preview(self.config.preview_chars)))
            .collect()
    }

    /// Run diagnostics for every .txt and .rtf document below a directory.
    /// Files that fail to load are logged and skipped.
    pub fn diagnose_folder<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<ParseRun>> {
        let dir = dir.as_ref();
        if !FileManager::dir_exists(dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", dir));
        }

        let files = FileManager::find_documents(dir)?;
        if files.is_empty() {
            warn!("No .txt or .rtf documents found in {:?}", dir);
            return Ok(Vec::new());
        }

        let progress_bar = ProgressBar::new(files.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut runs = Vec::new();
        for file in &files {
            progress_bar.set_message(
                file.file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
            match self.parse(file) {
                Ok(run) => runs.push(run),
                Err(e) => error!("Error processing file {:?}: {:#}", file, e),
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        info!("Finished processing {} of {} files", runs.len(), files.len());
        Ok(runs)
    }

    /// Deliver rendered Markdown: optionally save it and copy it.
    /// A clipboard failure is reported in the result but does not fail the export.
    pub fn export_markdown(
        &self,
        markdown: &str,
        output: Option<&Path>,
        copy: bool,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<Option<ExportError>> {
        if let Some(path) = output {
            markdown_export::save_markdown(path, markdown)?;
        }

        if copy || self.config.copy_to_clipboard {
            if let Err(e) = markdown_export::copy_markdown(clipboard, markdown) {
                return Ok(Some(e));
            }
        }

        Ok(None)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
