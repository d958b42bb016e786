use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::DocumentError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Markdown output path next to the input document
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if !suffix.is_empty() {
            output_filename.push('.');
            output_filename.push_str(suffix);
        }
        output_filename.push_str(".md");

        output_dir.as_ref().join(output_filename)
    }

    /// Find every .txt and .rtf document below a directory, sorted by path
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::detect_file_type(path) != FileType::Unknown {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read the raw bytes of a document
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, DocumentError> {
        let path = path.as_ref();
        fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect the document type from the file extension (case-insensitive)
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        match path.as_ref().extension() {
            Some(ext) => match ext.to_string_lossy().to_lowercase().as_str() {
                "txt" => FileType::Text,
                "rtf" => FileType::Rtf,
                _ => FileType::Unknown,
            },
            None => FileType::Unknown,
        }
    }
}

/// Enum representing the accepted input types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Plain text export
    Text,
    /// Rich Text Format export
    Rtf,
    /// Anything else
    Unknown,
}
