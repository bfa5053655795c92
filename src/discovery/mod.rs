// Example discovery: find annotated example files and read their metadata

pub mod metadata;

pub use metadata::*;

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One discovered example
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRecord {
    pub title: String,
    pub category: String,
    /// File name without extension
    pub file: String,
}

/// Scans a source directory for example files
pub struct ExampleScanner {
    extension: String,
    verbose: bool,
}

impl ExampleScanner {
    /// Create a scanner for files ending in `.<extension>`
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            verbose: false,
        }
    }

    /// Show a progress bar while reading files
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Discover and validate every example in `source_dir`.
    ///
    /// Fails on the first file lacking a tag, before anything is written.
    pub fn scan(&self, source_dir: &Path) -> Result<Vec<ExampleRecord>> {
        let files = self.discover_files(source_dir)?;
        tracing::info!(
            "Found {} example files in {}",
            files.len(),
            source_dir.display()
        );

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            let style = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map(|s| s.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            Some(pb)
        } else {
            None
        };

        let mut records = Vec::with_capacity(files.len());
        for path in &files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if let Some(ref pb) = progress {
                pb.set_message(name.clone());
                pb.inc(1);
            }

            let record = read_example(path, &name)?;
            tracing::debug!(
                file = %record.file,
                category = %record.category,
                "Read example \"{}\"",
                record.title
            );
            records.push(record);
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(records)
    }

    /// List example files at the top level of `root`, ordered by file name
    pub fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            // Only entries named like examples may fail the run
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.path().map_or(false, |p| self.is_example_name(p)) => {
                    return Err(e.into());
                }
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_example_name(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }

        Ok(files)
    }

    fn is_example_name(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e == self.extension)
    }
}

fn read_example(path: &Path, name: &str) -> Result<ExampleRecord> {
    let bytes = std::fs::read(path).map_err(|e| Error::filesystem("read", path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    let meta = extract(name, &text)?;

    let file = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());

    Ok(ExampleRecord {
        title: meta.title,
        category: meta.category,
        file,
    })
}
