// Navigation manifest: examples grouped by category
//
// Category order is the order categories are first seen; entries within a
// category keep discovery order. The playground menu renders both orders.

use crate::discovery::ExampleRecord;
use crate::error::Result;
use crate::output::workspace::Workspace;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Example file name without extension
    pub src: String,
    /// Example title
    pub label: String,
}

/// Category to entries mapping, serialized as a plain JSON object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    categories: IndexMap<String, Vec<ManifestEntry>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group records by category, preserving order
    pub fn build(records: &[ExampleRecord]) -> Self {
        let mut manifest = Self::new();
        for record in records {
            manifest.push(record);
        }
        manifest
    }

    /// Append one record to its category, creating the category if new
    pub fn push(&mut self, record: &ExampleRecord) {
        self.categories
            .entry(record.category.clone())
            .or_default()
            .push(ManifestEntry {
                src: record.file.clone(),
                label: record.title.clone(),
            });
    }

    /// Entries of one category
    pub fn get(&self, category: &str) -> Option<&[ManifestEntry]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Categories in first-seen order with their entries
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[ManifestEntry])> {
        self.categories
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of entries across categories
    pub fn entry_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Persist the manifest as `file_name` inside the workspace
    pub fn write(&self, workspace: &Workspace, file_name: &str) -> Result<PathBuf> {
        let path = workspace.write(file_name, &self.to_json()?)?;
        tracing::debug!(
            categories = self.len(),
            entries = self.entry_count(),
            "Wrote manifest {}",
            path.display()
        );
        Ok(path)
    }
}
