// Multi-page playground generator
//
// Reads every example, then regenerates the workspace: one entry module and
// one HTML page per example plus the navigation manifest.

use crate::config::PlaygroundConfig;
use crate::discovery::{ExampleRecord, ExampleScanner};
use crate::error::{Error, Result};
use crate::output::manifest::Manifest;
use crate::output::template::Template;
use crate::output::workspace::Workspace;
use std::path::{Component, Path};

/// Playground generator
pub struct PlaygroundGenerator {
    config: PlaygroundConfig,
    verbose: bool,
}

/// Result of a successful run
#[derive(Debug)]
pub struct Generation {
    pub records: Vec<ExampleRecord>,
    pub manifest: Manifest,
    pub report: GenerationReport,
}

impl PlaygroundGenerator {
    pub fn new(config: PlaygroundConfig) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    /// Show progress while scanning examples
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Load the configured template and generate the playground
    pub fn generate(&self) -> Result<Generation> {
        let template = match &self.config.template {
            Some(path) => Template::load(path)?,
            None => Template::builtin(),
        };
        self.generate_with_template(&template)
    }

    /// Generate the playground from an already loaded template.
    ///
    /// All examples are validated before the workspace is touched, so a
    /// failing run leaves the output directory as it was.
    pub fn generate_with_template(&self, template: &Template) -> Result<Generation> {
        let source_dir = &self.config.source_dir;
        let output_dir = &self.config.output_dir;
        self.config.validate_manifest_file()?;

        let records = ExampleScanner::new(self.config.extension.as_str())
            .with_verbose(self.verbose)
            .scan(source_dir)?;

        if records.is_empty() {
            tracing::warn!(
                "No .{} examples found in {}",
                self.config.extension,
                source_dir.display()
            );
        }

        let source_abs = source_dir
            .canonicalize()
            .map_err(|e| Error::filesystem("resolve", source_dir, e))?;
        if let Ok(output_abs) = output_dir.canonicalize() {
            if source_abs.starts_with(&output_abs) {
                return Err(Error::config_validation(format!(
                    "output directory {} contains the example sources",
                    output_dir.display()
                )));
            }
        }

        let workspace = Workspace::reset(output_dir)?;
        let output_abs = workspace
            .root()
            .canonicalize()
            .map_err(|e| Error::filesystem("resolve", workspace.root(), e))?;
        let import_prefix = relative_path(&output_abs, &source_abs);

        let mut report = GenerationReport::default();
        for record in &records {
            self.write_example(&workspace, template, record, &import_prefix)?;
            report.entries_written += 1;
            report.pages_written += 1;
        }

        let manifest = Manifest::build(&records);
        manifest.write(&workspace, &self.config.manifest_file)?;
        report.examples = records.len();
        report.categories = manifest.len();

        tracing::info!("{}", report.summary());

        Ok(Generation {
            records,
            manifest,
            report,
        })
    }

    fn write_example(
        &self,
        workspace: &Workspace,
        template: &Template,
        record: &ExampleRecord,
        import_prefix: &str,
    ) -> Result<()> {
        let entry_name = format!("{}.{}", record.file, self.config.extension);
        let entry = entry_module(import_prefix, &record.file);
        workspace.write(&entry_name, &entry)?;

        let url = format!("./{}", entry_name);
        let page = template.render(&[("title", record.title.as_str()), ("url", url.as_str())]);
        workspace.write(&format!("{}.html", record.file), &page)?;

        tracing::debug!("Generated {} and {}.html", entry_name, record.file);
        Ok(())
    }

    /// Get the output directory
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }
}

/// Source of the entry module that loads one example
pub fn entry_module(import_prefix: &str, file: &str) -> String {
    if import_prefix.is_empty() {
        format!("import \"./{}\"", file)
    } else {
        format!("import \"{}/{}\"", import_prefix, file)
    }
}

/// Relative path from directory `from` to directory `to`, `/`-separated
fn relative_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    parts.join("/")
}

/// Report of what was generated
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub examples: usize,
    pub categories: usize,
    pub entries_written: usize,
    pub pages_written: usize,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} examples in {} categories ({} entry modules, {} pages, 1 manifest)",
            self.examples, self.categories, self.entries_written, self.pages_written
        )
    }

    /// Files in the workspace after the run, manifest included
    pub fn files_written(&self) -> usize {
        self.entries_written + self.pages_written + 1
    }
}
