use crate::bundler::BundlerConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "playground.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playground: PlaygroundConfig,
    #[serde(flatten)]
    pub bundler: BundlerConfig,
}

/// Where examples are read from and where the workspace is generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Page template; the built-in iframe page when unset
    pub template: Option<PathBuf>,
    /// Example file extension, without the leading dot
    pub extension: String,
    /// Manifest file name inside the output directory
    pub manifest_file: String,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("playground"),
            output_dir: PathBuf::from("playground/.dev/mpa"),
            template: None,
            extension: "ts".to_string(),
            manifest_file: ".demoList.json".to_string(),
        }
    }
}

impl PlaygroundConfig {
    /// Check that the manifest lands in its own file inside the workspace.
    ///
    /// Entry modules end in `.<extension>` and pages in `.html`; a manifest
    /// with either suffix could overwrite one of them.
    pub fn validate_manifest_file(&self) -> Result<()> {
        let name = self.manifest_file.as_str();
        if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
            return Err(Error::config_validation(
                "manifest_file must be a bare file name",
            ));
        }

        let lower = name.to_ascii_lowercase();
        for suffix in [".html".to_string(), format!(".{}", self.extension.to_ascii_lowercase())] {
            if lower.ends_with(&suffix) {
                return Err(Error::config_validation(format!(
                    "manifest_file {} would collide with generated {} files",
                    name, suffix
                )));
            }
        }

        Ok(())
    }
}

/// CLI overrides, applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub extension: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_open: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::filesystem("read", path, e))?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, overrides: CliOverrides) {
        if let Some(source) = overrides.source {
            self.playground.source_dir = source;
        }

        if let Some(output) = overrides.output {
            self.playground.output_dir = output;
        }

        if let Some(template) = overrides.template {
            self.playground.template = Some(template);
        }

        if let Some(ext) = overrides.extension {
            self.playground.extension = ext.trim_start_matches('.').to_string();
        }

        if let Some(host) = overrides.host {
            self.bundler.server.host = host;
        }

        if let Some(port) = overrides.port {
            self.bundler.server.port = port;
        }

        if overrides.no_open {
            self.bundler.server.open = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playground = &self.playground;

        if playground.extension.is_empty() {
            return Err(Error::config_validation("extension must not be empty"));
        }

        if playground.extension.starts_with('.') {
            return Err(Error::config_validation(
                "extension must be given without a leading dot",
            ));
        }

        if playground.extension == "html" {
            return Err(Error::config_validation(
                "extension html collides with the generated pages",
            ));
        }

        playground.validate_manifest_file()?;

        if playground.output_dir == playground.source_dir {
            return Err(Error::config_validation(
                "output_dir must differ from source_dir",
            ));
        }

        self.bundler.validate()
    }
}
