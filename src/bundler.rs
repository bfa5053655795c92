// Bundler and dev-server configuration handed to the host bundler
//
// Declarative only. The generator never interprets these values apart
// from `serve`, which binds to the same host and port.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Packages the playground examples import from the engine family
const ENGINE_PACKAGES: &[&str] = &[
    "@galacean/engine",
    "@galacean/engine-draco",
    "@galacean/engine-lottie",
    "@galacean/engine-spine",
    "@galacean/tools-baker",
    "@galacean/engine-toolkit",
    "@galacean/engine-toolkit-auxiliary-lines",
    "@galacean/engine-toolkit-controls",
    "@galacean/engine-toolkit-framebuffer-picker",
    "@galacean/engine-toolkit-gizmo",
    "@galacean/engine-toolkit-lines",
    "@galacean/engine-toolkit-outline",
    "@galacean/engine-toolkit-planar-shadow-material",
    "@galacean/engine-toolkit-skeleton-viewer",
    "@galacean/engine-toolkit-grid-material",
    "@galacean/engine-toolkit-navigation-gizmo",
    "@galacean/engine-toolkit-geometry-sketch",
    "@galacean/engine-toolkit-stats",
];

/// Configuration object consumed by the bundler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundlerConfig {
    pub server: ServerConfig,
    pub resolve: ResolveConfig,
    pub optimize_deps: OptimizeDepsConfig,
}

/// Dev-server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub open: bool,
    pub host: String,
    pub port: u16,
}

/// Module resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Packages that must resolve to a single shared instance
    pub dedupe: Vec<String>,
}

/// Dependency pre-bundling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeDepsConfig {
    /// Packages left untouched by the pre-optimization pass
    pub exclude: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            open: true,
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            dedupe: vec![ENGINE_PACKAGES[0].to_string()],
        }
    }
}

impl Default for OptimizeDepsConfig {
    fn default() -> Self {
        Self {
            exclude: ENGINE_PACKAGES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl BundlerConfig {
    /// Check that both package lists are non-empty sets of package names
    pub fn validate(&self) -> Result<()> {
        validate_packages("resolve.dedupe", &self.resolve.dedupe)?;
        validate_packages("optimizeDeps.exclude", &self.optimize_deps.exclude)?;

        if self.server.host.trim().is_empty() {
            return Err(Error::config_validation("server.host must not be empty"));
        }

        Ok(())
    }

    /// Render as the JSON object the bundler expects
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Address a browser should be pointed at
    pub fn local_url(&self) -> String {
        let host = match self.server.host.as_str() {
            "0.0.0.0" | "::" => "localhost",
            other => other,
        };
        format!("http://{}:{}", host, self.server.port)
    }
}

fn validate_packages(name: &str, packages: &[String]) -> Result<()> {
    if packages.is_empty() {
        return Err(Error::config_validation(format!("{} must not be empty", name)));
    }

    let mut seen = HashSet::new();
    for package in packages {
        if package.trim().is_empty() || package.chars().any(char::is_whitespace) {
            return Err(Error::config_validation(format!(
                "{} contains an invalid package name: {:?}",
                name, package
            )));
        }
        if !seen.insert(package.as_str()) {
            return Err(Error::config_validation(format!(
                "{} lists {} more than once",
                name, package
            )));
        }
    }

    Ok(())
}
