//! Project configuration (`modl.toml`) parsing and validation

use anyhow::{Context, Result};
use modlpack_bundle::{
    ModuleDescriptor, ScopeWarning, archive_names, bundle_file_name, validate_scopes,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "modl.toml";

/// Default bundle output directory, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "target/modl";

/// modl.toml structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectSection,
    pub module: ModuleDescriptor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Artifact identifier used to name the bundle file.
    pub artifact_id: String,

    /// Version used in the bundle file name (defaults to `module.version`).
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl ProjectConfig {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse modl.toml")
    }

    /// Version used in the bundle file name.
    pub fn bundle_version(&self) -> &str {
        self.project
            .version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(self.module.version.as_str())
    }

    /// `<artifact_id>-<version>.modl`
    pub fn bundle_file_name(&self) -> String {
        bundle_file_name(&self.project.artifact_id, self.bundle_version())
    }

    /// Check the naming coordinates needed before packaging.
    pub fn validate_project(&self) -> Result<()> {
        if self.project.artifact_id.trim().is_empty() {
            anyhow::bail!("project.artifact_id cannot be empty");
        }
        Ok(())
    }

    /// Full validation: naming coordinates, module fields, scopes.
    ///
    /// Scope problems never fail validation; they are returned for display.
    pub fn validate(&self) -> Result<Vec<ScopeWarning>> {
        self.validate_project()?;
        self.module
            .validate()
            .context("Invalid [module] section")?;
        Ok(validate_scopes(&self.module))
    }
}

/// A configuration together with the directory it was loaded from.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Load `config_path`, or `modl.toml` in the current directory.
    pub fn load(config_path: Option<String>) -> Result<Self> {
        let path = PathBuf::from(config_path.unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()));
        let config = ProjectConfig::from_file(&path)?;

        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { root, config })
    }

    /// Output directory, resolved against the project root.
    ///
    /// An override from the command line is used as given.
    pub fn output_dir(&self, override_dir: Option<&str>) -> PathBuf {
        match override_dir {
            Some(dir) => PathBuf::from(dir),
            None => self.root.join(&self.config.project.output_dir),
        }
    }
}

/// Validate a modl.toml and report what packaging would do.
pub fn check(config_path: Option<String>) -> Result<()> {
    let project = Project::load(config_path)?;
    let warnings = project.config.validate()?;

    let module = &project.config.module;
    println!("Module: {} ({}) v{}", module.name, module.id, module.version);
    println!(
        "  {} archive(s), {} hook(s), {} dependency(ies)",
        module.archives.len(),
        module.entry_points.len(),
        module.dependencies.len()
    );

    archive_names(module).context("Archives cannot be packaged together")?;

    let mut missing = 0;
    for archive in &module.archives {
        let path = project.root.join(&archive.value);
        if !path.is_file() {
            println!("  Missing archive: {}", path.display());
            missing += 1;
        }
    }

    for warning in &warnings {
        println!("  Warning: {warning}");
    }

    println!(
        "Bundle: {}",
        project.output_dir(None).join(project.config.bundle_file_name()).display()
    );

    if missing > 0 {
        anyhow::bail!("{missing} archive(s) not found");
    }

    println!("✓ Configuration is valid");
    Ok(())
}
