//! Bundle commands.
//!
//! Creates `.modl` bundles from a modl.toml project and inspects existing ones.

use crate::project::Project;
use anyhow::{Context, Result};
use modlpack_bundle::{BundleLoader, assemble, manifest};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Run the package command.
pub fn run(config_path: Option<String>, output_dir: Option<String>) -> Result<()> {
    let project = Project::load(config_path)?;
    project.config.validate_project()?;

    let module = &project.config.module;
    println!("Packaging module: {} v{}", module.name, module.version);

    let output_dir = project.output_dir(output_dir.as_deref());
    let output_name = project.config.bundle_file_name();

    let bundle = assemble(module, &project.root, &output_dir, &output_name)
        .with_context(|| format!("Failed to package module {}", module.id))?;

    println!("Bundle created: {}", bundle.display());
    Ok(())
}

/// Render module.xml for a project without packaging it.
pub fn render_manifest(config_path: Option<String>, output: Option<String>) -> Result<()> {
    let project = Project::load(config_path)?;
    let xml = manifest::generate(&project.config.module).context("Failed to generate module.xml")?;

    match output {
        Some(path) => {
            fs::write(Path::new(&path), &xml)
                .with_context(|| format!("Failed to write manifest: {path}"))?;
            println!("Manifest written: {path}");
        }
        None => {
            std::io::stdout()
                .write_all(&xml)
                .context("Failed to write manifest to stdout")?;
        }
    }

    Ok(())
}

/// List contents of a bundle.
pub fn list(bundle_path: &str) -> Result<()> {
    let mut loader = BundleLoader::open(bundle_path)
        .with_context(|| format!("Failed to open: {bundle_path}"))?;

    let module = loader.descriptor().clone();
    println!("Module: {} ({}) v{}", module.name, module.id, module.version);
    if let Some(desc) = &module.description {
        println!("Description: {desc}");
    }
    println!(
        "Requires: platform {}, framework {}",
        module.required_platform_version, module.required_framework_version
    );

    if !module.entry_points.is_empty() {
        println!("\nHooks:");
        for hook in &module.entry_points {
            println!("  [{}] {}", hook.scope.as_deref().unwrap_or("-"), hook.value);
        }
    }

    if !module.dependencies.is_empty() {
        println!("\nDepends on:");
        for dep in &module.dependencies {
            println!("  [{}] {}", dep.scope.as_deref().unwrap_or("-"), dep.value);
        }
    }

    println!("\nFiles:");
    for entry in loader.entries().context("Failed to read bundle entries")? {
        println!("  {} ({} bytes)", entry.name, entry.size);
        println!("    sha256:{}", entry.sha256);
    }

    let missing = loader.missing_archives();
    if !missing.is_empty() {
        anyhow::bail!("Bundle is missing declared archives: {}", missing.join(", "));
    }

    Ok(())
}
