//! Bundle assembly.
//!
//! [`assemble`] turns a [`ModuleDescriptor`] plus the archives it references
//! into a single flat `.modl` container:
//!
//! 1. the descriptor is validated (nothing is written on failure)
//! 2. scopes are checked and problems logged as warnings
//! 3. bundle names are checked for clashes and every archive is resolved
//!    against the project root
//! 4. `module.xml` and the archives are staged in a private temp directory
//! 5. the staging area is compressed into `output_dir/output_name`
//!
//! The container is written to a temporary file next to the destination and
//! renamed into place once complete, so a failed run never leaves a partial
//! bundle and never disturbs a bundle from an earlier run.

use crate::descriptor::{ModuleDescriptor, file_name};
use crate::{BundleError, BundleResult, MANIFEST_FILE, manifest, scope};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// An archive resolved on disk, with the name it gets inside the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StagedArchive {
    name: String,
    source: PathBuf,
}

/// Assemble a module bundle.
///
/// Returns the absolute path of the produced bundle. Descriptor validation
/// errors from [`ModuleDescriptor::validate`] are returned as is; every other failure
/// is wrapped in [`BundleError::Packaging`] with the original error as its
/// source.
pub fn assemble<P, Q>(
    descriptor: &ModuleDescriptor,
    project_root: P,
    output_dir: Q,
    output_name: &str,
) -> BundleResult<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    descriptor.validate()?;
    scope::log_scope_warnings(descriptor);

    let output_dir = output_dir.as_ref();
    let output_path = output_dir.join(output_name);

    package(descriptor, project_root.as_ref(), output_dir, &output_path)
        .map_err(|e| e.into_packaging(output_path.clone()))
}

fn package(
    descriptor: &ModuleDescriptor,
    project_root: &Path,
    output_dir: &Path,
    output_path: &Path,
) -> BundleResult<PathBuf> {
    let archives = resolve_archives(descriptor, project_root)?;

    fs::create_dir_all(output_dir)?;

    let staging = tempfile::Builder::new()
        .prefix("modl-staging-")
        .tempdir()?;
    tracing::debug!(staging = %staging.path().display(), "Created staging directory");

    manifest::write_manifest(descriptor, staging.path().join(MANIFEST_FILE))?;

    let mut staged = vec![MANIFEST_FILE.to_string()];
    for archive in &archives {
        let target = staging.path().join(&archive.name);
        fs::copy(&archive.source, &target).map_err(|e| {
            BundleError::Io(io::Error::new(
                e.kind(),
                format!("Failed to stage {}: {e}", archive.source.display()),
            ))
        })?;
        tracing::debug!(source = %archive.source.display(), name = %archive.name, "Staged archive");
        staged.push(archive.name.clone());
    }

    compress(staging.path(), &staged, output_dir, output_path)?;

    if let Err(e) = staging.close() {
        tracing::warn!(error = %e, "Failed to remove staging directory");
    }

    let bundle = std::path::absolute(output_path)?;
    tracing::info!(bundle = %bundle.display(), "Module bundle created");
    Ok(bundle)
}

/// Names the archives of `descriptor` will have inside the bundle.
///
/// Names follow descriptor order. Fails with
/// [`BundleError::DuplicateArchiveName`] when two archives, or an archive and
/// the manifest, would share a name. Nothing on disk is consulted.
pub fn archive_names(descriptor: &ModuleDescriptor) -> BundleResult<Vec<String>> {
    let mut claimed: HashMap<&str, &str> = HashMap::new();
    claimed.insert(MANIFEST_FILE, MANIFEST_FILE);

    let mut names = Vec::with_capacity(descriptor.archives.len());
    for entry in &descriptor.archives {
        let name = file_name(&entry.value);
        if let Some(first) = claimed.insert(name, &entry.value) {
            return Err(BundleError::DuplicateArchiveName {
                name: name.to_string(),
                first: first.to_string(),
                second: entry.value.clone(),
            });
        }
        names.push(name.to_string());
    }

    Ok(names)
}

/// Resolve each archive against `project_root` and pair it with its bundle name.
///
/// Name collisions are reported before any file is checked; after that the
/// first archive that does not exist fails the run.
fn resolve_archives(
    descriptor: &ModuleDescriptor,
    project_root: &Path,
) -> BundleResult<Vec<StagedArchive>> {
    let names = archive_names(descriptor)?;

    descriptor
        .archives
        .iter()
        .zip(names)
        .map(|(entry, name)| {
            let source = project_root.join(&entry.value);
            if source.is_file() {
                Ok(StagedArchive { name, source })
            } else {
                Err(BundleError::SourceFileNotFound { path: source })
            }
        })
        .collect()
}

/// Zip the named staging files, flat, into `output_path`.
fn compress(
    staging_dir: &Path,
    names: &[String],
    output_dir: &Path,
    output_path: &Path,
) -> BundleResult<()> {
    let mut partial = tempfile::Builder::new()
        .prefix(".modl-")
        .suffix(".partial")
        .tempfile_in(output_dir)?;

    {
        let mut zip = ZipWriter::new(partial.as_file_mut());
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);

        for name in names {
            let mut file = File::open(staging_dir.join(name))?;
            zip.start_file(name.as_str(), options)?;
            io::copy(&mut file, &mut zip)?;
        }

        zip.finish()?;
    }

    partial.as_file().sync_all()?;
    partial.persist(output_path).map_err(|e| e.error)?;
    Ok(())
}
