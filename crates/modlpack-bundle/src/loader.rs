//! Bundle loading utilities.
//!
//! The [`BundleLoader`] opens a `.modl` bundle, parses its `module.xml` and
//! gives access to the packaged files.

use crate::descriptor::ModuleDescriptor;
use crate::{BundleError, BundleResult, MANIFEST_FILE, manifest};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Loader for module bundles.
///
/// # Example
///
/// ```no_run
/// use modlpack_bundle::BundleLoader;
///
/// let mut loader = BundleLoader::open("build/modules/my-module-1.0.0.modl")?;
/// println!("{} v{}", loader.descriptor().name, loader.descriptor().version);
///
/// for entry in loader.entries()? {
///     println!("{} ({} bytes)", entry.name, entry.size);
/// }
/// # Ok::<(), modlpack_bundle::BundleError>(())
/// ```
#[derive(Debug)]
pub struct BundleLoader {
    archive: ZipArchive<File>,
    manifest_xml: String,
    descriptor: ModuleDescriptor,
}

/// A file stored in a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Name of the entry inside the bundle.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Hex-encoded SHA256 of the uncompressed contents.
    pub sha256: String,
}

impl BundleLoader {
    /// Open a bundle file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        let file = File::open(path.as_ref())?;
        let mut archive = ZipArchive::new(file)?;

        let manifest_xml = {
            let mut manifest_file = archive.by_name(MANIFEST_FILE).map_err(|_| {
                BundleError::MissingFile(format!("{MANIFEST_FILE} not found in bundle"))
            })?;

            let mut xml = String::new();
            manifest_file.read_to_string(&mut xml)?;
            xml
        };

        let descriptor = manifest::parse(&manifest_xml)?;

        Ok(Self {
            archive,
            manifest_xml,
            descriptor,
        })
    }

    /// The descriptor recovered from `module.xml`.
    #[must_use]
    pub fn descriptor(&self) -> &ModuleDescriptor {
        &self.descriptor
    }

    /// Raw `module.xml` text.
    #[must_use]
    pub fn manifest_xml(&self) -> &str {
        &self.manifest_xml
    }

    /// Names of all files in the bundle, in archive order.
    #[must_use]
    pub fn list_files(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Read a file from the bundle.
    pub fn read_file(&mut self, name: &str) -> BundleResult<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| BundleError::MissingFile(name.to_string()))?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Describe every file in the bundle, in archive order.
    pub fn entries(&mut self) -> BundleResult<Vec<BundleEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index)?;
            let name = file.name().to_string();

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            entries.push(BundleEntry {
                name,
                size: contents.len() as u64,
                sha256: compute_sha256(&contents),
            });
        }
        Ok(entries)
    }

    /// Names of archive entries declared in the manifest that are absent
    /// from the bundle.
    #[must_use]
    pub fn missing_archives(&self) -> Vec<String> {
        let files = self.list_files();
        self.descriptor
            .archives
            .iter()
            .filter(|archive| !files.contains(&archive.value))
            .map(|archive| archive.value.clone())
            .collect()
    }
}

/// Compute SHA256 hash of data and return as hex string.
pub(crate) fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
