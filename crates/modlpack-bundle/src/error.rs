//! Error types for bundle operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A descriptor field that must be present and non-blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Id,
    Name,
    Version,
}

impl RequiredField {
    /// Field name as it appears in the descriptor.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Version => "version",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during bundle operations.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A required descriptor field is absent or blank.
    #[error("Missing required field: {0}")]
    MissingRequiredField(RequiredField),

    /// An archive entry has a blank path.
    #[error("Archive entry {index} has an empty path")]
    EmptyArchivePath { index: usize },

    /// A descriptor value contains a character XML 1.0 cannot represent.
    #[error("Field {field} contains a character not allowed in XML: U+{:04X}", u32::from(*character))]
    InvalidCharacter { field: String, character: char },

    /// A referenced archive does not resolve to an existing file.
    #[error("Source file not found: {}", path.display())]
    SourceFileNotFound { path: PathBuf },

    /// Two archives would be staged under the same file name.
    #[error("Duplicate archive name {name}: {first} and {second}")]
    DuplicateArchiveName {
        name: String,
        first: String,
        second: String,
    },

    /// Staging or compression failed; `source` carries the cause.
    #[error("Failed to package bundle {}: {source}", output.display())]
    Packaging {
        output: PathBuf,
        #[source]
        source: Box<BundleError>,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Manifest could not be interpreted.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Missing required file in bundle.
    #[error("Missing required file: {0}")]
    MissingFile(String),
}

impl BundleError {
    /// Wrap `self` as the cause of a packaging failure for `output`.
    ///
    /// Validation errors and already-wrapped errors are returned unchanged.
    pub(crate) fn into_packaging(self, output: PathBuf) -> Self {
        match self {
            Self::MissingRequiredField(_)
            | Self::EmptyArchivePath { .. }
            | Self::InvalidCharacter { .. }
            | Self::Packaging { .. } => self,
            other => Self::Packaging {
                output,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error in a packaging chain.
    #[must_use]
    pub fn root_cause(&self) -> &BundleError {
        match self {
            Self::Packaging { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
