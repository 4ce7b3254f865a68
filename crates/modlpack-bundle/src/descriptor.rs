//! Module descriptor - the in-memory description of everything to package.

use crate::error::RequiredField;
use crate::{BundleError, BundleResult, DEFAULT_FRAMEWORK_VERSION, DEFAULT_PLATFORM_VERSION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything that goes into a module bundle.
///
/// Constructed once per packaging run from external configuration and
/// treated as immutable input by the manifest generator and assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Globally unique module identifier (e.g., "com.example.my-module").
    #[serde(default)]
    pub id: String,

    /// Human-readable display name.
    #[serde(default)]
    pub name: String,

    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Module version. Opaque to the packager.
    #[serde(default)]
    pub version: String,

    /// Minimum host platform version.
    #[serde(default = "default_platform_version")]
    pub required_platform_version: String,

    /// Minimum framework major version.
    #[serde(default = "default_framework_version")]
    pub required_framework_version: String,

    /// Relative path to the license document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Relative path to the documentation entry page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// Archives to ship, paths relative to the project root.
    #[serde(default)]
    pub archives: Vec<ScopedEntry>,

    /// Fully-qualified hook class names.
    #[serde(default)]
    pub entry_points: Vec<ScopedEntry>,

    /// Ids of modules this module depends on.
    #[serde(default)]
    pub dependencies: Vec<ScopedEntry>,
}

fn default_platform_version() -> String {
    DEFAULT_PLATFORM_VERSION.to_string()
}

fn default_framework_version() -> String {
    DEFAULT_FRAMEWORK_VERSION.to_string()
}

/// A value paired with an optional scope code.
///
/// Shared by archives (value is a path), entry points (a class name) and
/// dependencies (a module id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedEntry {
    #[serde(alias = "path", alias = "class", alias = "module")]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl ScopedEntry {
    pub fn new<V: Into<String>, S: Into<String>>(value: V, scope: Option<S>) -> Self {
        Self {
            value: value.into(),
            scope: scope.map(Into::into),
        }
    }
}

/// Which scoped collection an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Archive,
    EntryPoint,
    Dependency,
}

impl EntryKind {
    /// Collections in manifest order.
    pub const ALL: [EntryKind; 3] = [
        EntryKind::Archive,
        EntryKind::EntryPoint,
        EntryKind::Dependency,
    ];

    /// Element name used in `module.xml`.
    #[must_use]
    pub fn element(&self) -> &'static str {
        match self {
            Self::Archive => "jar",
            Self::EntryPoint => "hook",
            Self::Dependency => "depends",
        }
    }

    /// Name used when reporting problems with an entry.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Archive => "jar",
            Self::EntryPoint => "hook",
            Self::Dependency => "dependency",
        }
    }

    /// Text content written for an entry of this kind.
    ///
    /// Archive paths are reduced to their file name so that no build-time
    /// directory structure ends up in the bundle.
    #[must_use]
    pub fn text<'a>(&self, entry: &'a ScopedEntry) -> &'a str {
        match self {
            Self::Archive => file_name(&entry.value),
            Self::EntryPoint | Self::Dependency => &entry.value,
        }
    }

    /// Parse an element name back into a kind.
    #[must_use]
    pub fn from_element(element: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.element() == element)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ModuleDescriptor {
    /// Create a descriptor with the required fields and default baselines.
    #[must_use]
    pub fn new(id: &str, name: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            version: version.to_string(),
            required_platform_version: default_platform_version(),
            required_framework_version: default_framework_version(),
            license: None,
            documentation: None,
            archives: Vec::new(),
            entry_points: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Entries of one scoped collection.
    #[must_use]
    pub fn entries(&self, kind: EntryKind) -> &[ScopedEntry] {
        match kind {
            EntryKind::Archive => &self.archives,
            EntryKind::EntryPoint => &self.entry_points,
            EntryKind::Dependency => &self.dependencies,
        }
    }

    pub(crate) fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<ScopedEntry> {
        match kind {
            EntryKind::Archive => &mut self.archives,
            EntryKind::EntryPoint => &mut self.entry_points,
            EntryKind::Dependency => &mut self.dependencies,
        }
    }

    /// Check the descriptor before anything is rendered or written.
    ///
    /// `id`, `name` and `version` must be non-blank (checked in that order),
    /// every archive needs a non-blank path, and no value may contain a
    /// character that XML 1.0 cannot carry. The first failure is reported.
    pub fn validate(&self) -> BundleResult<()> {
        let required = [
            (RequiredField::Id, &self.id),
            (RequiredField::Name, &self.name),
            (RequiredField::Version, &self.version),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BundleError::MissingRequiredField(field));
            }
        }

        if let Some(index) = self
            .archives
            .iter()
            .position(|archive| archive.value.trim().is_empty())
        {
            return Err(BundleError::EmptyArchivePath { index });
        }

        self.check_characters()
    }

    fn check_characters(&self) -> BundleResult<()> {
        let mut fields: Vec<(String, &str)> = vec![
            ("id".to_string(), self.id.as_str()),
            ("name".to_string(), self.name.as_str()),
            ("version".to_string(), self.version.as_str()),
            (
                "required_platform_version".to_string(),
                self.required_platform_version.as_str(),
            ),
            (
                "required_framework_version".to_string(),
                self.required_framework_version.as_str(),
            ),
        ];
        let optional = [
            ("description", &self.description),
            ("license", &self.license),
            ("documentation", &self.documentation),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                fields.push((field.to_string(), value.as_str()));
            }
        }
        for kind in EntryKind::ALL {
            for (index, entry) in self.entries(kind).iter().enumerate() {
                fields.push((format!("{kind}[{index}]"), entry.value.as_str()));
                if let Some(scope) = &entry.scope {
                    fields.push((format!("{kind}[{index}].scope"), scope.as_str()));
                }
            }
        }

        for (field, value) in fields {
            if let Some(character) = value.chars().find(|&c| !is_xml_char(c)) {
                return Err(BundleError::InvalidCharacter { field, character });
            }
        }

        Ok(())
    }
}

/// Whether `c` is in the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Final component of a path, treating both `/` and `\` as separators.
///
/// Returns the input unchanged when it has no separator. Trailing separators
/// are ignored, so `libs/a.jar/` yields `a.jar`.
#[must_use]
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
#[path = "descriptor/descriptor_tests.rs"]
mod descriptor_tests;
