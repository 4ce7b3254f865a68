//! Module scopes and scope validation.
//!
//! Every archive, entry point and dependency may name the host subsystem it
//! applies to. Unknown or absent scopes are reported as warnings; they never
//! stop packaging.

use crate::descriptor::{EntryKind, ModuleDescriptor, ScopedEntry};
use std::fmt;

/// Host subsystem an entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Gateway,
    Designer,
    Client,
}

impl Scope {
    /// All valid scopes, in the order they are reported.
    pub const ALL: [Scope; 3] = [Scope::Gateway, Scope::Designer, Scope::Client];

    /// Single-letter scope code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gateway => "G",
            Self::Designer => "D",
            Self::Client => "C",
        }
    }

    /// Parse a scope code. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "G" => Some(Self::Gateway),
            "D" => Some(Self::Designer),
            "C" => Some(Self::Client),
            _ => None,
        }
    }

    /// Comma-separated list of valid codes, e.g. `G, D, C`.
    #[must_use]
    pub fn valid_codes() -> String {
        Self::ALL
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal scope problem on a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeWarning {
    /// The entry names a scope outside the valid set.
    InvalidScope {
        kind: EntryKind,
        entry: String,
        scope: String,
    },
    /// The entry has no scope at all.
    MissingScope { kind: EntryKind, entry: String },
}

impl ScopeWarning {
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::InvalidScope { kind, .. } | Self::MissingScope { kind, .. } => *kind,
        }
    }

    #[must_use]
    pub fn entry(&self) -> &str {
        match self {
            Self::InvalidScope { entry, .. } | Self::MissingScope { entry, .. } => entry,
        }
    }
}

impl fmt::Display for ScopeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScope { kind, entry, scope } => write!(
                f,
                "invalid scope '{scope}' for {} '{entry}', valid scopes are: {}",
                kind.label(),
                Scope::valid_codes()
            ),
            Self::MissingScope { kind, entry } => write!(
                f,
                "no scope set for {} '{entry}', valid scopes are: {}",
                kind.label(),
                Scope::valid_codes()
            ),
        }
    }
}

/// Check a single entry's scope.
#[must_use]
pub fn check_entry(kind: EntryKind, entry: &ScopedEntry) -> Option<ScopeWarning> {
    match entry.scope.as_deref() {
        Some(code) if Scope::parse(code).is_some() => None,
        Some(code) => Some(ScopeWarning::InvalidScope {
            kind,
            entry: entry.value.clone(),
            scope: code.to_string(),
        }),
        None => Some(ScopeWarning::MissingScope {
            kind,
            entry: entry.value.clone(),
        }),
    }
}

/// Collect scope warnings for archives, entry points and dependencies, in
/// that order and in list order within each collection.
#[must_use]
pub fn validate_scopes(descriptor: &ModuleDescriptor) -> Vec<ScopeWarning> {
    EntryKind::ALL
        .iter()
        .flat_map(|&kind| {
            descriptor
                .entries(kind)
                .iter()
                .filter_map(move |entry| check_entry(kind, entry))
        })
        .collect()
}

/// Validate scopes and emit one warning log per problem.
pub fn log_scope_warnings(descriptor: &ModuleDescriptor) -> Vec<ScopeWarning> {
    let warnings = validate_scopes(descriptor);
    for warning in &warnings {
        tracing::warn!(
            kind = warning.kind().label(),
            entry = warning.entry(),
            "{warning}"
        );
    }
    warnings
}
