//! Module bundle format for modlpack
//!
//! This crate provides the module descriptor, the `module.xml` manifest
//! generator, and the assembler that packs a descriptor and its archives
//! into a `.modl` bundle for the host platform.
//!
//! # Bundle Structure
//!
//! ```text
//! my-module-1.0.0.modl
//! ├── module.xml
//! ├── my-module-gateway.jar
//! ├── my-module-designer.jar
//! └── my-module-client.jar
//! ```
//!
//! Every entry sits at the top level; archives keep only their file name.
//!
//! # Example
//!
//! ```no_run
//! use modlpack_bundle::{ModuleDescriptor, ScopedEntry, assemble, bundle_file_name};
//!
//! let mut descriptor = ModuleDescriptor::new("com.example.my-module", "My Module", "1.0.0");
//! descriptor.archives.push(ScopedEntry::new("gateway/build/libs/gateway.jar", Some("G")));
//! descriptor.entry_points.push(ScopedEntry::new("com.example.GatewayHook", Some("G")));
//!
//! let bundle = assemble(
//!     &descriptor,
//!     ".",
//!     "build/modules",
//!     &bundle_file_name("my-module", "1.0.0"),
//! )?;
//! println!("{}", bundle.display());
//! # Ok::<(), modlpack_bundle::BundleError>(())
//! ```

mod error;

pub mod assembler;
pub mod descriptor;
pub mod loader;
pub mod manifest;
pub mod scope;

pub use assembler::{archive_names, assemble};
pub use descriptor::{EntryKind, ModuleDescriptor, ScopedEntry, file_name};
pub use error::{BundleError, RequiredField};
pub use loader::{BundleEntry, BundleLoader};
pub use scope::{Scope, ScopeWarning, validate_scopes};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Bundle file extension.
pub const BUNDLE_EXTENSION: &str = "modl";

/// Manifest file name within the bundle.
pub const MANIFEST_FILE: &str = "module.xml";

/// Minimum host platform version used when none is configured.
pub const DEFAULT_PLATFORM_VERSION: &str = "8.1.45";

/// Minimum framework major version used when none is configured.
pub const DEFAULT_FRAMEWORK_VERSION: &str = "8";

/// Conventional bundle file name: `<artifact_id>-<version>.modl`.
#[must_use]
pub fn bundle_file_name(artifact_id: &str, version: &str) -> String {
    format!("{artifact_id}-{version}.{BUNDLE_EXTENSION}")
}
