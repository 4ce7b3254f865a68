#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ModuleDescriptor construction

#[test]
fn ModuleDescriptor___new___applies_default_baselines() {
    let descriptor = ModuleDescriptor::new("com.example.mod", "Example", "1.0.0");

    assert_eq!(descriptor.required_platform_version, "8.1.45");
    assert_eq!(descriptor.required_framework_version, "8");
    assert!(descriptor.description.is_none());
    assert!(descriptor.archives.is_empty());
}

#[test]
fn ModuleDescriptor___entries___selects_collection_by_kind() {
    let mut descriptor = ModuleDescriptor::new("id", "Name", "1.0.0");
    descriptor.archives = vec![ScopedEntry::new("a.jar", Some("G"))];
    descriptor.entry_points = vec![
        ScopedEntry::new("com.example.A", Some("G")),
        ScopedEntry::new("com.example.B", Some("C")),
    ];

    assert_eq!(descriptor.entries(EntryKind::Archive).len(), 1);
    assert_eq!(descriptor.entries(EntryKind::EntryPoint).len(), 2);
    assert!(descriptor.entries(EntryKind::Dependency).is_empty());
}

// Required field validation

#[test]
fn ModuleDescriptor___validate___accepts_complete_descriptor() {
    let descriptor = ModuleDescriptor::new("com.example.mod", "Example", "1.0.0");

    assert!(descriptor.validate().is_ok());
}

#[test_case("", "Name", "1.0.0", RequiredField::Id ; "empty id")]
#[test_case("   ", "Name", "1.0.0", RequiredField::Id ; "blank id")]
#[test_case("id", "", "1.0.0", RequiredField::Name ; "empty name")]
#[test_case("id", "\t\n", "1.0.0", RequiredField::Name ; "blank name")]
#[test_case("id", "Name", "", RequiredField::Version ; "empty version")]
#[test_case("id", "Name", " ", RequiredField::Version ; "blank version")]
#[test_case("", "", "", RequiredField::Id ; "all missing reports id first")]
fn ModuleDescriptor___validate___rejects_missing_field(
    id: &str,
    name: &str,
    version: &str,
    expected: RequiredField,
) {
    let descriptor = ModuleDescriptor::new(id, name, version);

    let err = descriptor.validate().unwrap_err();

    match err {
        BundleError::MissingRequiredField(field) => assert_eq!(field, expected),
        other => panic!("unexpected error: {other}"),
    }
}

#[test_case("" ; "empty")]
#[test_case("  " ; "spaces")]
#[test_case("\t" ; "tab")]
fn ModuleDescriptor___validate___rejects_blank_archive_path(path: &str) {
    let mut descriptor = ModuleDescriptor::new("id", "Name", "1.0.0");
    descriptor.archives = vec![
        ScopedEntry::new("libs/a.jar", Some("G")),
        ScopedEntry::new(path, Some("G")),
    ];

    let err = descriptor.validate().unwrap_err();

    assert!(matches!(err, BundleError::EmptyArchivePath { index: 1 }), "{err}");
}

#[test]
fn ModuleDescriptor___validate___required_fields_checked_before_archives() {
    let mut descriptor = ModuleDescriptor::new("id", "", "1.0.0");
    descriptor.archives = vec![ScopedEntry::new(" ", None::<&str>)];

    assert!(matches!(
        descriptor.validate(),
        Err(BundleError::MissingRequiredField(RequiredField::Name))
    ));
}

// XML character validation

#[test_case('\u{7}' ; "bell")]
#[test_case('\u{0}' ; "nul")]
#[test_case('\u{1B}' ; "escape")]
#[test_case('\u{FFFE}' ; "non character fffe")]
#[test_case('\u{FFFF}' ; "non character ffff")]
fn ModuleDescriptor___validate___rejects_character_outside_xml(character: char) {
    let mut descriptor = ModuleDescriptor::new("id", "Name", "1.0.0");
    descriptor.description = Some(format!("bad{character}text"));

    let err = descriptor.validate().unwrap_err();

    match err {
        BundleError::InvalidCharacter { field, character: found } => {
            assert_eq!(field, "description");
            assert_eq!(found, character);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ModuleDescriptor___validate___names_offending_entry() {
    let mut descriptor = ModuleDescriptor::new("id", "Name", "1.0.0");
    descriptor.entry_points = vec![
        ScopedEntry::new("com.example.Hook", Some("G")),
        ScopedEntry::new("com.example.\u{8}Hook", Some("G")),
    ];

    let err = descriptor.validate().unwrap_err();

    assert!(matches!(
        err,
        BundleError::InvalidCharacter { ref field, .. } if field == "hook[1]"
    ));
}

#[test]
fn ModuleDescriptor___validate___accepts_whitespace_and_unicode() {
    let mut descriptor = ModuleDescriptor::new("id", "Modul \u{e9}\u{1F600}", "1.0.0");
    descriptor.description = Some("line one\r\n\tline two & <three>".to_string());

    assert!(descriptor.validate().is_ok());
}

// Entry kinds

#[test_case(EntryKind::Archive, "jar", "jar")]
#[test_case(EntryKind::EntryPoint, "hook", "hook")]
#[test_case(EntryKind::Dependency, "depends", "dependency")]
fn EntryKind___names___match_manifest_schema(kind: EntryKind, element: &str, label: &str) {
    assert_eq!(kind.element(), element);
    assert_eq!(kind.label(), label);
    assert_eq!(EntryKind::from_element(element), Some(kind));
}

#[test]
fn EntryKind___from_element___unknown_returns_none() {
    assert_eq!(EntryKind::from_element("module"), None);
}

#[test]
fn EntryKind___text___strips_directories_for_archives_only() {
    let entry = ScopedEntry::new("build/libs/gateway.jar", Some("G"));

    assert_eq!(EntryKind::Archive.text(&entry), "gateway.jar");
    assert_eq!(EntryKind::EntryPoint.text(&entry), "build/libs/gateway.jar");
    assert_eq!(EntryKind::Dependency.text(&entry), "build/libs/gateway.jar");
}

// file_name normalization

#[test_case("gateway.jar", "gateway.jar" ; "bare name")]
#[test_case("libs/gateway.jar", "gateway.jar" ; "one directory")]
#[test_case("a/b/c/d/gateway.jar", "gateway.jar" ; "deep path")]
#[test_case("/abs/path/gateway.jar", "gateway.jar" ; "absolute unix")]
#[test_case(r"build\libs\gateway.jar", "gateway.jar" ; "windows separators")]
#[test_case(r"C:\work\mod/libs\gateway.jar", "gateway.jar" ; "mixed separators")]
#[test_case("libs/gateway.jar/", "gateway.jar" ; "trailing separator")]
#[test_case("./gateway.jar", "gateway.jar" ; "dot prefix")]
fn file_name___returns_basename(path: &str, expected: &str) {
    assert_eq!(file_name(path), expected);
}

// Deserialization from configuration

#[test]
fn ModuleDescriptor___deserialize___fills_defaults() {
    let toml = r#"
id = "com.example.mod"
name = "Example"
version = "1.2.3"
"#;

    let descriptor: ModuleDescriptor = toml::from_str(toml).unwrap();

    assert_eq!(descriptor.required_platform_version, DEFAULT_PLATFORM_VERSION);
    assert_eq!(
        descriptor.required_framework_version,
        DEFAULT_FRAMEWORK_VERSION
    );
    assert!(descriptor.license.is_none());
    assert!(descriptor.dependencies.is_empty());
}

#[test]
fn ModuleDescriptor___deserialize___reads_scoped_entries_with_aliases() {
    let toml = r#"
id = "com.example.mod"
name = "Example"
version = "1.2.3"
required_platform_version = "8.1.0"

[[archives]]
path = "gateway/build/gateway.jar"
scope = "G"

[[archives]]
path = "client/build/client.jar"

[[entry_points]]
class = "com.example.GatewayHook"
scope = "G"

[[dependencies]]
value = "com.example.other"
scope = "D"
"#;

    let descriptor: ModuleDescriptor = toml::from_str(toml).unwrap();

    assert_eq!(descriptor.required_platform_version, "8.1.0");
    assert_eq!(
        descriptor.archives,
        vec![
            ScopedEntry::new("gateway/build/gateway.jar", Some("G")),
            ScopedEntry::new("client/build/client.jar", None::<&str>),
        ]
    );
    assert_eq!(descriptor.entry_points[0].value, "com.example.GatewayHook");
    assert_eq!(descriptor.dependencies[0].scope.as_deref(), Some("D"));
}

#[test]
fn ModuleDescriptor___deserialize___missing_required_fields_fail_validation() {
    let toml = r#"name = "Example""#;

    let descriptor: ModuleDescriptor = toml::from_str(toml).unwrap();

    assert!(matches!(
        descriptor.validate(),
        Err(BundleError::MissingRequiredField(RequiredField::Id))
    ));
}
