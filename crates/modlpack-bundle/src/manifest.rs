//! `module.xml` generation and parsing.
//!
//! The manifest has a fixed shape:
//!
//! ```text
//! <modules>
//!   <module>
//!     <id/> <name/> <description/>? <version/>
//!     <requiredignitionversion/> <requiredframeworkversion/>
//!     <license/>? <documentation/>?
//!     <jar scope=".."/>* <hook scope=".."/>* <depends scope=".."/>*
//!   </module>
//! </modules>
//! ```
//!
//! Optional elements are omitted entirely when the field is `None`, and the
//! `scope` attribute is written only for entries that carry one.

use crate::descriptor::{EntryKind, ModuleDescriptor, ScopedEntry};
use crate::{BundleError, BundleResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs;
use std::path::Path;

const ROOT_ELEMENT: &str = "modules";
const MODULE_ELEMENT: &str = "module";
const SCOPE_ATTRIBUTE: &str = "scope";
const PLATFORM_VERSION_ELEMENT: &str = "requiredignitionversion";
const FRAMEWORK_VERSION_ELEMENT: &str = "requiredframeworkversion";

/// Render a descriptor as a UTF-8 `module.xml` document.
///
/// Fails before producing any output when [`ModuleDescriptor::validate`]
/// rejects the descriptor: a blank `id`, `name` or `version`, a blank archive
/// path, or a character XML 1.0 does not allow. Equal descriptors always
/// produce byte-identical documents.
pub fn generate(descriptor: &ModuleDescriptor) -> BundleResult<Vec<u8>> {
    descriptor.validate()?;

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
    writer.write_event(Event::Start(BytesStart::new(MODULE_ELEMENT)))?;

    write_text_element(&mut writer, "id", &descriptor.id)?;
    write_text_element(&mut writer, "name", &descriptor.name)?;
    if let Some(description) = &descriptor.description {
        write_text_element(&mut writer, "description", description)?;
    }
    write_text_element(&mut writer, "version", &descriptor.version)?;
    write_text_element(
        &mut writer,
        PLATFORM_VERSION_ELEMENT,
        &descriptor.required_platform_version,
    )?;
    write_text_element(
        &mut writer,
        FRAMEWORK_VERSION_ELEMENT,
        &descriptor.required_framework_version,
    )?;
    if let Some(license) = &descriptor.license {
        write_text_element(&mut writer, "license", license)?;
    }
    if let Some(documentation) = &descriptor.documentation {
        write_text_element(&mut writer, "documentation", documentation)?;
    }

    for kind in EntryKind::ALL {
        for entry in descriptor.entries(kind) {
            write_scoped_element(&mut writer, kind, entry)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(MODULE_ELEMENT)))?;
    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    Ok(xml)
}

/// Generate the manifest and write it to `path`.
///
/// The document is fully rendered before the file is touched; an existing
/// file at `path` is truncated, never appended to.
pub fn write_manifest<P: AsRef<Path>>(descriptor: &ModuleDescriptor, path: P) -> BundleResult<()> {
    let xml = generate(descriptor)?;
    fs::write(path.as_ref(), xml)?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> BundleResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_scoped_element(
    writer: &mut Writer<Vec<u8>>,
    kind: EntryKind,
    entry: &ScopedEntry,
) -> BundleResult<()> {
    let mut start = BytesStart::new(kind.element());
    if let Some(scope) = &entry.scope {
        start.push_attribute((SCOPE_ATTRIBUTE, scope.as_str()));
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(kind.text(entry))))?;
    writer.write_event(Event::End(BytesEnd::new(kind.element())))?;
    Ok(())
}

/// Parse a `module.xml` document back into a descriptor.
///
/// Archive entries come back as bare file names since that is all the
/// manifest records. Unknown child elements are skipped.
pub fn parse(xml: &str) -> BundleResult<ModuleDescriptor> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut descriptor = ModuleDescriptor::new("", "", "");
    let mut open: Vec<String> = Vec::new();
    let mut saw_module = false;
    let mut text = String::new();
    let mut scope: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = element_name(&start);
                check_nesting(open.len(), &name)?;
                if open.len() == 1 {
                    saw_module = true;
                }
                scope = scope_attribute(&start)?;
                text.clear();
                open.push(name);
            }
            Event::Empty(start) => {
                let name = element_name(&start);
                check_nesting(open.len(), &name)?;
                if open.len() == 2 {
                    let scope = scope_attribute(&start)?;
                    assign(&mut descriptor, &name, String::new(), scope);
                } else if open.len() == 1 {
                    saw_module = true;
                }
            }
            Event::Text(content) => text.push_str(&content.unescape()?),
            Event::End(_) => {
                let Some(name) = open.pop() else {
                    return Err(BundleError::InvalidManifest(
                        "unbalanced closing tag".to_string(),
                    ));
                };
                if open.len() == 2 {
                    assign(&mut descriptor, &name, std::mem::take(&mut text), scope.take());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_module {
        return Err(BundleError::InvalidManifest(format!(
            "missing <{MODULE_ELEMENT}> element"
        )));
    }

    descriptor
        .validate()
        .map_err(|e| BundleError::InvalidManifest(e.to_string()))?;

    Ok(descriptor)
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn check_nesting(depth: usize, name: &str) -> BundleResult<()> {
    let expected = match depth {
        0 => ROOT_ELEMENT,
        1 => MODULE_ELEMENT,
        _ => return Ok(()),
    };
    if name == expected {
        Ok(())
    } else {
        Err(BundleError::InvalidManifest(format!(
            "expected <{expected}>, found <{name}>"
        )))
    }
}

fn scope_attribute(start: &BytesStart<'_>) -> BundleResult<Option<String>> {
    let attribute = start
        .try_get_attribute(SCOPE_ATTRIBUTE)
        .map_err(quick_xml::Error::from)?;
    match attribute {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn assign(descriptor: &mut ModuleDescriptor, element: &str, text: String, scope: Option<String>) {
    match element {
        "id" => descriptor.id = text,
        "name" => descriptor.name = text,
        "description" => descriptor.description = Some(text),
        "version" => descriptor.version = text,
        PLATFORM_VERSION_ELEMENT => descriptor.required_platform_version = text,
        FRAMEWORK_VERSION_ELEMENT => descriptor.required_framework_version = text,
        "license" => descriptor.license = Some(text),
        "documentation" => descriptor.documentation = Some(text),
        other => match EntryKind::from_element(other) {
            Some(kind) => descriptor.entries_mut(kind).push(ScopedEntry { value: text, scope }),
            None => tracing::debug!(element = other, "skipping unknown manifest element"),
        },
    }
}
