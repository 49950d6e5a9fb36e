//! Content type map from `[Content_Types].xml`.

use crate::ooxml::opc::error::{OpcError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Content type map for looking up content types by part name or extension.
///
/// Implements the OPC content type discovery algorithm using Default and Override elements
/// from [Content_Types].xml. Uses efficient hash maps for O(1) lookup.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeMap {
    /// Maps lowercase file extensions to default content types
    defaults: HashMap<String, String>,

    /// Maps specific partnames to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Create a new empty content type map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse content types from [Content_Types].xml.
    ///
    /// Uses quick-xml for efficient streaming XML parsing with minimal allocation.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::new();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let (key, is_default) = match e.local_name().as_ref() {
                        b"Default" => (b"Extension".as_slice(), true),
                        b"Override" => (b"PartName".as_slice(), false),
                        _ => {
                            buf.clear();
                            continue;
                        },
                    };

                    let mut name = None;
                    let mut content_type = None;
                    for attr in e.attributes() {
                        let attr = attr?;
                        if attr.key.as_ref() == key {
                            name = Some(attr.unescape_value()?.to_string());
                        } else if attr.key.as_ref() == b"ContentType" {
                            content_type = Some(attr.unescape_value()?.to_string());
                        }
                    }

                    if let (Some(name), Some(ct)) = (name, content_type) {
                        if is_default {
                            map.add_default(name, ct);
                        } else {
                            map.add_override(name, ct);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Add a default content type mapping for a file extension.
    pub fn add_default(&mut self, extension: String, content_type: String) {
        self.defaults.insert(extension.to_lowercase(), content_type);
    }

    /// Add an override content type mapping for a specific partname.
    pub fn add_override(&mut self, partname: String, content_type: String) {
        self.overrides.insert(partname, content_type);
    }

    /// Get the content type for a partname (`/word/document.xml`).
    ///
    /// First checks for an override, then falls back to the default
    /// based on file extension.
    pub fn get(&self, partname: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(partname) {
            return Some(ct);
        }

        let ext = partname
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())?;
        self.defaults.get(&ext).map(String::as_str)
    }

    /// Like [`get`](Self::get), failing for unknown parts.
    pub fn require(&self, partname: &str) -> Result<&str> {
        self.get(partname)
            .ok_or_else(|| OpcError::ContentTypeNotFound(partname.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;

    #[test]
    fn test_content_type_map() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
            <Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
                <Default Extension="xml" ContentType="application/xml"/>
                <Default Extension="PNG" ContentType="image/png"/>
                <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
            </Types>"#;

        let map = ContentTypeMap::from_xml(xml).unwrap();
        assert_eq!(map.get("/word/document.xml"), Some(ct::WML_DOCUMENT_MAIN));
        assert_eq!(map.get("/customXml/item1.xml"), Some("application/xml"));
        assert_eq!(map.get("/word/media/image1.png"), Some("image/png"));
        assert!(map.get("/word/vbaProject.bin").is_none());
        assert!(matches!(
            map.require("/noext"),
            Err(OpcError::ContentTypeNotFound(_))
        ));
    }
}
