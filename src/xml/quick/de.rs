//! Deserialization helpers for quick-xml.
//!
//! Provides:
//! - `Attrs`: typed attribute map with convenient getters
//! - `skip_element`: subtree skipping for elements we do not read

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::xml::deserialize::DeserializeError;

/// A parsed attribute map that owns decoded string values.
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    map: HashMap<String, String>,
    /// The element name for error messages
    element_name: String,
}

impl Attrs {
    /// Parse attributes from a `BytesStart` event.
    ///
    /// This decodes and unescapes all attribute values once, storing them in a HashMap.
    pub fn from_start<R: BufRead>(
        start: &BytesStart<'_>,
        reader: &Reader<R>,
    ) -> Result<Self, DeserializeError> {
        let element_name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut map = HashMap::new();

        for attr_result in start.attributes() {
            let attr = attr_result?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.decode_and_unescape_value(reader)?.to_string();
            map.insert(key, value);
        }

        Ok(Self { map, element_name })
    }

    /// Get the element name this Attrs was parsed from.
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Get an optional string attribute.
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    /// Get a required string attribute, returning an error if missing.
    pub fn get_req(&self, key: &str) -> Result<&str, DeserializeError> {
        self.map
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| DeserializeError::MissingField(format!("{}@{}", self.element_name, key)))
    }
}

/// Parse a CopasiML boolean: `0`/`1` as written, `true`/`false` as accepted.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Skip an entire element subtree, consuming all nested content until the matching end tag.
///
/// Call this when you've just consumed a `Start` event and want to skip everything
/// inside it (including nested elements) until the corresponding `End` event.
pub fn skip_element<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
    tag_name: &[u8],
) -> Result<(), DeserializeError> {
    let mut depth = 1u32;

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(_) => depth += 1,
            Event::End(e) => {
                depth -= 1;
                if depth == 0 && e.name().as_ref() == tag_name {
                    break;
                }
            }
            Event::Eof => {
                return Err(DeserializeError::UnexpectedEof);
            }
            // Text, CData, Comment, PI, Empty, Decl - just consume and continue
            _ => {}
        }
    }

    Ok(())
}
