//! Serialization helpers for quick-xml.
//!
//! Provides:
//! - `AttrList`: attribute builder that owns formatted values
//! - `XmlEmitter`: convenient element writing helpers

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::xml::serialize::SerializeError;

/// A list of attributes with owned values.
///
/// This avoids the lifetime issues with quick-xml's `ElementWriter::with_attribute`
/// by owning all formatted string values until the element is written.
#[derive(Debug, Default)]
pub struct AttrList {
    /// Stored as (key, value) pairs where both are owned strings.
    attrs: Vec<(String, String)>,
}

impl AttrList {
    /// Create a new empty attribute list.
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    /// Add a required string attribute.
    pub fn add(&mut self, key: &str, value: impl AsRef<str>) -> &mut Self {
        self.attrs
            .push((key.to_string(), value.as_ref().to_string()));
        self
    }

    /// Add a numeric attribute (f64).
    ///
    /// Uses the shortest representation that reads back to the same value.
    pub fn add_f64(&mut self, key: &str, value: f64) -> &mut Self {
        self.attrs.push((key.to_string(), format!("{}", value)));
        self
    }

    /// Add a u32 attribute.
    pub fn add_u32(&mut self, key: &str, value: u32) -> &mut Self {
        self.attrs.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a bool attribute in CopasiML form (`0`/`1`).
    pub fn add_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.attrs
            .push((key.to_string(), if value { "1" } else { "0" }.to_string()));
        self
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Get the number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Apply all attributes to a BytesStart element.
    pub fn apply_to(&self, start: &mut BytesStart<'_>) {
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }
    }
}

/// A helper for writing XML elements with less boilerplate.
pub struct XmlEmitter<'a, W: Write> {
    writer: &'a mut Writer<W>,
}

impl<'a, W: Write> XmlEmitter<'a, W> {
    /// Create a new emitter wrapping a writer.
    pub fn new(writer: &'a mut Writer<W>) -> Self {
        Self { writer }
    }

    /// Write an XML declaration.
    pub fn xml_decl(&mut self) -> Result<(), SerializeError> {
        let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
        self.writer.write_event(Event::Decl(decl))?;
        Ok(())
    }

    /// Write an empty element with attributes: `<name attr="value"/>`.
    pub fn empty_elem_with_attrs(
        &mut self,
        name: &str,
        attrs: &AttrList,
    ) -> Result<(), SerializeError> {
        let mut start = BytesStart::new(name);
        attrs.apply_to(&mut start);
        self.writer.write_event(Event::Empty(start))?;
        Ok(())
    }

    /// Write a start element event.
    pub fn write_start(&mut self, name: &str) -> Result<(), SerializeError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    /// Write an end element event.
    pub fn write_end(&mut self, name: &str) -> Result<(), SerializeError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}
