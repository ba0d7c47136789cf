//! Quick-xml helper utilities for CopasiML (de)serialization.
//!
//! This module provides ergonomic wrappers around quick-xml's low-level APIs
//! to reduce boilerplate in the main serialize/deserialize modules.

pub mod de;
pub mod ser;

pub use de::{Attrs, parse_bool, skip_element};
pub use ser::{AttrList, XmlEmitter};
