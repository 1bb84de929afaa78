//! Rich-text DOM node types as delivered by the upstream API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A node in the upstream's rich-text DOM.
///
/// The upstream serializes description markup as a recursive structure
/// where each child is either a bare string or a tagged element:
///
/// ```json
/// {"tag": "p", "children": ["Hello ", {"tag": "b", "children": ["world"]}]}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DomNode {
    /// A raw text value.
    Text(String),

    /// A tagged element with attributes and ordered children.
    Element {
        tag: String,
        #[serde(default)]
        attributes: HashMap<String, AttrValue>,
        #[serde(default)]
        children: Vec<DomNode>,
    },
}

/// An attribute value; the upstream mixes strings and numbers
/// (e.g. `href` is a string, `width` a number).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Num(f64),
}

impl AttrValue {
    /// Borrow the value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            AttrValue::Num(_) => None,
        }
    }

    /// Coerce the value to an integer dimension.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AttrValue::Num(n) => Some(*n as u32),
            AttrValue::Str(s) => s.parse().ok(),
        }
    }
}
