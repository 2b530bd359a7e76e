//! Document access
//!
//! Feature extraction never touches a live browser. It queries a
//! `DocumentView`, a read-only capability over the parsed page. The embedder
//! supplies one; `PageSnapshot` is the owned, serde-friendly implementation
//! used by the relay API and the tests.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One element of the parsed page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Lower-case tag name (`a`, `img`, `script`, `link`, `form`, `iframe`)
    #[serde(deserialize_with = "lowercase_tag")]
    pub tag: String,
    /// Attribute values as written in the markup, keyed by lower-case name
    #[serde(default, deserialize_with = "lowercase_keys")]
    pub attributes: HashMap<String, String>,
}

fn lowercase_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|tag| tag.to_ascii_lowercase())
}

// HTML attribute names are case-insensitive
fn lowercase_keys<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect())
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn attr_set(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Read-only queries over a parsed document
pub trait DocumentView {
    /// Elements with the given lower-case tag name, in document order
    fn elements(&self, tag: &str) -> Vec<&Element>;

    /// First `link` whose `rel` contains "shortcut icon", ignoring ASCII case
    fn favicon(&self) -> Option<&Element> {
        self.elements("link").into_iter().find(|el| {
            el.attr("rel")
                .map(|rel| rel.to_ascii_lowercase().contains("shortcut icon"))
                .unwrap_or(false)
        })
    }
}

/// Owned snapshot of a document's elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl PageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element (builder style)
    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }
}

impl DocumentView for PageSnapshot {
    fn elements(&self, tag: &str) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|el| el.tag.eq_ignore_ascii_case(tag))
            .collect()
    }
}
