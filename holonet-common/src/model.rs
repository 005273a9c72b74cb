//! Resource data model shared by the aggregator
//!
//! Items are kept close to the upstream JSON: the handful of attributes the
//! aggregator reasons about (`id`, `url`, `name`) are typed, everything else
//! rides along untouched in `fields`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Resource collections served by the remote source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Planets,
    People,
}

impl ResourceKind {
    /// Path segment of the collection on the remote source
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Planets => "planets",
            ResourceKind::People => "people",
        }
    }

    /// Collection root URL for a given API base (`{base}/{path}`)
    pub fn root_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A record from the remote source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Numeric id, assigned once when the item enters a cache bucket
    #[serde(default)]
    pub id: u64,
    /// Canonical URL, ends in `/{type}/{id}/`
    pub url: String,
    #[serde(default)]
    pub name: String,
    /// All remaining upstream attributes
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Look up an attribute by name, including the typed ones
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "url" => Some(Value::from(self.url.as_str())),
            "name" => Some(Value::from(self.name.as_str())),
            other => self.fields.get(other).cloned(),
        }
    }

    /// Homeworld reference of a person
    pub fn homeworld(&self) -> Option<&str> {
        self.fields.get("homeworld").and_then(Value::as_str)
    }
}

/// One page of a collection as returned by the remote source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Total item count across all pages
    pub count: u64,
    pub results: Vec<Item>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl Page {
    /// Decode a page payload, reporting missing `count`/`results` as a shape error
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::UnexpectedShape(format!("invalid page payload: {}", e)))
    }
}

/// Derive the numeric id of an item from its canonical URL
///
/// Strips the collection root and every path separator, then parses the
/// remainder. URLs that do not start with `root_url` (mirrors, relative
/// references) fall back to their trailing path segment.
///
/// ```
/// use holonet_common::derive_id;
///
/// let root = "https://swapi.py4e.com/api/planets";
/// assert_eq!(derive_id(root, "https://swapi.py4e.com/api/planets/4/"), Some(4));
/// assert_eq!(derive_id(root, "/people/12/"), Some(12));
/// assert_eq!(derive_id(root, "https://swapi.py4e.com/api/planets/"), None);
/// ```
pub fn derive_id(root_url: &str, url: &str) -> Option<u64> {
    if let Some(rest) = url.strip_prefix(root_url) {
        let digits: String = rest.chars().filter(|c| *c != '/').collect();
        if let Ok(id) = digits.parse() {
            return Some(id);
        }
    }

    trailing_id(url)
}

/// Numeric id in the last non-empty path segment of `url`
///
/// Host-independent, so references into a mirror of the collection still
/// resolve.
pub fn trailing_id(url: &str) -> Option<u64> {
    url.split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .and_then(|segment| segment.parse().ok())
}
