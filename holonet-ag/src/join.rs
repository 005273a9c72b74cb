//! Planet/people join
//!
//! Residency references are URLs into the people collection. Enrichment
//! replaces them with display names, recomputed on every call from whatever
//! snapshots the caller passes in.

use holonet_common::{trailing_id, Item};
use serde_json::Value;
use std::collections::HashMap;

use crate::cache::Snapshot;

/// Placeholder for references that do not resolve
pub const UNKNOWN: &str = "unknown";

/// Canonical URL → display name
pub struct NameIndex<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> NameIndex<'a> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        Self {
            names: items
                .into_iter()
                .map(|item| (item.url.as_str(), item.name.as_str()))
                .collect(),
        }
    }

    /// Name behind `reference`, or `None` if unresolved or unnamed
    pub fn resolve(&self, reference: &str) -> Option<&'a str> {
        self.names
            .get(reference)
            .copied()
            .filter(|name| !name.is_empty())
    }

    pub fn resolve_or_unknown(&self, reference: &str) -> &'a str {
        self.resolve(reference).unwrap_or(UNKNOWN)
    }
}

/// Copy of `planet` with `residents` mapped to names
///
/// The list keeps its length: entries that are not URL strings map to
/// [`UNKNOWN`] like any other unresolved reference.
pub fn enrich_planet(planet: &Item, people: &NameIndex<'_>) -> Item {
    let mut view = planet.clone();
    if let Some(Value::Array(references)) = view.fields.get_mut("residents") {
        for reference in references.iter_mut() {
            let name = reference
                .as_str()
                .map_or(UNKNOWN, |url| people.resolve_or_unknown(url));
            *reference = Value::from(name);
        }
    }
    view
}

/// Enriched views of every planet, in snapshot order
pub fn enrich_planets_with_resident_names<'a, P, Q>(planets: P, people: Q) -> Vec<Item>
where
    P: IntoIterator<Item = &'a Item>,
    Q: IntoIterator<Item = &'a Item>,
{
    let index = NameIndex::new(people);
    planets
        .into_iter()
        .map(|planet| enrich_planet(planet, &index))
        .collect()
}

/// Display name of a person's homeworld
///
/// The reference is matched by its trailing id, not by the full URL, so a
/// homeworld pointing at another host still finds the cached planet.
pub fn homeworld_name(person: &Item, planets: &Snapshot) -> String {
    person
        .homeworld()
        .and_then(trailing_id)
        .and_then(|id| planets.get(id))
        .map(|planet| planet.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
