//! Sorting and pagination of materialized item lists
//!
//! Sort order policy for `sortBy`:
//! - numbers first (JSON numbers and strings that parse as numbers, so
//!   SWAPI's `"200000"` populations compare numerically), ascending
//! - then text, compared case-insensitively
//! - items lacking the field, or holding `null`, always last
//!
//! The sort is stable, so equal keys keep their incoming order.

use holonet_common::Item;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Shaping options as they arrive on the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShapeParams {
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ShapeParams {
    /// Pagination request, present only when both `page` and `limit` are
    /// positive integers
    pub fn page_request(&self) -> Option<PageRequest> {
        let page = parse_positive(self.page.as_deref()?)?;
        let limit = parse_positive(self.limit.as_deref()?)?;
        Some(PageRequest { page, limit })
    }

    /// Sort field, ignoring an empty `sortBy=`
    pub fn sort_field(&self) -> Option<&str> {
        self.sort_by.as_deref().filter(|field| !field.is_empty())
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// 1-indexed page of `limit` items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Offset of the first item on this page
    pub fn start(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    /// Item count before slicing
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Shaped output: an envelope when paginated, the bare list otherwise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Shaped<T> {
    Paged(Envelope<T>),
    All(Vec<T>),
}

/// Slice out one page; `total` is the length of the full list
///
/// # Examples
/// ```
/// use holonet_ag::shaping::{paginate, PageRequest};
///
/// let items: Vec<u32> = (0..23).collect();
/// let envelope = paginate(items, PageRequest { page: 3, limit: 10 });
/// assert_eq!(envelope.data, vec![20, 21, 22]);
/// assert_eq!(envelope.total, 23);
/// ```
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Envelope<T> {
    let total = items.len();
    let start = request.start().min(total);
    let data = items.into_iter().skip(start).take(request.limit).collect();

    Envelope {
        data,
        total,
        page: request.page,
        limit: request.limit,
    }
}

/// Stable ascending sort by the named field
pub fn sort_by_field(items: &mut [Item], field: &str) {
    items.sort_by_cached_key(|item| SortKey::of(item.field(field)));
}

/// Apply the optional sort, then the optional pagination
pub fn shape(mut items: Vec<Item>, params: &ShapeParams) -> Shaped<Item> {
    if let Some(field) = params.sort_field() {
        sort_by_field(&mut items, field);
    }

    match params.page_request() {
        Some(request) => Shaped::Paged(paginate(items, request)),
        None => Shaped::All(items),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

impl SortKey {
    fn of(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortKey::Missing,
            Some(Value::Number(n)) => n.as_f64().map_or(SortKey::Missing, SortKey::Number),
            Some(Value::String(s)) => match s.trim().replace(',', "").parse::<f64>() {
                Ok(n) if n.is_finite() => SortKey::Number(n),
                _ => SortKey::Text(s.to_lowercase()),
            },
            Some(other) => SortKey::Text(other.to_string().to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Missing => 2,
        }
    }
}

impl Eq for SortKey {}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
