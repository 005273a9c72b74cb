//! Shared test helpers: an in-memory paginated source that counts calls

#![allow(dead_code)]

use async_trait::async_trait;
use holonet_ag::client::PageSource;
use holonet_common::{Error, Item, Page, ResourceKind, Result};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE_URL: &str = "http://swapi.test/api";

/// Paginated source backed by in-memory collections
pub struct MockSource {
    collections: HashMap<String, Vec<Item>>,
    page_size: usize,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    /// Later pages answer sooner, so responses land out of page order
    reverse_delay: Option<Duration>,
}

impl MockSource {
    pub fn new(page_size: usize) -> Self {
        Self {
            collections: HashMap::new(),
            page_size,
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            reverse_delay: None,
        }
    }

    pub fn with_collection(mut self, kind: ResourceKind, items: Vec<Item>) -> Self {
        self.collections.insert(kind.root_url(BASE_URL), items);
        self
    }

    pub fn with_reverse_delay(mut self, step: Duration) -> Self {
        self.reverse_delay = Some(step);
        self
    }

    /// Default fixture: 3 planets, 4 people
    pub fn star_wars(page_size: usize) -> Self {
        Self::new(page_size)
            .with_collection(ResourceKind::Planets, planets())
            .with_collection(ResourceKind::People, people())
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls that carried a `?page=` suffix
    pub fn page_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|url| url.contains("?page="))
            .collect()
    }
}

#[async_trait]
impl PageSource for MockSource {
    async fn fetch_page(&self, url: &str) -> Result<Page> {
        self.calls.lock().unwrap().push(url.to_string());

        let (root, page) = match url.split_once("?page=") {
            Some((root, page)) => (root, page.parse::<usize>().unwrap_or(1)),
            None => (url, 1),
        };

        let items = self.collections.get(root).ok_or_else(|| Error::Fetch {
            url: url.to_string(),
            status: Some(404),
            message: "no such collection".to_string(),
        })?;

        if let Some(step) = self.reverse_delay {
            let pages = items.len().div_ceil(self.page_size.max(1));
            let rank = pages.saturating_sub(page) as u32 + 1;
            tokio::time::sleep(step * rank).await;
        }

        if self.failing.lock().unwrap().contains(url) {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: Some(500),
                message: "upstream exploded".to_string(),
            });
        }

        let results = items
            .iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();

        Ok(Page {
            count: items.len() as u64,
            results,
            next: None,
            previous: None,
        })
    }
}

pub fn item(value: serde_json::Value) -> Item {
    serde_json::from_value(value).expect("valid item fixture")
}

pub fn person_url(id: u64) -> String {
    format!("{}/{}/", ResourceKind::People.root_url(BASE_URL), id)
}

pub fn planet_url(id: u64) -> String {
    format!("{}/{}/", ResourceKind::Planets.root_url(BASE_URL), id)
}

/// `count` anonymous items of one kind, ids 1..=count
pub fn numbered(kind: ResourceKind, count: u64) -> Vec<Item> {
    (1..=count)
        .map(|id| {
            item(json!({
                "name": format!("{} {}", kind, id),
                "url": format!("{}/{}/", kind.root_url(BASE_URL), id),
            }))
        })
        .collect()
}

pub fn planets() -> Vec<Item> {
    vec![
        item(json!({
            "name": "Tatooine",
            "url": planet_url(1),
            "population": "200000",
            "residents": [person_url(1), person_url(4)],
        })),
        item(json!({
            "name": "Alderaan",
            "url": planet_url(2),
            "population": "2000000000",
            "residents": [person_url(5)],
        })),
        item(json!({
            "name": "Hoth",
            "url": planet_url(4),
            "population": "unknown",
            "residents": [],
        })),
    ]
}

pub fn people() -> Vec<Item> {
    vec![
        item(json!({"name": "Luke Skywalker", "url": person_url(1), "homeworld": planet_url(1)})),
        item(json!({"name": "C-3PO", "url": person_url(2), "homeworld": planet_url(1)})),
        item(json!({"name": "Darth Vader", "url": person_url(4), "homeworld": planet_url(1)})),
        item(json!({"name": "Leia Organa", "url": person_url(5), "homeworld": planet_url(2)})),
    ]
}
