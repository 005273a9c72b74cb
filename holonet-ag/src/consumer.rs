//! Client for the aggregator's own HTTP API
//!
//! Loads planets and people in one combined request, falling back to two
//! sequential requests plus a local join when the combined call fails.

use crate::client::{build_http_client, get_bytes};
use crate::join;
use holonet_common::{Error, Item, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Planets (residents resolved to names) and people
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CombinedLoad {
    pub planets: Vec<Item>,
    pub people: Vec<Item>,
}

/// HTTP client for a running holonet-ag
pub struct AggregatorClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AggregatorClient {
    /// `base_url` is where the resource routes are mounted, e.g.
    /// `http://127.0.0.1:5730/api/starWars`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Combined load with fallback to separate requests
    pub async fn load_planets_with_people(&self) -> Result<CombinedLoad> {
        match self.fetch_combined().await {
            Ok(load) => Ok(load),
            Err(e) => {
                warn!(error = %e, "Combined load failed, falling back to separate requests");
                self.fetch_separately().await
            }
        }
    }

    /// GET /planets?includePeople=true&replacePeopleNames=true
    pub async fn fetch_combined(&self) -> Result<CombinedLoad> {
        let url = format!(
            "{}/planets?includePeople=true&replacePeopleNames=true",
            self.base_url
        );
        let value: Value = self.get_json(&url).await?;

        let has_lists = ["planets", "people"]
            .iter()
            .all(|key| value.get(*key).map_or(false, Value::is_array));
        if !has_lists {
            return Err(Error::UnexpectedShape(
                "combined response is missing planets or people".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::UnexpectedShape(format!("invalid combined response: {}", e)))
    }

    /// Planets, then people, joined locally
    pub async fn fetch_separately(&self) -> Result<CombinedLoad> {
        let raw_planets: Vec<Item> = self
            .get_json(&format!("{}/planets?replacePeopleNames=false", self.base_url))
            .await?;
        let people: Vec<Item> = self.get_json(&format!("{}/people", self.base_url)).await?;

        let planets = join::enrich_planets_with_resident_names(&raw_planets, &people);
        info!(
            planets = planets.len(),
            people = people.len(),
            "Loaded planets and people separately"
        );

        Ok(CombinedLoad { planets, people })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = get_bytes(&self.http_client, url).await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::UnexpectedShape(format!("invalid response from {}: {}", url, e)))
    }
}
