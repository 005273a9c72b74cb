//! Planet and people endpoints
//!
//! Query parameters follow the camelCase names the front-end sends
//! (`sortBy`, `includePeople`, `replacePeopleNames`).

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use holonet_common::{Item, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::join::{self, NameIndex};
use crate::shaping::{self, Envelope, ShapeParams, Shaped};
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for GET /planets
#[derive(Debug, Default, Deserialize)]
pub struct PlanetsQuery {
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "includePeople")]
    pub include_people: Option<String>,
    #[serde(rename = "replacePeopleNames")]
    pub replace_people_names: Option<String>,
}

impl PlanetsQuery {
    /// Enrichment is on unless explicitly disabled
    pub fn replace_people_names(&self) -> bool {
        self.replace_people_names.as_deref() != Some("false")
    }

    pub fn include_people(&self) -> bool {
        self.include_people.as_deref() == Some("true")
    }

    pub fn shape_params(&self) -> ShapeParams {
        ShapeParams {
            sort_by: self.sort_by.clone(),
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
    }
}

/// GET /planets response, one of three shapes
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PlanetsResponse {
    /// `{data, total, page, limit[, people]}`
    Paged {
        #[serde(flatten)]
        envelope: Envelope<Item>,
        #[serde(skip_serializing_if = "Option::is_none")]
        people: Option<Vec<Item>>,
    },
    /// `{planets, people}`
    WithPeople { planets: Vec<Item>, people: Vec<Item> },
    /// Bare planet list
    All(Vec<Item>),
}

/// GET /planets
pub async fn get_planets(
    State(state): State<AppState>,
    query: Result<Query<PlanetsQuery>, QueryRejection>,
) -> ApiResult<Json<PlanetsResponse>> {
    let Query(query) = query?;
    let replace = query.replace_people_names();
    let include = query.include_people();

    let (planets, people) = if replace || include {
        let (planets, people) = state.cache.get_planets_and_people().await?;
        let list = if replace {
            join::enrich_planets_with_resident_names(&planets, &people)
        } else {
            planets.to_vec()
        };
        (list, include.then(|| people.to_vec()))
    } else {
        let planets = state.cache.get_or_populate(ResourceKind::Planets).await?;
        (planets.to_vec(), None)
    };

    let response = match (shaping::shape(planets, &query.shape_params()), people) {
        (Shaped::Paged(envelope), people) => PlanetsResponse::Paged { envelope, people },
        (Shaped::All(planets), Some(people)) => PlanetsResponse::WithPeople { planets, people },
        (Shaped::All(planets), None) => PlanetsResponse::All(planets),
    };

    Ok(Json(response))
}

/// GET /people
pub async fn get_people(
    State(state): State<AppState>,
    params: Result<Query<ShapeParams>, QueryRejection>,
) -> ApiResult<Json<Shaped<Item>>> {
    let Query(params) = params?;
    let people = state.cache.get_or_populate(ResourceKind::People).await?;
    Ok(Json(shaping::shape(people.to_vec(), &params)))
}

/// GET /planets/:id
///
/// Single planet with resident names resolved.
pub async fn get_planet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Item>> {
    let id = parse_id(&id)?;
    let (planets, people) = state.cache.get_planets_and_people().await?;
    let planet = planets.get(id).ok_or(ApiError::NotFound)?;

    Ok(Json(join::enrich_planet(planet, &NameIndex::new(&people))))
}

/// GET /people/:id
///
/// Single person with `homeworldName` resolved from the planets bucket.
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Item>> {
    let id = parse_id(&id)?;
    let (planets, people) = state.cache.get_planets_and_people().await?;
    let person = people.get(id).ok_or(ApiError::NotFound)?;

    let mut view = person.clone();
    view.fields.insert(
        "homeworldName".to_string(),
        Value::from(join::homeworld_name(person, &planets)),
    );
    Ok(Json(view))
}

/// Fallback for unmatched paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Build planet/people routes
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/planets", get(get_planets))
        .route("/planets/:id", get(get_planet))
        .route("/people", get(get_people))
        .route("/people/:id", get(get_person))
}
