//! HTTP API handlers for holonet-ag

pub mod health;
pub mod resources;

pub use health::{cache_status, health_check, health_routes};
pub use resources::{get_people, get_person, get_planet, get_planets, not_found, resource_routes};
