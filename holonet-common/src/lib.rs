//! # Holonet Common Library
//!
//! Shared code for the Holonet aggregator including:
//! - Resource data model (items, pages, resource kinds)
//! - Id derivation from canonical resource URLs
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{derive_id, trailing_id, Item, Page, ResourceKind};
