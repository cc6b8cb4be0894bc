//! srcstore Core Components
//!
//! This crate provides configuration loading and the index query
//! service that ties a configured store root to index listing.

mod config;
mod error;
mod service;

pub use config::{config_dir, StoreConfig, CONFIG_ENV};
pub use error::CoreError;
pub use service::{IndexQuery, IndexSummary};
