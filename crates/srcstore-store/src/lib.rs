//! srcstore Store
//!
//! This crate provides the artifact-index layer of srcstore:
//! - Capability traits for stores at each level of the
//!   repository / version / source unit hierarchy
//! - Index status records and filter criteria
//! - Index discovery that walks a store and everything it can open,
//!   reporting which indexes are stale
//! - Filesystem-backed stores for each level

mod error;
pub mod fs;
pub mod index;
pub mod listing;
pub mod status;
pub mod store;
pub mod unit;

pub use error::StoreError;
pub use fs::{open_store, IndexLayout, StoreScope};
pub use index::{Index, IndexDef, IndexKind};
pub use listing::{collect_indexes, list_indexes, Annotate, IndexReport};
pub use status::{IndexCriteria, IndexStatus};
pub use store::{Indexed, RepoOpener, Store, UnitOpener, VersionOpener};
pub use unit::UnitId;
