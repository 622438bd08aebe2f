pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphql;
pub mod images;
pub mod logging;
pub mod masters;
pub mod metrics;
pub mod server;
pub mod source;

// Domain data shapes shared across layers
pub mod domain;

pub use catalog::{query, CatalogSession, FilteredPage, QueryState};
pub use domain::{Element, MonsterRecord, Partition};
pub use error::{CatalogError, Result};
