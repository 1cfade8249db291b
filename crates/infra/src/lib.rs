//! Infrastructure layer: row sources, config loading, the live catalog.

pub mod config;
pub mod source;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use config::{ConfigError, CONFIG_ENV_VAR};
pub use source::{InMemoryRowSource, JsonRowSource, RowSource, SourceError};
pub use store::{CatalogStore, LoadError, LoadReport, LoadTicket};
