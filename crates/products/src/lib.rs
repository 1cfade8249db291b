//! Product catalog core.
//!
//! Turns a flat attribute feed (one row per SKU attribute) into an immutable,
//! queryable index of products. Pure domain logic: no IO, no retrieval, no
//! presentation.

pub mod config;
pub mod index;
pub mod normalizer;
pub mod product;
pub mod repair;
pub mod row;
pub mod search;

pub use config::{AdmissionRules, CatalogConfig, ColumnAliases, KeyCase};
pub use index::{BuildStats, ProductIndex};
pub use normalizer::RowNormalizer;
pub use product::{Attribute, Product};
pub use repair::repair_text;
pub use row::{AttributeRow, RawRow};
pub use search::AttributeMatch;
