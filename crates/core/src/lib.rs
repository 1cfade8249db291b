//! `skulens-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no logging setup).

pub mod error;
pub mod sku;

pub use error::{DomainError, DomainResult};
pub use sku::Sku;
