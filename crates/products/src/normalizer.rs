//! RowNormalizer: raw tabular row → [`AttributeRow`].

use skulens_core::Sku;

use crate::config::{CatalogConfig, ColumnAliases};
use crate::repair::repair_text;
use crate::row::{AttributeRow, RawRow};

/// Turns raw rows into canonical attribute rows.
///
/// Pure and stateless apart from its configuration; safe to share across
/// threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowNormalizer {
    columns: ColumnAliases,
    repair: bool,
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new(ColumnAliases::default())
    }
}

impl RowNormalizer {
    pub fn new(columns: ColumnAliases) -> Self {
        Self {
            columns,
            repair: true,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            columns: config.columns.clone(),
            repair: config.repair_text,
        }
    }

    /// Enable or disable the mis-decoding repair pass.
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Normalize one row, or `None` if it carries no usable SKU.
    pub fn normalize(&self, row: &RawRow) -> Option<AttributeRow> {
        let raw_sku = row.resolve(&self.columns.sku)?;
        let sku = match Sku::parse(&self.clean(raw_sku)) {
            Ok(sku) => sku,
            Err(err) => {
                tracing::trace!(error = %err, "row rejected");
                return None;
            }
        };

        Some(AttributeRow {
            sku,
            item_name: self.field(row, &self.columns.item_name),
            attribute_name: self.field(row, &self.columns.attribute_name),
            attribute_value: self.field(row, &self.columns.attribute_value),
        })
    }

    fn field(&self, row: &RawRow, aliases: &[String]) -> Option<String> {
        row.resolve(aliases).map(|raw| self.clean(raw))
    }

    fn clean(&self, raw: &str) -> String {
        if self.repair {
            repair_text(raw).trim().to_string()
        } else {
            raw.trim().to_string()
        }
    }
}
