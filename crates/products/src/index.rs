//! ProductIndex: attribute rows grouped by SKU into products.
//!
//! The index is built in a single pass, then frozen. A reload builds a new
//! index from scratch; nothing here mutates a finished index.

use std::borrow::Borrow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{AdmissionRules, CatalogConfig, KeyCase};
use crate::normalizer::RowNormalizer;
use crate::product::{Attribute, Product};
use crate::row::{AttributeRow, RawRow};

/// Counters describing what one build did with its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Rows offered to the build, including rejected ones.
    pub rows_seen: u64,
    /// Rows the normalizer dropped for lack of a SKU.
    pub rows_rejected: u64,
    /// Rows skipped because their SKU carries an excluded suffix.
    pub rows_excluded: u64,
    pub attributes_admitted: u64,
    /// Rows carrying attribute data that failed the admission rules.
    pub attributes_rejected: u64,
    pub products: u64,
}

/// Lowercased search text, computed once per build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FoldedProduct {
    pub(crate) sku: String,
    pub(crate) name: Option<String>,
    pub(crate) attributes: Vec<(String, String)>,
}

impl FoldedProduct {
    fn of(product: &Product) -> Self {
        Self {
            sku: product.sku().to_lowercase(),
            name: product.name().map(str::to_lowercase),
            attributes: product
                .attributes()
                .iter()
                .map(|a| (a.name.to_lowercase(), a.value.to_lowercase()))
                .collect(),
        }
    }
}

/// Immutable SKU → product mapping, iterated in first-seen SKU order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIndex {
    products: Vec<Product>,
    positions: HashMap<String, usize>,
    key_case: KeyCase,
    pub(crate) folded: Vec<FoldedProduct>,
    stats: BuildStats,
}

impl Default for ProductIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl ProductIndex {
    /// An index with no products (the state before the first load).
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            positions: HashMap::new(),
            key_case: KeyCase::default(),
            folded: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    /// Fold already-normalized rows into an index.
    pub fn build<I>(rows: I, config: &CatalogConfig) -> Self
    where
        I: IntoIterator<Item = AttributeRow>,
    {
        let mut builder = IndexBuilder::new(config);
        for row in rows {
            builder.push(row);
        }
        builder.finish()
    }

    /// Normalize raw rows with `config`'s column aliases, then build.
    pub fn from_raw_rows<I>(rows: I, config: &CatalogConfig) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<RawRow>,
    {
        let normalizer = RowNormalizer::from_config(config);
        let mut builder = IndexBuilder::new(config);
        for raw in rows {
            match normalizer.normalize(raw.borrow()) {
                Some(row) => builder.push(row),
                None => builder.reject(),
            }
        }
        builder.finish()
    }

    /// All products in first-seen SKU order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by SKU, honouring the configured key case.
    pub fn get(&self, sku: &str) -> Option<&Product> {
        let idx = self.positions.get(&self.key_case.key(sku.trim()))?;
        self.products.get(*idx)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }
}

struct IndexBuilder<'c> {
    rules: &'c AdmissionRules,
    key_case: KeyCase,
    products: Vec<Product>,
    positions: HashMap<String, usize>,
    stats: BuildStats,
}

impl<'c> IndexBuilder<'c> {
    fn new(config: &'c CatalogConfig) -> Self {
        Self {
            rules: &config.admission,
            key_case: config.sku_keys,
            products: Vec::new(),
            positions: HashMap::new(),
            stats: BuildStats::default(),
        }
    }

    fn reject(&mut self) {
        self.stats.rows_seen += 1;
        self.stats.rows_rejected += 1;
    }

    fn push(&mut self, row: AttributeRow) {
        self.stats.rows_seen += 1;

        if let Some(suffix) = self.rules.excluded_suffix(row.sku.as_str()) {
            tracing::trace!(sku = %row.sku, suffix, "row skipped: excluded sku suffix");
            self.stats.rows_excluded += 1;
            return;
        }

        let AttributeRow {
            sku,
            item_name,
            attribute_name,
            attribute_value,
        } = row;
        let item_name = item_name.filter(|name| !name.is_empty());

        let key = self.key_case.key(sku.as_str());
        let idx = match self.positions.get(&key) {
            Some(&idx) => {
                self.products[idx].backfill_name(item_name);
                idx
            }
            None => {
                let idx = self.products.len();
                self.products.push(Product::new(sku, item_name));
                self.positions.insert(key, idx);
                idx
            }
        };

        if attribute_name.is_none() && attribute_value.is_none() {
            return;
        }
        match admit(self.rules, attribute_name, attribute_value) {
            Some(attribute) => {
                self.products[idx].push_attribute(attribute);
                self.stats.attributes_admitted += 1;
            }
            None => self.stats.attributes_rejected += 1,
        }
    }

    fn finish(mut self) -> ProductIndex {
        self.stats.products = self.products.len() as u64;
        let folded = self.products.iter().map(FoldedProduct::of).collect();

        tracing::debug!(
            rows_seen = self.stats.rows_seen,
            rows_rejected = self.stats.rows_rejected,
            rows_excluded = self.stats.rows_excluded,
            attributes_admitted = self.stats.attributes_admitted,
            attributes_rejected = self.stats.attributes_rejected,
            products = self.stats.products,
            "product index built"
        );

        ProductIndex {
            products: self.products,
            positions: self.positions,
            key_case: self.key_case,
            folded,
            stats: self.stats,
        }
    }
}

fn admit(
    rules: &AdmissionRules,
    name: Option<String>,
    value: Option<String>,
) -> Option<Attribute> {
    let name = name.filter(|n| rules.admits_name(n))?;
    let value = value.filter(|v| rules.admits_value(v))?;
    Some(Attribute { name, value })
}
