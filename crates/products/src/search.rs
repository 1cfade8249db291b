//! Read-only queries over a built [`ProductIndex`].
//!
//! Both queries are total: any term is valid, and "no match" is an empty
//! result, never an error. Matching is case-insensitive substring
//! containment; results keep first-seen SKU order.

use serde::Serialize;

use crate::index::ProductIndex;
use crate::product::{Attribute, Product};

/// The attributes of one product that matched an attribute search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeMatch<'a> {
    pub sku: &'a str,
    pub attributes: Vec<&'a Attribute>,
}

/// Lowercased search term; `None` means "no term typed yet".
///
/// Surrounding whitespace only decides blankness; it still takes part in
/// matching, so `"mouse "` finds "Mouse Pad" but not "Mouse".
fn fold_term(term: &str) -> Option<String> {
    (!term.trim().is_empty()).then(|| term.to_lowercase())
}

impl ProductIndex {
    /// Products whose SKU or name contains `term`.
    ///
    /// A blank term yields nothing rather than the whole catalog.
    pub fn search_products(&self, term: &str) -> Vec<&Product> {
        let Some(needle) = fold_term(term) else {
            return Vec::new();
        };

        self.all()
            .iter()
            .zip(&self.folded)
            .filter(|(_, folded)| {
                folded.sku.contains(&needle)
                    || folded.name.as_deref().is_some_and(|name| name.contains(&needle))
            })
            .map(|(product, _)| product)
            .collect()
    }

    /// Attributes whose name or value contains `term`, grouped by SKU.
    ///
    /// Only matching attributes are returned, in their original order; SKUs
    /// without a match are left out.
    pub fn search_by_attribute(&self, term: &str) -> Vec<AttributeMatch<'_>> {
        let Some(needle) = fold_term(term) else {
            return Vec::new();
        };

        self.all()
            .iter()
            .zip(&self.folded)
            .filter_map(|(product, folded)| {
                let attributes: Vec<&Attribute> = product
                    .attributes()
                    .iter()
                    .zip(&folded.attributes)
                    .filter(|(_, (name, value))| name.contains(&needle) || value.contains(&needle))
                    .map(|(attribute, _)| attribute)
                    .collect();

                (!attributes.is_empty()).then(|| AttributeMatch {
                    sku: product.sku(),
                    attributes,
                })
            })
            .collect()
    }
}
