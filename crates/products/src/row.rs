//! Row shapes on either side of the normalizer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use skulens_core::Sku;

/// One row as delivered by the upstream tabular parser: column label → text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(BTreeMap<String, String>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.insert(label.into(), value.into());
    }

    /// Builder-style [`RawRow::insert`].
    pub fn with(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(label, value);
        self
    }

    /// Value of the column whose label matches `label`.
    ///
    /// Labels are compared after trimming and dropping a leading byte-order
    /// mark, so `"\u{feff}SKU "` answers to `"SKU"`.
    pub fn get(&self, label: &str) -> Option<&str> {
        if let Some(value) = self.0.get(label) {
            return Some(value.as_str());
        }
        self.0
            .iter()
            .find(|(key, _)| clean_label(key) == label)
            .map(|(_, value)| value.as_str())
    }

    /// First alias present in the row, in preference order.
    pub fn resolve<'a>(&'a self, aliases: &[String]) -> Option<&'a str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn clean_label(label: &str) -> &str {
    label.trim_start_matches('\u{feff}').trim()
}

/// A canonical attribute row: the normalizer's output, consumed once by the
/// index build.
///
/// Optional fields are `None` when the column is missing from the row and
/// `Some("")` when it is present but blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRow {
    pub sku: Sku,
    pub item_name: Option<String>,
    pub attribute_name: Option<String>,
    pub attribute_value: Option<String>,
}

impl AttributeRow {
    pub fn new(sku: Sku) -> Self {
        Self {
            sku,
            item_name: None,
            attribute_name: None,
            attribute_value: None,
        }
    }

    pub fn with_item_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = Some(name.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute_name = Some(name.into());
        self.attribute_value = Some(value.into());
        self
    }
}
