//! Catalog configuration: column aliases, admission rules, key handling.
//!
//! Everything here has a compiled-in default matching the product feed we
//! ingest; any field may be overridden from a config file (see
//! `skulens-infra::config`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use skulens_core::{DomainError, DomainResult};

/// Ordered alias lists for each logical column.
///
/// The first label present in a row wins, independently per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub sku: Vec<String>,
    pub item_name: Vec<String>,
    pub attribute_name: Vec<String>,
    pub attribute_value: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            sku: labels(&["SKU", "Sku", "sku"]),
            item_name: labels(&["Item name", "Item Name", "Name"]),
            attribute_name: labels(&["Attribute name", "Attribute Name"]),
            // "Wert" is what the upstream export actually ships.
            attribute_value: labels(&[
                "Attribute value",
                "Attribute Value",
                "Wert",
                "Wartość",
                "Value",
            ]),
        }
    }
}

/// Rules deciding which attribute rows reach a product's attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionRules {
    /// Attribute names dropped outright (exact, case-sensitive).
    pub ignored_attributes: BTreeSet<String>,
    /// Attribute names starting with any of these are dropped.
    pub reserved_prefixes: Vec<String>,
    /// SKUs ending with any of these are non-sellable variants; their rows are
    /// skipped entirely.
    pub excluded_sku_suffixes: Vec<String>,
    /// Admit attributes whose value is present but empty.
    pub admit_empty_values: bool,
}

impl Default for AdmissionRules {
    fn default() -> Self {
        Self {
            ignored_attributes: labels(&[
                "tags",
                "template_suffix",
                "barcode_type",
                "active",
                "product_type",
            ])
            .into_iter()
            .collect(),
            reserved_prefixes: labels(&["meta_"]),
            excluded_sku_suffixes: labels(&["-0"]),
            admit_empty_values: false,
        }
    }
}

impl AdmissionRules {
    /// True if an attribute with this name may be shown.
    pub fn admits_name(&self, name: &str) -> bool {
        !name.is_empty()
            && !self.ignored_attributes.contains(name)
            && !self
                .reserved_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// True if an attribute value may be shown.
    pub fn admits_value(&self, value: &str) -> bool {
        self.admit_empty_values || !value.is_empty()
    }

    /// The matching exclusion suffix, if the SKU is a non-sellable variant.
    pub fn excluded_suffix(&self, sku: &str) -> Option<&str> {
        self.excluded_sku_suffixes
            .iter()
            .map(String::as_str)
            .find(|suffix| sku.ends_with(suffix))
    }
}

/// How SKUs are compared when grouping rows and looking products up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    /// `"ab-1"` and `"AB-1"` are different products.
    #[default]
    Sensitive,
    /// `"ab-1"` and `"AB-1"` group together; the first-seen spelling is kept.
    Insensitive,
}

impl KeyCase {
    /// Grouping key for a SKU under this policy.
    pub fn key(self, sku: &str) -> String {
        match self {
            KeyCase::Sensitive => sku.to_string(),
            KeyCase::Insensitive => sku.to_lowercase(),
        }
    }
}

/// Full configuration for normalizing rows and building the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub columns: ColumnAliases,
    pub admission: AdmissionRules,
    pub sku_keys: KeyCase,
    /// Run the mis-decoding repair pass over every text field.
    pub repair_text: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            columns: ColumnAliases::default(),
            admission: AdmissionRules::default(),
            sku_keys: KeyCase::default(),
            repair_text: true,
        }
    }
}

impl CatalogConfig {
    /// Reject configurations that would silently drop every row or attribute.
    pub fn validate(&self) -> DomainResult<()> {
        let columns = [
            ("columns.sku", &self.columns.sku),
            ("columns.item_name", &self.columns.item_name),
            ("columns.attribute_name", &self.columns.attribute_name),
            ("columns.attribute_value", &self.columns.attribute_value),
        ];
        for (field, aliases) in columns {
            if aliases.is_empty() {
                return Err(DomainError::validation(format!("{field} has no aliases")));
            }
            if aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(DomainError::validation(format!(
                    "{field} contains a blank alias"
                )));
            }
        }

        if self.admission.reserved_prefixes.iter().any(String::is_empty) {
            return Err(DomainError::validation(
                "admission.reserved_prefixes contains an empty prefix",
            ));
        }
        if self.admission.excluded_sku_suffixes.iter().any(String::is_empty) {
            return Err(DomainError::validation(
                "admission.excluded_sku_suffixes contains an empty suffix",
            ));
        }

        Ok(())
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
