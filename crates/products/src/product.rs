use serde::{Deserialize, Serialize};

use skulens_core::Sku;

/// A single admitted (name, value) fact about a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A product grouped from all attribute rows sharing its SKU.
///
/// Attributes keep source row order. Built only by the index; immutable
/// once the build finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    sku: Sku,
    name: Option<String>,
    attributes: Vec<Attribute>,
}

impl Product {
    pub(crate) fn new(sku: Sku, name: Option<String>) -> Self {
        Self {
            sku,
            name,
            attributes: Vec::new(),
        }
    }

    pub fn sku(&self) -> &str {
        self.sku.as_str()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Fill in the display name if none has been seen yet.
    ///
    /// Returns `true` if the name was set.
    pub(crate) fn backfill_name(&mut self, name: Option<String>) -> bool {
        if self.name.is_some() {
            return false;
        }
        self.name = name;
        self.name.is_some()
    }

    pub(crate) fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(raw: &str) -> Sku {
        Sku::parse(raw).unwrap()
    }

    #[test]
    fn new_product_has_no_attributes() {
        let product = Product::new(sku("X1"), Some("Widget".to_string()));
        assert_eq!(product.sku(), "X1");
        assert_eq!(product.name(), Some("Widget"));
        assert!(product.attributes().is_empty());
    }

    #[test]
    fn first_name_wins() {
        let mut product = Product::new(sku("Y"), Some("First".to_string()));
        assert!(!product.backfill_name(Some("Second".to_string())));
        assert_eq!(product.name(), Some("First"));
    }

    #[test]
    fn missing_name_is_backfilled_once() {
        let mut product = Product::new(sku("Y"), None);
        assert!(!product.backfill_name(None));
        assert!(product.backfill_name(Some("Later".to_string())));
        assert!(!product.backfill_name(Some("Even later".to_string())));
        assert_eq!(product.name(), Some("Later"));
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let mut product = Product::new(sku("A"), None);
        product.push_attribute(Attribute::new("size", "L"));
        product.push_attribute(Attribute::new("color", "red"));
        let names: Vec<_> = product.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["size", "color"]);
    }

    #[test]
    fn serializes_for_presentation() {
        let mut product = Product::new(sku("A"), Some("Widget".to_string()));
        product.push_attribute(Attribute::new("color", "red"));
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sku": "A",
                "name": "Widget",
                "attributes": [{ "name": "color", "value": "red" }]
            })
        );
    }
}
