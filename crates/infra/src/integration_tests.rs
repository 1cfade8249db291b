//! Integration tests for the full load pipeline.
//!
//! Tests: RowSource → CatalogStore → ProductIndex → queries
//!
//! Verifies:
//! - Feed quirks (localized columns, mis-decoded text, noise rows) are absorbed
//! - Reloads replace the catalog and never merge batches
//! - Readers on other threads always see a complete index

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use skulens_products::{Attribute, KeyCase};

    use crate::config;
    use crate::source::{InMemoryRowSource, JsonRowSource, RowSource};
    use crate::store::CatalogStore;

    const FEED: &str = r#"[
        {"SKU": "X1", "Item name": "Widget", "Attribute name": "color", "Wert": "red"},
        {"SKU": "X1", "Item name": "Widget", "Attribute name": "meta_internal", "Wert": "skip"},
        {"SKU": "X1", "Item name": "Widget", "Attribute name": "GrÃ¶ÃŸe", "Wert": "L"},
        {"SKU": "X1-0", "Item name": "Widget Variant", "Attribute name": "color", "Wert": "blue"},
        {"SKU": "", "Item name": "Trailing blank line"},
        {"SKU": 2002, "Item name": "Gadget", "Attribute name": "tags", "Wert": "sale"},
        {"SKU": 2002, "Item name": "Gadget", "Attribute name": "material", "Wert": "steel"}
    ]"#;

    #[test]
    fn json_feed_loads_into_searchable_catalog() {
        let store = CatalogStore::default();
        let report = store.reload(&JsonRowSource::from_bytes(FEED)).unwrap();

        assert_eq!(report.stats.rows_seen, 7);
        assert_eq!(report.stats.rows_rejected, 1);
        assert_eq!(report.stats.rows_excluded, 1);
        assert_eq!(report.stats.products, 2);

        let index = store.snapshot();
        let widget = index.get("X1").unwrap();
        assert_eq!(
            widget.attributes(),
            &[Attribute::new("color", "red"), Attribute::new("Größe", "L")]
        );
        assert_eq!(index.get("2002").unwrap().attributes(), &[Attribute::new("material", "steel")]);

        let hits = index.search_by_attribute("größe");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sku, "X1");
        assert!(index.search_by_attribute("blue").is_empty());
        assert_eq!(index.search_products("gad").len(), 1);
    }

    #[test]
    fn config_from_json_drives_grouping() {
        let config = config::from_json(r#"{ "sku_keys": "insensitive" }"#).unwrap();
        assert_eq!(config.sku_keys, KeyCase::Insensitive);

        let store = CatalogStore::new(config).unwrap();
        let feed = r#"[
            {"SKU": "ab-1", "Item name": "Lower", "Attribute name": "color", "Wert": "red"},
            {"SKU": "AB-1", "Item name": "Upper", "Attribute name": "size", "Wert": "L"}
        ]"#;
        store.reload(&JsonRowSource::from_bytes(feed)).unwrap();

        let index = store.snapshot();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("AB-1").unwrap().attributes().len(), 2);
    }

    #[test]
    fn reloading_same_feed_yields_equal_index() {
        let store = CatalogStore::default();
        let source = JsonRowSource::from_bytes(FEED);

        store.reload(&source).unwrap();
        let first = store.snapshot();
        store.reload(&source).unwrap();
        let second = store.snapshot();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn concurrent_readers_see_complete_indexes() {
        let store = Arc::new(CatalogStore::default());
        let small = InMemoryRowSource::new(JsonRowSource::from_bytes(FEED).fetch().unwrap());
        store.reload(&small).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let index = store.snapshot();
                        // Either the FEED batch (2 products) or the empty batch.
                        assert!(index.len() == 2 || index.is_empty());
                        let hits = index.search_products("x1");
                        assert!(hits.len() <= 1);
                    }
                })
            })
            .collect();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let empty = InMemoryRowSource::new(vec![]);
                for i in 0..50 {
                    let source = if i % 2 == 0 { &empty } else { &small };
                    // Interleaved reloads may supersede each other; that is fine.
                    let _ = store.reload(source);
                }
            })
        };

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
