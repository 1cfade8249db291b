//! Process-scoped catalog holder.
//!
//! Holds the current [`ProductIndex`] and replaces it wholesale on every
//! successful load. Loads are ticketed: only the most recently issued ticket
//! may install its result, so a slow retrieval that finishes after a newer one
//! was started is discarded instead of clobbering fresher data. A failed
//! retrieval leaves the previous index in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use skulens_core::DomainResult;
use skulens_products::{BuildStats, CatalogConfig, ProductIndex, RawRow};

use crate::source::{RowSource, SourceError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("row source failed: {0}")]
    Source(#[from] SourceError),

    #[error("load {ticket} superseded by load {latest}")]
    Superseded { ticket: u64, latest: u64 },
}

/// Permission to install the result of one load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Summary of the load that produced the current index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub stats: BuildStats,
}

#[derive(Debug)]
struct Current {
    index: Arc<ProductIndex>,
    report: Option<LoadReport>,
}

#[derive(Debug)]
pub struct CatalogStore {
    config: CatalogConfig,
    issued: AtomicU64,
    current: RwLock<Current>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_config(CatalogConfig::default())
    }
}

impl CatalogStore {
    /// Create an empty store after validating `config`.
    pub fn new(config: CatalogConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            issued: AtomicU64::new(0),
            current: RwLock::new(Current {
                index: Arc::new(ProductIndex::empty()),
                report: None,
            }),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Start a load; any ticket issued earlier becomes stale.
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Build an index from `rows` and install it if `ticket` is still current.
    pub fn complete(&self, ticket: LoadTicket, rows: Vec<RawRow>) -> Result<LoadReport, LoadError> {
        self.ensure_latest(ticket)?;

        // Build outside the lock; readers keep the old snapshot meanwhile.
        let index = ProductIndex::from_raw_rows(rows, &self.config);

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the lock so two completions cannot interleave.
        self.ensure_latest(ticket)?;

        let report = LoadReport {
            generation: ticket.generation(),
            loaded_at: Utc::now(),
            stats: *index.stats(),
        };
        tracing::info!(
            generation = report.generation,
            products = report.stats.products,
            rows = report.stats.rows_seen,
            "catalog index replaced"
        );

        current.index = Arc::new(index);
        current.report = Some(report.clone());
        Ok(report)
    }

    /// Record a failed retrieval. The current index is left untouched.
    pub fn fail(&self, ticket: LoadTicket, err: SourceError) -> LoadError {
        tracing::warn!(
            generation = ticket.generation(),
            error = %err,
            "catalog load failed; keeping previous index"
        );
        LoadError::Source(err)
    }

    /// Fetch a full batch from `source` and install it.
    pub fn reload<S: RowSource + ?Sized>(&self, source: &S) -> Result<LoadReport, LoadError> {
        let ticket = self.begin_load();
        match source.fetch() {
            Ok(rows) => self.complete(ticket, rows),
            Err(err) => Err(self.fail(ticket, err)),
        }
    }

    /// The index to run queries against.
    ///
    /// Cheap to call; the returned snapshot stays valid even if a reload
    /// replaces the store's index afterwards.
    pub fn snapshot(&self) -> Arc<ProductIndex> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current.index)
    }

    pub fn last_report(&self) -> Option<LoadReport> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        current.report.clone()
    }

    fn ensure_latest(&self, ticket: LoadTicket) -> Result<(), LoadError> {
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket.generation() == latest {
            return Ok(());
        }
        tracing::warn!(
            generation = ticket.generation(),
            latest,
            "discarding superseded catalog load"
        );
        Err(LoadError::Superseded {
            ticket: ticket.generation(),
            latest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryRowSource;

    fn raw(sku: &str, name: &str, attribute: &str, value: &str) -> RawRow {
        RawRow::new()
            .with("SKU", sku)
            .with("Item name", name)
            .with("Attribute name", attribute)
            .with("Attribute value", value)
    }

    struct FailingSource;

    impl RowSource for FailingSource {
        fn fetch(&self) -> Result<Vec<RawRow>, SourceError> {
            Err(SourceError::Unavailable("connection reset".to_string()))
        }
    }

    #[test]
    fn new_store_is_empty() {
        let store = CatalogStore::default();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.last_report(), None);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = CatalogConfig::default();
        config.columns.attribute_name.clear();
        assert!(CatalogStore::new(config).is_err());
    }

    #[test]
    fn reload_installs_index_and_report() {
        let store = CatalogStore::default();
        let source = InMemoryRowSource::new(vec![raw("X1", "Widget", "color", "red")]);

        let report = store.reload(&source).unwrap();
        assert_eq!(report.generation, 1);
        assert_eq!(report.stats.products, 1);
        assert_eq!(store.last_report(), Some(report));
        assert_eq!(store.snapshot().search_products("widget").len(), 1);
    }

    #[test]
    fn reload_replaces_wholesale() {
        let store = CatalogStore::default();
        store
            .reload(&InMemoryRowSource::new(vec![raw("A", "Alpha", "color", "red")]))
            .unwrap();
        store
            .reload(&InMemoryRowSource::new(vec![raw("B", "Beta", "size", "M")]))
            .unwrap();

        let index = store.snapshot();
        assert!(index.get("A").is_none());
        assert!(index.get("B").is_some());
    }

    #[test]
    fn failed_reload_keeps_previous_index() {
        let store = CatalogStore::default();
        store
            .reload(&InMemoryRowSource::new(vec![raw("A", "Alpha", "color", "red")]))
            .unwrap();
        let before = store.snapshot();

        let err = store.reload(&FailingSource).unwrap_err();
        assert!(matches!(err, LoadError::Source(SourceError::Unavailable(_))));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.last_report().unwrap().generation, 1);
    }

    #[test]
    fn superseded_load_is_discarded() {
        let store = CatalogStore::default();
        let stale = store.begin_load();
        let fresh = store.begin_load();

        store
            .complete(fresh, vec![raw("NEW", "Fresh", "color", "red")])
            .unwrap();
        let err = store
            .complete(stale, vec![raw("OLD", "Stale", "color", "blue")])
            .unwrap_err();

        assert!(matches!(err, LoadError::Superseded { ticket: 1, latest: 2 }));
        let index = store.snapshot();
        assert!(index.get("NEW").is_some());
        assert!(index.get("OLD").is_none());
    }

    #[test]
    fn stale_completion_before_fresh_one_is_still_discarded() {
        let store = CatalogStore::default();
        let stale = store.begin_load();
        let _fresh = store.begin_load();

        assert!(store.complete(stale, vec![raw("OLD", "Stale", "c", "v")]).is_err());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn snapshot_survives_later_reload() {
        let store = CatalogStore::default();
        store
            .reload(&InMemoryRowSource::new(vec![raw("A", "Alpha", "color", "red")]))
            .unwrap();
        let held = store.snapshot();
        store.reload(&InMemoryRowSource::new(vec![])).unwrap();

        assert_eq!(held.len(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn fail_returns_source_error() {
        let store = CatalogStore::default();
        let ticket = store.begin_load();
        let err = store.fail(ticket, SourceError::Unavailable("timeout".to_string()));
        assert_eq!(err.to_string(), "row source failed: row source unavailable: timeout");
    }
}
