//! Per-table record cache with a fixed time-to-live.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::Table;
use super::records::RawRecord;
use super::source::RecordSource;
use crate::errors::{AppError, AppResult};

/// Upper bound on pages followed for one table.
const MAX_PAGES: usize = 1_000;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    records: Arc<Vec<RawRecord>>,
    fetched_at: Instant,
}

pub struct CachedFetcher {
    source: Arc<dyn RecordSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: Mutex<HashMap<Table, CacheEntry>>,
}

impl CachedFetcher {
    pub fn new(source: Arc<dyn RecordSource>, ttl: Duration) -> Self {
        Self::with_clock(source, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(source: Arc<dyn RecordSource>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    fn cached(&self, table: Table) -> Option<Arc<Vec<RawRecord>>> {
        let entries = self.entries.lock();
        let entry = entries.get(&table)?;
        let age = self.clock.now().saturating_duration_since(entry.fetched_at);
        (age < self.ttl).then(|| Arc::clone(&entry.records))
    }

    /// All records of `table`, served from the cache while fresh.
    pub async fn fetch(&self, table: Table) -> AppResult<Arc<Vec<RawRecord>>> {
        if let Some(records) = self.cached(table) {
            debug!(%table, count = records.len(), "cache hit");
            return Ok(records);
        }

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self.source.fetch_page(table, offset.as_deref()).await?;
            records.extend(page.records);
            pages += 1;

            match page.offset {
                Some(next) if pages < MAX_PAGES => offset = Some(next),
                Some(_) => {
                    return Err(AppError::Other(format!(
                        "{table}: more than {MAX_PAGES} pages, giving up"
                    )));
                }
                None => break,
            }
        }

        info!(%table, count = records.len(), pages, "records fetched");

        let records = Arc::new(records);
        if !records.is_empty() {
            self.entries.lock().insert(
                table,
                CacheEntry {
                    records: Arc::clone(&records),
                    fetched_at: self.clock.now(),
                },
            );
        }
        Ok(records)
    }

    /// Like [`fetch`](Self::fetch) but degrades to an empty list on failure.
    pub async fn records_or_empty(&self, table: Table) -> Arc<Vec<RawRecord>> {
        match self.fetch(table).await {
            Ok(records) => records,
            Err(e) => {
                error!(%table, error = %e, "fetch failed, using empty record list");
                Arc::new(Vec::new())
            }
        }
    }

    pub fn invalidate(&self) {
        self.entries.lock().clear();
        debug!("record cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::records::RecordPage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ManualClock(Mutex<Instant>);

    impl ManualClock {
        fn advance(&self, d: Duration) {
            *self.0.lock() += d;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.0.lock()
        }
    }

    /// Two pages per table, counting every page request.
    struct CountingSource {
        calls: AtomicUsize,
        empty: bool,
    }

    fn record(id: &str) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            fields: Default::default(),
        }
    }

    #[async_trait]
    impl RecordSource for CountingSource {
        async fn fetch_page(&self, _table: Table, offset: Option<&str>) -> AppResult<RecordPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.empty {
                return Ok(RecordPage::default());
            }
            Ok(match offset {
                None => RecordPage {
                    records: vec![record("rec1"), record("rec2")],
                    offset: Some("page2".to_string()),
                },
                Some(_) => RecordPage {
                    records: vec![record("rec3")],
                    offset: None,
                },
            })
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RecordSource for FailingSource {
        async fn fetch_page(&self, table: Table, _offset: Option<&str>) -> AppResult<RecordPage> {
            Err(AppError::Airtable {
                table: table.name().to_string(),
                status: 503,
                message: "unavailable".to_string(),
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn setup(empty: bool) -> (Arc<CountingSource>, Arc<ManualClock>, CachedFetcher) {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            empty,
        });
        let clock = Arc::new(ManualClock(Mutex::new(Instant::now())));
        let fetcher = CachedFetcher::with_clock(
            source.clone(),
            Duration::from_secs(300),
            clock.clone(),
        );
        (source, clock, fetcher)
    }

    #[tokio::test]
    async fn follows_pagination_cursor() {
        let (source, _clock, fetcher) = setup(false);
        let records = fetcher.fetch(Table::Events).await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec2", "rec3"]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fresh_entries_are_served_from_cache() {
        let (source, clock, fetcher) = setup(false);
        fetcher.fetch(Table::Events).await.unwrap();

        clock.advance(Duration::from_secs(4 * 60 + 59));
        fetcher.fetch(Table::Events).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn stale_entries_are_refetched() {
        let (source, clock, fetcher) = setup(false);
        fetcher.fetch(Table::Events).await.unwrap();

        clock.advance(Duration::from_secs(5 * 60 + 1));
        fetcher.fetch(Table::Events).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn tables_are_cached_independently_and_invalidated_together() {
        let (source, _clock, fetcher) = setup(false);
        fetcher.fetch(Table::Events).await.unwrap();
        fetcher.fetch(Table::Employees).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        fetcher.invalidate();
        fetcher.fetch(Table::Events).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn empty_results_are_not_cached() {
        let (source, _clock, fetcher) = setup(true);
        assert!(fetcher.fetch(Table::Events).await.unwrap().is_empty());
        fetcher.fetch(Table::Events).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_surface_or_degrade_to_empty() {
        let fetcher = CachedFetcher::new(Arc::new(FailingSource), Duration::from_secs(300));
        assert!(matches!(
            fetcher.fetch(Table::Reservations).await,
            Err(AppError::Airtable { status: 503, .. })
        ));
        assert!(fetcher.records_or_empty(Table::Reservations).await.is_empty());
    }
}
