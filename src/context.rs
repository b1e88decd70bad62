//! Application context shared by the CLI commands, the web handlers and the
//! scheduler: configuration, record fetcher, current snapshot and status.

use chrono::{Local, NaiveDate};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

use crate::airtable::{self, CachedFetcher, Table};
use crate::config::Config;
use crate::core::reconcile::{ReconcileOptions, SourceData, reconcile};
use crate::core::staff::{StaffQuery, available_staff};
use crate::db::log::{UpdateLogEntry, UpdateSource, UpdateStatus, recent_updates, record_update};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::publish_workbook;
use crate::models::{AvailableStaff, Snapshot};
use crate::utils::date;

/// Last refresh outcome plus counters, as reported by `/api/status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateState {
    pub success: bool,
    pub timestamp: Option<String>,
    pub message: String,
    pub total_updates: u64,
    pub successful_updates: u64,
}

/// Overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOverrides {
    pub today: Option<NaiveDate>,
    pub fixtures: Option<PathBuf>,
}

/// Credentials submitted through the configuration form.
#[derive(Debug, Clone)]
pub struct CredentialsUpdate {
    pub token: String,
    pub base_id: String,
    pub auto_update_interval: Option<u64>,
}

pub struct AppContext {
    config_path: PathBuf,
    config: RwLock<Config>,
    overrides: RuntimeOverrides,
    fetcher: RwLock<Option<Arc<CachedFetcher>>>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    status: Mutex<UpdateState>,
    scheduler_running: AtomicBool,
}

impl AppContext {
    pub fn new(config_path: PathBuf, config: Config, overrides: RuntimeOverrides) -> Self {
        Self {
            config_path,
            config: RwLock::new(config),
            overrides,
            fetcher: RwLock::new(None),
            snapshot: RwLock::new(None),
            status: Mutex::new(UpdateState::default()),
            scheduler_running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reference date for every computation.
    pub fn today(&self) -> NaiveDate {
        self.overrides.today.unwrap_or_else(date::today)
    }

    /// Fixture mode needs no credentials.
    pub fn is_configured(&self) -> bool {
        self.overrides.fixtures.is_some() || self.config.read().is_configured()
    }

    pub fn ensure_configured(&self) -> AppResult<()> {
        if self.overrides.fixtures.is_some() {
            return Ok(());
        }
        self.config.read().ensure_configured()
    }

    fn fetcher(&self) -> AppResult<Arc<CachedFetcher>> {
        self.ensure_configured()?;

        if let Some(fetcher) = self.fetcher.read().as_ref() {
            return Ok(Arc::clone(fetcher));
        }

        let cfg = self.config();
        let fetcher = Arc::new(airtable::build_fetcher(
            &cfg.airtable,
            self.overrides.fixtures.as_deref(),
        )?);
        info!(source = %fetcher.describe(), "record fetcher ready");

        let mut slot = self.fetcher.write();
        Ok(Arc::clone(slot.get_or_insert(fetcher)))
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().clone()
    }

    pub fn require_snapshot(&self) -> AppResult<Arc<Snapshot>> {
        self.snapshot()
            .ok_or_else(|| AppError::NotFound("no data available yet, run an update first".to_string()))
    }

    fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write() = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Fetch the three tables and reconcile them. Nothing is published.
    pub async fn build_snapshot(&self) -> AppResult<Snapshot> {
        let fetcher = self.fetcher()?;
        let cfg = self.config();

        let events = fetcher.fetch(Table::Events).await?;
        let reservations = fetcher.records_or_empty(Table::Reservations).await;
        let employees = fetcher.records_or_empty(Table::Employees).await;

        let data = SourceData::decode(&events, &reservations, &employees);
        let opts = ReconcileOptions::from_config(&cfg.reconcile, self.today());
        reconcile(&data, &opts)
    }

    /// Full update: fetch, reconcile, publish, write the workbook and log
    /// the outcome.
    pub async fn refresh(&self, source: UpdateSource, invalidate: bool) -> AppResult<Arc<Snapshot>> {
        if invalidate && let Ok(fetcher) = self.fetcher() {
            fetcher.invalidate();
        }

        info!(source = source.as_str(), "refresh started");
        match self.build_snapshot().await {
            Ok(snapshot) => {
                let snapshot = self.publish(snapshot);
                let cfg = self.config();

                let mut message = format!(
                    "{} events processed, {} unassigned",
                    snapshot.stats.total_events, snapshot.stats.unassigned_events
                );
                if let Err(e) = publish_workbook(&snapshot, Path::new(&cfg.export.workbook_path)) {
                    warn!(error = %e, "workbook not written");
                    message.push_str(&format!(" (workbook not written: {e})"));
                }

                self.log_update(
                    UpdateStatus::Success,
                    source,
                    &message,
                    snapshot.stats.total_events,
                    snapshot.stats.unassigned_events,
                );
                self.set_status(true, message);
                Ok(snapshot)
            }
            Err(e) => {
                error!(error = %e, "refresh failed");
                self.log_update(UpdateStatus::Error, source, &e.to_string(), 0, 0);
                self.set_status(false, e.to_string());
                Err(e)
            }
        }
    }

    fn set_status(&self, success: bool, message: String) {
        let mut status = self.status.lock();
        status.success = success;
        status.timestamp = Some(Local::now().format("%d/%m/%Y %H:%M").to_string());
        status.message = message;
        status.total_updates += 1;
        if success {
            status.successful_updates += 1;
        }
    }

    pub fn status(&self) -> UpdateState {
        self.status.lock().clone()
    }

    /// Bookkeeping failures are logged, never propagated.
    fn log_update(
        &self,
        status: UpdateStatus,
        source: UpdateSource,
        message: &str,
        events: usize,
        unassigned: usize,
    ) {
        let database = self.config.read().database.clone();
        let result = DbPool::open(&database)
            .and_then(|pool| record_update(&pool.conn, status, source, message, events, unassigned));
        if let Err(e) = result {
            warn!(error = %e, "update log not written");
        }
    }

    pub fn recent_updates(&self, limit: usize) -> AppResult<Vec<UpdateLogEntry>> {
        let database = self.config.read().database.clone();
        let pool = DbPool::open(&database)?;
        recent_updates(&pool.conn, limit)
    }

    pub async fn available_staff(&self, query: &StaffQuery) -> AppResult<Vec<AvailableStaff>> {
        let fetcher = self.fetcher()?;
        let reservations = fetcher.fetch(Table::Reservations).await?;
        let employees = fetcher.fetch(Table::Employees).await?;

        let data = SourceData::decode(&[], &reservations, &employees);
        Ok(available_staff(&data.employees, &data.reservations, query))
    }

    /// Validate new credentials with a test fetch, then persist and adopt
    /// them.
    pub async fn apply_credentials(&self, update: CredentialsUpdate) -> AppResult<()> {
        let token = update.token.trim();
        let base_id = update.base_id.trim();
        if token.is_empty() || base_id.is_empty() {
            return Err(AppError::Config(
                "airtable token and base id are required".to_string(),
            ));
        }

        let mut candidate = self.config();
        candidate.airtable.token = token.to_string();
        candidate.airtable.base_id = base_id.to_string();
        if let Some(minutes) = update.auto_update_interval {
            candidate.set_value("server.auto_update_interval", &minutes.to_string())?;
        }

        let fetcher = Arc::new(airtable::build_fetcher(
            &candidate.airtable,
            self.overrides.fixtures.as_deref(),
        )?);
        let events = fetcher.fetch(Table::Events).await?;
        if events.is_empty() {
            return Err(AppError::NoEvents);
        }

        candidate.save(&self.config_path)?;
        *self.config.write() = candidate;
        *self.fetcher.write() = Some(fetcher);

        self.log_update(
            UpdateStatus::Config,
            UpdateSource::Web,
            "record store credentials updated",
            events.len(),
            0,
        );
        info!(events = events.len(), "credentials updated");
        Ok(())
    }

    pub fn scheduler_running(&self) -> bool {
        self.scheduler_running.load(Ordering::SeqCst)
    }

    /// True for the caller that flips the flag; later callers get false.
    pub fn claim_scheduler(&self) -> bool {
        self.scheduler_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn release_scheduler(&self) {
        self.scheduler_running.store(false, Ordering::SeqCst);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::fixture_context;
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn refresh_publishes_writes_and_logs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = fixture_context(dir.path());
        assert!(ctx.snapshot().is_none());

        let snapshot = ctx.refresh(UpdateSource::Cli, true).await.unwrap();
        assert_eq!(snapshot.stats.total_events, 2);
        assert_eq!(snapshot.stats.unassigned_events, 1);
        assert!(Arc::ptr_eq(&snapshot, &ctx.snapshot().unwrap()));
        assert!(dir.path().join("out/calendar.xlsx").exists());

        let status = ctx.status();
        assert!(status.success);
        assert_eq!(status.total_updates, 1);

        let log = ctx.recent_updates(10).unwrap();
        assert_eq!(log[0].status, "SUCCESS");
        assert_eq!(log[0].events_processed, 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = fixture_context(dir.path());
        let first = ctx.refresh(UpdateSource::Cli, false).await.unwrap();

        fs::write(dir.path().join("fixtures/events.json"), "{ not json").unwrap();
        assert!(ctx.refresh(UpdateSource::Scheduler, true).await.is_err());

        assert!(Arc::ptr_eq(&first, &ctx.snapshot().unwrap()));
        let status = ctx.status();
        assert!(!status.success);
        assert_eq!(status.successful_updates, 1);
        assert_eq!(ctx.recent_updates(1).unwrap()[0].status, "ERROR");
    }

    #[tokio::test]
    async fn staff_query_uses_reservations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = fixture_context(dir.path());
        let query = StaffQuery::new(
            date::parse_date("2026-03-20").unwrap(),
            date::parse_date("2026-03-20").unwrap(),
            None,
        )
        .unwrap();

        let staff = ctx.available_staff(&query).await.unwrap();
        let names: Vec<_> = staff.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ben"]);
    }

    #[test]
    fn scheduler_can_only_be_claimed_once() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = fixture_context(dir.path());
        assert!(ctx.claim_scheduler());
        assert!(!ctx.claim_scheduler());
        ctx.release_scheduler();
        assert!(!ctx.scheduler_running());
    }

    #[tokio::test]
    async fn missing_credentials_stop_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::new(dir.path().join("c.yaml"), Config::default(), RuntimeOverrides::default());
        assert!(matches!(
            ctx.build_snapshot().await,
            Err(AppError::NotConfigured(_))
        ));
    }
}
