use crate::context::AppContext;
use crate::db::log::{UpdateSource, UpdateStatus, record_update};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{detail, info, success, warning};

/// Handle the `init` command
///
/// Creates the configuration file when missing and the SQLite database with
/// all pending migrations applied. An existing configuration is left as is.
pub fn handle(ctx: &AppContext) -> AppResult<()> {
    let cfg = ctx.config();
    let path = ctx.config_path();

    info("Initializing paddock…");

    if path.exists() {
        detail("config", format!("{} (kept)", path.display()));
    } else {
        cfg.save(path)?;
        detail("config", format!("{} (created)", path.display()));
    }

    let pool = DbPool::open(&cfg.database)?;
    detail("database", &cfg.database);

    if let Err(e) = record_update(
        &pool.conn,
        UpdateStatus::Config,
        UpdateSource::Cli,
        &format!("Database initialized at {}", cfg.database),
        0,
        0,
    ) {
        warning(format!("Failed to write update log: {e}"));
    }

    if !ctx.is_configured() {
        warning("No Airtable token yet: run `paddock config --set airtable.token=<TOKEN>`");
    }

    success("paddock initialization completed!");
    Ok(())
}
