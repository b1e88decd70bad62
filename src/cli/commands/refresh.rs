use crate::context::AppContext;
use crate::db::log::UpdateSource;
use crate::errors::AppResult;
use crate::ui::messages::{detail, success, warning};

pub async fn handle(ctx: &AppContext) -> AppResult<()> {
    ctx.ensure_configured()?;
    let snapshot = ctx.refresh(UpdateSource::Cli, true).await?;
    let stats = &snapshot.stats;

    success(format!("Calendar updated at {}", snapshot.last_updated()));
    detail("events", stats.total_events);
    detail("confirmed", stats.confirmed_events);
    detail("unassigned", stats.unassigned_events);
    detail("reservations", stats.total_reservations);
    detail("conflicts", stats.conflicts);
    detail("alerts", stats.alerts);
    detail("workbook", &ctx.config().export.workbook_path);

    let status = ctx.status();
    if status.message.contains("workbook not written") {
        warning(status.message);
    }
    Ok(())
}
