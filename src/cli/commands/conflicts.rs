use crate::context::AppContext;
use crate::errors::AppResult;
use crate::ui::messages::{section, success};
use crate::utils::date::display_short;
use crate::utils::table::Table;

pub async fn handle(ctx: &AppContext) -> AppResult<()> {
    let snapshot = ctx.build_snapshot().await?;

    section("Staffing conflicts", snapshot.conflicts.len());
    if snapshot.conflicts.is_empty() {
        success("No staff member is booked on overlapping events.");
        return Ok(());
    }

    let mut table = Table::new(vec!["Employee", "Event", "Overlaps with", "Overlap"]);
    for c in &snapshot.conflicts {
        table.add_row(vec![
            c.employee.clone(),
            format!("{} ({})", c.first.event_name, c.first.city),
            format!("{} ({})", c.second.event_name, c.second.city),
            format!("{} - {}", display_short(c.overlap_start), display_short(c.overlap_end)),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
