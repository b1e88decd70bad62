use crate::context::AppContext;
use crate::errors::AppResult;
use crate::models::Alert;
use crate::ui::messages::{section, success};
use crate::utils::date::display;
use crate::utils::table::Table;

fn material_cell(alert: &Alert) -> String {
    alert
        .material
        .as_ref()
        .map(|m| format!("{} ship by {}", m.level, display(m.departure_date)))
        .unwrap_or_else(|| "-".to_string())
}

fn flight_cell(alert: &Alert) -> String {
    alert
        .flight
        .as_ref()
        .map(|f| format!("{} {} (<{}d)", f.level, f.region, f.threshold_days))
        .unwrap_or_else(|| "-".to_string())
}

pub async fn handle(ctx: &AppContext) -> AppResult<()> {
    let snapshot = ctx.build_snapshot().await?;

    section("Operational alerts", snapshot.alerts.len());
    if snapshot.alerts.is_empty() {
        success("Nothing to ship or book right now.");
        return Ok(());
    }

    let mut table = Table::new(vec!["Days", "Event", "City", "Start", "Material", "Flights"]);
    for a in &snapshot.alerts {
        table.add_row(vec![
            a.days_until.to_string(),
            a.event_name.clone(),
            a.city.clone(),
            display(a.from_date),
            material_cell(a),
            flight_cell(a),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
