use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::errors::AppResult;
use crate::models::Event;
use crate::ui::messages::{info, section};
use crate::utils::table::Table;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::List { unassigned, set } = cmd {
        let snapshot = ctx.build_snapshot().await?;

        let mut events: Vec<&Event> = match set.as_deref() {
            Some(name) => snapshot.events_in_category(name).collect(),
            None => snapshot.events.iter().collect(),
        };
        if *unassigned {
            events.retain(|e| e.needs_attention);
        }

        let title = if *unassigned { "Unassigned events" } else { "Events" };
        section(title, events.len());
        if events.is_empty() {
            info("No events match.");
            return Ok(());
        }

        print!("{}", events_table(&events).render());
    }
    Ok(())
}

fn events_table(events: &[&Event]) -> Table {
    let mut table = Table::new(vec![
        "Dates", "Days", "Event", "City", "SET", "Coordinator", "Staff",
    ]);
    for e in events {
        let staff = if e.is_unassigned() {
            "-".to_string()
        } else {
            e.staff_names().join(", ")
        };
        table.add_row(vec![
            e.date_range(),
            e.days_until.to_string(),
            e.name.clone(),
            e.city.clone(),
            e.category.clone(),
            e.coordinator.clone(),
            staff,
        ]);
    }
    table
}
