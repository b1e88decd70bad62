use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::staff::StaffQuery;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, section};
use crate::utils::date::{display, parse_date};
use crate::utils::table::Table;

pub async fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Staff { from, to, role } = cmd {
        let start = parse_date(from).ok_or_else(|| AppError::InvalidDate(from.clone()))?;
        let end = parse_date(to).ok_or_else(|| AppError::InvalidDate(to.clone()))?;
        let query = StaffQuery::new(start, end, role.clone())?;

        let staff = ctx.available_staff(&query).await?;

        section(
            format!("Available staff {} - {}", display(start), display(end)),
            staff.len(),
        );
        if staff.is_empty() {
            info("Nobody is free in this range.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            "Name", "Role", "Reservations", "SET experience", "Last booked",
        ]);
        for s in &staff {
            table.add_row(vec![
                s.name.clone(),
                s.role.clone(),
                s.total_reservations.to_string(),
                s.set_experience.join(", "),
                s.last_reservation.map(display).unwrap_or_else(|| "-".to_string()),
            ]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
