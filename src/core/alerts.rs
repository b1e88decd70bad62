//! Operational alerts: material shipment and flight booking deadlines.

use chrono::Duration;
use tracing::info;

use crate::models::{Alert, Event, FlightAlert, FlightLevel, MaterialAlert, MaterialLevel, Region};

/// Material leaves this many days before the event starts.
pub const MATERIAL_LEAD_DAYS: i64 = 5;
pub const MATERIAL_URGENT_DAYS: i64 = 7;
pub const MATERIAL_WARNING_DAYS: i64 = 14;

pub const FLIGHT_THRESHOLD_EUROPE_DAYS: i64 = 30;
pub const FLIGHT_THRESHOLD_OUTSIDE_DAYS: i64 = 60;

/// Lower-case words identifying a European venue, matched on word boundaries.
const EUROPEAN_PLACES: &[&str] = &[
    // countries
    "spain", "españa", "espana", "france", "italy", "italia", "germany", "deutschland",
    "belgium", "belgique", "netherlands", "portugal", "united kingdom", "scotland",
    "ireland", "austria", "hungary", "monaco", "poland", "czech",
    "slovakia", "switzerland", "sweden", "finland", "norway", "denmark", "greece",
    "croatia", "slovenia", "romania", "estonia", "latvia", "lithuania", "czechia",
    // cities and circuits
    "barcelona", "montmeló", "montmelo", "madrid", "valencia", "cheste", "jerez",
    "aragón", "aragon", "alcañiz", "alcaniz", "navarra", "los arcos", "motorland",
    "le mans", "paris", "magny-cours", "le castellet", "paul ricard", "nogaro",
    "monza", "imola", "mugello", "misano", "vallelunga", "spa", "spa-francorchamps", "francorchamps",
    "stavelot", "zolder", "zandvoort", "assen", "portimão", "portimao", "estoril",
    "algarve", "silverstone", "brands hatch", "donington", "snetterton", "nürburg",
    "nurburg", "nürburgring", "nurburgring", "hockenheim", "hockenheimring", "spielberg", "red bull ring", "hungaroring", "budapest",
    "monte carlo", "brno", "slovakiaring", "poznan", "anderstorp",
];

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

pub fn is_european(place: &str) -> bool {
    let lower = place.to_lowercase();
    !lower.trim().is_empty() && EUROPEAN_PLACES.iter().any(|p| contains_word(&lower, p))
}

/// Classified by city; the label is only consulted when the city is blank.
pub fn region_of(event: &Event) -> Region {
    let place = if event.city.trim().is_empty() {
        &event.label
    } else {
        &event.city
    };
    if is_european(place) {
        Region::Europe
    } else {
        Region::OutsideEurope
    }
}

pub fn material_alert(event: &Event) -> Option<MaterialAlert> {
    let days_to_departure = event.days_until - MATERIAL_LEAD_DAYS;
    let level = if days_to_departure <= MATERIAL_URGENT_DAYS {
        MaterialLevel::Urgent
    } else if days_to_departure <= MATERIAL_WARNING_DAYS {
        MaterialLevel::Warning
    } else {
        return None;
    };

    Some(MaterialAlert {
        level,
        departure_date: event.from_date - Duration::days(MATERIAL_LEAD_DAYS),
        days_to_departure,
    })
}

pub fn flight_alert(event: &Event) -> Option<FlightAlert> {
    let region = region_of(event);
    let threshold_days = match region {
        Region::Europe => FLIGHT_THRESHOLD_EUROPE_DAYS,
        Region::OutsideEurope => FLIGHT_THRESHOLD_OUTSIDE_DAYS,
    };

    let level = if event.days_until <= threshold_days / 2 {
        FlightLevel::Critical
    } else if event.days_until <= threshold_days {
        FlightLevel::Warning
    } else {
        return None;
    };

    Some(FlightAlert {
        level,
        region,
        threshold_days,
    })
}

/// Alerts for every event that has not started yet, soonest first.
pub fn generate(events: &[Event]) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = events
        .iter()
        .filter(|e| e.days_until >= 0)
        .filter_map(|event| {
            let material = material_alert(event);
            let flight = flight_alert(event);
            if material.is_none() && flight.is_none() {
                return None;
            }
            Some(Alert {
                event_id: event.id.clone(),
                event_name: event.name.clone(),
                city: event.city.clone(),
                from_date: event.from_date,
                days_until: event.days_until,
                material,
                flight,
            })
        })
        .collect();

    alerts.sort_by_key(|a| a.days_until);
    info!(count = alerts.len(), "operational alerts generated");
    alerts
}
