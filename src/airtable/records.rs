//! Raw Airtable pages and the typed field sets read from them.
//!
//! Lookup and link fields arrive as JSON arrays; single-line text may arrive
//! as a string or, for formula/lookup columns, as an array. The helpers
//! below accept both shapes so that only genuinely malformed rows fail.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventFields {
    #[serde(rename = "From", deserialize_with = "text")]
    pub from: Option<String>,
    #[serde(rename = "To", deserialize_with = "text")]
    pub to: Option<String>,
    #[serde(rename = "EVENT NAME", deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(rename = "EVENT", deserialize_with = "text")]
    pub label: Option<String>,
    #[serde(rename = "EVENT CITY", deserialize_with = "text")]
    pub city: Option<String>,
    #[serde(
        rename = "CAMPEONATO-CIRCUITO-ENTIDAD (from CHAMPIONSHIP)",
        deserialize_with = "string_list"
    )]
    pub championship: Vec<String>,
    #[serde(rename = "STATUS", deserialize_with = "text")]
    pub status: Option<String>,
    #[serde(rename = "CONFIRMED")]
    pub confirmed: bool,
    #[serde(rename = "Name (from Event Coordinator)", deserialize_with = "string_list")]
    pub coordinator: Vec<String>,
    #[serde(rename = "PEOPLE RESERVED", deserialize_with = "string_list")]
    pub people_reserved: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReservationFields {
    #[serde(rename = "EVENT", deserialize_with = "string_list")]
    pub events: Vec<String>,
    #[serde(rename = "Employee directory", deserialize_with = "string_list")]
    pub employees: Vec<String>,
    #[serde(rename = "FROM", deserialize_with = "text")]
    pub from: Option<String>,
    #[serde(rename = "TO", deserialize_with = "text")]
    pub to: Option<String>,
    #[serde(rename = "REMOTE")]
    pub remote: bool,
    #[serde(rename = "Name (from Employee directory)", deserialize_with = "string_list")]
    pub employee_names: Vec<String>,
    #[serde(rename = "Name (from EVENT)", deserialize_with = "string_list")]
    pub event_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeFields {
    #[serde(rename = "Name", deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(rename = "EMAIL", deserialize_with = "text")]
    pub email: Option<String>,
    #[serde(rename = "POSITION", deserialize_with = "text")]
    pub position: Option<String>,
}

/// A record id with its decoded fields.
#[derive(Debug, Clone)]
pub struct Typed<F> {
    pub id: String,
    pub fields: F,
}

/// Decode every record of a table, skipping (and logging) malformed rows.
pub fn decode<F: DeserializeOwned>(table: &str, records: &[RawRecord]) -> Vec<Typed<F>> {
    records
        .iter()
        .filter_map(|record| {
            match serde_json::from_value::<F>(Value::Object(record.fields.clone())) {
                Ok(fields) => Some(Typed {
                    id: record.id.clone(),
                    fields,
                }),
                Err(e) => {
                    warn!(table, record = %record.id, error = %e, "skipping malformed record");
                    None
                }
            }
        })
        .collect()
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Array(items)) => items.into_iter().find_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected text, found {other}"
            )));
        }
    })
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s]),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(serde::de::Error::custom(format!(
                    "expected a list of strings, found {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a list of strings, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: &str, fields: Value) -> RawRecord {
        serde_json::from_value(json!({ "id": id, "fields": fields })).unwrap()
    }

    #[test]
    fn event_fields_accept_lookup_arrays() {
        let records = vec![raw(
            "rec1",
            json!({
                "From": "2026-05-01",
                "To": "2026-05-03",
                "EVENT NAME": "Spa 6h",
                "EVENT": ["WEC - Spa"],
                "CAMPEONATO-CIRCUITO-ENTIDAD (from CHAMPIONSHIP)": ["FIA WEC"],
                "CONFIRMED": true,
                "PEOPLE RESERVED": ["emp1", "emp2"]
            }),
        )];

        let typed = decode::<EventFields>("events", &records);
        assert_eq!(typed.len(), 1);
        let f = &typed[0].fields;
        assert_eq!(f.label.as_deref(), Some("WEC - Spa"));
        assert_eq!(f.championship, vec!["FIA WEC"]);
        assert_eq!(f.people_reserved.len(), 2);
        assert!(f.confirmed);
        assert!(f.coordinator.is_empty());
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let records = vec![
            raw("ok", json!({ "FROM": "2026-05-01", "REMOTE": true })),
            raw("bad", json!({ "REMOTE": "yes" })),
            raw("bad2", json!({ "EVENT": [{"id": 1}] })),
        ];

        let typed = decode::<ReservationFields>("reservations", &records);
        assert_eq!(typed.len(), 1);
        assert_eq!(typed[0].id, "ok");
        assert!(typed[0].fields.remote);
    }

    #[test]
    fn empty_fields_decode_to_defaults() {
        let records = vec![raw("rec", json!({}))];
        let typed = decode::<EmployeeFields>("employees", &records);
        assert!(typed[0].fields.name.is_none());
    }
}
