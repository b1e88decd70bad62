use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::AppResult;
use crate::export::sheets::Sheet;
use crate::models::Snapshot;

/// Full snapshot, pretty-printed.
pub(crate) fn export_json(snapshot: &Snapshot, path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(snapshot)?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

/// One sheet as csv, header row first.
pub(crate) fn export_csv(sheet: &Sheet, path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        wtr.write_record(row.iter().map(|c| c.value.to_text()))?;
    }
    wtr.flush()?;
    Ok(())
}
