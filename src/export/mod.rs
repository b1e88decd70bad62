mod excel_date;
mod fs_utils;
mod json_csv;
pub mod sheets;
mod xlsx;

use clap::ValueEnum;
use std::path::Path;
use tracing::info;

use crate::errors::AppResult;
use crate::models::Snapshot;
use crate::ui::messages::{self, success};
use fs_utils::{ensure_parent, ensure_writable};

pub use sheets::{Sheet, render_sheets};

/// Common completion message for exports.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// User-facing export of the current snapshot.
    pub fn export(snapshot: &Snapshot, format: ExportFormat, file: &str, force: bool) -> AppResult<()> {
        let path = Path::new(file);
        ensure_writable(path, force)?;
        ensure_parent(path)?;

        messages::info(format!(
            "Exporting to {}: {}",
            format.as_str().to_uppercase(),
            path.display()
        ));

        match format {
            ExportFormat::Xlsx => xlsx::write_xlsx(&render_sheets(snapshot), path)?,
            ExportFormat::Csv => json_csv::export_csv(&sheets::calendar_sheet(snapshot), path)?,
            ExportFormat::Json => json_csv::export_json(snapshot, path)?,
        }

        notify_export_success(&format.as_str().to_uppercase(), path);
        Ok(())
    }
}

/// Write the workbook after a refresh. Silent on stdout.
pub fn publish_workbook(snapshot: &Snapshot, path: &Path) -> AppResult<()> {
    ensure_parent(path)?;
    xlsx::write_xlsx(&render_sheets(snapshot), path)?;
    info!(path = %path.display(), "workbook written");
    Ok(())
}

/// Workbook bytes for download.
pub fn workbook_bytes(snapshot: &Snapshot) -> AppResult<Vec<u8>> {
    xlsx::xlsx_bytes(&render_sheets(snapshot))
}
