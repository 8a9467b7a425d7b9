//! Plain-text parking history report.

use crate::error::ServiceResult;
use crate::table::Table;
use aptpark_storage::HistoryEntry;
use std::path::{Path, PathBuf};
use tracing::info;

/// Timestamp layout of every table and report
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const HISTORY_COLUMNS: [(&str, usize); 11] = [
    ("Sr.", 4),
    ("Owner Name", 20),
    ("Slot ID", 8),
    ("Vehicle No.", 15),
    ("Brand", 12),
    ("Type", 12),
    ("Park Type", 10),
    ("Time In", 22),
    ("Time Out", 22),
    ("Total Hrs", 10),
    ("Charge(Rs.)", 12),
];

/// History rows laid out in the report's columns.
pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new(&HISTORY_COLUMNS);

    for (index, entry) in entries.iter().enumerate() {
        let record = &entry.record;
        table.push_row([
            (index + 1).to_string(),
            entry.owner_display().to_string(),
            record.slot_id.to_string(),
            record.vehicle_number.clone(),
            record.vehicle_brand.clone(),
            record.vehicle_type.to_string(),
            record.parking_type().to_string(),
            record
                .time_in
                .map_or_else(|| "-".to_string(), |t| t.format(TIME_FORMAT).to_string()),
            record.time_out.format(TIME_FORMAT).to_string(),
            format!("{:.2}", record.total_hours),
            format!("{:.2}", record.charge_amount),
        ]);
    }

    table
}

/// Write the history table to `path`, replacing any existing file.
///
/// Returns the absolute path of the written file.
///
/// # Errors
///
/// Fails when the file cannot be written or its path cannot be resolved.
pub fn write_history_report(entries: &[HistoryEntry], path: &Path) -> ServiceResult<PathBuf> {
    std::fs::write(path, history_table(entries).render())?;
    let absolute = std::fs::canonicalize(path)?;

    info!(path = %absolute.display(), rows = entries.len(), "History report written");
    Ok(absolute)
}
