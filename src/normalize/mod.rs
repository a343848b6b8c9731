//! Turns raw tables from either source into [`TransferRecord`]s.
//!
//! Scraped tables go through a list of [`NormalizeStep`]s before record extraction.
//! Every step is idempotent and does nothing when the column it expects is missing,
//! because the scraped schema is not under our control.

pub mod bulk;
pub mod fee;
pub mod scraped;

use crate::season;
use crate::table::RawTable;
use crate::types::TransferRecord;
use tracing::{debug, info};

pub use bulk::BulkNormalizer;
pub use scraped::{player_id_from_url, PlayerIdentity, ScrapedNormalizer};

/// One best-effort transformation over a raw table.
pub trait NormalizeStep {
    fn name(&self) -> &'static str;
    fn apply(&self, table: &mut RawTable);
}

/// Drops footer rows whose season cell is exactly one of the summary markers.
pub struct DropSummaryRows {
    pub season_columns: Vec<String>,
    pub markers: Vec<String>,
}

impl NormalizeStep for DropSummaryRows {
    fn name(&self) -> &'static str {
        "drop_summary_rows"
    }

    fn apply(&self, table: &mut RawTable) {
        let Some(column) = self.season_columns.iter().find(|c| table.has_column(c)) else {
            debug!("No season column present, summary rows left in place");
            return;
        };
        let before = table.rows.len();
        table.rows.retain(|row| match row.get(column) {
            Some(value) => !self.markers.iter().any(|m| m == value),
            None => true,
        });
        debug!("Dropped {} summary rows", before - table.rows.len());
    }
}

/// Removes index artifacts and icon-only duplicate columns.
pub struct DropColumns {
    pub columns: Vec<String>,
}

impl NormalizeStep for DropColumns {
    fn name(&self) -> &'static str {
        "drop_columns"
    }

    fn apply(&self, table: &mut RawTable) {
        for column in &self.columns {
            if table.drop_column(column) {
                debug!("Dropped column '{}'", column);
            }
        }
    }
}

/// Renames the first present source column onto `target`.
pub struct RenameColumns {
    pub sources: Vec<String>,
    pub target: String,
}

impl NormalizeStep for RenameColumns {
    fn name(&self) -> &'static str {
        "rename_columns"
    }

    fn apply(&self, table: &mut RawTable) {
        if table.has_column(&self.target) {
            return;
        }
        if let Some(source) = self.sources.iter().find(|s| table.has_column(s)) {
            table.rename_column(source, &self.target);
            debug!("Renamed '{}' to '{}'", source, self.target);
        }
    }
}

/// Stamps the same value into `column` on every row.
pub struct AttachColumn {
    pub column: String,
    pub value: String,
}

impl NormalizeStep for AttachColumn {
    fn name(&self) -> &'static str {
        "attach_column"
    }

    fn apply(&self, table: &mut RawTable) {
        table.set_column(&self.column, &self.value);
    }
}

pub fn apply_steps(table: &mut RawTable, steps: &[Box<dyn NormalizeStep>]) {
    for step in steps {
        step.apply(table);
        debug!("Step {} done, {} rows, columns {:?}", step.name(), table.rows.len(), table.headers);
    }
}

/// Keeps records whose season starts in or after `min_year`. Unreadable seasons are dropped.
pub fn retain_from_year(records: Vec<TransferRecord>, min_year: i32) -> Vec<TransferRecord> {
    let before = records.len();
    let kept: Vec<TransferRecord> = records
        .into_iter()
        .filter(|r| season::is_at_or_after(&r.season, min_year))
        .collect();
    info!("Kept {} of {} records from {} onwards", kept.len(), before, min_year);
    kept
}
