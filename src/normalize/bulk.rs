use super::fee::parse_bulk_fee;
use crate::constants::{BULK_FEE, BULK_FROM_CLUB, BULK_PLAYER_ID, BULK_PLAYER_NAME, BULK_SEASON, BULK_TO_CLUB};
use crate::table::{RawTable, Row};
use crate::types::{SourceKind, TransferRecord};
use tracing::{debug, info};

/// Normalizer for rows of the bulk `transfers.csv` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct BulkNormalizer;

impl BulkNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// `None` when the season cell is missing or blank. An unparsable fee is kept as an
    /// absent fee rather than dropping the row.
    pub fn normalize_row(&self, row: &Row) -> Option<TransferRecord> {
        let season = row.get(BULK_SEASON).map(str::trim).filter(|s| !s.is_empty())?;
        let text = |column: &str| row.get(column).unwrap_or_default().trim().to_string();

        Some(TransferRecord {
            season: season.to_string(),
            from_club: text(BULK_FROM_CLUB),
            to_club: text(BULK_TO_CLUB),
            fee: row.get(BULK_FEE).and_then(parse_bulk_fee),
            player_id: text(BULK_PLAYER_ID),
            player_name: text(BULK_PLAYER_NAME),
            source_kind: SourceKind::Bulk,
        })
    }

    pub fn normalize(&self, table: &RawTable) -> Vec<TransferRecord> {
        let records: Vec<TransferRecord> = table.rows.iter().filter_map(|row| self.normalize_row(row)).collect();
        let without_fee = records.iter().filter(|r| !r.has_fee()).count();
        debug!("{} bulk records have no usable fee", without_fee);
        info!(
            "Normalized {} of {} bulk rows ({} dropped for missing season)",
            records.len(),
            table.rows.len(),
            table.rows.len() - records.len()
        );
        records
    }
}
