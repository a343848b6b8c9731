use super::fee::parse_market_fee;
use super::{apply_steps, AttachColumn, DropColumns, DropSummaryRows, NormalizeStep, RenameColumns};
use crate::config::ScrapeConfig;
use crate::constants::{FROM_CLUB, PLAYER_ID, PLAYER_NAME, TO_CLUB};
use crate::error::{Result, TransferError};
use crate::locator::TableCells;
use crate::table::{RawTable, Row};
use crate::types::{SourceKind, TransferRecord};
use reqwest::Url;
use tracing::{debug, info};

/// Who a scraped page is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub id: String,
    pub name: String,
}

/// Player id from a profile URL: the path segment after `marker`, falling back to the
/// last non-empty segment.
pub fn player_id_from_url(url: &str, marker: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| TransferError::InvalidUrl(format!("{}: {}", url, e)))?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let after_marker = segments
        .iter()
        .position(|seg| *seg == marker)
        .and_then(|idx| segments.get(idx + 1));

    after_marker
        .or_else(|| segments.last())
        .map(|seg| seg.to_string())
        .ok_or_else(|| TransferError::InvalidUrl(format!("{}: no path segment to use as player id", url)))
}

/// Normalizes a located transfer-history table into records.
pub struct ScrapedNormalizer {
    config: ScrapeConfig,
}

impl ScrapedNormalizer {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// The configured step sequence for one page.
    pub fn steps(&self, player: &PlayerIdentity) -> Vec<Box<dyn NormalizeStep>> {
        vec![
            Box::new(DropSummaryRows {
                season_columns: self.config.season_columns.clone(),
                markers: self.config.summary_markers.clone(),
            }),
            Box::new(DropColumns {
                columns: self.config.noise_columns.clone(),
            }),
            Box::new(RenameColumns {
                sources: self.config.from_club_columns.clone(),
                target: FROM_CLUB.to_string(),
            }),
            Box::new(RenameColumns {
                sources: self.config.to_club_columns.clone(),
                target: TO_CLUB.to_string(),
            }),
            Box::new(AttachColumn {
                column: PLAYER_ID.to_string(),
                value: player.id.clone(),
            }),
            Box::new(AttachColumn {
                column: PLAYER_NAME.to_string(),
                value: player.name.clone(),
            }),
        ]
    }

    /// Builds the named-column table and runs the steps over it. The result is what a
    /// caller would inspect as the scraped table.
    pub fn normalize_table(&self, cells: TableCells, player: &PlayerIdentity) -> Result<RawTable> {
        let mut table = RawTable::from_cells(cells.header, cells.body);
        if table.is_empty() {
            return Err(TransferError::EmptyTable);
        }
        debug!("Parsed table with columns {:?}", table.headers);

        apply_steps(&mut table, &self.steps(player));
        Ok(table)
    }

    /// Rows without a season cell are dropped; everything else is kept.
    pub fn to_records(&self, table: &RawTable) -> Vec<TransferRecord> {
        table.rows.iter().filter_map(|row| self.row_to_record(row)).collect()
    }

    pub fn normalize(&self, cells: TableCells, player: &PlayerIdentity) -> Result<Vec<TransferRecord>> {
        let table = self.normalize_table(cells, player)?;
        let records = self.to_records(&table);
        info!(
            "Normalized {} transfers for player {} ({})",
            records.len(),
            player.name,
            player.id
        );
        Ok(records)
    }

    fn row_to_record(&self, row: &Row) -> Option<TransferRecord> {
        let season = row.get_any(&self.config.season_columns)?.trim();
        if season.is_empty() {
            return None;
        }

        Some(TransferRecord {
            season: season.to_string(),
            from_club: row.get(FROM_CLUB).unwrap_or_default().to_string(),
            to_club: row.get(TO_CLUB).unwrap_or_default().to_string(),
            fee: row.get_any(&self.config.fee_columns).and_then(parse_market_fee),
            player_id: row.get(PLAYER_ID).unwrap_or_default().to_string(),
            player_name: row.get(PLAYER_NAME).unwrap_or_default().to_string(),
            source_kind: SourceKind::Scraped,
        })
    }
}
