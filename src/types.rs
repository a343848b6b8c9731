use rust_decimal::Decimal;
use serde::Serialize;

/// Where a record came from. Aggregation treats both the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Bulk,
    Scraped,
}

/// Canonical record of one player transfer, produced from either source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRecord {
    /// Two-digit season label such as `"10/11"`
    pub season: String,
    /// Empty when the source has no origin club
    pub from_club: String,
    pub to_club: String,
    /// `None` when the fee is missing or unparsable; never defaulted to zero
    pub fee: Option<Decimal>,
    pub player_id: String,
    pub player_name: String,
    pub source_kind: SourceKind,
}

impl TransferRecord {
    pub fn has_fee(&self) -> bool {
        self.fee.is_some()
    }
}
