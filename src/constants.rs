//! Defaults shared by the config layer, the scrape path and the CLI.
//! Localized values come in pairs: English first, German second.

// Bulk dataset
pub const TRANSFERS_TABLE: &str = "transfers.csv";
pub const DEFAULT_DATASET_DIR: &str = "data";
pub const MIN_SEASON_YEAR: i32 = 2010;

// Bulk column names
pub const BULK_SEASON: &str = "transfer_season";
pub const BULK_TO_CLUB: &str = "to_club_name";
pub const BULK_FROM_CLUB: &str = "from_club_name";
pub const BULK_FEE: &str = "transfer_fee";
pub const BULK_PLAYER_ID: &str = "player_id";
pub const BULK_PLAYER_NAME: &str = "player_name";

// Canonical columns written by the scraped-table normalization steps
pub const FROM_CLUB: &str = "from_club";
pub const TO_CLUB: &str = "to_club";
pub const PLAYER_ID: &str = "player_id";
pub const PLAYER_NAME: &str = "player_name";

// Scrape defaults
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const PLAYER_ID_MARKER: &str = "spieler";
pub const CONTAINER_SELECTOR: &str = "div.box, div.responsive-table, table";

pub const SEASON_MARKERS: &[&str] = &["Season", "Saison"];
pub const SUMMARY_MARKERS: &[&str] = &["Total transfer income", "Gesamtes Transfereinkommen"];
pub const FEE_COLUMNS: &[&str] = &["Fee", "Ablöse"];
pub const NOISE_COLUMNS: &[&str] = &[
    "Unnamed: 0",
    "Left",
    "Joined",
    "Abgebender Verein",
    "Aufnehmender Verein",
];
pub const FROM_CLUB_COLUMNS: &[&str] = &["Left.1", "Abgebender Verein.1"];
pub const TO_CLUB_COLUMNS: &[&str] = &["Joined.1", "Aufnehmender Verein.1"];

// Selector wildcards as shown in dropdowns
pub const ALL_SEASONS: &str = "All Seasons";
pub const ALL_TEAMS: &str = "All Teams";

pub fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
