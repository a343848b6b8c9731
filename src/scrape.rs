//! Player page scraping: fetch, locate the transfer table, normalize, cache by URL.

use crate::config::ScrapeConfig;
use crate::error::{Result, TransferError};
use crate::fetch::PageFetcher;
use crate::locator::{locate, DocumentQuery, HtmlDocument};
use crate::normalize::{player_id_from_url, PlayerIdentity, ScrapedNormalizer};
use crate::types::TransferRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument, warn};

/// What the presentation layer gets back from [`Scraper::lookup`]: the records, or an
/// empty list plus a message describing why there are none.
#[derive(Debug, Clone, Default)]
pub struct ScrapeView {
    pub records: Arc<Vec<TransferRecord>>,
    pub message: Option<String>,
}

impl ScrapeView {
    pub fn is_failure(&self) -> bool {
        self.message.is_some()
    }
}

pub struct Scraper<F: PageFetcher> {
    fetcher: F,
    config: ScrapeConfig,
    normalizer: ScrapedNormalizer,
    cache: Mutex<HashMap<String, Arc<Vec<TransferRecord>>>>,
}

impl<F: PageFetcher> Scraper<F> {
    pub fn new(fetcher: F, config: ScrapeConfig) -> Self {
        Self {
            fetcher,
            normalizer: ScrapedNormalizer::new(config.clone()),
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Records for `url`. Successful results are cached per URL; failures are not, so
    /// a later call fetches again.
    #[instrument(skip(self))]
    pub fn scrape(&self, url: &str) -> Result<Arc<Vec<TransferRecord>>> {
        if let Some(hit) = self.cached(url) {
            debug!("Cache hit");
            return Ok(hit);
        }

        let player_id = player_id_from_url(url, &self.config.player_id_marker)?;
        let body = self.fetcher.fetch(url)?;
        let records = Arc::new(self.extract(&player_id, &body)?);

        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(url.to_string(), Arc::clone(&records));
        Ok(records)
    }

    /// Runs everything after the fetch on an already downloaded page.
    pub fn extract(&self, player_id: &str, body: &str) -> Result<Vec<TransferRecord>> {
        let document = HtmlDocument::parse(body, &self.config.container_selector)?;
        let name = document.primary_heading().ok_or(TransferError::MissingHeading)?;
        let player = PlayerIdentity {
            id: player_id.to_string(),
            name,
        };

        let located = locate(&document, &self.config.season_markers)?;
        info!(
            "Transfer table found in container {} via marker '{}'",
            located.position, located.marker
        );
        self.normalizer.normalize(located.cells, &player)
    }

    /// Boundary form of [`Scraper::scrape`]: never fails, converts any error into a
    /// message and an empty record list.
    pub fn lookup(&self, url: &str) -> ScrapeView {
        match self.scrape(url) {
            Ok(records) => ScrapeView {
                records,
                message: None,
            },
            Err(e) => {
                if e.is_page_failure() {
                    warn!("Scrape of {} failed: {}", url, e);
                } else {
                    error!("Scrape of {} failed: {}", url, e);
                }
                ScrapeView {
                    records: Arc::new(Vec::new()),
                    message: Some(failure_message(&e)),
                }
            }
        }
    }

    pub fn cached(&self, url: &str) -> Option<Arc<Vec<TransferRecord>>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(url)
            .cloned()
    }
}

/// User-facing text for a scrape failure.
pub fn failure_message(error: &TransferError) -> String {
    match error {
        TransferError::Http(e) => format!("Error fetching the page: {}", e),
        TransferError::Fetch { status, .. } => format!("Error fetching the page: HTTP status {}", status),
        TransferError::InvalidUrl(detail) => format!("Not a usable player URL: {}", detail),
        TransferError::MissingHeading => "Could not find the player name on the page.".to_string(),
        TransferError::TableNotFound { .. } => "Could not find the transfer history table on the page.".to_string(),
        TransferError::EmptyTable => "The transfer history table is empty.".to_string(),
        other => format!("Scrape failed: {}", other),
    }
}
