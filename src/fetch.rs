use crate::config::ScrapeConfig;
use crate::error::{Result, TransferError};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Given a URL, returns the raw page content or a fetch failure.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Single blocking GET with a browser-like User-Agent and a fixed timeout. No retries.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ScrapeConfig) -> Result<Self> {
        Self::new(&config.user_agent, config.timeout())
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching page");
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
