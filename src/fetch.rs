use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::http_client::browser_client;

/// Source of raw school pages, keyed by the external school id.
pub trait SchoolPageSource {
    /// Returns the page body, or an error describing the status or transport failure.
    fn fetch_page(&self, external_id: &str) -> Result<String>;
}

pub struct HttpSchoolPages {
    client: Client,
    config: HistoryConfig,
}

impl HttpSchoolPages {
    pub fn new(config: &HistoryConfig) -> Result<Self> {
        Ok(Self {
            client: browser_client(config.request_timeout)?,
            config: config.clone(),
        })
    }
}

impl SchoolPageSource for HttpSchoolPages {
    fn fetch_page(&self, external_id: &str) -> Result<String> {
        if external_id.trim().is_empty() {
            return Err(anyhow!("empty external id"));
        }
        let url = self.config.school_url(external_id);
        debug!(%url, "fetching school page");

        let resp = match self.client.get(&url).send() {
            Ok(resp) => resp,
            Err(err) => {
                warn!(%url, error = %err, "request failed");
                return Err(anyhow!(err).context(format!("request failed for {url}")));
            }
        };
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            warn!(%url, %status, "unexpected http status");
            return Err(anyhow!("http {status} for {url}"));
        }
        resp.text()
            .with_context(|| format!("failed reading body for {url}"))
    }
}
