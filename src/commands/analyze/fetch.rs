use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use tracing::{debug, error};

use super::document::PageDocument;

pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Option<PageDocument>;
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub request_delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub use_system_proxy: bool,
}

impl FetchConfig {
    pub fn new(
        request_delay_secs: f64,
        timeout_secs: u64,
        user_agent: &str,
        use_system_proxy: bool,
    ) -> Result<Self> {
        let Ok(request_delay) = Duration::try_from_secs_f64(request_delay_secs) else {
            bail!("request delay must be finite and non-negative, got {request_delay_secs}");
        };
        if timeout_secs == 0 {
            bail!("timeout must be at least one second");
        }

        Ok(Self {
            request_delay,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: user_agent.to_string(),
            use_system_proxy,
        })
    }
}

pub struct HttpFetcher {
    client: Client,
    request_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            request_delay: config.request_delay,
        })
    }

    fn try_fetch(&self, url: &str) -> Result<PageDocument> {
        if !self.request_delay.is_zero() {
            thread::sleep(self.request_delay);
        }

        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("unsuccessful status: {url}"))?;
        let body = response
            .text()
            .with_context(|| format!("failed to read response body: {url}"))?;
        debug!(url = %url, bytes = body.len(), "fetched page");

        PageDocument::parse(&body)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<PageDocument> {
        match self.try_fetch(url) {
            Ok(document) => Some(document),
            Err(err) => {
                error!(url = %url, error = %format!("{err:#}"), "failed to fetch page");
                None
            }
        }
    }
}
