use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Args;
use url::Url;

use crate::api::{ApiClient, ApiConfig, http_client};
use crate::host_page::HostPage;

/// Where the API lives and how to reach it.
#[derive(Args, Debug, Default)]
pub struct ApiArgs {
    /// Base URL of the video API (the `videos/` endpoints live under it)
    #[arg(short, long)]
    pub base_url: Option<Url>,

    /// Hosting page to read the CSRF token (and API base) from
    #[arg(long)]
    pub page: Option<Url>,

    /// CSRF token for delete requests; overrides the one on the page
    #[arg(long)]
    pub csrf_token: Option<String>,

    /// HTTP or SOCKS proxy for all requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// Per-request timeout in seconds (transport default when unset)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ApiArgs {
    /// Resolve the API configuration, reading the hosting page when one is given.
    pub async fn config(&self) -> Result<ApiConfig> {
        let host = match self.page {
            Some(ref page_url) => {
                let client = http_client(self.proxy.as_deref(), self.timeout())?;
                let host = HostPage::fetch(&client, page_url).await?;
                tracing::info!(page = %page_url, "read settings from host page");
                Some(host)
            }
            None => None,
        };

        let base_url = self
            .base_url
            .clone()
            .or_else(|| host.as_ref().and_then(|h| h.api_base.clone()))
            .ok_or_else(|| {
                anyhow!("no API base URL: pass --base-url or a --page with an api-base meta tag")
            })?;

        let mut config = ApiConfig::new(base_url);
        config.csrf_token = self
            .csrf_token
            .clone()
            .or_else(|| host.map(|h| h.csrf_token));
        config.proxy = self.proxy.clone();
        config.timeout = self.timeout();

        if config.csrf_token.is_none() {
            tracing::warn!("no CSRF token configured, deletes may be rejected");
        }

        Ok(config)
    }

    pub async fn connect(&self) -> Result<ApiClient> {
        let config = self.config().await?;
        let client = ApiClient::new(config)?;
        tracing::info!(base = %client.base_url(), "using video API");
        Ok(client)
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
