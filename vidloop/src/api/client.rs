use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Proxy, RequestBuilder, Response};
use serde_json::Value;
use url::Url;

use super::{ApiError, VideoApi, VideoPage};

const CSRF_HEADER: &str = "X-CSRFToken";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Connection settings for the video API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Absolute URL the `videos/` endpoints are relative to.
    pub base_url: Url,
    /// Token sent with every delete request.
    pub csrf_token: Option<String>,
    pub proxy: Option<String>,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            csrf_token: None,
            proxy: None,
            timeout: None,
        }
    }
}

/**
    HTTP client for the paginated video API.

    Speaks three operations: list a page, resolve a playback URL, and
    delete a record. Non-success statuses are the only failure signal the
    backend gives, so no error bodies are parsed.
*/
pub struct ApiClient {
    http: Client,
    base_url: Url,
    csrf_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = http_client(config.proxy.as_deref(), config.timeout)?;

        Ok(Self {
            http,
            base_url: normalize_base(config.base_url)?,
            csrf_token: config.csrf_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `videos/`
    fn listing_endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("videos").push("");
        }
        url
    }

    /// `videos/<key>/`, with `key` escaped as a single path segment.
    fn video_endpoint(&self, key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("videos").push(key).push("");
        }
        url
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let response = request
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }

    async fn read_text(response: Response, url: &Url) -> Result<String, ApiError> {
        response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

impl VideoApi for ApiClient {
    async fn fetch_video_page(
        &self,
        after: Option<&str>,
        count: Option<u64>,
    ) -> Result<VideoPage, ApiError> {
        let mut url = self.listing_endpoint();
        // The backend ignores a lone cursor; the pair goes together.
        if let Some(after) = after {
            url.query_pairs_mut()
                .append_pair("after", after)
                .append_pair("count", &count.unwrap_or(0).to_string());
        }

        tracing::debug!(%url, "fetching video page");
        let response = self.send(self.http.get(url.clone()), &url).await?;
        let body = Self::read_text(response, &url).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn fetch_playback_url(&self, guid: &str) -> Result<Url, ApiError> {
        let url = self.video_endpoint(guid);
        let response = self.send(self.http.get(url.clone()), &url).await?;
        let body = Self::read_text(response, &url).await?;
        parse_playback_url(&body, &url)
    }

    async fn delete(&self, name: &str) -> Result<(), ApiError> {
        let url = self.video_endpoint(name);
        let mut request = self.http.delete(url.clone());
        match self.csrf_token {
            Some(ref token) => request = request.header(CSRF_HEADER, token),
            None => tracing::debug!(name, "deleting without a CSRF token"),
        }
        self.send(request, &url).await?;
        tracing::debug!(name, "deleted video record");
        Ok(())
    }
}

/// HTTP client with the optional proxy and per-request timeout applied.
pub fn http_client(proxy: Option<&str>, timeout: Option<Duration>) -> Result<Client, ApiError> {
    let mut builder = Client::builder();
    if let Some(proxy_url) = proxy {
        builder = builder.proxy(Proxy::all(proxy_url).map_err(ApiError::Client)?);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ApiError::Client)
}

/// Make sure relative joins land under the base path rather than replacing its last segment.
fn normalize_base(mut base: Url) -> Result<Url, ApiError> {
    if base.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(base.to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

/**
    Extract the media URL from a playback endpoint body.

    Accepts a JSON string, a JSON object with a `url` field, or the URL as
    raw text.
*/
fn parse_playback_url(body: &str, endpoint: &Url) -> Result<Url, ApiError> {
    let trimmed = body.trim();
    let candidate = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => map
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Decode {
                url: endpoint.to_string(),
                reason: "object without a 'url' field".to_string(),
            })?,
        _ => trimmed.to_string(),
    };

    Url::parse(&candidate).map_err(|_| ApiError::InvalidPlaybackUrl(candidate))
}
