use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum HostPageError {
    #[error("failed to fetch host page {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("host page {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("host page {0} carries no CSRF token")]
    MissingToken(String),
}

/**
    Values the hosting page hands to the player at startup.

    The CSRF token comes from `<meta name="csrf-token">` or, failing
    that, Django's `csrfmiddlewaretoken` form input. The API base comes
    from `<meta name="api-base">`, resolved against the page URL.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPage {
    pub csrf_token: String,
    pub api_base: Option<Url>,
}

impl HostPage {
    pub async fn fetch(client: &reqwest::Client, page_url: &Url) -> Result<Self, HostPageError> {
        let response = client
            .get(page_url.clone())
            .send()
            .await
            .map_err(|source| HostPageError::Fetch {
                url: page_url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(HostPageError::Status {
                url: page_url.to_string(),
                status: response.status(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| HostPageError::Fetch {
                url: page_url.to_string(),
                source,
            })?;

        Self::parse(&body, page_url)
    }

    pub fn parse(html: &str, page_url: &Url) -> Result<Self, HostPageError> {
        let document = Html::parse_document(html);

        let csrf_token = first_attr(&document, r#"meta[name="csrf-token"]"#, "content")
            .or_else(|| first_attr(&document, r#"input[name="csrfmiddlewaretoken"]"#, "value"))
            .ok_or_else(|| HostPageError::MissingToken(page_url.to_string()))?;

        let api_base = first_attr(&document, r#"meta[name="api-base"]"#, "content")
            .and_then(|base| page_url.join(&base).ok());

        Ok(Self {
            csrf_token,
            api_base,
        })
    }
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
