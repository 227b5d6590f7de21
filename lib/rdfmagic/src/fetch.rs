//! The transport used to retrieve remote documents.

use crate::config::{LoaderConfig, ACCEPT_HEADER};
use crate::error::LoaderError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::io::Read;
use url::Url;

/// The answer of a [`Fetch`] implementation.
pub struct FetchResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The declared `Content-Type`, if any.
    pub content_type: Option<String>,
    /// The response body, read by the loader exactly once.
    pub body: Box<dyn Read>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves remote documents.
///
/// A non-success status is not an error at this level; the loader decides what to do with it.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<FetchResponse, LoaderError>;
}

/// Fetches `http:` and `https:` URLs with a blocking client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|error| LoaderError::Transport {
                locator: String::new(),
                source: error.into(),
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchResponse, LoaderError> {
        tracing::debug!(%url, "Make GET-request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|error| LoaderError::Transport {
                locator: url.to_string(),
                source: error.into(),
            })?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        Ok(FetchResponse {
            status: response.status().as_u16(),
            content_type,
            body: Box::new(response),
        })
    }
}
