use std::time::Duration;

/// How long a remote fetch may take before it is abandoned.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// The media types offered to servers, most preferred first.
pub const ACCEPT_HEADER: &str =
    "application/rdf+xml, text/turtle;q=0.9, application/x-turtle;q=0.9, text/html;q=0.5, */*;q=0.1";

/// Holds the configuration of the [`HttpFetcher`](crate::HttpFetcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Upper bound for a single remote fetch, connection and body included.
    pub timeout: Duration,
    /// The `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: HTTP_TIMEOUT,
            user_agent: format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
