//! HTTP manifest fetcher.

use tracing::debug;

use super::http::AsyncHttpClient;
use super::{FetchError, ManifestFetcher};
use crate::manifest::{parse_manifest, Manifest};

/// Fetches manifests over HTTP and parses them strictly.
///
/// Generic over the HTTP client so tests can inject a mock transport.
pub struct HttpManifestFetcher<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> HttpManifestFetcher<C> {
    /// Creates a new manifest fetcher.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }
}

impl<C: AsyncHttpClient> ManifestFetcher for HttpManifestFetcher<C> {
    async fn fetch_manifest(&self, url: &str) -> Result<Manifest, FetchError> {
        let bytes = self.http_client.get(url).await?;
        debug!(url, bytes = bytes.len(), "fetched manifest document");

        parse_manifest(&bytes).map_err(|e| FetchError::ManifestParse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
