//! Upstream API client with timeout and error handling.
//!
//! # Responsibilities
//! - Issue bearer-authenticated GETs to the upstream REST endpoints
//! - Map non-2xx upstream responses into typed errors
//! - Parse response envelopes and project them into served records

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{ProxyError, ProxyResult};
use crate::upstream::types::{ArtistEnvelope, ArtistRecord, SongEnvelope, SongRecord};

/// Client for the upstream lyrics API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl UpstreamClient {
    /// Create a new upstream client.
    ///
    /// The timeout bounds each upstream call; a hung upstream surfaces
    /// as an error rather than stalling the handler forever.
    pub fn new(base_url: &str, token: String, timeout: Duration) -> ProxyResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Fetch and project one song record.
    ///
    /// `id` is an opaque all-digits string already validated by the
    /// router.
    pub async fn fetch_song(&self, id: &str) -> ProxyResult<SongRecord> {
        let envelope: SongEnvelope = self.get(&format!("songs/{}", id)).await?;
        Ok(SongRecord::from(envelope.response.song))
    }

    /// Fetch and project one artist record.
    pub async fn fetch_artist(&self, id: &str) -> ProxyResult<ArtistRecord> {
        let envelope: ArtistEnvelope = self.get(&format!("artists/{}", id)).await?;
        Ok(ArtistRecord::from(envelope.response.artist))
    }

    /// One outbound GET. No retries: a failure is the request's failure.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ProxyResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(url = %url, "Fetching from upstream");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Upstream returned error status");
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client =
            UpstreamClient::new("https://api.example.com/", "tok".into(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
