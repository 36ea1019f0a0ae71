use tracing::{debug, warn};

use crate::card::ReportCard;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("report endpoint returned {status} for {archive_number}")]
    Status {
        archive_number: String,
        status: reqwest::StatusCode,
    },
    #[error("empty archive number")]
    EmptyArchiveNumber,
}

/// HTTP client for `GET <endpoint>/<archive_number>`.
#[derive(Debug, Clone)]
pub struct ReportClient {
    endpoint: String,
    client: reqwest::Client,
}

impl ReportClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn url_for(&self, archive_number: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), archive_number.trim())
    }

    /// Fetches one report card. Non-2xx responses are errors.
    ///
    /// Nothing cancels an earlier in-flight fetch; callers get results in
    /// completion order.
    pub async fn fetch(&self, archive_number: &str) -> Result<ReportCard, ReportError> {
        if archive_number.trim().is_empty() {
            return Err(ReportError::EmptyArchiveNumber);
        }
        let url = self.url_for(archive_number);
        debug!(%url, "fetching report card");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            warn!(%url, status = %resp.status(), "report endpoint error");
            return Err(ReportError::Status {
                archive_number: archive_number.to_string(),
                status: resp.status(),
            });
        }
        Ok(resp.json::<ReportCard>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::ReportClient;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_joins_endpoint_and_archive_number() {
        let client = ReportClient::new("http://reports.local/api/report/");
        assert_eq!(client.url_for(" 1234 "), "http://reports.local/api/report/1234");
    }

    #[tokio::test]
    async fn blank_archive_number_is_refused_before_any_request() {
        let client = ReportClient::new("http://127.0.0.1:9");
        let err = client.fetch("   ").await.unwrap_err();
        assert!(matches!(err, super::ReportError::EmptyArchiveNumber));
    }
}
