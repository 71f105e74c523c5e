//! The sink client: one append operation per report.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::credentials::SinkCredentials;
use crate::error::DeliveryError;
use crate::report::{Report, ReportId};
use crate::Result;

/// An append-only collection sink accepting reports.
///
/// The sink assigns the record id and the write timestamp; the agent never
/// sends one.
#[allow(async_fn_in_trait)]
pub trait ReportSink: Send + Sync {
    /// Append `report` to the collection.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] classified as transient or permanent.
    async fn submit(&self, report: &Report) -> std::result::Result<ReportId, DeliveryError>;
}

impl<T: ReportSink> ReportSink for Arc<T> {
    async fn submit(&self, report: &Report) -> std::result::Result<ReportId, DeliveryError> {
        (**self).submit(report).await
    }
}

/// Document id assigned by the sink on append.
#[derive(Debug, Deserialize)]
struct AppendResponse {
    id: String,
}

/// HTTP implementation of the sink over the collection API.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    url: String,
    token: String,
}

impl HttpSink {
    /// Create a sink client for one collection.
    ///
    /// The credentials are injected here rather than read from any global,
    /// and every attempt is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        credentials: &SinkCredentials,
        collection: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::Error::internal(format!("failed to build HTTP client: {e}")))?;

        let url = format!(
            "{}/v1/projects/{}/collections/{}/documents",
            credentials.endpoint.trim_end_matches('/'),
            credentials.project,
            collection.as_ref(),
        );

        Ok(Self {
            client,
            url,
            token: credentials.token.clone(),
        })
    }
}

impl ReportSink for HttpSink {
    async fn submit(&self, report: &Report) -> std::result::Result<ReportId, DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(report)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let appended: AppendResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::permanent(format!("malformed sink response: {e}")))?;

        Ok(ReportId(appended.id))
    }
}

/// Classify a request-level failure. Everything at this layer is network
/// trouble a later attempt may clear.
fn classify_send_error(error: reqwest::Error) -> DeliveryError {
    if error.is_timeout() {
        DeliveryError::transient(format!("submission timed out: {error}"))
    } else {
        DeliveryError::transient(error.to_string())
    }
}

/// Classify a non-success response status.
fn classify_status(status: StatusCode, body: &str) -> DeliveryError {
    let detail = body.chars().take(200).collect::<String>();
    let reason = if detail.is_empty() {
        format!("sink returned {status}")
    } else {
        format!("sink returned {status}: {detail}")
    };

    if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        DeliveryError::transient(reason)
    } else {
        DeliveryError::permanent(reason)
    }
}
