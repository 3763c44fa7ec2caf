//! The single point of contact with the external scoring service.
//!
//! The controller only sees the `Analyzer` trait; `HttpAnalyzer` is the production
//! backend and tests substitute scripted fakes.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{AnalysisRequest, AnalysisResult, PDF_MIME};

pub mod payload;

pub use payload::{PayloadError, PayloadShape};

/// Upper bound on how much of an error body ends up in the logs.
const MAX_LOGGED_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analyzer returned status {status}")]
    Status { status: u16 },

    #[error("Malformed analyzer response: {0}")]
    Malformed(#[from] PayloadError),
}

/// Scores a resume against a job description.
///
/// Carried by the controller as `Arc<dyn Analyzer>`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalyzerError>;
}

/// Multipart-over-HTTP Analyzer backend.
#[derive(Clone)]
pub struct HttpAnalyzer {
    client: Client,
    endpoint: String,
    shape: PayloadShape,
}

impl HttpAnalyzer {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        shape: PayloadShape,
    ) -> Result<Self, AnalyzerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            shape,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalyzerError> {
        let file_part = Part::bytes(request.resume.content.to_vec())
            .file_name(request.resume.file_name.clone())
            .mime_str(PDF_MIME)?;

        let form = Form::new()
            .part("file", file_part)
            .text("job_description", request.job_description.clone());

        debug!(
            endpoint = %self.endpoint,
            file_name = %request.resume.file_name,
            bytes = request.resume.content.len(),
            "Calling analyzer"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = truncate(&body, MAX_LOGGED_BODY),
                "Analyzer returned non-success status"
            );
            return Err(AnalyzerError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let result = payload::decode(self.shape, &body).map_err(|e| {
            warn!(shape = %self.shape, error = %e, "Analyzer response did not decode");
            AnalyzerError::Malformed(e)
        })?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            overall_score = result.overall_score,
            "Analyzer call succeeded"
        );

        Ok(result)
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("internal error", 512), "internal error");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééééé", 2), "éé");
    }

    #[test]
    fn test_new_keeps_endpoint() {
        let analyzer = HttpAnalyzer::new(
            "http://127.0.0.1:8000/api/v1/analyze",
            Duration::from_secs(5),
            PayloadShape::Breakdown,
        )
        .unwrap();
        assert_eq!(analyzer.endpoint(), "http://127.0.0.1:8000/api/v1/analyze");
    }
}
