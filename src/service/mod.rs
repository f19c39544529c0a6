//! Analysis service client
//!
//! Defines the client trait and the wire types for the remote NLP service.
//! Two implementations:
//! - `HttpClient`: form-encoded POSTs over `reqwest` (production)
//! - `MockService`: returns preconfigured responses (testing)
//!
//! The service is trusted: analysis responses are returned as raw JSON and
//! normalized by the caller, never schema-checked here.

mod http;
mod mock;
mod types;

pub use http::{Endpoints, HttpClient};
pub use mock::MockService;
pub use types::{
    AnalyzeRequest, MorphologyRequest, MorphologyResponse, PartsOfSpeechRequest,
    PartsOfSpeechResponse, TokenTag,
};

use async_trait::async_trait;
use serde_json::Value;

/// Errors from service calls.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response parse error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Network(err.to_string())
        }
    }
}

/// Result type for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Client trait for the analysis service.
///
/// Abstracts over transport (HTTP, mock) so the session controller does
/// not depend on how the service is reached.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Full narrative analysis. Returns the raw JSON body.
    async fn analyze(&self, request: &AnalyzeRequest) -> ServiceResult<Value>;

    /// Morphological analysis of a word or short selection.
    async fn morphology(&self, request: &MorphologyRequest) -> ServiceResult<MorphologyResponse>;

    /// Part-of-speech tag for every token of the text.
    async fn parts_of_speech(
        &self,
        request: &PartsOfSpeechRequest,
    ) -> ServiceResult<PartsOfSpeechResponse>;
}
