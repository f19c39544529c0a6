//! `reqwest`-backed client for the analysis service

use super::types::{
    AnalyzeRequest, MorphologyRequest, MorphologyResponse, PartsOfSpeechRequest,
    PartsOfSpeechResponse,
};
use super::{AnalysisService, ServiceError, ServiceResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Absolute URLs of the three endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub analyze: String,
    pub morphology: String,
    pub parts_of_speech: String,
}

impl Endpoints {
    /// Standard paths under a base URL (`/analyze`, `/analyze_morphology`, `/analyze_pos`).
    pub fn from_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            analyze: format!("{}/analyze", base),
            morphology: format!("{}/analyze_morphology", base),
            parts_of_speech: format!("{}/analyze_pos", base),
        }
    }
}

/// HTTP client posting `application/x-www-form-urlencoded` bodies.
pub struct HttpClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpClient {
    /// No timeout unless one is given; a slow analysis simply keeps loading.
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> ServiceResult<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("anasi/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn post_form<F, T>(&self, url: &str, form: &F) -> ServiceResult<T>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url, "posting form");
        let response = self.client.post(url).form(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url, status = status.as_u16(), "service returned an error status");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AnalysisService for HttpClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> ServiceResult<Value> {
        self.post_form(&self.endpoints.analyze, request).await
    }

    async fn morphology(&self, request: &MorphologyRequest) -> ServiceResult<MorphologyResponse> {
        self.post_form(&self.endpoints.morphology, request).await
    }

    async fn parts_of_speech(
        &self,
        request: &PartsOfSpeechRequest,
    ) -> ServiceResult<PartsOfSpeechResponse> {
        self.post_form(&self.endpoints.parts_of_speech, request).await
    }
}
