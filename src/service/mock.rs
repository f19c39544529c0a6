//! Mock service for testing: returns preconfigured responses

use super::types::{
    AnalyzeRequest, MorphologyRequest, MorphologyResponse, PartsOfSpeechRequest,
    PartsOfSpeechResponse,
};
use super::{AnalysisService, ServiceError, ServiceResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A scripted reply: wait `delay`, then answer with `outcome`.
struct Scripted<T> {
    delay: Duration,
    outcome: Result<T, String>,
}

/// Mock analysis service.
///
/// Analysis replies are consumed in order; each may be delayed to simulate
/// overlapping requests. Once the script runs out, calls fail with
/// `ServiceError::Network`.
#[derive(Default)]
pub struct MockService {
    analyses: Mutex<VecDeque<Scripted<Value>>>,
    morphology: Option<MorphologyResponse>,
    parts_of_speech: Option<PartsOfSpeechResponse>,
    requests: Mutex<Vec<AnalyzeRequest>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate analysis reply.
    pub fn with_analysis(self, response: Value) -> Self {
        self.with_delayed_analysis(Duration::ZERO, response)
    }

    /// Queue an analysis reply that arrives after `delay`.
    pub fn with_delayed_analysis(self, delay: Duration, response: Value) -> Self {
        self.push(delay, Ok(response))
    }

    /// Queue a failed analysis.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Duration::ZERO, Err(message.into()))
    }

    /// Queue a failed analysis that arrives after `delay`.
    pub fn with_delayed_failure(self, delay: Duration, message: impl Into<String>) -> Self {
        self.push(delay, Err(message.into()))
    }

    pub fn with_morphology(mut self, analysis: impl Into<String>) -> Self {
        self.morphology = Some(MorphologyResponse {
            analysis: analysis.into(),
        });
        self
    }

    pub fn with_parts_of_speech(mut self, response: PartsOfSpeechResponse) -> Self {
        self.parts_of_speech = Some(response);
        self
    }

    /// Analysis requests received so far, in arrival order.
    pub fn analyze_requests(&self) -> Vec<AnalyzeRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, delay: Duration, outcome: Result<Value, String>) -> Self {
        self.analyses
            .lock()
            .unwrap()
            .push_back(Scripted { delay, outcome });
        self
    }
}

#[async_trait]
impl AnalysisService for MockService {
    async fn analyze(&self, request: &AnalyzeRequest) -> ServiceResult<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.analyses.lock().unwrap().pop_front();
        let Some(scripted) = next else {
            return Err(ServiceError::Network(
                "no mock analysis response queued".to_string(),
            ));
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.outcome.map_err(ServiceError::Network)
    }

    async fn morphology(&self, _request: &MorphologyRequest) -> ServiceResult<MorphologyResponse> {
        self.morphology
            .clone()
            .ok_or_else(|| ServiceError::Network("no mock morphology response".to_string()))
    }

    async fn parts_of_speech(
        &self,
        _request: &PartsOfSpeechRequest,
    ) -> ServiceResult<PartsOfSpeechResponse> {
        self.parts_of_speech
            .clone()
            .ok_or_else(|| ServiceError::Network("no mock parts-of-speech response".to_string()))
    }
}
