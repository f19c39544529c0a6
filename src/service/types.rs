//! Request and response bodies of the analysis service

use crate::model::Submission;
use serde::{Deserialize, Serialize};

/// Form body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequest {
    pub doc_date: String,
    pub input_text: String,
    pub language: String,
}

impl From<&Submission> for AnalyzeRequest {
    fn from(submission: &Submission) -> Self {
        Self {
            doc_date: submission.doc_date.clone().unwrap_or_default(),
            input_text: submission.input_text.clone(),
            language: submission.language.clone(),
        }
    }
}

/// Form body of `POST /analyze_morphology`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MorphologyRequest {
    pub word: String,
    pub language: String,
}

/// Form body of `POST /analyze_pos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartsOfSpeechRequest {
    pub input_text: String,
}

/// Morphological analysis of a single word or selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyResponse {
    #[serde(default)]
    pub analysis: String,
}

/// One tagged token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTag {
    #[serde(default)]
    pub token: String,
    #[serde(
        rename = "tokenId",
        alias = "token_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub token_id: Option<u64>,
    #[serde(rename = "partOfSpeech", alias = "part_of_speech", default)]
    pub part_of_speech: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartsOfSpeechResponse {
    #[serde(default)]
    pub parts_of_speech: Vec<TokenTag>,
}
