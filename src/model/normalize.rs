//! Ingress normalization for analysis results
//!
//! Everything that enters the crate as loosely-typed JSON (service responses,
//! uploaded files, persisted history) passes through [`normalize`] exactly
//! once. After that, the rest of the crate works with a fully-typed
//! [`AnalysisResult`].
//!
//! Normalization is total: missing fields, nulls and values of the wrong JSON
//! type are replaced with empty defaults. Only the file-upload path applies
//! the minimal schema check in [`validate_upload`].

use super::result::{
    AnalysisResult, Causation, CausationEvent, CausationRelation, EntityRelation, Event,
    EventRelation, EventRelations, EventSummary, NamedEntities, NamedEntity, TemporalReference,
    TimelineBlock, TimelineEvent, KNOWN_CATEGORIES,
};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while loading an analysis from user-supplied JSON
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(
        "The uploaded JSON does not match the expected format (missing or invalid: {}). \
         Ensure it contains at least 'events', 'named_entities', and 'summary'.",
        .missing.join(", ")
    )]
    Schema { missing: Vec<String> },

    #[error("Error parsing the JSON file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Metadata of a text submission, attached to the service's response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub input_text: String,
    pub language: String,
    pub doc_date: Option<String>,
}

impl Submission {
    pub fn new(input_text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            language: language.into(),
            doc_date: None,
        }
    }

    pub fn with_doc_date(mut self, doc_date: impl Into<String>) -> Self {
        let doc_date = doc_date.into();
        self.doc_date = if doc_date.trim().is_empty() { None } else { Some(doc_date) };
        self
    }
}

// ---------------------------------------------------------------------------
// Public contract
// ---------------------------------------------------------------------------

/// Minimal shape check for uploaded analysis files.
///
/// Requires a JSON object with an `events` array, a `summary` string and a
/// non-null `named_entities` object. Every failing key is reported.
pub fn validate_upload(raw: &Value) -> ModelResult<()> {
    let Some(obj) = raw.as_object() else {
        return Err(ModelError::Schema {
            missing: vec!["events".into(), "summary".into(), "named_entities".into()],
        });
    };

    let mut missing = Vec::new();
    if !matches!(lookup(obj, &["events"]), Some(Value::Array(_))) {
        missing.push("events".to_string());
    }
    if !matches!(lookup(obj, &["summary"]), Some(Value::String(_))) {
        missing.push("summary".to_string());
    }
    if !matches!(lookup(obj, &["named_entities", "namedEntities"]), Some(Value::Object(_))) {
        missing.push("named_entities".to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ModelError::Schema { missing })
    }
}

/// Parse, validate and normalize the content of an uploaded file.
pub fn parse_upload(text: &str) -> ModelResult<AnalysisResult> {
    let raw: Value = serde_json::from_str(text)?;
    validate_upload(&raw)?;
    Ok(normalize(&raw))
}

/// Attach submission metadata to a trusted service response.
///
/// No validation is performed. `original_text`, `language` and `doc_date`
/// always come from the submission, overriding same-named response fields.
pub fn merge_submission(response: &Value, submission: &Submission) -> AnalysisResult {
    let mut result = normalize(response);
    result.original_text = Some(submission.input_text.clone());
    result.language = submission.language.clone();
    result.doc_date = submission.doc_date.clone();
    result
}

/// Build a fully-populated [`AnalysisResult`] from any JSON value.
pub fn normalize(raw: &Value) -> AnalysisResult {
    let empty = serde_json::Map::new();
    let root = raw.as_object().unwrap_or(&empty);

    AnalysisResult {
        summary: string_at(root, &["summary"]),
        named_entities: named_entities(lookup(root, &["named_entities", "namedEntities"])),
        events: items(lookup(root, &["events"])).iter().map(event).collect(),
        temporal_references: items(lookup(root, &["temporal_references", "temporalReferences"]))
            .iter()
            .map(temporal_reference)
            .collect(),
        important_notes: items(lookup(root, &["important_notes", "importantNotes"]))
            .iter()
            .filter_map(note)
            .collect(),
        timeline_of_events: items(lookup(root, &["timeline_of_events", "timelineOfEvents"]))
            .iter()
            .map(timeline_block)
            .collect(),
        causation: causation(root),
        entity_relations: entity_relations(lookup(root, &["entity_relations", "entityRelations"])),
        event_relations: event_relations(lookup(root, &["event_relations", "eventRelations"])),
        original_text: lookup(root, &["original_text", "originalText"])
            .and_then(Value::as_str)
            .map(str::to_string),
        language: string_at(root, &["language"]),
        doc_date: opt_string(lookup(root, &["doc_date", "docDate"])),
    }
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

type Object = serde_json::Map<String, Value>;

/// First non-null value among the candidate keys.
fn lookup<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Array elements, or an empty slice for anything that is not an array.
fn items(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(values)) => values,
        _ => &[],
    }
}

/// Scalars as text; objects, arrays and nulls become an empty string.
fn scalar_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn string_at(obj: &Object, keys: &[&str]) -> String {
    scalar_string(lookup(obj, keys))
}

/// Optional text. Blank strings are absent; arrays of scalars are joined.
fn opt_string(value: Option<&Value>) -> Option<String> {
    let text = match value {
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| scalar_string(Some(v)))
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_string(other),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn opt_string_at(obj: &Object, keys: &[&str]) -> Option<String> {
    opt_string(lookup(obj, keys))
}

/// View an element as an object; bare strings are handed to `from_text`.
fn object_or<T: Default>(
    value: &Value,
    on_object: impl FnOnce(&Object) -> T,
    from_text: impl FnOnce(String) -> T,
) -> T {
    match value {
        Value::Object(obj) => on_object(obj),
        Value::String(s) => from_text(s.clone()),
        Value::Number(_) | Value::Bool(_) => from_text(scalar_string(Some(value))),
        _ => T::default(),
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn named_entities(value: Option<&Value>) -> NamedEntities {
    let mut entities = NamedEntities::new();
    for (key, _) in KNOWN_CATEGORIES {
        entities.extend_category(key, Vec::new());
    }

    let Some(Value::Object(categories)) = value else {
        return entities;
    };

    for (key, list) in categories {
        let name = canonical_category(key);
        entities.extend_category(&name, items(Some(list)).iter().map(named_entity));
    }
    entities
}

/// `legalTerms` and `legal_terms` are the same category. Runs of capitals
/// (`PERSONS`, `NGOs`) are lowercased without splitting.
fn canonical_category(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 2);
    let mut prev: Option<char> = None;
    for ch in key.trim().chars() {
        if ch.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                name.push('_');
            }
            name.extend(ch.to_lowercase());
        } else {
            name.push(ch);
        }
        prev = Some(ch);
    }
    name
}

fn named_entity(value: &Value) -> NamedEntity {
    object_or(
        value,
        |obj| NamedEntity {
            entity: string_at(obj, &["entity", "name"]),
            description: string_at(obj, &["description"]),
            entity_type: opt_string_at(obj, &["type"]),
        },
        |entity| NamedEntity {
            entity,
            ..Default::default()
        },
    )
}

fn event(value: &Value) -> Event {
    object_or(
        value,
        |obj| Event {
            sentence: string_at(obj, &["sentence"]),
            event_type: string_at(obj, &["event_type", "eventType"]),
            verb: string_at(obj, &["verb"]),
            agent: opt_string_at(obj, &["agent"]),
            patients: opt_string_at(obj, &["patients"]),
            cause: opt_string_at(obj, &["cause"]),
            purpose_context: opt_string_at(obj, &["purpose_context", "purposeContext"]),
            temporal_reference: opt_string_at(obj, &["temporal_reference", "temporalReference"]),
        },
        |sentence| Event {
            sentence,
            ..Default::default()
        },
    )
}

fn temporal_reference(value: &Value) -> TemporalReference {
    object_or(
        value,
        |obj| TemporalReference {
            reference: string_at(obj, &["reference"]),
            description: string_at(obj, &["description"]),
        },
        |reference| TemporalReference {
            reference,
            description: String::new(),
        },
    )
}

fn note(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(_) | Value::Bool(_) => Some(scalar_string(Some(value))),
        other => Some(other.to_string()),
    }
}

fn timeline_block(value: &Value) -> TimelineBlock {
    object_or(
        value,
        |obj| TimelineBlock {
            date: string_at(obj, &["date"]),
            events: items(lookup(obj, &["events"])).iter().map(timeline_event).collect(),
        },
        |date| TimelineBlock {
            date,
            events: Vec::new(),
        },
    )
}

fn timeline_event(value: &Value) -> TimelineEvent {
    object_or(
        value,
        |obj| TimelineEvent {
            event_summary: string_at(obj, &["event_summary", "eventSummary", "event"]),
            event_verb: opt_string_at(obj, &["event_verb", "eventVerb"]),
            temporal_reference_connection: opt_string_at(
                obj,
                &["temporal_reference_connection", "temporalReferenceConnection"],
            ),
        },
        |event_summary| TimelineEvent {
            event_summary,
            ..Default::default()
        },
    )
}

/// Causation lists live either under `causation` or at the top level.
fn causation(root: &Object) -> Causation {
    let nested = match lookup(root, &["causation"]) {
        Some(Value::Object(obj)) => Some(obj),
        _ => None,
    };
    let find = |keys: &[&str]| {
        nested
            .and_then(|obj| lookup(obj, keys))
            .or_else(|| lookup(root, keys))
    };

    Causation {
        events_causation: items(find(&["events_causation", "eventsCausation"]))
            .iter()
            .map(|v| {
                object_or(
                    v,
                    |obj| CausationEvent {
                        occurrence_summary: string_at(
                            obj,
                            &["occurrence_summary", "occurrenceSummary"],
                        ),
                    },
                    |occurrence_summary| CausationEvent { occurrence_summary },
                )
            })
            .collect(),
        causation_relations: items(find(&["causation_relations", "causationRelations"]))
            .iter()
            .map(|v| {
                object_or(
                    v,
                    |obj| CausationRelation {
                        source_occurrence_summary: string_at(
                            obj,
                            &["source_occurrence_summary", "sourceOccurrenceSummary"],
                        ),
                        target_occurrence_summary: string_at(
                            obj,
                            &["target_occurrence_summary", "targetOccurrenceSummary"],
                        ),
                    },
                    |_| CausationRelation::default(),
                )
            })
            .collect(),
    }
}

/// Entity relations arrive as an array, or wrapped in `{entity_relations: [...]}`.
fn entity_relations(value: Option<&Value>) -> Vec<EntityRelation> {
    let list = match value {
        Some(Value::Object(obj)) => items(lookup(obj, &["entity_relations", "entityRelations"])),
        other => items(other),
    };

    list.iter()
        .map(|v| {
            object_or(
                v,
                |obj| EntityRelation {
                    source_entity: string_at(
                        obj,
                        &["source_entity", "sourceEntity", "source_relation", "source"],
                    ),
                    target_entity: string_at(obj, &["target_entity", "targetEntity", "target"]),
                    relation: string_at(obj, &["relation", "type"]),
                },
                |_| EntityRelation::default(),
            )
        })
        .collect()
}

fn event_relations(value: Option<&Value>) -> EventRelations {
    let Some(Value::Object(obj)) = value else {
        return EventRelations::default();
    };

    let events = match lookup(obj, &["events"]) {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(id, summary)| EventSummary {
                id: id.clone(),
                summary: scalar_string(Some(summary)),
            })
            .collect(),
        // The map form cannot repeat an id, so duplicates keep their first summary.
        Some(Value::Array(list)) => {
            let mut seen = HashSet::new();
            list.iter()
                .filter_map(|v| v.as_object())
                .map(|e| EventSummary {
                    id: string_at(e, &["id"]),
                    summary: string_at(e, &["summary", "description"]),
                })
                .filter(|e| seen.insert(e.id.clone()))
                .collect()
        }
        _ => Vec::new(),
    };

    let relations = items(lookup(obj, &["relations"]))
        .iter()
        .map(|v| {
            object_or(
                v,
                |rel| EventRelation {
                    source: string_at(rel, &["source"]),
                    target: string_at(rel, &["target"]),
                    relation_type: string_at(rel, &["type", "relation"]),
                },
                |_| EventRelation::default(),
            )
        })
        .collect();

    EventRelations { events, relations }
}
