//! Shared fixtures for the integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

/// A full analysis response in the shape the service returns it
/// (causation keys at the top level, event relations nested).
pub fn service_response(summary: &str) -> Value {
    json!({
        "summary": summary,
        "named_entities": {
            "persons": [{"entity": "Maria Lopez", "description": "Mayor of the town"}],
            "organizations": [{"entity": "City Council", "description": "Local government"}],
            "locations": [{"entity": "Riverside", "description": "Flooded district"}],
            "dates": [{"entity": "March 3, 2024", "description": "Date of the flood"}]
        },
        "events": [
            {
                "sentence": "The river flooded Riverside on March 3.",
                "event_type": "Disaster",
                "verb": "flooded",
                "agent": "The river",
                "patients": ["Riverside"],
                "cause": "heavy rain",
                "purpose_context": ""
            },
            {
                "sentence": "Maria Lopez declared an emergency.",
                "event_type": "Declaration",
                "verb": "declared",
                "agent": "Maria Lopez",
                "patients": "an emergency"
            }
        ],
        "temporal_references": [
            {"reference": "March 3", "description": "Day of the flood"}
        ],
        "important_notes": ["Casualty numbers are unconfirmed"],
        "timeline_of_events": [
            {"date": "2024-03-04", "events": [{"event_summary": "Emergency declared", "event_verb": "declared"}]},
            {"date": "2024-03-03", "events": [{"event_summary": "River floods", "event_verb": "flooded"}]}
        ],
        "events_causation": [
            {"occurrence_summary": "Heavy rain"},
            {"occurrence_summary": "River floods"}
        ],
        "causation_relations": [
            {"source_occurrence_summary": "Heavy rain", "target_occurrence_summary": "River floods"},
            {"source_occurrence_summary": "River floods", "target_occurrence_summary": "Emergency declared"}
        ],
        "entity_relations": [
            {"source_entity": "Maria Lopez", "target_entity": "City Council", "relation": "leads"}
        ],
        "event_relations": {
            "events": {"e1": "River floods", "e2": "Emergency declared"},
            "relations": [{"source": "e1", "target": "e2", "type": "causes"}]
        }
    })
}

/// Smallest file that passes upload validation.
pub fn minimal_upload() -> Value {
    json!({
        "events": [{"sentence": "A", "event_type": "X", "verb": "v"}],
        "summary": "s",
        "named_entities": {}
    })
}
