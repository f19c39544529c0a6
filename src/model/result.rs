//! AnalysisResult: the normalized record of one completed analysis

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Language assumed when a result carries none (files from older exports).
pub const DEFAULT_LANGUAGE: &str = "English";

/// Named-entity categories the service is asked for, in display order.
///
/// Each pair is `(wire key, display title)`.
pub const KNOWN_CATEGORIES: [(&str, &str); 6] = [
    ("persons", "Persons"),
    ("organizations", "Organizations"),
    ("locations", "Locations"),
    ("institutions", "Institutions"),
    ("dates", "Dates"),
    ("legal_terms", "Legal Terms"),
];

/// A single named entity with the service's description of its role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedEntity {
    pub entity: String,
    pub description: String,
    /// Finer classification some service revisions attach (e.g. "person")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

/// All entities of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCategory {
    pub name: String,
    pub entities: Vec<NamedEntity>,
}

/// Named entities grouped by category, in insertion order.
///
/// Normalization always produces the [`KNOWN_CATEGORIES`] first (possibly
/// empty), followed by any extra categories in the order the service sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedEntities {
    categories: Vec<EntityCategory>,
}

impl NamedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entities to a category, creating it on first use.
    pub fn extend_category(&mut self, name: &str, entities: impl IntoIterator<Item = NamedEntity>) {
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(category) => category.entities.extend(entities),
            None => self.categories.push(EntityCategory {
                name: name.to_string(),
                entities: entities.into_iter().collect(),
            }),
        }
    }

    /// Entities of a category; empty when the category is absent.
    pub fn get(&self, name: &str) -> &[NamedEntity] {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.entities.as_slice())
            .unwrap_or(&[])
    }

    pub fn categories(&self) -> &[EntityCategory] {
        &self.categories
    }

    /// Total number of entities across all categories.
    pub fn total(&self) -> usize {
        self.categories.iter().map(|c| c.entities.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl Serialize for NamedEntities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.entities)?;
        }
        map.end()
    }
}

/// An event (action, occurrence or communication) found in the text.
///
/// Optional fields serialize as `null` rather than being dropped, so the
/// schema always carries them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    pub sentence: String,
    pub event_type: String,
    pub verb: String,
    pub agent: Option<String>,
    pub patients: Option<String>,
    pub cause: Option<String>,
    pub purpose_context: Option<String>,
    pub temporal_reference: Option<String>,
}

/// An explicit or implicit time expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemporalReference {
    pub reference: String,
    pub description: String,
}

/// One event placed on the timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub event_summary: String,
    pub event_verb: Option<String>,
    pub temporal_reference_connection: Option<String>,
}

/// All timeline events sharing a date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineBlock {
    /// Calendar date as sent by the service; see [`super::parse_calendar_date`]
    pub date: String,
    pub events: Vec<TimelineEvent>,
}

/// A causation-graph node declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CausationEvent {
    pub occurrence_summary: String,
}

/// Source occurrence causes target occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CausationRelation {
    pub source_occurrence_summary: String,
    pub target_occurrence_summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Causation {
    pub events_causation: Vec<CausationEvent>,
    pub causation_relations: Vec<CausationRelation>,
}

/// `source_entity ---[relation]---> target_entity`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityRelation {
    pub source_entity: String,
    pub target_entity: String,
    pub relation: String,
}

/// A typed edge between two event ids (e.g. `CAUSES`, `BEFORE`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventRelation {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relation_type: String,
}

/// An event id with its summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSummary {
    pub id: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventRelations {
    /// Event id → summary, serialized as an ordered JSON object
    #[serde(serialize_with = "serialize_event_summaries")]
    pub events: Vec<EventSummary>,
    pub relations: Vec<EventRelation>,
}

impl EventRelations {
    pub fn summary_of(&self, id: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.summary.as_str())
    }
}

fn serialize_event_summaries<S: Serializer>(
    events: &[EventSummary],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(events.len()))?;
    for event in events {
        map.serialize_entry(&event.id, &event.summary)?;
    }
    map.end()
}

/// The normalized, immutable record of one completed analysis.
///
/// Deserialization goes through [`super::normalize`], so any JSON shape the
/// service has produced (or a previously exported result) yields a fully
/// populated value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct AnalysisResult {
    pub summary: String,
    pub named_entities: NamedEntities,
    pub events: Vec<Event>,
    pub temporal_references: Vec<TemporalReference>,
    pub important_notes: Vec<String>,
    pub timeline_of_events: Vec<TimelineBlock>,
    pub causation: Causation,
    pub entity_relations: Vec<EntityRelation>,
    pub event_relations: EventRelations,
    /// The submitted text; absent when the result came from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    /// Output language in effect when the result was produced
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_date: Option<String>,
}

impl AnalysisResult {
    /// Language to use for follow-up lookups (morphology).
    pub fn effective_language(&self) -> &str {
        if self.language.trim().is_empty() {
            DEFAULT_LANGUAGE
        } else {
            &self.language
        }
    }

    /// Timeline blocks in ascending date order.
    ///
    /// Stable: blocks with equal dates keep their input order, and blocks
    /// whose date cannot be parsed follow all dated blocks in input order.
    pub fn sorted_timeline(&self) -> Vec<&TimelineBlock> {
        super::timeline::sort_blocks(&self.timeline_of_events)
    }
}

impl From<serde_json::Value> for AnalysisResult {
    fn from(raw: serde_json::Value) -> Self {
        super::normalize(&raw)
    }
}
