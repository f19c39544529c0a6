//! Analysis result model: canonical types plus ingress normalization

mod normalize;
mod result;
mod timeline;


pub use normalize::{
    merge_submission, normalize, parse_upload, validate_upload, ModelError, ModelResult,
    Submission,
};
pub use result::{
    AnalysisResult, Causation, CausationEvent, CausationRelation, EntityCategory, EntityRelation,
    Event, EventRelation, EventRelations, EventSummary, NamedEntities, NamedEntity,
    TemporalReference, TimelineBlock, TimelineEvent, DEFAULT_LANGUAGE, KNOWN_CATEGORIES,
};
pub use timeline::parse_calendar_date;
