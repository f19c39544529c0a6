//! Tab identifiers and the active-tab state machine

use crate::graph::GraphKind;
use std::fmt;
use std::str::FromStr;

/// A view over an analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Tab {
    #[default]
    Summary,
    Entities,
    Events,
    Temporal,
    Timeline,
    Causation,
    EventRelations,
    EntityRelations,
    DictionaryPlus,
    PartsOfSpeech,
}

impl Tab {
    /// Every tab, in the order the tab bar shows them.
    pub const ALL: [Tab; 10] = [
        Tab::Summary,
        Tab::Entities,
        Tab::Events,
        Tab::Temporal,
        Tab::Timeline,
        Tab::Causation,
        Tab::EventRelations,
        Tab::EntityRelations,
        Tab::DictionaryPlus,
        Tab::PartsOfSpeech,
    ];

    /// Stable kebab-case identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Summary => "summary",
            Tab::Entities => "entities",
            Tab::Events => "events",
            Tab::Temporal => "temporal",
            Tab::Timeline => "timeline",
            Tab::Causation => "causation",
            Tab::EventRelations => "event-relations",
            Tab::EntityRelations => "entity-relations",
            Tab::DictionaryPlus => "dictionary-plus",
            Tab::PartsOfSpeech => "parts-of-speech",
        }
    }

    /// Button text.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Summary => "Summary",
            Tab::Entities => "Entities",
            Tab::Events => "Events",
            Tab::Temporal => "Temporal",
            Tab::Timeline => "Timeline",
            Tab::Causation => "Causation",
            Tab::EventRelations => "Event Relations",
            Tab::EntityRelations => "Entity Relations",
            Tab::DictionaryPlus => "Dictionary+",
            Tab::PartsOfSpeech => "Parts of Speech",
        }
    }

    /// The relationship graph shown by this tab, if it is a graph tab.
    pub fn graph(&self) -> Option<GraphKind> {
        match self {
            Tab::Causation => Some(GraphKind::Causation),
            Tab::EventRelations => Some(GraphKind::EventRelations),
            Tab::EntityRelations => Some(GraphKind::EntityRelations),
            _ => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Tab::ALL
            .into_iter()
            .find(|t| t.id() == wanted)
            .ok_or_else(|| {
                let ids: Vec<&str> = Tab::ALL.iter().map(|t| t.id()).collect();
                format!("unknown tab '{}' (expected one of: {})", s, ids.join(", "))
            })
    }
}

/// Exactly one tab is active; selection takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    /// Starts on [`Tab::Summary`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }
}
