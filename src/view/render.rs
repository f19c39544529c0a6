//! Plain-text rendering of each tab
//!
//! Rendering never fails: every empty or missing section degrades to an
//! explicit "no data" message.

use super::events::EventsView;
use super::tabs::Tab;
use crate::graph::GraphKind;
use crate::model::{AnalysisResult, Event, KNOWN_CATEGORIES};
use crate::service::{MorphologyResponse, PartsOfSpeechResponse};
use std::fmt::Write;

/// Marker printed for optional fields the service left out.
pub const ABSENT: &str = "—";

/// Render the given tab of a result.
pub fn render_tab(result: &AnalysisResult, tab: Tab, events_view: &EventsView) -> String {
    match tab {
        Tab::Summary => render_summary(result),
        Tab::Entities => render_entities(result),
        Tab::Events => render_events(result, events_view),
        Tab::Temporal => render_temporal(result),
        Tab::Timeline => render_timeline(result),
        Tab::Causation => render_graph(result, GraphKind::Causation),
        Tab::EventRelations => render_graph(result, GraphKind::EventRelations),
        Tab::EntityRelations => render_graph(result, GraphKind::EntityRelations),
        Tab::DictionaryPlus => render_dictionary(result),
        Tab::PartsOfSpeech => render_parts_of_speech_prompt(result),
    }
}

/// A one-line tab bar with the active tab bracketed.
pub fn render_tab_bar(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.title())
            } else {
                tab.title().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}\n{}", title, "=".repeat(title.chars().count()));
}

fn or_absent(value: Option<&str>) -> &str {
    value.unwrap_or(ABSENT)
}

pub fn render_summary(result: &AnalysisResult) -> String {
    let mut out = String::new();
    heading(&mut out, "Summary");
    if result.summary.trim().is_empty() {
        out.push_str("No summary found\n");
    } else {
        let _ = writeln!(out, "{}", result.summary);
    }
    if !result.important_notes.is_empty() {
        out.push_str("\nImportant notes:\n");
        for note in &result.important_notes {
            let _ = writeln!(out, "  * {}", note);
        }
    }
    out
}

pub fn render_entities(result: &AnalysisResult) -> String {
    let mut out = String::new();
    heading(&mut out, "Entities");

    for category in result.named_entities.categories() {
        let title = KNOWN_CATEGORIES
            .iter()
            .find(|(key, _)| *key == category.name)
            .map(|(_, title)| title.to_string())
            .unwrap_or_else(|| title_case(&category.name));

        let _ = writeln!(out, "\n{}:", title);
        if category.entities.is_empty() {
            let _ = writeln!(out, "  No {} found", title.to_lowercase());
            continue;
        }
        for entity in &category.entities {
            if entity.description.is_empty() {
                let _ = writeln!(out, "  - {}", entity.entity);
            } else {
                let _ = writeln!(out, "  - {} - {}", entity.entity, entity.description);
            }
        }
    }
    out
}

/// `legal_terms` → `Legal Terms`
fn title_case(key: &str) -> String {
    key.split(&['_', '-', ' '][..])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_event(out: &mut String, event: &Event) {
    let _ = writeln!(out, "Sentence:   {}", event.sentence);
    let _ = writeln!(out, "Event Type: {}", event.event_type);
    let _ = writeln!(out, "Verb:       {}", event.verb);
    let _ = writeln!(out, "Agent:      {}", or_absent(event.agent.as_deref()));
    let _ = writeln!(out, "Patients:   {}", or_absent(event.patients.as_deref()));
    let _ = writeln!(out, "Cause:      {}", or_absent(event.cause.as_deref()));
    let _ = writeln!(out, "Purpose:    {}", or_absent(event.purpose_context.as_deref()));
}

pub fn render_events(result: &AnalysisResult, view: &EventsView) -> String {
    let mut out = String::new();
    heading(&mut out, "Events");
    if result.events.is_empty() {
        out.push_str("No events found.\n");
        return out;
    }

    if !view.filter().trim().is_empty() {
        let _ = writeln!(out, "Filter: \"{}\"", view.filter());
    }

    let page = view.page(&result.events);
    if page.rows.is_empty() {
        out.push_str("No events match the filter.\n");
    }
    for (i, event) in page.rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_event(&mut out, event);
    }
    let _ = writeln!(
        out,
        "\nPage {} of {} ({} matching events)",
        page.page, page.page_count, page.total_matches
    );
    out
}

pub fn render_temporal(result: &AnalysisResult) -> String {
    let mut out = String::new();
    heading(&mut out, "Temporal References");
    if result.temporal_references.is_empty() {
        out.push_str("No temporal references found.\n");
        return out;
    }
    for reference in &result.temporal_references {
        let _ = writeln!(out, "- {}: {}", reference.reference, reference.description);
    }
    out
}

pub fn render_timeline(result: &AnalysisResult) -> String {
    let mut out = String::new();
    heading(&mut out, "Timeline");
    let blocks = result.sorted_timeline();
    if blocks.is_empty() {
        out.push_str("No timeline data found\n");
        return out;
    }
    for block in blocks {
        let _ = writeln!(out, "\nEvents on {}", block.date);
        if block.events.is_empty() {
            let _ = writeln!(out, "  {}", ABSENT);
        }
        for event in &block.events {
            let _ = writeln!(out, "  * {}", event.event_summary);
            if let Some(verb) = &event.event_verb {
                let _ = writeln!(out, "      verb: {}", verb);
            }
            if let Some(reference) = &event.temporal_reference_connection {
                let _ = writeln!(out, "      reference: {}", reference);
            }
        }
    }
    out
}

pub fn render_graph(result: &AnalysisResult, kind: GraphKind) -> String {
    let mut out = String::new();
    heading(&mut out, kind.title());
    let graph = kind.build(result);
    if graph.is_empty() {
        let _ = writeln!(out, "{}", kind.empty_message());
        return out;
    }
    let _ = writeln!(out, "{} nodes, {} edges\n", graph.nodes.len(), graph.edges.len());
    out.push_str(&graph.render_text());
    out
}

pub fn render_dictionary(result: &AnalysisResult) -> String {
    let mut out = String::new();
    heading(&mut out, "Dictionary+ (Manual Morphological Analysis)");
    match result.original_text.as_deref() {
        Some(text) if !text.trim().is_empty() => {
            let _ = writeln!(out, "{}", text);
            let _ = writeln!(
                out,
                "\nLook up any word with: anasi morphology <word> --language \"{}\"",
                result.effective_language()
            );
        }
        _ => out.push_str("No text available\n"),
    }
    out
}

fn render_parts_of_speech_prompt(result: &AnalysisResult) -> String {
    let mut out = String::new();
    heading(&mut out, "Parts of Speech");
    match result.original_text.as_deref() {
        Some(text) if !text.trim().is_empty() => {
            out.push_str("Tag the submitted text with: anasi pos --entry <id>\n");
        }
        _ => out.push_str("No text available\n"),
    }
    out
}

/// Morphology lookup result for `word`.
pub fn render_morphology(word: &str, response: &MorphologyResponse) -> String {
    let mut out = String::new();
    heading(&mut out, "Morphological Analysis Result");
    let _ = writeln!(out, "Currently Selected: {}\n", word);
    if response.analysis.trim().is_empty() {
        out.push_str("No analysis returned\n");
    } else {
        let _ = writeln!(out, "{}", response.analysis);
    }
    out
}

/// Token / part-of-speech table.
pub fn render_parts_of_speech(response: &PartsOfSpeechResponse) -> String {
    let mut out = String::new();
    heading(&mut out, "Parts of Speech");
    if response.parts_of_speech.is_empty() {
        out.push_str("No tokens returned\n");
        return out;
    }
    let width = response
        .parts_of_speech
        .iter()
        .map(|t| t.token.chars().count())
        .max()
        .unwrap_or(0);
    for tag in &response.parts_of_speech {
        let _ = writeln!(out, "{:<width$}  {}", tag.token, tag.part_of_speech, width = width);
    }
    out
}
