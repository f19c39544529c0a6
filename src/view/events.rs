//! Events tab: substring filter and fixed-size pagination

use crate::model::Event;

/// Rows per events page.
pub const PAGE_SIZE: usize = 15;

/// Local state of the events tab.
///
/// The page cursor is 1-based and always clamped to
/// `[1, max(1, ceil(matches / PAGE_SIZE))]` against the events it is read with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsView {
    filter: String,
    page: usize,
}

impl Default for EventsView {
    fn default() -> Self {
        Self {
            filter: String::new(),
            page: 1,
        }
    }
}

/// One page of filtered events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsPage<'a> {
    pub rows: Vec<&'a Event>,
    /// 1-based, already clamped
    pub page: usize,
    pub page_count: usize,
    pub total_matches: usize,
}

impl EventsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Replace the filter text; the cursor returns to page 1.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 1;
    }

    /// Move to `page`, clamped against the current matches in `events`.
    pub fn go_to_page(&mut self, page: usize, events: &[Event]) {
        let count = page_count(self.matching(events).count());
        self.page = page.clamp(1, count);
    }

    pub fn next_page(&mut self, events: &[Event]) {
        self.go_to_page(self.page.saturating_add(1), events);
    }

    pub fn previous_page(&mut self, events: &[Event]) {
        self.go_to_page(self.page.saturating_sub(1), events);
    }

    /// Events matching the filter, in input order.
    pub fn matching<'a>(&'a self, events: &'a [Event]) -> impl Iterator<Item = &'a Event> + 'a {
        let needle = self.filter.trim().to_lowercase();
        events
            .iter()
            .filter(move |event| needle.is_empty() || event_matches(event, &needle))
    }

    /// The current page of matches.
    pub fn page<'a>(&self, events: &'a [Event]) -> EventsPage<'a> {
        let needle = self.filter.trim().to_lowercase();
        let matches: Vec<&Event> = events
            .iter()
            .filter(|event| needle.is_empty() || event_matches(event, &needle))
            .collect();
        let count = page_count(matches.len());
        let page = self.page.clamp(1, count);

        EventsPage {
            total_matches: matches.len(),
            rows: matches
                .into_iter()
                .skip((page - 1) * PAGE_SIZE)
                .take(PAGE_SIZE)
                .collect(),
            page,
            page_count: count,
        }
    }
}

/// Pages needed for `matches` rows; never less than one.
pub fn page_count(matches: usize) -> usize {
    matches.div_ceil(PAGE_SIZE).max(1)
}

/// Case-insensitive match over sentence, type, verb, agent and patients.
fn event_matches(event: &Event, needle: &str) -> bool {
    let fields = [
        Some(event.sentence.as_str()),
        Some(event.event_type.as_str()),
        Some(event.verb.as_str()),
        event.agent.as_deref(),
        event.patients.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(n: usize) -> Vec<Event> {
        (0..n)
            .map(|i| Event {
                sentence: format!("Sentence {}", i),
                event_type: if i % 2 == 0 { "attack" } else { "statement" }.to_string(),
                verb: "said".to_string(),
                agent: (i == 3).then(|| "Ministry of Defence".to_string()),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn page_count_is_at_least_one() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(15), 1);
        assert_eq!(page_count(16), 2);
        assert_eq!(page_count(31), 3);
    }

    #[test]
    fn first_page_holds_fifteen_rows() {
        let events = events(40);
        let view = EventsView::new();
        let page = view.page(&events);
        assert_eq!(page.rows.len(), PAGE_SIZE);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total_matches, 40);
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let events = events(40);
        let mut view = EventsView::new();
        view.go_to_page(3, &events);
        let page = view.page(&events);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[0].sentence, "Sentence 30");
    }

    #[test]
    fn page_is_clamped_to_range() {
        let events = events(20);
        let mut view = EventsView::new();
        view.go_to_page(99, &events);
        assert_eq!(view.page(&events).page, 2);
        view.go_to_page(0, &events);
        assert_eq!(view.page(&events).page, 1);
        view.previous_page(&events);
        assert_eq!(view.page(&events).page, 1);
        view.next_page(&events);
        view.next_page(&events);
        assert_eq!(view.page(&events).page, 2);
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let events = events(10);
        let mut view = EventsView::new();
        view.set_filter("ATTACK");
        assert_eq!(view.matching(&events).count(), 5);
        view.set_filter("ministry");
        let page = view.page(&events);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].sentence, "Sentence 3");
    }

    #[test]
    fn changing_filter_resets_page() {
        let events = events(40);
        let mut view = EventsView::new();
        view.go_to_page(3, &events);
        view.set_filter("sentence");
        assert_eq!(view.page(&events).page, 1);
    }

    #[test]
    fn filter_with_no_matches_shows_one_empty_page() {
        let events = events(40);
        let mut view = EventsView::new();
        view.go_to_page(2, &events);
        view.set_filter("zzz-no-such-text");
        let page = view.page(&events);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total_matches, 0);
    }

    #[test]
    fn stale_cursor_is_clamped_when_read() {
        let many = events(40);
        let few = events(3);
        let mut view = EventsView::new();
        view.go_to_page(3, &many);
        assert_eq!(view.page(&few).page, 1);
    }
}
