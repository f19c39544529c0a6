//! Presentation state: tabs, events-tab filtering/paging, text renderers

mod events;
mod render;
mod tabs;

pub use events::{page_count, EventsPage, EventsView, PAGE_SIZE};
pub use render::{
    render_dictionary, render_entities, render_events, render_graph, render_morphology,
    render_parts_of_speech, render_summary, render_tab, render_tab_bar, render_temporal,
    render_timeline, ABSENT,
};
pub use tabs::{Tab, TabController};
