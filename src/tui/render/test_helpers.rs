use chrono::{TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::time::Duration;

use crate::io::kv::MemoryStore;
use crate::model::UiConfig;
use crate::ops::clock::ManualClock;
use crate::ops::store::{StoreConfig, TodoStore};
use crate::tui::app::App;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app at the given size
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

/// App over an in-memory store with `texts` in display order, synchronous
/// adds and a 300 ms delete grace. The clock starts at 2025-05-10 09:00 UTC
/// with the local hour pinned to 9.
pub fn test_app(texts: &[&str]) -> (App, ManualClock) {
    test_app_with(
        texts,
        StoreConfig {
            add_delay: Duration::ZERO,
            ..StoreConfig::default()
        },
    )
}

pub fn test_app_with(texts: &[&str], config: StoreConfig) -> (App, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap());
    clock.set_local_hour(9);
    let mut store = TodoStore::open(MemoryStore::new(), clock.clone(), config, false).unwrap();
    for text in texts.iter().rev() {
        store.add(text);
    }
    store.settle();
    (App::new(store, UiConfig::default()), clock)
}
