use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::view::Filter;
use crate::tui::app::{App, Mode};
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Filter tabs with the applied search on the right, then a separator line
pub fn render_tab_bar(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = theme.background;
    let current = app.store.filter();
    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for filter in Filter::ALL {
        let style = if filter == current {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", tab_label(filter)), style));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    // Show the applied query while not editing it
    let query = app.store.search_query();
    if !query.is_empty() && app.mode != Mode::Search {
        let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
        let room = (chunks[0].width as usize).saturating_sub(used + 1);
        let label = unicode::truncate_to_width(&format!("/{}", query), room);
        let pad = room.saturating_sub(unicode::display_width(&label));
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        spans.push(Span::styled(label, Style::default().fg(theme.highlight).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let separator = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(separator, Style::default().fg(theme.dim).bg(bg))),
        chunks[1],
    );
}

fn tab_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{render_to_string, test_app};

    fn render(app: &App) -> String {
        let theme = app.theme();
        render_to_string(40, 2, |frame, area| render_tab_bar(frame, app, &theme, area))
    }

    #[test]
    fn lists_every_filter() {
        let (app, _) = test_app(&[]);
        let out = render(&app);
        assert_eq!(out.lines().next(), Some("  All   Active   Completed"));
        assert!(out.lines().nth(1).unwrap().starts_with("\u{2500}\u{2500}"));
    }

    #[test]
    fn applied_search_is_right_aligned() {
        let (mut app, _) = test_app(&[]);
        app.store.set_search("milk");
        let out = render(&app);
        let first = out.lines().next().unwrap();
        assert!(first.ends_with("/milk"));
        assert_eq!(unicode::display_width(first), 39);
    }

    #[test]
    fn search_hidden_while_typing_it() {
        let (mut app, _) = test_app(&[]);
        app.store.set_search("milk");
        app.mode = Mode::Search;
        assert!(!render(&app).contains("/milk"));
    }
}
