use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use crate::tui::app::App;
use crate::tui::theme::Theme;

/// Greeting, counts and completion gauge
pub fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let bg = theme.background;
    let stats = app.store.stats();

    let greeting = Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            app.store.time_of_day().greeting(),
            Style::default()
                .fg(theme.accent)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(greeting).style(Style::default().bg(bg)), rows[0]);

    let dim = Style::default().fg(theme.dim).bg(bg);
    let mut counts = vec![
        Span::styled(" ", dim),
        Span::styled(
            format!("{} tasks", stats.total),
            Style::default().fg(theme.text).bg(bg),
        ),
        Span::styled(format!("  {} completed", stats.completed), dim),
        Span::styled(format!("  {} active", stats.active), dim),
    ];
    if stats.overdue > 0 {
        counts.push(Span::styled(
            format!("  {} overdue", stats.overdue),
            Style::default().fg(theme.red).bg(bg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(counts)).style(Style::default().bg(bg)),
        rows[1],
    );

    let gauge_area = Rect {
        x: rows[2].x + 1,
        width: rows[2].width.saturating_sub(2),
        ..rows[2]
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.selection_bg))
        .ratio((stats.percentage / 100.0).clamp(0.0, 1.0))
        .label(Span::styled(
            format!("{:.0}%", stats.percentage),
            Style::default().fg(theme.text_bright),
        ));
    frame.render_widget(gauge, gauge_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{render_to_string, test_app};

    fn render(app: &App) -> String {
        let theme = app.theme();
        render_to_string(50, 3, |frame, area| render_header(frame, app, &theme, area))
    }

    #[test]
    fn shows_greeting_counts_and_percentage() {
        let (mut app, _) = test_app(&["a", "b", "c", "d"]);
        let a = app.store.tasks()[0].id;
        app.store.toggle(a);
        let out = render(&app);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " Good morning");
        assert_eq!(lines[1], " 4 tasks  1 completed  3 active");
        assert!(lines[2].contains("25%"));
    }

    #[test]
    fn overdue_count_only_when_present() {
        let (mut app, _) = test_app(&["late"]);
        let id = app.store.tasks()[0].id;
        app.store
            .set_due_date(id, crate::model::task::parse_due_date("2025-05-01"));
        let out = render(&app);
        assert!(out.contains("1 overdue"));
    }

    #[test]
    fn empty_list_is_zero_percent() {
        let (app, _) = test_app(&[]);
        let out = render(&app);
        assert!(out.contains("0 tasks"));
        assert!(out.contains("0%"));
    }
}
