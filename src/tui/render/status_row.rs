use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Render the input line: add prompt, search prompt or due-date prompt
pub fn render_input_line(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let width = area.width as usize;

    let (prompt, hint) = match app.mode {
        Mode::Navigate => {
            let line = Line::from(Span::styled(
                " > press a to add a task",
                Style::default().fg(theme.dim).bg(bg),
            ));
            frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
            return;
        }
        Mode::Add if app.store.is_adding() => (" > ", "adding\u{2026}"),
        Mode::Add => (" > ", "Enter add  Esc done"),
        Mode::Search => (" /", "Enter keep  Esc clear"),
        Mode::Due(_) => (" due: ", "YYYY-MM-DD[THH:MM], empty clears"),
    };

    let locked = app.mode == Mode::Add && app.store.is_adding();
    let text_style = if locked {
        Style::default().fg(theme.dim).bg(bg)
    } else {
        Style::default().fg(theme.text_bright).bg(bg)
    };

    let text = app.editor.text();
    let (before, after) = text.split_at(app.editor.cursor().min(text.len()));
    let mut spans = vec![
        Span::styled(prompt, Style::default().fg(theme.highlight).bg(bg)),
        Span::styled(before.to_string(), text_style),
    ];
    if !locked {
        spans.push(Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)));
    }
    spans.push(Span::styled(after.to_string(), text_style));

    // Right-aligned hint when it fits
    let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width + 1 < width {
        let padding = width - content_width - hint_width - 1;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        let hint_color = if locked { theme.yellow } else { theme.dim };
        spans.push(Span::styled(hint, Style::default().fg(hint_color).bg(bg)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

/// Render the status row (bottom of screen): a message or key hints
pub fn render_status_row(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let line = match &app.message {
        Some(msg) => Line::from(Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme.yellow).bg(bg),
        )),
        None if app.mode == Mode::Navigate => Line::from(Span::styled(
            " space toggle  d delete  p priority  D due  f filter  / search  ? help",
            Style::default().fg(theme.dim).bg(bg),
        )),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
