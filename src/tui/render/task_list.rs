use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::format_due;
use crate::model::task::Task;
use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::util::unicode;

/// Render open tasks, then completed ones under a section header.
/// Adjusts `app.scroll_offset` so the cursor row stays on screen.
pub fn render_task_list(frame: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let bg = theme.background;
    let width = area.width as usize;
    let height = area.height as usize;

    let (lines, cursor_line) = {
        let view = app.store.view();
        if view.visible.is_empty() {
            let hint = if app.store.tasks().is_empty() {
                "Nothing to do. Press a to add a task."
            } else {
                "No matching tasks"
            };
            let line = Line::from(Span::styled(
                format!("  {}", hint),
                Style::default().fg(theme.dim).bg(bg),
            ));
            frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
            app.scroll_offset = 0;
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        let mut cursor_line = 0;
        let mut row = 0;
        for task in &view.active {
            if row == app.cursor {
                cursor_line = lines.len();
            }
            lines.push(task_line(app, theme, task, row == app.cursor, width));
            row += 1;
        }
        if !view.completed.is_empty() {
            if !view.active.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!("  Completed ({})", view.completed.len()),
                Style::default()
                    .fg(theme.dim)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )));
            for task in &view.completed {
                if row == app.cursor {
                    cursor_line = lines.len();
                }
                lines.push(task_line(app, theme, task, row == app.cursor, width));
                row += 1;
            }
        }
        (lines, cursor_line)
    };

    // Keep the cursor visible
    if cursor_line < app.scroll_offset {
        app.scroll_offset = cursor_line;
    } else if height > 0 && cursor_line >= app.scroll_offset + height {
        app.scroll_offset = cursor_line + 1 - height;
    }
    let max_offset = lines.len().saturating_sub(height);
    app.scroll_offset = app.scroll_offset.min(max_offset);

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(app.scroll_offset)
        .take(height)
        .collect();
    frame.render_widget(Paragraph::new(visible).style(Style::default().bg(bg)), area);
}

fn task_line<'a>(app: &App, theme: &Theme, task: &Task, selected: bool, width: usize) -> Line<'a> {
    let row_bg = if selected { theme.selection_bg } else { theme.background };
    let base = Style::default().bg(row_bg);
    let pending = app.store.is_pending_deletion(task.id);
    let overdue = !task.completed && app.store.is_overdue(task);

    let marker = if selected { "\u{25B8} " } else { "  " };
    let check = if task.completed { "[x] " } else { "[ ] " };
    let mut spans = vec![
        Span::styled(marker, base.fg(theme.highlight)),
        Span::styled(check, base.fg(if task.completed { theme.green } else { theme.dim })),
        Span::styled("\u{25CF} ", base.fg(theme.priority_color(task.priority))),
    ];
    let prefix_width = 2 + 4 + 2;

    let due_label = task.due_date.map(|due| {
        if overdue {
            format!("  overdue {}", format_due(due))
        } else {
            format!("  due {}", format_due(due))
        }
    });
    let suffix = if pending { "  deleting\u{2026}" } else { "" };
    let tail_width = due_label.as_deref().map_or(0, unicode::display_width)
        + unicode::display_width(suffix);

    let text_room = width.saturating_sub(prefix_width + tail_width);
    let text = unicode::truncate_to_width(&task.text, text_room);
    let mut text_style = if task.completed || pending {
        base.fg(theme.dim)
    } else if selected {
        base.fg(theme.text_bright)
    } else {
        base.fg(theme.text)
    };
    if task.completed || pending {
        text_style = text_style.add_modifier(Modifier::CROSSED_OUT);
    }
    let text_width = unicode::display_width(&text);
    spans.push(Span::styled(text, text_style));

    if let Some(label) = due_label {
        let color = if overdue { theme.red } else { theme.dim };
        spans.push(Span::styled(label, base.fg(color)));
    }
    if pending {
        spans.push(Span::styled(suffix, base.fg(theme.red)));
    }

    // Fill the selected row to the edge
    let used = prefix_width + text_width + tail_width;
    if selected && used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}
