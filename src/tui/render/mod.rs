pub mod header;
pub mod help_overlay;
pub mod status_row;
pub mod tab_bar;
pub mod task_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let theme = app.theme();

    // Background fill
    let bg_style = Style::default().bg(theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header | tabs | list | input line | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // greeting, counts, gauge
            Constraint::Length(2), // filter tabs + separator
            Constraint::Min(1),    // task list
            Constraint::Length(1), // input line
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, &theme, chunks[0]);
    tab_bar::render_tab_bar(frame, app, &theme, chunks[1]);
    task_list::render_task_list(frame, app, &theme, chunks[2]);
    status_row::render_input_line(frame, app, &theme, chunks[3]);
    status_row::render_status_row(frame, app, &theme, chunks[4]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, &theme, area);
    }
}
