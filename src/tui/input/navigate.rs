use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

use super::edit::due_prompt_text;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')
        ) {
            app.show_help = false;
        }
        return;
    }
    app.message = None;

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            // Esc drops an applied search before it quits
            if app.store.search_query().is_empty() {
                app.should_quit = true;
            } else {
                app.store.set_search("");
                app.clamp_cursor();
            }
        }
        KeyCode::Char('?') => app.show_help = true,

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => {
            if app.cursor + 1 < app.rows().len() {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => app.cursor = app.cursor.saturating_sub(1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.rows().len().saturating_sub(1);
        }

        // Modes
        KeyCode::Char('a') | KeyCode::Char('i') => {
            app.editor.set(app.store.input());
            app.mode = Mode::Add;
        }
        KeyCode::Char('/') => {
            app.editor.set(app.store.search_query());
            app.mode = Mode::Search;
        }
        KeyCode::Char('D') => {
            if let Some(id) = app.selected_id() {
                let current = app.store.get(id).and_then(|t| t.due_date);
                app.editor.set(&due_prompt_text(current));
                app.mode = Mode::Due(id);
            }
        }

        // View
        KeyCode::Char('f') | KeyCode::Tab => {
            app.store.set_filter(app.store.filter().next());
            app.clamp_cursor();
        }
        KeyCode::Char('t') => {
            app.store.toggle_theme();
        }

        // Task edits
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('x') => {
            if let Some(id) = app.selected_id() {
                app.store.toggle(id);
                // Keep the cursor on the task as it moves between sections,
                // or near where it was if the filter hid it
                app.select(id);
                app.clamp_cursor();
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = app.selected_id()
                && !app.store.is_pending_deletion(id)
            {
                app.store.delete(id);
            }
        }
        KeyCode::Char('C') => {
            let marked = app.store.clear_completed();
            app.message = Some(match marked {
                0 => "nothing to clear".to_string(),
                1 => "clearing 1 completed task".to_string(),
                n => format!("clearing {} completed tasks", n),
            });
        }
        KeyCode::Char('p') => {
            if let Some(id) = app.selected_id()
                && let Some(priority) = app.store.get(id).map(|t| t.priority)
            {
                app.store.set_priority(id, priority.cycle());
            }
        }
        KeyCode::Char('K') => move_selected(app, -1),
        KeyCode::Char('J') => move_selected(app, 1),
        _ => {}
    }
}

/// Reorder the selected task past its neighbour in display order
fn move_selected(app: &mut App, delta: isize) {
    let rows = app.rows();
    let Some(&source) = rows.get(app.cursor) else {
        return;
    };
    let Some(&target) = app
        .cursor
        .checked_add_signed(delta)
        .and_then(|idx| rows.get(idx))
    else {
        return;
    };
    if app.store.reorder(source, target) {
        app.select(source);
    }
}
