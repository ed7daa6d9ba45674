use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::kv::FileStore;
use crate::model::task::TaskId;
use crate::model::{AppConfig, UiConfig};
use crate::ops::clock::SystemClock;
use crate::ops::store::{StoreConfig, TodoStore};
use crate::util::ambient;

use super::input::{self, LineEditor};
use super::render;
use super::theme::Theme;

/// Longest the loop sleeps without input, so the clock display stays fresh
const MAX_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input line
    Add,
    /// Typing the search query (applied live)
    Search,
    /// Editing the due date of the given task
    Due(TaskId),
}

/// Main application state
pub struct App {
    pub store: TodoStore,
    pub ui: UiConfig,
    pub mode: Mode,
    /// Index into [`App::rows`]
    pub cursor: usize,
    /// First visible list row
    pub scroll_offset: usize,
    /// Buffer for search and due-date editing, and the cursor for adds
    pub editor: LineEditor,
    pub show_help: bool,
    /// One-shot message for the status row
    pub message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: TodoStore, ui: UiConfig) -> Self {
        App {
            store,
            ui,
            mode: Mode::Navigate,
            cursor: 0,
            scroll_offset: 0,
            editor: LineEditor::default(),
            show_help: false,
            message: None,
            should_quit: false,
        }
    }

    /// Palette for the current theme flag and time of day
    pub fn theme(&self) -> Theme {
        Theme::resolve(self.store.dark_mode(), self.store.time_of_day(), &self.ui)
    }

    /// Task ids in display order: open tasks of the current view, then
    /// completed ones
    pub fn rows(&self) -> Vec<TaskId> {
        let view = self.store.view();
        view.active
            .iter()
            .chain(view.completed.iter())
            .map(|t| t.id)
            .collect()
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.rows().get(self.cursor).copied()
    }

    /// Put the cursor on `id` if it is visible
    pub fn select(&mut self, id: TaskId) {
        if let Some(idx) = self.rows().iter().position(|r| *r == id) {
            self.cursor = idx;
        }
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Fire due timers and bring dependent UI state back in line.
    /// Returns how many timers fired.
    pub fn tick(&mut self) -> usize {
        let fired = self.store.advance();
        if fired > 0 {
            if self.mode == Mode::Add && self.editor.text() != self.store.input() {
                self.editor.set(self.store.input());
            }
            self.clamp_cursor();
        }
        fired
    }

    /// How long to wait for input before the next timer is due
    pub fn poll_timeout(&self) -> Duration {
        match self.store.next_deadline() {
            Some(deadline) => (deadline - self.store.now())
                .to_std()
                .unwrap_or(Duration::ZERO)
                .min(MAX_POLL),
            None => MAX_POLL,
        }
    }
}

pub fn run(data_dir: &Path, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let kv = FileStore::open(data_dir)?;
    let store = TodoStore::open(
        kv,
        SystemClock,
        StoreConfig::from(&config.timing),
        ambient::prefers_dark(),
    )?;
    let mut app = App::new(store, config.ui.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Finish pending adds and deletions before exiting
    app.store.settle();
    app.store.flush()?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout())?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }
        app.tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
