use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::io::kv::{CORRUPT_TODOS_KEY, DARK_MODE_KEY, KvStore, StoreError, TODOS_KEY};
use crate::model::config::TimingConfig;
use crate::model::task::{Priority, Task, TaskId};
use crate::model::view::{Filter, TimeOfDay};
use crate::ops::clock::Clock;
use crate::ops::derive::{self, Stats};
use crate::ops::timer::TimerQueue;

/// Delays used by the deferred operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Window during which a submitted task is not yet in the list
    pub add_delay: Duration,
    /// Window during which a deleted task stays visible, marked pending
    pub delete_grace: Duration,
    /// Interval between time-of-day refreshes
    pub time_of_day_poll: Duration,
}

impl StoreConfig {
    /// Zero add delay and zero grace period. Timers still go through the
    /// queue but are due as soon as they are scheduled.
    pub fn immediate() -> Self {
        StoreConfig {
            add_delay: Duration::ZERO,
            delete_grace: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::from(&TimingConfig::default())
    }
}

impl From<&TimingConfig> for StoreConfig {
    fn from(timing: &TimingConfig) -> Self {
        StoreConfig {
            add_delay: timing.add_delay(),
            delete_grace: timing.delete_grace(),
            time_of_day_poll: timing.time_of_day_poll(),
        }
    }
}

/// Work scheduled on the timer queue
#[derive(Debug)]
enum Deferred {
    /// Prepend a task built at submit time
    CommitAdd { task: Task, clear_input: bool },
    /// Drop one deleted task at the end of its grace period
    Remove(TaskId),
    /// Drop the tasks marked by a clear-completed
    ClearCompleted(Vec<TaskId>),
    RefreshTimeOfDay,
}

/// Derived view of the store, computed fresh on each call to [`TodoStore::view`]
#[derive(Debug, Serialize)]
pub struct TodoView<'a> {
    pub filter: Filter,
    pub search: &'a str,
    pub visible: Vec<&'a Task>,
    pub active: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
    pub stats: Stats,
}

/// Owner of all to-do state.
///
/// Every mutation runs to completion and mirrors the task list (key
/// `todos`) or the theme (key `darkMode`) to the backing [`KvStore`].
/// Deferred work sits on a timer queue driven by [`TodoStore::advance`].
pub struct TodoStore {
    tasks: Vec<Task>,
    filter: Filter,
    search_query: String,
    dark_mode: bool,
    pending_deletions: HashSet<TaskId>,
    input: String,
    pending_adds: usize,
    time_of_day: TimeOfDay,
    next_id: u64,
    timers: TimerQueue<Deferred>,
    clock: Box<dyn Clock>,
    storage: Box<dyn KvStore>,
    config: StoreConfig,
    tasks_dirty: bool,
    theme_dirty: bool,
}

impl TodoStore {
    /// Hydrate a store from `storage`.
    ///
    /// A missing task list starts empty; a missing theme falls back to
    /// `ambient_dark`. An unreadable task list also starts empty: the raw
    /// payload is copied to `todos.corrupt` first so it is not lost when the
    /// next mutation overwrites `todos`. Read failures of the medium itself
    /// are returned.
    pub fn open(
        storage: impl KvStore + 'static,
        clock: impl Clock + 'static,
        config: StoreConfig,
        ambient_dark: bool,
    ) -> Result<Self, StoreError> {
        let mut storage: Box<dyn KvStore> = Box::new(storage);

        let tasks = match storage.get(TODOS_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => tasks,
                Err(e) => {
                    tracing::warn!(error = %e, "stored task list is unreadable, starting empty");
                    if let Err(e) = storage.set(CORRUPT_TODOS_KEY, &raw) {
                        tracing::error!(error = %e, "could not back up unreadable task list");
                    }
                    Vec::new()
                }
            },
        };

        let dark_mode = match storage.get(DARK_MODE_KEY)? {
            None => ambient_dark,
            Some(raw) => serde_json::from_str::<bool>(raw.trim()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored theme is unreadable, using ambient preference");
                ambient_dark
            }),
        };

        let time_of_day = clock.time_of_day();
        let mut store = TodoStore {
            tasks: Vec::new(),
            filter: Filter::default(),
            search_query: String::new(),
            dark_mode,
            pending_deletions: HashSet::new(),
            input: String::new(),
            pending_adds: 0,
            time_of_day,
            next_id: 1,
            timers: TimerQueue::new(),
            clock: Box::new(clock),
            storage,
            config,
            tasks_dirty: false,
            theme_dirty: false,
        };
        store.hydrate(tasks);
        store.schedule_time_of_day_refresh();

        tracing::info!(
            tasks = store.tasks.len(),
            dark_mode = store.dark_mode,
            "store opened"
        );
        Ok(store)
    }

    /// Take ownership of loaded tasks, reassigning any repeated id so the
    /// uniqueness invariant holds from here on.
    fn hydrate(&mut self, loaded: Vec<Task>) {
        let max_id = loaded.iter().map(|t| t.id.0).max().unwrap_or(0);
        self.next_id = max_id.saturating_add(1);

        let mut seen = HashSet::new();
        for mut task in loaded {
            if !seen.insert(task.id) {
                let fresh = self.allocate_id();
                tracing::warn!(old = %task.id, new = %fresh, "duplicate task id reassigned");
                task.id = fresh;
                seen.insert(fresh);
                self.tasks_dirty = true;
            }
            self.tasks.push(task);
        }
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The full list in display order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// True while a submitted task waits for its deferred insert
    pub fn is_adding(&self) -> bool {
        self.pending_adds > 0
    }

    pub fn pending_deletions(&self) -> &HashSet<TaskId> {
        &self.pending_deletions
    }

    pub fn is_pending_deletion(&self, id: TaskId) -> bool {
        self.pending_deletions.contains(&id)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Evaluated against the clock at call time
    pub fn is_overdue(&self, task: &Task) -> bool {
        derive::is_overdue(task, self.clock.now())
    }

    pub fn stats(&self) -> Stats {
        derive::stats(&self.tasks, self.clock.now())
    }

    pub fn completion_percentage(&self) -> f64 {
        derive::completion_percentage(&self.tasks)
    }

    /// Filtered, searched and partitioned view of the current state
    pub fn view(&self) -> TodoView<'_> {
        let visible = derive::visible_tasks(&self.tasks, self.filter, &self.search_query);
        let (active, completed) = derive::partition(&visible);
        TodoView {
            filter: self.filter,
            search: &self.search_query,
            visible,
            active,
            completed,
            stats: self.stats(),
        }
    }

    // -----------------------------------------------------------------------
    // Add
    // -----------------------------------------------------------------------

    /// Add a task with default priority and no deadline.
    /// See [`TodoStore::add_with`].
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        self.add_with(text, Priority::default(), None)
    }

    /// Trim `text` and create a task at the front of the list. Blank text is
    /// ignored and returns `None`. With a non-zero add delay the insert is
    /// committed by a timer and the store reports [`TodoStore::is_adding`]
    /// until then.
    pub fn add_with(
        &mut self,
        text: &str,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Option<TaskId> {
        self.add_inner(text, priority, due_date, false)
    }

    /// Add from the input buffer. Ignored while a previous submission is
    /// still being committed. The buffer is cleared when the insert commits.
    pub fn submit_input(&mut self) -> Option<TaskId> {
        if self.is_adding() {
            return None;
        }
        let text = self.input.clone();
        self.add_inner(&text, Priority::default(), None, true)
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    fn add_inner(
        &mut self,
        text: &str,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
        clear_input: bool,
    ) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.allocate_id();
        let mut task = Task::new(id, text.to_string(), self.clock.now());
        task.priority = priority;
        task.due_date = due_date;

        if self.config.add_delay.is_zero() {
            self.commit_add(task, clear_input);
        } else {
            self.pending_adds += 1;
            let now = self.clock.now();
            self.timers.schedule_after(
                now,
                self.config.add_delay,
                Deferred::CommitAdd { task, clear_input },
            );
        }
        Some(id)
    }

    fn commit_add(&mut self, task: Task, clear_input: bool) {
        tracing::debug!(id = %task.id, "task added");
        self.tasks.insert(0, task);
        if clear_input {
            self.input.clear();
        }
        self.tasks_changed();
    }

    // -----------------------------------------------------------------------
    // In-place edits
    // -----------------------------------------------------------------------

    /// Flip completion. Returns false if the id is unknown.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        tracing::debug!(id = %id, completed = task.completed, "task toggled");
        self.tasks_changed();
        true
    }

    pub fn set_priority(&mut self, id: TaskId, priority: Priority) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.priority = priority;
        tracing::debug!(id = %id, priority = %priority, "priority updated");
        self.tasks_changed();
        true
    }

    /// Set or clear the deadline. Returns false if the id is unknown.
    pub fn set_due_date(&mut self, id: TaskId, due_date: Option<DateTime<Utc>>) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.due_date = due_date;
        tracing::debug!(id = %id, due = ?due_date, "due date updated");
        self.tasks_changed();
        true
    }

    // -----------------------------------------------------------------------
    // Reorder
    // -----------------------------------------------------------------------

    /// Move `source` to the index `target` occupies before the move. No-op
    /// if the ids are equal or either is missing.
    pub fn reorder(&mut self, source: TaskId, target: TaskId) -> bool {
        if source == target {
            return false;
        }
        let Some(from) = self.index_of(source) else {
            return false;
        };
        let Some(to) = self.index_of(target) else {
            return false;
        };
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        tracing::debug!(source = %source, target = %target, from, to, "task moved");
        self.tasks_changed();
        true
    }

    /// Swap with the previous task in the full list
    pub fn move_up(&mut self, id: TaskId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx > 0 => {
                let target = self.tasks[idx - 1].id;
                self.reorder(id, target)
            }
            _ => false,
        }
    }

    /// Swap with the next task in the full list
    pub fn move_down(&mut self, id: TaskId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx + 1 < self.tasks.len() => {
                let target = self.tasks[idx + 1].id;
                self.reorder(id, target)
            }
            _ => false,
        }
    }

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Mark a task pending and schedule its removal after the grace period.
    /// Returns false if the id is unknown.
    pub fn delete(&mut self, id: TaskId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.pending_deletions.insert(id);
        let now = self.clock.now();
        self.timers
            .schedule_after(now, self.config.delete_grace, Deferred::Remove(id));
        tracing::debug!(id = %id, "task marked for deletion");
        true
    }

    /// Mark every completed task pending and schedule their removal after
    /// the grace period. Returns the number of tasks marked.
    pub fn clear_completed(&mut self) -> usize {
        let ids: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id)
            .collect();
        if ids.is_empty() {
            return 0;
        }
        self.pending_deletions.extend(ids.iter().copied());
        let count = ids.len();
        let now = self.clock.now();
        self.timers.schedule_after(
            now,
            self.config.delete_grace,
            Deferred::ClearCompleted(ids),
        );
        tracing::debug!(count, "completed tasks marked for deletion");
        count
    }

    fn remove_ids(&mut self, ids: &[TaskId]) {
        let before = self.tasks.len();
        self.tasks.retain(|t| !ids.contains(&t.id));
        for id in ids {
            self.pending_deletions.remove(id);
        }
        let removed = before - self.tasks.len();
        if removed > 0 {
            tracing::debug!(removed, "tasks removed");
            self.tasks_changed();
        }
    }

    // -----------------------------------------------------------------------
    // View state and theme
    // -----------------------------------------------------------------------

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        if self.dark_mode == dark {
            return;
        }
        self.dark_mode = dark;
        self.theme_dirty = true;
        tracing::debug!(dark_mode = dark, "theme changed");
        self.mirror();
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Fire every timer due on the store's clock. Each one reads and writes
    /// the state as it is now. Returns how many fired.
    pub fn advance(&mut self) -> usize {
        let due = self.timers.pop_due(self.clock.now());
        let fired = due.len();
        for deferred in due {
            self.apply(deferred);
        }
        fired
    }

    /// Fire all pending one-shot timers now, regardless of their deadlines.
    /// Used before exiting so no submitted add or delete is lost.
    pub fn settle(&mut self) -> usize {
        let mut fired = 0;
        let mut keep_refresh = false;
        while let Some((_, deferred)) = self.timers.pop_next() {
            if matches!(deferred, Deferred::RefreshTimeOfDay) {
                keep_refresh = true;
                continue;
            }
            self.apply(deferred);
            fired += 1;
        }
        if keep_refresh {
            self.schedule_time_of_day_refresh();
        }
        fired
    }

    /// When the next timer is due, for an event loop to sleep until
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    /// Number of one-shot timers (adds and deletions) still pending
    pub fn pending_timers(&self) -> usize {
        self.timers
            .pending()
            .filter(|d| !matches!(d, Deferred::RefreshTimeOfDay))
            .count()
    }

    fn apply(&mut self, deferred: Deferred) {
        match deferred {
            Deferred::CommitAdd { task, clear_input } => {
                self.pending_adds = self.pending_adds.saturating_sub(1);
                self.commit_add(task, clear_input);
            }
            Deferred::Remove(id) => self.remove_ids(&[id]),
            Deferred::ClearCompleted(ids) => self.remove_ids(&ids),
            Deferred::RefreshTimeOfDay => {
                self.time_of_day = self.clock.time_of_day();
                self.schedule_time_of_day_refresh();
            }
        }
    }

    fn schedule_time_of_day_refresh(&mut self) {
        let now = self.clock.now();
        self.timers
            .schedule_after(now, self.config.time_of_day_poll, Deferred::RefreshTimeOfDay);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn tasks_changed(&mut self) {
        self.tasks_dirty = true;
        self.mirror();
    }

    /// Write whatever is dirty. Failures are logged and left dirty, so the
    /// next mutation retries them.
    fn mirror(&mut self) {
        if self.tasks_dirty {
            match self.write_tasks() {
                Ok(()) => self.tasks_dirty = false,
                Err(e) => tracing::error!(error = %e, "could not save task list"),
            }
        }
        if self.theme_dirty {
            match self.write_theme() {
                Ok(()) => self.theme_dirty = false,
                Err(e) => tracing::error!(error = %e, "could not save theme"),
            }
        }
    }

    /// Write both keys unconditionally and report the first failure.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.write_tasks()?;
        self.tasks_dirty = false;
        self.write_theme()?;
        self.theme_dirty = false;
        Ok(())
    }

    /// True if an earlier write failed and has not been retried successfully
    pub fn has_unsaved_changes(&self) -> bool {
        self.tasks_dirty || self.theme_dirty
    }

    fn write_tasks(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.tasks)?;
        self.storage.set(TODOS_KEY, &json)
    }

    fn write_theme(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.dark_mode)?;
        self.storage.set(DARK_MODE_KEY, &json)
    }
}
