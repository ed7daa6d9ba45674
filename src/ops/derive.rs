//! Read-time views over the task list. Everything here is a pure function of
//! its inputs; nothing is cached on the store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::task::Task;
use crate::model::view::Filter;

pub fn matches_filter(task: &Task, filter: Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Active => !task.completed,
        Filter::Completed => task.completed,
    }
}

/// Case-insensitive substring match. An empty query matches everything.
pub fn matches_search(task: &Task, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    task.text.to_lowercase().contains(&query.to_lowercase())
}

/// Tasks passing both the filter and the search, in list order.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: Filter, query: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| matches_filter(t, filter) && matches_search(t, query))
        .collect()
}

/// Split a view into (active, completed), each keeping list order.
pub fn partition<'a>(visible: &[&'a Task]) -> (Vec<&'a Task>, Vec<&'a Task>) {
    visible.iter().copied().partition(|t| !t.completed)
}

/// Share of completed tasks over the whole list (not the filtered view), in
/// percent. Zero for an empty list.
pub fn completion_percentage(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    100.0 * completed as f64 / tasks.len() as f64
}

/// True when the task has a deadline strictly before `now`.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.due_date.is_some_and(|due| due < now)
}

/// Counters shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
    pub percentage: f64,
}

pub fn stats(tasks: &[Task], now: DateTime<Utc>) -> Stats {
    let completed = tasks.iter().filter(|t| t.completed).count();
    Stats {
        total: tasks.len(),
        completed,
        active: tasks.len() - completed,
        overdue: tasks
            .iter()
            .filter(|t| !t.completed && is_overdue(t, now))
            .count(),
        percentage: completion_percentage(tasks),
    }
}
