use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::task::{Priority, Task};
use crate::ops::derive::{self, Stats};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: String,
    pub overdue: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub tasks: Vec<TaskJson>,
    pub stats: Stats,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub dark_mode: bool,
}

pub fn task_to_json(task: &Task, now: DateTime<Utc>) -> TaskJson {
    TaskJson {
        id: task.id.0,
        text: task.text.clone(),
        completed: task.completed,
        priority: task.priority,
        due_date: task.due_date.map(|d| d.to_rfc3339()),
        created_at: task.created_at.to_rfc3339(),
        overdue: derive::is_overdue(task, now),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One task per line: `  12 [x] high   Buy milk  due 2025-05-03 (overdue)`
pub fn format_task_line(task: &Task, now: DateTime<Utc>) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let mut line = format!(
        "{:>4} [{}] {:<6} {}",
        task.id.0,
        check,
        task.priority.as_str(),
        task.text
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", format_due(due)));
        if derive::is_overdue(task, now) && !task.completed {
            line.push_str(" (overdue)");
        }
    }
    line
}

/// Date only when the deadline is at midnight UTC, full timestamp otherwise
pub fn format_due(due: DateTime<Utc>) -> String {
    if due.time() == chrono::NaiveTime::MIN {
        due.format("%Y-%m-%d").to_string()
    } else {
        due.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "{} tasks, {} completed, {} active, {} overdue ({:.0}% done)",
        stats.total, stats.completed, stats.active, stats.overdue, stats.percentage
    )
}
