use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::kv::FileStore;
use crate::model::config::AppConfig;
use crate::model::task::{Priority, TaskId, parse_due_date};
use crate::model::view::Filter;
use crate::ops::clock::SystemClock;
use crate::ops::store::{StoreConfig, TodoStore};
use crate::util::ambient;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, data_dir: &Path, config: &AppConfig) -> CmdResult {
    let json = cli.json;
    let Some(command) = cli.command else {
        return Ok(());
    };

    let mut store = open_store(data_dir, config)?;
    let result = match command {
        Commands::Add(args) => cmd_add(&mut store, args, json),
        Commands::List(args) => cmd_list(&mut store, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut store, args, json),
        Commands::Rm(args) => cmd_rm(&mut store, args, json),
        Commands::Clear => cmd_clear(&mut store, json),
        Commands::Mv(args) => cmd_mv(&mut store, args, json),
        Commands::Up(args) => cmd_shift(&mut store, args, true, json),
        Commands::Down(args) => cmd_shift(&mut store, args, false, json),
        Commands::Priority(args) => cmd_priority(&mut store, args, json),
        Commands::Due(args) => cmd_due(&mut store, args, json),
        Commands::Stats => cmd_stats(&store, json),
        Commands::Theme(args) => cmd_theme(&mut store, args, json),
    };

    // Deletions are deferred even with a zero grace period; apply them and
    // make sure everything reached disk before reporting success.
    store.settle();
    if store.has_unsaved_changes() {
        store.flush()?;
    }
    result
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// One-shot commands never wait: no add delay and no delete grace period.
fn open_store(data_dir: &Path, config: &AppConfig) -> Result<TodoStore, Box<dyn std::error::Error>> {
    let kv = FileStore::open(data_dir)?;
    let store_config = StoreConfig {
        time_of_day_poll: config.timing.time_of_day_poll(),
        ..StoreConfig::immediate()
    };
    Ok(TodoStore::open(
        kv,
        SystemClock,
        store_config,
        ambient::prefers_dark(),
    )?)
}

fn parse_id(raw: &str) -> Result<TaskId, String> {
    raw.parse::<TaskId>()
        .map_err(|_| format!("invalid task id '{}'", raw))
}

/// Parse an id and check it exists; the store itself ignores unknown ids.
fn existing_id(store: &TodoStore, raw: &str) -> Result<TaskId, String> {
    let id = parse_id(raw)?;
    if store.contains(id) {
        Ok(id)
    } else {
        Err(format!("task not found: {}", id))
    }
}

fn parse_due(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, String> {
    parse_due_date(raw).ok_or_else(|| {
        format!(
            "invalid due date '{}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339)",
            raw
        )
    })
}

fn print_task(store: &TodoStore, id: TaskId, json: bool) -> CmdResult {
    let task = store
        .get(id)
        .ok_or_else(|| format!("task not found: {}", id))?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&task_to_json(task, store.now()))?
        );
    } else {
        println!("{}", format_task_line(task, store.now()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &mut TodoStore, args: AddArgs, json: bool) -> CmdResult {
    let priority = match args.priority.as_deref() {
        Some(p) => p.parse::<Priority>()?,
        None => Priority::default(),
    };
    let due = args.due.as_deref().map(parse_due).transpose()?;

    let id = store
        .add_with(&args.text, priority, due)
        .ok_or("task text is empty")?;
    store.settle();

    if json {
        print_task(store, id, true)
    } else {
        println!("{}", id);
        Ok(())
    }
}

fn cmd_list(store: &mut TodoStore, args: ListArgs, json: bool) -> CmdResult {
    let filter: Filter = args.filter.parse()?;
    store.set_filter(filter);
    store.set_search(args.search.clone().unwrap_or_default());

    let now = store.now();
    let view = store.view();
    if json {
        let out = TaskListJson {
            filter: filter.to_string(),
            search: args.search,
            tasks: view.visible.iter().map(|t| task_to_json(t, now)).collect(),
            stats: view.stats,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if view.visible.is_empty() {
        println!("no tasks");
        return Ok(());
    }
    for task in &view.visible {
        println!("{}", format_task_line(task, now));
    }
    Ok(())
}

fn cmd_toggle(store: &mut TodoStore, args: IdArg, json: bool) -> CmdResult {
    let id = existing_id(store, &args.id)?;
    store.toggle(id);
    print_task(store, id, json)
}

fn cmd_rm(store: &mut TodoStore, args: IdArg, json: bool) -> CmdResult {
    let id = existing_id(store, &args.id)?;
    store.delete(id);
    store.settle();
    if json {
        println!("{}", serde_json::json!({ "deleted": [id.0] }));
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_clear(store: &mut TodoStore, json: bool) -> CmdResult {
    let ids: Vec<u64> = store
        .tasks()
        .iter()
        .filter(|t| t.completed)
        .map(|t| t.id.0)
        .collect();
    let count = store.clear_completed();
    store.settle();
    if json {
        println!("{}", serde_json::json!({ "deleted": ids }));
    } else {
        println!("cleared {} completed task{}", count, if count == 1 { "" } else { "s" });
    }
    Ok(())
}

fn cmd_mv(store: &mut TodoStore, args: MvArgs, json: bool) -> CmdResult {
    let source = existing_id(store, &args.source)?;
    let target = existing_id(store, &args.target)?;
    store.reorder(source, target);
    print_task(store, source, json)
}

/// Move one place in the full list; a task already at the edge stays put
fn cmd_shift(store: &mut TodoStore, args: IdArg, up: bool, json: bool) -> CmdResult {
    let id = existing_id(store, &args.id)?;
    let moved = if up {
        store.move_up(id)
    } else {
        store.move_down(id)
    };
    if !moved {
        tracing::debug!(id = %id, up, "task already at the edge");
    }
    print_task(store, id, json)
}

fn cmd_priority(store: &mut TodoStore, args: PriorityArgs, json: bool) -> CmdResult {
    let id = existing_id(store, &args.id)?;
    let priority: Priority = args.priority.parse()?;
    store.set_priority(id, priority);
    print_task(store, id, json)
}

fn cmd_due(store: &mut TodoStore, args: DueArgs, json: bool) -> CmdResult {
    let id = existing_id(store, &args.id)?;
    let due = if args.clear {
        None
    } else {
        let raw = args.date.as_deref().ok_or("a date or --clear is required")?;
        Some(parse_due(raw)?)
    };
    store.set_due_date(id, due);
    print_task(store, id, json)
}

fn cmd_stats(store: &TodoStore, json: bool) -> CmdResult {
    let stats = store.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", format_stats(&stats));
    }
    Ok(())
}

fn cmd_theme(store: &mut TodoStore, args: ThemeArgs, json: bool) -> CmdResult {
    match args.mode {
        Some(ThemeMode::Dark) => store.set_dark_mode(true),
        Some(ThemeMode::Light) => store.set_dark_mode(false),
        Some(ThemeMode::Toggle) => {
            store.toggle_theme();
        }
        None => {}
    }
    if json {
        println!(
            "{}",
            serde_json::to_string(&ThemeJson {
                dark_mode: store.dark_mode()
            })?
        );
    } else {
        println!("{}", if store.dark_mode() { "dark" } else { "light" });
    }
    Ok(())
}
