use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tk", about = concat!("[x] tick v", env!("CARGO_PKG_VERSION"), " - a small to-do list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding todos.json, darkMode.json and config.toml
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the top of the list
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Toggle a task between open and completed
    Toggle(IdArg),
    /// Delete a task
    Rm(IdArg),
    /// Delete all completed tasks
    Clear,
    /// Move a task to another task's position
    Mv(MvArgs),
    /// Move a task one place up
    Up(IdArg),
    /// Move a task one place down
    Down(IdArg),
    /// Set a task's priority
    Priority(PriorityArgs),
    /// Set or clear a task's due date
    Due(DueArgs),
    /// Show completion statistics
    Stats,
    /// Show or change the theme
    Theme(ThemeArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// low, medium or high
    #[arg(long, short)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD, local YYYY-MM-DDTHH:MM, or RFC 3339)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// all, active or completed
    #[arg(long, short, default_value = "all")]
    pub filter: String,
    /// Case-insensitive text to match
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task to move
    pub source: String,
    /// Task whose position it takes
    pub target: String,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Task ID
    pub id: String,
    /// low, medium or high
    pub priority: String,
}

#[derive(Args)]
pub struct DueArgs {
    /// Task ID
    pub id: String,
    /// Due date (YYYY-MM-DD, local YYYY-MM-DDTHH:MM, or RFC 3339)
    #[arg(required_unless_present = "clear")]
    pub date: Option<String>,
    /// Remove the due date
    #[arg(long, conflicts_with = "date")]
    pub clear: bool,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// New theme; omit to print the current one
    #[arg(value_enum)]
    pub mode: Option<ThemeMode>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ThemeMode {
    Dark,
    Light,
    Toggle,
}
