use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "quadrant")]
#[command(about = "An offline-first four-quadrant task board with a durable sync queue")]
#[command(long_about = "quadrant - an offline-first four-quadrant task board

Tasks live in one of four quadrants (q1 urgent+important, q2 important,
q3 urgent, q4 neither). Every mutating action is written to a durable
offline queue first and synced to the task repository when connectivity
allows, so the board stays fully usable offline.

QUICK START:
  quadrant add \"Write report\" -q q1    Queue a new task
  quadrant queue run                   Execute pending changes
  quadrant tasks                       Show the board
  quadrant board                       Interactive board (drag with mouse)

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Queue a new task
    ///
    /// The task is written to the offline queue and appears in the
    /// repository on the next sync.
    ///
    /// # Examples
    ///
    ///   quadrant add "Write report" -q q1
    ///   quadrant add "Read book" --quadrant q2 --notes "chapters 1-3"
    #[command(alias = "a")]
    Add(AddArgs),

    /// List tasks on the board
    ///
    /// Shows repository tasks grouped by quadrant, or a single quadrant
    /// with --quadrant.
    #[command(alias = "t")]
    Tasks(TasksArgs),

    /// Run the interactive terminal board
    ///
    /// Drag tasks between quadrants with the mouse (hold to lift, drop on
    /// a quadrant), swipe a task horizontally to delete it. Press 'o' to
    /// toggle simulated connectivity, 's' to sync, 'q' to quit.
    #[command(alias = "b")]
    Board,

    /// Manage the offline sync queue
    Queue(QueueArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Quadrant to place the task in (q1..q4)
    #[arg(long, short = 'q', default_value = "q1")]
    pub quadrant: String,

    /// Optional notes
    #[arg(long, short = 'n')]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Show a single quadrant (q1..q4)
    #[arg(long, short = 'q')]
    pub quadrant: Option<String>,
}

#[derive(Args)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommands,
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// Show sync queue status
    ///
    /// Displays pending, syncing, and failed entries with counts per
    /// operation type and the oldest pending timestamp.
    Status,

    /// Run pending queue entries
    ///
    /// Drains the queue against the task repository, in enqueue order.
    Run {
        /// Stop on first error
        #[arg(long)]
        stop_on_error: bool,
    },

    /// List queue entries
    List {
        /// Filter by status (pending, syncing, failed)
        #[arg(long, short = 's')]
        status: Option<String>,

        /// Maximum entries to show
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },

    /// Retry failed entries
    ///
    /// Resets failed entries to pending with a fresh retry budget.
    Retry {
        /// Retry all failed entries
        #[arg(long)]
        all: bool,

        /// Specific entry ID to retry
        id: Option<String>,
    },

    /// Clear the queue
    ///
    /// Removes every entry, including failed ones. Destructive; requires
    /// --force.
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}
