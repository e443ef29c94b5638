//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use findtask::output::OutputMode;

/// findtask - Turn static-analysis findings into backlog tasks
#[derive(Parser, Debug)]
#[command(
    name = "findtask",
    version,
    about = "Turn static-analysis findings into backlog tasks",
    long_about = "Create numbered task files from analyzer findings.\n\n\
                  Each finding becomes one markdown task in backlog/tasks/.\n\
                  Ids continue after the highest id found in any partition."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter config and create the task store
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Create one task file per finding
    Export {
        /// JSON file with an array of findings ("-" for stdin)
        findings: String,

        /// Export only these findings (1-based positions in the file)
        #[arg(short, long, value_delimiter = ',')]
        pick: Vec<usize>,

        /// Keep file order instead of sorting by source location
        #[arg(long)]
        keep_order: bool,

        /// Task store directory (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Print the next free task id
    NextId {
        /// Task store directory (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// List tasks in the store
    List {
        /// Only this partition (e.g. "completed")
        #[arg(short, long)]
        partition: Option<String>,

        /// Task store directory (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Print the assistant prompt for one finding
    Prompt {
        /// JSON file with an array of findings ("-" for stdin)
        findings: String,

        /// Finding to describe (1-based position in the file)
        #[arg(short, long, default_value_t = 1)]
        index: usize,
    },

    /// Send the prompt for one finding to the configured assistant
    Fix {
        /// JSON file with an array of findings ("-" for stdin)
        findings: String,

        /// Finding to fix (1-based position in the file)
        #[arg(short, long, default_value_t = 1)]
        index: usize,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let project = cli.project.unwrap_or_else(findtask::paths::project_root);

    match cli.command {
        Some(Command::Init { force }) => commands::init(&project, force, output_mode),
        Some(Command::Export {
            findings,
            pick,
            keep_order,
            store,
        }) => commands::export(
            &project,
            &commands::ExportArgs {
                findings,
                pick,
                keep_order,
                store,
            },
            output_mode,
        ),
        Some(Command::NextId { store }) => commands::next_id(&project, store.as_deref(), output_mode),
        Some(Command::List { partition, store }) => {
            commands::list(&project, partition.as_deref(), store.as_deref(), output_mode)
        },
        Some(Command::Prompt { findings, index }) => commands::prompt(&project, &findings, index),
        Some(Command::Fix { findings, index }) => {
            commands::fix(&project, &findings, index, output_mode)
        },
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("findtask v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("findtask v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'findtask --help' for usage");
                println!("Run 'findtask init' to get started");
            }
            Ok(())
        },
    }
}
