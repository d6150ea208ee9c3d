use anyhow::{Context, Result};
use clap::Parser;
use graph_history::history::Notifier;
use graph_history::script::{load_script, run_script};
use graph_history::{EditorSession, EditorSettings};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "graph_history")]
#[command(about = "Replay editor commands against a logical graph and show the undo history")]
struct Cli {
    #[arg(help = "JSON file with the commands to replay")]
    script: PathBuf,
    #[arg(long, help = "Settings file (defaults to the user config dir)")]
    settings: Option<PathBuf>,
    #[arg(long, help = "Write the final graph to this file")]
    save: Option<PathBuf>,
}

/// Prints warnings the way the editor would toast them.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn warn(&self, title: &str, message: &str) {
        println!("[Warning] {}: {}", title, message);
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings_path = cli.settings.clone().unwrap_or_else(EditorSettings::default_path);
    let mut settings = EditorSettings::load(&settings_path)?;

    let commands = load_script(&cli.script)?;
    let base_dir = cli.script.parent().unwrap_or(Path::new("."));

    let mut session = EditorSession::with_notifier(&settings, Box::new(ConsoleNotifier));
    run_script(&mut session, &commands, base_dir)?;

    println!("{}", session.history());
    println!("[History] {}", session.history().cursor_map());

    println!("Hierarchy:");
    for row in session.hierarchy_rows() {
        let marker = if row.selected {
            "*"
        } else if row.relative {
            "~"
        } else {
            " "
        };
        println!("{} {}{}", marker, "  ".repeat(row.depth), row.name);
    }

    if let Some(path) = &cli.save {
        session.graph().save(path)?;
        settings.last_graph = Some(path.display().to_string());
        settings
            .save(&settings_path)
            .context("failed to remember the saved graph")?;
        println!("[System] Graph saved to {}", path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(session.graph())?);
    }

    Ok(())
}
