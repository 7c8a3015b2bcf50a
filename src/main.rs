//! Skillforge Runtime
//!
//! The CLI entry point. Stands in for the external cognition engine:
//! feeds raw text to the dispatcher and prints the outcome, either
//! one-shot (--dispatch) or interactively (--repl).

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::Input;

use skillforge::config::{get_config_path, load_config, resolve_path, save_config};
use skillforge::dispatch::ActionDispatcher;
use skillforge::types::{default_config, ForgeConfig};

const VERSION: &str = "0.1.0";

/// Skillforge -- Agent Self-Extension Core
#[derive(Parser, Debug)]
#[command(
    name = "skillforge",
    version = VERSION,
    about = "Skillforge -- Agent Self-Extension Core",
    long_about = "Directive interpreter for self-extending agents. Recognizes [SHELL: <command>], [FORGE: <name> | <source>], and [SKILL: <name>] in raw text."
)]
struct Cli {
    /// Interpret one piece of text and print the outcome
    #[arg(long)]
    dispatch: Option<String>,

    /// Interactive loop: each line is dispatched
    #[arg(long)]
    repl: bool,

    /// Print the loaded skill catalog as JSON
    #[arg(long)]
    skills: bool,

    /// Write a default config file if none exists
    #[arg(long)]
    init: bool,

    /// Show current configuration and skill count
    #[arg(long)]
    status: bool,
}

// ---- Logging ----------------------------------------------------------------

/// `RUST_LOG` wins; otherwise the configured level applies to this crate.
fn init_logging(config: &ForgeConfig) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("skillforge={}", config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

// ---- Status Command ---------------------------------------------------------

/// Display the current configuration and loaded skill set.
fn show_status() {
    let config_path = get_config_path();

    if !config_path.exists() {
        println!("Skillforge is not configured. Run: skillforge --init");
        return;
    }

    let config = match load_config() {
        Some(c) => c,
        None => {
            eprintln!("Failed to parse config: {}", config_path.display());
            return;
        }
    };

    let skills_root = resolve_path(&config.skills_dir);
    let dispatcher = ActionDispatcher::new(&config);
    let names = dispatcher.skill_names();

    println!(
        r#"
=== SKILLFORGE STATUS ===
Config:     {}
Skills dir: {}
Loaded:     {} skill(s)
Timeout:    {}s
Log level:  {}
Version:    {}
=========================
"#,
        config_path.display(),
        skills_root,
        names.len(),
        config.shell_timeout_secs,
        config.log_level.as_str(),
        config.version,
    );

    if !names.is_empty() {
        println!("Skills: {}", names.join(", "));
    }
}

// ---- REPL -------------------------------------------------------------------

/// Interactive loop: read a line, dispatch it, print the outcome.
async fn run_repl(dispatcher: &ActionDispatcher) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    println!(
        "[{}] Skillforge v{} -- {} skill(s) loaded",
        now,
        VERSION,
        dispatcher.skill_names().len()
    );
    println!();
    println!("{}", "Directives:".cyan().bold());
    println!("  {}", "[SHELL: <command>]".white());
    println!("  {}", "[FORGE: <name> | <source>]".white());
    println!("  {}", "[SKILL: <name>]".white());
    println!("{}", "Type 'exit' to quit.".dimmed());
    println!();

    loop {
        let line: String = Input::new()
            .with_prompt(format!("{}", "forge".cyan()))
            .allow_empty(true)
            .interact_text()?;

        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let outcome = dispatcher.dispatch(trimmed).await;
        if outcome.is_empty() {
            println!("{}", "(no directive found)".yellow());
        } else {
            println!("{}", outcome);
        }
        println!();
    }

    Ok(())
}

// ---- Entry Point ------------------------------------------------------------

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.init {
        let config_path = get_config_path();
        if config_path.exists() {
            println!("Config already exists at {}", config_path.display());
            return;
        }
        match save_config(&default_config()) {
            Ok(()) => println!("Created default config at {}", config_path.display()),
            Err(e) => {
                eprintln!("Init failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.status {
        show_status();
        return;
    }

    // Remaining modes all need a dispatcher.
    if cli.dispatch.is_none() && !cli.repl && !cli.skills {
        println!("Run \"skillforge --help\" for usage information.");
        println!("Run \"skillforge --repl\" to start an interactive session.");
        return;
    }

    let config = load_config().unwrap_or_else(default_config);
    init_logging(&config);

    let dispatcher = ActionDispatcher::new(&config);

    if cli.skills {
        match serde_json::to_string_pretty(&dispatcher.skill_catalog()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize skill catalog: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(text) = cli.dispatch {
        let outcome = dispatcher.dispatch(&text).await;
        if outcome.is_empty() {
            eprintln!("No directive found in input.");
        } else {
            println!("{}", outcome);
        }
        return;
    }

    if cli.repl {
        if let Err(e) = run_repl(&dispatcher).await {
            eprintln!("Fatal: {}", e);
            std::process::exit(1);
        }
    }
}
