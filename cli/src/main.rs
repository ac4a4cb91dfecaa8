use std::io::Write;
use std::path::PathBuf;

use cadence_cli::commands::{self, ReplayOptions};
use cadence_cli::{logging, readline};
use cadence_core::context::{AppConfig, AppConfigExt};
use clap::{Parser, Subcommand};

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let config = AppConfig::load();

    // With arguments, run a single command; otherwise start the prompt
    let cli = Cli::parse();
    if let Some(command) = &cli.command {
        respond_to(command, &config).await?;
        return Ok(());
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &config).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Headless driver for the cadence game core")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the live loop on the wall clock
    Run {
        #[arg(short, long, default_value_t = 5.0)]
        seconds: f64,
        #[arg(long)]
        ups: Option<u32>,
        #[arg(long)]
        fps: Option<u32>,
        /// Start the Roric fight right away
        #[arg(long)]
        engage: bool,
    },
    /// Replay a scripted Roric fight on a simulated clock
    Replay {
        #[arg(short, long)]
        definition: Option<PathBuf>,
        #[arg(long, default_value_t = 170_000)]
        duration_ms: u64,
        #[arg(long, default_value_t = 10_000)]
        damage_interval_ms: u64,
        #[arg(long, default_value_t = 5.0)]
        damage_percent: f32,
        #[arg(long)]
        stall_at_ms: Option<u64>,
        #[arg(long, default_value_t = 0)]
        stall_ms: u64,
        /// Print every presentation request in order
        #[arg(long)]
        calls: bool,
    },
    Config,
    /// Load and validate a Roric definition file
    CheckDefinition { path: String },
    Exit,
}

async fn respond(line: &str, config: &AppConfig) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "cadence".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(command) => respond_to(command, config).await,
        None => Ok(false),
    }
}

/// Returns true when the prompt should close.
async fn respond_to(command: &Commands, config: &AppConfig) -> Result<bool, String> {
    match command {
        Commands::Run {
            seconds,
            ups,
            fps,
            engage,
        } => commands::run(config, *seconds, *ups, *fps, *engage).await?,
        Commands::Replay {
            definition,
            duration_ms,
            damage_interval_ms,
            damage_percent,
            stall_at_ms,
            stall_ms,
            calls,
        } => {
            let options = ReplayOptions {
                duration_ms: *duration_ms,
                damage_interval_ms: *damage_interval_ms,
                damage_percent: *damage_percent,
                stall_at_ms: *stall_at_ms,
                stall_ms: *stall_ms,
            };
            commands::replay(config, definition.as_deref(), &options, *calls)?
        }
        Commands::Config => commands::show_settings(config)?,
        Commands::CheckDefinition { path } => commands::check_definition(path)?,
        Commands::Exit => {
            commands::exit()?;
            return Ok(true);
        }
    }
    Ok(false)
}
