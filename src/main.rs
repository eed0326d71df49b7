use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use micli::commands::{env, get};
use micli::config::Config;
use micli::mi::client::MiClient;
use micli::mi::http::format_mi_error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Query and format artifacts deployed on an integration runtime
#[derive(Parser, Debug)]
#[command(name = "mi", version, about, long_about = None)]
struct Args {
    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get artifacts deployed in an environment
    #[command(subcommand)]
    Get(GetCommand),

    /// Manage environments
    #[command(subcommand)]
    Env(EnvCommand),
}

#[derive(Subcommand, Debug)]
enum GetCommand {
    /// List inbound endpoints, or describe one by name
    #[command(name = "inbound-endpoints", alias = "inbound-endpoint")]
    InboundEndpoints {
        /// Inbound endpoint to describe
        name: Option<String>,

        /// Environment to query
        #[arg(short, long)]
        environment: String,

        /// Output format: table, detail, json, jsonpretty or a template such as '{{.Name}}'
        #[arg(long, default_value = "")]
        format: String,
    },
}

#[derive(Subcommand, Debug)]
enum EnvCommand {
    /// Add or replace an environment
    Add {
        name: String,

        /// Base URL of the management endpoint, e.g. https://localhost:9164
        #[arg(long)]
        url: String,

        /// Accept invalid TLS certificates
        #[arg(long)]
        insecure: bool,
    },

    /// Remove an environment
    Remove { name: String },

    /// List configured environments
    List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("mi started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("micli").join("micli.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".micli").join("micli.log");
    }
    PathBuf::from("micli.log")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            eprintln!("Error: {}", format_mi_error(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = Config::resolve_path(args.config.as_deref())?;

    match args.command {
        Command::Get(GetCommand::InboundEndpoints {
            name,
            environment,
            format,
        }) => {
            let config = Config::load(&config_path)?;
            let client = MiClient::for_environment(&config, &environment)?;
            // Template failures are reported by the renderer and do not change the exit code
            get::get_inbound_endpoints(&client, name.as_deref(), &format).await?;
        }
        Command::Env(EnvCommand::Add {
            name,
            url,
            insecure,
        }) => env::add(&config_path, &name, &url, insecure, &mut io::stdout())?,
        Command::Env(EnvCommand::Remove { name }) => {
            env::remove(&config_path, &name, &mut io::stdout())?
        }
        Command::Env(EnvCommand::List) => env::list(&config_path, &mut io::stdout())?,
    }

    Ok(())
}
