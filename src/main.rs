//! Escalation Router - host entry point
//!
//! Wires the router from configuration and feeds it JSON requests from the
//! command line or stdin. Results go to stdout, logs to stderr.

use clap::{Parser, Subcommand};
use escalation_router::config::RouterConfig;
use escalation_router::observability::{
    init_default_logging, CompositeObserver, DispatchMetrics, TracingObserver,
};
use escalation_router::protocol::FinalResult;
use escalation_router::routing::Dispatcher;
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Capability-based task router with fallback escalation
#[derive(Parser)]
#[command(name = "escalation-router")]
#[command(about = "Route task requests to capability agents, escalating failures to a fallback")]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to the built-in two-agent topology)
    #[arg(short, long, value_name = "FILE", env = "ROUTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a single JSON request
    Handle {
        /// Request as inline JSON, e.g. '{"mcp_server": "WorkerA", "data": {}}'
        request: Option<String>,
        /// Read the request from a file instead
        #[arg(long, value_name = "PATH", conflicts_with = "request")]
        file: Option<PathBuf>,
    },
    /// Handle newline-delimited JSON requests from stdin, in order
    Batch,
    /// Validate configuration
    Config {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Handle { request, file } => run_handle(&config, request, file),
        Commands::Batch => run_batch(&config),
        Commands::Config { show } => handle_config_command(&config, show),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Command failed: {}", e);
            process::exit(1);
        }
    }
}

fn load_configuration(path: Option<&Path>) -> Result<RouterConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(RouterConfig::load_from_file(path)?)
        }
        None => {
            info!("No configuration file given, using default topology");
            Ok(RouterConfig::default())
        }
    }
}

fn build_dispatcher(
    config: &RouterConfig,
    metrics: Arc<DispatchMetrics>,
) -> Result<Dispatcher, Box<dyn std::error::Error>> {
    let observer = CompositeObserver::new()
        .with(TracingObserver::shared())
        .with(metrics);
    Ok(Dispatcher::from_config(config, Arc::new(observer))?)
}

fn run_handle(
    config: &RouterConfig,
    request: Option<String>,
    file: Option<PathBuf>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let text = match (request, file) {
        (Some(inline), _) => inline,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => io::read_to_string(io::stdin())?,
    };

    let dispatcher = build_dispatcher(config, Arc::new(DispatchMetrics::new()))?;
    let result = handle_line(&dispatcher, &text);

    println!("{}", serde_json::to_string(&result)?);
    Ok(if result.success { 0 } else { 2 })
}

fn run_batch(config: &RouterConfig) -> Result<i32, Box<dyn std::error::Error>> {
    let metrics = Arc::new(DispatchMetrics::new());
    let dispatcher = build_dispatcher(config, metrics.clone())?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let result = handle_line(&dispatcher, &line);
        writeln!(stdout, "{}", serde_json::to_string(&result)?)?;
    }
    stdout.flush()?;

    let snapshot = metrics.snapshot();
    info!(
        received = snapshot.requests_received,
        succeeded = snapshot.requests_succeeded,
        failed = snapshot.requests_failed,
        escalations = snapshot.escalations,
        "Batch complete"
    );
    Ok(0)
}

/// Parse one request and handle it; unparseable input becomes a failure result
fn handle_line(dispatcher: &Dispatcher, text: &str) -> FinalResult {
    match serde_json::from_str::<Value>(text) {
        Ok(raw) => dispatcher.handle(&raw),
        Err(e) => {
            warn!("Discarding request that is not valid JSON: {}", e);
            FinalResult::failure(format!("Invalid request: not valid JSON ({e})"))
        }
    }
}

fn handle_config_command(
    config: &RouterConfig,
    show: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    config.validate()?;
    info!("Configuration is valid");

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(0)
}
