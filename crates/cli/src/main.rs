use anyhow::Result;
use capsule_core::{AppConfig, Capsule, RoutesManifest};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
use commands::{
    handle_call_command, handle_config_command, handle_routes_command, CallArgs, ConfigCommands,
    RoutesArgs,
};

#[derive(Parser)]
#[command(name = "capsule")]
#[command(about = "Capsule CLI - register named HTTP routes from a manifest and call them by key")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (defaults to $CAPSULE_CONFIG or config/capsule.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Routes manifest, overriding `routes_path` from the config file
    #[arg(long, global = true)]
    routes: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered routes
    Routes(RoutesArgs),

    /// Call a route by key and print the resolved result
    Call(CallArgs),

    /// Configuration Management
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_logging(config: &AppConfig) {
    let level = config.logging.level.as_str();
    let filter = if let Ok(env_filter) = std::env::var("RUST_LOG") {
        if env_filter == "debug" {
            EnvFilter::new("warn,capsule_core=debug,capsule=debug,tests=debug")
        } else if env_filter == "trace" {
            EnvFilter::new("warn,capsule_core=trace,capsule=trace,tests=trace")
        } else {
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                EnvFilter::new(format!("warn,capsule_core={level},capsule={level}"))
            })
        }
    } else {
        EnvFilter::new(format!("warn,capsule_core={level},capsule={level}"))
    };

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_ansi(false);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(config.logging.ansi)
            .with_target(false);
        registry.with(fmt_layer).init();
    }
}

/// Validates configuration, starts logging, and registers every service of the manifest.
fn start(config: &AppConfig, routes_override: Option<&str>) -> Result<Capsule> {
    config.validate().map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;
    init_logging(config);

    let routes_path = routes_override.unwrap_or(&config.routes_path);
    info!(routes = %routes_path, "Starting capsule");

    let capsule = Capsule::from_config(config)
        .map_err(|e| anyhow::anyhow!("Client initialization failed: {e}"))?;

    let manifest = RoutesManifest::from_file(routes_path)
        .map_err(|e| anyhow::anyhow!("Routes manifest could not be loaded: {e}"))?;

    let report = capsule.register_manifest(&manifest);
    for rejected in &report.rejected {
        warn!(error = %rejected, "manifest entry skipped");
    }
    debug!(
        services = manifest.services.len(),
        registered = report.registered.len(),
        rejected = report.rejected.len(),
        "Routes loaded"
    );

    Ok(capsule)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .map_err(|e| anyhow::anyhow!("Configuration could not be loaded: {e}"))?;

    match cli.command {
        Commands::Config(config_command) => handle_config_command(config_command, &config)?,
        Commands::Routes(args) => {
            let capsule = start(&config, cli.routes.as_deref())?;
            handle_routes_command(&capsule, &args)?;
        }
        Commands::Call(args) => {
            let capsule = start(&config, cli.routes.as_deref())?;
            handle_call_command(&capsule, args).await?;
        }
    }

    Ok(())
}
