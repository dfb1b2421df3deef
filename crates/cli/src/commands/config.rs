use capsule_core::{AppConfig, RoutesManifest};
use clap::Subcommand;
use std::{fs, path::Path};

use super::utils::{print_error, print_info, print_success, CliError, CliResult};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the loaded configuration and its routes manifest
    Validate,

    /// Show the effective configuration after file and environment layering
    Show,

    /// Generate sample configuration and routes files
    Generate {
        /// Directory to write `capsule.toml` and `routes.toml` into
        #[arg(short, long, default_value = "config")]
        output: String,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands, config: &AppConfig) -> CliResult<()> {
    match command {
        ConfigCommands::Validate => validate_config(config),
        ConfigCommands::Show => {
            show_config(config);
            Ok(())
        }
        ConfigCommands::Generate { output, force } => generate_config(&output, force),
    }
}

fn validate_config(config: &AppConfig) -> CliResult<()> {
    print_info("Validating configuration...");
    config.validate()?;

    print_info(&format!("Loading routes manifest from {}...", config.routes_path));
    let manifest = RoutesManifest::from_file(&config.routes_path)?;

    let mut invalid = 0usize;
    for service in &manifest.services {
        if !service.base_url.starts_with("http://") && !service.base_url.starts_with("https://") {
            print_error(&format!(
                "Invalid base URL for service {}: {}",
                service.name, service.base_url
            ));
            invalid += 1;
        }
    }
    if invalid > 0 {
        return Err(CliError::Config(format!("{invalid} services have an invalid base URL")));
    }

    print_success("Configuration is valid!");

    println!("Configuration Summary:");
    println!("  Services: {}", manifest.services.len());
    println!("  Routes: {}", manifest.route_count());
    println!("  Debug: {}", if config.debug { "enabled" } else { "disabled" });

    Ok(())
}

fn show_config(config: &AppConfig) {
    println!("Effective configuration:");
    println!("  Debug: {}", config.debug);
    println!("  Routes Path: {}", config.routes_path);

    println!("\n[Http]");
    println!("  Connect Timeout: {}ms", config.http.connect_timeout_ms);
    println!("  Request Timeout: {}ms", config.http.request_timeout_ms);
    println!("  Pool Idle Timeout: {}s", config.http.pool_idle_timeout_seconds);
    println!("  Pool Max Idle Per Host: {}", config.http.pool_max_idle_per_host);
    println!("  User Agent: {}", config.http.user_agent);

    println!("\n[Cache]");
    println!("  Max Entries: {}", config.cache.max_entries);
    println!("  Default TTL: {}s", config.cache.default_ttl_seconds);

    println!("\n[Logging]");
    println!("  Level: {}", config.logging.level);
    println!("  Format: {}", config.logging.format);
    println!("  ANSI: {}", config.logging.ansi);
}

const SAMPLE_CONFIG: &str = r#"# Capsule configuration
# Every value can be overridden with CAPSULE__<SECTION>__<KEY>, e.g. CAPSULE__CACHE__MAX_ENTRIES

debug = false
routes_path = "config/routes.toml"

[http]
connect_timeout_ms = 5000
request_timeout_ms = 30000

[cache]
max_entries = 100
default_ttl_seconds = 300

[logging]
level = "info"
format = "pretty"
ansi = true
"#;

const SAMPLE_ROUTES: &str = r#"# Route keys are unique across all services

[[services]]
name = "users"
base_url = "https://api.example.com"

[services.routes.get]
getUser = "/users/:id"
listUsers = { url = "/users", cache = 60 }

[services.routes.post]
createUser = "/users"
"#;

fn generate_config(output: &str, force: bool) -> CliResult<()> {
    let dir = Path::new(output);
    let targets = [(dir.join("capsule.toml"), SAMPLE_CONFIG), (dir.join("routes.toml"), SAMPLE_ROUTES)];

    if !force {
        if let Some((existing, _)) = targets.iter().find(|(path, _)| path.exists()) {
            return Err(CliError::Config(format!(
                "File {} already exists. Use --force to overwrite.",
                existing.display()
            )));
        }
    }

    fs::create_dir_all(dir).map_err(|e| CliError::General(e.to_string()))?;
    for (path, content) in &targets {
        fs::write(path, content).map_err(|e| CliError::General(e.to_string()))?;
        print_success(&format!("Wrote {}", path.display()));
    }

    Ok(())
}
