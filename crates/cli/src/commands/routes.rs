use capsule_core::{
    route::{placeholders, CachePolicy, RouteDefinition},
    Capsule,
};
use clap::Args;

use super::utils::{print_info, CliResult};

#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Print definitions as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_routes_command(capsule: &Capsule, args: &RoutesArgs) -> CliResult<()> {
    let routes = capsule.routes();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
        return Ok(());
    }

    if routes.is_empty() {
        print_info("No routes registered");
        return Ok(());
    }

    println!("{:<28} {:<8} {:<12} URL", "KEY", "METHOD", "CACHE");
    for route in &routes {
        println!("{}", format_row(route));
    }
    print_info(&format!("{} routes", routes.len()));

    Ok(())
}

fn format_row(route: &RouteDefinition) -> String {
    let cache = match route.cache_policy {
        CachePolicy::Disabled => "-".to_string(),
        CachePolicy::Enabled { ttl } => format!("{}s", ttl.as_secs()),
    };
    let url = route.full_url(&route.url_template);
    let params = placeholders(&route.url_template);

    if params.is_empty() {
        format!("{:<28} {:<8} {:<12} {url}", route.key, route.method, cache)
    } else {
        format!("{:<28} {:<8} {:<12} {url}  [{}]", route.key, route.method, cache, params.join(", "))
    }
}
