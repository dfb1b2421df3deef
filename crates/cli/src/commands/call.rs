use capsule_core::{route::Params, Capsule, HeaderSource, RequestOptions, Resolved};
use clap::Args;
use serde_json::Value;

use super::utils::{parse_header, parse_param, CliError, CliResult};

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Route key, as listed by `capsule routes`
    pub key: String,

    /// Parameter as name=value (repeatable). Values are parsed as JSON when possible
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, Value)>,

    /// Header as Name=value or "Name: value" (repeatable). Added to the default headers
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Cache successful GET responses for this many seconds
    #[arg(long, conflicts_with = "no_cache")]
    pub cache: Option<u64>,

    /// Skip the route cache for this call
    #[arg(long)]
    pub no_cache: bool,

    /// Replace the route's active cache before calling
    #[arg(long)]
    pub force_update: bool,

    /// Print the whole response envelope instead of the body
    #[arg(long)]
    pub full_result: bool,

    /// Log each dispatch as `[METHOD] key -> url`
    #[arg(long)]
    pub debug: bool,

    /// Send the call this many times in a row
    #[arg(long, default_value = "1")]
    pub repeat: u32,
}

impl CallArgs {
    fn params(&self) -> Params {
        self.params.iter().cloned().collect()
    }

    fn options(&self) -> RequestOptions {
        let mut options = RequestOptions::new();
        if let Some(seconds) = self.cache {
            options = options.cache_for(seconds);
        }
        if self.no_cache {
            options = options.no_cache();
        }
        if self.force_update {
            options = options.force_update();
        }
        if self.full_result {
            options = options.full_result();
        }
        for (name, value) in &self.headers {
            options = options.header(name.clone(), HeaderSource::from(value.clone()));
        }
        options
    }
}

/// Dispatches the route and prints each resolved result as pretty JSON.
///
/// Fails on the first call that resolves to a failure payload.
pub async fn handle_call_command(capsule: &Capsule, args: CallArgs) -> CliResult<()> {
    if args.debug {
        capsule.enable_debug();
    }

    let params = args.params();

    for _ in 0..args.repeat.max(1) {
        let resolved = capsule.request(&args.key, &params, args.options()).await?;

        if let Resolved::Failure(failure) = &resolved {
            println!("{}", serde_json::to_string_pretty(failure)?);
            return Err(CliError::Request { code: failure.code, message: failure.message.clone() });
        }

        println!("{}", serde_json::to_string_pretty(&resolved)?);
    }

    Ok(())
}
