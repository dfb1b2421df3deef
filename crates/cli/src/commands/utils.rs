use capsule_core::CapsuleError;
use serde_json::Value;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Config(String),
    Route(String),
    /// The call went out but resolved to a failure payload.
    Request { code: i64, message: String },
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Route(msg) => write!(f, "Route error: {msg}"),
            Self::Request { code, message } => write!(f, "Request failed: {code} {message}"),
            Self::General(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<CapsuleError> for CliError {
    fn from(error: CapsuleError) -> Self {
        match error {
            CapsuleError::Configuration(msg) => Self::Config(msg),
            other @ (CapsuleError::UnknownRoute(_) | CapsuleError::DuplicateRoute(_)) => {
                Self::Route(other.to_string())
            }
            other => Self::General(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::General(error.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// Parses `name=value`. The value is taken as JSON when it parses, otherwise as a string.
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = split_pair(raw)?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Parses `Name=value` or `Name: value`.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = match raw.split_once(':') {
        Some((name, value)) if !raw.contains('=') => (name.trim(), value.trim()),
        _ => split_pair(raw)?,
    };
    if name.is_empty() {
        return Err(format!("header name must not be empty: {raw}"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn split_pair(raw: &str) -> Result<(&str, &str), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(format!("expected name=value, got: {raw}")),
    }
}

pub fn print_success(message: &str) {
    println!("[SUCCESS] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn print_info(message: &str) {
    println!("[INFO] {message}");
}
