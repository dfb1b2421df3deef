use std::{error::Error as StdError, io};
use thiserror::Error;

use super::Response;

/// Failures reported by a [`Transport`](super::Transport).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// A response arrived with a non-2xx status.
    #[error("HTTP error: {status} {status_text}")]
    Status { status: u16, status_text: String, response: Box<Response> },

    /// No response: the connection could not be made or was lost.
    ///
    /// `errno` follows the libuv convention (negated OS error number) and `code` is the
    /// symbolic name, e.g. `-111` / `ECONNREFUSED`.
    #[error("Network error: {code} ({message})")]
    Network { errno: i32, code: &'static str, message: String },

    /// The request could not be built (invalid URL, header, or client setup).
    #[error("Invalid request: {0}")]
    Build(String),
}

/// errno/code reported for DNS resolution failures (`UV_EAI_NONAME`).
const ENOTFOUND: (i32, &str) = (-3008, "ENOTFOUND");
const ETIMEDOUT: (i32, &str) = (-110, "ETIMEDOUT");
const ECONNREFUSED: (i32, &str) = (-111, "ECONNREFUSED");
const EIO: (i32, &str) = (-5, "EIO");
const EINVAL: (i32, &str) = (-22, "EINVAL");

impl TransportError {
    /// Numeric code of the normalized failure: HTTP status or errno.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Status { status, .. } => i64::from(*status),
            Self::Network { errno, .. } => i64::from(*errno),
            Self::Build(_) => i64::from(EINVAL.0),
        }
    }

    /// Message of the normalized failure: status text or error code name.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Status { status_text, .. } => status_text.clone(),
            Self::Network { code, .. } => (*code).to_string(),
            Self::Build(_) => EINVAL.1.to_string(),
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// The received response, for status failures.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Status { response, .. } => Some(response.as_ref()),
            _ => None,
        }
    }

    /// Classifies an I/O error into errno and code.
    #[must_use]
    pub fn from_io(error: &io::Error) -> Self {
        let (errno, code) = io_code(error);
        Self::Network { errno, code, message: error.to_string() }
    }

    /// Classifies a `reqwest` failure.
    ///
    /// The source chain is searched for the underlying [`io::Error`]. DNS failures and timeouts
    /// are recognized before that because they do not carry a meaningful OS error.
    #[must_use]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_builder() {
            return Self::Build(error.to_string());
        }

        let message = chain_message(error);
        let (errno, code) = if error.is_timeout() {
            ETIMEDOUT
        } else if is_dns_failure(error) {
            ENOTFOUND
        } else if let Some(io_error) = find_io_error(error) {
            io_code(io_error)
        } else if error.is_connect() {
            ECONNREFUSED
        } else {
            EIO
        };

        Self::Network { errno, code, message }
    }
}

fn io_code(error: &io::Error) -> (i32, &'static str) {
    let code = match error.kind() {
        io::ErrorKind::ConnectionRefused => ECONNREFUSED.1,
        io::ErrorKind::ConnectionReset => "ECONNRESET",
        io::ErrorKind::ConnectionAborted => "ECONNABORTED",
        io::ErrorKind::NotConnected => "ENOTCONN",
        io::ErrorKind::AddrInUse => "EADDRINUSE",
        io::ErrorKind::AddrNotAvailable => "EADDRNOTAVAIL",
        io::ErrorKind::BrokenPipe => "EPIPE",
        io::ErrorKind::TimedOut => ETIMEDOUT.1,
        io::ErrorKind::PermissionDenied => "EACCES",
        _ => EIO.1,
    };

    let errno = match error.raw_os_error() {
        Some(raw) => -raw,
        None => match code {
            "ECONNREFUSED" => ECONNREFUSED.0,
            "ECONNRESET" => -104,
            "ECONNABORTED" => -103,
            "ENOTCONN" => -107,
            "EADDRINUSE" => -98,
            "EADDRNOTAVAIL" => -99,
            "EPIPE" => -32,
            "ETIMEDOUT" => ETIMEDOUT.0,
            "EACCES" => -13,
            _ => EIO.0,
        },
    };

    (errno, code)
}

fn find_io_error<'a>(error: &'a (dyn StdError + 'static)) -> Option<&'a io::Error> {
    let mut current = error.source();
    while let Some(err) = current {
        if let Some(io_error) = err.downcast_ref::<io::Error>() {
            return Some(io_error);
        }
        current = err.source();
    }
    None
}

/// Display of the connector level hyper-util wraps resolver failures in.
const DNS_CONNECTOR_MESSAGE: &str = "dns error";
/// Prefix of the `io::Error` produced when `getaddrinfo` fails.
const LOOKUP_FAILED_PREFIX: &str = "failed to lookup address information";

/// Whether any level of the source chain is a name resolution failure.
///
/// The resolver error types are private to hyper-util, so each level is matched on its own
/// display rather than on the joined chain message.
fn is_dns_failure(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        let matched = match err.downcast_ref::<io::Error>() {
            Some(io_error) => {
                io_error.raw_os_error().is_none()
                    && io_error.to_string().starts_with(LOOKUP_FAILED_PREFIX)
            }
            None => err.to_string() == DNS_CONNECTOR_MESSAGE,
        };
        if matched {
            return true;
        }
        current = err.source();
    }
    false
}

/// Joins the display strings of an error and all of its sources.
fn chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        parts.push(err.to_string());
        current = err.source();
    }
    parts.join(": ")
}
