//! Error taxonomy shared by the catalog client, the settings store and the TUI.
//!
//! Every failure that reaches the event loop is an [`AppError`]: a kind plus a
//! human-readable message. Nothing richer crosses the command boundary.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Authentication,
    Input,
    Api,
    Io,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "Network Error",
            Self::Authentication => "Authentication Error",
            Self::Input => "Input Error",
            Self::Api => "API Error",
            Self::Io => "IO Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Input, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::api(format!("could not decode server response: {err}"))
        } else if let Some(status) = err.status() {
            Self::api(format!("server returned {status}"))
        } else if err.is_timeout() {
            Self::network("request timed out")
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        Self::io(format!("could not encode settings: {err}"))
    }
}
