use error_stack::Report;
use std::fmt::{self, Display, Formatter};

pub type GatewayResult<T> = Result<T, Report<GatewayError>>;

/// Classification of a gateway failure. Consumers branch on this (a missing
/// resource gets its own view), the store only records and reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    Authorization,
    NotFound,
}

impl ErrorKind {
    pub fn is_not_found(self) -> bool {
        matches!(self, ErrorKind::NotFound)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Network => "transport failure",
            ErrorKind::Validation => "input rejected",
            ErrorKind::Authorization => "not authorized",
            ErrorKind::NotFound => "resource not found",
        };
        f.write_str(text)
    }
}

/// What a gateway call fails with. `message` is the backend's human-readable
/// payload when it sent one; resolution against per-resource defaults happens
/// at the store boundary.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

impl GatewayError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
        }
    }

    pub fn network() -> Self {
        Self::new(ErrorKind::Network)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Validation, message)
    }

    pub fn authorization() -> Self {
        Self::new(ErrorKind::Authorization)
    }
}

impl From<ErrorKind> for GatewayError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
