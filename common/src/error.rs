//! Error taxonomy of the health check.
//!
//! Connection-stage errors end the run against an element. Probe and
//! normalization errors belong to one target and never abort the batch.

use thiserror::Error;

use crate::network::target::Target;

/// Why a session to a network element could not be established.
///
/// Every kind keeps the element and the underlying message. None of them is
/// retried inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("cannot resolve {host}: {message}")]
    NameResolution { host: String, message: String },

    #[error(
        "cannot connect to {host}: {message}. \
         The username or password may be incorrect"
    )]
    Authentication { host: String, message: String },

    #[error(
        "cannot connect to {host}: {message}. \
         The management service may be disabled, filtered by the control-plane \
         access list, or out of sessions"
    )]
    Refused { host: String, message: String },

    #[error(
        "cannot connect to {host}: {message}. \
         The element may be unreachable or a filter along the path may drop the \
         management traffic"
    )]
    Timeout { host: String, message: String },

    #[error(
        "cannot connect to {host}: {message}. \
         The reachability probe to the management port did not complete; the path \
         may be filtered or the element may need more time"
    )]
    ProbeTimeout { host: String, message: String },

    #[error("error connecting to {host}: {message}. Precise cause is unknown")]
    Unknown { host: String, message: String },
}

impl ConnectionError {
    /// The underlying cause as reported by the resolver or transport.
    pub fn message(&self) -> &str {
        match self {
            ConnectionError::NameResolution { message, .. }
            | ConnectionError::Authentication { message, .. }
            | ConnectionError::Refused { message, .. }
            | ConnectionError::Timeout { message, .. }
            | ConnectionError::ProbeTimeout { message, .. }
            | ConnectionError::Unknown { message, .. } => message,
        }
    }

    /// Name of the taxonomy kind, shown ahead of the message in reported causes.
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectionError::NameResolution { .. } => "NameResolutionError",
            ConnectionError::Authentication { .. } => "AuthenticationError",
            ConnectionError::Refused { .. } => "ConnectionRefused",
            ConnectionError::Timeout { .. } => "ConnectionTimeout",
            ConnectionError::ProbeTimeout { .. } => "ProbeTimeout",
            ConnectionError::Unknown { .. } => "UnknownConnectionError",
        }
    }
}

/// Failure of a single call on an open session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no response within {0} ms")]
    Timeout(u128),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("undecodable response: {0}")]
    Decode(String),
}

/// A probe for one target failed; the rest of the batch carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("probe of {target} failed: {message}")]
pub struct ProbeError {
    pub target: Target,
    pub message: String,
}

impl ProbeError {
    pub fn new(target: Target, message: impl Into<String>) -> Self {
        Self {
            target,
            message: message.into(),
        }
    }
}

/// The device answered, but not in a shape that yields a canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause}: {detail}")]
pub struct NormalizationError {
    pub cause: String,
    pub detail: String,
}

impl NormalizationError {
    pub const UNRECOGNIZED_TARGET: &'static str = "malformed or unrecognized target";
    pub const UNEXPECTED_SHAPE: &'static str = "unexpected response shape";
    pub const AMBIGUOUS_RESULT: &'static str = "ambiguous result";

    pub fn new(cause: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            detail: detail.into(),
        }
    }

    pub fn unrecognized_target(detail: impl Into<String>) -> Self {
        Self::new(Self::UNRECOGNIZED_TARGET, detail)
    }

    pub fn unexpected_shape(detail: impl Into<String>) -> Self {
        Self::new(Self::UNEXPECTED_SHAPE, detail)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
