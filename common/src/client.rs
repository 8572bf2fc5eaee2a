//! The management-protocol port.
//!
//! The engine depends only on this narrow capability surface: connect to an
//! element, issue one structured request at a time, close. Concrete transports
//! (the Junos REST client in `routecheck-core`, or any RPC client able to return
//! the same nested payloads) implement [`ManagementClient`] and
//! [`ManagementSession`].

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::Credentials;
use crate::error::{ConnectionError, RequestError};
use crate::network::endpoint::Endpoint;
use crate::network::target::Target;

/// The kind of operational state a probe asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    BgpNeighbor,
    IsisInterface,
    Ping,
}

impl QueryKind {
    /// Whether the query should ask for the detailed form of the output.
    ///
    /// Interface levels are only reported per level in the extensive output,
    /// and the extra detail costs nothing measurable on the device.
    pub fn wants_extensive(self) -> bool {
        matches!(self, QueryKind::IsisInterface)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryKind::BgpNeighbor => "bgp neighbor",
            QueryKind::IsisInterface => "isis interface",
            QueryKind::Ping => "ping",
        };
        f.write_str(name)
    }
}

/// The routing context a query is constrained to.
///
/// `Global` is the explicit "no scope" value. It is never written as an instance
/// named `default` or `master`: those are real device-side names and are passed
/// through untouched as `Named`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceScope {
    #[default]
    Global,
    Named(String),
}

impl InstanceScope {
    /// Builds a scope from an optional operator-supplied instance name.
    pub fn from_option(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() => InstanceScope::Named(name.trim().to_string()),
            _ => InstanceScope::Global,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            InstanceScope::Global => None,
            InstanceScope::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for InstanceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceScope::Global => f.write_str("global"),
            InstanceScope::Named(name) => write!(f, "instance {name}"),
        }
    }
}

/// One structured request for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub kind: QueryKind,
    pub subject: Option<String>,
    pub scope: InstanceScope,
    pub extensive: bool,
    /// Echo requests per destination; only meaningful for [`QueryKind::Ping`].
    pub count: Option<u32>,
}

impl Request {
    pub fn for_target(kind: QueryKind, target: &Target, scope: &InstanceScope) -> Self {
        Self {
            kind,
            subject: target.subject(),
            scope: scope.clone(),
            extensive: kind.wants_extensive(),
            count: None,
        }
    }

    pub fn with_count(mut self, count: Option<u32>) -> Self {
        self.count = count;
        self
    }
}

/// Opens sessions to network elements.
#[async_trait]
pub trait ManagementClient: Send + Sync {
    /// Establishes an authenticated session without gathering device facts.
    async fn connect(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<Box<dyn ManagementSession>, ConnectionError>;
}

/// A single request/response channel to one element.
///
/// Calls take `&mut self`: a session never carries two requests at once.
#[async_trait]
pub trait ManagementSession: Send {
    /// Issues one request and returns the nested payload the device answered with.
    async fn call(&mut self, request: &Request) -> Result<Value, RequestError>;

    /// Releases the session.
    async fn close(&mut self) -> Result<(), RequestError>;
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
