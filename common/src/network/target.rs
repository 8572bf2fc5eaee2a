//! # Probe Target Model
//!
//! Defines what a single probe asks the network element about.
//!
//! A target is interpreted in the context of a [`QueryKind`]:
//! * A BGP peer address (e.g., `192.0.2.1`, `2001:db8::1`).
//! * A reachability destination, IP or host name (e.g., `198.51.100.7`, `ns1.example.net`).
//! * An IS-IS interface name (e.g., `ge-0/0/0.0`), or every IS-IS interface of the element.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

use crate::client::QueryKind;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Represents a distinct entity to be probed on a network element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Target {
    /// A routing-protocol neighbour, identified by its address.
    Peer { peer_addr: IpAddr },
    /// A host the element should be able to reach.
    Destination { host: String },
    /// A single IS-IS interface, identified by its logical unit name.
    Interface { name: String },
    /// Every IS-IS interface the element reports.
    AllInterfaces,
    /// A token that names no valid target of its query kind. It is never sent;
    /// the executor records it as a failed probe so the rest of the batch runs.
    Malformed { token: String, problem: String },
}

impl Target {
    /// Parses one operator-supplied token into a target of the given query kind.
    pub fn parse(kind: QueryKind, s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty target".to_string());
        }

        match kind {
            QueryKind::BgpNeighbor => parse_peer(s),
            QueryKind::Ping => parse_destination(s),
            QueryKind::IsisInterface => parse_interface(s),
        }
    }

    /// The value the device expects as the subject of the query, if any.
    pub fn subject(&self) -> Option<String> {
        match self {
            Target::Peer { peer_addr } => Some(peer_addr.to_string()),
            Target::Destination { host } => Some(host.clone()),
            Target::Interface { name } => Some(name.clone()),
            Target::AllInterfaces | Target::Malformed { .. } => None,
        }
    }

    /// Whether this target can be asked with the given query kind.
    pub fn matches(&self, kind: QueryKind) -> bool {
        matches!(
            (self, kind),
            (Target::Peer { .. }, QueryKind::BgpNeighbor)
                | (Target::Destination { .. }, QueryKind::Ping)
                | (Target::Interface { .. }, QueryKind::IsisInterface)
                | (Target::AllInterfaces, QueryKind::IsisInterface)
        )
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Peer { peer_addr } => write!(f, "peer {peer_addr}"),
            Target::Destination { host } => write!(f, "destination {host}"),
            Target::Interface { name } => write!(f, "interface {name}"),
            Target::AllInterfaces => write!(f, "all interfaces"),
            Target::Malformed { token, .. } => write!(f, "target {token}"),
        }
    }
}

/// Parses a list of operator-supplied values into targets.
///
/// Each value may itself hold several targets separated by whitespace or commas,
/// so both `-f ge-0/0/0.0 -f ge-1/0/0.0` and `-f "ge-0/0/0.0 ge-1/0/0.0"` work.
/// An IS-IS list that ends up empty means every interface. A token that does
/// not parse stays in the list as [`Target::Malformed`], in its original position.
pub fn parse_list<S: AsRef<str>>(kind: QueryKind, values: &[S]) -> Vec<Target> {
    let mut targets = Vec::new();

    for value in values {
        for part in value
            .as_ref()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
        {
            let target = Target::parse(kind, part).unwrap_or_else(|problem| Target::Malformed {
                token: part.to_string(),
                problem,
            });
            targets.push(target);
        }
    }

    if targets.is_empty() && kind == QueryKind::IsisInterface {
        targets.push(Target::AllInterfaces);
    }

    targets
}

fn parse_peer(s: &str) -> Result<Target, String> {
    s.parse::<IpAddr>()
        .map(|peer_addr| Target::Peer { peer_addr })
        .map_err(|e| format!("invalid peer address '{s}': {e}"))
}

fn parse_destination(s: &str) -> Result<Target, String> {
    if s.parse::<IpAddr>().is_ok() || is_hostname(s) {
        return Ok(Target::Destination {
            host: s.to_string(),
        });
    }
    Err(format!("invalid destination '{s}': not an IP address or host name"))
}

/// Interface names are opaque to us; only reject what the device could never accept.
fn parse_interface(s: &str) -> Result<Target, String> {
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!("invalid interface name '{s}'"));
    }
    Ok(Target::Interface {
        name: s.to_string(),
    })
}

fn is_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.is_empty() || s.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
