//! Encoding of probe requests into Junos RPCs.
//!
//! | query kind       | RPC                               | subject            | scope              |
//! |------------------|-----------------------------------|--------------------|--------------------|
//! | `BgpNeighbor`    | `get-bgp-neighbor-information`    | `neighbor-address` | `instance`         |
//! | `IsisInterface`  | `get-isis-interface-information`  | `interface-name`   | `instance`         |
//! | `Ping`           | `ping`                            | `host`             | `routing-instance` |
//!
//! A global scope sends no scope parameter at all.

use routecheck_common::client::{QueryKind, Request};

/// An RPC ready to be sent by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcCall {
    pub name: &'static str,
    pub params: Vec<(&'static str, String)>,
    pub flags: Vec<&'static str>,
}

impl RpcCall {
    /// Parameters followed by flags; flags carry an empty value.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        self.params
            .iter()
            .cloned()
            .chain(self.flags.iter().map(|flag| (*flag, String::new())))
            .collect()
    }
}

/// A cheap RPC used to prove a session is authenticated. Its reply is discarded.
pub const SESSION_CHECK_RPC: &str = "get-system-uptime-information";

pub fn rpc_name(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::BgpNeighbor => "get-bgp-neighbor-information",
        QueryKind::IsisInterface => "get-isis-interface-information",
        QueryKind::Ping => "ping",
    }
}

fn subject_param(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::BgpNeighbor => "neighbor-address",
        QueryKind::IsisInterface => "interface-name",
        QueryKind::Ping => "host",
    }
}

fn scope_param(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::BgpNeighbor | QueryKind::IsisInterface => "instance",
        QueryKind::Ping => "routing-instance",
    }
}

pub fn encode(request: &Request) -> RpcCall {
    let kind = request.kind;
    let mut params: Vec<(&'static str, String)> = Vec::new();

    if let Some(subject) = &request.subject {
        params.push((subject_param(kind), subject.clone()));
    }

    if let Some(instance) = request.scope.name() {
        params.push((scope_param(kind), instance.to_string()));
    }

    if kind == QueryKind::Ping
        && let Some(count) = request.count
    {
        params.push(("count", count.to_string()));
    }

    let mut flags = Vec::new();
    if request.extensive {
        flags.push("extensive");
    }

    RpcCall {
        name: rpc_name(kind),
        params,
        flags,
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
