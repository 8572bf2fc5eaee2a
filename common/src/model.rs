//! Canonical records, verdicts and the overall result.
//!
//! Device payloads are translated into [`CanonicalRecord`] variants at a single
//! choke point (the normalizer); everything downstream works on these types only.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

use crate::error::{NormalizationError, ProbeError};
use crate::network::target::Target;

// ── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PeerState {
    Idle,
    Connect,
    Active,
    OpenSent,
    OpenConfirm,
    Established,
    Unknown,
}

impl PeerState {
    pub const ALL: [PeerState; 7] = [
        PeerState::Idle,
        PeerState::Connect,
        PeerState::Active,
        PeerState::OpenSent,
        PeerState::OpenConfirm,
        PeerState::Established,
        PeerState::Unknown,
    ];

    /// Maps the state name reported by the device. Unrecognized names are `Unknown`.
    pub fn from_device(s: &str) -> Self {
        match s.trim() {
            "Idle" => PeerState::Idle,
            "Connect" => PeerState::Connect,
            "Active" => PeerState::Active,
            "OpenSent" => PeerState::OpenSent,
            "OpenConfirm" => PeerState::OpenConfirm,
            "Established" => PeerState::Established,
            _ => PeerState::Unknown,
        }
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PrefixCounts {
    pub received: u64,
    pub accepted: u64,
    pub active: u64,
    pub advertised: u64,
}

/// Session state of one routing peer.
///
/// Prefix counts exist if and only if the session is established; the
/// constructor enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PeerRecord {
    pub address: IpAddr,
    pub state: PeerState,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefixes: Option<PrefixCounts>,
}

impl PeerRecord {
    /// An established peer without reported counts gets zeroes; any other state drops them.
    pub fn new(address: IpAddr, state: PeerState, prefixes: Option<PrefixCounts>) -> Self {
        let prefixes = match state {
            PeerState::Established => Some(prefixes.unwrap_or_default()),
            _ => None,
        };
        Self {
            address,
            state,
            prefixes,
        }
    }

    pub fn prefixes(&self) -> Option<&PrefixCounts> {
        self.prefixes.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IsisLevel {
    #[serde(rename = "1")]
    L1,
    #[serde(rename = "2")]
    L2,
}

impl IsisLevel {
    pub fn from_device(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(IsisLevel::L1),
            "2" => Some(IsisLevel::L2),
            _ => None,
        }
    }
}

impl fmt::Display for IsisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsisLevel::L1 => f.write_str("1"),
            IsisLevel::L2 => f.write_str("2"),
        }
    }
}

/// Passive flag of an interface level. Only meaningful while the level is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Passive {
    Yes,
    No,
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InterfaceLevelRecord {
    pub interface_name: String,
    pub level: IsisLevel,
    pub enabled: bool,
    pub passive: Passive,
    pub adjacency_count: u32,
}

impl InterfaceLevelRecord {
    pub fn enabled(
        interface_name: impl Into<String>,
        level: IsisLevel,
        passive: bool,
        adjacency_count: u32,
    ) -> Self {
        Self {
            interface_name: interface_name.into(),
            level,
            enabled: true,
            passive: if passive { Passive::Yes } else { Passive::No },
            adjacency_count,
        }
    }

    pub fn disabled(interface_name: impl Into<String>, level: IsisLevel, adjacency_count: u32) -> Self {
        Self {
            interface_name: interface_name.into(),
            level,
            enabled: false,
            passive: Passive::NotApplicable,
            adjacency_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReachabilityRecord {
    pub destination: String,
    pub reachable: bool,
}

/// Normalized, vendor-agnostic state of one queried entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalRecord {
    Peer(PeerRecord),
    InterfaceLevel(InterfaceLevelRecord),
    Reachability(ReachabilityRecord),
}

impl CanonicalRecord {
    pub fn entity_id(&self) -> String {
        match self {
            CanonicalRecord::Peer(peer) => format!("peer {}", peer.address),
            CanonicalRecord::InterfaceLevel(level) => {
                format!("{} level {}", level.interface_name, level.level)
            }
            CanonicalRecord::Reachability(reach) => format!("destination {}", reach.destination),
        }
    }
}

// ── Verdicts ────────────────────────────────────────────────────────────────

/// Why an entity was judged the way it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Reason {
    LevelDisabled,
    LevelPassive,
    AdjacenciesUp { count: u32 },
    NoAdjacencies,
    Established,
    NotEstablished { state: PeerState },
    Reachable,
    Unreachable,
    ProbeFailed { message: String },
    MalformedResponse { cause: String, detail: String },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::LevelDisabled => f.write_str("level disabled, nothing expected"),
            Reason::LevelPassive => f.write_str("level passive, no adjacency expected"),
            Reason::AdjacenciesUp { count } => write!(f, "{count} adjacencies up"),
            Reason::NoAdjacencies => f.write_str("level active without adjacencies"),
            Reason::Established => f.write_str("session established"),
            Reason::NotEstablished { state } => write!(f, "session in state {state}"),
            Reason::Reachable => f.write_str("destination reachable"),
            Reason::Unreachable => f.write_str("destination unreachable"),
            Reason::ProbeFailed { message } => write!(f, "probe failed: {message}"),
            Reason::MalformedResponse { cause, detail } => write!(f, "{cause}: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Verdict {
    pub entity_id: String,
    pub consistent: bool,
    pub reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<CanonicalRecord>,
}

impl Verdict {
    pub fn new(record: &CanonicalRecord, consistent: bool, reason: Reason) -> Self {
        Self {
            entity_id: record.entity_id(),
            consistent,
            reason,
            record: Some(record.clone()),
        }
    }

    pub fn from_probe_error(err: &ProbeError) -> Self {
        Self {
            entity_id: err.target.to_string(),
            consistent: false,
            reason: Reason::ProbeFailed {
                message: err.message.clone(),
            },
            record: None,
        }
    }

    pub fn from_normalization_error(target: &Target, err: &NormalizationError) -> Self {
        Self {
            entity_id: target.to_string(),
            consistent: false,
            reason: Reason::MalformedResponse {
                cause: err.cause.clone(),
                detail: err.detail.clone(),
            },
            record: None,
        }
    }

    /// Qualifies the entity with the element it belongs to, for multi-element runs.
    pub fn on_element(mut self, element: &str) -> Self {
        self.entity_id = format!("{element}: {}", self.entity_id);
        self
    }
}

// ── Overall result ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Healthy,
    Degraded,
    Faulted,
    Unknown,
}

impl Status {
    /// The bounded code consumed by the monitoring system.
    pub fn code(self) -> u8 {
        match self {
            Status::Healthy => 0,
            Status::Degraded => 1,
            Status::Faulted => 2,
            Status::Unknown => 3,
        }
    }

    /// The state name the monitoring system shows for this code.
    pub fn label(self) -> &'static str {
        match self {
            Status::Healthy => "OK",
            Status::Degraded => "WARNING",
            Status::Faulted => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Status::Healthy => {
                "There are no faults and the state of every checked entity is consistent \
                 with its configuration."
            }
            Status::Degraded => {
                "Some checked entities are not consistent while the rest are healthy. \
                 Review the verdicts with 'consistent: false'."
            }
            Status::Faulted => {
                "There are fault(s) or the configuration is not consistent. Review the \
                 verdicts with 'consistent: false'. If the state shown is expected then \
                 the configuration needs correction, otherwise there is a fault."
            }
            Status::Unknown => {
                "No data was obtained from the network element. This output does not \
                 mean there is a fault in the network; review the check and its access \
                 to the element."
            }
        }
    }
}

const CONNECTION_FAILURE_SUMMARY: &str = "Could not connect to the network element, so its \
     state could not be checked. Review the cause below.";

const INCOMPLETE_SUMMARY: &str = "The run was interrupted before every target was checked. \
     No fault was found among the verdicts below, but they do not cover every target.";

const CHECK_FAILURE_SUMMARY: &str = "The check could not run. This output does not mean there \
     is a fault in the network; review the cause below.";

/// The one artifact handed to the monitoring system per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverallResult {
    summary: &'static str,
    status: Status,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    causes: Vec<String>,
    verdicts: Vec<Verdict>,
}

impl OverallResult {
    pub fn new(status: Status, verdicts: Vec<Verdict>) -> Self {
        Self {
            summary: status.summary(),
            status,
            causes: Vec::new(),
            verdicts,
        }
    }

    /// The same verdicts under another status, with that status' summary.
    pub fn regraded(self, status: Status) -> Self {
        Self {
            summary: status.summary(),
            status,
            ..self
        }
    }

    /// Adds run-level causes, such as elements that could not be reached.
    pub fn caused_by(mut self, causes: impl IntoIterator<Item = String>) -> Self {
        self.causes.extend(causes);
        self
    }

    /// Marks the run as cut short. A run that found no fault cannot claim
    /// health for targets it never asked, so Healthy becomes Unknown.
    pub fn interrupted(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        if self.status == Status::Healthy {
            self.status = Status::Unknown;
            self.summary = INCOMPLETE_SUMMARY;
        }
        self
    }

    /// The check itself failed before any element was asked.
    pub fn check_failure(cause: impl Into<String>) -> Self {
        Self {
            summary: CHECK_FAILURE_SUMMARY,
            status: Status::Unknown,
            causes: vec![cause.into()],
            verdicts: Vec::new(),
        }
    }

    /// Connection-stage failure: the element could not even be asked, which is critical.
    pub fn connection_failure(causes: Vec<String>) -> Self {
        Self {
            summary: CONNECTION_FAILURE_SUMMARY,
            status: Status::Faulted,
            causes,
            verdicts: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn summary(&self) -> &str {
        self.summary
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn code(&self) -> u8 {
        self.status.code()
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
