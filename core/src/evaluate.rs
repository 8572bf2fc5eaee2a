//! # Consistency Evaluator
//!
//! Pure rules turning one [`CanonicalRecord`] into one [`Verdict`]. No state is
//! kept between calls, so evaluating a record twice gives the same verdict.

use routecheck_common::model::{
    CanonicalRecord, InterfaceLevelRecord, Passive, PeerRecord, PeerState, ReachabilityRecord,
    Reason, Verdict,
};

pub fn evaluate(record: &CanonicalRecord) -> Verdict {
    let (consistent, reason) = match record {
        CanonicalRecord::Peer(peer) => judge_peer(peer),
        CanonicalRecord::InterfaceLevel(level) => judge_level(level),
        CanonicalRecord::Reachability(reach) => judge_reachability(reach),
    };
    Verdict::new(record, consistent, reason)
}

/// Evaluates every record; an inconsistency never stops the rest from being judged.
pub fn evaluate_all(records: &[CanonicalRecord]) -> Vec<Verdict> {
    records.iter().map(evaluate).collect()
}

fn judge_peer(peer: &PeerRecord) -> (bool, Reason) {
    match peer.state {
        PeerState::Established => (true, Reason::Established),
        state => (false, Reason::NotEstablished { state }),
    }
}

/// Rules, first match wins:
/// 1. disabled level: nothing expected
/// 2. passive level: no adjacency expected
/// 3. active level with adjacencies
/// 4. active level without adjacencies is the only inconsistent case
fn judge_level(level: &InterfaceLevelRecord) -> (bool, Reason) {
    if !level.enabled {
        return (true, Reason::LevelDisabled);
    }
    match (level.passive, level.adjacency_count) {
        (Passive::Yes, _) => (true, Reason::LevelPassive),
        (_, 0) => (false, Reason::NoAdjacencies),
        (_, count) => (true, Reason::AdjacenciesUp { count }),
    }
}

fn judge_reachability(reach: &ReachabilityRecord) -> (bool, Reason) {
    if reach.reachable {
        (true, Reason::Reachable)
    } else {
        (false, Reason::Unreachable)
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
