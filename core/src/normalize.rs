//! # Response Normalizer
//!
//! The single place where untyped device payloads become [`CanonicalRecord`]s.
//! Each record is built from fresh defaults for the entity at hand; nothing is
//! carried over from a previously inspected entity.

use serde_json::Value;

use routecheck_common::client::QueryKind;
use routecheck_common::error::NormalizationError;
use routecheck_common::model::{
    CanonicalRecord, InterfaceLevelRecord, IsisLevel, PeerRecord, PeerState, PrefixCounts,
    ReachabilityRecord,
};
use routecheck_common::network::target::Target;
use routecheck_protocols::junos;

pub fn normalize(
    kind: QueryKind,
    target: &Target,
    raw: &Value,
) -> Result<Vec<CanonicalRecord>, NormalizationError> {
    match kind {
        QueryKind::BgpNeighbor => normalize_peer(target, raw).map(|record| vec![record]),
        QueryKind::IsisInterface => normalize_interfaces(target, raw),
        QueryKind::Ping => normalize_reachability(target, raw).map(|record| vec![record]),
    }
}

// ── BGP ─────────────────────────────────────────────────────────────────────

fn normalize_peer(target: &Target, raw: &Value) -> Result<CanonicalRecord, NormalizationError> {
    let Target::Peer { peer_addr } = target else {
        return Err(mismatched(target, QueryKind::BgpNeighbor));
    };

    // A device error payload stands where the peer data should be, e.g. when
    // the address is not a configured neighbour in this instance.
    let state = junos::path(raw, &["bgp-information", "bgp-peer"])
        .and_then(|peer| junos::leaf(peer, "peer-state").map(|state| (peer, state)));

    let Some((peer, state)) = state else {
        let detail = junos::error_message(raw)
            .unwrap_or_else(|| format!("no state reported for peer {peer_addr}"));
        return Err(NormalizationError::unrecognized_target(detail));
    };

    let state = PeerState::from_device(state);
    let prefixes = match state {
        PeerState::Established => Some(prefix_counts(peer)),
        _ => None,
    };

    Ok(CanonicalRecord::Peer(PeerRecord::new(*peer_addr, state, prefixes)))
}

/// Counts of the first RIB the peer reports; absent counters read as zero.
fn prefix_counts(peer: &Value) -> PrefixCounts {
    let Some(rib) = junos::child(peer, "bgp-rib") else {
        return PrefixCounts::default();
    };
    let count = |key: &str| junos::leaf_u64(rib, key).unwrap_or(0);

    PrefixCounts {
        received: count("received-prefix-count"),
        accepted: count("accepted-prefix-count"),
        active: count("active-prefix-count"),
        advertised: count("advertised-prefix-count"),
    }
}

// ── IS-IS ───────────────────────────────────────────────────────────────────

fn normalize_interfaces(
    target: &Target,
    raw: &Value,
) -> Result<Vec<CanonicalRecord>, NormalizationError> {
    let wanted: Option<&str> = match target {
        Target::Interface { name } => Some(name),
        Target::AllInterfaces => None,
        _ => return Err(mismatched(target, QueryKind::IsisInterface)),
    };

    let Some(info) = junos::child(raw, "isis-interface-information") else {
        return Err(match junos::error_message(raw) {
            Some(message) => NormalizationError::unrecognized_target(message),
            None => NormalizationError::unexpected_shape(
                "no isis-interface-information in response; is IS-IS running?",
            ),
        });
    };

    let mut records = Vec::new();
    let mut found = false;

    for interface in junos::children(info, "isis-interface") {
        let name = junos::leaf(interface, "interface-name").ok_or_else(|| {
            NormalizationError::unexpected_shape("IS-IS interface without interface-name")
        })?;

        if let Some(wanted) = wanted
            && !same_interface(wanted, name)
        {
            continue;
        }
        found = true;

        for level_data in junos::children(interface, "interface-level-data") {
            records.push(CanonicalRecord::InterfaceLevel(normalize_level(name, level_data)?));
        }
    }

    if let Some(wanted) = wanted
        && !found
    {
        return Err(NormalizationError::unrecognized_target(format!(
            "{wanted} is not an IS-IS interface"
        )));
    }

    Ok(records)
}

/// `ge-0/0/0` names the same interface as its unit `ge-0/0/0.0`.
fn same_interface(wanted: &str, reported: &str) -> bool {
    reported == wanted
        || reported
            .strip_prefix(wanted)
            .is_some_and(|unit| unit.starts_with('.'))
}

/// Builds one level record. The `passive` leaf decides enablement:
///
/// | `passive` leaf | enabled | passive |
/// |----------------|---------|---------|
/// | absent         | yes     | no      |
/// | `Passive`      | yes     | yes     |
/// | `Disabled`     | no      | n/a     |
fn normalize_level(interface_name: &str, data: &Value) -> Result<InterfaceLevelRecord, NormalizationError> {
    let level = junos::leaf(data, "level")
        .and_then(IsisLevel::from_device)
        .ok_or_else(|| {
            NormalizationError::unexpected_shape(format!(
                "{interface_name}: level missing or not 1/2"
            ))
        })?;

    let adjacency_count: u32 = if junos::has(data, "adjacency-count") {
        junos::leaf_u64(data, "adjacency-count")
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                NormalizationError::unexpected_shape(format!(
                    "{interface_name} level {level}: unreadable adjacency-count"
                ))
            })?
    } else {
        0
    };

    if !junos::has(data, "passive") {
        return Ok(InterfaceLevelRecord::enabled(interface_name, level, false, adjacency_count));
    }

    match junos::leaf(data, "passive").map(str::trim) {
        Some("Passive") => Ok(InterfaceLevelRecord::enabled(interface_name, level, true, adjacency_count)),
        Some("Disabled") => Ok(InterfaceLevelRecord::disabled(interface_name, level, adjacency_count)),
        other => Err(NormalizationError::unexpected_shape(format!(
            "{interface_name} level {level}: unrecognized passive value {other:?}"
        ))),
    }
}

// ── Reachability ────────────────────────────────────────────────────────────

fn normalize_reachability(target: &Target, raw: &Value) -> Result<CanonicalRecord, NormalizationError> {
    let Target::Destination { host } = target else {
        return Err(mismatched(target, QueryKind::Ping));
    };

    let Some(results) = junos::child(raw, "ping-results") else {
        let detail = junos::error_message(raw)
            .unwrap_or_else(|| format!("no ping results for {host}"));
        return Err(NormalizationError::unrecognized_target(detail));
    };

    let reachable = match (junos::has(results, "ping-success"), junos::has(results, "ping-failure")) {
        (true, false) => true,
        (false, true) => false,
        (true, true) => {
            return Err(NormalizationError::new(
                NormalizationError::AMBIGUOUS_RESULT,
                format!("both success and failure reported for {host}"),
            ));
        }
        (false, false) => {
            return Err(NormalizationError::new(
                NormalizationError::AMBIGUOUS_RESULT,
                format!("neither success nor failure reported for {host}"),
            ));
        }
    };

    Ok(CanonicalRecord::Reachability(ReachabilityRecord {
        destination: host.clone(),
        reachable,
    }))
}

fn mismatched(target: &Target, kind: QueryKind) -> NormalizationError {
    NormalizationError::unrecognized_target(format!("{target} is not a {kind} target"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
