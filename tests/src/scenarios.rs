use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use routecheck_common::client::{InstanceScope, QueryKind};
use routecheck_common::config::{Config, ConnectSettings, Credentials, PartialFailure, ProcessingMode};
use routecheck_common::error::ConnectionError;
use routecheck_common::model::{CanonicalRecord, OverallResult, PrefixCounts, Status};
use routecheck_common::network::target::{parse_list, Target};
use routecheck_core::check::{CheckRequest, CheckService};

use crate::scripted::ScriptedClient;

const R1: &str = "198.51.100.1";
const R2: &str = "198.51.100.2";

fn config(password: &str, mode: ProcessingMode, partial_failure: PartialFailure) -> Config {
    Config {
        credentials: Credentials::new("netops", password),
        connect: ConnectSettings {
            port: 3000,
            connect_timeout: Duration::from_secs(2),
            probe_timeout: None,
        },
        request_timeout: Duration::from_secs(2),
        ping_count: None,
        mode,
        partial_failure,
    }
}

async fn run_with(
    client: ScriptedClient,
    config: &Config,
    elements: &[&str],
    kind: QueryKind,
    targets: &[&str],
    scope: InstanceScope,
) -> OverallResult {
    let request = CheckRequest {
        kind,
        targets: parse_list(kind, targets),
        scope,
    };
    let service = Arc::new(CheckService::new(Arc::new(client), config));
    let elements = elements.iter().map(|e| e.to_string()).collect();
    service.run(elements, request, CancellationToken::new()).await
}

async fn run(client: ScriptedClient, kind: QueryKind, targets: &[&str]) -> OverallResult {
    let config = config("secret", ProcessingMode::Batch, PartialFailure::Fault);
    run_with(client, &config, &[R1], kind, targets, InstanceScope::Global).await
}

fn peer_reply(state: &str, counts: [u64; 4]) -> Value {
    json!({
        "bgp-information": [{
            "bgp-peer": [{
                "peer-address": [{"data": "192.0.2.1+179"}],
                "peer-state": [{"data": state}],
                "bgp-rib": [{
                    "name": [{"data": "inet.0"}],
                    "received-prefix-count": [{"data": counts[0].to_string()}],
                    "accepted-prefix-count": [{"data": counts[1].to_string()}],
                    "active-prefix-count": [{"data": counts[2].to_string()}],
                    "advertised-prefix-count": [{"data": counts[3].to_string()}]
                }]
            }]
        }]
    })
}

fn ping_reply(success: bool) -> Value {
    let marker = if success { "ping-success" } else { "ping-failure" };
    let mut results = json!({"target-host": [{"data": "10.0.0.1"}]});
    results[marker] = json!([{}]);
    json!({"ping-results": [results]})
}

#[tokio::test]
async fn established_peer_is_healthy() {
    let client = ScriptedClient::new().answer(R1, Some("192.0.2.1"), peer_reply("Established", [10, 10, 8, 5]));

    let result = run(client, QueryKind::BgpNeighbor, &["192.0.2.1"]).await;

    assert_eq!(result.status(), Status::Healthy);
    assert_eq!(result.code(), 0);
    let Some(CanonicalRecord::Peer(peer)) = &result.verdicts()[0].record else {
        panic!("expected a peer record");
    };
    assert_eq!(
        peer.prefixes(),
        Some(&PrefixCounts {
            received: 10,
            accepted: 10,
            active: 8,
            advertised: 5
        })
    );
}

#[tokio::test]
async fn idle_peer_is_faulted() {
    let client = ScriptedClient::new().answer(R1, Some("192.0.2.1"), peer_reply("Idle", [0; 4]));

    let result = run(client, QueryKind::BgpNeighbor, &["192.0.2.1"]).await;

    assert_eq!(result.status(), Status::Faulted);
    assert_eq!(result.code(), 2);
    assert!(!result.verdicts()[0].consistent);
}

#[tokio::test]
async fn isis_level_without_adjacencies_faults_only_that_level() {
    let reply = json!({
        "isis-interface-information": [{
            "isis-interface": [{
                "interface-name": [{"data": "ge-0/0/0.0"}],
                "interface-level-data": [
                    {"level": [{"data": "1"}], "adjacency-count": [{"data": "0"}]},
                    {"level": [{"data": "2"}], "adjacency-count": [{"data": "0"}], "passive": [{"data": "Disabled"}]}
                ]
            }]
        }]
    });
    let client = ScriptedClient::new().answer(R1, Some("ge-0/0/0.0"), reply);

    let result = run(client, QueryKind::IsisInterface, &["ge-0/0/0.0"]).await;

    let verdicts = result.verdicts();
    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0].entity_id, "ge-0/0/0.0 level 1");
    assert!(!verdicts[0].consistent);
    assert_eq!(verdicts[1].entity_id, "ge-0/0/0.0 level 2");
    assert!(verdicts[1].consistent);
    assert_eq!(result.status(), Status::Faulted);
}

#[tokio::test]
async fn wrong_credentials_abort_the_run() {
    let client = ScriptedClient::new()
        .password("secret")
        .answer(R1, Some("192.0.2.1"), peer_reply("Established", [1, 1, 1, 1]));
    let requests = client.requests();
    let config = config("wrong", ProcessingMode::Batch, PartialFailure::Fault);

    let result = run_with(client, &config, &[R1], QueryKind::BgpNeighbor, &["192.0.2.1"], InstanceScope::Global).await;

    assert_eq!(result.status(), Status::Faulted);
    assert_eq!(result.code(), 2);
    assert!(result.verdicts().is_empty());
    assert!(result.causes()[0].contains("401 Unauthorized"), "{:?}", result.causes());
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn one_unreachable_destination_faults_the_batch() {
    let client = || {
        ScriptedClient::new()
            .answer(R1, Some("10.0.0.1"), ping_reply(true))
            .answer(R1, Some("10.0.0.2"), ping_reply(false))
            .answer(R1, Some("10.0.0.3"), ping_reply(true))
    };
    let destinations = ["10.0.0.1", "10.0.0.2", "10.0.0.3"];

    let result = run(client(), QueryKind::Ping, &destinations).await;
    let consistent: Vec<bool> = result.verdicts().iter().map(|v| v.consistent).collect();
    assert_eq!(consistent, vec![true, false, true]);
    assert_eq!(result.status(), Status::Faulted);

    let degrade = config("secret", ProcessingMode::Batch, PartialFailure::Degrade);
    let result = run_with(client(), &degrade, &[R1], QueryKind::Ping, &destinations, InstanceScope::Global).await;
    assert_eq!(result.status(), Status::Degraded);
    assert_eq!(result.code(), 1);
}

#[tokio::test]
async fn unanswered_target_does_not_hide_the_others() {
    let client = ScriptedClient::new().answer(R1, Some("192.0.2.1"), peer_reply("Established", [1, 1, 1, 1]));

    let result = run(client, QueryKind::BgpNeighbor, &["192.0.2.1", "192.0.2.99"]).await;

    assert_eq!(result.verdicts().len(), 2);
    assert!(result.verdicts()[0].consistent);
    assert_eq!(result.verdicts()[1].entity_id, "peer 192.0.2.99");
    assert!(!result.verdicts()[1].consistent);
    assert_eq!(result.status(), Status::Faulted);
}

#[tokio::test]
async fn device_error_payload_becomes_a_verdict() {
    let error = json!({"error": [{"message": [{"data": "syntax error, expecting <address>"}]}]});
    let client = ScriptedClient::new().answer(R1, Some("2001:db8::1"), error);

    let result = run(client, QueryKind::BgpNeighbor, &["2001:db8::1"]).await;

    let rendered = serde_json::to_string(&result).unwrap();
    assert!(rendered.contains("malformed or unrecognized target"));
    assert!(rendered.contains("syntax error"));
    assert_eq!(result.status(), Status::Faulted);
}

#[tokio::test]
async fn malformed_peer_is_critical_and_the_valid_one_still_checked() {
    let client = ScriptedClient::new().answer(R1, Some("192.0.2.1"), peer_reply("Established", [1, 1, 1, 1]));
    let requests = client.requests();

    let result = run(client, QueryKind::BgpNeighbor, &["192.0.2.1", "2001:0770:0100:6844:::::2"]).await;

    assert_eq!(result.status(), Status::Faulted);
    assert_eq!(result.code(), 2);
    let verdicts = result.verdicts();
    assert_eq!(verdicts.len(), 2);
    assert!(verdicts[0].consistent);
    assert_eq!(verdicts[1].entity_id, "target 2001:0770:0100:6844:::::2");
    assert!(!verdicts[1].consistent);
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn legacy_mode_checks_only_the_first_peer() {
    let client = ScriptedClient::new()
        .answer(R1, Some("192.0.2.1"), peer_reply("Established", [1, 1, 1, 1]))
        .answer(R1, Some("192.0.2.2"), peer_reply("Idle", [0; 4]));
    let config = config("secret", ProcessingMode::SingleTarget, PartialFailure::Fault);

    let result = run_with(
        client,
        &config,
        &[R1],
        QueryKind::BgpNeighbor,
        &["192.0.2.1", "192.0.2.2"],
        InstanceScope::Global,
    )
    .await;

    assert_eq!(result.verdicts().len(), 1);
    assert_eq!(result.status(), Status::Healthy);
}

#[tokio::test]
async fn instance_named_master_is_passed_through() {
    let client = ScriptedClient::new().answer(R1, Some("192.0.2.1"), peer_reply("Established", [1, 1, 1, 1]));
    let requests = client.requests();
    let config = config("secret", ProcessingMode::Batch, PartialFailure::Fault);
    let scope = InstanceScope::from_option(Some("master".to_string()));

    run_with(client, &config, &[R1], QueryKind::BgpNeighbor, &["192.0.2.1"], scope).await;

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].1.scope, InstanceScope::Named("master".into()));
}

#[tokio::test]
async fn elements_are_checked_independently() {
    let client = ScriptedClient::new()
        .answer(R1, Some("10.0.0.1"), ping_reply(true))
        .refuse(
            R2,
            ConnectionError::Refused {
                host: R2.to_string(),
                message: "connection refused".to_string(),
            },
        );
    let closes = client.closes();
    let config = config("secret", ProcessingMode::Batch, PartialFailure::Fault);

    let result = run_with(client, &config, &[R2, R1], QueryKind::Ping, &["10.0.0.1"], InstanceScope::Global).await;

    assert_eq!(result.status(), Status::Faulted);
    assert_eq!(result.verdicts()[0].entity_id, format!("{R1}: destination 10.0.0.1"));
    assert!(result.causes()[0].contains(R2));
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn every_isis_interface_is_checked_when_none_is_named() {
    let reply = json!({
        "isis-interface-information": [{
            "isis-interface": [
                {
                    "interface-name": [{"data": "lo0.0"}],
                    "interface-level-data": [{"level": [{"data": "2"}], "adjacency-count": [{"data": "0"}], "passive": [{"data": "Passive"}]}]
                },
                {
                    "interface-name": [{"data": "ge-0/0/1.0"}],
                    "interface-level-data": [{"level": [{"data": "2"}], "adjacency-count": [{"data": "1"}]}]
                }
            ]
        }]
    });
    let client = ScriptedClient::new().answer(R1, None, reply);
    let no_interfaces: [&str; 0] = [];

    let result = run(client, QueryKind::IsisInterface, &no_interfaces).await;

    assert_eq!(result.verdicts().len(), 2);
    assert_eq!(result.status(), Status::Healthy);
    assert!(matches!(
        parse_list(QueryKind::IsisInterface, &no_interfaces)[0],
        Target::AllInterfaces
    ));
}
