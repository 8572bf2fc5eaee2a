//! # Check Service
//!
//! Runs one health check against one or more network elements.
//!
//! Per element the service:
//! 1. opens a session through the [`ConnectionManager`],
//! 2. probes every target over it with the [`ProbeExecutor`],
//! 3. closes the session, whatever happened during probing,
//! 4. normalizes and evaluates each outcome into verdicts.
//!
//! Elements are checked concurrently, one task and one session each.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use routecheck_common::client::{InstanceScope, ManagementClient, QueryKind};
use routecheck_common::config::{Config, Credentials, PartialFailure};
use routecheck_common::error::ConnectionError;
use routecheck_common::model::{OverallResult, Verdict};
use routecheck_common::network::target::Target;
use routecheck_common::telemetry::timed;

use crate::connection::ConnectionManager;
use crate::evaluate::evaluate_all;
use crate::executor::{ProbeBatch, ProbeExecutor, ProbeOutcome};
use crate::normalize::normalize;
use crate::policy;

/// What to ask every element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub kind: QueryKind,
    pub targets: Vec<Target>,
    pub scope: InstanceScope,
}

/// Verdicts gathered from one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementReport {
    pub element: String,
    pub verdicts: Vec<Verdict>,
    pub interrupted: bool,
}

pub struct CheckService {
    connections: ConnectionManager,
    executor: ProbeExecutor,
    credentials: Credentials,
    partial_failure: PartialFailure,
}

impl CheckService {
    pub fn new(client: Arc<dyn ManagementClient>, config: &Config) -> Self {
        Self {
            connections: ConnectionManager::new(client, config.connect.clone()),
            executor: ProbeExecutor::new(config.request_timeout, config.mode, config.ping_count),
            credentials: config.credentials.clone(),
            partial_failure: config.partial_failure,
        }
    }

    /// Checks every element and applies the outcome policy.
    pub async fn run(
        self: Arc<Self>,
        elements: Vec<String>,
        request: CheckRequest,
        cancel: CancellationToken,
    ) -> OverallResult {
        let partial_failure = self.partial_failure;
        let outcomes = timed("run", self.check_elements(elements, request, cancel)).await;
        policy::conclude(&outcomes, partial_failure)
    }

    /// Checks every element on its own task. Results are keyed by element, so
    /// their order does not depend on which element answered first.
    pub async fn check_elements(
        self: Arc<Self>,
        elements: Vec<String>,
        request: CheckRequest,
        cancel: CancellationToken,
    ) -> BTreeMap<String, Result<ElementReport, ConnectionError>> {
        let request = Arc::new(request);
        let mut tasks: JoinSet<(String, Result<ElementReport, ConnectionError>)> = JoinSet::new();

        for element in elements.iter().cloned() {
            let service = self.clone();
            let request = request.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let outcome = service.check_element(&element, &request, &cancel).await;
                (element, outcome)
            });
        }

        let mut outcomes = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((element, outcome)) => {
                    outcomes.insert(element, outcome);
                }
                Err(e) => error!("check task failed: {e}"),
            }
        }

        for element in elements {
            outcomes.entry(element.clone()).or_insert_with(|| {
                Err(ConnectionError::Unknown {
                    host: element,
                    message: "check task aborted".to_string(),
                })
            });
        }

        outcomes
    }

    /// Checks one element. Only connection-stage failures are errors; per-target
    /// failures become inconsistent verdicts.
    pub async fn check_element(
        &self,
        element: &str,
        request: &CheckRequest,
        cancel: &CancellationToken,
    ) -> Result<ElementReport, ConnectionError> {
        if cancel.is_cancelled() {
            return Ok(ElementReport {
                element: element.to_string(),
                verdicts: Vec::new(),
                interrupted: true,
            });
        }

        let mut session = timed("connect", self.connections.open(element, &self.credentials)).await?;
        info!(element = %session.endpoint(), "connected, checking {} target(s)", request.targets.len());

        let batch: ProbeBatch = self
            .executor
            .run(&mut session, request.kind, &request.targets, &request.scope, cancel)
            .await;
        self.connections.close(session).await;

        let verdicts = interpret(request.kind, batch.outcomes);
        debug!(
            element,
            verdicts = verdicts.len(),
            inconsistent = verdicts.iter().filter(|v| !v.consistent).count(),
            "element checked"
        );

        Ok(ElementReport {
            element: element.to_string(),
            verdicts,
            interrupted: batch.interrupted,
        })
    }
}

fn interpret(kind: QueryKind, outcomes: Vec<ProbeOutcome>) -> Vec<Verdict> {
    let mut verdicts = Vec::new();
    for outcome in outcomes {
        match outcome.response {
            Ok(raw) => match normalize(kind, &outcome.target, &raw) {
                Ok(records) => verdicts.extend(evaluate_all(&records)),
                Err(e) => verdicts.push(Verdict::from_normalization_error(&outcome.target, &e)),
            },
            Err(e) => verdicts.push(Verdict::from_probe_error(&e)),
        }
    }
    verdicts
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
