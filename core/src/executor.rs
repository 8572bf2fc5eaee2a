//! # Probe Executor
//!
//! Issues one request per target over an open [`Session`], strictly one at a
//! time. A failed target is recorded as a [`ProbeError`] and the batch moves on:
//! partial success is an ordinary outcome.

use std::time::Duration;

use serde_json::Value;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use routecheck_common::client::{InstanceScope, QueryKind, Request};
use routecheck_common::config::ProcessingMode;
use routecheck_common::error::{ProbeError, RequestError};
use routecheck_common::network::target::Target;
use routecheck_common::telemetry::timed;

use crate::connection::Session;

/// The raw answer, or the failure, for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub target: Target,
    pub response: Result<Value, ProbeError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeBatch {
    pub outcomes: Vec<ProbeOutcome>,
    /// Set when cancellation stopped the batch before every target was asked.
    pub interrupted: bool,
}

#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    request_timeout: Duration,
    mode: ProcessingMode,
    ping_count: Option<u32>,
}

impl ProbeExecutor {
    pub fn new(request_timeout: Duration, mode: ProcessingMode, ping_count: Option<u32>) -> Self {
        Self {
            request_timeout,
            mode,
            ping_count,
        }
    }

    pub async fn run(
        &self,
        session: &mut Session,
        kind: QueryKind,
        targets: &[Target],
        scope: &InstanceScope,
        cancel: &CancellationToken,
    ) -> ProbeBatch {
        let selected: &[Target] = self.select(targets);
        let mut batch = ProbeBatch {
            outcomes: Vec::with_capacity(selected.len()),
            interrupted: false,
        };

        for target in selected {
            if cancel.is_cancelled() {
                batch.interrupted = true;
                break;
            }

            if let Target::Malformed { problem, .. } = target {
                warn!(element = %session.endpoint(), %target, "not sent: {problem}");
                batch.outcomes.push(ProbeOutcome {
                    target: target.clone(),
                    response: Err(ProbeError::new(target.clone(), problem.clone())),
                });
                continue;
            }

            if !target.matches(kind) {
                let message = format!("{target} cannot be asked with a {kind} query");
                batch.outcomes.push(ProbeOutcome {
                    target: target.clone(),
                    response: Err(ProbeError::new(target.clone(), message)),
                });
                continue;
            }

            let request = Request::for_target(kind, target, scope).with_count(self.ping_count);
            debug!(element = %session.endpoint(), %target, %scope, "issuing {kind} query");

            let call = timed("request", timeout(self.request_timeout, session.call(&request)));
            let answered = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = call => Some(result),
            };

            let Some(result) = answered else {
                warn!(element = %session.endpoint(), %target, "run cancelled during request");
                batch.interrupted = true;
                break;
            };

            let response = match result {
                Ok(Ok(payload)) => Ok(payload),
                Ok(Err(e)) => Err(ProbeError::new(target.clone(), e.to_string())),
                Err(_elapsed) => Err(ProbeError::new(
                    target.clone(),
                    RequestError::Timeout(self.request_timeout.as_millis()).to_string(),
                )),
            };

            if let Err(e) = &response {
                warn!(element = %session.endpoint(), "{e}");
            }

            batch.outcomes.push(ProbeOutcome {
                target: target.clone(),
                response,
            });
        }

        batch
    }

    fn select<'a>(&self, targets: &'a [Target]) -> &'a [Target] {
        match self.mode {
            ProcessingMode::Batch => targets,
            ProcessingMode::SingleTarget => {
                if targets.len() > 1 {
                    warn!(
                        ignored = targets.len() - 1,
                        "single-target mode: only {} is checked",
                        targets[0]
                    );
                }
                &targets[..targets.len().min(1)]
            }
        }
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
