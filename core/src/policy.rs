//! # Outcome Policy
//!
//! Caller-side decisions above the [`aggregate`](crate::aggregate) step:
//! how partial failures are graded, what happens when elements could not be
//! reached, and how an interrupted run is reported.

use std::collections::BTreeMap;

use tracing::debug;

use routecheck_common::config::PartialFailure;
use routecheck_common::error::ConnectionError;
use routecheck_common::model::{OverallResult, Status, Verdict};

use crate::aggregate;
use crate::check::ElementReport;

const INTERRUPTED_CAUSE: &str = "run interrupted before every target was checked";

/// Builds the overall result of a run from every element's outcome.
///
/// With more than one element, entity ids are qualified with the element they
/// belong to. The map order makes the result independent of completion order.
pub fn conclude(
    outcomes: &BTreeMap<String, Result<ElementReport, ConnectionError>>,
    policy: PartialFailure,
) -> OverallResult {
    let qualify: bool = outcomes.len() > 1;
    let mut verdicts: Vec<Verdict> = Vec::new();
    let mut causes: Vec<String> = Vec::new();
    let mut interrupted = false;

    for (element, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                interrupted |= report.interrupted;
                verdicts.extend(report.verdicts.iter().cloned().map(|v| {
                    if qualify { v.on_element(element) } else { v }
                }));
            }
            Err(e) => causes.push(format!("{}: {e}", e.kind())),
        }
    }

    let reached = outcomes.len() - causes.len();
    if !outcomes.is_empty() && reached == 0 {
        return OverallResult::connection_failure(causes);
    }

    let result: OverallResult = aggregate::reduce(verdicts);
    let base: Status = result.status();
    let any_consistent: bool = result.verdicts().iter().any(|v| v.consistent);
    let unreached: bool = !causes.is_empty();

    let status = match (policy, base) {
        (PartialFailure::Fault, _) if unreached => Status::Faulted,
        (PartialFailure::Degrade, _) if unreached => {
            if any_consistent { Status::Degraded } else { Status::Faulted }
        }
        (PartialFailure::Degrade, Status::Faulted) if any_consistent => Status::Degraded,
        (_, status) => status,
    };

    let mut result = result.regraded(status).caused_by(causes);
    if interrupted {
        result = result.interrupted(INTERRUPTED_CAUSE);
    }

    debug!(?base, status = ?result.status(), reached, "outcome policy applied");
    result
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
