//! # Status Aggregator
//!
//! Folds verdicts into one [`OverallResult`]. Only Healthy, Faulted and Unknown
//! come out of here; Degraded is a decision of the [`policy`](crate::policy) layer.

use routecheck_common::model::{OverallResult, Status, Verdict};

/// No verdicts is no data, which is not the same as all consistent.
pub fn judge(verdicts: &[Verdict]) -> Status {
    if verdicts.is_empty() {
        Status::Unknown
    } else if verdicts.iter().all(|v| v.consistent) {
        Status::Healthy
    } else {
        Status::Faulted
    }
}

pub fn reduce(verdicts: Vec<Verdict>) -> OverallResult {
    let status = judge(&verdicts);
    OverallResult::new(status, verdicts)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
