use std::sync::Arc;

use anyhow::{Context, anyhow};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use routecheck_common::model::OverallResult;
use routecheck_core::check::{CheckRequest, CheckService};
use routecheck_core::network::rest::RestClient;

use crate::commands::CommandLine;

/// Runs the check described by the command line.
///
/// The run happens on its own task so that a panic inside it still ends in a
/// result. Ctrl-C cancels the run; sessions are closed before it returns.
pub async fn check(commands: CommandLine) -> anyhow::Result<OverallResult> {
    let targets = commands
        .command
        .targets()
        .map_err(|e| anyhow!(e))
        .context("invalid targets")?;

    let request = CheckRequest {
        kind: commands.command.kind(),
        targets,
        scope: commands.scope(),
    };
    let config = commands.config();
    let client = Arc::new(RestClient::new(commands.rest_settings()));
    let service = Arc::new(CheckService::new(client, &config));

    info!(
        "checking {} on {} element(s), {} target(s)",
        request.kind,
        commands.hosts.len(),
        request.targets.len()
    );

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, closing sessions");
            interrupt.cancel();
        }
    });

    let run = tokio::spawn(service.run(commands.hosts, request, cancel));
    run.await.context("check task failed")
}

/// The result reported when no check result could be produced at all.
pub fn failure(err: &anyhow::Error) -> OverallResult {
    OverallResult::check_failure(format!("{err:#}"))
}
