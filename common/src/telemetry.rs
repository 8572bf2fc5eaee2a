//! Timing helpers shared by every stage of a run.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

/// Awaits `fut` and logs how long it took under `stage`.
pub async fn timed<F, T>(stage: &'static str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start: Instant = Instant::now();
    let output: T = fut.await;
    debug!(
        stage,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{stage} finished in {:.2}s",
        start.elapsed().as_secs_f64()
    );
    output
}
