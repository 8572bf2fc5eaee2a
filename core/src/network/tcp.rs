use std::io;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use routecheck_common::error::ConnectionError;
use routecheck_common::network::endpoint::Endpoint;

/// Checks that the management port accepts TCP connections before a full session is attempted.
///
/// A refused connection is reported as such; anything else that keeps the
/// handshake from completing within `probe_timeout` is a failed probe.
pub async fn reachability_probe(endpoint: &Endpoint, probe_timeout: Duration) -> Result<(), ConnectionError> {
    match timeout(probe_timeout, TcpStream::connect(endpoint.addr)).await {
        Ok(Ok(_stream)) => {
            debug!(element = %endpoint, "management port is reachable");
            Ok(())
        }
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => Err(ConnectionError::Refused {
            host: endpoint.host.clone(),
            message: format!("{} refused the connection: {e}", endpoint.addr),
        }),
        Ok(Err(e)) => Err(ConnectionError::ProbeTimeout {
            host: endpoint.host.clone(),
            message: format!("probe to {} failed: {e}", endpoint.addr),
        }),
        Err(_elapsed) => Err(ConnectionError::ProbeTimeout {
            host: endpoint.host.clone(),
            message: format!(
                "no answer from {} within {} ms",
                endpoint.addr,
                probe_timeout.as_millis()
            ),
        }),
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
