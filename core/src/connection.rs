//! # Connection Manager
//!
//! Opens a [`Session`] to one network element and closes it again.
//!
//! Opening runs three bounded steps, each with its own failure kind:
//! 1. **Resolution** of the element name ([`ConnectionError::NameResolution`]).
//! 2. **Reachability probe** of the management port, when enabled
//!    ([`ConnectionError::ProbeTimeout`], [`ConnectionError::Refused`]).
//! 3. **Session establishment** through the [`ManagementClient`], without any
//!    device facts ([`ConnectionError::Timeout`] when it overruns).
//!
//! Closing never fails: by then the outcome of the run is already fixed, so a
//! close error is logged and dropped.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};

use routecheck_common::client::{ManagementClient, ManagementSession, Request};
use routecheck_common::config::{ConnectSettings, Credentials};
use routecheck_common::error::{ConnectionError, RequestError};
use routecheck_common::network::endpoint::Endpoint;
use routecheck_common::telemetry::timed;

use crate::network::tcp;

/// An open session to exactly one network element.
pub struct Session {
    endpoint: Endpoint,
    inner: Box<dyn ManagementSession>,
    closed: bool,
}

impl Session {
    fn new(endpoint: Endpoint, inner: Box<dyn ManagementSession>) -> Self {
        Self {
            endpoint,
            inner,
            closed: false,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub async fn call(&mut self, request: &Request) -> Result<Value, RequestError> {
        self.inner.call(request).await
    }

    async fn close(mut self) {
        if let Err(e) = self.inner.close().await {
            warn!(element = %self.endpoint, "failed to close session: {e}");
        } else {
            debug!(element = %self.endpoint, "session closed");
        }
        self.closed = true;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            warn!(element = %self.endpoint, "session dropped without being closed");
        }
    }
}

pub struct ConnectionManager {
    client: Arc<dyn ManagementClient>,
    settings: ConnectSettings,
}

impl ConnectionManager {
    pub fn new(client: Arc<dyn ManagementClient>, settings: ConnectSettings) -> Self {
        Self { client, settings }
    }

    pub async fn open(&self, address: &str, credentials: &Credentials) -> Result<Session, ConnectionError> {
        let endpoint: Endpoint = timed("resolution", self.resolve(address)).await?;

        if let Some(probe_timeout) = self.settings.probe_timeout {
            timed("reachability probe", tcp::reachability_probe(&endpoint, probe_timeout)).await?;
        }

        let connect = self.client.connect(&endpoint, credentials);
        let inner = match timed("session setup", timeout(self.settings.connect_timeout, connect)).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                return Err(ConnectionError::Timeout {
                    host: endpoint.host.clone(),
                    message: format!(
                        "no session established within {} ms",
                        self.settings.connect_timeout.as_millis()
                    ),
                });
            }
        };

        debug!(element = %endpoint, user = %credentials.username, "session open");
        Ok(Session::new(endpoint, inner))
    }

    /// Releases the session unconditionally.
    pub async fn close(&self, session: Session) {
        session.close().await;
    }

    async fn resolve(&self, address: &str) -> Result<Endpoint, ConnectionError> {
        let host: &str = address.trim();
        let literal: &str = host.trim_start_matches('[').trim_end_matches(']');

        if let Ok(ip) = literal.parse::<IpAddr>() {
            return Ok(Endpoint::new(literal, SocketAddr::new(ip, self.settings.port)));
        }

        let name_error = |message: String| ConnectionError::NameResolution {
            host: host.to_string(),
            message,
        };

        if host.is_empty() {
            return Err(name_error("empty element address".to_string()));
        }

        let lookup = tokio::net::lookup_host((host, self.settings.port));
        let addrs: Vec<SocketAddr> = match timeout(self.settings.connect_timeout, lookup).await {
            Ok(Ok(addrs)) => addrs.collect(),
            Ok(Err(e)) => return Err(name_error(e.to_string())),
            Err(_elapsed) => return Err(name_error("resolution timed out".to_string())),
        };

        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .map(|addr| Endpoint::new(host, *addr))
            .ok_or_else(|| name_error("no addresses found".to_string()))
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        connects: AtomicUsize,
        closes: AtomicUsize,
        last_endpoint: Mutex<Option<Endpoint>>,
    }

    enum Behaviour {
        Accept { fail_close: bool },
        Reject(ConnectionError),
        Hang,
    }

    struct StubClient {
        behaviour: Behaviour,
        counters: Arc<Counters>,
    }

    struct StubSession {
        fail_close: bool,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl ManagementClient for StubClient {
        async fn connect(
            &self,
            endpoint: &Endpoint,
            _credentials: &Credentials,
        ) -> Result<Box<dyn ManagementSession>, ConnectionError> {
            self.counters.connects.fetch_add(1, Ordering::SeqCst);
            *self.counters.last_endpoint.lock().unwrap() = Some(endpoint.clone());
            match &self.behaviour {
                Behaviour::Accept { fail_close } => Ok(Box::new(StubSession {
                    fail_close: *fail_close,
                    counters: self.counters.clone(),
                })),
                Behaviour::Reject(err) => Err(err.clone()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("connect should have timed out")
                }
            }
        }
    }

    #[async_trait]
    impl ManagementSession for StubSession {
        async fn call(&mut self, _request: &Request) -> Result<Value, RequestError> {
            Ok(Value::Null)
        }

        async fn close(&mut self) -> Result<(), RequestError> {
            self.counters.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                Err(RequestError::Transport("socket already gone".into()))
            } else {
                Ok(())
            }
        }
    }

    fn manager(behaviour: Behaviour) -> (ConnectionManager, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let client = StubClient {
            behaviour,
            counters: counters.clone(),
        };
        let settings = ConnectSettings {
            port: 3000,
            connect_timeout: Duration::from_millis(200),
            probe_timeout: None,
        };
        (ConnectionManager::new(Arc::new(client), settings), counters)
    }

    fn creds() -> Credentials {
        Credentials::new("netops", "secret")
    }

    #[tokio::test]
    async fn open_uses_ip_literal_without_lookup() {
        let (manager, counters) = manager(Behaviour::Accept { fail_close: false });
        let session = manager.open("192.0.2.10", &creds()).await.unwrap();
        assert_eq!(session.endpoint().addr, "192.0.2.10:3000".parse().unwrap());
        manager.close(session).await;

        assert_eq!(counters.connects.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_accepts_bracketed_ipv6() {
        let (manager, counters) = manager(Behaviour::Accept { fail_close: false });
        let session = manager.open("[2001:db8::1]", &creds()).await.unwrap();
        manager.close(session).await;

        let endpoint = counters.last_endpoint.lock().unwrap().clone().unwrap();
        assert_eq!(endpoint.host, "2001:db8::1");
        assert_eq!(endpoint.addr.port(), 3000);
    }

    #[tokio::test]
    async fn client_errors_pass_through_unchanged() {
        let rejection = ConnectionError::Authentication {
            host: "192.0.2.10".into(),
            message: "401 Unauthorized".into(),
        };
        let (manager, _) = manager(Behaviour::Reject(rejection.clone()));
        let err = manager.open("192.0.2.10", &creds()).await.err().unwrap();
        assert_eq!(err, rejection);
    }

    #[tokio::test]
    async fn slow_session_setup_is_a_connection_timeout() {
        let (manager, _) = manager(Behaviour::Hang);
        let err = manager.open("192.0.2.10", &creds()).await.err().unwrap();
        assert!(matches!(err, ConnectionError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn close_failure_is_swallowed() {
        let (manager, counters) = manager(Behaviour::Accept { fail_close: true });
        let session = manager.open("192.0.2.10", &creds()).await.unwrap();
        manager.close(session).await;
        assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_address_is_a_resolution_error() {
        let (manager, counters) = manager(Behaviour::Accept { fail_close: false });
        let err = manager.open("  ", &creds()).await.err().unwrap();
        assert!(matches!(err, ConnectionError::NameResolution { .. }));
        assert_eq!(counters.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    #[ignore]
    async fn unknown_name_is_a_resolution_error() {
        let (manager, _) = manager(Behaviour::Accept { fail_close: false });
        let err = manager.open("no-such-element.invalid", &creds()).await.err().unwrap();
        assert!(matches!(err, ConnectionError::NameResolution { .. }));
    }
}
