//! Junos REST API transport.
//!
//! Every RPC is a `GET {scheme}://{host}:{port}/rpc/{rpc}?{params}` with HTTP
//! basic authentication, asking for JSON. The API keeps no session state, so
//! "opening" a session means proving the credentials with one cheap RPC and
//! closing it releases nothing.

use std::error::Error as StdError;
use std::io;
use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, trace};

use routecheck_common::client::{ManagementClient, ManagementSession, Request};
use routecheck_common::config::Credentials;
use routecheck_common::error::{ConnectionError, RequestError};
use routecheck_common::network::endpoint::Endpoint;
use routecheck_protocols::{junos, rpc};

const BODY_EXCERPT_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestSettings {
    /// Use HTTPS instead of plain HTTP.
    pub tls: bool,
    /// Accept self-signed or otherwise unverifiable device certificates.
    pub accept_invalid_certs: bool,
    /// Bound for the TCP (and TLS) handshake of each HTTP connection.
    pub connect_timeout: Duration,
}

pub struct RestClient {
    settings: RestSettings,
}

impl RestClient {
    pub fn new(settings: RestSettings) -> Self {
        Self { settings }
    }

    /// Base URL of the element. Names stay in the URL for TLS; the connection
    /// itself goes to the address already resolved for the endpoint.
    fn base_url(&self, endpoint: &Endpoint) -> String {
        let scheme = if self.settings.tls { "https" } else { "http" };
        if endpoint.host.parse::<IpAddr>().is_ok() {
            format!("{scheme}://{}", endpoint.addr)
        } else {
            format!("{scheme}://{}:{}", endpoint.host, endpoint.addr.port())
        }
    }

    fn http_client(&self, endpoint: &Endpoint) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .danger_accept_invalid_certs(self.settings.accept_invalid_certs);

        if endpoint.host.parse::<IpAddr>().is_err() {
            builder = builder.resolve(&endpoint.host, endpoint.addr);
        }

        builder.build()
    }
}

#[async_trait]
impl ManagementClient for RestClient {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<Box<dyn ManagementSession>, ConnectionError> {
        let http = self.http_client(endpoint).map_err(|e| ConnectionError::Unknown {
            host: endpoint.host.clone(),
            message: error_chain(&e),
        })?;

        let session = RestSession {
            http,
            base_url: self.base_url(endpoint),
            host: endpoint.host.clone(),
            credentials: credentials.clone(),
        };
        session.login().await?;

        Ok(Box::new(session))
    }
}

pub struct RestSession {
    http: reqwest::Client,
    base_url: String,
    host: String,
    credentials: Credentials,
}

impl RestSession {
    fn get(&self, rpc: &str, query: &[(&str, String)]) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/rpc/{rpc}", self.base_url))
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    /// Proves the credentials; the reply itself is thrown away.
    async fn login(&self) -> Result<(), ConnectionError> {
        let response = self
            .get(rpc::SESSION_CHECK_RPC, &[])
            .send()
            .await
            .map_err(|e| classify_send_error(&self.host, &e))?;

        let status = response.status();
        debug!(element = %self.host, %status, "login answered");

        match status {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ConnectionError::Authentication {
                host: self.host.clone(),
                message: status.to_string(),
            }),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ConnectionError::Unknown {
                    host: self.host.clone(),
                    message: format!("{status}: {}", excerpt(&body)),
                })
            }
        }
    }
}

#[async_trait]
impl ManagementSession for RestSession {
    async fn call(&mut self, request: &Request) -> Result<Value, RequestError> {
        let call = rpc::encode(request);
        trace!(element = %self.host, rpc = call.name, params = ?call.params, "sending rpc");

        let response = self
            .get(call.name, &call.pairs())
            .send()
            .await
            .map_err(|e| RequestError::Transport(error_chain(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Transport(error_chain(&e)))?;

        let parsed = serde_json::from_str::<Value>(&body);
        if status.is_success() {
            return parsed.map_err(|e| RequestError::Decode(format!("{e}: {}", excerpt(&body))));
        }

        match parsed {
            // The device explains the rejection in its own error payload;
            // the normalizer turns it into a per-target error.
            Ok(payload) if junos::error_message(&payload).is_some() => Ok(payload),
            _ => Err(RequestError::Rejected(format!("{status}: {}", excerpt(&body)))),
        }
    }

    async fn close(&mut self) -> Result<(), RequestError> {
        Ok(())
    }
}

/// Maps a failed login request onto the connection taxonomy.
fn classify_send_error(host: &str, err: &reqwest::Error) -> ConnectionError {
    let host = host.to_string();
    let message = error_chain(err);

    if err.is_timeout() {
        ConnectionError::Timeout { host, message }
    } else if io_error_kind(err) == Some(io::ErrorKind::ConnectionRefused) {
        ConnectionError::Refused { host, message }
    } else {
        ConnectionError::Unknown { host, message }
    }
}

fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = e.source();
    }
    None
}

/// The error and all of its sources, joined. reqwest keeps the useful part deep in the chain.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }
    message
}

fn excerpt(body: &str) -> &str {
    let body = body.trim();
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => &body[..cut],
        None => body,
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
