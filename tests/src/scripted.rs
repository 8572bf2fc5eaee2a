//! An in-memory management client answering from a script.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use routecheck_common::client::{ManagementClient, ManagementSession, Request};
use routecheck_common::config::Credentials;
use routecheck_common::error::{ConnectionError, RequestError};
use routecheck_common::network::endpoint::Endpoint;

#[derive(Clone)]
enum Script {
    Refuse(ConnectionError),
    Answer(HashMap<Option<String>, Value>),
}

/// Elements are keyed by address. Each either refuses the session or answers
/// requests by their subject; an unscripted subject is rejected.
#[derive(Default)]
pub struct ScriptedClient {
    scripts: HashMap<String, Script>,
    password: Option<String>,
    closes: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, Request)>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions are only granted with this password.
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn answer(mut self, element: &str, subject: Option<&str>, reply: Value) -> Self {
        let script = self
            .scripts
            .entry(element.to_string())
            .or_insert_with(|| Script::Answer(HashMap::new()));
        if let Script::Answer(replies) = script {
            replies.insert(subject.map(str::to_string), reply);
        }
        self
    }

    pub fn refuse(mut self, element: &str, err: ConnectionError) -> Self {
        self.scripts.insert(element.to_string(), Script::Refuse(err));
        self
    }

    /// How many sessions were closed so far.
    pub fn closes(&self) -> Arc<AtomicUsize> {
        self.closes.clone()
    }

    /// Every request issued, with the element it went to.
    pub fn requests(&self) -> Arc<Mutex<Vec<(String, Request)>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl ManagementClient for ScriptedClient {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<Box<dyn ManagementSession>, ConnectionError> {
        if let Some(expected) = &self.password {
            if &credentials.password != expected {
                return Err(ConnectionError::Authentication {
                    host: endpoint.host.clone(),
                    message: "401 Unauthorized".to_string(),
                });
            }
        }

        match self.scripts.get(&endpoint.host) {
            Some(Script::Refuse(err)) => Err(err.clone()),
            Some(Script::Answer(replies)) => Ok(Box::new(ScriptedSession {
                element: endpoint.host.clone(),
                replies: replies.clone(),
                closes: self.closes.clone(),
                requests: self.requests.clone(),
            })),
            None => Err(ConnectionError::Unknown {
                host: endpoint.host.clone(),
                message: "element not scripted".to_string(),
            }),
        }
    }
}

struct ScriptedSession {
    element: String,
    replies: HashMap<Option<String>, Value>,
    closes: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, Request)>>>,
}

#[async_trait]
impl ManagementSession for ScriptedSession {
    async fn call(&mut self, request: &Request) -> Result<Value, RequestError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((self.element.clone(), request.clone()));
        }
        self.replies
            .get(&request.subject)
            .cloned()
            .ok_or_else(|| RequestError::Rejected(format!("no reply scripted for {:?}", request.subject)))
    }

    async fn close(&mut self) -> Result<(), RequestError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
