use std::fmt;
use std::time::Duration;

/// Login credentials for the management service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// How the batch of targets is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Every target is probed and judged.
    #[default]
    Batch,
    /// Only the first target is probed; the rest are ignored.
    ///
    /// Kept for compatibility with the single-peer session check.
    SingleTarget,
}

/// What the outcome policy does when only part of a run fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartialFailure {
    /// Any inconsistency or unreachable element faults the whole run.
    #[default]
    Fault,
    /// Inconsistencies next to healthy entities degrade the run instead.
    Degrade,
}

/// Settings for opening a session to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSettings {
    /// Management service port.
    pub port: u16,
    /// Bound for resolving the element and establishing the session.
    pub connect_timeout: Duration,
    /// Bound for the TCP reachability pre-check. `None` skips the pre-check.
    pub probe_timeout: Option<Duration>,
}

/// Run configuration, assembled by the caller from its own inputs.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub connect: ConnectSettings,
    /// Bound for each individual request.
    pub request_timeout: Duration,
    /// Echo requests per destination for reachability checks.
    pub ping_count: Option<u32>,
    pub mode: ProcessingMode,
    pub partial_failure: PartialFailure,
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

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("netops", "s3cret!");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("netops"));
        assert!(!rendered.contains("s3cret!"));
    }

    #[test]
    fn defaults_are_batch_and_fault() {
        assert_eq!(ProcessingMode::default(), ProcessingMode::Batch);
        assert_eq!(PartialFailure::default(), PartialFailure::Fault);
    }
}
