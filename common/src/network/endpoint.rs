use std::fmt;
use std::net::SocketAddr;

/// A resolved management endpoint of one network element.
///
/// `host` keeps the name the operator supplied so that error messages and
/// TLS server-name checks refer to the element the way it was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub addr: SocketAddr,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, addr: SocketAddr) -> Self {
        Self {
            host: host.into(),
            addr,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == self.addr.ip().to_string() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{} ({})", self.host, self.addr)
        }
    }
}
