pub mod check;

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use routecheck_common::client::{InstanceScope, QueryKind};
use routecheck_common::config::{Config, ConnectSettings, Credentials, PartialFailure, ProcessingMode};
use routecheck_common::network::target::{self, Target};
use routecheck_core::network::rest::RestSettings;

#[derive(Parser, Debug)]
#[command(name = "routecheck", version)]
#[command(about = "Checks routing state on Junos network elements for a monitoring system.")]
pub struct CommandLine {
    /// Network element to check; repeat for several elements
    #[arg(short = 'H', long = "host", value_name = "HOST", required = true)]
    pub hosts: Vec<String>,

    /// Login user
    #[arg(short, long)]
    pub username: String,

    /// Login password
    #[arg(short, long, env = "ROUTECHECK_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Routing instance to query; the global instance when omitted
    #[arg(short, long)]
    pub instance: Option<String>,

    /// Management service port
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Talk HTTPS to the management service
    #[arg(long)]
    pub tls: bool,

    /// Accept certificates that cannot be verified
    #[arg(long, requires = "tls")]
    pub insecure: bool,

    /// Seconds allowed for resolving the element and logging in
    #[arg(long, value_name = "SECONDS", default_value = "10", value_parser = parse_seconds)]
    pub connect_timeout: Duration,

    /// Seconds allowed for the TCP pre-check of the management port
    #[arg(long, value_name = "SECONDS", default_value = "3", value_parser = parse_seconds)]
    pub probe_timeout: Duration,

    /// Skip the TCP pre-check
    #[arg(long, conflicts_with = "probe_timeout")]
    pub no_probe: bool,

    /// Seconds allowed for each request
    #[arg(long, value_name = "SECONDS", default_value = "30", value_parser = parse_seconds)]
    pub request_timeout: Duration,

    /// Only check the first target, ignoring the rest
    #[arg(long)]
    pub legacy_single_target: bool,

    /// Report a partial failure as WARNING instead of CRITICAL
    #[arg(long)]
    pub degrade_partial: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Log every step to stderr
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that BGP sessions to the given neighbours are established
    Bgp {
        /// Neighbour address; several may be given
        #[arg(short = 'n', long = "neighbor", value_name = "ADDRESS", required = true, num_args = 1..)]
        neighbors: Vec<String>,
    },
    /// Check IS-IS adjacencies on the given interfaces, or on every IS-IS interface
    Isis {
        /// Interface name; several may be given
        #[arg(short = 'f', long = "interface", value_name = "NAME", num_args = 1..)]
        interfaces: Vec<String>,
    },
    /// Check that the given destinations answer pings
    Ping {
        /// Destination address or host name; several may be given
        #[arg(short = 'l', long = "destination", value_name = "HOST", required = true, num_args = 1..)]
        destinations: Vec<String>,

        /// Echo requests per destination
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        count: Option<u32>,
    },
}

impl Commands {
    pub fn kind(&self) -> QueryKind {
        match self {
            Commands::Bgp { .. } => QueryKind::BgpNeighbor,
            Commands::Isis { .. } => QueryKind::IsisInterface,
            Commands::Ping { .. } => QueryKind::Ping,
        }
    }

    pub fn targets(&self) -> Result<Vec<Target>, String> {
        let values: &[String] = match self {
            Commands::Bgp { neighbors } => neighbors,
            Commands::Isis { interfaces } => interfaces,
            Commands::Ping { destinations, .. } => destinations,
        };
        let targets = target::parse_list(self.kind(), values);
        if targets.is_empty() {
            return Err("no targets given".to_string());
        }
        Ok(targets)
    }

    pub fn ping_count(&self) -> Option<u32> {
        match self {
            Commands::Ping { count, .. } => *count,
            _ => None,
        }
    }
}

impl CommandLine {
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else if self.verbose {
            LevelFilter::INFO
        } else {
            LevelFilter::WARN
        }
    }

    pub fn scope(&self) -> InstanceScope {
        InstanceScope::from_option(self.instance.clone())
    }

    pub fn config(&self) -> Config {
        Config {
            credentials: Credentials::new(&self.username, &self.password),
            connect: ConnectSettings {
                port: self.port,
                connect_timeout: self.connect_timeout,
                probe_timeout: (!self.no_probe).then_some(self.probe_timeout),
            },
            request_timeout: self.request_timeout,
            ping_count: self.command.ping_count(),
            mode: if self.legacy_single_target {
                ProcessingMode::SingleTarget
            } else {
                ProcessingMode::Batch
            },
            partial_failure: if self.degrade_partial {
                PartialFailure::Degrade
            } else {
                PartialFailure::Fault
            },
        }
    }

    pub fn rest_settings(&self) -> RestSettings {
        RestSettings {
            tls: self.tls,
            accept_invalid_certs: self.insecure,
            connect_timeout: self.connect_timeout,
        }
    }
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("'{s}' must be a positive number of seconds"));
    }
    Ok(Duration::from_secs_f64(secs))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
