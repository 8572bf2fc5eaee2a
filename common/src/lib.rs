//! # Routecheck Common
//!
//! Types shared by every layer of the health check: the targets being probed,
//! the canonical records and verdicts derived from device state, the error
//! taxonomy, run configuration and the management-client port that concrete
//! transports implement.
//!
//! Nothing in this crate performs I/O.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod network;
pub mod telemetry;
