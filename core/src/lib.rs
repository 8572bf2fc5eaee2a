//! # Routecheck Core
//!
//! The probe-and-evaluate engine. A run flows through these stages:
//!
//! * **[`connection`]**: opens and closes a session to one network element,
//!   classifying connection failures.
//! * **[`executor`]**: issues one request per target over the open session.
//! * **[`normalize`]**: turns each raw payload into canonical records.
//! * **[`evaluate`]**: judges each record consistent or not.
//! * **[`aggregate`]**: folds verdicts into one status.
//! * **[`policy`]**: caller-side decisions above the aggregate (partial failures,
//!   unreachable elements, interrupted runs).
//!
//! [`check`] wires the stages together per element and across elements, and
//! [`network`] holds the concrete transports.

pub mod aggregate;
pub mod check;
pub mod connection;
pub mod evaluate;
pub mod executor;
pub mod network;
pub mod normalize;
pub mod policy;
