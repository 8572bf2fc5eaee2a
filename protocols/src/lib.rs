//! Junos management-protocol plumbing: navigating the JSON rendering of RPC
//! replies, and encoding requests into RPC names and parameters.

pub mod junos;
pub mod rpc;
