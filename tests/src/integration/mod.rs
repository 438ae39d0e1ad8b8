//! Cross-crate integration flows.
//!
//! Each module wires real components together (the in-memory bus, the dev
//! ledger, the HTTP blob store) and drives them the way the node runtime does.

pub mod attestation_flow;
pub mod custody;
pub mod pipeline;
pub mod store_http;
