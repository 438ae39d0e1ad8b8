//! # Verity Test Suite
//!
//! Unified test crate covering the attestation worker end to end.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/          # Cross-crate flows
//! │   ├── store_http.rs         # Blob store service over real HTTP
//! │   ├── pipeline.rs           # Anchor -> fetch -> verify -> attest
//! │   ├── custody.rs            # Challenge rounds end to end
//! │   ├── attestation_flow.rs   # Relay polling through the full wiring
//! │   └── lifecycle.rs          # Finalization matrix
//! │
//! └── benches/                  # Criterion benchmarks for the hot paths
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p verity-tests
//!
//! # By module
//! cargo test -p verity-tests integration::pipeline
//!
//! # Benchmarks
//! cargo bench -p verity-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
