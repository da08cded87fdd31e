//! # hackster-bridge
//!
//! Event bridge binary: chat gateway ingest, the durable queue worker pool,
//! stale-claim recovery, and the internal ops listener.
//!
//! The entry point lives in `main.rs`; everything else is a library so the
//! pieces stay individually testable.

pub mod ingest;
pub mod ops;
pub mod recovery;
pub mod runtime;
pub mod sources;
pub mod worker;

pub use runtime::run;
