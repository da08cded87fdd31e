//! Integration test utilities for Hackster
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API with a live PostgreSQL database behind it.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
