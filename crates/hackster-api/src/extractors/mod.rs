//! Axum extractors for request handling
//!
//! Custom extractors for authentication, listing bounds, and validation.

mod auth;
mod bounds;
mod validated;

pub use auth::Operator;
pub use bounds::{Bounds, BoundsParams};
pub use validated::ValidatedJson;
