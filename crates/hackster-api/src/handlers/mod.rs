//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod dead_letters;
pub mod health;
pub mod records;
pub mod reports;
