//! Outbound webhook notifications

mod webhook;

pub use webhook::{Notifier, Webhook};
