//! Delivery status notification dispatch.
//!
//! The engine core only signals that a notification is due; this crate
//! turns that signal into a transactional email via an HTTP relay.

mod client;
mod template;

pub use client::{NotifyClient, NotifyError, StatusNotification};
