//! Lucky Dashboard - webhook-driven endpoint tracker.
//!
//! Receives Lucky STUN webhook notifications carrying the public IP and
//! port of a named rule, persists the latest endpoint per rule, and
//! pushes the full rule table to every connected dashboard.

pub mod config;
pub mod server;
pub mod shutdown;
pub mod store;
