//! parley - a streaming chat client for local generation servers
//!
//! Keeps a set of conversations, streams one reply at a time from the
//! server's `data: ` line protocol, and lets the reply be stopped midway.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod sse;
pub mod store;
pub mod traits;
