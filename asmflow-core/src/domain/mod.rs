//! Core domain types
//!
//! Entities owned by the remote Galaxy-compatible execution service. Every
//! identifier is an opaque string minted by the service; the client never
//! parses or fabricates one.

pub mod dataset;
pub mod history;
pub mod job;
pub mod metrics;
pub mod user;
