//! Request/response bodies exchanged with the execution service
//!
//! Thin serde mirrors of the service's JSON API. Field and key names are the
//! service's wire contract, not local design choices.

pub mod history;
pub mod tool;
