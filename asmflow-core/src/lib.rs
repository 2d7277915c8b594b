//! Asmflow Core
//!
//! Core types for the asmflow assembly pipeline client.
//!
//! This crate contains:
//! - Domain types: entities owned by the remote execution service
//!   (History, Dataset, Job, ...), mirrored from its JSON API
//! - DTOs: request/response bodies exchanged with the service

pub mod domain;
pub mod dto;
