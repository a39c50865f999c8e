//! Shared domain types for Unimart.
//!
//! This crate contains the core domain types used across the Unimart
//! chat layer: listings, chat sessions, messages, safety verdicts, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod listing;
pub mod safety;
