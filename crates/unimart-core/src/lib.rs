//! Session store, safety advisor, and chat orchestration for Unimart.
//!
//! This crate defines the "ports" (classifier and generator traits) that
//! the infrastructure layer implements. It depends only on
//! `unimart-types` -- never on `unimart-infra` or any HTTP crate.

pub mod advisor;
pub mod assistant;
pub mod reply;
pub mod service;
pub mod store;
