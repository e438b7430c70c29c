//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **auth**: GoTrue-compatible identity service over HTTP
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **session**: in-process watch-channel session source
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod persistence;
pub mod session;
