//! Hosted identity service adapter.
//!
//! Implements the `AuthProvider` port over HTTP.

mod dto;
mod gotrue_client;

pub use gotrue_client::GoTrueAuthProvider;
