//! Coffee chat tracker backend.
//!
//! Domain services sit behind ports in [`domain`]; HTTP handlers live in
//! [`inbound`] and Diesel/GoTrue adapters in [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
