//! Cache-Control policies shared by handlers.

use actix_web::http::header::{CACHE_CONTROL, HeaderName};

/// Per-user payloads: never shared, always revalidated.
pub const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";

/// Session-dependent answers that must not be stored at all.
pub const NO_STORE: &str = "no-store";

pub fn private_no_cache() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, PRIVATE_NO_CACHE)
}

pub fn no_store() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, NO_STORE)
}
