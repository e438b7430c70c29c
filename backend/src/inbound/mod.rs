//! Inbound adapters translating external requests into domain port calls.
//!
//! Only HTTP exists today; handlers depend on driving ports through
//! [`http::state::HttpState`] and never touch persistence directly.

pub mod http;
