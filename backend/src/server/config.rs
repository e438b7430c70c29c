//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use coffee_chat::inbound::http::session_config::SessionSettings;
use coffee_chat::outbound::auth::GoTrueAuthProvider;
use coffee_chat::outbound::persistence::DbPool;

/// Everything `create_server` needs: cookie policy, listener and adapters.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) auth_provider: GoTrueAuthProvider,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        db_pool: DbPool,
        auth_provider: GoTrueAuthProvider,
    ) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            auth_provider,
        }
    }
}
