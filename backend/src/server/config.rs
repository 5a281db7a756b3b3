//! HTTP server configuration object.

use std::net::SocketAddr;

use recipe_backend::inbound::http::session_config::SessionSettings;
use recipe_backend::outbound::persistence::DbPool;

/// Everything `create_server` needs beyond the health state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
        }
    }

    /// Back the ports with PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
