//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be tested with mocks and no I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AuthCommand, ChatCommand, DirectoryCommand, GateQuery, NoteSyncCommand, PreferencesCommand,
};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub gate: Arc<dyn GateQuery>,
    pub preferences: Arc<dyn PreferencesCommand>,
    pub directory: Arc<dyn DirectoryCommand>,
    pub chats: Arc<dyn ChatCommand>,
    pub notes: Arc<dyn NoteSyncCommand>,
    /// Judges session expiry.
    pub clock: Arc<dyn Clock>,
}
