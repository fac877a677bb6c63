pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::core::session::ChatSession;
pub use dispatcher::create_command_registry;

/// Mutable state slash commands operate on.
pub struct AppState {
    pub session: ChatSession,
    pub should_continue: bool,
}

impl AppState {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            should_continue: true,
        }
    }
}
