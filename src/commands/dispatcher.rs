use super::{
    AppState,
    handler::{ClearCommand, HelpCommand, ModelCommand, QuitCommand, StatusCommand},
    registry::CommandRegistry,
};
use crate::core::error::MealchatError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut AppState,
    ) -> Result<Option<String>, MealchatError> {
        self.registry.execute(command, args, state)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("clear", ClearCommand);
    registry.register("model", ModelCommand);
    registry.register("status", StatusCommand);

    CommandDispatcher::new(Arc::new(registry))
}
