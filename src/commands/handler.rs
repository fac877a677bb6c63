use super::AppState;
use crate::core::error::MealchatError;

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut AppState, args: &[&str]) -> Result<Option<String>, MealchatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct ModelCommand;
pub struct StatusCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut AppState, _args: &[&str]) -> Result<Option<String>, MealchatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit mealchat"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut AppState,
        _args: &[&str],
    ) -> Result<Option<String>, MealchatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            style(QuitCommand.help()).to_string(),
            style(HelpCommand.help()).to_string(),
            style(ClearCommand.help()).to_string(),
            style(ModelCommand.help()).to_string(),
            style(StatusCommand.help()).to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut AppState, _args: &[&str]) -> Result<Option<String>, MealchatError> {
        state.session.reset();
        state.session.start();
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/clear - Start the conversation over"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut AppState, args: &[&str]) -> Result<Option<String>, MealchatError> {
        if args.is_empty() {
            Ok(Some(format!("Current model: {}", state.session.model())))
        } else {
            state.session.set_model(args[0]);
            Ok(Some(format!("Model changed to: {}", state.session.model())))
        }
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the current model"
    }
}

impl CommandHandler for StatusCommand {
    fn execute(&self, state: &mut AppState, _args: &[&str]) -> Result<Option<String>, MealchatError> {
        let network = if state.session.connected() {
            "connected"
        } else {
            "offline"
        };
        let disclosure = if state.session.consent_acknowledged() {
            "acknowledged"
        } else {
            "not yet acknowledged"
        };
        Ok(Some(format!(
            "Model: {}\nNetwork: {}\nDisclosure: {}",
            state.session.model(),
            network,
            disclosure
        )))
    }

    fn help(&self) -> &'static str {
        "/status - Show model, network, and disclosure state"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::consent::{ConsentGate, MemoryConsentStore};
    use crate::core::session::ChatSession;
    use crate::providers::{FetchError, ModelReply, RecommendationProvider};
    use async_trait::async_trait;

    struct NoopProvider;

    #[async_trait]
    impl RecommendationProvider for NoopProvider {
        async fn fetch(&self, _prompt: &str) -> Result<ModelReply, FetchError> {
            Ok(ModelReply::Empty(String::new()))
        }

        fn model(&self) -> &str {
            "gemini-2.0-flash"
        }

        fn set_model(&mut self, _model: &str) {}
    }

    fn app_state() -> AppState {
        let gate = ConsentGate::new(Box::new(MemoryConsentStore::default()));
        AppState::new(ChatSession::new(Box::new(NoopProvider), gate))
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut state = app_state();
        QuitCommand.execute(&mut state, &[]).unwrap();
        assert!(!state.should_continue);
    }

    #[test]
    fn clear_restarts_with_the_greeting() {
        let mut state = app_state();
        ClearCommand.execute(&mut state, &[]).unwrap();
        assert_eq!(state.session.log().len(), 1);
        assert!(!state.session.log().last().unwrap().is_user);
    }

    #[test]
    fn status_reports_the_model() {
        let mut state = app_state();
        let output = StatusCommand.execute(&mut state, &[]).unwrap().unwrap();
        assert!(output.contains("gemini-2.0-flash"));
        assert!(output.contains("connected"));
        assert!(output.contains("not yet acknowledged"));
    }
}
