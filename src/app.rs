use crate::cli::Args;
use crate::commands::{AppState, dispatcher::CommandDispatcher};
use crate::config::Config;
use crate::core::error::MealchatError;
use crate::core::session::{ChatSession, SubmitStatus};
use crate::display;
use crate::input;
use tokio::sync::watch;

pub struct Application {
    args: Args,
    #[allow(dead_code)]
    config: Config,
    command_dispatcher: CommandDispatcher,
    state: AppState,
    connectivity: watch::Receiver<bool>,
}

impl Application {
    pub fn new(
        args: Args,
        config: Config,
        session: ChatSession,
        command_dispatcher: CommandDispatcher,
        connectivity: watch::Receiver<bool>,
    ) -> Self {
        Self {
            args,
            config,
            command_dispatcher,
            state: AppState::new(session),
            connectivity,
        }
    }

    pub async fn run(&mut self) -> Result<(), MealchatError> {
        if self.args.yes && !self.state.session.consent_acknowledged() {
            self.state.session.grant_consent()?;
        }

        let topic = self.args.topic.clone();
        let calories = self.args.calories.clone();

        match (topic, calories) {
            (Some(topic), Some(calories)) => self.run_one_shot(&topic, &calories).await,
            (topic, _) => self.run_chat_loop(topic).await,
        }
    }

    /// Answers both questions from the command line, prints the result, and
    /// exits. Drives the same two-slot dialogue as the chat loop.
    async fn run_one_shot(&mut self, topic: &str, calories: &str) -> Result<(), MealchatError> {
        self.drain_connectivity();

        self.submit(topic).await?;
        if !self.state.session.consent_acknowledged() {
            // Disclosure declined; the calorie answer has nowhere to go
            return Ok(());
        }
        self.submit(calories).await?;
        Ok(())
    }

    async fn run_chat_loop(&mut self, initial_topic: Option<String>) -> Result<(), MealchatError> {
        display::display_banner();
        self.state.session.start();

        if let Some(topic) = initial_topic {
            self.drain_connectivity();
            self.submit(&topic).await?;
        }

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        loop {
            self.drain_connectivity();

            let input = match input::read_input(&mut editor)? {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(stripped) = input.strip_prefix('/') {
                let parts: Vec<&str> = stripped.split_whitespace().collect();
                if let Some((command, rest)) = parts.split_first() {
                    match self.command_dispatcher.execute(command, rest, &mut self.state) {
                        Ok(Some(output)) => println!("{}", output),
                        Ok(None) => {}
                        Err(e) => eprintln!("Error executing command: {}", e),
                    }

                    if !self.state.should_continue {
                        break;
                    }
                }
                continue;
            }

            self.submit(&input).await?;
        }

        input::save_history(&mut editor)?;

        Ok(())
    }

    /// Routes one user submission through the session; on a consent pause,
    /// surfaces the disclosure and either flushes or discards the parked text.
    async fn submit(&mut self, text: &str) -> Result<(), MealchatError> {
        match self.state.session.submit_text(text).await? {
            SubmitStatus::Handled => Ok(()),
            SubmitStatus::ConsentNeeded => {
                if display::prompt_disclosure() {
                    self.state.session.grant_consent()?;
                    self.state.session.flush_pending().await;
                } else {
                    self.state.session.cancel_pending();
                    display::display_cancelled();
                }
                Ok(())
            }
        }
    }

    /// Hands buffered monitor readings to the session on this thread; the
    /// probe task itself never touches shared state.
    fn drain_connectivity(&mut self) {
        while self.connectivity.has_changed().unwrap_or(false) {
            let connected = *self.connectivity.borrow_and_update();
            self.state.session.handle_connectivity(connected);
        }
    }
}
