use crate::core::connectivity::{StatusTracker, Transition};
use crate::core::consent::{ConsentGate, SendDecision};
use crate::core::conversation::{ConversationState, Turn};
use crate::core::error::MealchatError;
use crate::core::log::MessageLog;
use crate::providers::{FetchError, ModelReply, RecommendationProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Handled,
    /// The disclosure has not been acknowledged yet; the text is parked and
    /// the caller must surface the consent prompt.
    ConsentNeeded,
}

/// The single owner of all conversation state. Every mutation (user input,
/// consent decisions, connectivity readings, fetch completions) goes through
/// methods on this one object, so no locking is needed anywhere.
pub struct ChatSession {
    conversation: ConversationState,
    consent: ConsentGate,
    tracker: StatusTracker,
    connected: bool,
    log: MessageLog,
    provider: Box<dyn RecommendationProvider>,
}

impl ChatSession {
    pub fn new(provider: Box<dyn RecommendationProvider>, consent: ConsentGate) -> Self {
        Self {
            conversation: ConversationState::new(),
            consent,
            tracker: StatusTracker::new(),
            connected: true,
            log: MessageLog::new(),
            provider,
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut MessageLog {
        &mut self.log
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn consent_acknowledged(&self) -> bool {
        self.consent.is_acknowledged()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn set_model(&mut self, model: &str) {
        self.provider.set_model(model);
    }

    /// Opens the conversation with the topic question.
    pub fn start(&mut self) {
        self.log.append(GREETING, false);
    }

    /// Clears the transcript and returns the dialogue to the topic slot.
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.log.clear();
    }

    /// Marshaled entry point for connectivity readings.
    pub fn handle_connectivity(&mut self, connected: bool) {
        self.connected = connected;
        match self.tracker.observe(connected) {
            Some(Transition::Lost) => {
                self.log.append(OFFLINE_NOTICE, false);
            }
            Some(Transition::Restored) => {
                self.log.append(RESTORED_NOTICE, false);
            }
            None => {}
        }
    }

    /// Routes one line of user input: consent gate first, then the two-slot
    /// state machine, with the network call only on the second slot. Blank
    /// input is ignored entirely.
    pub async fn submit_text(&mut self, text: &str) -> Result<SubmitStatus, MealchatError> {
        if text.trim().is_empty() {
            return Ok(SubmitStatus::Handled);
        }

        match self.consent.request_send(text) {
            SendDecision::NeedsConsent => Ok(SubmitStatus::ConsentNeeded),
            SendDecision::Proceed => {
                self.dispatch(text).await;
                Ok(SubmitStatus::Handled)
            }
        }
    }

    pub fn grant_consent(&mut self) -> Result<(), MealchatError> {
        self.consent.grant_consent()
    }

    /// Sends the text parked by an earlier `submit_text`, if any is still
    /// waiting. Dispatch stays separate from `grant_consent` so declining or
    /// granting and sending remain distinct steps.
    pub async fn flush_pending(&mut self) {
        if let Some(text) = self.consent.flush_pending() {
            self.dispatch(&text).await;
        }
    }

    pub fn cancel_pending(&mut self) {
        self.consent.cancel_pending();
    }

    async fn dispatch(&mut self, text: &str) {
        let Some(turn) = self.conversation.submit(text) else {
            return;
        };

        self.log.append(text.trim(), true);

        match turn {
            Turn::AskCalories(topic) => {
                self.log
                    .append(CALORIE_QUESTION.replace("{topic}", &topic), false);
            }
            Turn::ComposePrompt(prompt) => {
                self.fetch_and_log(&prompt).await;
            }
        }
    }

    async fn fetch_and_log(&mut self, prompt: &str) {
        if !self.connected {
            self.log.append(OFFLINE_NOTICE, false);
            return;
        }

        tracing::debug!(model = %self.provider.model(), "dispatching recommendation request");

        let placeholder_added = self.log.append(PROGRESS_NOTICE, false);
        let outcome = self.provider.fetch(prompt).await;
        // The placeholder goes away on every terminal outcome, success or not
        if placeholder_added {
            self.log.remove_last();
        }

        self.log.append(outcome_message(outcome), false);
    }
}

fn outcome_message(outcome: Result<ModelReply, FetchError>) -> String {
    match outcome {
        Ok(ModelReply::Recommendation(text)) => text,
        Ok(ModelReply::Blocked(reason)) => format!(
            "The service declined this request ({}). Try rephrasing it.",
            reason
        ),
        Ok(ModelReply::Truncated) => {
            "The answer hit the length limit before any text arrived. Please try again.".to_string()
        }
        Ok(ModelReply::SafetyBlocked) => {
            "The safety filter held back this answer. Try a different topic or wording.".to_string()
        }
        Ok(ModelReply::Empty(reason)) if reason.is_empty() => {
            "The model returned an empty answer. Please try again.".to_string()
        }
        Ok(ModelReply::Empty(reason)) => format!(
            "The model returned no text (finish reason: {}). Please try again.",
            reason
        ),
        Err(FetchError::Offline) => OFFLINE_NOTICE.to_string(),
        Err(FetchError::Timeout) => {
            "The request timed out. Please try again.".to_string()
        }
        Err(FetchError::Network(detail)) => {
            format!("A network problem interrupted the request: {}", detail)
        }
        Err(FetchError::Api { code, message }) => {
            format!("The service reported error {}: {}", code, message)
        }
        Err(FetchError::Decode(detail)) => {
            format!("The reply could not be understood: {}", detail)
        }
    }
}

const GREETING: &str = "Hi! What kind of food are you in the mood for today?";
const CALORIE_QUESTION: &str =
    "{topic} sounds good! Roughly how many calories are you aiming for?";
const PROGRESS_NOTICE: &str = "Looking for meal ideas…";
const OFFLINE_NOTICE: &str = "You appear to be offline. Check your connection and try again.";
const RESTORED_NOTICE: &str = "Connection restored. You're back online.";
