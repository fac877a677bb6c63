/// Outcome of one user submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// The topic slot was just filled; ask for the calorie target next.
    AskCalories(String),
    /// Both slots are filled; the composed prompt is ready to send.
    ComposePrompt(String),
}

/// Two-slot dialogue state: first the food preference, then the calorie
/// target. Invariant: `awaiting_calorie_input` implies a non-empty topic.
#[derive(Debug, Default)]
pub struct ConversationState {
    awaiting_calorie_input: bool,
    current_topic: String,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awaiting_calories(&self) -> bool {
        self.awaiting_calorie_input
    }

    pub fn topic(&self) -> &str {
        &self.current_topic
    }

    /// Advances the dialogue by one turn. Blank input returns `None` and
    /// leaves the state untouched. While the calorie slot is open, any text
    /// is taken as the calorie answer, never as a new topic.
    pub fn submit(&mut self, text: &str) -> Option<Turn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if !self.awaiting_calorie_input {
            self.current_topic = text.to_string();
            self.awaiting_calorie_input = true;
            return Some(Turn::AskCalories(self.current_topic.clone()));
        }

        self.awaiting_calorie_input = false;
        Some(Turn::ComposePrompt(compose_prompt(&self.current_topic, text)))
    }

    pub fn reset(&mut self) {
        self.awaiting_calorie_input = false;
        self.current_topic.clear();
    }
}

fn compose_prompt(topic: &str, calories: &str) -> String {
    RECOMMENDATION_PROMPT
        .replace("{topic}", topic)
        .replace("{calories}", calories)
}

const RECOMMENDATION_PROMPT: &str = "Suggest between 3 and 5 meal ideas for someone craving \
{topic}, each coming in at roughly {calories} calories. For every idea give a short heading, \
one line on why it fits the calorie goal, the ingredient list, and numbered preparation steps.";
