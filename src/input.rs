use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::MealchatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as EditorConfig, Context, EditMode, Editor, Helper};

/// Line-editor helper: completes slash commands, hints from input history.
pub struct ChatHelper {
    command_registry: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self {
            command_registry,
            history_hinter: HistoryHinter {},
        }
    }
}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line.starts_with('/') {
            let command_part = &line[1..pos];

            let matches: Vec<Pair> = self
                .command_registry
                .get_command_names()
                .into_iter()
                .filter(|cmd| cmd.starts_with(command_part))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd,
                })
                .collect();

            return Ok((1, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {}

impl Validator for ChatHelper {}

impl Helper for ChatHelper {}

/// Creates a configured rustyline editor with history loaded from the config
/// directory.
pub fn create_editor(
    command_registry: CommandDispatcher,
) -> Result<Editor<ChatHelper, FileHistory>, MealchatError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| MealchatError::Input(format!("Failed to create line editor: {}", e)))?;

    let helper = ChatHelper::new(command_registry);
    editor.set_helper(Some(helper));

    let _ = editor.load_history(&Config::history_path());

    Ok(editor)
}

/// Reads a line of input; `None` means the user asked to leave (Ctrl+C/D).
pub fn read_input(
    editor: &mut Editor<ChatHelper, FileHistory>,
) -> Result<Option<String>, MealchatError> {
    let prompt = style("> ").bold().cyan().to_string();
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(&line) {
                    return Err(MealchatError::Input(format!(
                        "Failed to add history entry: {}",
                        e
                    )));
                }
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(MealchatError::Input(format!("Input error: {}", err))),
    }
}

/// Saves the editor history under the config directory.
pub fn save_history(editor: &mut Editor<ChatHelper, FileHistory>) -> Result<(), MealchatError> {
    let history_path = Config::history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MealchatError::Input(format!("Failed to create history directory: {}", e))
            })?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| MealchatError::Input(format!("Failed to save history: {}", e)))
}
