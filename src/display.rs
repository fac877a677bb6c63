use crate::core::log::{ChatMessage, LogEvent};
use console::{Term, style};
use is_terminal::IsTerminal;
use std::io::{self, Write};
use termimad::{FmtText, MadSkin};

/// Prints log entries as they land and can take the transient progress line
/// back off the screen when it is superseded.
pub struct Renderer {
    term: Term,
    skin: MadSkin,
    styled: bool,
    last: Option<(u64, usize)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            skin: MadSkin::default(),
            styled: io::stdout().is_terminal(),
            last: None,
        }
    }

    pub fn handle(&mut self, event: &LogEvent) {
        match event {
            LogEvent::Appended(message) => {
                let lines = if message.is_user {
                    self.render_user(message)
                } else {
                    self.render_system(message)
                };
                self.last = Some((message.id, lines));
            }
            LogEvent::Removed(message) => {
                if let Some((id, lines)) = self.last {
                    if id == message.id {
                        let _ = self.term.clear_last_lines(lines);
                        self.last = None;
                    }
                }
            }
        }
    }

    fn width(&self) -> usize {
        let terminal_width = self.term.size().1 as usize;
        terminal_width.clamp(40, 100)
    }

    fn render_user(&self, message: &ChatMessage) -> usize {
        let prefix = "you › ";
        let wrapped = wrap_text(&message.content, self.width().saturating_sub(prefix.len()));
        for (i, line) in wrapped.iter().enumerate() {
            if i == 0 {
                println!("{}{}", style(prefix).bold().green(), line);
            } else {
                println!("{}{}", " ".repeat(prefix.len()), line);
            }
        }
        wrapped.len()
    }

    fn render_system(&self, message: &ChatMessage) -> usize {
        if self.styled && looks_like_markdown(&message.content) {
            let text = FmtText::from(&self.skin, &message.content, Some(self.width()));
            let rendered = text.to_string();
            print!("{}", rendered);
            if !rendered.ends_with('\n') {
                println!();
            }
            return rendered.lines().count();
        }

        let wrapped = wrap_text(&message.content, self.width());
        for line in &wrapped {
            println!("{}", style(line).cyan());
        }
        wrapped.len()
    }
}

fn looks_like_markdown(content: &str) -> bool {
    content.contains("```")
        || content.contains('*')
        || content.contains('#')
        || content.contains("\n- ")
        || content.lines().any(|l| l.trim_start().starts_with(|c: char| c.is_ascii_digit()))
}

/// Greedy word wrap; lines without a usable space break at the width.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut remaining = raw_line.trim_end();
        if remaining.is_empty() {
            lines.push(String::new());
            continue;
        }

        while !remaining.is_empty() {
            if remaining.chars().count() <= max_width {
                lines.push(remaining.to_string());
                break;
            }

            let byte_limit = remaining
                .char_indices()
                .nth(max_width)
                .map(|(i, _)| i)
                .unwrap_or(remaining.len());

            match remaining[..byte_limit].rfind(' ') {
                Some(break_pos) if break_pos > 0 => {
                    lines.push(remaining[..break_pos].to_string());
                    remaining = remaining[break_pos + 1..].trim_start();
                }
                _ => {
                    lines.push(remaining[..byte_limit].to_string());
                    remaining = &remaining[byte_limit..];
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub fn display_banner() {
    if !io::stdout().is_terminal() {
        return;
    }
    println!(
        "{}",
        style("mealchat: meal ideas for your calorie target").bold().magenta()
    );
    println!(
        "{}",
        style("Type '/help' for commands. Press Ctrl+D or type /quit to exit.").dim()
    );
}

/// One-time outbound-call disclosure. Returns true when the user agrees.
pub fn prompt_disclosure() -> bool {
    println!();
    println!("{}", style(DISCLOSURE).yellow());
    print!(
        "{} ",
        style("Send your messages to the Gemini API? [y/N]").bold().cyan()
    );
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("y")
}

pub fn display_cancelled() {
    println!(
        "{}",
        style("Okay, nothing was sent. Your message was discarded.").dim()
    );
}

const DISCLOSURE: &str = "mealchat sends what you type to Google's generative language API to \
produce meal recommendations. Nothing leaves this machine until you agree, and your choice is \
remembered for future runs.";
