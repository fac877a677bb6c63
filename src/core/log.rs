use chrono::{DateTime, Local};

/// One displayed chat entry. Immutable once appended; only the transient
/// "in progress" placeholder is ever removed again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone)]
pub enum LogEvent {
    Appended(ChatMessage),
    Removed(ChatMessage),
}

/// Append-only transcript. Ids come from a counter owned by the log, so they
/// are unique for the lifetime of a session.
#[derive(Default)]
pub struct MessageLog {
    entries: Vec<ChatMessage>,
    next_id: u64,
    listeners: Vec<Box<dyn FnMut(&LogEvent)>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a change listener, replacing framework-level reactive
    /// bindings with an explicit subscription.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&LogEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Appends an entry and reports whether it was kept. A system entry whose
    /// content equals the current last entry's content is suppressed when that
    /// last entry is also system-authored; user entries always land.
    pub fn append(&mut self, content: impl Into<String>, is_user: bool) -> bool {
        let content = content.into();

        if !is_user {
            if let Some(last) = self.entries.last() {
                if !last.is_user && last.content == content {
                    return false;
                }
            }
        }

        let message = ChatMessage {
            id: self.next_id,
            content,
            is_user,
            timestamp: Local::now(),
        };
        self.next_id += 1;
        self.entries.push(message.clone());
        self.notify(LogEvent::Appended(message));
        true
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.entries.last()
    }

    pub fn remove_last(&mut self) -> Option<ChatMessage> {
        let removed = self.entries.pop();
        if let Some(message) = &removed {
            self.notify(LogEvent::Removed(message.clone()));
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn notify(&mut self, event: LogEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn consecutive_identical_system_notices_collapse() {
        let mut log = MessageLog::new();
        assert!(log.append("You appear to be offline.", false));
        assert!(!log.append("You appear to be offline.", false));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn identical_user_entries_are_never_collapsed() {
        let mut log = MessageLog::new();
        assert!(log.append("pasta", true));
        assert!(log.append("pasta", true));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn system_notice_after_user_entry_is_kept() {
        let mut log = MessageLog::new();
        log.append("notice", false);
        log.append("notice", true);
        assert!(log.append("notice", false));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut log = MessageLog::new();
        log.append("a", true);
        log.append("b", true);
        let ids: Vec<u64> = log.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn remove_last_pops_the_placeholder() {
        let mut log = MessageLog::new();
        log.append("question", false);
        log.append("thinking", false);
        let removed = log.remove_last().unwrap();
        assert_eq!(removed.content, "thinking");
        assert_eq!(log.last().unwrap().content, "question");
        assert!(log.remove_last().is_some());
        assert!(log.remove_last().is_none());
    }

    #[test]
    fn listeners_observe_appends_and_removals() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut log = MessageLog::new();
        log.subscribe(move |event| {
            let tag = match event {
                LogEvent::Appended(m) => format!("+{}", m.content),
                LogEvent::Removed(m) => format!("-{}", m.content),
            };
            sink.borrow_mut().push(tag);
        });

        log.append("hello", true);
        log.append("working", false);
        log.remove_last();

        assert_eq!(*seen.borrow(), vec!["+hello", "+working", "-working"]);
    }

    #[test]
    fn suppressed_append_does_not_notify() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);

        let mut log = MessageLog::new();
        log.subscribe(move |_| *sink.borrow_mut() += 1);

        log.append("offline", false);
        log.append("offline", false);
        assert_eq!(*count.borrow(), 1);
    }
}
