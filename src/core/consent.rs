use crate::core::error::MealchatError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Small external key-value seam for the persisted acknowledgement flag.
pub trait ConsentStore {
    fn load(&self) -> bool;
    fn store(&mut self, acknowledged: bool) -> Result<(), MealchatError>;
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct ConsentRecord {
    acknowledged: bool,
}

/// File-backed store under the config directory; the file name is the stable
/// key across launches.
pub struct FileConsentStore {
    path: PathBuf,
}

impl FileConsentStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ConsentStore for FileConsentStore {
    fn load(&self) -> bool {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_yml::from_str::<ConsentRecord>(&contents).ok())
            .map(|record| record.acknowledged)
            .unwrap_or(false)
    }

    fn store(&mut self, acknowledged: bool) -> Result<(), MealchatError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_yml::to_string(&ConsentRecord { acknowledged })?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryConsentStore {
    acknowledged: bool,
}

#[cfg(test)]
impl ConsentStore for MemoryConsentStore {
    fn load(&self) -> bool {
        self.acknowledged
    }

    fn store(&mut self, acknowledged: bool) -> Result<(), MealchatError> {
        self.acknowledged = acknowledged;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendDecision {
    Proceed,
    NeedsConsent,
}

/// Blocks outbound sends until the one-time disclosure has been acknowledged.
/// While unacknowledged, the first submitted text is parked; later attempts
/// do not overwrite it.
pub struct ConsentGate {
    acknowledged: bool,
    pending: Option<String>,
    store: Box<dyn ConsentStore>,
}

impl ConsentGate {
    pub fn new(store: Box<dyn ConsentStore>) -> Self {
        let acknowledged = store.load();
        Self {
            acknowledged,
            pending: None,
            store,
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn request_send(&mut self, text: &str) -> SendDecision {
        if self.acknowledged {
            return SendDecision::Proceed;
        }
        // First pending text wins; a repeat request while waiting is a no-op
        if self.pending.is_none() {
            self.pending = Some(text.to_string());
        }
        SendDecision::NeedsConsent
    }

    /// Persists the acknowledgement. Does not dispatch anything; the caller
    /// follows up with `flush_pending` when it wants the parked text sent.
    pub fn grant_consent(&mut self) -> Result<(), MealchatError> {
        self.acknowledged = true;
        self.store.store(true)
    }

    pub fn flush_pending(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> ConsentGate {
        ConsentGate::new(Box::new(MemoryConsentStore::default()))
    }

    #[test]
    fn send_before_consent_is_parked() {
        let mut gate = gate();
        assert_eq!(gate.request_send("pasta"), SendDecision::NeedsConsent);
        assert!(gate.has_pending());
        assert!(!gate.is_acknowledged());
    }

    #[test]
    fn first_pending_text_wins() {
        let mut gate = gate();
        gate.request_send("pasta");
        assert_eq!(gate.request_send("sushi"), SendDecision::NeedsConsent);
        assert_eq!(gate.flush_pending().as_deref(), Some("pasta"));
    }

    #[test]
    fn flush_hands_back_the_text_exactly_once() {
        let mut gate = gate();
        gate.request_send("pasta");
        gate.grant_consent().unwrap();
        assert_eq!(gate.flush_pending().as_deref(), Some("pasta"));
        assert_eq!(gate.flush_pending(), None);
        assert!(!gate.has_pending());
    }

    #[test]
    fn cancel_clears_without_sending() {
        let mut gate = gate();
        gate.request_send("pasta");
        gate.cancel_pending();
        assert!(!gate.has_pending());
        assert_eq!(gate.flush_pending(), None);
    }

    #[test]
    fn acknowledged_gate_lets_sends_through() {
        let mut gate = gate();
        gate.grant_consent().unwrap();
        assert_eq!(gate.request_send("pasta"), SendDecision::Proceed);
        assert!(!gate.has_pending());
    }

    #[test]
    fn acknowledgement_survives_in_the_store() {
        let mut store = MemoryConsentStore::default();
        store.store(true).unwrap();
        let gate = ConsentGate::new(Box::new(store));
        assert!(gate.is_acknowledged());
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consent.yaml");

        let mut store = FileConsentStore::new(path.clone());
        assert!(!store.load());
        store.store(true).unwrap();
        assert!(store.load());

        // A fresh store over the same file sees the persisted flag
        assert!(FileConsentStore::new(path).load());
    }

    #[test]
    fn file_store_defaults_to_unacknowledged_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consent.yaml");
        std::fs::write(&path, "not: [valid").unwrap();
        assert!(!FileConsentStore::new(path).load());
    }
}
