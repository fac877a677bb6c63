use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Lost,
    Restored,
}

/// Collapses raw reachability readings into transitions. Duplicate readings
/// of the same state produce nothing; "restored" is only reported after a
/// known disconnected state.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<bool>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, connected: bool) -> Option<Transition> {
        let transition = match (self.last, connected) {
            (Some(true), false) | (None, false) => Some(Transition::Lost),
            (Some(false), true) => Some(Transition::Restored),
            _ => None,
        };
        self.last = Some(connected);
        transition
    }
}

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Background reachability probe. Publishes the current reading on a watch
/// channel and only signals on change; the app loop drains the channel so all
/// state mutation stays on the single control context.
pub struct ConnectivityMonitor;

impl ConnectivityMonitor {
    pub fn spawn(probe_url: String, interval: Duration) -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(true);

        tokio::spawn(async move {
            let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
                Ok(client) => client,
                Err(err) => {
                    tracing::warn!(%err, "connectivity probe disabled");
                    return;
                }
            };

            loop {
                // Any HTTP response counts as reachable; only transport
                // failures mean the network is gone.
                let connected = client.get(&probe_url).send().await.is_ok();

                let changed = tx.send_if_modified(|current| {
                    if *current != connected {
                        *current = connected;
                        true
                    } else {
                        false
                    }
                });
                if changed {
                    tracing::debug!(connected, "connectivity changed");
                }

                if tx.is_closed() {
                    break;
                }
                tokio::time::sleep(interval).await;
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_readings_are_silent() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.observe(true), None);
        assert_eq!(tracker.observe(true), None);
        assert_eq!(tracker.observe(true), None);
    }

    #[test]
    fn rapid_flip_produces_exactly_two_transitions() {
        let mut tracker = StatusTracker::new();
        tracker.observe(true);

        let mut transitions = Vec::new();
        for reading in [true, false, false, false, true, true] {
            if let Some(t) = tracker.observe(reading) {
                transitions.push(t);
            }
        }
        assert_eq!(transitions, vec![Transition::Lost, Transition::Restored]);
    }

    #[test]
    fn restored_requires_a_known_disconnected_state() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.observe(true), None);
    }

    #[test]
    fn initial_disconnected_reading_reports_lost() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.observe(false), Some(Transition::Lost));
        assert_eq!(tracker.observe(true), Some(Transition::Restored));
    }
}
