//! Connectivity monitor
//!
//! Tracks the device's online/offline state and broadcasts transitions over a
//! watch channel. The platform's link signals feed `set_state`; the engine
//! reads the current state before each verification and the sync worker
//! awaits transitions to Online.
//!
//! The reported state is advisory: a link can report online while the network
//! is unusable (captive portals, dead uplinks). Downstream code treats every
//! remote call as fallible regardless of what the monitor says.

use std::sync::Arc;
use tokio::sync::watch;

/// Observed connectivity state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Online,
    Offline,
}

/// Shared connectivity state with transition notifications
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<ConnectivityState>>,
}

impl ConnectivityMonitor {
    pub fn new(initial: ConnectivityState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Current state
    pub fn state(&self) -> ConnectivityState {
        *self.tx.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.state() == ConnectivityState::Online
    }

    /// Record a state change; subscribers are only notified on actual
    /// transitions, repeated signals of the same state are absorbed
    pub fn set_state(&self, state: ConnectivityState) {
        self.tx.send_if_modified(|current| {
            if *current != state {
                tracing::info!(?state, "Connectivity changed");
                *current = state;
                true
            } else {
                false
            }
        });
    }

    pub fn set_online(&self) {
        self.set_state(ConnectivityState::Online);
    }

    pub fn set_offline(&self) {
        self.set_state(ConnectivityState::Offline);
    }

    /// Subscribe to transitions. Each `changed()` await on the receiver
    /// resolves once per transition.
    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        // Optimistic default: attempt the online path until told otherwise.
        Self::new(ConnectivityState::Online)
    }
}
