//! Message router: decoded wire messages → state machine → observers.
//!
//! Dispatch is synchronous and single-threaded from the caller's
//! perspective. The router is driven by whichever task owns the
//! client's consumer side; observers run inline, in arrival order.

use lexgrid_protocol::{Message, ServerEvent};
use lexgrid_session::{Session, SessionStateMachine};

/// Receives every applied server event together with the updated
/// session snapshot.
///
/// Observers are the seam where a UI hangs off this engine: a renderer
/// subscribes and redraws rosters, grids, and leaderboards from the
/// snapshot. Observers must not block — they run on the consumer task.
pub trait SessionObserver: Send {
    /// Called after each successful state mutation.
    fn on_event(&mut self, event: &ServerEvent, session: &Session);
}

/// Dispatches inbound messages by kind.
#[derive(Default)]
pub struct MessageRouter {
    pub(crate) machine: SessionStateMachine,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl MessageRouter {
    /// Creates a router with a fresh, disconnected state machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router around an existing machine.
    pub fn with_machine(machine: SessionStateMachine) -> Self {
        Self {
            machine,
            observers: Vec::new(),
        }
    }

    /// Registers an observer. Observers are notified in registration
    /// order.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Read access to the session snapshot.
    pub fn session(&self) -> &Session {
        self.machine.session()
    }

    /// Routes one inbound message.
    ///
    /// Returns the applied event, or `None` when the message was
    /// dropped: unknown kinds (forward compatibility), undecodable
    /// payloads, and events not applicable to the current state are
    /// all logged and swallowed rather than crashing the session.
    pub fn dispatch(&mut self, message: &Message) -> Option<ServerEvent> {
        let event = match ServerEvent::from_message(message) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(kind = %message.kind, error = %e, "dropping undecodable message");
                return None;
            }
        };

        if let ServerEvent::Unknown { kind } = &event {
            tracing::debug!(%kind, "ignoring unknown message kind");
            return None;
        }

        match self.machine.apply(&event) {
            Ok(()) => {
                let session = self.machine.session();
                for observer in &mut self.observers {
                    observer.on_event(&event, session);
                }
                Some(event)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping message not applicable to current state");
                None
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
