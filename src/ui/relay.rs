// Message relay - synchronous engine-to-UI message handoff.
//
// Marshals one envelope at a time onto the UI thread and blocks the engine
// thread until the UI answers. Ordering is strict by construction: the
// engine never issues a second envelope before the first response arrives,
// so a capacity-1 channel plus a oneshot reply slot is the whole mechanism.

use crate::models::{MessageEnvelope, UiResponse};
use crate::ui::host::UiCommand;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum RelayError {
    /// Contract violation: relay invoked outside the Running state. Fails
    /// fast instead of hanging.
    #[error("message relay invoked before the embedded UI is running")]
    NotRunning,

    /// The UI thread already exited; no response can ever arrive.
    #[error("UI thread is no longer available")]
    UiGone,
}

/// Engine-side endpoint of the cross-thread handoff.
///
/// Exists only while the bridge is in its Running state; the bridge converts
/// every [`RelayError`] into the safe default response before the engine
/// sees it.
#[derive(Debug, Clone)]
pub struct MessageRelay {
    commands: mpsc::Sender<UiCommand>,
}

impl MessageRelay {
    pub(crate) fn new(commands: mpsc::Sender<UiCommand>) -> Self {
        Self { commands }
    }

    /// Marshal `envelope` onto the UI thread and block until it answers.
    ///
    /// Returns [`RelayError::UiGone`] instead of blocking forever when the
    /// UI thread is unavailable.
    pub fn relay(&self, envelope: MessageEnvelope) -> Result<UiResponse, RelayError> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.commands
            .blocking_send(UiCommand::Relay {
                envelope,
                reply: reply_tx,
            })
            .map_err(|_| RelayError::UiGone)?;

        reply_rx.blocking_recv().map_err(|_| RelayError::UiGone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_relay_returns_ui_gone_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let relay = MessageRelay::new(tx);
        let result = relay.relay(MessageEnvelope::progress("tick"));
        assert!(matches!(result, Err(RelayError::UiGone)));
    }

    #[test]
    fn test_relay_round_trip() {
        let (tx, mut rx) = mpsc::channel(1);
        let relay = MessageRelay::new(tx);

        // Stand-in for the UI thread's command loop.
        let responder = thread::spawn(move || {
            if let Some(UiCommand::Relay { reply, .. }) = rx.blocking_recv() {
                let _ = reply.send(UiResponse::Retry);
            }
        });

        let response = relay.relay(MessageEnvelope::error("source missing"));
        assert_eq!(response.unwrap(), UiResponse::Retry);
        responder.join().unwrap();
    }

    #[test]
    fn test_relay_returns_ui_gone_when_reply_dropped() {
        let (tx, mut rx) = mpsc::channel(1);
        let relay = MessageRelay::new(tx);

        // UI thread takes the command but dies before answering.
        let responder = thread::spawn(move || {
            if let Some(UiCommand::Relay { reply, .. }) = rx.blocking_recv() {
                drop(reply);
            }
        });

        let result = relay.relay(MessageEnvelope::progress("tick"));
        assert!(matches!(result, Err(RelayError::UiGone)));
        responder.join().unwrap();
    }
}
