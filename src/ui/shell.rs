// UI shell - the narrow seam between the orchestrator and the visual layer.
//
// The orchestrator owns the thread, the gate and the message protocol; a
// shell owns what the user actually sees. Shells are constructed on the UI
// thread (widget toolkits require creation and interaction on one thread)
// and every call into them happens on that thread.

use crate::dialogs::{DialogSequence, DialogSet};
use crate::models::{MessageEnvelope, MessageKind, RunKind, UiResponse};
use crate::session::Session;
use camino::Utf8PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Everything a shell needs to present a run: the dialog flows, which flow
/// applies, the shared session for reading and writing properties, and the
/// resource path the engine extracted UI assets to.
#[derive(Clone)]
pub struct ShellContext {
    pub dialogs: Arc<DialogSet>,
    pub run_kind: RunKind,
    pub session: Arc<dyn Session>,
    pub resource_path: Utf8PathBuf,
    pub window_title: String,
}

impl ShellContext {
    /// The dialog flow selected for this run.
    pub fn sequence(&self) -> &DialogSequence {
        self.dialogs.sequence_for(self.run_kind)
    }
}

/// How the interactive sequence ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceVerdict {
    /// The user confirmed; the engine may start its transaction.
    Proceed,
    /// The user closed the UI without confirming.
    Cancelled,
}

/// Errors a shell can raise.
///
/// A shell error before the gate resolves degrades the run to "cancelled";
/// it never propagates to the engine thread.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("shell construction failed: {0}")]
    Construct(String),

    #[error("dialog {dialog} failed: {reason}")]
    Dialog { dialog: String, reason: String },
}

/// The visual layer of the embedded UI.
///
/// Implementations run entirely on the UI thread. `run_sequence` drives the
/// modal wizard to a verdict; after a `Proceed` verdict the shell goes
/// passive and only reacts to [`handle_message`](Self::handle_message) and
/// the two lifecycle notifications until the run completes.
///
/// Shells should treat an empty sequence as an immediate `Proceed` - an empty
/// flow means "no custom UI for this phase", not a cancellation.
pub trait UiShell {
    /// Present the dialog flow modally and return how it ended.
    fn run_sequence(
        &mut self,
        sequence: &DialogSequence,
        ctx: &ShellContext,
    ) -> Result<SequenceVerdict, ShellError>;

    /// Answer one engine message. Must not block on anything but the user.
    fn handle_message(&mut self, envelope: &MessageEnvelope) -> UiResponse;

    /// The engine's transaction has begun.
    fn execute_started(&mut self) {}

    /// The engine's transaction finished; the shell may show its finish page
    /// before the UI thread winds down.
    fn execute_complete(&mut self) {}
}

/// Constructor invoked on the UI thread to build the shell there.
pub type ShellFactory =
    Box<dyn FnOnce(&ShellContext) -> Result<Box<dyn UiShell>, ShellError> + Send + 'static>;

/// Observation point for what a [`ScriptedShell`] did, shared across threads.
///
/// The shell itself moves onto the UI thread; the probe stays with the test
/// or demo harness.
#[derive(Debug, Default)]
pub struct ShellProbe {
    shown_dialogs: Mutex<Vec<String>>,
    pub started: AtomicBool,
    pub completed: AtomicBool,
    pub messages_handled: AtomicUsize,
}

impl ShellProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shown_dialogs(&self) -> Vec<String> {
        self.shown_dialogs.lock().unwrap().clone()
    }

    pub fn execute_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn execute_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn messages_handled(&self) -> usize {
        self.messages_handled.load(Ordering::SeqCst)
    }
}

/// Headless shell with canned behavior.
///
/// Stands in for a toolkit shell in the demo harness and in tests: walks the
/// dialog flow (logging each dialog), returns a fixed verdict, and answers
/// messages with configurable responses. Real integrations implement
/// [`UiShell`] over an actual widget toolkit instead.
pub struct ScriptedShell {
    verdict: SequenceVerdict,
    error_response: UiResponse,
    probe: Option<Arc<ShellProbe>>,
}

impl ScriptedShell {
    /// A shell whose user clicks through every dialog and confirms.
    pub fn confirming() -> Self {
        Self {
            verdict: SequenceVerdict::Proceed,
            error_response: UiResponse::Ok,
            probe: None,
        }
    }

    /// A shell whose user closes the UI without confirming.
    pub fn cancelling() -> Self {
        Self {
            verdict: SequenceVerdict::Cancelled,
            error_response: UiResponse::Ok,
            probe: None,
        }
    }

    /// Canned answer for error prompts (default: Ok).
    pub fn with_error_response(mut self, response: UiResponse) -> Self {
        self.error_response = response;
        self
    }

    /// Attach an observation probe.
    pub fn with_probe(mut self, probe: Arc<ShellProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Wrap this shell into a factory for [`UiThreadHost::start`].
    ///
    /// [`UiThreadHost::start`]: crate::ui::UiThreadHost::start
    pub fn into_factory(self) -> ShellFactory {
        Box::new(move |_ctx| Ok(Box::new(self)))
    }
}

impl UiShell for ScriptedShell {
    fn run_sequence(
        &mut self,
        sequence: &DialogSequence,
        ctx: &ShellContext,
    ) -> Result<SequenceVerdict, ShellError> {
        for dialog in sequence.iter() {
            tracing::info!(dialog, title = %ctx.window_title, "presenting dialog");
            if let Some(probe) = &self.probe {
                probe.shown_dialogs.lock().unwrap().push(dialog.to_string());
            }
            // A cancelling user backs out at the first page.
            if self.verdict == SequenceVerdict::Cancelled {
                break;
            }
        }
        Ok(self.verdict)
    }

    fn handle_message(&mut self, envelope: &MessageEnvelope) -> UiResponse {
        if let Some(probe) = &self.probe {
            probe.messages_handled.fetch_add(1, Ordering::SeqCst);
        }
        tracing::debug!(kind = %envelope.kind, text = %envelope.record.text, "message handled");
        match envelope.kind {
            MessageKind::Error => self.error_response,
            MessageKind::Terminate => UiResponse::None,
            _ => UiResponse::Ok,
        }
    }

    fn execute_started(&mut self) {
        if let Some(probe) = &self.probe {
            probe.started.store(true, Ordering::SeqCst);
        }
    }

    fn execute_complete(&mut self) {
        if let Some(probe) = &self.probe {
            probe.completed.store(true, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PropertySession;

    fn test_context(dialogs: DialogSet) -> ShellContext {
        ShellContext {
            dialogs: Arc::new(dialogs),
            run_kind: RunKind::Install,
            session: Arc::new(PropertySession::new()),
            resource_path: Utf8PathBuf::from("resources"),
            window_title: "Test Setup".to_string(),
        }
    }

    #[test]
    fn test_confirming_shell_walks_whole_sequence() {
        let probe = ShellProbe::new();
        let mut shell = ScriptedShell::confirming().with_probe(probe.clone());

        let set = DialogSet {
            install: DialogSequence::from_ids(["WelcomeDlg", "ProgressDlg"]),
            repair: DialogSequence::default(),
        };
        let ctx = test_context(set.clone());

        let verdict = shell.run_sequence(&set.install, &ctx).unwrap();
        assert_eq!(verdict, SequenceVerdict::Proceed);
        assert_eq!(probe.shown_dialogs(), vec!["WelcomeDlg", "ProgressDlg"]);
    }

    #[test]
    fn test_cancelling_shell_backs_out_at_first_dialog() {
        let probe = ShellProbe::new();
        let mut shell = ScriptedShell::cancelling().with_probe(probe.clone());

        let set = DialogSet {
            install: DialogSequence::from_ids(["WelcomeDlg", "ProgressDlg"]),
            repair: DialogSequence::default(),
        };
        let ctx = test_context(set.clone());

        let verdict = shell.run_sequence(&set.install, &ctx).unwrap();
        assert_eq!(verdict, SequenceVerdict::Cancelled);
        assert_eq!(probe.shown_dialogs(), vec!["WelcomeDlg"]);
    }

    #[test]
    fn test_empty_sequence_proceeds() {
        let mut shell = ScriptedShell::confirming();
        let set = DialogSet::default();
        let ctx = test_context(set.clone());

        let verdict = shell.run_sequence(&set.install, &ctx).unwrap();
        assert_eq!(verdict, SequenceVerdict::Proceed);
    }

    #[test]
    fn test_message_responses() {
        let mut shell = ScriptedShell::confirming().with_error_response(UiResponse::Abort);

        assert_eq!(
            shell.handle_message(&MessageEnvelope::progress("copying")),
            UiResponse::Ok
        );
        assert_eq!(
            shell.handle_message(&MessageEnvelope::error("disk full")),
            UiResponse::Abort
        );
    }
}
