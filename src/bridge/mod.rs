// Engine bridge - adapter between the installer engine's fixed three-call
// embedded-UI contract and the multi-threaded UI.
//
// The engine calls initialize / process_message / shutdown on its own
// thread; the bridge owns the gate, starts the UI thread host, and turns the
// gate race into the engine's proceed-or-abort decision. Every failure path
// resolves to "proceed" or "cancel", never to an unresolved wait.

use crate::dialogs::DialogSet;
use crate::gate::{GateOutcome, StartGate};
use crate::metrics::Metrics;
use crate::models::{
    ButtonSet, DefaultButton, IconHint, MessageEnvelope, MessageKind, MessageRecord, RunKind,
    RunMode, UiLevel, UiResponse,
};
use crate::session::Session;
use crate::ui::host::{HostError, UiThreadHost};
use crate::ui::relay::{MessageRelay, RelayError};
use crate::ui::shell::{ShellContext, ShellFactory};
use camino::Utf8Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// The engine's own default window, toggled while the custom UI is active.
///
/// The engine keeps a basic window of its own; the orchestrator hides it for
/// the lifetime of the custom UI and restores it on the way out (including
/// the cancel path).
pub trait EngineWindow: Send {
    fn show(&self);
    fn hide(&self);
}

/// No-op window for engines (and tests) without a native window to toggle.
#[derive(Debug, Default)]
pub struct NoEngineWindow;

impl EngineWindow for NoEngineWindow {
    fn show(&self) {}
    fn hide(&self) {}
}

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The user closed the UI before confirming. The engine must treat the
    /// whole operation as not started.
    #[error("user cancelled before the install transaction started")]
    Cancelled,

    /// `initialize` was called twice for one run.
    #[error("embedded UI was already initialized for this run")]
    AlreadyInitialized,

    /// The UI thread could not be brought up at all.
    #[error("UI thread host failed to start: {0}")]
    Host(#[from] HostError),
}

/// Lifecycle of one run, engine-thread side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    Starting,
    Running,
    Cancelled,
    Stopped,
}

/// The fixed three-call contract the installer engine drives.
///
/// Exactly the operations the engine knows about; there is no deeper
/// hierarchy behind this trait.
pub trait EmbeddedUi {
    /// Returns `Ok(false)` to defer to the engine's built-in UI, `Ok(true)`
    /// (with `ui_level` rewritten to source-resolution-only) to take over,
    /// or [`BridgeError::Cancelled`] when the user closed the UI before
    /// confirming.
    fn initialize(
        &mut self,
        session: Arc<dyn Session>,
        resource_path: &Utf8Path,
        ui_level: &mut UiLevel,
    ) -> Result<bool, BridgeError>;

    /// Relay one engine message to the UI and return its response. Blocks
    /// the engine thread until the UI answers.
    fn process_message(
        &mut self,
        kind: MessageKind,
        record: MessageRecord,
        buttons: ButtonSet,
        icon: IconHint,
        default_button: DefaultButton,
    ) -> UiResponse;

    /// Tear the UI down; returns only after the UI thread has fully exited.
    fn shutdown(&mut self);
}

/// Construction-time configuration for the bridge.
///
/// Passed explicitly instead of living in a process-wide singleton; one
/// bridge serves one run.
pub struct BridgeConfig {
    pub shell_factory: ShellFactory,
    pub engine_window: Box<dyn EngineWindow>,
    pub window_title: String,
    /// Leave the engine's own window visible while the custom UI runs.
    pub keep_engine_window: bool,
}

impl BridgeConfig {
    pub fn new(shell_factory: ShellFactory) -> Self {
        Self {
            shell_factory,
            engine_window: Box::new(NoEngineWindow),
            window_title: "Setup".to_string(),
            keep_engine_window: false,
        }
    }

    pub fn with_engine_window(mut self, window: Box<dyn EngineWindow>) -> Self {
        self.engine_window = window;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_keep_engine_window(mut self, keep: bool) -> Self {
        self.keep_engine_window = keep;
        self
    }
}

/// Implementation of the embedded-UI contract.
///
/// State machine: `Idle -> Starting -> Running -> Stopped`, with `Cancelled`
/// terminal when the gate resolves to exit. `Idle -> Stopped` directly when
/// the run mode defers to the built-in UI.
pub struct EngineBridge {
    state: BridgeState,
    gate: StartGate,
    shell_factory: Option<ShellFactory>,
    engine_window: Box<dyn EngineWindow>,
    window_title: String,
    keep_engine_window: bool,
    host: Option<UiThreadHost>,
    relay: Option<MessageRelay>,
    ui_exited: Option<Arc<AtomicBool>>,
    metrics: Arc<Metrics>,
}

impl EngineBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            state: BridgeState::Idle,
            gate: StartGate::new(),
            shell_factory: Some(config.shell_factory),
            engine_window: config.engine_window,
            window_title: config.window_title,
            keep_engine_window: config.keep_engine_window,
            host: None,
            relay: None,
            ui_exited: None,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Whether the UI thread of this run has fully exited. `None` before a
    /// UI thread was ever started.
    pub fn ui_thread_exited(&self) -> Option<bool> {
        self.ui_exited
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
    }

    /// Relay an envelope, enforcing the Running-state contract.
    ///
    /// Fails fast with [`RelayError::NotRunning`] outside Running - a
    /// contract violation must never turn into a hang.
    pub fn try_relay(&self, envelope: MessageEnvelope) -> Result<UiResponse, RelayError> {
        let relay = match (&self.state, &self.relay) {
            (BridgeState::Running, Some(relay)) => relay,
            _ => return Err(RelayError::NotRunning),
        };

        self.metrics.record_message_relayed();
        relay.relay(envelope)
    }

    fn hide_engine_window(&self) {
        if !self.keep_engine_window {
            self.engine_window.hide();
        }
    }

    fn show_engine_window(&self) {
        if !self.keep_engine_window {
            self.engine_window.show();
        }
    }
}

impl EmbeddedUi for EngineBridge {
    fn initialize(
        &mut self,
        session: Arc<dyn Session>,
        resource_path: &Utf8Path,
        ui_level: &mut UiLevel,
    ) -> Result<bool, BridgeError> {
        if self.state != BridgeState::Idle {
            return Err(BridgeError::AlreadyInitialized);
        }
        let Some(factory) = self.shell_factory.take() else {
            return Err(BridgeError::AlreadyInitialized);
        };

        let mode = RunMode::resolve(session.as_ref(), *ui_level);
        if mode != RunMode::FullCustomUi {
            tracing::info!(?mode, "deferring to the engine's built-in UI");
            self.state = BridgeState::Stopped;
            return Ok(false);
        }

        self.state = BridgeState::Starting;
        let run_kind = RunKind::resolve(session.as_ref());
        let dialogs = Arc::new(DialogSet::from_session(session.as_ref()));
        tracing::info!(
            ?run_kind,
            dialogs = dialogs.sequence_for(run_kind).len(),
            "starting embedded UI"
        );

        let ctx = ShellContext {
            dialogs,
            run_kind,
            session,
            resource_path: resource_path.to_path_buf(),
            window_title: self.window_title.clone(),
        };

        self.hide_engine_window();

        let host = match UiThreadHost::start(factory, ctx, self.gate.signaller()) {
            Ok(host) => host,
            Err(error) => {
                tracing::error!(%error, "UI thread host failed to start");
                self.show_engine_window();
                self.state = BridgeState::Cancelled;
                return Err(BridgeError::Host(error));
            }
        };
        self.ui_exited = Some(host.exited_flag());

        match self.gate.wait() {
            GateOutcome::Cancelled => {
                host.join();
                self.show_engine_window();
                self.state = BridgeState::Cancelled;
                self.metrics.record_run_cancelled();
                tracing::info!("embedded UI cancelled before the transaction started");
                Err(BridgeError::Cancelled)
            }
            GateOutcome::Proceed => {
                self.relay = Some(MessageRelay::new(host.shell_handle().commands()));
                host.notify_execute_started();
                self.metrics.record_ui_notification();
                self.host = Some(host);
                *ui_level = UiLevel::SourceResolutionOnly;
                self.state = BridgeState::Running;
                self.metrics.record_run_confirmed();
                tracing::info!("embedded UI confirmed; engine switched to source-resolution-only");
                Ok(true)
            }
        }
    }

    fn process_message(
        &mut self,
        kind: MessageKind,
        record: MessageRecord,
        buttons: ButtonSet,
        icon: IconHint,
        default_button: DefaultButton,
    ) -> UiResponse {
        let envelope = MessageEnvelope::new(kind, record, buttons, icon, default_button);
        match self.try_relay(envelope) {
            Ok(response) => response,
            Err(error) => {
                // A fault here must not propagate: an unanswered engine
                // thread deadlocks the whole transaction.
                tracing::warn!(%error, kind = %kind, "relay fault answered with safe default");
                self.metrics.record_relay_default();
                UiResponse::safe_default()
            }
        }
    }

    fn shutdown(&mut self) {
        match self.state {
            BridgeState::Running => {
                self.relay = None;
                if let Some(host) = self.host.take() {
                    self.metrics.record_ui_notification();
                    host.shutdown();
                }
                self.show_engine_window();
                self.state = BridgeState::Stopped;
                self.metrics.record_run_completed();
                tracing::info!("embedded UI shut down; UI thread exited");
            }
            state => {
                tracing::debug!(?state, "shutdown outside Running is a no-op");
            }
        }
    }
}
