// UI thread host - owns the one dedicated UI thread of a run.
//
// The thread is spawned at start, runs the modal dialog sequence to a
// verdict, signals the gate, then parks in a passive command loop until the
// engine reports completion. It is joined exactly once. The shell is
// constructed on this thread and never touched from any other; the affinity
// assertion makes that explicit instead of relying on incidental ordering.

use crate::gate::{GateGuard, GateSignaller};
use crate::models::{MessageEnvelope, UiResponse};
use crate::ui::shell::{SequenceVerdict, ShellContext, ShellFactory};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle, ThreadId};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Commands hopped from the engine thread onto the UI thread.
///
/// Capacity-1 channel: the engine blocks per message (single-slot handoff),
/// so one slot is all the protocol ever needs.
pub enum UiCommand {
    /// Relay one engine message and answer through the reply slot.
    Relay {
        envelope: MessageEnvelope,
        reply: oneshot::Sender<UiResponse>,
    },
    /// The engine's transaction has begun.
    ExecuteStarted,
    /// The engine's transaction finished; show the finish page and wind down.
    ExecuteComplete,
}

/// Single-thread affinity token.
///
/// Captured on the owning thread; `assert_owner` fails loudly if a shell
/// operation ever migrates off it.
#[derive(Debug, Clone)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl ThreadAffinity {
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    pub fn assert_owner(&self) {
        assert_eq!(
            thread::current().id(),
            self.owner,
            "UI shell operation attempted off its owning thread"
        );
    }
}

/// Handle to the live UI thread, constructed on that thread and published
/// exactly once through a synchronizing channel (the channel's happens-before
/// edge is what lets the engine thread observe it fully built).
#[derive(Debug, Clone)]
pub struct ShellHandle {
    commands: mpsc::Sender<UiCommand>,
    affinity: ThreadAffinity,
}

impl ShellHandle {
    /// Sender for hopping commands onto the UI thread.
    pub fn commands(&self) -> mpsc::Sender<UiCommand> {
        self.commands.clone()
    }

    /// Identity of the thread the shell lives on.
    pub fn ui_thread(&self) -> ThreadId {
        self.affinity.owner()
    }
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("failed to spawn UI thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("UI thread exited before publishing its shell handle")]
    HandleUnpublished,
}

/// Owner of the dedicated UI thread.
///
/// Exactly one is created per run; `shutdown` (or `join`, on the cancel
/// path) joins the thread exactly once. The `exited` flag is flipped as the
/// very last statement of the thread body, so observing it `true` after a
/// join means no UI resources are still live.
pub struct UiThreadHost {
    handle: ShellHandle,
    join: Option<JoinHandle<()>>,
    exited: Arc<AtomicBool>,
}

impl UiThreadHost {
    /// Spawn the UI thread and block until it publishes its shell handle.
    ///
    /// The shell itself is constructed on the new thread; any construction
    /// failure resolves the gate to exit through the thread's drop guard, so
    /// a waiting engine thread is never stranded.
    pub fn start(
        factory: ShellFactory,
        ctx: ShellContext,
        signals: GateSignaller,
    ) -> Result<Self, HostError> {
        let (handle_tx, handle_rx) = oneshot::channel();
        let exited = Arc::new(AtomicBool::new(false));
        let exited_flag = Arc::clone(&exited);

        let join = thread::Builder::new()
            .name("embedui-ui".to_string())
            .spawn(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    ui_thread_main(factory, ctx, signals, handle_tx);
                }));
                if outcome.is_err() {
                    // The panic already resolved the gate via the drop guard;
                    // the fault is swallowed here so the run degrades to
                    // "cancelled" instead of tearing down the process.
                    tracing::error!("UI thread panicked; run degrades to cancelled");
                }
                exited_flag.store(true, Ordering::SeqCst);
            })?;

        match handle_rx.blocking_recv() {
            Ok(handle) => {
                tracing::debug!(ui_thread = ?handle.ui_thread(), "UI thread started");
                Ok(Self {
                    handle,
                    join: Some(join),
                    exited,
                })
            }
            Err(_) => {
                // The thread died before publishing; reap it and report.
                if join.join().is_err() {
                    tracing::error!("UI thread panicked before publishing its handle");
                }
                Err(HostError::HandleUnpublished)
            }
        }
    }

    /// Handle published by the UI thread.
    pub fn shell_handle(&self) -> &ShellHandle {
        &self.handle
    }

    /// Flag flipped as the very last statement of the UI thread body.
    pub fn exited_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.exited)
    }

    /// Whether the UI thread has fully exited.
    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    /// Notify the shell that the engine's transaction has begun.
    ///
    /// Delivered as a thread hop; never executed inline on the caller's
    /// thread.
    pub fn notify_execute_started(&self) {
        if self
            .handle
            .commands
            .blocking_send(UiCommand::ExecuteStarted)
            .is_err()
        {
            tracing::warn!("UI thread gone before execute-started notification");
        }
    }

    /// Notify the shell that the engine's transaction finished; the command
    /// loop ends after the shell's finish page.
    pub fn notify_execute_complete(&self) {
        if self
            .handle
            .commands
            .blocking_send(UiCommand::ExecuteComplete)
            .is_err()
        {
            tracing::warn!("UI thread gone before execute-complete notification");
        }
    }

    /// Notify completion, then block until the UI thread has fully exited.
    pub fn shutdown(mut self) {
        self.notify_execute_complete();
        self.join_thread();
    }

    /// Join without a completion notification - the cancel path, where the
    /// thread is already unwinding on its own.
    pub fn join(mut self) {
        self.join_thread();
    }

    fn join_thread(&mut self) {
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                tracing::error!("UI thread terminated by panic");
            }
            tracing::debug!("UI thread joined");
        }
    }
}

/// Body of the UI thread.
///
/// The gate guard resolves the gate to exit on every unwind path that
/// reaches neither signal; thanks to first-wins semantics it is a no-op on
/// all others.
fn ui_thread_main(
    factory: ShellFactory,
    ctx: ShellContext,
    signals: GateSignaller,
    handle_tx: oneshot::Sender<ShellHandle>,
) {
    let _guard = GateGuard::new(signals.clone());
    let affinity = ThreadAffinity::current();
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<UiCommand>(1);

    let handle = ShellHandle {
        commands: cmd_tx,
        affinity: affinity.clone(),
    };
    if handle_tx.send(handle).is_err() {
        // Host gave up waiting; nothing to run a UI for.
        return;
    }

    let mut shell = match factory(&ctx) {
        Ok(shell) => shell,
        Err(error) => {
            tracing::error!(%error, "shell construction failed");
            return;
        }
    };

    let verdict = match shell.run_sequence(ctx.sequence(), &ctx) {
        Ok(verdict) => verdict,
        Err(error) => {
            tracing::warn!(%error, "dialog sequence failed; treating as cancelled");
            SequenceVerdict::Cancelled
        }
    };

    match verdict {
        SequenceVerdict::Cancelled => {
            tracing::info!("user cancelled before confirming");
            signals.signal_exit();
            return;
        }
        SequenceVerdict::Proceed => {
            tracing::info!("user confirmed; engine may proceed");
            signals.signal_start();
        }
    }

    // Passive mode: the engine drives everything from here on.
    while let Some(command) = cmd_rx.blocking_recv() {
        affinity.assert_owner();
        match command {
            UiCommand::Relay { envelope, reply } => {
                let response = shell.handle_message(&envelope);
                if reply.send(response).is_err() {
                    tracing::warn!("engine stopped waiting for a relayed response");
                }
            }
            UiCommand::ExecuteStarted => shell.execute_started(),
            UiCommand::ExecuteComplete => {
                shell.execute_complete();
                break;
            }
        }
    }
}
