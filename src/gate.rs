// Synchronization gate - resolves the race between "user confirmed install"
// and "user closed the UI".
//
// Two single-fire signals share one slot: whichever transitions first is the
// outcome every waiter observes. Signals never reset; later signals of either
// kind are no-ops. The UI side only ever holds a signal-capable clone, the
// engine bridge is the only waiter.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Outcome of the gate race.
///
/// An explicit tagged result rather than a control-flow exception; the bridge
/// converts `Cancelled` into its distinguished abort error at the engine
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The user confirmed the operation before closing the UI.
    Proceed,
    /// The UI exited (or faulted) before the user confirmed.
    Cancelled,
}

#[derive(Debug, Default)]
struct GateInner {
    outcome: Mutex<Option<GateOutcome>>,
    resolved: Condvar,
}

impl GateInner {
    fn signal(&self, outcome: GateOutcome) {
        let mut slot = self.outcome.lock().unwrap();
        if slot.is_none() {
            *slot = Some(outcome);
            tracing::debug!(?outcome, "gate resolved");
            self.resolved.notify_all();
        }
    }
}

/// Two-signal, first-wins synchronization gate.
///
/// Clones share the same gate. `signal_start`/`signal_exit` may be called
/// from any thread, any number of times; only the first transition counts.
/// The tie between near-simultaneous signals is resolved by lock acquisition
/// order: first-observed wins, which is documented rather than guaranteed to
/// be fair.
#[derive(Debug, Clone, Default)]
pub struct StartGate {
    inner: Arc<GateInner>,
}

impl StartGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record "user confirmed". No-op if the gate already resolved.
    pub fn signal_start(&self) {
        self.inner.signal(GateOutcome::Proceed);
    }

    /// Record "UI exited". No-op if the gate already resolved.
    pub fn signal_exit(&self) {
        self.inner.signal(GateOutcome::Cancelled);
    }

    /// Block until either signal transitions; returns which fired first.
    ///
    /// No timeout: the gate is designed to wait indefinitely for human
    /// interaction. Callers needing a bounded wait use [`Self::wait_timeout`].
    pub fn wait(&self) -> GateOutcome {
        let mut slot = self.inner.outcome.lock().unwrap();
        loop {
            if let Some(outcome) = *slot {
                return outcome;
            }
            slot = self.inner.resolved.wait(slot).unwrap();
        }
    }

    /// Bounded wait. `None` on expiry; callers treat expiry as cancel.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<GateOutcome> {
        let slot = self.inner.outcome.lock().unwrap();
        let (slot, _result) = self
            .inner
            .resolved
            .wait_timeout_while(slot, timeout, |slot| slot.is_none())
            .unwrap();
        *slot
    }

    /// Non-blocking peek at the resolution, if any.
    pub fn try_outcome(&self) -> Option<GateOutcome> {
        *self.inner.outcome.lock().unwrap()
    }

    /// Signal-only capability for the UI side.
    ///
    /// The UI thread may resolve the gate but never observe or reset it;
    /// handing out this narrowed handle keeps that one-way contract in the
    /// type system instead of in a comment.
    pub fn signaller(&self) -> GateSignaller {
        GateSignaller {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Write-only view of a [`StartGate`].
#[derive(Debug, Clone)]
pub struct GateSignaller {
    inner: Arc<GateInner>,
}

impl GateSignaller {
    /// Record "user confirmed". No-op if the gate already resolved.
    pub fn signal_start(&self) {
        self.inner.signal(GateOutcome::Proceed);
    }

    /// Record "UI exited". No-op if the gate already resolved.
    pub fn signal_exit(&self) {
        self.inner.signal(GateOutcome::Cancelled);
    }
}

/// Drop guard that releases a waiting engine thread if the UI thread unwinds
/// before signalling.
///
/// Dropping the guard signals exit; because the gate is first-wins, the drop
/// is a no-op on every path where a real signal already landed. The guard
/// therefore needs no disarm step.
#[derive(Debug)]
pub struct GateGuard {
    signals: GateSignaller,
}

impl GateGuard {
    pub fn new(signals: GateSignaller) -> Self {
        Self { signals }
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.signals.signal_exit();
    }
}
