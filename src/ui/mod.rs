// UI module - the UI-thread side of the orchestrator
//
// This module contains:
// - UiThreadHost: owns the dedicated UI thread and its command loop
// - UiShell / ScriptedShell: the seam to the visual layer and the shipped
//   headless implementation
// - MessageRelay: the synchronous engine-to-UI message handoff

pub mod host;
pub mod relay;
pub mod shell;

pub use host::{HostError, ShellHandle, ThreadAffinity, UiCommand, UiThreadHost};
pub use relay::{MessageRelay, RelayError};
pub use shell::{
    ScriptedShell, SequenceVerdict, ShellContext, ShellError, ShellFactory, ShellProbe, UiShell,
};
