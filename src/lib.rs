// EmbedUI - Embedded UI orchestrator for declarative installer packages
//
// This is the library crate containing the cross-thread protocol: the
// synchronization gate, the UI thread host, the engine bridge and the
// message relay. The binary crate (main.rs) provides a demo harness that
// drives the bridge the way an installer engine would.

pub mod bridge;
pub mod config;
pub mod dialogs;
pub mod gate;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod session;
pub mod ui;

// Re-export commonly used types for convenience
pub use bridge::{BridgeConfig, BridgeError, BridgeState, EmbeddedUi, EngineBridge};
pub use config::{ConfigManager, UiConfig};
pub use dialogs::{DialogSequence, DialogSet};
pub use gate::{GateOutcome, StartGate};
pub use models::{MessageEnvelope, MessageKind, UiLevel, UiResponse};
pub use session::{PropertySession, Session};
pub use ui::{ScriptedShell, SequenceVerdict, UiShell, UiThreadHost};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
