//! EmbedUI - Embedded UI orchestrator for declarative installer packages
//!
//! Demo harness entry point.
//!
//! # Overview
//!
//! This binary stands in for the installer engine and drives the embedded-UI
//! contract end to end:
//! - Logging infrastructure (file rotation + console output)
//! - Configuration loading ([`ConfigManager`] - dialog flows from EmbedUI.yaml)
//! - Session staging (dialog sequence properties, install location)
//! - The full protocol: `initialize` -> `process_message` x N -> `shutdown`
//!
//! The threading model is the real one:
//! - **Main thread**: plays the engine thread (blocks in initialize, in every
//!   process_message, and in shutdown)
//! - **UI thread**: spawned by the bridge, runs the scripted shell
//!
//! # Execution Flow
//!
//! 1. Initialize logging -> logs/embedui_<date>.log
//! 2. Load EmbedUI.yaml from `EmbedUI Data/`
//! 3. Stage dialog sequences into an in-memory session
//! 4. initialize: UI thread comes up, scripted user confirms
//! 5. Relay a handful of engine messages and log the responses
//! 6. shutdown: UI thread joins, metrics summary is logged

use anyhow::Result;
use camino::Utf8Path;
use embedui::bridge::{BridgeConfig, EmbeddedUi, EngineBridge};
use embedui::logging::LogOptions;
use embedui::models::{ButtonSet, DefaultButton, IconHint, MessageKind, MessageRecord, UiLevel};
use embedui::session::{PropertySession, Session, properties};
use embedui::ui::ScriptedShell;
use embedui::{APP_NAME, ConfigManager, VERSION};
use std::sync::Arc;

/// Demo harness entry point.
///
/// Plays the engine role against a scripted shell so a full run can be
/// observed from the logs alone.
///
/// # Errors
///
/// This function can fail if:
/// - Logging initialization fails (disk space, permissions)
/// - The configuration directory cannot be created
/// - EmbedUI.yaml exists but is invalid YAML
fn main() -> Result<()> {
    let config_manager = ConfigManager::new("EmbedUI Data")?;
    let ui_config = config_manager.load_ui_config()?;

    // Setup logging with both file and console output
    let _guard = embedui::logging::setup_logging(
        &LogOptions::new("logs", "embedui")
            .with_debug(ui_config.ui_settings.debug_mode)
            .with_console(true),
    )?;

    tracing::info!("Starting {} v{} demo harness", APP_NAME, VERSION);
    tracing::info!(
        "Loaded UI config - title: {}, install dialogs: {}",
        ui_config.ui_settings.window_title,
        ui_config.ui_settings.install_dialogs.len()
    );

    // Stage the session the way the package compiler would before the run.
    let session = Arc::new(PropertySession::new());
    ui_config.apply_to_session(session.as_ref());
    session.set(properties::INSTALL_DIR, "C:\\Program Files\\DemoProduct");

    let mut bridge = EngineBridge::new(
        BridgeConfig::new(ScriptedShell::confirming().into_factory())
            .with_window_title(ui_config.ui_settings.window_title.clone())
            .with_keep_engine_window(ui_config.ui_settings.keep_engine_window),
    );
    let metrics = bridge.metrics();

    // --- Engine: initialize ---------------------------------------------
    let mut ui_level = UiLevel::Full;
    match bridge.initialize(
        Arc::clone(&session) as Arc<dyn Session>,
        Utf8Path::new("resources"),
        &mut ui_level,
    ) {
        Ok(true) => {
            tracing::info!(?ui_level, "embedded UI took over");
        }
        Ok(false) => {
            tracing::info!("embedded UI deferred to the built-in UI; nothing to demo");
            return Ok(());
        }
        Err(error) => {
            tracing::warn!(%error, "run aborted before the transaction started");
            return Ok(());
        }
    }

    // --- Engine: transaction with progress and a recoverable error ------
    let steps = [
        (MessageKind::Progress, "Copying files (1/3)"),
        (MessageKind::Progress, "Copying files (2/3)"),
        (MessageKind::Warning, "Overwriting newer file app.dll"),
        (MessageKind::Progress, "Copying files (3/3)"),
        (MessageKind::Info, "Writing registry values"),
    ];
    for (kind, text) in steps {
        let response = bridge.process_message(
            kind,
            MessageRecord::new(text),
            ButtonSet::Ok,
            IconHint::None,
            DefaultButton::First,
        );
        tracing::info!(%kind, ?response, "engine message answered");
    }

    let response = bridge.process_message(
        MessageKind::Error,
        MessageRecord::with_fields("Failed to copy [1]", vec!["plugin.dll".to_string()]),
        ButtonSet::AbortRetryIgnore,
        IconHint::Error,
        DefaultButton::Second,
    );
    tracing::info!(?response, "error prompt answered");

    // --- Engine: shutdown ------------------------------------------------
    bridge.shutdown();
    tracing::info!(
        install_dir = %session.get(properties::INSTALL_DIR).unwrap_or_default(),
        "run complete"
    );

    metrics.log_summary();
    Ok(())
}
