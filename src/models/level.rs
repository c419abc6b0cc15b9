use crate::session::Session;
use serde::{Deserialize, Serialize};

/// UI level the engine was invoked with.
///
/// The engine passes this into `initialize` by mutable reference; on a
/// successful takeover the bridge rewrites it to [`UiLevel::SourceResolutionOnly`]
/// so the engine keeps handling only source-resolution messages natively and
/// routes everything else through the embedded UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiLevel {
    /// No UI at all.
    Silent,
    /// The engine's built-in progress-only UI.
    Basic,
    /// Reduced built-in UI (no wizard, modal errors only).
    Reduced,
    /// Full UI requested; the only level at which the embedded UI engages.
    Full,
    /// Written back by the bridge after takeover.
    SourceResolutionOnly,
}

/// Operating mode of a run, resolved exactly once at initialize time from
/// session state plus the engine-supplied UI level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Product is being removed; the embedded UI never engages.
    SilentUninstall,
    /// Engine was asked for less than full UI; defer to the built-in UI.
    BasicUi,
    /// Full custom UI takes over.
    FullCustomUi,
}

impl RunMode {
    /// Resolve the run mode for this session.
    ///
    /// Uninstalls always bypass the custom UI, whatever level was requested;
    /// anything below [`UiLevel::Full`] defers to the engine's built-in UI.
    pub fn resolve(session: &dyn Session, level: UiLevel) -> Self {
        if session.is_uninstalling() {
            RunMode::SilentUninstall
        } else if level == UiLevel::Full {
            RunMode::FullCustomUi
        } else {
            RunMode::BasicUi
        }
    }
}

/// Which dialog flow a run presents: first install or repair of an existing
/// installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Install,
    Repair,
}

impl RunKind {
    /// A non-empty `Installed` property means the product is already on the
    /// machine and the repair flow applies.
    pub fn resolve(session: &dyn Session) -> Self {
        if session.is_installed() {
            RunKind::Repair
        } else {
            RunKind::Install
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{PropertySession, Session, properties};

    #[test]
    fn test_full_level_resolves_to_custom_ui() {
        let session = PropertySession::new();
        assert_eq!(
            RunMode::resolve(&session, UiLevel::Full),
            RunMode::FullCustomUi
        );
    }

    #[test]
    fn test_basic_level_defers() {
        let session = PropertySession::new();
        assert_eq!(RunMode::resolve(&session, UiLevel::Basic), RunMode::BasicUi);
        assert_eq!(
            RunMode::resolve(&session, UiLevel::Silent),
            RunMode::BasicUi
        );
    }

    #[test]
    fn test_uninstall_always_bypasses() {
        let session = PropertySession::new();
        session.set(properties::REMOVE, "ALL");
        assert_eq!(
            RunMode::resolve(&session, UiLevel::Full),
            RunMode::SilentUninstall
        );
    }

    #[test]
    fn test_run_kind_from_installed_property() {
        let session = PropertySession::new();
        assert_eq!(RunKind::resolve(&session), RunKind::Install);

        session.set(properties::INSTALLED, "00:00:00");
        assert_eq!(RunKind::resolve(&session), RunKind::Repair);
    }
}
