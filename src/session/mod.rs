// Session property store - the narrow interface to the installer engine's
// session state.
//
// The orchestrator never inspects package data (files, registry entries)
// directly; everything it needs flows through named string properties:
// the serialized dialog sequences in, resolved values such as the install
// location back out.

use indexmap::IndexMap;
use std::sync::RwLock;

/// Well-known property names used by the orchestrator.
pub mod properties {
    /// Comma-delimited dialog identifiers for the install flow.
    pub const INSTALL_SEQUENCE: &str = "EMBEDDEDUI_INSTALL_SEQUENCE";

    /// Comma-delimited dialog identifiers for the repair flow.
    pub const REPAIR_SEQUENCE: &str = "EMBEDDEDUI_REPAIR_SEQUENCE";

    /// Non-empty when the product is already installed (repair/modify run).
    pub const INSTALLED: &str = "Installed";

    /// `ALL` when the whole product is being removed.
    pub const REMOVE: &str = "REMOVE";

    /// Resolved install location, written back out by the UI.
    pub const INSTALL_DIR: &str = "INSTALLDIR";
}

/// Session/property store the installer engine exposes to its embedded UI.
///
/// Implementations must be shareable across the engine and UI threads; the
/// engine-side store is the source of truth, the UI only reads and writes
/// named properties through it.
#[cfg_attr(test, mockall::automock)]
pub trait Session: Send + Sync {
    /// Read a property. `None` when the property was never set.
    fn get(&self, name: &str) -> Option<String>;

    /// Write a property, replacing any previous value.
    fn set(&self, name: &str, value: &str);

    /// Whether this run removes the whole product.
    fn is_uninstalling(&self) -> bool {
        self.get(properties::REMOVE)
            .map(|v| v.eq_ignore_ascii_case("ALL"))
            .unwrap_or(false)
    }

    /// Whether the product is already installed (selects the repair flow).
    fn is_installed(&self) -> bool {
        self.get(properties::INSTALLED)
            .map(|v| !v.is_empty())
            .unwrap_or(false)
    }
}

/// In-memory [`Session`] backed by an insertion-ordered property map.
///
/// Used by the demo harness and tests; a real engine integration implements
/// [`Session`] over the engine's own session object instead.
#[derive(Debug, Default)]
pub struct PropertySession {
    props: RwLock<IndexMap<String, String>>,
}

impl PropertySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session pre-populated with the given properties.
    pub fn with_properties<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let props = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            props: RwLock::new(props),
        }
    }

    /// Snapshot of all properties in insertion order.
    pub fn snapshot(&self) -> IndexMap<String, String> {
        self.props.read().unwrap().clone()
    }
}

impl Session for PropertySession {
    fn get(&self, name: &str) -> Option<String> {
        self.props.read().unwrap().get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.props
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unset_property() {
        let session = PropertySession::new();
        assert_eq!(session.get("MISSING"), None);
    }

    #[test]
    fn test_set_and_get() {
        let session = PropertySession::new();
        session.set(properties::INSTALL_DIR, "C:\\Program Files\\App");
        assert_eq!(
            session.get(properties::INSTALL_DIR).as_deref(),
            Some("C:\\Program Files\\App")
        );
    }

    #[test]
    fn test_set_replaces_value() {
        let session = PropertySession::new();
        session.set("P", "one");
        session.set("P", "two");
        assert_eq!(session.get("P").as_deref(), Some("two"));
    }

    #[test]
    fn test_uninstall_detection_case_insensitive() {
        let session = PropertySession::new();
        assert!(!session.is_uninstalling());

        session.set(properties::REMOVE, "all");
        assert!(session.is_uninstalling());
    }

    #[test]
    fn test_installed_detection() {
        let session = PropertySession::new();
        assert!(!session.is_installed());

        session.set(properties::INSTALLED, "");
        assert!(!session.is_installed());

        session.set(properties::INSTALLED, "2024-01-01");
        assert!(session.is_installed());
    }

    #[test]
    fn test_with_properties_preserves_order() {
        let session = PropertySession::with_properties([("A", "1"), ("B", "2"), ("C", "3")]);
        let keys: Vec<_> = session.snapshot().keys().cloned().collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }
}
