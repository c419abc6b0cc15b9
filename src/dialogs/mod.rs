// Dialog sequence store - ordered dialog identifier lists for the install and
// repair flows.
//
// Sequences are parsed once from session properties before the UI thread
// starts and are read-only afterwards. A malformed or missing property is
// never fatal: it degrades to an empty sequence, which means "no custom UI
// for that phase".

use crate::models::RunKind;
use crate::session::{Session, properties};

/// Ordered sequence of dialog identifiers.
///
/// Insertion order is display order. Duplicates are permitted (a flow may
/// legitimately revisit a dialog). An empty sequence is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSequence {
    ids: Vec<String>,
}

impl DialogSequence {
    /// Parse a comma-delimited identifier list.
    ///
    /// Whitespace around identifiers is trimmed; empty segments (doubled or
    /// trailing commas) are dropped. This never fails: garbage in means fewer
    /// entries out, not an error.
    pub fn parse(raw: &str) -> Self {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        Self { ids }
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Serialize back to the delimited property form.
    pub fn serialize(&self) -> String {
        self.ids.join(",")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The two per-run flows, read once from session properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogSet {
    pub install: DialogSequence,
    pub repair: DialogSequence,
}

impl DialogSet {
    /// Populate both sequences from the session.
    ///
    /// Missing properties yield empty sequences; the condition is logged but
    /// the run continues (the shell simply has nothing to show for that
    /// phase).
    pub fn from_session(session: &dyn Session) -> Self {
        let install = Self::sequence_from_property(session, properties::INSTALL_SEQUENCE);
        let repair = Self::sequence_from_property(session, properties::REPAIR_SEQUENCE);

        tracing::debug!(
            install_dialogs = install.len(),
            repair_dialogs = repair.len(),
            "dialog sequences loaded from session"
        );

        Self { install, repair }
    }

    fn sequence_from_property(session: &dyn Session, name: &str) -> DialogSequence {
        match session.get(name) {
            Some(raw) => DialogSequence::parse(&raw),
            None => {
                tracing::warn!(property = name, "dialog sequence property not set, using empty sequence");
                DialogSequence::default()
            }
        }
    }

    /// The flow to present for this run.
    pub fn sequence_for(&self, kind: RunKind) -> &DialogSequence {
        match kind {
            RunKind::Install => &self.install,
            RunKind::Repair => &self.repair,
        }
    }
}
