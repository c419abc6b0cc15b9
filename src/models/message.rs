use serde::{Deserialize, Serialize};

/// Kind of an engine-originated message.
///
/// Mirrors the installer engine's message taxonomy as far as the embedded UI
/// cares about it. `Terminate` is the engine's "tear everything down" notice;
/// shells are expected to acknowledge it without prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Progress,
    Info,
    Warning,
    Error,
    Terminate,
}

impl MessageKind {
    /// Short lowercase name used in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Progress => "progress",
            MessageKind::Info => "info",
            MessageKind::Warning => "warning",
            MessageKind::Error => "error",
            MessageKind::Terminate => "terminate",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured payload of an engine message: a format string plus its fields,
/// the way the engine hands records to its UI handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageRecord {
    pub text: String,
    pub fields: Vec<String>,
}

impl MessageRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(text: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            text: text.into(),
            fields,
        }
    }
}

/// Which buttons the UI should offer for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSet {
    Ok,
    OkCancel,
    AbortRetryIgnore,
    YesNo,
    YesNoCancel,
    RetryCancel,
}

/// Icon the UI should show next to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconHint {
    None,
    Information,
    Warning,
    Error,
    Question,
}

/// Which button is pre-selected when the message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultButton {
    First,
    Second,
    Third,
}

/// An engine-thread message marshalled onto the UI thread.
///
/// Immutable once constructed. The engine blocks until the UI answers with a
/// [`UiResponse`], so exactly one envelope is ever in flight.
#[derive(Debug, Clone)]
pub struct MessageEnvelope {
    pub kind: MessageKind,
    pub record: MessageRecord,
    pub buttons: ButtonSet,
    pub icon: IconHint,
    pub default_button: DefaultButton,
}

impl MessageEnvelope {
    pub fn new(
        kind: MessageKind,
        record: MessageRecord,
        buttons: ButtonSet,
        icon: IconHint,
        default_button: DefaultButton,
    ) -> Self {
        Self {
            kind,
            record,
            buttons,
            icon,
            default_button,
        }
    }

    /// Convenience constructor for a progress notification.
    pub fn progress(text: impl Into<String>) -> Self {
        Self::new(
            MessageKind::Progress,
            MessageRecord::new(text),
            ButtonSet::Ok,
            IconHint::None,
            DefaultButton::First,
        )
    }

    /// Convenience constructor for an error prompt.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(
            MessageKind::Error,
            MessageRecord::new(text),
            ButtonSet::OkCancel,
            IconHint::Error,
            DefaultButton::First,
        )
    }

    /// Convenience constructor for a warning prompt.
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(
            MessageKind::Warning,
            MessageRecord::new(text),
            ButtonSet::Ok,
            IconHint::Warning,
            DefaultButton::First,
        )
    }
}

/// Button outcome the UI produces for an envelope.
///
/// A small fixed set; `None` means the message needed no answer (progress
/// ticks, terminate notices).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiResponse {
    None,
    Ok,
    Cancel,
    Abort,
    Retry,
    Ignore,
    Yes,
    No,
}

impl UiResponse {
    /// The worst-case response used when the UI cannot be asked: a benign
    /// acknowledgement that lets the engine continue rather than deadlock.
    pub fn safe_default() -> Self {
        UiResponse::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(MessageKind::Progress.to_string(), "progress");
        assert_eq!(MessageKind::Terminate.to_string(), "terminate");
    }

    #[test]
    fn test_error_envelope_defaults() {
        let envelope = MessageEnvelope::error("file copy failed");
        assert_eq!(envelope.kind, MessageKind::Error);
        assert_eq!(envelope.buttons, ButtonSet::OkCancel);
        assert_eq!(envelope.icon, IconHint::Error);
        assert_eq!(envelope.record.text, "file copy failed");
        assert!(envelope.record.fields.is_empty());
    }

    #[test]
    fn test_safe_default_is_benign() {
        assert_eq!(UiResponse::safe_default(), UiResponse::Ok);
    }

    #[test]
    fn test_record_with_fields() {
        let record = MessageRecord::with_fields(
            "copying [1] to [2]",
            vec!["app.dll".to_string(), "C:\\app".to_string()],
        );
        assert_eq!(record.fields.len(), 2);
    }
}
