use serde::{Deserialize, Serialize};

/// Toast severity. `Error` maps to the destructive variant in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A user-facing toast notification. Titles are fixed Dutch labels
/// ("Succes" / "Fout"); the message carries the outcome or the underlying
/// error text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Succes".to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Fout".to_string(),
            message: message.into(),
        }
    }
}

/// Sink for toast notifications. The embedding UI implements this to route
/// toasts to its own widget; components only ever push.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that routes toasts to the `log` facade. Used as the default when
/// no UI sink is wired up.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                log::info!("{}: {}", notification.title, notification.message);
            }
            NotificationKind::Error => {
                log::error!("{}: {}", notification.title, notification.message);
            }
        }
    }
}
