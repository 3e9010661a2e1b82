use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Outcome of a settled store operation, for whatever surfaces messages to
/// the operator (toast, status bar, log).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(message) | Notification::Error(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

/// Fire-and-forget sender half of the notification channel. Stores never
/// consume a reply; a dropped receiver just means nobody is rendering.
#[derive(Debug, Clone)]
pub struct NotificationSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl NotificationSink {
    pub fn channel() -> (Self, UnboundedReceiverStream<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, UnboundedReceiverStream::new(rx))
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        let _ = self.tx.send(Notification::Success(message.into()));
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        let _ = self.tx.send(Notification::Error(message.into()));
    }
}
