use crate::result::ErrorKind;

/// Lifecycle of the query that last targeted a store scope.
/// Idle until the first fetch, then loading until the response settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl LoadState {
    pub fn is_loading(self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_failed(self) -> bool {
        matches!(self, LoadState::Failed)
    }

    pub fn is_settled(self) -> bool {
        matches!(self, LoadState::Success | LoadState::Failed)
    }
}

/// The settled failure a consumer reads off a store. The message has already
/// been resolved (backend payload preferred, resource default otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl StoreFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind.is_not_found()
    }
}
