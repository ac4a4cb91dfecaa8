use thiserror::Error;

use super::EventKind;

/// Failure reported by a single listener. The bus logs it and keeps
/// dispatching to the remaining listeners.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("handler '{handler}' is already borrowed while dispatching {kind:?}")]
    Busy {
        handler: &'static str,
        kind: EventKind,
    },

    #[error("{0}")]
    Failed(String),
}

/// The game thread dropped its inbox
#[derive(Debug, Error)]
#[error("event inbox is closed")]
pub struct InboxClosed;
