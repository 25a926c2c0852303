//! Template editor error types.

use thiserror::Error;

use super::editor::{EditorAction, EditorStatus};
use crate::budget::ValidationErrors;

/// Errors raised by the template editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The action is not allowed in the current state.
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        /// State the editor was in.
        from: EditorStatus,
        /// Action that was attempted.
        action: EditorAction,
    },

    /// Submitted values failed schema validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}
