//! State machine for template edits.
//!
//! ```text
//!            submit (no template)
//!  Editing ─────────────────────────────► Committing ── finish ──► Editing
//!     │                                       ▲
//!     │ submit (template exists)              │ confirm
//!     ▼                                       │
//!  AwaitingConfirmation ──────────────────────┘
//!     │
//!     └── cancel ──► Editing
//! ```
//!
//! The editor never touches storage. Callers write the values handed out
//! by [`TemplateEditor::submit`] or [`TemplateEditor::confirm`] and then
//! call [`TemplateEditor::finish`], whatever the outcome of the write.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::EditorError;
use crate::budget::{Amounts, BudgetField, BudgetTemplate, FIELD_SCHEMA, FormValues, amounts_from_form};

/// State of a template edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    /// Form open, nothing pending.
    #[default]
    Editing,
    /// A template exists; the user must confirm replacing it.
    AwaitingConfirmation {
        /// Validated values waiting for confirmation.
        pending: Amounts,
        /// Template currently stored.
        current: BudgetTemplate,
    },
    /// Values handed to the caller for writing.
    Committing {
        /// Values being written.
        values: Amounts,
    },
}

impl EditorState {
    /// Data-free name of the state.
    #[must_use]
    pub const fn status(&self) -> EditorStatus {
        match self {
            Self::Editing => EditorStatus::Editing,
            Self::AwaitingConfirmation { .. } => EditorStatus::AwaitingConfirmation,
            Self::Committing { .. } => EditorStatus::Committing,
        }
    }
}

/// Data-free name of an [`EditorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorStatus {
    /// See [`EditorState::Editing`].
    Editing,
    /// See [`EditorState::AwaitingConfirmation`].
    AwaitingConfirmation,
    /// See [`EditorState::Committing`].
    Committing,
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editing => write!(f, "editing"),
            Self::AwaitingConfirmation => write!(f, "awaiting confirmation"),
            Self::Committing => write!(f, "committing"),
        }
    }
}

/// Transition names, used in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// [`TemplateEditor::submit`].
    Submit,
    /// [`TemplateEditor::confirm`].
    Confirm,
    /// [`TemplateEditor::cancel`].
    Cancel,
    /// [`TemplateEditor::finish`].
    Finish,
}

impl fmt::Display for EditorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::Confirm => write!(f, "confirm"),
            Self::Cancel => write!(f, "cancel"),
            Self::Finish => write!(f, "finish"),
        }
    }
}

/// What the caller should do after a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No template existed; write these values now.
    Commit(Amounts),
    /// A template exists; ask the user to confirm.
    AwaitConfirmation,
}

/// An overwrite the user did not confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOverwrite {
    /// Submitted values.
    pub pending: Amounts,
    /// Template stored at submit time.
    pub current: BudgetTemplate,
}

/// One row of the side-by-side view shown before an overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldComparison {
    /// Category.
    pub field: BudgetField,
    /// Display label.
    pub label: &'static str,
    /// Value stored now.
    pub current: Decimal,
    /// Value that would replace it.
    pub pending: Decimal,
}

/// Pairs stored and submitted values per category, in schema order.
#[must_use]
pub fn compare(current: &Amounts, pending: &Amounts) -> Vec<FieldComparison> {
    FIELD_SCHEMA
        .iter()
        .map(|spec| FieldComparison {
            field: spec.field,
            label: spec.label,
            current: current.get(spec.field),
            pending: pending.get(spec.field),
        })
        .collect()
}

/// Drives one template edit.
#[derive(Debug, Clone, Default)]
pub struct TemplateEditor {
    state: EditorState,
}

impl TemplateEditor {
    /// Creates an editor in [`EditorState::Editing`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    /// Validates the form and decides whether an overwrite needs confirming.
    ///
    /// Invalid input leaves the editor in `Editing`.
    pub fn submit(
        &mut self,
        form: &FormValues,
        current: Option<BudgetTemplate>,
    ) -> Result<SubmitOutcome, EditorError> {
        self.expect(EditorStatus::Editing, EditorAction::Submit)?;
        let values = amounts_from_form(form)?;

        match current {
            Some(current) => {
                self.state = EditorState::AwaitingConfirmation {
                    pending: values,
                    current,
                };
                Ok(SubmitOutcome::AwaitConfirmation)
            }
            None => {
                self.state = EditorState::Committing { values };
                Ok(SubmitOutcome::Commit(values))
            }
        }
    }

    /// Accepts the pending overwrite and returns the values to write.
    pub fn confirm(&mut self) -> Result<Amounts, EditorError> {
        match std::mem::take(&mut self.state) {
            EditorState::AwaitingConfirmation { pending, .. } => {
                self.state = EditorState::Committing { values: pending };
                Ok(pending)
            }
            other => {
                let from = other.status();
                self.state = other;
                Err(EditorError::InvalidTransition {
                    from,
                    action: EditorAction::Confirm,
                })
            }
        }
    }

    /// Drops the pending overwrite and hands back what was discarded.
    pub fn cancel(&mut self) -> Result<PendingOverwrite, EditorError> {
        match std::mem::take(&mut self.state) {
            EditorState::AwaitingConfirmation { pending, current } => {
                Ok(PendingOverwrite { pending, current })
            }
            other => {
                let from = other.status();
                self.state = other;
                Err(EditorError::InvalidTransition {
                    from,
                    action: EditorAction::Cancel,
                })
            }
        }
    }

    /// Ends a commit, successful or not.
    pub fn finish(&mut self) -> Result<(), EditorError> {
        self.expect(EditorStatus::Committing, EditorAction::Finish)?;
        self.state = EditorState::Editing;
        Ok(())
    }

    /// Side-by-side view while awaiting confirmation.
    #[must_use]
    pub fn comparison(&self) -> Option<Vec<FieldComparison>> {
        match &self.state {
            EditorState::AwaitingConfirmation { pending, current } => {
                Some(compare(&current.planned, pending))
            }
            _ => None,
        }
    }

    fn expect(&self, status: EditorStatus, action: EditorAction) -> Result<(), EditorError> {
        let from = self.state.status();
        if from == status {
            Ok(())
        } else {
            Err(EditorError::InvalidTransition { from, action })
        }
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod tests;
