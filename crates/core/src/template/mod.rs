//! Editing the budget template, with confirmation before an overwrite.

pub mod editor;
pub mod error;

pub use editor::{
    EditorAction, EditorState, EditorStatus, FieldComparison, PendingOverwrite, SubmitOutcome,
    TemplateEditor, compare,
};
pub use error::EditorError;
