use budgetly_shared::types::{BudgetId, UserId};
use chrono::Utc;
use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;

fn form(entries: &[(&str, Decimal)]) -> FormValues {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), *value))
        .collect()
}

fn stored(planned: Amounts) -> BudgetTemplate {
    BudgetTemplate {
        id: BudgetId::new(),
        user_id: UserId::new(),
        planned,
        total_income: planned.total_income(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn test_submit_without_template_commits_directly() {
    let mut editor = TemplateEditor::new();

    let outcome = editor
        .submit(&form(&[("salary_income", dec!(3000))]), None)
        .unwrap();

    let expected = Amounts::ZERO.with(BudgetField::SalaryIncome, dec!(3000));
    assert_eq!(outcome, SubmitOutcome::Commit(expected));
    assert_eq!(editor.state(), &EditorState::Committing { values: expected });

    editor.finish().unwrap();
    assert_eq!(editor.state(), &EditorState::Editing);
}

#[test]
fn test_submit_with_template_awaits_confirmation() {
    let mut editor = TemplateEditor::new();
    let current = stored(Amounts::ZERO.with(BudgetField::Rent, dec!(900)));

    let outcome = editor
        .submit(&form(&[("rent", dec!(1000))]), Some(current.clone()))
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::AwaitConfirmation);
    assert_eq!(
        editor.state(),
        &EditorState::AwaitingConfirmation {
            pending: Amounts::ZERO.with(BudgetField::Rent, dec!(1000)),
            current,
        }
    );

    let rows = editor.comparison().unwrap();
    let rent = rows.iter().find(|row| row.field == BudgetField::Rent).unwrap();
    assert_eq!(rent.current, dec!(900));
    assert_eq!(rent.pending, dec!(1000));
    assert_eq!(rows.len(), FIELD_SCHEMA.len());
}

#[test]
fn test_confirm_hands_out_pending_values() {
    let mut editor = TemplateEditor::new();
    editor
        .submit(&form(&[("rent", dec!(1000))]), Some(stored(Amounts::ZERO)))
        .unwrap();

    let values = editor.confirm().unwrap();

    assert_eq!(values.rent, dec!(1000));
    assert_eq!(editor.state().status(), EditorStatus::Committing);
    assert!(editor.comparison().is_none());
}

#[test]
fn test_cancel_returns_to_editing() {
    let mut editor = TemplateEditor::new();
    editor
        .submit(&form(&[("rent", dec!(1000))]), Some(stored(Amounts::ZERO)))
        .unwrap();

    let discarded = editor.cancel().unwrap();

    assert_eq!(discarded.pending.rent, dec!(1000));
    assert_eq!(editor.state(), &EditorState::Editing);
}

#[test]
fn test_invalid_input_stays_editing() {
    let mut editor = TemplateEditor::new();

    let err = editor
        .submit(&form(&[("rent", dec!(-5))]), None)
        .unwrap_err();

    assert!(matches!(err, EditorError::Validation(_)));
    assert_eq!(editor.state(), &EditorState::Editing);
}

#[rstest]
#[case(EditorAction::Confirm)]
#[case(EditorAction::Cancel)]
#[case(EditorAction::Finish)]
fn test_actions_rejected_while_editing(#[case] action: EditorAction) {
    let mut editor = TemplateEditor::new();

    let result = match action {
        EditorAction::Confirm => editor.confirm().map(|_| ()),
        EditorAction::Cancel => editor.cancel().map(|_| ()),
        EditorAction::Finish => editor.finish(),
        EditorAction::Submit => unreachable!(),
    };

    assert_eq!(
        result,
        Err(EditorError::InvalidTransition {
            from: EditorStatus::Editing,
            action,
        })
    );
    assert_eq!(editor.state(), &EditorState::Editing);
}

#[test]
fn test_submit_rejected_while_awaiting_confirmation() {
    let mut editor = TemplateEditor::new();
    let current = stored(Amounts::ZERO);
    editor
        .submit(&form(&[("rent", dec!(1))]), Some(current.clone()))
        .unwrap();

    let err = editor
        .submit(&form(&[("rent", dec!(2))]), Some(current))
        .unwrap_err();

    assert_eq!(
        err,
        EditorError::InvalidTransition {
            from: EditorStatus::AwaitingConfirmation,
            action: EditorAction::Submit,
        }
    );
    assert_eq!(err.to_string(), "Cannot submit while awaiting confirmation");
}

#[test]
fn test_confirm_twice_is_rejected_and_keeps_commit() {
    let mut editor = TemplateEditor::new();
    editor
        .submit(&form(&[("rent", dec!(1))]), Some(stored(Amounts::ZERO)))
        .unwrap();
    editor.confirm().unwrap();

    let err = editor.confirm().unwrap_err();

    assert!(matches!(
        err,
        EditorError::InvalidTransition {
            from: EditorStatus::Committing,
            action: EditorAction::Confirm,
        }
    ));
    assert_eq!(editor.state().status(), EditorStatus::Committing);
}
