use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Unauthorized("test".into()), 401, "UNAUTHORIZED")]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::NoTemplateConfigured("test".into()), 404, "NO_TEMPLATE_CONFIGURED")]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::Conflict("test".into()), 409, "CONFLICT")]
#[case(AppError::Database("test".into()), 500, "DATABASE_ERROR")]
fn test_app_error_mapping(#[case] error: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        AppError::Unauthorized("msg".into()).to_string(),
        "Authentication failed: msg"
    );
    assert_eq!(
        AppError::NoTemplateConfigured("msg".into()).to_string(),
        "No budget template configured: msg"
    );
    assert_eq!(
        AppError::Validation("msg".into()).to_string(),
        "Validation error: msg"
    );
    assert_eq!(
        AppError::Database("msg".into()).to_string(),
        "Database error: msg"
    );
}

#[test]
fn test_only_backend_failures_are_retryable() {
    assert!(AppError::Database(String::new()).is_retryable());
    assert!(!AppError::Conflict(String::new()).is_retryable());
    assert!(!AppError::Validation(String::new()).is_retryable());
    assert!(!AppError::Unauthorized(String::new()).is_retryable());
    assert!(!AppError::NoTemplateConfigured(String::new()).is_retryable());
}
