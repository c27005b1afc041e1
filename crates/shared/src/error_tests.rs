use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Database("msg".into()), "Database error: msg")]
#[case(AppError::ExternalService("msg".into()), "External service error: msg")]
#[case(AppError::Configuration("msg".into()), "Configuration error: msg")]
#[case(AppError::Internal("msg".into()), "Internal error: msg")]
fn test_app_error_display(#[case] error: AppError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[test]
fn test_config_error_converts_to_configuration() {
    let err: AppError = config::ConfigError::NotFound("supabase.url".into()).into();
    assert!(matches!(err, AppError::Configuration(_)));
}
