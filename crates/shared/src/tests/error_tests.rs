use super::*;

#[test]
fn api_error_uses_snake_case_code() {
    let value = serde_json::to_value(ApiError::new(ErrorCode::Validation, "bad body")).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "code": "validation", "message": "bad body" })
    );
}

#[test]
fn method_not_allowed_body_matches_wire_shape() {
    assert_eq!(
        serde_json::to_value(MethodNotAllowedBody::default()).expect("json"),
        serde_json::json!({ "error": "Method not allowed" })
    );
}

#[test]
fn api_exception_displays_code_and_message() {
    let err = ApiException::new(ErrorCode::Validation, "blank name");
    assert_eq!(err.to_string(), "Validation: blank name");
}
