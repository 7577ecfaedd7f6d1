//! Error body parsing and idempotency signals.

use crate::transport::ApiResponse;
use crate::ERROR_TEXT_MAX_LENGTH;
use serde_json::Value;
use tracing::warn;

/// Role assignment codes meaning "this principal already holds the role"
const ALREADY_ASSIGNED_CODES: &[&str] = &[
    "PrincipalAlreadyHasWorkspaceRolePermissions",
    "PrincipalAlreadyHasRole",
    "RoleAssignmentAlreadyExists",
];

/// Codes that only restate the HTTP status and say nothing about the cause
const GENERIC_CODES: &[&str] = &["BadRequest", "InvalidRequest", "Conflict"];

/// Workspace creation codes meaning "the display name is taken"
const DUPLICATE_NAME_CODES: &[&str] = &["WorkspaceNameAlreadyExists", "ItemDisplayNameAlreadyInUse"];

/// Cut `text` to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// What the server said went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Human readable message, at most 500 characters
    pub message: String,
    /// Machine readable code (`errorCode` or `error.code`)
    pub code: Option<String>,
}

/// Extract message and code from an error response.
///
/// JSON bodies are searched for `error.message`, a string `error`, then a
/// top-level `message`. Anything else falls back to the raw body text.
pub fn parse_error_response(response: &ApiResponse) -> ErrorDetail {
    let raw = truncate_chars(&response.body, ERROR_TEXT_MAX_LENGTH);
    let looks_json = response.is_json() || response.body.trim_start().starts_with('{');
    if !looks_json {
        return ErrorDetail {
            message: raw,
            code: None,
        };
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => {
            if response.is_json() {
                warn!(status = response.status, "Failed to parse error response: {}", e);
            }
            return ErrorDetail {
                message: raw,
                code: None,
            };
        }
    };

    let error = body.get("error");
    let message = match error {
        Some(Value::Object(obj)) => obj.get("message").and_then(Value::as_str),
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
    .or_else(|| body.get("message").and_then(Value::as_str));

    let code = body
        .get("errorCode")
        .and_then(Value::as_str)
        .or_else(|| error.and_then(|e| e.get("code")).and_then(Value::as_str))
        .map(str::to_string);

    ErrorDetail {
        message: message
            .map(|m| truncate_chars(m, ERROR_TEXT_MAX_LENGTH))
            .unwrap_or(raw),
        code,
    }
}

/// How an idempotent outcome was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateSignal {
    /// A structured error code said so
    ErrorCode,
    /// No code was present; the response text said so
    ResponseText,
}

fn mentions_any(text: &str, phrases: &[&str]) -> bool {
    let lower = text.to_lowercase();
    phrases.iter().any(|p| lower.contains(p))
}

fn classify_duplicate(
    detail: &ErrorDetail,
    body: &str,
    known_codes: &[&str],
    code_fragments: &[&str],
    phrases: &[&str],
) -> Option<DuplicateSignal> {
    let specific_code = detail
        .code
        .as_deref()
        .filter(|code| !GENERIC_CODES.contains(code));
    match specific_code {
        // A specific code decides on its own; otherwise the text is consulted.
        Some(code) => (known_codes.contains(&code)
            || code_fragments.iter().any(|f| code.contains(f)))
        .then_some(DuplicateSignal::ErrorCode),
        None => (mentions_any(body, phrases) || mentions_any(&detail.message, phrases))
            .then_some(DuplicateSignal::ResponseText),
    }
}

/// Does a 400 on role assignment mean the role is already held?
pub fn existing_assignment_signal(detail: &ErrorDetail, body: &str) -> Option<DuplicateSignal> {
    classify_duplicate(
        detail,
        body,
        ALREADY_ASSIGNED_CODES,
        &["AlreadyExists", "AlreadyHas", "AlreadyAssigned"],
        &["already exists", "already assigned"],
    )
}

/// Does a rejected create mean another caller created the same name first?
pub fn duplicate_name_signal(detail: &ErrorDetail, body: &str) -> Option<DuplicateSignal> {
    classify_duplicate(
        detail,
        body,
        DUPLICATE_NAME_CODES,
        &["AlreadyExists", "AlreadyInUse"],
        &["already exists", "already in use"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncates_to_exactly_500_characters() {
        let body = "x".repeat(1000);
        let detail = parse_error_response(&ApiResponse::new(500, body));
        assert_eq!(detail.message.chars().count(), 500);
    }

    #[test]
    fn test_truncation_respects_multibyte_characters() {
        let text = "é".repeat(600);
        let cut = truncate_chars(&text, ERROR_TEXT_MAX_LENGTH);
        assert_eq!(cut.chars().count(), 500);
        assert_eq!(truncate_chars("short", 500), "short");
    }

    #[test]
    fn test_prefers_nested_error_message() {
        let response = ApiResponse::json(
            400,
            &json!({"error": {"code": "InvalidInput", "message": "displayName is too long"}}),
        );
        let detail = parse_error_response(&response);
        assert_eq!(detail.message, "displayName is too long");
        assert_eq!(detail.code.as_deref(), Some("InvalidInput"));
    }

    #[test]
    fn test_reads_fabric_error_shape() {
        let response = ApiResponse::json(
            400,
            &json!({"requestId": "r-1", "errorCode": "WorkspaceNameAlreadyExists", "message": "Name in use"}),
        );
        let detail = parse_error_response(&response);
        assert_eq!(detail.message, "Name in use");
        assert_eq!(detail.code.as_deref(), Some("WorkspaceNameAlreadyExists"));
    }

    #[test]
    fn test_string_error_field() {
        let response = ApiResponse::json(400, &json!({"error": "bad payload"}));
        assert_eq!(parse_error_response(&response).message, "bad payload");
    }

    #[test]
    fn test_invalid_json_falls_back_to_raw_text() {
        let mut response = ApiResponse::new(502, "{not json");
        response.content_type = Some("application/json".to_string());
        let detail = parse_error_response(&response);
        assert_eq!(detail.message, "{not json");
        assert!(detail.code.is_none());
    }

    #[test]
    fn test_assignment_code_beats_text() {
        let detail = ErrorDetail {
            message: "Principal already exists".to_string(),
            code: Some("InvalidPrincipalType".to_string()),
        };
        assert_eq!(existing_assignment_signal(&detail, "already exists"), None);

        let detail = ErrorDetail {
            message: "whatever".to_string(),
            code: Some("PrincipalAlreadyHasWorkspaceRolePermissions".to_string()),
        };
        assert_eq!(
            existing_assignment_signal(&detail, ""),
            Some(DuplicateSignal::ErrorCode)
        );
    }

    #[test]
    fn test_generic_code_falls_back_to_text() {
        let detail = ErrorDetail {
            message: "Principal already exists in this workspace".to_string(),
            code: Some("BadRequest".to_string()),
        };
        assert_eq!(
            existing_assignment_signal(&detail, ""),
            Some(DuplicateSignal::ResponseText)
        );

        let detail = ErrorDetail {
            message: "role is not valid".to_string(),
            code: Some("BadRequest".to_string()),
        };
        assert_eq!(existing_assignment_signal(&detail, ""), None);
    }

    #[test]
    fn test_assignment_text_fallback_is_case_insensitive() {
        let detail = ErrorDetail {
            message: "The principal is ALREADY ASSIGNED to this workspace".to_string(),
            code: None,
        };
        assert_eq!(
            existing_assignment_signal(&detail, ""),
            Some(DuplicateSignal::ResponseText)
        );
    }

    #[test]
    fn test_duplicate_name_detection() {
        let detail = ErrorDetail {
            message: "Workspace name already in use".to_string(),
            code: None,
        };
        assert_eq!(
            duplicate_name_signal(&detail, ""),
            Some(DuplicateSignal::ResponseText)
        );
        let detail = ErrorDetail {
            message: "displayName contains invalid characters".to_string(),
            code: None,
        };
        assert_eq!(duplicate_name_signal(&detail, ""), None);
    }
}
