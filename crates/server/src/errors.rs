use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::customer::validation::{FieldViolation, ValidationErrors};
use service::errors::ServiceError;
use tracing::error;

/// Error body shared by every failing endpoint:
/// `{"status": 404, "error": "Not Found", "message": "...", "errors": [...]}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
}

#[derive(Serialize)]
struct Body<'a> {
    status: u16,
    #[serde(flatten)]
    inner: &'a JsonApiError,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        let error = title.into();
        let message = detail.unwrap_or_else(|| error.clone());
        Self { status, error, message, errors: Vec::new() }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Validation Error".into(),
            message: "request has invalid fields".into(),
            errors: errors.violations().to_vec(),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = Body { status: self.status.as_u16(), inner: &self };
        (self.status, Json(serde_json::to_value(&body).unwrap_or_default())).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errors) => Self::validation(errors),
            ServiceError::Conflict { .. } => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Db(ref detail) => {
                error!(code = e.code(), error = %detail, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some("unexpected storage failure".into()))
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, "Malformed Request", Some(rejection.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid Path Parameter", Some(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::customer::domain::UniqueField;

    #[test]
    fn maps_service_errors_to_status() {
        let conflict = JsonApiError::from(ServiceError::conflict(UniqueField::Email, "a@x.com"));
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.message, "customer already exists with email: a@x.com");

        let missing = JsonApiError::from(ServiceError::not_found_by("id", 7));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.message, "customer not found with id: 7");

        let db = JsonApiError::from(ServiceError::Db("connection reset".into()));
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!db.message.contains("connection reset"));
    }

    #[test]
    fn validation_failure_lists_fields() {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 11, 21).unwrap();
        let draft = service::customer::domain::CustomerDraft::default();
        let errors = service::customer::validation::validate(&draft, today).unwrap_err();

        let e = JsonApiError::from(ServiceError::from(errors));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.errors.len(), 7);
        assert_eq!(e.errors[0].field, "firstName");
    }

    #[test]
    fn body_omits_empty_field_errors() {
        let e = JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", None);
        let v = serde_json::to_value(Body { status: 404, inner: &e }).unwrap();
        assert_eq!(v["status"], 404);
        assert_eq!(v["error"], "Not Found");
        assert_eq!(v["message"], "Not Found");
        assert!(v.get("errors").is_none());
    }
}
