use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::fmt;
use storage::{dto::validation::FieldViolation, error::StorageError, models::DetailKind};

/// Gateway call that failed, used to word the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListUsers,
    FetchUser,
    UpdateUser,
    UpdateSession,
    InsertDetail(DetailKind),
}

impl Operation {
    fn message(&self) -> String {
        match self {
            Self::ListUsers => "Failed to retrieve users".to_string(),
            Self::FetchUser => "Failed to get user".to_string(),
            Self::UpdateUser => "Failed to update user".to_string(),
            Self::UpdateSession => "Failed to update session".to_string(),
            Self::InsertDetail(kind) => format!("Failed to create {}", kind),
        }
    }
}

/// Outcome of deleting a detail record after its link step failed.
#[derive(Debug)]
pub enum Rollback {
    Completed,
    Failed(StorageError),
}

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    InvalidId(String),
    BadBody(String),
    ValidationFailed(FieldViolation),
    AlreadyAttached(DetailKind),
    AlreadyFinished,
    /// Missing or malformed `Authorization` header.
    Unauthorized,
    /// Well-formed header, but no active session behind it.
    Unauthenticated(StorageError),
    /// The user collection is empty.
    Empty,
    Persistence {
        op: Operation,
        source: StorageError,
    },
    LinkFailed {
        kind: DetailKind,
        source: StorageError,
        rollback: Rollback,
    },
}

impl WebError {
    pub fn persistence(op: Operation) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Persistence { op, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::BadBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::AlreadyFinished => StatusCode::BAD_REQUEST,
            Self::AlreadyAttached(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Unauthenticated(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Empty => StatusCode::NOT_FOUND,
            Self::Persistence {
                op: Operation::UpdateSession,
                ..
            } => StatusCode::BAD_REQUEST,
            Self::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::LinkFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::InvalidId(e) => json!({
                "error": e,
                "message": "Invalid Id"
            }),
            Self::BadBody(e) => json!({
                "error": "Failed to parse request body",
                "message": e
            }),
            Self::ValidationFailed(violation) => json!({
                "error": violation.reason,
                "message": violation.message,
                "field": violation.field
            }),
            Self::AlreadyAttached(kind) => json!({
                "error": format!("User already has an {}", kind),
                "message": format!("Failed to create {}", kind)
            }),
            Self::AlreadyFinished => json!({
                "error": "User already finished profile",
                "message": "User already finished profile"
            }),
            Self::Unauthorized => json!({
                "error": "Invalid header"
            }),
            Self::Unauthenticated(e) => json!({
                "error": "Failed to get session",
                "message": e.to_string(),
                "status": "unauthenticated"
            }),
            Self::Empty => json!({
                "error": "No users found"
            }),
            Self::Persistence { op, source } => json!({
                "error": source.to_string(),
                "message": op.message()
            }),
            Self::LinkFailed {
                kind,
                source,
                rollback,
            } => {
                let mut body = json!({
                    "error": source.to_string(),
                    "message": format!("Failed to link {} to user", kind),
                });
                match rollback {
                    Rollback::Completed => {
                        body["rollback"] = json!("completed");
                    }
                    Rollback::Failed(e) => {
                        body["rollback"] = json!("failed");
                        body["rollback_error"] = json!(e.to_string());
                    }
                }
                body
            }
        }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId(e) => write!(f, "Invalid id: {}", e),
            Self::BadBody(e) => write!(f, "Bad request body: {}", e),
            Self::ValidationFailed(v) => write!(f, "Validation failed: {}", v),
            Self::AlreadyAttached(kind) => write!(f, "User already has an {}", kind),
            Self::AlreadyFinished => write!(f, "User already finished profile"),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Unauthenticated(e) => write!(f, "Unauthenticated: {}", e),
            Self::Empty => write!(f, "No users found"),
            Self::Persistence { op, source } => write!(f, "{}: {}", op.message(), source),
            Self::LinkFailed {
                kind,
                source,
                rollback: Rollback::Completed,
            } => write!(f, "Failed to link {}: {} (rolled back)", kind, source),
            Self::LinkFailed {
                kind,
                source,
                rollback: Rollback::Failed(e),
            } => write!(
                f,
                "Failed to link {}: {} (rollback failed: {})",
                kind, source, e
            ),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (status_code, Json(self.body())).into_response()
    }
}

impl From<FieldViolation> for WebError {
    fn from(violation: FieldViolation) -> Self {
        Self::ValidationFailed(violation)
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_sync_failure_is_client_error() {
        let err = WebError::Persistence {
            op: Operation::UpdateSession,
            source: StorageError::NotFound,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = WebError::Persistence {
            op: Operation::UpdateUser,
            source: StorageError::NotFound,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_link_failure_reports_both_errors() {
        let err = WebError::LinkFailed {
            kind: DetailKind::Org,
            source: StorageError::Unavailable("link".into()),
            rollback: Rollback::Failed(StorageError::Unavailable("delete".into())),
        };
        let body = err.body();
        assert_eq!(body["message"], "Failed to link org to user");
        assert_eq!(body["error"], "Store unavailable: link");
        assert_eq!(body["rollback"], "failed");
        assert_eq!(body["rollback_error"], "Store unavailable: delete");
    }

    #[test]
    fn test_unauthenticated_body_carries_status() {
        let body = WebError::Unauthenticated(StorageError::NotFound).body();
        assert_eq!(body["error"], "Failed to get session");
        assert_eq!(body["status"], "unauthenticated");
    }
}
