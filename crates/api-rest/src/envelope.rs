//! Success and failure envelopes.
//!
//! Successful operations answer `200` with the payload wrapped under its key (`goals` or
//! `goal`). Failures answer with an [`ErrorRes`] and a status derived from the error kind;
//! storage failures are logged here and reported with a generic message.

use api_shared::{AuthError, ErrorBody, ErrorRes};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use goals_core::{GoalError, GoalResult};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<GoalError> for ApiError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::InvalidInput(message) => Self {
                status: StatusCode::BAD_REQUEST,
                code: "invalid_input",
                message,
            },
            GoalError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                code: "not_found",
                message: err.to_string(),
            },
            GoalError::OwnershipMismatch => Self {
                status: StatusCode::FORBIDDEN,
                code: "forbidden",
                message: err.to_string(),
            },
            other => {
                tracing::error!("goal storage error: {:?}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "storage_error",
                    message: "Internal error".into(),
                }
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "unauthenticated",
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_input",
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_input",
            message: rejection.body_text(),
        }
    }
}

/// JSON request body whose rejections answer with the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Path parameters whose rejections answer with the error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParams<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorRes {
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Wraps a controller result into its envelope: `wrap` builds the success body, errors become
/// an [`ApiError`].
pub fn construct<T, R>(
    result: GoalResult<T>,
    wrap: impl FnOnce(T) -> R,
) -> Result<Json<R>, ApiError> {
    result.map(|value| Json(wrap(value))).map_err(ApiError::from)
}
