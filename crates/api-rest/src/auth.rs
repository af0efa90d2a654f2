//! Request authentication middleware.
//!
//! Every `/api` route sits behind [`require_user`]. A request must present a configured token
//! either as `Authorization: Bearer <token>` or as `x-api-key: <token>`; the resolved
//! [`AuthenticatedUser`](api_shared::AuthenticatedUser) is attached to the request extensions for
//! handlers to extract.

use crate::envelope::ApiError;
use crate::AppState;
use api_shared::AuthError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_user(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let result = match presented_token(request.headers()) {
        Some(token) => state.tokens().authenticate(token),
        None => Err(AuthError::MissingCredentials),
    };

    match result {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(
                "rejected {} {}: {}",
                request.method(),
                request.uri().path(),
                e
            );
            ApiError::from(e).into_response()
        }
    }
}

fn presented_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
        .map(str::trim);

    bearer.or_else(|| {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_presented_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("def"));

        assert_eq!(presented_token(&headers), Some("abc"));
    }

    #[test]
    fn test_presented_token_falls_back_to_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        headers.insert(API_KEY_HEADER, HeaderValue::from_static(" def "));

        assert_eq!(presented_token(&headers), Some("def"));
        assert_eq!(presented_token(&HeaderMap::new()), None);
    }
}
