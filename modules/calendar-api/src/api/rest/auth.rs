//! Authentication middleware.
//!
//! Requests without an `Authorization` header continue as anonymous; the
//! row-scoping filter decides later whether that is enough. A header that is
//! present but malformed or rejected ends the request with 401.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use calendar_security::SecurityContext;
use http::{HeaderMap, StatusCode, header};

use crate::api::rest::problem::Problem;
use crate::authn::{AuthnError, PrincipalResolver};

pub async fn authn_middleware(
    State(resolver): State<Arc<dyn PrincipalResolver>>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = if req.headers().contains_key(header::AUTHORIZATION) {
        let Some(token) = extract_bearer_token(req.headers()) else {
            return Problem::new(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Missing or invalid Authorization header",
            )
            .into_response();
        };
        match resolver.authenticate(token).await {
            Ok(ctx) => ctx,
            Err(err) => return authn_error_to_response(&err),
        }
    } else {
        SecurityContext::anonymous()
    };

    req.extensions_mut().insert(ctx);
    next.run(req).await
}

fn authn_error_to_response(err: &AuthnError) -> Response {
    let (status, title, detail) = match err {
        AuthnError::Unauthorized(msg) => {
            tracing::debug!(reason = %msg, "authentication rejected");
            (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Authentication failed",
            )
        }
        AuthnError::Unavailable(msg) => {
            tracing::error!(reason = %msg, "authentication service unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable",
                "Authentication service unavailable",
            )
        }
    };
    Problem::new(status, title, detail).into_response()
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc ")), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer ")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn unavailable_resolver_maps_to_503() {
        let resp = authn_error_to_response(&AuthnError::Unavailable("down".to_owned()));
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
