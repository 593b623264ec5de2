use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use eventdesk_auth::TokenValidator;

use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenValidator>,
}

/// Attach a [`PrincipalContext`] when the request carries a valid bearer token.
///
/// Requests without a bearer token pass through anonymously; handlers decide
/// whether they need a principal. A bearer token that fails verification is
/// rejected with 401.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(token) = extract_bearer(req.headers())? {
        let claims = state.tokens.validate(token, Utc::now()).map_err(|e| {
            tracing::debug!("rejected bearer token: {e}");
            StatusCode::UNAUTHORIZED
        })?;

        req.extensions_mut().insert(PrincipalContext::from(claims));
    }

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, StatusCode> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Other schemes (e.g. Basic) are not ours to judge here.
    let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Ok(None);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Some(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn basic_scheme_is_ignored() {
        assert_eq!(extract_bearer(&headers("Basic bXlBcHA6cGFzcw==")), Ok(None));
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Ok(Some("abc.def")));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_bearer(&headers("bearer abc.def")), Ok(Some("abc.def")));
        assert_eq!(extract_bearer(&headers("BEARER abc.def")), Ok(Some("abc.def")));
    }

    #[test]
    fn bare_bearer_is_rejected() {
        assert_eq!(extract_bearer(&headers("Bearer")), Err(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn empty_bearer_is_rejected() {
        assert_eq!(extract_bearer(&headers("Bearer   ")), Err(StatusCode::UNAUTHORIZED));
    }
}
