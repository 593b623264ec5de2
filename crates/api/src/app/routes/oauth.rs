//! OAuth2 password grant.
//!
//! Clients authenticate with HTTP Basic credentials; the form carries
//! `grant_type=password`, `username` and `password`.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Extension},
    http::{header, HeaderMap},
    routing::post,
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use serde::Deserialize;

use eventdesk_auth::IssuedToken;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/oauth/token", post(token))
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `(client_id, client_secret)` from an `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

pub async fn token(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> Result<Json<IssuedToken>, ApiError> {
    let config = &services.config;
    match basic_credentials(&headers) {
        Some((id, secret)) if id == config.oauth_client_id && secret == config.oauth_client_secret => {}
        _ => {
            tracing::warn!("token request with bad client credentials");
            return Err(ApiError::invalid_client());
        }
    }

    let Form(request) = form?;
    match request.grant_type.as_deref() {
        Some("password") => {}
        Some(other) => return Err(ApiError::unsupported_grant_type(other)),
        None => return Err(ApiError::invalid_request("Missing grant type")),
    }

    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(ApiError::invalid_grant());
    };

    let account = services.accounts.authenticate(&username, &password).await?;
    let issued = services.token_issuer.issue(&account, Utc::now())?;

    tracing::info!(account_id = %account.id, "access token issued");
    Ok(Json(issued))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn basic_credentials_are_decoded() {
        let mut headers = HeaderMap::new();
        let encoded = STANDARD.encode("myApp:pass");
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
        );
        assert_eq!(
            basic_credentials(&headers),
            Some(("myApp".to_string(), "pass".to_string()))
        );
    }

    #[test]
    fn malformed_basic_credentials_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!"));
        assert_eq!(basic_credentials(&headers), None);
        assert_eq!(basic_credentials(&HeaderMap::new()), None);
    }
}
