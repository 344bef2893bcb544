use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::services::auth_service;
use crate::web::models::AuthenticatedUser;
use crate::web::{error::AppError, AppState};

/// Session token from the Authorization header, falling back to the cookie.
fn extract_token(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
}

/// Rejects the request with 401 unless it carries a valid session.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers(), &jar).ok_or(AppError::Unauthorized)?;
    let authenticated_user = auth_service::verify_token(&token, &state.config.jwt_secret)?;

    req.extensions_mut().insert(authenticated_user);
    Ok(next.run(req).await)
}

/// Like [`auth`] but never rejects; inserts `Option<AuthenticatedUser>`.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Response {
    let authenticated_user: Option<AuthenticatedUser> = extract_token(req.headers(), &jar)
        .and_then(|token| auth_service::verify_token(&token, &state.config.jwt_secret).ok());

    req.extensions_mut().insert(authenticated_user);
    next.run(req).await
}
