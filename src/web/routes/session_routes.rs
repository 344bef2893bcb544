//! Where each dashboard page sends the visitor, given whether they are signed in.

use axum::{
    extract::Query,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::web::models::AuthenticatedUser;
use crate::web::AppState;

const LOGIN_PAGE: &str = "/accounts/login";
const DASHBOARD_PAGE: &str = "/dashboard";
const AUTH_PAGES: [&str; 2] = ["/accounts/login", "/accounts/register"];
const PROTECTED_PAGES: [&str; 3] = ["/", "/dashboard", "/plans"];

pub fn create_session_router() -> Router<Arc<AppState>> {
    Router::new().route("/redirect", get(redirect))
}

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub authenticated: bool,
    pub redirect: Option<&'static str>,
}

pub fn redirect_for(path: &str, authenticated: bool) -> Option<&'static str> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    if authenticated {
        (path == "/" || AUTH_PAGES.contains(&path)).then_some(DASHBOARD_PAGE)
    } else {
        PROTECTED_PAGES.contains(&path).then_some(LOGIN_PAGE)
    }
}

async fn redirect(
    Extension(auth_user): Extension<Option<AuthenticatedUser>>,
    Query(query): Query<RedirectQuery>,
) -> Json<RedirectResponse> {
    let authenticated = auth_user.is_some();
    Json(RedirectResponse {
        authenticated,
        redirect: redirect_for(&query.path, authenticated),
    })
}
