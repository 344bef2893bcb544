use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::broker::BrokerApi;
use crate::server::config::ServerConfig;
use crate::services::auth_service;
use crate::services::encryption_service::EncryptionService;
use crate::web::{
    error::AppError,
    middleware::{auth, i18n},
    models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
    routes::*,
    validation::parse_json,
};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod validation;

const SESSION_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub broker: Arc<dyn BrokerApi>,
    pub encryption: Arc<EncryptionService>,
    pub config: Arc<ServerConfig>,
}

async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let request = parse_json(payload)?;
    let user_response =
        auth_service::register_user(&app_state.db_pool, request, app_state.config.bcrypt_cost)
            .await?;
    Ok(Json(user_response))
}

fn with_cookie(mut response: Response, cookie: Cookie<'_>) -> Result<Response, AppError> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::InternalServerError(format!("Invalid cookie header: {e}")))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = parse_json(payload)?;
    let login_response: LoginResponse =
        auth_service::login_user(&app_state.db_pool, request, &app_state.config.jwt_secret).await?;

    let auth_cookie = Cookie::build((SESSION_COOKIE, login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    with_cookie(Json(login_response).into_response(), auth_cookie)
}

async fn logout_handler() -> Result<Response, AppError> {
    let mut expired = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();
    expired.make_removal();

    with_cookie(
        Json(serde_json::json!({ "success": true })).into_response(),
        expired,
    )
}

async fn health_check_handler() -> &'static str {
    "OK"
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => cors
            .allow_origin(origin)
            .allow_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT_LANGUAGE,
            ])
            .allow_credentials(true),
        // Config validation rejects such origins; stay closed if one slips through.
        Err(e) => {
            error!(error = %e, frontend_url, "Invalid frontend origin, cross-origin requests disabled.");
            cors
        }
    }
}

pub fn create_axum_router(
    db_pool: DatabaseConnection,
    broker: Arc<dyn BrokerApi>,
    encryption: Arc<EncryptionService>,
    config: Arc<ServerConfig>,
) -> Router {
    let cors = cors_layer(&config.frontend_url);

    let app_state = Arc::new(AppState {
        db_pool,
        broker,
        encryption,
        config,
    });

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(auth_service::me).route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)))
        .nest("/api/plans", plan_routes::create_plan_router())
        .nest(
            "/api/session",
            session_routes::create_session_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::optional_auth)),
        )
        .nest(
            "/api/authenticate",
            authenticate_routes::create_authenticate_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/users",
            user_routes::create_user_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/bot",
            bot_routes::create_bot_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .with_state(app_state)
        .layer(axum_middleware::from_fn(i18n::i18n_middleware))
        .layer(cors)
}
