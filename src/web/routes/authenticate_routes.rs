use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};
use std::sync::Arc;

use crate::services::broker_service;
use crate::web::models::{AuthenticateRequest, AuthenticateResponse, AuthenticatedUser};
use crate::web::validation::parse_json;
use crate::web::{error::AppError, AppState};

pub fn create_authenticate_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(authenticate))
}

/// Links the session user's broker account and reports its balance.
async fn authenticate(
    State(app_state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Json<AuthenticateResponse>, AppError> {
    let request = parse_json(payload)?;

    let balance = broker_service::authenticate_with_broker(
        &app_state.db_pool,
        app_state.broker.as_ref(),
        &app_state.encryption,
        &auth_user.id,
        request.email.trim(),
        &request.password,
    )
    .await?;

    Ok(Json(AuthenticateResponse { balance }))
}
