use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Extension, Json, Router,
};
use std::sync::Arc;

use crate::services::activation_service;
use crate::web::models::{AuthenticatedUser, ConfigPayload, UserDetails};
use crate::web::validation::parse_json;
use crate::web::{error::AppError, AppState};

pub fn create_bot_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activate", post(activate))
        .route("/deactivate", post(deactivate))
}

async fn activate(
    State(app_state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<ConfigPayload>, JsonRejection>,
) -> Result<Json<UserDetails>, AppError> {
    let config = parse_json(payload)?;

    let record = activation_service::activate(
        &app_state.db_pool,
        app_state.broker.as_ref(),
        &app_state.encryption,
        &auth_user.id,
        (&config).into(),
    )
    .await?;

    Ok(Json(record.into()))
}

async fn deactivate(
    State(app_state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<UserDetails>, AppError> {
    let record = activation_service::deactivate(&app_state.db_pool, &auth_user.id).await?;
    Ok(Json(record.into()))
}
