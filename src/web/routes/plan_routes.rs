use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::services::plan_service;
use crate::web::models::plan_models::PlanView;
use crate::web::AppState;

pub fn create_plan_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_plans))
}

async fn list_plans() -> Json<Vec<PlanView>> {
    Json(plan_service::catalog())
}
