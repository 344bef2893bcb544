use axum::{extract::State, Extension, Json};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::entities::user;
use crate::db::services as db_services;
use crate::web::error::AppError;
use crate::web::AppState;
use crate::web::models::{
    AuthenticatedUser, Claims, LoginRequest, LoginResponse, RegisterRequest, UserResponse,
};

const TOKEN_TTL_HOURS: i64 = 24;

/// Creates an account. The request is expected to be validated already.
pub async fn register_user(
    db: &DatabaseConnection,
    req: RegisterRequest,
    bcrypt_cost: u32,
) -> Result<UserResponse, AppError> {
    let email = req.email.trim().to_lowercase();

    if db_services::get_user_by_email(db, &email).await?.is_some() {
        return Err(AppError::UserAlreadyExists);
    }

    let password_hash = hash(&req.password, bcrypt_cost)
        .map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    let user_model = db_services::create_user(db, req.name.trim(), &email, &password_hash)
        .await
        .map_err(registration_error)?;
    info!(user_id = %user_model.id, "New user registered.");

    Ok(UserResponse {
        user_id: user_model.id,
        name: user_model.name,
        email: user_model.email,
    })
}

/// A concurrent sign-up with the same email passes the lookup above and then
/// trips the unique index.
fn registration_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UserAlreadyExists,
        _ => AppError::from(err),
    }
}

pub async fn login_user(
    db: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = db_services::get_user_by_email(db, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;

    if !valid_password {
        warn!(user_id = %user.id, "Login attempt with a wrong password.");
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(user: &user::Model, jwt_secret: &str) -> Result<LoginResponse, AppError> {
    let expiration = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id.clone(),
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))?;

    Ok(LoginResponse {
        token,
        user_id: user.id.clone(),
        name: user.name.clone(),
    })
}

/// Decodes and verifies a session token.
pub fn verify_token(token: &str, jwt_secret: &str) -> Result<AuthenticatedUser, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(error = ?e, "JWT decoding error.");
        AppError::Unauthorized
    })?;

    Ok(AuthenticatedUser {
        id: token_data.claims.user_id,
        email: token_data.claims.sub,
    })
}

pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserResponse>, AppError> {
    let user_model = db_services::get_user_by_id(&app_state.db_pool, &user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserResponse {
        user_id: user_model.id,
        name: user_model.name,
        email: user_model.email,
    }))
}
