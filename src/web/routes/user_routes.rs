use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::models::{CredentialValues, UserChanges};
use crate::db::services as db_services;
use crate::services::encryption_service::EncryptionService;
use crate::web::models::{AuthenticatedUser, UpdateUserRequest, UserDetails};
use crate::web::validation::parse_json;
use crate::web::{error::AppError, AppState};

pub fn create_user_router() -> Router<Arc<AppState>> {
    Router::new().route("/{user_id}", get(get_user).patch(update_user))
}

/// Sessions may only read and change their own user.
fn ensure_owner(auth_user: &AuthenticatedUser, user_id: &str) -> Result<(), AppError> {
    if auth_user.id != user_id {
        warn!(session_user = %auth_user.id, user_id, "Access to another user's record refused.");
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

async fn get_user(
    State(app_state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetails>, AppError> {
    let record = db_services::get_user_with_relations(&app_state.db_pool, &user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;
    ensure_owner(&auth_user, &user_id)?;
    Ok(Json(record.into()))
}

async fn update_user(
    State(app_state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserDetails>, AppError> {
    // The user is looked up before the body is looked at.
    if db_services::get_user_by_id(&app_state.db_pool, &user_id)
        .await?
        .is_none()
    {
        return Err(AppError::UserNotFound);
    }
    ensure_owner(&auth_user, &user_id)?;

    let request = parse_json(payload)?;
    let changes = into_changes(request, &app_state.encryption)?;

    let record = db_services::update_user(&app_state.db_pool, &user_id, changes)
        .await?
        .ok_or(AppError::UserNotFound)?;

    info!(user_id = %user_id, "User updated.");
    Ok(Json(record.into()))
}

fn into_changes(
    request: UpdateUserRequest,
    encryption: &EncryptionService,
) -> Result<UserChanges, AppError> {
    let credentials = match request.credentials {
        Some(Some(payload)) => Some(Some(CredentialValues {
            email: payload.email.trim().to_string(),
            encrypted_password: encryption.encrypt(&payload.password)?,
        })),
        Some(None) => Some(None),
        None => None,
    };

    Ok(UserChanges {
        name: request.name,
        is_active: request.is_active,
        balance: request.balance,
        status: request.status,
        credentials,
        config: request.config.map(|config| config.as_ref().map(Into::into)),
        bets: request.bets.iter().flatten().map(Into::into).collect(),
        balance_tracks: request.balance_tracks.iter().flatten().map(Into::into).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_encryption;

    #[test]
    fn test_ensure_owner() {
        let session = AuthenticatedUser {
            id: "u-1".to_string(),
            email: "owner@example.com".to_string(),
        };
        assert!(ensure_owner(&session, "u-1").is_ok());
        assert!(matches!(ensure_owner(&session, "u-2"), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_into_changes_encrypts_credentials() {
        let request: UpdateUserRequest = serde_json::from_str(
            r#"{"credentials": {"email": " lia@broker.com ", "password": "pw"}, "config": null}"#,
        )
        .unwrap();
        let encryption = test_encryption();

        let changes = into_changes(request, &encryption).unwrap();

        let credentials = changes.credentials.unwrap().unwrap();
        assert_eq!(credentials.email, "lia@broker.com");
        assert_eq!(encryption.decrypt(&credentials.encrypted_password).unwrap(), "pw");
        assert_eq!(changes.config, Some(None));
        assert!(changes.bets.is_empty());
    }
}
