use sea_orm::{DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::broker::BrokerApi;
use crate::db::models::CredentialValues;
use crate::db::services as db_services;
use crate::services::encryption_service::EncryptionService;
use crate::web::error::AppError;

/// Logs into the broker with the given account and, on success, makes it the
/// user's linked account and stores the balance the broker reported.
/// A rejected login changes nothing. A session whose user no longer exists is
/// refused before the broker is contacted.
pub async fn authenticate_with_broker(
    db: &DatabaseConnection,
    broker: &dyn BrokerApi,
    encryption: &EncryptionService,
    user_id: &str,
    email: &str,
    password: &str,
) -> Result<f64, AppError> {
    if db_services::get_user_by_id(db, user_id).await?.is_none() {
        warn!(user_id, "Session user no longer exists.");
        return Err(AppError::Unauthorized);
    }

    let outcome = broker.authenticate(email, password).await?;

    if !outcome.success {
        warn!(user_id, "Broker rejected the supplied credentials.");
        return Err(AppError::BrokerAuthenticationFailed);
    }

    let values = CredentialValues {
        email: email.to_owned(),
        encrypted_password: encryption.encrypt(password)?,
    };

    db_services::replace_credentials(db, user_id, &values, outcome.balance)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotFound(_) => AppError::Unauthorized,
            other => AppError::from(other),
        })?;

    info!(user_id, balance = outcome.balance, "Broker account linked.");
    Ok(outcome.balance)
}
