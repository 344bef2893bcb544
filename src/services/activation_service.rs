//! Turning the bot on and off.
//!
//! Activation refreshes the balance by logging into the broker again with the
//! stored credentials, checks that the chosen configuration fits the balance,
//! and only then marks the user online with the new config.

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::broker::BrokerApi;
use crate::db::enums::BotStatus;
use crate::db::models::{ConfigValues, UserChanges, UserWithRelations};
use crate::db::services as db_services;
use crate::services::broker_service;
use crate::services::encryption_service::EncryptionService;
use crate::web::error::AppError;
use crate::web::middleware::i18n::current_locale;
use crate::web::validation::FieldErrors;

/// Worst-case stake of one martingale cycle: the entry plus every doubled
/// protection bet, `entry × (2^(gales+1) − 1)`.
pub fn martingale_exposure(entry: f64, gales: i32) -> f64 {
    entry * (2f64.powi(gales + 1) - 1.0)
}

/// Checks a configuration against the account balance. Every rule is
/// evaluated so that all offending fields are reported together.
pub fn validate_against_balance(config: &ConfigValues, balance: f64) -> Result<(), FieldErrors> {
    let locale = current_locale();
    let mut errors = FieldErrors::new();

    if config.stop_loss > balance {
        errors.add("stopLoss", t!("activation.stop_loss_exceeds_balance", locale = &locale));
    }
    if config.entry > balance {
        errors.add("entry", t!("activation.entry_exceeds_balance", locale = &locale));
    }
    if martingale_exposure(config.entry, config.gales) > balance {
        errors.add("gales", t!("activation.gales_exceed_balance", locale = &locale));
    }

    errors.into_result()
}

pub async fn activate(
    db: &DatabaseConnection,
    broker: &dyn BrokerApi,
    encryption: &EncryptionService,
    user_id: &str,
    config: ConfigValues,
) -> Result<UserWithRelations, AppError> {
    let credential = db_services::get_credentials(db, user_id)
        .await?
        .ok_or(AppError::CredentialsRequired)?;
    let password = encryption.decrypt(&credential.password)?;

    let balance = broker_service::authenticate_with_broker(
        db,
        broker,
        encryption,
        user_id,
        &credential.email,
        &password,
    )
    .await?;

    if let Err(errors) = validate_against_balance(&config, balance) {
        warn!(user_id, balance, %errors, "Bot activation refused.");
        return Err(AppError::Validation(errors));
    }

    let changes = UserChanges {
        is_active: Some(true),
        status: Some(BotStatus::Online),
        config: Some(Some(config)),
        ..Default::default()
    };
    let updated = db_services::update_user(db, user_id, changes)
        .await?
        .ok_or(AppError::UserNotFound)?;

    info!(user_id, balance, "Bot activated.");
    Ok(updated)
}

/// Switches the bot off and drops its configuration. No balance check.
pub async fn deactivate(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<UserWithRelations, AppError> {
    let changes = UserChanges {
        is_active: Some(false),
        status: Some(BotStatus::Offline),
        config: Some(None),
        ..Default::default()
    };
    let updated = db_services::update_user(db, user_id, changes)
        .await?
        .ok_or(AppError::UserNotFound)?;

    info!(user_id, "Bot deactivated.");
    Ok(updated)
}
