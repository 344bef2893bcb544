use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::db::entities::{balance_track, bet, credential, strategy_config, user};
use crate::db::enums::BotStatus;
use crate::db::models::{UserChanges, UserWithRelations};
use crate::db::services::{config_service, credential_service, history_service};

// --- User Service Functions ---

/// Creates a new, inactive user.
pub async fn create_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<user::Model, DbErr> {
    let now = Utc::now();
    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.to_owned()),
        email: Set(email.to_owned()),
        password_hash: Set(password_hash.to_owned()),
        is_active: Set(false),
        balance: Set(0.0),
        status: Set(BotStatus::Offline),
        created_at: Set(now),
        updated_at: Set(now),
    };
    new_user.insert(db).await
}

pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(user_id.to_owned()).one(db).await
}

pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

/// Loads a user together with credentials, config and history.
pub async fn get_user_with_relations(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<UserWithRelations>, DbErr> {
    match get_user_by_id(db, user_id).await? {
        Some(user_model) => Ok(Some(load_relations(db, user_model).await?)),
        None => Ok(None),
    }
}

async fn load_relations<C: ConnectionTrait>(
    conn: &C,
    user_model: user::Model,
) -> Result<UserWithRelations, DbErr> {
    let credential = user_model.find_related(credential::Entity).one(conn).await?;
    let config = user_model
        .find_related(strategy_config::Entity)
        .one(conn)
        .await?;
    let bets = user_model
        .find_related(bet::Entity)
        .order_by_asc(bet::Column::Time)
        .all(conn)
        .await?;
    let balance_tracks = user_model
        .find_related(balance_track::Entity)
        .order_by_asc(balance_track::Column::Time)
        .all(conn)
        .await?;

    Ok(UserWithRelations {
        user: user_model,
        credential,
        config,
        bets,
        balance_tracks,
    })
}

/// Applies a partial update. History rows are appended first, then the user
/// row is written once, then credentials and config are upserted or removed.
/// Everything runs in one transaction. Returns `None` when the user does not
/// exist, in which case nothing is written.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: &str,
    changes: UserChanges,
) -> Result<Option<UserWithRelations>, DbErr> {
    let txn = db.begin().await?;

    let Some(user_model) = user::Entity::find_by_id(user_id.to_owned()).one(&txn).await? else {
        return Ok(None);
    };

    let bets_inserted = history_service::insert_bets(&txn, user_id, &changes.bets).await?;
    let tracks_inserted =
        history_service::insert_balance_tracks(&txn, user_id, &changes.balance_tracks).await?;

    let mut active_user: user::ActiveModel = user_model.into();
    if let Some(name) = changes.name {
        active_user.name = Set(name);
    }
    if let Some(is_active) = changes.is_active {
        active_user.is_active = Set(is_active);
    }
    if let Some(balance) = changes.balance {
        active_user.balance = Set(balance);
    }
    if let Some(status) = changes.status {
        active_user.status = Set(status);
    }
    active_user.updated_at = Set(Utc::now());
    let updated_user = active_user.update(&txn).await?;

    match changes.credentials {
        Some(Some(values)) => {
            credential_service::upsert_credentials(&txn, user_id, &values).await?;
        }
        Some(None) => {
            credential_service::delete_credentials(&txn, user_id).await?;
        }
        None => {}
    }

    match changes.config {
        Some(Some(values)) => {
            config_service::upsert_config(&txn, user_id, &values).await?;
        }
        Some(None) => {
            config_service::delete_config(&txn, user_id).await?;
        }
        None => {}
    }

    let result = load_relations(&txn, updated_user).await?;
    txn.commit().await?;

    debug!(
        user_id,
        bets_inserted, tracks_inserted, "User record updated."
    );
    Ok(Some(result))
}
