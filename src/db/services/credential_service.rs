use chrono::Utc;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, Set, TransactionTrait,
};

use crate::db::entities::{credential, user};
use crate::db::models::CredentialValues;

pub async fn get_credentials(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<credential::Model>, DbErr> {
    credential::Entity::find()
        .filter(credential::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Replaces the user's broker login and stores the balance reported by the
/// broker, atomically. Fails with `RecordNotFound` if the user is gone, before
/// any credential row is touched.
pub async fn replace_credentials(
    db: &DatabaseConnection,
    user_id: &str,
    values: &CredentialValues,
    balance: f64,
) -> Result<credential::Model, DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let result = user::Entity::update_many()
        .col_expr(user::Column::Balance, Expr::value(balance))
        .col_expr(user::Column::UpdatedAt, Expr::value(now))
        .filter(user::Column::Id.eq(user_id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(DbErr::RecordNotFound(format!("user {user_id}")));
    }

    delete_credentials(&txn, user_id).await?;

    let created = credential::ActiveModel {
        user_id: Set(user_id.to_owned()),
        email: Set(values.email.clone()),
        password: Set(values.encrypted_password.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Creates the credential row or overwrites the existing one for this user.
pub async fn upsert_credentials<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    values: &CredentialValues,
) -> Result<credential::Model, DbErr> {
    let now = Utc::now();
    let existing = credential::Entity::find()
        .filter(credential::Column::UserId.eq(user_id))
        .one(conn)
        .await?;

    match existing {
        Some(model) => {
            let mut active = model.into_active_model();
            active.email = Set(values.email.clone());
            active.password = Set(values.encrypted_password.clone());
            active.updated_at = Set(now);
            active.update(conn).await
        }
        None => {
            credential::ActiveModel {
                user_id: Set(user_id.to_owned()),
                email: Set(values.email.clone()),
                password: Set(values.encrypted_password.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
        }
    }
}

pub async fn delete_credentials<C: ConnectionTrait>(conn: &C, user_id: &str) -> Result<u64, DbErr> {
    let result = credential::Entity::delete_many()
        .filter(credential::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
