use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set, TryIntoModel,
};

use crate::db::entities::strategy_config;
use crate::db::models::ConfigValues;

/// Creates the strategy config or overwrites the existing one for this user.
pub async fn upsert_config<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    values: &ConfigValues,
) -> Result<strategy_config::Model, DbErr> {
    let existing = strategy_config::Entity::find()
        .filter(strategy_config::Column::UserId.eq(user_id))
        .one(conn)
        .await?;

    let mut active = match existing {
        Some(model) => model.into_active_model(),
        None => strategy_config::ActiveModel {
            user_id: Set(user_id.to_owned()),
            ..Default::default()
        },
    };
    active.strategy = Set(values.strategy);
    active.entry = Set(values.entry);
    active.gales = Set(values.gales);
    active.stop_win = Set(values.stop_win);
    active.stop_loss = Set(values.stop_loss);
    active.updated_at = Set(Utc::now());

    active.save(conn).await?.try_into_model()
}

pub async fn delete_config<C: ConnectionTrait>(conn: &C, user_id: &str) -> Result<u64, DbErr> {
    let result = strategy_config::Entity::delete_many()
        .filter(strategy_config::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
