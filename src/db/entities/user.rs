use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::BotStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub balance: f64,
    pub status: BotStatus,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::credential::Entity")]
    Credential,

    #[sea_orm(has_one = "super::strategy_config::Entity")]
    StrategyConfig,

    #[sea_orm(has_many = "super::bet::Entity")]
    Bets,

    #[sea_orm(has_many = "super::balance_track::Entity")]
    BalanceTracks,
}

impl Related<super::credential::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credential.def()
    }
}

impl Related<super::strategy_config::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StrategyConfig.def()
    }
}

impl Related<super::bet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bets.def()
    }
}

impl Related<super::balance_track::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BalanceTracks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
