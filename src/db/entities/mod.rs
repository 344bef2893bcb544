//! SeaORM entities for the dashboard schema.

pub mod balance_track;
pub mod bet;
pub mod credential;
pub mod strategy_config;
pub mod user;

pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::credential::Entity as Credential;
    pub use super::credential::Model as CredentialModel;
    pub use super::credential::ActiveModel as CredentialActiveModel;
    pub use super::credential::Column as CredentialColumn;

    pub use super::strategy_config::Entity as StrategyConfig;
    pub use super::strategy_config::Model as StrategyConfigModel;
    pub use super::strategy_config::ActiveModel as StrategyConfigActiveModel;
    pub use super::strategy_config::Column as StrategyConfigColumn;

    pub use super::bet::Entity as Bet;
    pub use super::bet::Model as BetModel;
    pub use super::bet::ActiveModel as BetActiveModel;
    pub use super::bet::Column as BetColumn;

    pub use super::balance_track::Entity as BalanceTrack;
    pub use super::balance_track::Model as BalanceTrackModel;
    pub use super::balance_track::ActiveModel as BalanceTrackActiveModel;
    pub use super::balance_track::Column as BalanceTrackColumn;
}
