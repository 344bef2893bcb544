use chrono::{DateTime, Utc};

use crate::db::entities::{balance_track, bet, credential, strategy_config, user};
use crate::db::enums::{BetColor, BotStatus, Strategy};

/// A user row with every relation the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithRelations {
    pub user: user::Model,
    pub credential: Option<credential::Model>,
    pub config: Option<strategy_config::Model>,
    pub bets: Vec<bet::Model>,
    pub balance_tracks: Vec<balance_track::Model>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValues {
    pub strategy: Strategy,
    pub entry: f64,
    pub gales: i32,
    pub stop_win: f64,
    pub stop_loss: f64,
}

/// Broker login ready to be stored; the password is already encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialValues {
    pub email: String,
    pub encrypted_password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBet {
    pub color: BetColor,
    pub time: DateTime<Utc>,
    pub entry: f64,
    pub gains: f64,
    pub result: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBalanceTrack {
    pub value: f64,
    pub time: DateTime<Utc>,
}

/// A partial user update. For `credentials` and `config`, `None` leaves the
/// relation alone, `Some(None)` removes it and `Some(Some(_))` upserts it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub balance: Option<f64>,
    pub status: Option<BotStatus>,
    pub credentials: Option<Option<CredentialValues>>,
    pub config: Option<Option<ConfigValues>>,
    pub bets: Vec<NewBet>,
    pub balance_tracks: Vec<NewBalanceTrack>,
}
