use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::deserialize_amount;
use crate::db::entities::{balance_track, bet, credential, strategy_config};
use crate::db::enums::{BetColor, BotStatus, Strategy};
use crate::db::models::{ConfigValues, NewBalanceTrack, NewBet, UserWithRelations};
use crate::web::models::deserialize_nullable;
use crate::web::validation::{check_positive, is_valid_email, FieldErrors, Validate};
use crate::web::middleware::i18n::current_locale;

pub const MAX_GALES: i32 = 2;

/// Strategy names as the dashboard sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyName {
    #[serde(rename = "black-red-black")]
    BlackRedBlack,
    #[serde(rename = "red-black-red")]
    RedBlackRed,
    #[serde(rename = "black-black-black")]
    BlackBlackBlack,
    #[serde(rename = "red-red-red")]
    RedRedRed,
}

impl From<StrategyName> for Strategy {
    fn from(name: StrategyName) -> Self {
        match name {
            StrategyName::BlackBlackBlack => Strategy::BlackBlackBlack,
            StrategyName::BlackRedBlack => Strategy::BlackRedBlack,
            StrategyName::RedBlackRed => Strategy::RedBlackRed,
            StrategyName::RedRedRed => Strategy::RedRedRed,
        }
    }
}

impl From<Strategy> for StrategyName {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BlackBlackBlack => StrategyName::BlackBlackBlack,
            Strategy::BlackRedBlack => StrategyName::BlackRedBlack,
            Strategy::RedBlackRed => StrategyName::RedBlackRed,
            Strategy::RedRedRed => StrategyName::RedRedRed,
        }
    }
}

// --- Request payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPayload {
    pub strategy: StrategyName,
    #[serde(deserialize_with = "deserialize_amount")]
    pub entry: f64,
    pub gales: i32,
    #[serde(deserialize_with = "deserialize_amount")]
    pub stop_win: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub stop_loss: f64,
}

impl ConfigPayload {
    fn collect_errors(&self, errors: &mut FieldErrors) {
        check_positive(errors, "entry", self.entry);
        check_positive(errors, "stopWin", self.stop_win);
        check_positive(errors, "stopLoss", self.stop_loss);
        if !(0..=MAX_GALES).contains(&self.gales) {
            errors.add("gales", t!("validation.gales_out_of_range", locale = &current_locale()));
        }
    }
}

impl Validate for ConfigPayload {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.collect_errors(&mut errors);
        errors.into_result()
    }
}

impl From<&ConfigPayload> for ConfigValues {
    fn from(payload: &ConfigPayload) -> Self {
        ConfigValues {
            strategy: payload.strategy.into(),
            entry: payload.entry,
            gales: payload.gales,
            stop_win: payload.stop_win,
            stop_loss: payload.stop_loss,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetPayload {
    pub color: BetColor,
    pub time: DateTime<Utc>,
    pub entry: f64,
    pub gains: f64,
    pub result: bool,
}

impl From<&BetPayload> for NewBet {
    fn from(payload: &BetPayload) -> Self {
        NewBet {
            color: payload.color,
            time: payload.time,
            entry: payload.entry,
            gains: payload.gains,
            result: payload.result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceTrackPayload {
    pub value: f64,
    pub time: DateTime<Utc>,
}

impl From<&BalanceTrackPayload> for NewBalanceTrack {
    fn from(payload: &BalanceTrackPayload) -> Self {
        NewBalanceTrack {
            value: payload.value,
            time: payload.time,
        }
    }
}

/// Partial user update. Every field is optional; for `credentials` and
/// `config` an explicit `null` removes the relation. Null arrays and scalars
/// are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub credentials: Option<Option<CredentialsPayload>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub config: Option<Option<ConfigPayload>>,
    pub balance: Option<f64>,
    pub status: Option<BotStatus>,
    pub bets: Option<Vec<BetPayload>>,
    pub balance_tracks: Option<Vec<BalanceTrackPayload>>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(Some(credentials)) = &self.credentials {
            if !is_valid_email(&credentials.email) {
                errors.add("credentials.email", t!("validation.invalid_email", locale = &current_locale()));
            }
        }
        if let Some(Some(config)) = &self.config {
            config.collect_errors(&mut errors);
        }
        if self.balance.is_some_and(|b| !b.is_finite()) {
            errors.add("balance", t!("validation.invalid_value", locale = &current_locale()));
        }
        errors.into_result()
    }
}

// --- Response views ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsView {
    pub email: String,
    pub updated_at: DateTime<Utc>,
}

impl From<credential::Model> for CredentialsView {
    fn from(model: credential::Model) -> Self {
        Self {
            email: model.email,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView {
    pub strategy: StrategyName,
    pub pattern: [BetColor; 3],
    pub bet_on: BetColor,
    pub entry: f64,
    pub gales: i32,
    pub stop_win: f64,
    pub stop_loss: f64,
    pub updated_at: DateTime<Utc>,
}

impl From<strategy_config::Model> for ConfigView {
    fn from(model: strategy_config::Model) -> Self {
        Self {
            strategy: model.strategy.into(),
            pattern: model.strategy.pattern(),
            bet_on: model.strategy.bet_on(),
            entry: model.entry,
            gales: model.gales,
            stop_win: model.stop_win,
            stop_loss: model.stop_loss,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetView {
    pub id: i32,
    pub color: BetColor,
    pub time: DateTime<Utc>,
    pub entry: f64,
    pub gains: f64,
    pub result: bool,
}

impl From<bet::Model> for BetView {
    fn from(model: bet::Model) -> Self {
        Self {
            id: model.id,
            color: model.color,
            time: model.time,
            entry: model.entry,
            gains: model.gains,
            result: model.result,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTrackView {
    pub id: i32,
    pub value: f64,
    pub time: DateTime<Utc>,
}

impl From<balance_track::Model> for BalanceTrackView {
    fn from(model: balance_track::Model) -> Self {
        Self {
            id: model.id,
            value: model.value,
            time: model.time,
        }
    }
}

/// The user record returned by the user and bot routes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub balance: f64,
    pub status: BotStatus,
    pub credentials: Option<CredentialsView>,
    pub config: Option<ConfigView>,
    pub bets: Vec<BetView>,
    pub balance_tracks: Vec<BalanceTrackView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserWithRelations> for UserDetails {
    fn from(record: UserWithRelations) -> Self {
        let user = record.user;
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            is_active: user.is_active,
            balance: user.balance,
            status: user.status,
            credentials: record.credential.map(Into::into),
            config: record.config.map(Into::into),
            bets: record.bets.into_iter().map(Into::into).collect(),
            balance_tracks: record.balance_tracks.into_iter().map(Into::into).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
