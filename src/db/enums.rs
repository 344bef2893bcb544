use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Betting strategy as stored. The wire naming lives in `web::models::StrategyName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "strategy_enum")]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    #[sea_orm(string_value = "blackRedBlack")]
    BlackRedBlack,
    #[sea_orm(string_value = "redBlackRed")]
    RedBlackRed,
    #[sea_orm(string_value = "blackBlackBlack")]
    BlackBlackBlack,
    #[sea_orm(string_value = "redRedRed")]
    RedRedRed,
}

impl Strategy {
    /// The three consecutive results that trigger a bet.
    pub fn pattern(self) -> [BetColor; 3] {
        use BetColor::{Black, Red};
        match self {
            Strategy::BlackRedBlack => [Black, Red, Black],
            Strategy::RedBlackRed => [Red, Black, Red],
            Strategy::BlackBlackBlack => [Black, Black, Black],
            Strategy::RedRedRed => [Red, Red, Red],
        }
    }

    /// The color wagered once the pattern shows up.
    pub fn bet_on(self) -> BetColor {
        match self {
            Strategy::BlackRedBlack | Strategy::BlackBlackBlack => BetColor::Red,
            Strategy::RedBlackRed | Strategy::RedRedRed => BetColor::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "bet_color_enum")]
#[serde(rename_all = "lowercase")]
pub enum BetColor {
    #[sea_orm(string_value = "red")]
    Red,
    #[sea_orm(string_value = "black")]
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "bot_status_enum")]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "offline")]
    Offline,
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotStatus::Online => write!(f, "online"),
            BotStatus::Offline => write!(f, "offline"),
        }
    }
}
