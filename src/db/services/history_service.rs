use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};

use crate::db::entities::{balance_track, bet};
use crate::db::models::{NewBalanceTrack, NewBet};

/// Appends bet rows for a user. Returns how many were written.
pub async fn insert_bets<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    bets: &[NewBet],
) -> Result<u64, DbErr> {
    if bets.is_empty() {
        return Ok(0);
    }

    let rows = bets.iter().map(|b| bet::ActiveModel {
        user_id: Set(user_id.to_owned()),
        color: Set(b.color),
        time: Set(b.time),
        entry: Set(b.entry),
        gains: Set(b.gains),
        result: Set(b.result),
        ..Default::default()
    });
    bet::Entity::insert_many(rows).exec(conn).await?;
    Ok(bets.len() as u64)
}

/// Appends balance snapshots for a user. Returns how many were written.
pub async fn insert_balance_tracks<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    tracks: &[NewBalanceTrack],
) -> Result<u64, DbErr> {
    if tracks.is_empty() {
        return Ok(0);
    }

    let rows = tracks.iter().map(|t| balance_track::ActiveModel {
        user_id: Set(user_id.to_owned()),
        value: Set(t.value),
        time: Set(t.time),
        ..Default::default()
    });
    balance_track::Entity::insert_many(rows).exec(conn).await?;
    Ok(tracks.len() as u64)
}
