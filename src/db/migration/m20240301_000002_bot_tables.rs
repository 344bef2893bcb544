use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn user_fk(table: impl IntoIden + 'static, column: impl IntoIden + 'static, name: &str) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Credentials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Credentials::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Credentials::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Credentials::Email).string().not_null())
                    .col(ColumnDef::new(Credentials::Password).text().not_null())
                    .col(
                        ColumnDef::new(Credentials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Credentials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut user_fk(
                        Credentials::Table,
                        Credentials::UserId,
                        "fk_credentials_user_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Configs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Configs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Configs::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(Configs::Strategy).string().not_null())
                    .col(ColumnDef::new(Configs::Entry).double().not_null())
                    .col(ColumnDef::new(Configs::Gales).integer().not_null())
                    .col(ColumnDef::new(Configs::StopWin).double().not_null())
                    .col(ColumnDef::new(Configs::StopLoss).double().not_null())
                    .col(
                        ColumnDef::new(Configs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut user_fk(
                        Configs::Table,
                        Configs::UserId,
                        "fk_configs_user_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bets::UserId).string().not_null())
                    .col(ColumnDef::new(Bets::Color).string().not_null())
                    .col(ColumnDef::new(Bets::Time).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Bets::Entry).double().not_null())
                    .col(ColumnDef::new(Bets::Gains).double().not_null())
                    .col(ColumnDef::new(Bets::Result).boolean().not_null())
                    .foreign_key(&mut user_fk(Bets::Table, Bets::UserId, "fk_bets_user_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bets_user_id_time")
                    .table(Bets::Table)
                    .col(Bets::UserId)
                    .col(Bets::Time)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BalanceTracks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BalanceTracks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BalanceTracks::UserId).string().not_null())
                    .col(ColumnDef::new(BalanceTracks::Value).double().not_null())
                    .col(
                        ColumnDef::new(BalanceTracks::Time)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut user_fk(
                        BalanceTracks::Table,
                        BalanceTracks::UserId,
                        "fk_balance_tracks_user_id",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_balance_tracks_user_id_time")
                    .table(BalanceTracks::Table)
                    .col(BalanceTracks::UserId)
                    .col(BalanceTracks::Time)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            BalanceTracks::Table.into_iden(),
            Bets::Table.into_iden(),
            Configs::Table.into_iden(),
            Credentials::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Credentials {
    Table,
    Id,
    UserId,
    Email,
    Password,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Configs {
    Table,
    Id,
    UserId,
    Strategy,
    Entry,
    Gales,
    StopWin,
    StopLoss,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Bets {
    Table,
    Id,
    UserId,
    Color,
    Time,
    Entry,
    Gains,
    Result,
}

#[derive(DeriveIden)]
enum BalanceTracks {
    Table,
    Id,
    UserId,
    Value,
    Time,
}
