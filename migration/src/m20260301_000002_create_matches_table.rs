use sea_orm_migration::prelude::*;

/// Creates the `matches` table. Match numbers are unique across the fixture list.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
    Date,
    MatchNumber,
    Team1,
    Team2,
    Group,
    Stadium,
    DateDt,
    WinOdds,
    LossOdds,
    DrawOdds,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Matches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Matches::Date).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Matches::MatchNumber)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Matches::Team1).string_len(100).not_null())
                    .col(ColumnDef::new(Matches::Team2).string_len(100).not_null())
                    .col(ColumnDef::new(Matches::Group).string_len(50).null())
                    .col(ColumnDef::new(Matches::Stadium).string_len(150).null())
                    .col(ColumnDef::new(Matches::DateDt).date().not_null())
                    .col(ColumnDef::new(Matches::WinOdds).double().null())
                    .col(ColumnDef::new(Matches::LossOdds).double().null())
                    .col(ColumnDef::new(Matches::DrawOdds).double().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await
    }
}
