use sea_orm_migration::prelude::*;

/// Pair rows are keyed on the normalized (user_a < user_b) pair so both
/// participants resolve to the same record.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PairChemistry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PairChemistry::UserA).uuid().not_null())
                    .col(ColumnDef::new(PairChemistry::UserB).uuid().not_null())
                    .col(ColumnDef::new(PairChemistry::Tag).string().not_null())
                    .col(
                        ColumnDef::new(PairChemistry::SwipeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PairChemistry::MatchCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PairChemistry::LastMatchedAt).timestamp_with_time_zone())
                    .primary_key(
                        Index::create()
                            .col(PairChemistry::UserA)
                            .col(PairChemistry::UserB)
                            .col(PairChemistry::Tag),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PairChemistry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PairChemistry {
    Table,
    UserA,
    UserB,
    Tag,
    SwipeCount,
    MatchCount,
    LastMatchedAt,
}
