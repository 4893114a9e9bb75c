use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TasteSignals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TasteSignals::UserId).uuid().not_null())
                    .col(ColumnDef::new(TasteSignals::Tag).string().not_null())
                    .col(
                        ColumnDef::new(TasteSignals::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TasteSignals::DislikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TasteSignals::LastInteractedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(Index::create().col(TasteSignals::UserId).col(TasteSignals::Tag))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TasteSignals::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TasteSignals {
    Table,
    UserId,
    Tag,
    LikeCount,
    DislikeCount,
    LastInteractedAt,
}
