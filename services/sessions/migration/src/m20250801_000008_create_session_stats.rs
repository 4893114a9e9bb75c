use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionStats::SessionId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SessionStats::TotalSwipes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SessionStats::TotalMatches)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SessionStats::DurationMs).big_integer())
                    .col(ColumnDef::new(SessionStats::EndedBy).string_len(20))
                    .col(ColumnDef::new(SessionStats::QualityScore).integer())
                    .col(ColumnDef::new(SessionStats::Highlights).json_binary())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SessionStats::Table, SessionStats::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionStats::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SessionStats {
    Table,
    SessionId,
    TotalSwipes,
    TotalMatches,
    DurationMs,
    EndedBy,
    QualityScore,
    Highlights,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
}
