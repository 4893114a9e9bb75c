use sea_orm_migration::prelude::*;

/// The composite primary key is the uniqueness guard RecordSwipe relies on:
/// a losing concurrent insert for the same key surfaces as a conflict.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Swipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Swipes::UserId).uuid().not_null())
                    .col(ColumnDef::new(Swipes::SessionId).uuid().not_null())
                    .col(ColumnDef::new(Swipes::MovieId).integer().not_null())
                    .col(ColumnDef::new(Swipes::Reaction).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Swipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Swipes::UserId)
                            .col(Swipes::SessionId)
                            .col(Swipes::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Swipes::Table, Swipes::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Swipes::Table, Swipes::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Swipes::Table)
                    .col(Swipes::SessionId)
                    .col(Swipes::MovieId)
                    .name("idx_swipes_session_id_movie_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Swipes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Swipes {
    Table,
    UserId,
    SessionId,
    MovieId,
    Reaction,
    CreatedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
}

#[derive(Iden)]
enum Movies {
    Table,
    Id,
}
