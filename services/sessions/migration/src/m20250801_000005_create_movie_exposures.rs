use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MovieExposures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieExposures::MovieId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MovieExposures::ExposedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MovieExposures::LastExposedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieExposures::Table, MovieExposures::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieExposures::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MovieExposures {
    Table,
    MovieId,
    ExposedCount,
    LastExposedAt,
}

#[derive(Iden)]
enum Movies {
    Table,
    Id,
}
