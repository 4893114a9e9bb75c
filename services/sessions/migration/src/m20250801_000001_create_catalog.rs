use sea_orm_migration::prelude::*;

/// Catalog tables. Rows are written by the external catalog sync job; the
/// sessions service only reads them, but owning the DDL here keeps a single
/// migration history for the shared database.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Genres::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Genres::TmdbId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Genres::Name).string().not_null())
                    .col(ColumnDef::new(Genres::Industry).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Movies::TmdbId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Movies::Title).string().not_null())
                    .col(ColumnDef::new(Movies::Overview).text().not_null())
                    .col(ColumnDef::new(Movies::ReleaseDate).date())
                    .col(ColumnDef::new(Movies::Rating).double())
                    .col(ColumnDef::new(Movies::Language).string().not_null())
                    .col(
                        ColumnDef::new(Movies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MovieGenres::MovieId).integer().not_null())
                    .col(ColumnDef::new(MovieGenres::GenreId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(MovieGenres::MovieId)
                            .col(MovieGenres::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieGenres::Table, MovieGenres::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieGenres::Table, MovieGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MovieTags::MovieId).integer().not_null())
                    .col(ColumnDef::new(MovieTags::Tag).string().not_null())
                    .primary_key(Index::create().col(MovieTags::MovieId).col(MovieTags::Tag))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieTags::Table, MovieTags::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TagRelations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TagRelations::FromTag).string().not_null())
                    .col(ColumnDef::new(TagRelations::ToTag).string().not_null())
                    .col(ColumnDef::new(TagRelations::Weight).float().not_null())
                    .primary_key(
                        Index::create()
                            .col(TagRelations::FromTag)
                            .col(TagRelations::ToTag),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TagRelations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MovieGenres::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Genres {
    Table,
    Id,
    TmdbId,
    Name,
    Industry,
}

#[derive(Iden)]
enum Movies {
    Table,
    Id,
    TmdbId,
    Title,
    Overview,
    ReleaseDate,
    Rating,
    Language,
    CreatedAt,
}

#[derive(Iden)]
enum MovieGenres {
    Table,
    MovieId,
    GenreId,
}

#[derive(Iden)]
enum MovieTags {
    Table,
    MovieId,
    Tag,
}

#[derive(Iden)]
enum TagRelations {
    Table,
    FromTag,
    ToTag,
    Weight,
}
