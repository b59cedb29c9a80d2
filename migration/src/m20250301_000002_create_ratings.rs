use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ratings::Table)
                    .if_not_exists()
                    .col(string(Ratings::Id).primary_key())
                    .col(string(Ratings::MovieTitle))
                    .col(string(Ratings::RaterId))
                    .col(double(Ratings::Rating))
                    .col(big_integer(Ratings::CreatedAt))
                    .col(big_integer(Ratings::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_movie_title")
                    .table(Ratings::Table)
                    .col(Ratings::MovieTitle)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Ratings::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Ratings {
    Table,
    Id,
    MovieTitle,
    RaterId,
    Rating,
    CreatedAt,
    UpdatedAt,
}
