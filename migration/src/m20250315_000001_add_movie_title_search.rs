use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Movies::Table)
                    .add_column(ColumnDef::new(Movies::TitleSearch).string().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        // rows written later carry a Unicode-folded copy; SQLite lower() only folds ASCII
        manager
            .get_connection()
            .execute_unprepared("UPDATE movies SET title_search = lower(title)")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter().table(Movies::Table).drop_column(Movies::TitleSearch).to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    TitleSearch,
}
