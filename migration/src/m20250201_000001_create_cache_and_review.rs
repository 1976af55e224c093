use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cache::Table)
                    .if_not_exists()
                    .col(pk_auto(Cache::Id))
                    .col(string_uniq(Cache::TitleId))
                    .col(string(Cache::Title))
                    .col(text_null(Cache::Plot))
                    .col(string_null(Cache::Image))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(pk_auto(Review::Id))
                    .col(integer(Review::CacheId))
                    .col(double(Review::Rating))
                    .col(string(Review::Title))
                    .col(text(Review::Content))
                    .col(string_null(Review::Author))
                    .col(big_integer(Review::Date))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_cache")
                            .from(Review::Table, Review::CacheId)
                            .to(Cache::Table, Cache::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_review_cache_id")
                    .table(Review::Table)
                    .col(Review::CacheId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Review::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Cache::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Cache {
    Table,
    Id,
    TitleId,
    Title,
    Plot,
    Image,
}

#[derive(DeriveIden)]
enum Review {
    Table,
    Id,
    CacheId,
    Rating,
    Title,
    Content,
    Author,
    Date,
}
