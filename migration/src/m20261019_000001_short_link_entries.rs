use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShortLinkEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShortLinkEntry::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ShortLinkEntry::OriginalUrl)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShortLinkEntry::ShortUrl)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShortLinkEntry::Autogenerated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ShortLinkEntry::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ShortLinkEntry::CreateDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShortLinkEntry::ModifiedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Authoritative guard against two entries sharing a short code,
        // whatever their active/autogenerated flags.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_link_entries_short_url")
                    .table(ShortLinkEntry::Table)
                    .col(ShortLinkEntry::ShortUrl)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_link_entries_autogenerated")
                    .table(ShortLinkEntry::Table)
                    .col(ShortLinkEntry::Autogenerated)
                    .col(ShortLinkEntry::Id)
                    .to_owned(),
            )
            .await?;

        // Retention sweeps delete by modified_date
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_link_entries_modified_date")
                    .table(ShortLinkEntry::Table)
                    .col(ShortLinkEntry::ModifiedDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_short_link_entries_modified_date")
                    .table(ShortLinkEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_short_link_entries_autogenerated")
                    .table(ShortLinkEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_short_link_entries_short_url")
                    .table(ShortLinkEntry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ShortLinkEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShortLinkEntry {
    #[sea_orm(iden = "short_link_entries")]
    Table,
    Id,
    OriginalUrl,
    ShortUrl,
    Autogenerated,
    Active,
    CreateDate,
    ModifiedDate,
}
