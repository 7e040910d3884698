//! Initial migration: services, stars, tags and the star/tag association.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_services(manager).await?;
        self.create_stars(manager).await?;
        self.create_tags(manager).await?;
        self.create_star_tags(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StarTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stars::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_services(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Services::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Services::LastSuccess)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_stars(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stars::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stars::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(Stars::RemoteId).string().not_null())
                    // Naming
                    .col(ColumnDef::new(Stars::Name).string().not_null())
                    .col(ColumnDef::new(Stars::FullName).string().not_null())
                    .col(ColumnDef::new(Stars::NameFolded).string().not_null())
                    .col(ColumnDef::new(Stars::FullNameFolded).string().not_null())
                    .col(ColumnDef::new(Stars::Owner).string().null())
                    .col(ColumnDef::new(Stars::Avatar).string().null())
                    // Content
                    .col(ColumnDef::new(Stars::Description).text().null())
                    .col(ColumnDef::new(Stars::Homepage).text().null())
                    .col(ColumnDef::new(Stars::Url).text().null())
                    .col(ColumnDef::new(Stars::Language).string().null())
                    .col(ColumnDef::new(Stars::LanguageFolded).string().null())
                    // Statistics
                    .col(
                        ColumnDef::new(Stars::Stargazers)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Stars::Watchers).integer().null())
                    .col(ColumnDef::new(Stars::Forks).integer().null())
                    .col(ColumnDef::new(Stars::Size).integer().null())
                    // Remote timestamps
                    .col(
                        ColumnDef::new(Stars::PushedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Stars::RemoteCreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Stars::StarredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    // Local bookkeeping
                    .col(
                        ColumnDef::new(Stars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stars::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stars::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stars_service")
                            .from(Stars::Table, Stars::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reconciliation key for upserts
        manager
            .create_index(
                Index::create()
                    .name("idx_stars_service_remote_id")
                    .table(Stars::Table)
                    .col(Stars::ServiceId)
                    .col(Stars::RemoteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stars_full_name_folded")
                    .table(Stars::Table)
                    .col(Stars::FullNameFolded)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_tags(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(ColumnDef::new(Tags::NameFolded).string().not_null())
                    .col(
                        ColumnDef::new(Tags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tags::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tags::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tags_name_folded")
                    .table(Tags::Table)
                    .col(Tags::NameFolded)
                    .to_owned(),
            )
            .await
    }

    async fn create_star_tags(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StarTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StarTags::StarId).uuid().not_null())
                    .col(ColumnDef::new(StarTags::TagId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_star_tags")
                            .col(StarTags::StarId)
                            .col(StarTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_star_tags_star")
                            .from(StarTags::Table, StarTags::StarId)
                            .to(Stars::Table, Stars::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_star_tags_tag")
                            .from(StarTags::Table, StarTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_star_tags_tag_id")
                    .table(StarTags::Table)
                    .col(StarTags::TagId)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    Name,
    LastSuccess,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Stars {
    Table,
    Id,
    ServiceId,
    RemoteId,
    Name,
    FullName,
    NameFolded,
    FullNameFolded,
    Owner,
    Avatar,
    Description,
    Homepage,
    Url,
    Language,
    LanguageFolded,
    Stargazers,
    Watchers,
    Forks,
    Size,
    PushedAt,
    RemoteCreatedAt,
    StarredAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    NameFolded,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum StarTags {
    Table,
    StarId,
    TagId,
}
