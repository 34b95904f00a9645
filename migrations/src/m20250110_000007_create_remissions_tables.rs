use sea_orm_migration::prelude::*;

use super::m20250110_000001_create_components_table::Components;
use super::m20250110_000002_create_locations_table::Locations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Remissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Remissions::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Remissions::Number)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Remissions::DestinationType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Remissions::DestinationId).uuid().not_null())
                    .col(ColumnDef::new(Remissions::ServiceOrderId).uuid().null())
                    .col(
                        ColumnDef::new(Remissions::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Remissions::DeliveredBy).string().not_null())
                    .col(
                        ColumnDef::new(Remissions::CancellationMotive)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Remissions::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Remissions::ClosedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Remissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Remissions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_remissions_status")
                    .table(Remissions::Table)
                    .col(Remissions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RemissionLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RemissionLines::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RemissionLines::RemissionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RemissionLines::ComponentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RemissionLines::Quantity)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RemissionLines::LocationId).uuid().null())
                    .col(
                        ColumnDef::new(RemissionLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_remission_lines_remission_id")
                            .from(RemissionLines::Table, RemissionLines::RemissionId)
                            .to(Remissions::Table, Remissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_remission_lines_component_id")
                            .from(RemissionLines::Table, RemissionLines::ComponentId)
                            .to(Components::Table, Components::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_remission_lines_location_id")
                            .from(RemissionLines::Table, RemissionLines::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_remission_lines_remission_id")
                    .table(RemissionLines::Table)
                    .col(RemissionLines::RemissionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RemissionLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Remissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Remissions {
    Table,
    Id,
    Number,
    DestinationType,
    DestinationId,
    ServiceOrderId,
    Status,
    DeliveredBy,
    CancellationMotive,
    OpenedAt,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum RemissionLines {
    Table,
    Id,
    RemissionId,
    ComponentId,
    Quantity,
    LocationId,
    CreatedAt,
}
