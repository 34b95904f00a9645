use sea_orm_migration::prelude::*;

use super::m20250110_000001_create_components_table::Components;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lots::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Lots::ComponentId).uuid().not_null())
                    .col(ColumnDef::new(Lots::LotNumber).string().not_null())
                    .col(
                        ColumnDef::new(Lots::CurrentQuantity)
                            .decimal_len(19, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Lots::ExpiryDate).date().null())
                    .col(
                        ColumnDef::new(Lots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Lots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lots_component_id")
                            .from(Lots::Table, Lots::ComponentId)
                            .to(Components::Table, Components::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lots_component_id")
                    .table(Lots::Table)
                    .col(Lots::ComponentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Lots {
    Table,
    Id,
    ComponentId,
    LotNumber,
    CurrentQuantity,
    ExpiryDate,
    CreatedAt,
    UpdatedAt,
}
