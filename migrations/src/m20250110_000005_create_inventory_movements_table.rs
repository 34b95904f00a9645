use sea_orm_migration::prelude::*;

use super::m20250110_000001_create_components_table::Components;
use super::m20250110_000002_create_locations_table::Locations;
use super::m20250110_000003_create_lots_table::Lots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryMovements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::Kind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::Origin)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::ComponentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::Quantity)
                            .decimal_len(19, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::UnitCost)
                            .decimal_len(19, 4)
                            .null(),
                    )
                    .col(ColumnDef::new(InventoryMovements::LocationId).uuid().null())
                    .col(ColumnDef::new(InventoryMovements::LotId).uuid().null())
                    .col(
                        ColumnDef::new(InventoryMovements::ServiceOrderId)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::PurchaseOrderId)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::RemissionId)
                            .uuid()
                            .null(),
                    )
                    .col(ColumnDef::new(InventoryMovements::TransferId).uuid().null())
                    .col(
                        ColumnDef::new(InventoryMovements::Justification)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::PerformedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_movements_component_id")
                            .from(InventoryMovements::Table, InventoryMovements::ComponentId)
                            .to(Components::Table, Components::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_movements_location_id")
                            .from(InventoryMovements::Table, InventoryMovements::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_movements_lot_id")
                            .from(InventoryMovements::Table, InventoryMovements::LotId)
                            .to(Lots::Table, Lots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Fold order index: every projection reads in this order
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_movements_component_occurred_id")
                    .table(InventoryMovements::Table)
                    .col(InventoryMovements::ComponentId)
                    .col(InventoryMovements::OccurredAt)
                    .col(InventoryMovements::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_movements_remission_id")
                    .table(InventoryMovements::Table)
                    .col(InventoryMovements::RemissionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_movements_transfer_id")
                    .table(InventoryMovements::Table)
                    .col(InventoryMovements::TransferId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryMovements::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InventoryMovements {
    Table,
    Id,
    Kind,
    Origin,
    ComponentId,
    Quantity,
    UnitCost,
    LocationId,
    LotId,
    ServiceOrderId,
    PurchaseOrderId,
    RemissionId,
    TransferId,
    Justification,
    PerformedBy,
    OccurredAt,
    CreatedAt,
}
