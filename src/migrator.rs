use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::{error, info};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000001_create_components_table::Migration),
            Box::new(m20250110_000002_create_locations_table::Migration),
            Box::new(m20250110_000003_create_lots_table::Migration),
            Box::new(m20250110_000004_create_purchase_orders_table::Migration),
            Box::new(m20250110_000005_create_inventory_movements_table::Migration),
            Box::new(m20250110_000006_create_stock_balances_table::Migration),
            Box::new(m20250110_000007_create_remissions_tables::Migration),
            Box::new(m20250110_000008_create_supplier_returns_table::Migration),
            Box::new(m20250110_000009_create_document_counters_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250110_000001_create_components_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000001_create_components_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Components::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Components::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Components::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Components::Description).string().not_null())
                        .col(
                            ColumnDef::new(Components::UnitOfMeasure)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Components::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Components::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Components::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Components::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Components {
        Table,
        Id,
        Code,
        Description,
        UnitOfMeasure,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000002_create_locations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000002_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Locations::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(
                            ColumnDef::new(Locations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Locations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Id,
        Code,
        Name,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000003_create_lots_table {

    use sea_orm_migration::prelude::*;

    use super::m20250110_000001_create_components_table::Components;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000003_create_lots_table"
        }
    }

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
                                .decimal_len(16, 4)
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
    pub(super) enum Lots {
        Table,
        Id,
        ComponentId,
        LotNumber,
        CurrentQuantity,
        ExpiryDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000004_create_purchase_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000004_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::SupplierName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseOrders {
        Table,
        Id,
        Number,
        SupplierName,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000005_create_inventory_movements_table {

    use sea_orm_migration::prelude::*;

    use super::m20250110_000001_create_components_table::Components;
    use super::m20250110_000002_create_locations_table::Locations;
    use super::m20250110_000003_create_lots_table::Lots;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000005_create_inventory_movements_table"
        }
    }

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
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryMovements::UnitCost)
                                .decimal_len(16, 4)
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
    pub(super) enum InventoryMovements {
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
}

mod m20250110_000006_create_stock_balances_table {

    use sea_orm_migration::prelude::*;

    use super::m20250110_000001_create_components_table::Components;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000006_create_stock_balances_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockBalances::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockBalances::ComponentId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockBalances::OnHand)
                                .decimal_len(16, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(StockBalances::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_stock_balances_component_id")
                                .from(StockBalances::Table, StockBalances::ComponentId)
                                .to(Components::Table, Components::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockBalances::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum StockBalances {
        Table,
        ComponentId,
        OnHand,
        UpdatedAt,
    }
}

mod m20250110_000007_create_remissions_tables {

    use sea_orm_migration::prelude::*;

    use super::m20250110_000001_create_components_table::Components;
    use super::m20250110_000002_create_locations_table::Locations;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000007_create_remissions_tables"
        }
    }

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
                                .decimal_len(16, 4)
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
    pub(super) enum Remissions {
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
    pub(super) enum RemissionLines {
        Table,
        Id,
        RemissionId,
        ComponentId,
        Quantity,
        LocationId,
        CreatedAt,
    }
}

mod m20250110_000008_create_supplier_returns_table {

    use sea_orm_migration::prelude::*;

    use super::m20250110_000004_create_purchase_orders_table::PurchaseOrders;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000008_create_supplier_returns_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SupplierReturns::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierReturns::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::Number)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierReturns::LotId).uuid().null())
                        .col(
                            ColumnDef::new(SupplierReturns::Motive)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::RequestedBy)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierReturns::ProcessedBy).string().null())
                        .col(ColumnDef::new(SupplierReturns::Notes).string().null())
                        .col(
                            ColumnDef::new(SupplierReturns::RequestedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::ProcessedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierReturns::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_returns_purchase_order_id")
                                .from(SupplierReturns::Table, SupplierReturns::PurchaseOrderId)
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_supplier_returns_purchase_order_id")
                        .table(SupplierReturns::Table)
                        .col(SupplierReturns::PurchaseOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierReturns::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum SupplierReturns {
        Table,
        Id,
        Number,
        PurchaseOrderId,
        LotId,
        Motive,
        Quantity,
        Status,
        RequestedBy,
        ProcessedBy,
        Notes,
        RequestedAt,
        ProcessedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250110_000009_create_document_counters_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250110_000009_create_document_counters_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DocumentCounters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DocumentCounters::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DocumentCounters::Value)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DocumentCounters::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DocumentCounters::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum DocumentCounters {
        Table,
        Name,
        Value,
        UpdatedAt,
    }
}

// Database migration CLI runner
pub async fn run_migration(db_url: &str) -> Result<()> {
    info!("Setting up database connection for migrations");

    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;

    info!("Running database migrations");

    let result = Migrator::up(&db, None).await;

    match result {
        Ok(_) => {
            info!("Migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}
