use sea_orm_migration::prelude::*;

use super::m20250110_000004_create_purchase_orders_table::PurchaseOrders;

#[derive(DeriveMigrationName)]
pub struct Migration;

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
                            .decimal_len(19, 4)
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
pub enum SupplierReturns {
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
