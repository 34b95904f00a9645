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
                            .decimal_len(19, 4)
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
pub enum StockBalances {
    Table,
    ComponentId,
    OnHand,
    UpdatedAt,
}
