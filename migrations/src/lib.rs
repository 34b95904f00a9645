pub use sea_orm_migration::prelude::*;

mod m20250110_000001_create_components_table;
mod m20250110_000002_create_locations_table;
mod m20250110_000003_create_lots_table;
mod m20250110_000004_create_purchase_orders_table;
mod m20250110_000005_create_inventory_movements_table;
mod m20250110_000006_create_stock_balances_table;
mod m20250110_000007_create_remissions_tables;
mod m20250110_000008_create_supplier_returns_table;
mod m20250110_000009_create_document_counters_table;

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
