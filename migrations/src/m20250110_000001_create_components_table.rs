use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

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
pub enum Components {
    Table,
    Id,
    Code,
    Description,
    UnitOfMeasure,
    Active,
    CreatedAt,
    UpdatedAt,
}
