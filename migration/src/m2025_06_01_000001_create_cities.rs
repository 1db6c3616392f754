//! Migration to create the cities table.
//!
//! Stores one descriptive row per tracked city, keyed by the provider's
//! numeric city identifier. The upsert path relies on the unique constraint
//! over `city_id`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Cities::CityId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cities::Name).text().not_null())
                    .col(ColumnDef::new(Cities::Country).text().not_null())
                    .col(ColumnDef::new(Cities::Latitude).double().not_null())
                    .col(ColumnDef::new(Cities::Longitude).double().not_null())
                    .col(ColumnDef::new(Cities::Timezone).integer().not_null())
                    .col(
                        ColumnDef::new(Cities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cities_name")
                    .table(Cities::Table)
                    .col(Cities::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
    CityId,
    Name,
    Country,
    Latitude,
    Longitude,
    Timezone,
    CreatedAt,
}
