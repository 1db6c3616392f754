//! Migration to create the weather_records table.
//!
//! One row per collected observation. Rows are append-only from the
//! pipeline's point of view; historical and analytics queries read them
//! filtered by city and ordered by observation time descending.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeatherRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeatherRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::CityId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WeatherRecords::CityName).text().not_null())
                    .col(ColumnDef::new(WeatherRecords::Country).text().not_null())
                    .col(
                        ColumnDef::new(WeatherRecords::Latitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::Longitude)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::Temperature)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::FeelsLike)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WeatherRecords::TempMin).double().not_null())
                    .col(ColumnDef::new(WeatherRecords::TempMax).double().not_null())
                    .col(
                        ColumnDef::new(WeatherRecords::Pressure)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::Humidity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::WindSpeed)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::WindDirection)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::Cloudiness)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::Visibility)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::WeatherMain)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::WeatherDescription)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::WeatherIcon)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeatherRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Historical and latest lookups filter by city and order by
        // recorded_at DESC, so index in that shape using raw SQL.
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_weather_records_city_recorded ON weather_records (city_id, recorded_at DESC)"
                    .to_string(),
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeatherRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WeatherRecords {
    Table,
    Id,
    CityId,
    CityName,
    Country,
    Latitude,
    Longitude,
    Temperature,
    FeelsLike,
    TempMin,
    TempMax,
    Pressure,
    Humidity,
    WindSpeed,
    WindDirection,
    Cloudiness,
    Visibility,
    WeatherMain,
    WeatherDescription,
    WeatherIcon,
    RecordedAt,
    CreatedAt,
}
