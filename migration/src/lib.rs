//! Database migrations for the WeatherHub service.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_01_000001_create_cities;
mod m2025_06_01_000002_create_weather_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_01_000001_create_cities::Migration),
            Box::new(m2025_06_01_000002_create_weather_records::Migration),
        ]
    }
}
