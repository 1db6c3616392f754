//! City repository
//!
//! Upsert and lookup for the tracked-city catalog. The upsert is keyed on
//! the provider's `city_id`, so repeated collections of the same city keep
//! a single catalog row with refreshed metadata.

use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::models::city::{ActiveModel, Column, Entity as City, Model};
use crate::repositories::StoreError;
use crate::transform::NewCity;

/// Maximum rows returned by a name search.
const SEARCH_LIMIT: u64 = 10;

/// Repository for city catalog operations.
pub struct CityRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CityRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a city, or refresh its metadata when the `city_id` already
    /// exists. Returns the stored row.
    pub async fn upsert(&self, city: &NewCity) -> Result<Model, StoreError> {
        let active = ActiveModel {
            city_id: Set(city.city_id),
            name: Set(city.name.clone()),
            country: Set(city.country.clone()),
            latitude: Set(city.latitude),
            longitude: Set(city.longitude),
            timezone: Set(city.timezone),
            ..Default::default()
        };

        let on_conflict = OnConflict::column(Column::CityId)
            .update_columns([
                Column::Name,
                Column::Country,
                Column::Latitude,
                Column::Longitude,
                Column::Timezone,
            ])
            .to_owned();

        let model = City::insert(active)
            .on_conflict(on_conflict)
            .exec_with_returning(self.db)
            .await?;

        Ok(model)
    }

    /// Find a city by its provider identifier.
    pub async fn find_by_city_id(&self, city_id: i64) -> Result<Option<Model>, StoreError> {
        let city = City::find()
            .filter(Column::CityId.eq(city_id))
            .one(self.db)
            .await?;
        Ok(city)
    }

    /// List every known city ordered by name.
    pub async fn list_all(&self) -> Result<Vec<Model>, StoreError> {
        let cities = City::find().order_by_asc(Column::Name).all(self.db).await?;
        Ok(cities)
    }

    /// Case-insensitive substring search over city names, capped at ten rows.
    pub async fn search(&self, fragment: &str) -> Result<Vec<Model>, StoreError> {
        let pattern = format!("%{}%", fragment.to_lowercase());
        let cities = City::find()
            .filter(
                Condition::all().add(
                    Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern),
                ),
            )
            .order_by_asc(Column::Name)
            .limit(SEARCH_LIMIT)
            .all(self.db)
            .await?;
        Ok(cities)
    }
}
