//! City entity model
//!
//! SeaORM entity for the cities table, which stores one descriptive row per
//! tracked city. `city_id` is the provider's stable numeric identifier and
//! the conflict key for upserts; `id` and `created_at` are store-assigned.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// City entity representing a tracked geographic place
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = City)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    /// Store-assigned identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Provider city identifier (natural key, unique)
    pub city_id: i64,

    /// City display name
    pub name: String,

    /// ISO country code
    pub country: String,

    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    /// UTC offset in seconds
    pub timezone: i32,

    /// Timestamp when the row was first inserted
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
