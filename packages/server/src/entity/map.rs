use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "map")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Storage key of the uploaded blob. Non-owning: the blob outlives the row.
    pub file_key: String,

    /// SHA-256 content hash (lowercase hex).
    pub sha256: String,

    pub source: String,
    pub region: String,
    pub category: String,

    #[sea_orm(has_many)]
    pub countries: HasMany<super::map_country::Entity>,

    #[sea_orm(has_many)]
    pub captions: HasMany<super::caption::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
