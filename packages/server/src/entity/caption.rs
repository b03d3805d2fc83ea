use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "caption")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub map_id: Uuid,
    #[sea_orm(belongs_to, from = "map_id", to = "id", on_delete = "Cascade")]
    pub map: Option<super::map::Entity>,

    #[sea_orm(column_type = "Text")]
    pub generated: String,

    /// Identifier of the model that produced `generated`.
    pub model: String,

    /// Raw generator response, kept for auditing.
    #[sea_orm(column_type = "JsonBinary")]
    pub raw_json: Json,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
