use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "map_country")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub map_id: Uuid,
    /// ISO 3166-1 alpha-2 code.
    #[sea_orm(primary_key, auto_increment = false)]
    pub country_code: String,

    #[sea_orm(belongs_to, from = "map_id", to = "id", on_delete = "Cascade")]
    pub map: Option<super::map::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
