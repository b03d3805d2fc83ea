use chrono::{DateTime, Utc};
use common::storage::ContentHash;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::MapFields;
use crate::entity::{caption, map, map_country};

/// A map row with its digest parsed.
#[derive(Debug, Clone)]
pub struct MapRecord {
    pub id: Uuid,
    pub file_key: String,
    pub digest: ContentHash,
    pub fields: MapFields,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<map::Model> for MapRecord {
    type Error = DbErr;

    fn try_from(model: map::Model) -> Result<Self, Self::Error> {
        let digest = ContentHash::from_hex(&model.sha256)
            .map_err(|e| DbErr::Type(format!("map {}: {e}", model.id)))?;
        Ok(Self {
            id: model.id,
            file_key: model.file_key,
            digest,
            fields: MapFields {
                source: model.source,
                region: model.region,
                category: model.category,
            },
            created_at: model.created_at,
        })
    }
}

/// Owns the relational side of a map: the map row, its country set and its
/// captions.
#[derive(Clone)]
pub struct MetadataRecorder {
    db: DatabaseConnection,
}

impl MetadataRecorder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert the map row for a blob that is already stored under `file_key`.
    pub async fn insert_map(
        &self,
        id: Uuid,
        file_key: &str,
        digest: &ContentHash,
        fields: &MapFields,
    ) -> Result<(), DbErr> {
        let model = map::ActiveModel {
            id: Set(id),
            file_key: Set(file_key.to_string()),
            sha256: Set(digest.to_hex()),
            source: Set(fields.source.clone()),
            region: Set(fields.region.clone()),
            category: Set(fields.category.clone()),
            created_at: Set(Utc::now()),
        };
        map::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    /// Associate countries with a map. Already-present pairs are skipped.
    pub async fn add_countries(&self, map_id: Uuid, countries: &[String]) -> Result<(), DbErr> {
        if countries.is_empty() {
            return Ok(());
        }

        let rows = countries.iter().map(|code| map_country::ActiveModel {
            map_id: Set(map_id),
            country_code: Set(code.clone()),
        });

        let result = map_country::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    map_country::Column::MapId,
                    map_country::Column::CountryCode,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn find_map(&self, id: Uuid) -> Result<Option<MapRecord>, DbErr> {
        map::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(MapRecord::try_from)
            .transpose()
    }

    pub async fn countries_of(&self, map_id: Uuid) -> Result<Vec<String>, DbErr> {
        let rows = map_country::Entity::find()
            .filter(map_country::Column::MapId.eq(map_id))
            .order_by_asc(map_country::Column::CountryCode)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| r.country_code).collect())
    }

    /// Overwrite the enumerated fields. Returns `false` if the map is absent.
    pub async fn update_fields(&self, id: Uuid, fields: &MapFields) -> Result<bool, DbErr> {
        let result = map::Entity::update_many()
            .col_expr(map::Column::Source, Expr::value(fields.source.clone()))
            .col_expr(map::Column::Region, Expr::value(fields.region.clone()))
            .col_expr(map::Column::Category, Expr::value(fields.category.clone()))
            .filter(map::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Insert a caption row. Callers must have checked that the map exists.
    pub async fn insert_caption(
        &self,
        map_id: Uuid,
        generated: &str,
        model: &str,
        raw_json: serde_json::Value,
    ) -> Result<Uuid, DbErr> {
        let id = Uuid::now_v7();
        let row = caption::ActiveModel {
            id: Set(id),
            map_id: Set(map_id),
            generated: Set(generated.to_string()),
            model: Set(model.to_string()),
            raw_json: Set(raw_json),
            created_at: Set(Utc::now()),
        };
        caption::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await?;
        Ok(id)
    }

    /// Load a caption together with the storage key of its map.
    pub async fn find_caption(&self, id: Uuid) -> Result<Option<(caption::Model, String)>, DbErr> {
        let Some(row) = caption::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let map_row = map::Entity::find_by_id(row.map_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("map {} of caption {id}", row.map_id)))?;
        Ok(Some((row, map_row.file_key)))
    }
}
