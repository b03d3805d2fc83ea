use serde::Serialize;

use crate::lookup::LookupSets;

/// Code lists accepted by the upload and metadata endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LookupsResponse {
    #[schema(example = json!(["OSM", "WFP"]))]
    pub sources: Vec<String>,
    #[schema(example = json!(["AFR", "EUR"]))]
    pub regions: Vec<String>,
    #[schema(example = json!(["FLOOD", "FIRE"]))]
    pub categories: Vec<String>,
    #[schema(example = json!(["KE", "UG"]))]
    pub countries: Vec<String>,
}

impl From<&LookupSets> for LookupsResponse {
    fn from(sets: &LookupSets) -> Self {
        Self {
            sources: sets.sources().map(str::to_string).collect(),
            regions: sets.regions().map(str::to_string).collect(),
            categories: sets.categories().map(str::to_string).collect(),
            countries: sets.countries().map(str::to_string).collect(),
        }
    }
}
