use std::collections::BTreeSet;

use crate::config::LookupConfig;
use crate::maps::{MapError, MapFields};

pub const DEFAULT_SOURCES: &[&str] = &["PDC", "GDACS", "WFP", "GFH", "GGC", "USGS", "OSM", "OTHER"];

pub const DEFAULT_REGIONS: &[&str] = &["_TBD_REGION", "AFR", "AMR", "APA", "EUR", "MENA"];

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "_TBD_CATEGORY",
    "BIOLOGICAL_EMERGENCY",
    "CHEMICAL_EMERGENCY",
    "CIVIL_UNREST",
    "COLD_WAVE",
    "COMPLEX_EMERGENCY",
    "CYCLONE",
    "DROUGHT",
    "EARTHQUAKE",
    "EPIDEMIC",
    "FIRE",
    "FLOOD",
    "FLOOD_INSECURITY",
    "HEAT_WAVE",
    "INSECT_INFESTATION",
    "LANDSLIDE",
    "PLUVIAL",
    "POPULATION_MOVEMENT",
    "RADIOLOGICAL_EMERGENCY",
    "STORM",
    "TRANSPORTATION_EMERGENCY",
    "TSUNAMI",
    "VOLCANIC_ERUPTION",
    "OTHER",
];

/// ISO 3166-1 alpha-2.
pub const DEFAULT_COUNTRIES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Read-only sets of valid codes.
///
/// Built once from configuration and shared behind an `Arc`; nothing mutates
/// it after start-up.
#[derive(Debug, Clone)]
pub struct LookupSets {
    sources: BTreeSet<String>,
    regions: BTreeSet<String>,
    categories: BTreeSet<String>,
    countries: BTreeSet<String>,
}

impl LookupSets {
    pub fn from_config(config: &LookupConfig) -> Self {
        let collect = |codes: &[String]| codes.iter().map(|c| c.trim().to_string()).collect();
        Self {
            sources: collect(&config.sources),
            regions: collect(&config.regions),
            categories: collect(&config.categories),
            countries: collect(&config.countries),
        }
    }

    /// Check source, region and category against the loaded sets.
    pub fn validate_fields(&self, fields: &MapFields) -> Result<(), MapError> {
        check("source", &self.sources, &fields.source)?;
        check("region", &self.regions, &fields.region)?;
        check("category", &self.categories, &fields.category)
    }

    /// Check country codes and collapse duplicates, preserving sorted order.
    pub fn validate_countries(&self, countries: &[String]) -> Result<Vec<String>, MapError> {
        let mut unique = BTreeSet::new();
        for code in countries {
            check("country", &self.countries, code)?;
            unique.insert(code.clone());
        }
        Ok(unique.into_iter().collect())
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(String::as_str)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(String::as_str)
    }
}

impl Default for LookupSets {
    fn default() -> Self {
        Self::from_config(&LookupConfig::default())
    }
}

fn check(kind: &str, valid: &BTreeSet<String>, code: &str) -> Result<(), MapError> {
    if code.is_empty() {
        return Err(MapError::Validation(format!("{kind} is required")));
    }
    if !valid.contains(code) {
        return Err(MapError::Validation(format!("invalid {kind}: {code}")));
    }
    Ok(())
}
