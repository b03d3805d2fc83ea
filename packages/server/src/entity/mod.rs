pub mod caption;
pub mod map;
pub mod map_country;
