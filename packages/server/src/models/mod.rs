pub mod caption;
pub mod lookup;
pub mod map;
