pub mod base_data;
pub mod building_type;
pub mod generators;
pub mod nighttime_pattern;
pub mod parameter_set;
pub mod profile_generation;
pub mod room_type;
pub mod units;
pub mod value_cache;
pub mod variability;
