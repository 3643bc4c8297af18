use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Options steering how the operation parameters of buildings are synthesised.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SynthesisConfig {
    /// When set, building `i` of a batch draws from a random stream seeded from this value and
    /// `i`, making repeated runs identical. Unset means entropy seeding.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Calendar date of the first hour of every year profile, used to place rest days.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub variability: VariabilityConfig,
    #[serde(default)]
    pub dhw: DhwConfig,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default()
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_date: default_start_date(),
            variability: Default::default(),
            dhw: Default::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn from_json(json: impl Read) -> anyhow::Result<Self> {
        Ok(serde_json::from_reader(json)?)
    }
}

/// Which inputs get randomised per building. Everything is nominal by default.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VariabilityConfig {
    #[serde(default)]
    pub area_per_person: bool,
    #[serde(default)]
    pub dhw_demand: bool,
    #[serde(default)]
    pub ventilation: bool,
    #[serde(default)]
    pub infiltration: bool,
    #[serde(default)]
    pub lighting: bool,
    #[serde(default)]
    pub appliances: bool,
    /// Band in hours around the nominal wake-up and sleeping hours within which they are
    /// drawn per day.
    #[serde(default)]
    pub nighttime_pattern_band: Option<u32>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DhwConfig {
    /// in degrees Celsius
    #[serde(default = "default_cold_water_temperature")]
    pub cold_water_temperature: f64,
    /// in degrees Celsius
    #[serde(default = "default_hot_water_temperature")]
    pub hot_water_temperature: f64,
}

fn default_cold_water_temperature() -> f64 {
    10.
}

fn default_hot_water_temperature() -> f64 {
    60.
}

impl Default for DhwConfig {
    fn default() -> Self {
        Self {
            cold_water_temperature: default_cold_water_temperature(),
            hot_water_temperature: default_hot_water_temperature(),
        }
    }
}
