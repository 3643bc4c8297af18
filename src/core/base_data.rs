// Accessors for the SIA 2024 per-room-type standard values the generators draw from.
//
// Every domain has its own trait so a generator only depends on the data it consumes, and
// a test can stand in for a single domain without providing the full table.

use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, Unit, HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::core::variability::VariabilityTriple;
use anyhow::{anyhow, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;

pub trait AreaPerPersonBaseData {
    /// in m2/person; zero for room types nobody stays in
    fn area_per_person(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
    fn area_per_person_variability(&self, room_type: RoomType)
        -> anyhow::Result<VariabilityTriple>;
}

pub trait ActivityBaseData {
    fn activity_met(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
}

pub trait DhwBaseData {
    /// in l/(m2.day)
    fn dhw_demand(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
    fn dhw_demand_variability(&self, room_type: RoomType) -> anyhow::Result<VariabilityTriple>;
    fn dhw_off_at_night(&self, room_type: RoomType) -> anyhow::Result<bool>;
    /// Fraction of the day-time draw used at night in rooms where hot water is off at night.
    fn dhw_night_value(&self) -> anyhow::Result<f64>;
}

pub trait VentilationBaseData {
    /// in m3/(h.person); zero when the room type is ventilated by floor area instead
    fn ventilation_rate_per_person(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
    /// in m3/(h.m2)
    fn ventilation_rate_per_area(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
    /// in m3/(h.person); zero when ventilation is not reduced at night
    fn night_ventilation_rate_per_person(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
}

pub trait InfiltrationBaseData {
    /// in air changes per hour
    fn infiltration_rate(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
    fn infiltration_rate_variability(
        &self,
        room_type: RoomType,
    ) -> anyhow::Result<VariabilityTriple>;
}

pub trait LightingBaseData {
    /// in W/m2
    fn lighting_power(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
    fn lighting_power_variability(&self, room_type: RoomType) -> anyhow::Result<VariabilityTriple>;
}

pub trait ApplianceBaseData {
    /// in W/m2
    fn appliance_power(&self, room_type: RoomType) -> anyhow::Result<Quantity>;
    fn appliance_power_variability(&self, room_type: RoomType)
        -> anyhow::Result<VariabilityTriple>;
    /// Fraction of the peak appliance power drawn when nobody is present.
    fn appliance_standby_fraction(&self, room_type: RoomType) -> anyhow::Result<f64>;
}

pub trait OccupancyBaseData {
    /// Fraction of the persons present per hour of a working day, 24 values from midnight.
    fn daily_occupancy(&self, room_type: RoomType) -> anyhow::Result<Vec<f64>>;
    fn rest_days_per_week(&self, room_type: RoomType) -> anyhow::Result<u8>;
}

pub trait VariationMonthlyBaseData {
    fn monthly_variation(&self, room_type: RoomType) -> anyhow::Result<[f64; MONTHS_PER_YEAR]>;
}

pub trait NighttimeBaseData {
    fn wakeup_hour(&self) -> anyhow::Result<u32>;
    fn sleep_hour(&self) -> anyhow::Result<u32>;
}

/// Everything needed to synthesise the full operation parameter set of a building.
pub trait Sia2024BaseData:
    AreaPerPersonBaseData
    + ActivityBaseData
    + DhwBaseData
    + VentilationBaseData
    + InfiltrationBaseData
    + LightingBaseData
    + ApplianceBaseData
    + OccupancyBaseData
    + VariationMonthlyBaseData
    + NighttimeBaseData
    + Send
    + Sync
{
}

impl<T> Sia2024BaseData for T where
    T: AreaPerPersonBaseData
        + ActivityBaseData
        + DhwBaseData
        + VentilationBaseData
        + InfiltrationBaseData
        + LightingBaseData
        + ApplianceBaseData
        + OccupancyBaseData
        + VariationMonthlyBaseData
        + NighttimeBaseData
        + Send
        + Sync
{
}

/// A standard value given either as a single number or as its 5th/95th percentile bounds
/// together with the most likely value.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(from = "ValueRangeInput")]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub nominal: f64,
}

impl ValueRange {
    pub fn fixed(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            nominal: value,
        }
    }

    fn triple(&self, unit: Unit) -> VariabilityTriple {
        VariabilityTriple {
            min: Quantity::new(self.min, unit),
            max: Quantity::new(self.max, unit),
            peak: Quantity::new(self.nominal, unit),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueRangeInput {
    Fixed(f64),
    Range { min: f64, max: f64, nominal: f64 },
}

impl From<ValueRangeInput> for ValueRange {
    fn from(input: ValueRangeInput) -> Self {
        match input {
            ValueRangeInput::Fixed(value) => ValueRange::fixed(value),
            ValueRangeInput::Range { min, max, nominal } => ValueRange { min, max, nominal },
        }
    }
}

fn no_monthly_variation() -> [f64; MONTHS_PER_YEAR] {
    [1.; MONTHS_PER_YEAR]
}

fn always_occupied() -> Vec<f64> {
    vec![1.; HOURS_PER_DAY]
}

/// Standard values of one room type.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoomTypeRecord {
    /// m2/person
    pub area_per_person: ValueRange,
    /// met
    pub activity_met: f64,
    /// l/(m2.day)
    pub dhw_demand: ValueRange,
    #[serde(default)]
    pub dhw_off_at_night: bool,
    /// m3/(h.person)
    #[serde(default)]
    pub ventilation_rate_per_person: f64,
    /// m3/(h.m2)
    #[serde(default)]
    pub ventilation_rate_per_area: f64,
    /// m3/(h.person)
    #[serde(default)]
    pub night_ventilation_rate_per_person: f64,
    /// ACH
    pub infiltration_rate: ValueRange,
    /// W/m2
    pub lighting_power: ValueRange,
    /// W/m2
    pub appliance_power: ValueRange,
    #[serde(default)]
    pub appliance_standby_fraction: f64,
    #[serde(default = "always_occupied")]
    pub daily_occupancy: Vec<f64>,
    #[serde(default)]
    pub rest_days_per_week: u8,
    #[serde(default = "no_monthly_variation")]
    pub monthly_variation: [f64; MONTHS_PER_YEAR],
}

/// Base data held in memory, as read from a JSON table keyed by room type.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StaticBaseData {
    pub wakeup_hour: u32,
    pub sleep_hour: u32,
    #[serde(default)]
    pub dhw_night_value: f64,
    pub room_types: IndexMap<RoomType, RoomTypeRecord>,
}

impl StaticBaseData {
    pub fn from_json(json: impl Read) -> anyhow::Result<Self> {
        let base_data: StaticBaseData = serde_json::from_reader(json)?;
        if base_data.room_types.is_empty() {
            bail!("Base data does not define any room types");
        }
        Ok(base_data)
    }

    pub fn record(&self, room_type: RoomType) -> anyhow::Result<&RoomTypeRecord> {
        self.room_types
            .get(&room_type)
            .ok_or_else(|| anyhow!("No base data available for room type {room_type}"))
    }
}

impl AreaPerPersonBaseData for StaticBaseData {
    fn area_per_person(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.area_per_person.nominal,
            Unit::SquareMetrePerPerson,
        ))
    }

    fn area_per_person_variability(
        &self,
        room_type: RoomType,
    ) -> anyhow::Result<VariabilityTriple> {
        Ok(self
            .record(room_type)?
            .area_per_person
            .triple(Unit::SquareMetrePerPerson))
    }
}

impl ActivityBaseData for StaticBaseData {
    fn activity_met(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.activity_met,
            Unit::Met,
        ))
    }
}

impl DhwBaseData for StaticBaseData {
    fn dhw_demand(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.dhw_demand.nominal,
            Unit::LitrePerSquareMetrePerDay,
        ))
    }

    fn dhw_demand_variability(&self, room_type: RoomType) -> anyhow::Result<VariabilityTriple> {
        Ok(self
            .record(room_type)?
            .dhw_demand
            .triple(Unit::LitrePerSquareMetrePerDay))
    }

    fn dhw_off_at_night(&self, room_type: RoomType) -> anyhow::Result<bool> {
        Ok(self.record(room_type)?.dhw_off_at_night)
    }

    fn dhw_night_value(&self) -> anyhow::Result<f64> {
        Ok(self.dhw_night_value)
    }
}

impl VentilationBaseData for StaticBaseData {
    fn ventilation_rate_per_person(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.ventilation_rate_per_person,
            Unit::CubicMetrePerHourPerPerson,
        ))
    }

    fn ventilation_rate_per_area(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.ventilation_rate_per_area,
            Unit::CubicMetrePerHourPerSquareMetre,
        ))
    }

    fn night_ventilation_rate_per_person(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.night_ventilation_rate_per_person,
            Unit::CubicMetrePerHourPerPerson,
        ))
    }
}

impl InfiltrationBaseData for StaticBaseData {
    fn infiltration_rate(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.infiltration_rate.nominal,
            Unit::AirChangesPerHour,
        ))
    }

    fn infiltration_rate_variability(
        &self,
        room_type: RoomType,
    ) -> anyhow::Result<VariabilityTriple> {
        Ok(self
            .record(room_type)?
            .infiltration_rate
            .triple(Unit::AirChangesPerHour))
    }
}

impl LightingBaseData for StaticBaseData {
    fn lighting_power(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.lighting_power.nominal,
            Unit::WattPerSquareMetre,
        ))
    }

    fn lighting_power_variability(&self, room_type: RoomType) -> anyhow::Result<VariabilityTriple> {
        Ok(self
            .record(room_type)?
            .lighting_power
            .triple(Unit::WattPerSquareMetre))
    }
}

impl ApplianceBaseData for StaticBaseData {
    fn appliance_power(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
        Ok(Quantity::new(
            self.record(room_type)?.appliance_power.nominal,
            Unit::WattPerSquareMetre,
        ))
    }

    fn appliance_power_variability(
        &self,
        room_type: RoomType,
    ) -> anyhow::Result<VariabilityTriple> {
        Ok(self
            .record(room_type)?
            .appliance_power
            .triple(Unit::WattPerSquareMetre))
    }

    fn appliance_standby_fraction(&self, room_type: RoomType) -> anyhow::Result<f64> {
        Ok(self.record(room_type)?.appliance_standby_fraction)
    }
}

impl OccupancyBaseData for StaticBaseData {
    fn daily_occupancy(&self, room_type: RoomType) -> anyhow::Result<Vec<f64>> {
        Ok(self.record(room_type)?.daily_occupancy.clone())
    }

    fn rest_days_per_week(&self, room_type: RoomType) -> anyhow::Result<u8> {
        Ok(self.record(room_type)?.rest_days_per_week)
    }
}

impl VariationMonthlyBaseData for StaticBaseData {
    fn monthly_variation(&self, room_type: RoomType) -> anyhow::Result<[f64; MONTHS_PER_YEAR]> {
        Ok(self.record(room_type)?.monthly_variation)
    }
}

impl NighttimeBaseData for StaticBaseData {
    fn wakeup_hour(&self) -> anyhow::Result<u32> {
        Ok(self.wakeup_hour)
    }

    fn sleep_hour(&self) -> anyhow::Result<u32> {
        Ok(self.sleep_hour)
    }
}
