use crate::config::SynthesisConfig;
use crate::core::base_data::Sia2024BaseData;
use crate::core::building_type::{BuildingTypeDefinition, BuildingTypeKind};
use crate::core::generators::activity_heat_gain::ActivityHeatGainGenerator;
use crate::core::generators::appliances::AppliancePowerGenerator;
use crate::core::generators::area_per_person::AreaPerPersonGenerator;
use crate::core::generators::dhw_demand::DhwDemandGenerator;
use crate::core::generators::infiltration::InfiltrationRateGenerator;
use crate::core::generators::lighting::LightingPowerGenerator;
use crate::core::generators::occupancy::OccupancyProfileGenerator;
use crate::core::generators::variation_monthly::VariationMonthlyGenerator;
use crate::core::generators::ventilation::VentilationRateGenerator;
use crate::core::nighttime_pattern::{NightPattern, NighttimePatternGenerator};
use crate::core::profile_generation::YearProfile;
use crate::core::units::{Quantity, Unit};
use crate::errors::SynthesisError;
use rand::Rng;
use serde::Serialize;

/// Operation parameters of one building, ready to be written out as simulation input.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildingOperationParameters {
    pub building_type: BuildingTypeKind,
    /// m2/person
    pub area_per_person: Quantity,
    /// W/person
    pub activity_heat_gain: Quantity,
    /// l/(m2.day)
    pub dhw_demand: Quantity,
    /// W/m2
    pub dhw_power_demand: Quantity,
    /// m3/(h.m2)
    pub ventilation_rate: Quantity,
    /// m3/(h.m2)
    pub night_ventilation_rate: Quantity,
    /// ACH
    pub infiltration_rate: Quantity,
    /// W/m2
    pub lighting_power: Quantity,
    /// W/m2
    pub appliance_power: Quantity,
    pub appliance_standby_fraction: f64,
    pub profiles: OperationProfiles,
}

/// Hourly profiles over one year. All but the activity profile are fractions of the matching
/// building value; the activity profile is in W/person.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperationProfiles {
    pub occupancy: YearProfile,
    pub activity: YearProfile,
    pub dhw: YearProfile,
    pub ventilation: YearProfile,
    pub infiltration: YearProfile,
    pub lighting: YearProfile,
    pub appliances: YearProfile,
    pub monthly_variation: YearProfile,
    pub night: NightPattern,
}

impl BuildingOperationParameters {
    /// Build every generator for one building, in the order they depend on each other, and
    /// collect their building-level values and profiles.
    pub fn synthesize<B: Sia2024BaseData + ?Sized, R: Rng + ?Sized>(
        building_type: &BuildingTypeDefinition,
        base_data: &B,
        config: &SynthesisConfig,
        rng: &mut R,
    ) -> Result<Self, SynthesisError> {
        let variability = &config.variability;

        let mut nighttime_pattern =
            NighttimePatternGenerator::new(base_data.wakeup_hour()?, base_data.sleep_hour()?)?;
        if let Some(band) = variability.nighttime_pattern_band {
            nighttime_pattern.activate_variability(band, rng)?;
        }
        let night = nighttime_pattern.get_nighttime_year_profile();

        let area_per_person = AreaPerPersonGenerator::new(
            building_type,
            base_data,
            variability.area_per_person,
            rng,
        )?;
        let occupancy = OccupancyProfileGenerator::new(
            building_type,
            base_data,
            &area_per_person,
            config.start_date,
        )?;
        let activity = ActivityHeatGainGenerator::new(building_type, base_data);
        let monthly_variation = VariationMonthlyGenerator::new(building_type, base_data);
        let dhw = DhwDemandGenerator::new(
            building_type,
            base_data,
            &occupancy,
            &night,
            variability.dhw_demand,
            rng,
        )?;
        let ventilation = VentilationRateGenerator::new(
            building_type,
            base_data,
            &area_per_person,
            &occupancy,
            &night,
            variability.ventilation,
            rng,
        )?;
        let infiltration = InfiltrationRateGenerator::new(
            building_type,
            base_data,
            variability.infiltration,
            rng,
        )?;
        let lighting = LightingPowerGenerator::new(
            building_type,
            base_data,
            &occupancy,
            &night,
            variability.lighting,
            rng,
        )?;
        let appliances = AppliancePowerGenerator::new(
            building_type,
            base_data,
            &occupancy,
            &night,
            variability.appliances,
            rng,
        )?;

        // profiles come last so the night pattern is only moved once no generator needs it
        Ok(Self {
            building_type: building_type.kind(),
            area_per_person: area_per_person.get_area_per_person_for_building()?,
            activity_heat_gain: activity.get_activity_heat_gain_for_building()?,
            dhw_demand: dhw.get_dhw_demand_for_building()?,
            dhw_power_demand: dhw.get_dhw_power_demand_for_building(
                Quantity::new(config.dhw.cold_water_temperature, Unit::DegreeCelsius),
                Quantity::new(config.dhw.hot_water_temperature, Unit::DegreeCelsius),
            )?,
            ventilation_rate: ventilation.get_ventilation_rate_for_building()?,
            night_ventilation_rate: ventilation.get_night_ventilation_rate_for_building()?,
            infiltration_rate: infiltration.get_infiltration_rate_for_building()?,
            lighting_power: lighting.get_lighting_power_for_building()?,
            appliance_power: appliances.get_appliance_power_for_building()?,
            appliance_standby_fraction: appliances.get_standby_fraction_for_building()?,
            profiles: OperationProfiles {
                occupancy: occupancy.get_occupancy_profile_for_building()?,
                activity: activity.get_activity_heat_gain_profile_for_building()?,
                dhw: dhw.get_dhw_profile_for_building()?,
                ventilation: ventilation.get_ventilation_profile_for_building()?,
                infiltration: infiltration.get_infiltration_profile_for_building(),
                lighting: lighting.get_lighting_profile_for_building()?,
                appliances: appliances.get_appliance_profile_for_building()?,
                monthly_variation: monthly_variation.get_monthly_variation_profile_for_building()?,
                night,
            },
        })
    }
}
