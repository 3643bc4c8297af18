use crate::core::base_data::ApplianceBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::generators::{draw_triangular, OccupancyProfileProvider, RoomValues};
use crate::core::profile_generation::{
    combine_day_and_night, constant_year_profile, YearProfile,
};
use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, Unit};
use crate::errors::{GeneratorError, SynthesisError};
use rand::Rng;
use tracing::debug;

/// Power drawn by equipment per floor area. Equipment runs in standby when nobody is around.
pub struct AppliancePowerGenerator<'a, B, O>
where
    B: ApplianceBaseData + ?Sized,
    O: OccupancyProfileProvider + ?Sized,
{
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
    occupancy: &'a O,
    night_pattern: &'a [bool],
    values: RoomValues,
}

impl<'a, B, O> AppliancePowerGenerator<'a, B, O>
where
    B: ApplianceBaseData + ?Sized,
    O: OccupancyProfileProvider + ?Sized,
{
    pub fn new<R: Rng + ?Sized>(
        building_type: &'a BuildingTypeDefinition,
        base_data: &'a B,
        occupancy: &'a O,
        night_pattern: &'a [bool],
        variability: bool,
        rng: &mut R,
    ) -> Result<Self, SynthesisError> {
        for room_type in building_type.get_room_types() {
            let fraction = base_data.appliance_standby_fraction(room_type)?;
            if !(0. ..=1.).contains(&fraction) {
                return Err(GeneratorError::StandbyFractionOutOfRange {
                    room_type,
                    fraction,
                }
                .into());
            }
        }
        let values = RoomValues::new(building_type, variability, rng, |room_type, rng| {
            draw_triangular(base_data.appliance_power_variability(room_type), rng)
        })?;
        if values.is_variable() {
            debug!(building_type = %building_type.kind(), "drew appliance power per room type");
        }

        Ok(Self {
            building_type,
            base_data,
            occupancy,
            night_pattern,
            values,
        })
    }

    /// in W/m2
    pub fn get_appliance_power_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<Quantity, SynthesisError> {
        let power = self
            .values
            .get(room_type, |room_type| self.base_data.appliance_power(room_type))?;

        Ok(power.to(Unit::WattPerSquareMetre)?)
    }

    pub fn get_appliance_power_for_building(&self) -> Result<Quantity, SynthesisError> {
        self.building_type
            .synthesize_value_by_room_area(|room_type| self.get_appliance_power_for_room(room_type))
    }

    /// Fraction of the building's appliance power drawn in standby, rooms weighted by their
    /// appliance power.
    pub fn get_standby_fraction_for_building(&self) -> Result<f64, SynthesisError> {
        let power = self.get_appliance_power_for_building()?;
        if power.is_zero() {
            return Ok(0.);
        }
        let standby_power = self.building_type.synthesize_value_by_room_area(|room_type| {
            Ok(self.get_appliance_power_for_room(room_type)?
                * self.base_data.appliance_standby_fraction(room_type)?)
        })?;

        Ok(standby_power.ratio(power)?)
    }

    /// Per hour, the standby share of the room's appliances plus the rest in proportion to
    /// occupancy.
    pub fn get_appliance_profile_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<YearProfile, SynthesisError> {
        let standby = self.base_data.appliance_standby_fraction(room_type)?;

        Ok(self
            .occupancy
            .occupancy_profile_for_room(room_type)?
            .into_iter()
            .map(|occupancy| standby + (1. - standby) * occupancy)
            .collect())
    }

    /// Hourly fraction of the building's appliance power, dropping to the building's standby
    /// fraction while it sleeps.
    pub fn get_appliance_profile_for_building(&self) -> Result<YearProfile, SynthesisError> {
        if self.get_appliance_power_for_building()?.is_zero() {
            return Ok(constant_year_profile(0.));
        }
        let day_profile = self.building_type.synthesize_profiles_yearly_by_room_area_weighted(
            |room_type| self.get_appliance_profile_for_room(room_type),
            |room_type| self.get_appliance_power_for_room(room_type),
        )?;
        let night_profile = constant_year_profile(self.get_standby_fraction_for_building()?);

        Ok(combine_day_and_night(
            &day_profile,
            &night_profile,
            self.night_pattern,
        )?)
    }
}
