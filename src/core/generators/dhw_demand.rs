use crate::core::base_data::DhwBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::generators::{draw_triangular, OccupancyProfileProvider, RoomValues};
use crate::core::profile_generation::{constant_year_profile, fix_nighttime_value, YearProfile};
use crate::core::room_type::RoomType;
use crate::core::units::{
    Quantity, Unit, SECONDS_PER_DAY, WATER_DENSITY_KG_PER_LITRE, WATER_SPECIFIC_HEAT,
};
use crate::errors::SynthesisError;
use rand::Rng;
use tracing::{debug, warn};

/// Domestic hot water drawn per floor area and day, and when over the year it is drawn.
pub struct DhwDemandGenerator<'a, B, O>
where
    B: DhwBaseData + ?Sized,
    O: OccupancyProfileProvider + ?Sized,
{
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
    occupancy: &'a O,
    night_pattern: &'a [bool],
    values: RoomValues,
}

impl<'a, B, O> DhwDemandGenerator<'a, B, O>
where
    B: DhwBaseData + ?Sized,
    O: OccupancyProfileProvider + ?Sized,
{
    /// Arguments:
    /// * `building_type` - room type split of the building
    /// * `base_data` - hot water demand per room type
    /// * `occupancy` - hourly occupancy per room type, the shape of the demand profile
    /// * `night_pattern` - night flag per hour of the year
    /// * `variability` - draw the demand of every room type from its triangular distribution
    /// * `rng` - source of the draws
    pub fn new<R: Rng + ?Sized>(
        building_type: &'a BuildingTypeDefinition,
        base_data: &'a B,
        occupancy: &'a O,
        night_pattern: &'a [bool],
        variability: bool,
        rng: &mut R,
    ) -> Result<Self, SynthesisError> {
        let values = RoomValues::new(building_type, variability, rng, |room_type, rng| {
            let demand = draw_triangular(base_data.dhw_demand_variability(room_type), rng)?;
            if demand.magnitude() < 0. {
                debug!(%room_type, %demand, "clamping negative hot water demand draw to zero");
            }
            Ok(demand.clamp_non_negative())
        })?;
        if values.is_variable() {
            debug!(building_type = %building_type.kind(), "drew hot water demand per room type");
        }

        Ok(Self {
            building_type,
            base_data,
            occupancy,
            night_pattern,
            values,
        })
    }

    /// in l/(m2.day)
    pub fn get_dhw_demand_for_room(&self, room_type: RoomType) -> Result<Quantity, SynthesisError> {
        let demand = self
            .values
            .get(room_type, |room_type| self.base_data.dhw_demand(room_type))?;

        Ok(demand.to(Unit::LitrePerSquareMetrePerDay)?)
    }

    pub fn get_dhw_demand_for_building(&self) -> Result<Quantity, SynthesisError> {
        self.building_type
            .synthesize_value_by_room_area(|room_type| self.get_dhw_demand_for_room(room_type))
    }

    /// Daily hot water volume of the building converted into the average heating power per
    /// floor area needed to raise it from `cold_water_temperature` to `hot_water_temperature`.
    pub fn get_dhw_power_demand_for_building(
        &self,
        cold_water_temperature: Quantity,
        hot_water_temperature: Quantity,
    ) -> Result<Quantity, SynthesisError> {
        let temperature_rise = hot_water_temperature.magnitude_in(Unit::Kelvin)?
            - cold_water_temperature.magnitude_in(Unit::Kelvin)?;
        let litres_per_day = self
            .get_dhw_demand_for_building()?
            .magnitude_in(Unit::LitrePerSquareMetrePerDay)?;

        Ok(Quantity::new(
            litres_per_day * WATER_DENSITY_KG_PER_LITRE * WATER_SPECIFIC_HEAT * temperature_rise
                / SECONDS_PER_DAY,
            Unit::WattPerSquareMetre,
        ))
    }

    /// Occupancy of the room, with hot water turned down to the night value at night for room
    /// types that do not use it then.
    pub fn get_dhw_profile_for_room(&self, room_type: RoomType) -> Result<YearProfile, SynthesisError> {
        let occupancy = self.occupancy.occupancy_profile_for_room(room_type)?;
        if !self.base_data.dhw_off_at_night(room_type)? {
            return Ok(occupancy);
        }

        Ok(fix_nighttime_value(
            &occupancy,
            self.base_data.dhw_night_value()?,
            self.night_pattern,
        )?)
    }

    /// Hourly fraction of the building's nominal hot water demand, with rooms weighted by how
    /// much hot water they use. A building without hot water demand gets an all-zero profile.
    pub fn get_dhw_profile_for_building(&self) -> Result<YearProfile, SynthesisError> {
        if self.get_dhw_demand_for_building()?.is_zero() {
            warn!(
                building_type = %self.building_type.kind(),
                "no hot water demand in any room type, using an all-zero profile"
            );
            return Ok(constant_year_profile(0.));
        }

        self.building_type.synthesize_profiles_yearly_by_room_area_weighted(
            |room_type| self.get_dhw_profile_for_room(room_type),
            |room_type| self.get_dhw_demand_for_room(room_type),
        )
    }
}
