use crate::core::base_data::{OccupancyBaseData, VariationMonthlyBaseData};
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::generators::variation_monthly::VariationMonthlyGenerator;
use crate::core::generators::{persons_per_area, AreaPerPersonProvider, OccupancyProfileProvider};
use crate::core::profile_generation::{
    apply_weekend_override, expand_monthly_to_hourly, YearProfile,
};
use crate::core::room_type::RoomType;
use crate::core::value_cache::ValuePerKeyCache;
use crate::errors::SynthesisError;
use chrono::NaiveDate;

/// Fraction of the persons of each room type present per hour of the year.
///
/// A room's profile repeats its working-day profile over the year, scaled by the room's monthly
/// factors, and is empty on rest days. Profiles are built once per room type at construction.
pub struct OccupancyProfileGenerator<'a, A: AreaPerPersonProvider + ?Sized> {
    building_type: &'a BuildingTypeDefinition,
    area_per_person: &'a A,
    profiles: ValuePerKeyCache<RoomType, YearProfile>,
}

impl<'a, A: AreaPerPersonProvider + ?Sized> OccupancyProfileGenerator<'a, A> {
    /// Arguments:
    /// * `building_type` - room type split of the building
    /// * `base_data` - working-day occupancy, rest days and monthly factors per room type
    /// * `area_per_person` - weighs the room profiles by the persons they host
    /// * `start_date` - calendar date of the first hour, to place rest days
    pub fn new<B: OccupancyBaseData + VariationMonthlyBaseData + ?Sized>(
        building_type: &'a BuildingTypeDefinition,
        base_data: &B,
        area_per_person: &'a A,
        start_date: NaiveDate,
    ) -> Result<Self, SynthesisError> {
        let monthly = VariationMonthlyGenerator::new(building_type, base_data);
        let room_profile = |room_type| -> Result<YearProfile, SynthesisError> {
            let working_days = expand_monthly_to_hourly(
                &monthly.get_monthly_variation_for_room(room_type)?,
                &base_data.daily_occupancy(room_type)?,
            )?;
            Ok(apply_weekend_override(
                &working_days,
                base_data.rest_days_per_week(room_type)?,
                0.,
                start_date,
            )?)
        };
        let profiles = ValuePerKeyCache::try_new(building_type.get_room_types(), room_profile)?;

        Ok(Self {
            building_type,
            area_per_person,
            profiles,
        })
    }

    pub fn get_occupancy_profile_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<&YearProfile, SynthesisError> {
        Ok(self.profiles.lookup(room_type)?)
    }

    /// Fraction of all persons of the building present per hour. Rooms count by the number of
    /// persons they host, not by their floor area alone.
    pub fn get_occupancy_profile_for_building(&self) -> Result<YearProfile, SynthesisError> {
        self.building_type.synthesize_profiles_yearly_by_room_area_weighted(
            |room_type| self.occupancy_profile_for_room(room_type),
            |room_type| persons_per_area(self.area_per_person.area_per_person_for_room(room_type)?),
        )
    }
}

impl<A: AreaPerPersonProvider + ?Sized> OccupancyProfileProvider
    for OccupancyProfileGenerator<'_, A>
{
    fn occupancy_profile_for_room(&self, room_type: RoomType) -> Result<YearProfile, SynthesisError> {
        Ok(self.get_occupancy_profile_for_room(room_type)?.clone())
    }
}
