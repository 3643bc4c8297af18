use crate::core::base_data::VariationMonthlyBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::profile_generation::{expand_monthly_to_hourly, YearProfile};
use crate::core::room_type::RoomType;
use crate::core::units::{HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::errors::SynthesisError;

/// Seasonal usage factors per month, e.g. for schools closed over the summer.
pub struct VariationMonthlyGenerator<'a, B: VariationMonthlyBaseData + ?Sized> {
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
}

impl<'a, B: VariationMonthlyBaseData + ?Sized> VariationMonthlyGenerator<'a, B> {
    pub fn new(building_type: &'a BuildingTypeDefinition, base_data: &'a B) -> Self {
        Self {
            building_type,
            base_data,
        }
    }

    pub fn get_monthly_variation_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<[f64; MONTHS_PER_YEAR], SynthesisError> {
        Ok(self.base_data.monthly_variation(room_type)?)
    }

    pub fn get_monthly_variation_for_building(
        &self,
    ) -> Result<[f64; MONTHS_PER_YEAR], SynthesisError> {
        self.building_type
            .synthesize_monthly_by_room_area(|room_type| self.get_monthly_variation_for_room(room_type))
    }

    /// Monthly factors of the building held constant over every hour of their month.
    pub fn get_monthly_variation_profile_for_building(&self) -> Result<YearProfile, SynthesisError> {
        Ok(expand_monthly_to_hourly(
            &self.get_monthly_variation_for_building()?,
            &[1.; HOURS_PER_DAY],
        )?)
    }
}
