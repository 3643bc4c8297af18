use crate::core::base_data::ActivityBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::profile_generation::{constant_year_profile, YearProfile};
use crate::core::units::{
    Dimension, Quantity, Unit, BODY_SURFACE_AREA, WATTS_PER_SQUARE_METRE_PER_MET,
};
use crate::errors::SynthesisError;

/// Heat given off by each person present, from the metabolic rate of the activity typical
/// for each room type.
pub struct ActivityHeatGainGenerator<'a, B: ActivityBaseData + ?Sized> {
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
}

impl<'a, B: ActivityBaseData + ?Sized> ActivityHeatGainGenerator<'a, B> {
    pub fn new(building_type: &'a BuildingTypeDefinition, base_data: &'a B) -> Self {
        Self {
            building_type,
            base_data,
        }
    }

    pub fn get_activity_met_for_building(&self) -> Result<Quantity, SynthesisError> {
        let met = self.building_type.synthesize_value_by_room_area(|room_type| {
            Ok(self.base_data.activity_met(room_type)?)
        })?;

        Ok(met.ensure_dimension(Dimension::Metabolic)?)
    }

    /// in W/person
    pub fn get_activity_heat_gain_for_building(&self) -> Result<Quantity, SynthesisError> {
        met_to_heat_gain(self.get_activity_met_for_building()?)
    }

    /// The heat gain per person holds for every hour of the year; presence of persons is
    /// accounted for by the occupancy profile.
    pub fn get_activity_heat_gain_profile_for_building(&self) -> Result<YearProfile, SynthesisError> {
        Ok(constant_year_profile(
            self.get_activity_heat_gain_for_building()?.magnitude(),
        ))
    }
}

fn met_to_heat_gain(met: Quantity) -> Result<Quantity, SynthesisError> {
    let met = met.magnitude_in(Unit::Met)?;

    Ok(Quantity::new(
        met * WATTS_PER_SQUARE_METRE_PER_MET * BODY_SURFACE_AREA,
        Unit::WattPerPerson,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::building_type::BuildingTypeKind;
    use crate::core::room_type::RoomType;
    use crate::core::units::HOURS_PER_YEAR;
    use approx::assert_relative_eq;
    use rstest::*;

    struct MetTable;

    impl ActivityBaseData for MetTable {
        fn activity_met(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
            Ok(match room_type {
                RoomType::OfficeOpenPlan => Quantity::new(1.2, Unit::Met),
                _ => Quantity::new(1.0, Unit::Met),
            })
        }
    }

    #[rstest]
    fn should_convert_met_to_heat_gain_per_person() {
        assert_relative_eq!(
            met_to_heat_gain(Quantity::new(1., Unit::Met))
                .unwrap()
                .magnitude(),
            104.4,
            epsilon = 1e-12
        );
        assert!(met_to_heat_gain(Quantity::new(1., Unit::Watt)).is_err());
    }

    #[rstest]
    fn should_synthesize_constant_heat_gain_profile() {
        let office = BuildingTypeDefinition::new(
            BuildingTypeKind::Office,
            [(RoomType::OfficeOpenPlan, 0.5), (RoomType::Corridor, 0.5)],
        )
        .unwrap();
        let generator = ActivityHeatGainGenerator::new(&office, &MetTable);

        let met = generator.get_activity_met_for_building().unwrap();
        assert_relative_eq!(met.magnitude(), 1.1, epsilon = 1e-12);
        let heat_gain = generator.get_activity_heat_gain_for_building().unwrap();
        assert_eq!(heat_gain.unit(), Unit::WattPerPerson);
        assert_relative_eq!(heat_gain.magnitude(), 1.1 * 58. * 1.8, epsilon = 1e-9);

        let profile = generator.get_activity_heat_gain_profile_for_building().unwrap();
        assert_eq!(profile.len(), HOURS_PER_YEAR);
        assert!(profile.iter().all(|value| *value == heat_gain.magnitude()));
    }
}
