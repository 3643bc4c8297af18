use crate::core::base_data::LightingBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::generators::{draw_triangular, OccupancyProfileProvider, RoomValues};
use crate::core::profile_generation::{constant_year_profile, fix_nighttime_value, YearProfile};
use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, Unit};
use crate::errors::SynthesisError;
use rand::Rng;
use tracing::debug;

/// Installed lighting power per floor area, switched on while rooms are occupied.
pub struct LightingPowerGenerator<'a, B, O>
where
    B: LightingBaseData + ?Sized,
    O: OccupancyProfileProvider + ?Sized,
{
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
    occupancy: &'a O,
    night_pattern: &'a [bool],
    values: RoomValues,
}

impl<'a, B, O> LightingPowerGenerator<'a, B, O>
where
    B: LightingBaseData + ?Sized,
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
        let values = RoomValues::new(building_type, variability, rng, |room_type, rng| {
            draw_triangular(base_data.lighting_power_variability(room_type), rng)
        })?;
        if values.is_variable() {
            debug!(building_type = %building_type.kind(), "drew lighting power per room type");
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
    pub fn get_lighting_power_for_room(&self, room_type: RoomType) -> Result<Quantity, SynthesisError> {
        let power = self
            .values
            .get(room_type, |room_type| self.base_data.lighting_power(room_type))?;

        Ok(power.to(Unit::WattPerSquareMetre)?)
    }

    pub fn get_lighting_power_for_building(&self) -> Result<Quantity, SynthesisError> {
        self.building_type
            .synthesize_value_by_room_area(|room_type| self.get_lighting_power_for_room(room_type))
    }

    /// Hourly fraction of the building's lighting power: occupancy weighted by the lighting power
    /// of each room, and dark while the building sleeps.
    pub fn get_lighting_profile_for_building(&self) -> Result<YearProfile, SynthesisError> {
        if self.get_lighting_power_for_building()?.is_zero() {
            return Ok(constant_year_profile(0.));
        }
        let day_profile = self.building_type.synthesize_profiles_yearly_by_room_area_weighted(
            |room_type| self.occupancy.occupancy_profile_for_room(room_type),
            |room_type| self.get_lighting_power_for_room(room_type),
        )?;

        Ok(fix_nighttime_value(&day_profile, 0., self.night_pattern)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::building_type::BuildingTypeKind;
    use crate::core::units::{HOURS_PER_DAY, HOURS_PER_YEAR};
    use crate::core::variability::VariabilityTriple;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use rstest::*;

    struct Luminaires;

    impl LightingBaseData for Luminaires {
        fn lighting_power(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
            Ok(Quantity::new(
                if room_type == RoomType::Classroom { 10. } else { 5. },
                Unit::WattPerSquareMetre,
            ))
        }

        fn lighting_power_variability(
            &self,
            _room_type: RoomType,
        ) -> anyhow::Result<VariabilityTriple> {
            let power = |value| Quantity::new(value, Unit::WattPerSquareMetre);
            Ok(VariabilityTriple {
                min: power(4.),
                max: power(12.),
                peak: power(8.),
            })
        }
    }

    struct ClassroomOccupancy;

    impl OccupancyProfileProvider for ClassroomOccupancy {
        fn occupancy_profile_for_room(
            &self,
            room_type: RoomType,
        ) -> Result<YearProfile, SynthesisError> {
            Ok(constant_year_profile(
                if room_type == RoomType::Classroom { 1. } else { 0.2 },
            ))
        }
    }

    #[fixture]
    fn school() -> BuildingTypeDefinition {
        BuildingTypeDefinition::new(
            BuildingTypeKind::School,
            [(RoomType::Classroom, 0.5), (RoomType::Corridor, 0.5)],
        )
        .unwrap()
    }

    #[fixture]
    fn night_pattern() -> Vec<bool> {
        (0..HOURS_PER_YEAR)
            .map(|hour| !(6..20).contains(&(hour % HOURS_PER_DAY)))
            .collect()
    }

    #[rstest]
    fn should_follow_occupancy_by_day_and_switch_off_at_night(
        school: BuildingTypeDefinition,
        night_pattern: Vec<bool>,
    ) {
        let generator = LightingPowerGenerator::new(
            &school,
            &Luminaires,
            &ClassroomOccupancy,
            &night_pattern,
            false,
            &mut Pcg64::seed_from_u64(0),
        )
        .unwrap();

        assert_relative_eq!(
            generator.get_lighting_power_for_building().unwrap().magnitude(),
            7.5
        );
        let profile = generator.get_lighting_profile_for_building().unwrap();
        assert_eq!(profile[3], 0.);
        assert_relative_eq!(
            profile[12],
            0.5 * 10. / 7.5 + 0.5 * 0.2 * 5. / 7.5,
            epsilon = 1e-12
        );
    }

    #[rstest]
    fn should_draw_power_within_calibrated_limits(
        school: BuildingTypeDefinition,
        night_pattern: Vec<bool>,
    ) {
        let generator = LightingPowerGenerator::new(
            &school,
            &Luminaires,
            &ClassroomOccupancy,
            &night_pattern,
            true,
            &mut Pcg64::seed_from_u64(8),
        )
        .unwrap();
        let classroom = generator
            .get_lighting_power_for_room(RoomType::Classroom)
            .unwrap();
        assert!(classroom.magnitude() > 0.);
        assert_ne!(classroom.magnitude(), 10.);
    }
}
