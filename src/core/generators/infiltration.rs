use crate::core::base_data::InfiltrationBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::generators::{draw_triangular, RoomValues};
use crate::core::profile_generation::{constant_year_profile, YearProfile};
use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, Unit};
use crate::errors::SynthesisError;
use rand::Rng;
use tracing::debug;

/// Air leaking through the building envelope, independent of how the building is used.
pub struct InfiltrationRateGenerator<'a, B: InfiltrationBaseData + ?Sized> {
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
    values: RoomValues,
}

impl<'a, B: InfiltrationBaseData + ?Sized> InfiltrationRateGenerator<'a, B> {
    pub fn new<R: Rng + ?Sized>(
        building_type: &'a BuildingTypeDefinition,
        base_data: &'a B,
        variability: bool,
        rng: &mut R,
    ) -> Result<Self, SynthesisError> {
        let values = RoomValues::new(building_type, variability, rng, |room_type, rng| {
            draw_triangular(base_data.infiltration_rate_variability(room_type), rng)
        })?;
        if values.is_variable() {
            debug!(building_type = %building_type.kind(), "drew infiltration rate per room type");
        }

        Ok(Self {
            building_type,
            base_data,
            values,
        })
    }

    pub fn get_infiltration_rate_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<Quantity, SynthesisError> {
        let rate = self
            .values
            .get(room_type, |room_type| self.base_data.infiltration_rate(room_type))?;

        Ok(rate.to(Unit::AirChangesPerHour)?)
    }

    /// in air changes per hour
    pub fn get_infiltration_rate_for_building(&self) -> Result<Quantity, SynthesisError> {
        self.building_type
            .synthesize_value_by_room_area(|room_type| self.get_infiltration_rate_for_room(room_type))
    }

    /// Infiltration never stops, so its profile is a constant fraction of one.
    pub fn get_infiltration_profile_for_building(&self) -> YearProfile {
        constant_year_profile(1.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::building_type::BuildingTypeKind;
    use crate::core::variability::VariabilityTriple;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use rstest::*;

    struct LeakyEnvelope;

    impl InfiltrationBaseData for LeakyEnvelope {
        fn infiltration_rate(&self, room_type: RoomType) -> anyhow::Result<Quantity> {
            Ok(Quantity::new(
                if room_type == RoomType::ParkingGarage { 0.5 } else { 0.1 },
                Unit::AirChangesPerHour,
            ))
        }

        fn infiltration_rate_variability(
            &self,
            room_type: RoomType,
        ) -> anyhow::Result<VariabilityTriple> {
            let ach = |value| Quantity::new(value, Unit::AirChangesPerHour);
            Ok(match room_type {
                // percentile bounds straddling zero
                RoomType::StorageHall => VariabilityTriple {
                    min: ach(-2.),
                    max: ach(1.),
                    peak: ach(0.),
                },
                _ => VariabilityTriple {
                    min: ach(0.05),
                    max: ach(0.3),
                    peak: ach(0.1),
                },
            })
        }
    }

    #[fixture]
    fn office() -> BuildingTypeDefinition {
        BuildingTypeDefinition::new(
            BuildingTypeKind::Office,
            [(RoomType::OfficeSingle, 0.8), (RoomType::ParkingGarage, 0.2)],
        )
        .unwrap()
    }

    #[rstest]
    fn should_aggregate_nominal_rate(office: BuildingTypeDefinition) {
        let generator =
            InfiltrationRateGenerator::new(&office, &LeakyEnvelope, false, &mut Pcg64::seed_from_u64(0))
                .unwrap();
        let rate = generator.get_infiltration_rate_for_building().unwrap();
        assert_eq!(rate.unit(), Unit::AirChangesPerHour);
        assert_relative_eq!(rate.magnitude(), 0.18, epsilon = 1e-12);
        assert!(generator
            .get_infiltration_profile_for_building()
            .iter()
            .all(|value| *value == 1.));
    }

    #[rstest]
    fn should_draw_rates_within_calibrated_limits(office: BuildingTypeDefinition) {
        for seed in 0..20 {
            let generator = InfiltrationRateGenerator::new(
                &office,
                &LeakyEnvelope,
                true,
                &mut Pcg64::seed_from_u64(seed),
            )
            .unwrap();
            let rate = generator
                .get_infiltration_rate_for_room(RoomType::OfficeSingle)
                .unwrap();
            assert!((0.0096..=0.37).contains(&rate.magnitude()));
            assert_eq!(
                rate,
                generator
                    .get_infiltration_rate_for_room(RoomType::OfficeSingle)
                    .unwrap()
            );
        }
    }

    #[rstest]
    fn should_keep_negative_draws() {
        let storage_hall =
            BuildingTypeDefinition::new(BuildingTypeKind::Shop, [(RoomType::StorageHall, 1.)]).unwrap();
        let rates = (0..200)
            .map(|seed| {
                InfiltrationRateGenerator::new(
                    &storage_hall,
                    &LeakyEnvelope,
                    true,
                    &mut Pcg64::seed_from_u64(seed),
                )
                .unwrap()
                .get_infiltration_rate_for_building()
                .unwrap()
                .magnitude()
            })
            .collect::<Vec<_>>();
        assert!(rates.iter().filter(|rate| **rate < 0.).count() > 100);
        assert!(rates.iter().all(|rate| *rate >= -2.78));
    }
}
