use crate::core::base_data::VentilationBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::generators::{AreaPerPersonProvider, OccupancyProfileProvider};
use crate::core::profile_generation::{fix_nighttime_value, YearProfile};
use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, Unit};
use crate::core::value_cache::ValuePerKeyCache;
use crate::core::variability::sample_normal_non_negative;
use crate::errors::{GeneratorError, SynthesisError};
use rand::Rng;
use tracing::{debug, warn};

/// Which of the two ways of stating a fresh air rate applies to a room type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VentilationBasis {
    /// in m3/(h.person), turned into a rate per floor area through the area per person
    PerPerson(Quantity),
    /// in m3/(h.m2)
    PerArea(Quantity),
}

/// Mechanical fresh air supply per floor area.
///
/// Every room type is ventilated either per person or per floor area, whichever rate its base
/// data defines. The per-person rate wins where both are defined.
pub struct VentilationRateGenerator<'a, B, A, O>
where
    B: VentilationBaseData + ?Sized,
    A: AreaPerPersonProvider + ?Sized,
    O: OccupancyProfileProvider + ?Sized,
{
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
    area_per_person: &'a A,
    occupancy: &'a O,
    night_pattern: &'a [bool],
    bases: ValuePerKeyCache<RoomType, VentilationBasis>,
}

impl<'a, B, A, O> VentilationRateGenerator<'a, B, A, O>
where
    B: VentilationBaseData + ?Sized,
    A: AreaPerPersonProvider + ?Sized,
    O: OccupancyProfileProvider + ?Sized,
{
    /// With variability, the rate of every room type is drawn from a normal distribution around
    /// its nominal rate with a standard deviation of a tenth of it, floored at zero.
    pub fn new<R: Rng + ?Sized>(
        building_type: &'a BuildingTypeDefinition,
        base_data: &'a B,
        area_per_person: &'a A,
        occupancy: &'a O,
        night_pattern: &'a [bool],
        variability: bool,
        rng: &mut R,
    ) -> Result<Self, SynthesisError> {
        let draw_basis = |room_type| -> Result<VentilationBasis, SynthesisError> {
            let basis = nominal_basis(base_data, room_type)?;
            if !variability {
                return Ok(basis);
            }
            Ok(match basis {
                VentilationBasis::PerPerson(rate) => {
                    VentilationBasis::PerPerson(sample_normal_non_negative(rate, &mut *rng)?)
                }
                VentilationBasis::PerArea(rate) => {
                    VentilationBasis::PerArea(sample_normal_non_negative(rate, &mut *rng)?)
                }
            })
        };
        let bases = ValuePerKeyCache::try_new(building_type.get_room_types(), draw_basis)?;
        if variability {
            debug!(building_type = %building_type.kind(), "drew ventilation rate per room type");
        }

        Ok(Self {
            building_type,
            base_data,
            area_per_person,
            occupancy,
            night_pattern,
            bases,
        })
    }

    pub fn get_ventilation_basis_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<VentilationBasis, SynthesisError> {
        Ok(*self.bases.lookup(room_type)?)
    }

    /// in m3/(h.m2)
    pub fn get_ventilation_rate_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<Quantity, SynthesisError> {
        match self.get_ventilation_basis_for_room(room_type)? {
            VentilationBasis::PerPerson(rate) => {
                self.per_person_to_per_area(room_type, rate)
            }
            VentilationBasis::PerArea(rate) => Ok(rate),
        }
    }

    pub fn get_ventilation_rate_for_building(&self) -> Result<Quantity, SynthesisError> {
        self.building_type
            .synthesize_value_by_room_area(|room_type| self.get_ventilation_rate_for_room(room_type))
    }

    /// Rate per floor area while the building sleeps. Only room types ventilated per person
    /// with a night rate contribute.
    pub fn get_night_ventilation_rate_for_building(&self) -> Result<Quantity, SynthesisError> {
        self.building_type.synthesize_value_by_room_area(|room_type| {
            let night_rate = self.base_data.night_ventilation_rate_per_person(room_type)?;
            match self.get_ventilation_basis_for_room(room_type)? {
                VentilationBasis::PerPerson(_) if !night_rate.is_zero() => {
                    self.per_person_to_per_area(room_type, night_rate)
                }
                _ => Ok(Quantity::zero(Unit::CubicMetrePerHourPerSquareMetre)),
            }
        })
    }

    /// Hourly fraction of the building's ventilation rate. Follows occupancy, with rooms weighted
    /// by their rate; where a night rate is defined, night hours run at the ratio of night rate to
    /// day rate instead.
    pub fn get_ventilation_profile_for_building(&self) -> Result<YearProfile, SynthesisError> {
        let day_profile = self.building_type.synthesize_profiles_yearly_by_room_area_weighted(
            |room_type| self.occupancy.occupancy_profile_for_room(room_type),
            |room_type| self.get_ventilation_rate_for_room(room_type),
        )?;
        let night_rate = self.get_night_ventilation_rate_for_building()?;
        if night_rate.is_zero() {
            return Ok(day_profile);
        }
        let night_fraction = night_rate.ratio(self.get_ventilation_rate_for_building()?)?;

        Ok(fix_nighttime_value(
            &day_profile,
            night_fraction,
            self.night_pattern,
        )?)
    }

    fn per_person_to_per_area(
        &self,
        room_type: RoomType,
        rate: Quantity,
    ) -> Result<Quantity, SynthesisError> {
        let area_per_person = self.area_per_person.area_per_person_for_room(room_type)?;
        if area_per_person.is_zero() {
            return Err(GeneratorError::NoPersonsInRoom { room_type }.into());
        }

        Ok(rate.per_person_to_per_area(area_per_person)?)
    }
}

fn nominal_basis<B: VentilationBaseData + ?Sized>(
    base_data: &B,
    room_type: RoomType,
) -> Result<VentilationBasis, SynthesisError> {
    let per_person = base_data
        .ventilation_rate_per_person(room_type)?
        .to(Unit::CubicMetrePerHourPerPerson)?;
    let per_area = base_data
        .ventilation_rate_per_area(room_type)?
        .to(Unit::CubicMetrePerHourPerSquareMetre)?;

    match (per_person.is_zero(), per_area.is_zero()) {
        (true, true) => Err(GeneratorError::MissingVentilationRate(room_type).into()),
        (true, false) => Ok(VentilationBasis::PerArea(per_area)),
        (false, true) => Ok(VentilationBasis::PerPerson(per_person)),
        (false, false) => {
            warn!(
                %room_type,
                %per_person,
                %per_area,
                "both per-person and per-area ventilation rates defined, using the per-person rate"
            );
            Ok(VentilationBasis::PerPerson(per_person))
        }
    }
}
