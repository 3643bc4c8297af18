pub mod activity_heat_gain;
pub mod appliances;
pub mod area_per_person;
pub mod dhw_demand;
pub mod infiltration;
pub mod lighting;
pub mod occupancy;
pub mod variation_monthly;
pub mod ventilation;

use crate::core::building_type::BuildingTypeDefinition;
use crate::core::profile_generation::YearProfile;
use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, Unit};
use crate::core::value_cache::ValuePerKeyCache;
use crate::core::variability::{sample_triangular_quantity, VariabilityTriple};
use crate::errors::SynthesisError;
use rand::Rng;

/// Floor area available to each person in a room type, possibly drawn per building.
pub trait AreaPerPersonProvider {
    fn area_per_person_for_room(&self, room_type: RoomType) -> Result<Quantity, SynthesisError>;
}

/// Hourly fraction of the persons of a room type present over the year.
pub trait OccupancyProfileProvider {
    fn occupancy_profile_for_room(&self, room_type: RoomType)
        -> Result<YearProfile, SynthesisError>;
}

/// Per-room values of one domain: either read from base data on every query, or drawn once per
/// room type of the building when variability is active.
#[derive(Clone, Debug)]
pub(crate) enum RoomValues {
    Nominal,
    Sampled(ValuePerKeyCache<RoomType, Quantity>),
}

impl RoomValues {
    pub(crate) fn new<R: Rng + ?Sized>(
        building_type: &BuildingTypeDefinition,
        variability: bool,
        rng: &mut R,
        mut draw: impl FnMut(RoomType, &mut R) -> Result<Quantity, SynthesisError>,
    ) -> Result<Self, SynthesisError> {
        if !variability {
            return Ok(RoomValues::Nominal);
        }
        let cache = ValuePerKeyCache::try_new(building_type.get_room_types(), |room_type| {
            draw(room_type, &mut *rng)
        })?;

        Ok(RoomValues::Sampled(cache))
    }

    pub(crate) fn get(
        &self,
        room_type: RoomType,
        nominal: impl FnOnce(RoomType) -> anyhow::Result<Quantity>,
    ) -> Result<Quantity, SynthesisError> {
        match self {
            RoomValues::Nominal => Ok(nominal(room_type)?),
            RoomValues::Sampled(cache) => Ok(*cache.lookup(room_type)?),
        }
    }

    pub(crate) fn is_variable(&self) -> bool {
        matches!(self, RoomValues::Sampled(_))
    }
}

pub(crate) fn draw_triangular<R: Rng + ?Sized>(
    triple: anyhow::Result<VariabilityTriple>,
    rng: &mut R,
) -> Result<Quantity, SynthesisError> {
    Ok(sample_triangular_quantity(&triple?, rng)?)
}

/// Persons per floor area of a room type; zero where nobody stays.
pub(crate) fn persons_per_area(area_per_person: Quantity) -> Result<Quantity, SynthesisError> {
    let area_per_person = area_per_person.to(Unit::SquareMetrePerPerson)?;
    let persons = if area_per_person.is_zero() {
        0.
    } else {
        1. / area_per_person.magnitude()
    };

    Ok(Quantity::new(persons, Unit::PersonPerSquareMetre))
}
