use crate::core::base_data::AreaPerPersonBaseData;
use crate::core::building_type::BuildingTypeDefinition;
use crate::core::generators::{
    draw_triangular, persons_per_area, AreaPerPersonProvider, RoomValues,
};
use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, Unit};
use crate::errors::SynthesisError;
use rand::Rng;
use tracing::debug;

/// Floor area per person of the room types of a building. A room type with zero area per person
/// hosts nobody.
pub struct AreaPerPersonGenerator<'a, B: AreaPerPersonBaseData + ?Sized> {
    building_type: &'a BuildingTypeDefinition,
    base_data: &'a B,
    values: RoomValues,
}

impl<'a, B: AreaPerPersonBaseData + ?Sized> AreaPerPersonGenerator<'a, B> {
    pub fn new<R: Rng + ?Sized>(
        building_type: &'a BuildingTypeDefinition,
        base_data: &'a B,
        variability: bool,
        rng: &mut R,
    ) -> Result<Self, SynthesisError> {
        let values = RoomValues::new(building_type, variability, rng, |room_type, rng| {
            draw_triangular(base_data.area_per_person_variability(room_type), rng)
        })?;
        if values.is_variable() {
            debug!(building_type = %building_type.kind(), "drew area per person per room type");
        }

        Ok(Self {
            building_type,
            base_data,
            values,
        })
    }

    pub fn get_area_per_person_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<Quantity, SynthesisError> {
        let area_per_person = self
            .values
            .get(room_type, |room_type| self.base_data.area_per_person(room_type))?;

        Ok(area_per_person.to(Unit::SquareMetrePerPerson)?)
    }

    pub fn get_persons_per_area_for_room(
        &self,
        room_type: RoomType,
    ) -> Result<Quantity, SynthesisError> {
        persons_per_area(self.get_area_per_person_for_room(room_type)?)
    }

    /// in m2/person, the room values weighted by the floor area fraction of their room type
    pub fn get_area_per_person_for_building(&self) -> Result<Quantity, SynthesisError> {
        self.building_type
            .synthesize_value_by_room_area(|room_type| self.get_area_per_person_for_room(room_type))
    }
}

impl<B: AreaPerPersonBaseData + ?Sized> AreaPerPersonProvider for AreaPerPersonGenerator<'_, B> {
    fn area_per_person_for_room(&self, room_type: RoomType) -> Result<Quantity, SynthesisError> {
        self.get_area_per_person_for_room(room_type)
    }
}
