use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Usage category of a room as catalogued by SIA 2024:2016. A room type carries no data of its
/// own; all nominal values are looked up from base data keyed by it.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(try_from = "String", into = "String")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RoomType {
    DwellingMfh,
    DwellingSfh,
    HotelRoom,
    OfficeSingle,
    OfficeOpenPlan,
    MeetingRoom,
    Classroom,
    TeachersRoom,
    Library,
    LectureHall,
    FoodShop,
    SpecialistShop,
    Restaurant,
    SelfServiceRestaurant,
    RestaurantKitchen,
    HospitalWard,
    TreatmentRoom,
    Production,
    Laboratory,
    StorageHall,
    Gym,
    Corridor,
    #[strum(serialize = "corridor_24h")]
    Corridor24h,
    Staircase,
    Storage,
    Kitchenette,
    Bathroom,
    LockerRoom,
    ParkingGarage,
    ServerRoom,
}

impl RoomType {
    pub fn sia_code(&self) -> &'static str {
        match self {
            RoomType::DwellingMfh => "1.1",
            RoomType::DwellingSfh => "1.2",
            RoomType::HotelRoom => "2.1",
            RoomType::OfficeSingle => "3.1",
            RoomType::OfficeOpenPlan => "3.2",
            RoomType::MeetingRoom => "3.3",
            RoomType::Classroom => "4.1",
            RoomType::TeachersRoom => "4.2",
            RoomType::Library => "4.3",
            RoomType::LectureHall => "4.4",
            RoomType::FoodShop => "5.1",
            RoomType::SpecialistShop => "5.2",
            RoomType::Restaurant => "6.1",
            RoomType::SelfServiceRestaurant => "6.2",
            RoomType::RestaurantKitchen => "6.3",
            RoomType::HospitalWard => "8.1",
            RoomType::TreatmentRoom => "8.3",
            RoomType::Production => "9.1",
            RoomType::Laboratory => "9.3",
            RoomType::StorageHall => "10.1",
            RoomType::Gym => "11.1",
            RoomType::Corridor => "12.1",
            RoomType::Corridor24h => "12.2",
            RoomType::Staircase => "12.3",
            RoomType::Storage => "12.4",
            RoomType::Kitchenette => "12.5",
            RoomType::Bathroom => "12.6",
            RoomType::LockerRoom => "12.8",
            RoomType::ParkingGarage => "12.9",
            RoomType::ServerRoom => "12.12",
        }
    }

    /// Parse a room type from either its snake_case name or its SIA 2024 code (e.g. "3.1").
    pub fn from_key(key: &str) -> Result<Self, RoomTypeParseError> {
        let key = key.trim();
        key.parse::<RoomType>()
            .ok()
            .or_else(|| RoomType::iter().find(|room_type| room_type.sia_code() == key))
            .ok_or_else(|| RoomTypeParseError(key.to_string()))
    }
}

impl TryFrom<String> for RoomType {
    type Error = RoomTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomType::from_key(&value)
    }
}

impl From<RoomType> for String {
    fn from(value: RoomType) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Unknown room type '{0}'")]
pub struct RoomTypeParseError(pub String);
