use crate::core::building_type::BuildingTypeError;
use crate::core::nighttime_pattern::NighttimePatternError;
use crate::core::profile_generation::ProfileError;
use crate::core::room_type::{RoomType, RoomTypeParseError};
use crate::core::units::UnitError;
use crate::core::value_cache::CacheLookupError;
use crate::core::variability::{TriangularLimitsError, VariabilityError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Invalid building type: {0}")]
    BuildingType(#[from] BuildingTypeError),
    #[error("Invalid nighttime pattern: {0}")]
    NighttimePattern(#[from] NighttimePatternError),
    #[error("Invalid generator input: {0}")]
    Generator(#[from] GeneratorError),
    #[error("Profile could not be built: {0}")]
    Profile(#[from] ProfileError),
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),
    #[error("Variability could not be applied: {0}")]
    Variability(#[from] VariabilityError),
    #[error("Lookup error: {0}")]
    CacheLookup(#[from] CacheLookupError),
    #[error("Unknown room type: {0}")]
    RoomTypeParse(#[from] RoomTypeParseError),
    #[error("Base data could not be accessed: {0}")]
    BaseData(#[from] anyhow::Error),
}

impl From<TriangularLimitsError> for SynthesisError {
    fn from(error: TriangularLimitsError) -> Self {
        SynthesisError::Variability(error.into())
    }
}

/// Base data that is readable but inconsistent for the generator consuming it.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeneratorError {
    #[error("Neither a per-person nor a per-area ventilation rate is defined for room type {0}")]
    MissingVentilationRate(RoomType),
    #[error("Room type {room_type} hosts no persons, so no per-person rate can be applied to it")]
    NoPersonsInRoom { room_type: RoomType },
    #[error("Standby fraction {fraction} of room type {room_type} is outside [0, 1]")]
    StandbyFractionOutOfRange { room_type: RoomType, fraction: f64 },
}
