use crate::core::profile_generation::{check_year_length, YearProfile};
use crate::core::room_type::RoomType;
use crate::core::units::{Quantity, HOURS_PER_YEAR, MONTHS_PER_YEAR};
use crate::errors::SynthesisError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Tolerance on the sum of the area fractions of a building type.
pub const AREA_FRACTION_TOLERANCE: f64 = 1e-4;

#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize,
)]
#[serde(try_from = "String", into = "String")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum BuildingTypeKind {
    Mfh,
    Sfh,
    Office,
    School,
    Shop,
    Restaurant,
    Hospital,
    Hotel,
}

impl BuildingTypeKind {
    pub fn from_key(key: &str) -> Result<Self, BuildingTypeParseError> {
        key.trim()
            .parse::<BuildingTypeKind>()
            .map_err(|_| BuildingTypeParseError(key.trim().to_string()))
    }
}

impl TryFrom<String> for BuildingTypeKind {
    type Error = BuildingTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BuildingTypeKind::from_key(&value)
    }
}

impl From<BuildingTypeKind> for String {
    fn from(value: BuildingTypeKind) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Unknown building type '{0}'")]
pub struct BuildingTypeParseError(pub String);

#[derive(Clone, Debug, Error, PartialEq)]
pub enum BuildingTypeError {
    #[error("Building type {0} does not define any room types")]
    NoRoomTypes(BuildingTypeKind),
    #[error("Room type {room_type} is listed more than once in building type {kind}")]
    DuplicateRoomType {
        kind: BuildingTypeKind,
        room_type: RoomType,
    },
    #[error("Area fraction {fraction} of room type {room_type} in building type {kind} is outside [0, 1]")]
    FractionOutOfRange {
        kind: BuildingTypeKind,
        room_type: RoomType,
        fraction: f64,
    },
    #[error("Area fractions of building type {kind} sum to {sum}, but must sum to 1 (tolerance {AREA_FRACTION_TOLERANCE})")]
    FractionSum { kind: BuildingTypeKind, sum: f64 },
    #[error("Weighting factor aggregates to zero over building type {0}, profiles cannot be weighted by it")]
    ZeroAggregateFactor(BuildingTypeKind),
}

/// How a building type archetype is described in JSON input.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingTypeInput {
    pub kind: BuildingTypeKind,
    pub room_types: IndexMap<RoomType, f64>,
}

/// Fixed split of a building archetype's floor area into room types. Validated once at
/// construction and afterwards only read, so a single definition can be shared between any
/// number of buildings.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingTypeDefinition {
    kind: BuildingTypeKind,
    room_type_fractions: IndexMap<RoomType, f64>,
}

impl BuildingTypeDefinition {
    pub fn new(
        kind: BuildingTypeKind,
        room_type_fractions: impl IntoIterator<Item = (RoomType, f64)>,
    ) -> Result<Self, BuildingTypeError> {
        let mut fractions: IndexMap<RoomType, f64> = Default::default();
        for (room_type, fraction) in room_type_fractions {
            if !(0. ..=1.).contains(&fraction) {
                return Err(BuildingTypeError::FractionOutOfRange {
                    kind,
                    room_type,
                    fraction,
                });
            }
            if fractions.insert(room_type, fraction).is_some() {
                return Err(BuildingTypeError::DuplicateRoomType { kind, room_type });
            }
        }
        if fractions.is_empty() {
            return Err(BuildingTypeError::NoRoomTypes(kind));
        }
        let sum = fractions.values().sum::<f64>();
        if !is_close!(sum, 1., abs_tol = AREA_FRACTION_TOLERANCE) {
            return Err(BuildingTypeError::FractionSum { kind, sum });
        }

        Ok(Self {
            kind,
            room_type_fractions: fractions,
        })
    }

    pub fn from_json(json: impl Read) -> anyhow::Result<Self> {
        let input: BuildingTypeInput = serde_json::from_reader(json)?;
        Ok(Self::try_from(input)?)
    }

    pub fn kind(&self) -> BuildingTypeKind {
        self.kind
    }

    /// Room types making up this building type, in definition order.
    pub fn get_room_types(&self) -> Vec<RoomType> {
        self.room_type_fractions.keys().copied().collect()
    }

    pub fn fraction(&self, room_type: RoomType) -> Option<f64> {
        self.room_type_fractions.get(&room_type).copied()
    }

    /// Area-weighted sum of a per-room value over all room types of this building type. The
    /// result is in the unit of the value returned for the first room type.
    pub fn synthesize_value_by_room_area(
        &self,
        mut value_per_room: impl FnMut(RoomType) -> Result<Quantity, SynthesisError>,
    ) -> Result<Quantity, SynthesisError> {
        let mut unit = None;
        let mut total = 0.;
        for (room_type, fraction) in &self.room_type_fractions {
            let value = value_per_room(*room_type)?;
            let unit = *unit.get_or_insert(value.unit());
            total += fraction * value.magnitude_in(unit)?;
        }
        let unit = unit.ok_or(BuildingTypeError::NoRoomTypes(self.kind))?;

        Ok(Quantity::new(total, unit))
    }

    pub fn synthesize_monthly_by_room_area(
        &self,
        mut monthly_per_room: impl FnMut(RoomType) -> Result<[f64; MONTHS_PER_YEAR], SynthesisError>,
    ) -> Result<[f64; MONTHS_PER_YEAR], SynthesisError> {
        let mut monthly = [0.; MONTHS_PER_YEAR];
        for (room_type, fraction) in &self.room_type_fractions {
            for (total, value) in monthly.iter_mut().zip(monthly_per_room(*room_type)?) {
                *total += fraction * value;
            }
        }

        Ok(monthly)
    }

    /// Area-weighted combination of hourly per-room profiles.
    pub fn synthesize_profiles_yearly_by_room_area(
        &self,
        profile_per_room: impl FnMut(RoomType) -> Result<YearProfile, SynthesisError>,
    ) -> Result<YearProfile, SynthesisError> {
        self.combine_room_profiles(profile_per_room, None)
    }

    /// Area-weighted combination of hourly per-room profiles, where each room's contribution is
    /// additionally scaled by its factor relative to the building-level aggregate of that factor.
    /// Rooms with a demand intensity above the building average thereby weigh more in the
    /// combined profile than their floor area alone would give them.
    ///
    /// Fails with `BuildingTypeError::ZeroAggregateFactor` when the factor aggregates to zero.
    pub fn synthesize_profiles_yearly_by_room_area_weighted(
        &self,
        profile_per_room: impl FnMut(RoomType) -> Result<YearProfile, SynthesisError>,
        mut additional_factor_per_room: impl FnMut(RoomType) -> Result<Quantity, SynthesisError>,
    ) -> Result<YearProfile, SynthesisError> {
        let factors = self
            .room_type_fractions
            .keys()
            .map(|room_type| Ok((*room_type, additional_factor_per_room(*room_type)?)))
            .collect::<Result<IndexMap<_, _>, SynthesisError>>()?;
        let aggregate = self.synthesize_value_by_room_area(|room_type| Ok(factors[&room_type]))?;
        if aggregate.is_zero() {
            return Err(BuildingTypeError::ZeroAggregateFactor(self.kind).into());
        }
        let weights = factors
            .values()
            .map(|factor| factor.magnitude_in(aggregate.unit()).map(|f| f / aggregate.magnitude()))
            .collect::<Result<Vec<_>, _>>()?;

        self.combine_room_profiles(profile_per_room, Some(weights))
    }

    fn combine_room_profiles(
        &self,
        mut profile_per_room: impl FnMut(RoomType) -> Result<YearProfile, SynthesisError>,
        weights: Option<Vec<f64>>,
    ) -> Result<YearProfile, SynthesisError> {
        let mut combined = vec![0.; HOURS_PER_YEAR];
        for (idx, (room_type, fraction)) in self.room_type_fractions.iter().enumerate() {
            let profile = profile_per_room(*room_type)?;
            check_year_length(&profile)?;
            let factor = fraction * weights.as_ref().map_or(1., |weights| weights[idx]);
            for (total, value) in combined.iter_mut().zip(profile) {
                *total += factor * value;
            }
        }

        Ok(combined)
    }
}

impl TryFrom<BuildingTypeInput> for BuildingTypeDefinition {
    type Error = BuildingTypeError;

    fn try_from(input: BuildingTypeInput) -> Result<Self, Self::Error> {
        Self::new(input.kind, input.room_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile_generation::ProfileError;
    use crate::core::units::Unit;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    #[fixture]
    fn two_room_building() -> BuildingTypeDefinition {
        BuildingTypeDefinition::new(
            BuildingTypeKind::Office,
            [(RoomType::OfficeOpenPlan, 0.7), (RoomType::Corridor, 0.3)],
        )
        .unwrap()
    }

    fn office_or_corridor<T>(room_type: RoomType, office: T, corridor: T) -> T {
        if room_type == RoomType::OfficeOpenPlan {
            office
        } else {
            corridor
        }
    }

    #[rstest]
    fn should_reject_fractions_not_summing_to_one() {
        let result = BuildingTypeDefinition::new(
            BuildingTypeKind::Mfh,
            [(RoomType::DwellingMfh, 0.7), (RoomType::Corridor, 0.2)],
        );
        assert!(matches!(result, Err(BuildingTypeError::FractionSum { .. })));
    }

    #[rstest]
    fn should_accept_fractions_within_tolerance() {
        assert!(BuildingTypeDefinition::new(
            BuildingTypeKind::Mfh,
            [
                (RoomType::DwellingMfh, 0.7),
                (RoomType::Corridor, 0.2),
                (RoomType::Storage, 0.10005),
            ],
        )
        .is_ok());
    }

    #[rstest]
    fn should_reject_invalid_definitions() {
        assert_eq!(
            BuildingTypeDefinition::new(BuildingTypeKind::Shop, Vec::<(RoomType, f64)>::new()),
            Err(BuildingTypeError::NoRoomTypes(BuildingTypeKind::Shop))
        );
        assert!(matches!(
            BuildingTypeDefinition::new(
                BuildingTypeKind::Shop,
                [(RoomType::FoodShop, 1.2), (RoomType::Storage, -0.2)]
            ),
            Err(BuildingTypeError::FractionOutOfRange { .. })
        ));
        assert!(matches!(
            BuildingTypeDefinition::new(
                BuildingTypeKind::Shop,
                [(RoomType::FoodShop, 0.5), (RoomType::FoodShop, 0.5)]
            ),
            Err(BuildingTypeError::DuplicateRoomType { .. })
        ));
    }

    #[rstest]
    fn should_synthesize_area_weighted_value(two_room_building: BuildingTypeDefinition) {
        let value = two_room_building
            .synthesize_value_by_room_area(|room_type| {
                Ok(Quantity::new(
                    office_or_corridor(room_type, 10., 20.),
                    Unit::WattPerSquareMetre,
                ))
            })
            .unwrap();
        assert_eq!(value.unit(), Unit::WattPerSquareMetre);
        assert_relative_eq!(value.magnitude(), 13.0);
    }

    #[rstest]
    fn should_convert_room_values_to_a_common_unit(two_room_building: BuildingTypeDefinition) {
        let value = two_room_building
            .synthesize_value_by_room_area(|room_type| {
                Ok(office_or_corridor(
                    room_type,
                    Quantity::new(10., Unit::Watt),
                    Quantity::new(0.02, Unit::Kilowatt),
                ))
            })
            .unwrap();
        assert_relative_eq!(value.magnitude(), 13.0);

        assert!(two_room_building
            .synthesize_value_by_room_area(|room_type| {
                Ok(office_or_corridor(
                    room_type,
                    Quantity::new(10., Unit::Watt),
                    Quantity::new(1., Unit::Met),
                ))
            })
            .is_err());
    }

    #[rstest]
    fn should_synthesize_monthly_values(two_room_building: BuildingTypeDefinition) {
        let monthly = two_room_building
            .synthesize_monthly_by_room_area(|room_type| {
                Ok([office_or_corridor(room_type, 1., 0.5); 12])
            })
            .unwrap();
        for value in monthly {
            assert_relative_eq!(value, 0.85);
        }
    }

    #[rstest]
    fn should_synthesize_profiles_by_area(two_room_building: BuildingTypeDefinition) {
        let profile = two_room_building
            .synthesize_profiles_yearly_by_room_area(|room_type| {
                Ok(vec![office_or_corridor(room_type, 1., 0.); HOURS_PER_YEAR])
            })
            .unwrap();
        assert_eq!(profile.len(), HOURS_PER_YEAR);
        assert_relative_eq!(profile[100], 0.7);
    }

    #[rstest]
    fn should_weight_profiles_by_normalised_factor(two_room_building: BuildingTypeDefinition) {
        // building aggregate of the factor is 0.7 * 10 + 0.3 * 20 = 13
        let profile = two_room_building
            .synthesize_profiles_yearly_by_room_area_weighted(
                |room_type| Ok(vec![office_or_corridor(room_type, 1., 0.5); HOURS_PER_YEAR]),
                |room_type| {
                    Ok(Quantity::new(
                        office_or_corridor(room_type, 10., 20.),
                        Unit::CubicMetrePerHourPerSquareMetre,
                    ))
                },
            )
            .unwrap();
        let expected = 0.7 * 1. * 10. / 13. + 0.3 * 0.5 * 20. / 13.;
        assert_relative_eq!(profile[0], expected);
        assert_relative_eq!(profile[8759], expected);

        // constant profiles of one keep a weighted combination at one
        let flat = two_room_building
            .synthesize_profiles_yearly_by_room_area_weighted(
                |_| Ok(vec![1.; HOURS_PER_YEAR]),
                |room_type| {
                    Ok(Quantity::new(
                        office_or_corridor(room_type, 3., 9.),
                        Unit::WattPerSquareMetre,
                    ))
                },
            )
            .unwrap();
        assert_relative_eq!(flat[42], 1.0, epsilon = 1e-12);
    }

    #[rstest]
    fn should_fail_weighting_by_factor_aggregating_to_zero(
        two_room_building: BuildingTypeDefinition,
    ) {
        let result = two_room_building.synthesize_profiles_yearly_by_room_area_weighted(
            |_| Ok(vec![1.; HOURS_PER_YEAR]),
            |_| Ok(Quantity::zero(Unit::LitrePerSquareMetrePerDay)),
        );
        assert!(matches!(
            result,
            Err(SynthesisError::BuildingType(
                BuildingTypeError::ZeroAggregateFactor(BuildingTypeKind::Office)
            ))
        ));
    }

    #[rstest]
    fn should_fail_on_profile_of_wrong_length(two_room_building: BuildingTypeDefinition) {
        let result = two_room_building.synthesize_profiles_yearly_by_room_area(|_| Ok(vec![1.; 24]));
        assert!(matches!(
            result,
            Err(SynthesisError::Profile(ProfileError::LengthMismatch {
                expected: 8760,
                actual: 24
            }))
        ));
    }

    #[rstest]
    fn should_read_building_type_from_json() {
        let json = r#"{"kind": "mfh", "room_types": {"dwelling_mfh": 0.7, "12.1": 0.2, "storage": 0.1}}"#;
        let building_type = BuildingTypeDefinition::from_json(Cursor::new(json)).unwrap();
        assert_eq!(building_type.kind(), BuildingTypeKind::Mfh);
        assert_eq!(
            building_type.get_room_types(),
            vec![RoomType::DwellingMfh, RoomType::Corridor, RoomType::Storage]
        );
        assert_eq!(building_type.fraction(RoomType::Corridor), Some(0.2));
        assert_eq!(building_type.fraction(RoomType::Gym), None);
    }

    #[rstest]
    fn should_parse_building_type_kind() {
        assert_eq!(BuildingTypeKind::from_key(" office ").unwrap(), BuildingTypeKind::Office);
        assert_eq!(BuildingTypeKind::Mfh.to_string(), "MFH");
        assert_eq!(
            BuildingTypeKind::from_key("castle"),
            Err(BuildingTypeParseError("castle".to_string()))
        );
    }
}
