use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::{Div, Mul};
use thiserror::Error;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_YEAR: usize = 365;
pub const HOURS_PER_YEAR: usize = HOURS_PER_DAY * DAYS_PER_YEAR;
pub const MONTHS_PER_YEAR: usize = 12;
pub const DAYS_IN_MONTH: [usize; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
pub const WATTS_PER_KILOWATT: f64 = 1_000.;
pub const SECONDS_PER_DAY: f64 = 86_400.;
pub const PERCENT_PER_FRACTION: f64 = 100.;

/// Body surface area of a reference person, in m2
pub const BODY_SURFACE_AREA: f64 = 1.8;
/// Metabolic heat flux of one met, in W/m2 of body surface
pub const WATTS_PER_SQUARE_METRE_PER_MET: f64 = 58.;
pub const WATER_DENSITY_KG_PER_LITRE: f64 = 1.;
/// Specific heat capacity of water, in J/(kg.K)
pub const WATER_SPECIFIC_HEAT: f64 = 4182.;

const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

/// Physical dimension a unit measures. Quantities can only be added, compared or
/// converted within the same dimension.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dimension {
    Dimensionless,
    Area,
    AreaPerPerson,
    PersonDensity,
    Power,
    PowerPerArea,
    PowerPerPerson,
    Metabolic,
    Temperature,
    FlowPerArea,
    FlowPerPerson,
    AirChangeRate,
    VolumePerAreaPerDay,
    Time,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Fraction,
    Percent,
    SquareMetre,
    SquareMetrePerPerson,
    PersonPerSquareMetre,
    Watt,
    Kilowatt,
    WattPerSquareMetre,
    KilowattPerSquareMetre,
    WattPerPerson,
    Met,
    DegreeCelsius,
    Kelvin,
    CubicMetrePerHourPerSquareMetre,
    CubicMetrePerHourPerPerson,
    AirChangesPerHour,
    LitrePerSquareMetrePerDay,
    Hour,
}

impl Unit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Fraction | Unit::Percent => Dimension::Dimensionless,
            Unit::SquareMetre => Dimension::Area,
            Unit::SquareMetrePerPerson => Dimension::AreaPerPerson,
            Unit::PersonPerSquareMetre => Dimension::PersonDensity,
            Unit::Watt | Unit::Kilowatt => Dimension::Power,
            Unit::WattPerSquareMetre | Unit::KilowattPerSquareMetre => Dimension::PowerPerArea,
            Unit::WattPerPerson => Dimension::PowerPerPerson,
            Unit::Met => Dimension::Metabolic,
            Unit::DegreeCelsius | Unit::Kelvin => Dimension::Temperature,
            Unit::CubicMetrePerHourPerSquareMetre => Dimension::FlowPerArea,
            Unit::CubicMetrePerHourPerPerson => Dimension::FlowPerPerson,
            Unit::AirChangesPerHour => Dimension::AirChangeRate,
            Unit::LitrePerSquareMetrePerDay => Dimension::VolumePerAreaPerDay,
            Unit::Hour => Dimension::Time,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Fraction => "",
            Unit::Percent => "%",
            Unit::SquareMetre => "m2",
            Unit::SquareMetrePerPerson => "m2/person",
            Unit::PersonPerSquareMetre => "person/m2",
            Unit::Watt => "W",
            Unit::Kilowatt => "kW",
            Unit::WattPerSquareMetre => "W/m2",
            Unit::KilowattPerSquareMetre => "kW/m2",
            Unit::WattPerPerson => "W/person",
            Unit::Met => "met",
            Unit::DegreeCelsius => "degC",
            Unit::Kelvin => "K",
            Unit::CubicMetrePerHourPerSquareMetre => "m3/(h.m2)",
            Unit::CubicMetrePerHourPerPerson => "m3/(h.person)",
            Unit::AirChangesPerHour => "ACH",
            Unit::LitrePerSquareMetrePerDay => "l/(m2.day)",
            Unit::Hour => "h",
        }
    }

    /// The per-area unit obtained by dividing a per-person unit by an area per person.
    pub fn per_area_counterpart(&self) -> Option<Unit> {
        match self {
            Unit::WattPerPerson => Some(Unit::WattPerSquareMetre),
            Unit::CubicMetrePerHourPerPerson => Some(Unit::CubicMetrePerHourPerSquareMetre),
            _ => None,
        }
    }

    // temperature is the only affine dimension, with Kelvin as its base unit
    fn to_base(&self, magnitude: f64) -> f64 {
        match self {
            Unit::Percent => magnitude / PERCENT_PER_FRACTION,
            Unit::Kilowatt | Unit::KilowattPerSquareMetre => magnitude * WATTS_PER_KILOWATT,
            Unit::DegreeCelsius => magnitude + ZERO_CELSIUS_IN_KELVIN,
            _ => magnitude,
        }
    }

    fn from_base(&self, magnitude: f64) -> f64 {
        match self {
            Unit::Percent => magnitude * PERCENT_PER_FRACTION,
            Unit::Kilowatt | Unit::KilowattPerSquareMetre => magnitude / WATTS_PER_KILOWATT,
            Unit::DegreeCelsius => magnitude - ZERO_CELSIUS_IN_KELVIN,
            _ => magnitude,
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Fraction => write!(f, "[-]"),
            _ => write!(f, "{}", self.symbol()),
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum UnitError {
    #[error("Cannot convert or combine a quantity in {from} with one in {to}")]
    IncompatibleUnits { from: Unit, to: Unit },
    #[error("Expected a quantity of dimension {expected:?} but got one in {actual}")]
    UnexpectedDimension { expected: Dimension, actual: Unit },
    #[error("A temperature of {kelvin}K/{}degC was encountered, which is less than absolute zero", kelvin - ZERO_CELSIUS_IN_KELVIN)]
    BelowAbsoluteZero { kelvin: f64 },
    #[error("Absolute temperatures in {0} cannot be added or subtracted")]
    AffineArithmetic(Unit),
    #[error("Division by a zero quantity in {0}")]
    ZeroDivisor(Unit),
}

/// A magnitude tagged with its unit. All arithmetic between quantities is checked at
/// runtime against the unit's dimension; conversions are explicit.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Quantity {
    magnitude: f64,
    unit: Unit,
}

impl Quantity {
    pub const fn new(magnitude: f64, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    pub const fn fraction(value: f64) -> Self {
        Self::new(value, Unit::Fraction)
    }

    pub const fn zero(unit: Unit) -> Self {
        Self::new(0., unit)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == 0.
    }

    /// Convert into another unit of the same dimension.
    pub fn to(&self, unit: Unit) -> Result<Self, UnitError> {
        if unit == self.unit {
            return Ok(*self);
        }
        if unit.dimension() != self.dimension() {
            return Err(UnitError::IncompatibleUnits {
                from: self.unit,
                to: unit,
            });
        }
        let base = self.unit.to_base(self.magnitude);
        if self.dimension() == Dimension::Temperature && base < 0. {
            return Err(UnitError::BelowAbsoluteZero { kelvin: base });
        }

        Ok(Self::new(unit.from_base(base), unit))
    }

    pub fn magnitude_in(&self, unit: Unit) -> Result<f64, UnitError> {
        Ok(self.to(unit)?.magnitude)
    }

    pub fn ensure_dimension(&self, expected: Dimension) -> Result<Self, UnitError> {
        if self.dimension() == expected {
            Ok(*self)
        } else {
            Err(UnitError::UnexpectedDimension {
                expected,
                actual: self.unit,
            })
        }
    }

    /// Sum of two quantities, expressed in the unit of `self`.
    pub fn try_add(&self, other: Quantity) -> Result<Self, UnitError> {
        if self.dimension() == Dimension::Temperature {
            return Err(UnitError::AffineArithmetic(self.unit));
        }
        let other = other.to(self.unit)?;
        Ok(Self::new(self.magnitude + other.magnitude, self.unit))
    }

    pub fn try_sub(&self, other: Quantity) -> Result<Self, UnitError> {
        if self.dimension() == Dimension::Temperature {
            return Err(UnitError::AffineArithmetic(self.unit));
        }
        let other = other.to(self.unit)?;
        Ok(Self::new(self.magnitude - other.magnitude, self.unit))
    }

    /// Dimensionless quotient of two quantities of the same dimension.
    pub fn ratio(&self, other: Quantity) -> Result<f64, UnitError> {
        let other = other.to(self.unit)?;
        if other.is_zero() {
            return Err(UnitError::ZeroDivisor(other.unit));
        }
        Ok(self.magnitude / other.magnitude)
    }

    /// Turn a per-person quantity into a per-floor-area one by dividing by the floor area
    /// available to each person.
    pub fn per_person_to_per_area(&self, area_per_person: Quantity) -> Result<Self, UnitError> {
        let per_area_unit =
            self.unit
                .per_area_counterpart()
                .ok_or(UnitError::UnexpectedDimension {
                    expected: Dimension::PowerPerPerson,
                    actual: self.unit,
                })?;
        let area_per_person = area_per_person.to(Unit::SquareMetrePerPerson)?;
        if area_per_person.is_zero() {
            return Err(UnitError::ZeroDivisor(area_per_person.unit));
        }

        Ok(Self::new(
            self.magnitude / area_per_person.magnitude,
            per_area_unit,
        ))
    }

    pub fn clamp_non_negative(&self) -> Self {
        Self::new(self.magnitude.max(0.), self.unit)
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Self::Output {
        Quantity::new(self.magnitude * rhs, self.unit)
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Self::Output {
        Quantity::new(self.magnitude / rhs, self.unit)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            Unit::Fraction => write!(f, "{}", self.magnitude),
            unit => write!(f, "{} {}", self.magnitude, unit.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_do_correct_temperature_conversions() {
        assert_relative_eq!(
            Quantity::new(20., Unit::DegreeCelsius)
                .magnitude_in(Unit::Kelvin)
                .unwrap(),
            293.15
        );
        assert_relative_eq!(
            Quantity::new(5., Unit::Kelvin)
                .magnitude_in(Unit::DegreeCelsius)
                .unwrap(),
            -268.15
        );
        for i in -10..80 {
            let round_trip = Quantity::new(i as f64, Unit::DegreeCelsius)
                .to(Unit::Kelvin)
                .and_then(|k| k.to(Unit::DegreeCelsius))
                .unwrap();
            assert_relative_eq!(round_trip.magnitude(), i as f64, epsilon = 1e-10);
        }
    }

    #[rstest]
    fn should_reject_temperature_below_absolute_zero() {
        assert!(matches!(
            Quantity::new(-300., Unit::DegreeCelsius).to(Unit::Kelvin),
            Err(UnitError::BelowAbsoluteZero { .. })
        ));
    }

    #[rstest]
    #[case(Quantity::new(1500., Unit::Watt), Unit::Kilowatt, 1.5)]
    #[case(Quantity::new(0.2, Unit::KilowattPerSquareMetre), Unit::WattPerSquareMetre, 200.)]
    #[case(Quantity::new(35., Unit::Percent), Unit::Fraction, 0.35)]
    #[case(Quantity::fraction(0.7), Unit::Percent, 70.)]
    fn should_convert_within_dimension(
        #[case] quantity: Quantity,
        #[case] unit: Unit,
        #[case] expected: f64,
    ) {
        let converted = quantity.to(unit).unwrap();
        assert_eq!(converted.unit(), unit);
        assert_relative_eq!(converted.magnitude(), expected, max_relative = 1e-12);
    }

    #[rstest]
    fn should_refuse_conversion_across_dimensions() {
        assert_eq!(
            Quantity::new(10., Unit::Watt).to(Unit::WattPerSquareMetre),
            Err(UnitError::IncompatibleUnits {
                from: Unit::Watt,
                to: Unit::WattPerSquareMetre
            })
        );
    }

    #[rstest]
    fn should_add_compatible_units_in_left_operand_unit() {
        let sum = Quantity::new(1., Unit::Kilowatt)
            .try_add(Quantity::new(250., Unit::Watt))
            .unwrap();
        assert_eq!(sum.unit(), Unit::Kilowatt);
        assert_relative_eq!(sum.magnitude(), 1.25);

        let difference = Quantity::new(3., Unit::SquareMetre)
            .try_sub(Quantity::new(1., Unit::SquareMetre))
            .unwrap();
        assert_eq!(difference, Quantity::new(2., Unit::SquareMetre));

        assert!(Quantity::new(1., Unit::Watt)
            .try_add(Quantity::new(1., Unit::Met))
            .is_err());
        assert_eq!(
            Quantity::new(20., Unit::DegreeCelsius).try_add(Quantity::new(1., Unit::Kelvin)),
            Err(UnitError::AffineArithmetic(Unit::DegreeCelsius))
        );
    }

    #[rstest]
    fn should_divide_per_person_values_by_area_per_person() {
        let per_area = Quantity::new(36., Unit::CubicMetrePerHourPerPerson)
            .per_person_to_per_area(Quantity::new(12., Unit::SquareMetrePerPerson))
            .unwrap();
        assert_eq!(
            per_area,
            Quantity::new(3., Unit::CubicMetrePerHourPerSquareMetre)
        );

        assert_eq!(
            Quantity::new(80., Unit::WattPerPerson)
                .per_person_to_per_area(Quantity::new(0., Unit::SquareMetrePerPerson)),
            Err(UnitError::ZeroDivisor(Unit::SquareMetrePerPerson))
        );
        assert!(Quantity::new(80., Unit::Watt)
            .per_person_to_per_area(Quantity::new(10., Unit::SquareMetrePerPerson))
            .is_err());
    }

    #[rstest]
    fn should_compute_ratio_of_same_dimension() {
        assert_relative_eq!(
            Quantity::new(2., Unit::Kilowatt)
                .ratio(Quantity::new(500., Unit::Watt))
                .unwrap(),
            4.
        );
        assert!(Quantity::new(2., Unit::Watt)
            .ratio(Quantity::zero(Unit::Watt))
            .is_err());
    }

    #[rstest]
    fn should_display_with_symbol() {
        assert_eq!(format!("{}", Quantity::new(12.5, Unit::WattPerSquareMetre)), "12.5 W/m2");
        assert_eq!(format!("{}", Quantity::fraction(0.25)), "0.25");
        assert_eq!(format!("{}", Unit::Fraction), "[-]");
    }
}
