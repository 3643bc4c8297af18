// Pure functions assembling hourly year profiles from sub-profiles.

use crate::core::units::{DAYS_IN_MONTH, HOURS_PER_DAY, HOURS_PER_YEAR, MONTHS_PER_YEAR};
use crate::year_time::weekday_of_day;
use chrono::{NaiveDate, Weekday};
use itertools::izip;
use thiserror::Error;

/// Hourly values for one non-leap year, index 0 being the first hour of 1st January.
pub type YearProfile = Vec<f64>;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("Profile has {actual} values where {expected} were expected")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Unsupported number of rest days per week: {0} (must be 0, 1 or 2)")]
    InvalidRestDayCount(u8),
}

fn check_length<T>(values: &[T], expected: usize) -> Result<(), ProfileError> {
    if values.len() != expected {
        return Err(ProfileError::LengthMismatch {
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

pub fn check_year_length<T>(profile: &[T]) -> Result<(), ProfileError> {
    check_length(profile, HOURS_PER_YEAR)
}

pub fn constant_year_profile(value: f64) -> YearProfile {
    vec![value; HOURS_PER_YEAR]
}

/// Take the night profile's value for every hour flagged as night in `night_pattern`, and the
/// day profile's value for every other hour.
pub fn combine_day_and_night(
    day_profile: &[f64],
    night_profile: &[f64],
    night_pattern: &[bool],
) -> Result<YearProfile, ProfileError> {
    check_year_length(day_profile)?;
    check_year_length(night_profile)?;
    check_year_length(night_pattern)?;

    Ok(izip!(day_profile, night_profile, night_pattern)
        .map(|(day, night, is_night)| if *is_night { *night } else { *day })
        .collect())
}

pub fn fix_nighttime_value(
    day_profile: &[f64],
    night_value: f64,
    night_pattern: &[bool],
) -> Result<YearProfile, ProfileError> {
    combine_day_and_night(
        day_profile,
        &constant_year_profile(night_value),
        night_pattern,
    )
}

/// Build a year profile by repeating the daily profile for every day of the year, each day
/// scaled by the factor of the month it falls in.
///
/// Arguments:
/// * `monthly_profile` - one factor per month, January first
/// * `daily_profile` - one value per hour of the day
pub fn expand_monthly_to_hourly(
    monthly_profile: &[f64],
    daily_profile: &[f64],
) -> Result<YearProfile, ProfileError> {
    check_length(monthly_profile, MONTHS_PER_YEAR)?;
    check_length(daily_profile, HOURS_PER_DAY)?;

    let profile = monthly_profile
        .iter()
        .zip(DAYS_IN_MONTH)
        .flat_map(|(month_factor, days)| {
            daily_profile
                .iter()
                .map(move |hourly| hourly * month_factor)
                .cycle()
                .take(days * HOURS_PER_DAY)
        })
        .collect::<YearProfile>();
    check_year_length(&profile)?;

    Ok(profile)
}

/// Overwrite every hour falling on a rest day with `weekend_value`. One rest day means Sundays,
/// two rest days means Saturdays and Sundays; zero rest days leaves the profile unchanged.
///
/// Arguments:
/// * `year_profile` - hourly profile to override
/// * `rest_days` - number of rest days per week, 0, 1 or 2
/// * `weekend_value` - value used for rest-day hours
/// * `start_date` - date of the first day of the profile, used to find the weekday of each day
pub fn apply_weekend_override(
    year_profile: &[f64],
    rest_days: u8,
    weekend_value: f64,
    start_date: NaiveDate,
) -> Result<YearProfile, ProfileError> {
    check_year_length(year_profile)?;
    let rest_weekdays: &[Weekday] = match rest_days {
        0 => return Ok(year_profile.to_vec()),
        1 => &[Weekday::Sun],
        2 => &[Weekday::Sat, Weekday::Sun],
        _ => return Err(ProfileError::InvalidRestDayCount(rest_days)),
    };

    Ok(year_profile
        .chunks(HOURS_PER_DAY)
        .enumerate()
        .flat_map(|(day, hours)| {
            let is_rest_day = rest_weekdays.contains(&weekday_of_day(start_date, day));
            hours
                .iter()
                .map(move |value| if is_rest_day { weekend_value } else { *value })
        })
        .collect())
}
