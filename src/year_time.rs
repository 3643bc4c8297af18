use crate::core::units::{HOURS_PER_DAY, HOURS_PER_YEAR};
use chrono::{Datelike, NaiveDate, Weekday};

/// Index of an hour within a non-leap year, 0 being midnight to 1am on 1st January.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HourOfYear(usize);

impl HourOfYear {
    pub fn hour_of_day(&self) -> usize {
        self.0 % HOURS_PER_DAY
    }

    pub fn day_of_year(&self) -> usize {
        self.0 / HOURS_PER_DAY
    }
}

pub fn hours_of_year() -> impl Iterator<Item = HourOfYear> {
    (0..HOURS_PER_YEAR).map(HourOfYear)
}

/// Weekday of the given day of the year, counting `start_date` as day 0.
pub fn weekday_of_day(start_date: NaiveDate, day_of_year: usize) -> Weekday {
    (0..day_of_year % 7).fold(start_date.weekday(), |weekday, _| weekday.succ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn should_report_hour_of_day_and_day_of_year() {
        let hours = hours_of_year().skip(742).take(4).collect::<Vec<_>>();
        assert_eq!(
            hours.iter().map(HourOfYear::hour_of_day).collect::<Vec<_>>(),
            [22, 23, 0, 1]
        );
        assert_eq!(
            hours.iter().map(HourOfYear::day_of_year).collect::<Vec<_>>(),
            [30, 30, 31, 31]
        );
    }

    #[rstest]
    fn should_iterate_over_whole_year() {
        assert_eq!(hours_of_year().count(), 8760);
        assert_eq!(hours_of_year().last().map(|h| h.day_of_year()), Some(364));
    }

    #[rstest]
    #[case(0, Weekday::Wed)]
    #[case(4, Weekday::Sun)]
    #[case(5, Weekday::Mon)]
    #[case(11, Weekday::Sun)]
    #[case(364, Weekday::Wed)]
    fn should_compute_weekday_from_start_date(#[case] day: usize, #[case] expected: Weekday) {
        let start_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(weekday_of_day(start_date, day), expected);
    }
}
