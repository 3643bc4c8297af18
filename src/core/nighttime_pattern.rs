use crate::core::units::{DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::year_time::hours_of_year;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// One flag per hour of the year, true meaning night.
pub type NightPattern = Vec<bool>;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum NighttimePatternError {
    #[error("Hour {0} is outside the hours of a day [0, 24)")]
    HourOutOfRange(u32),
    #[error("Wake-up hour {wakeup} is not before sleeping hour {sleep}")]
    WakeupNotBeforeSleep { wakeup: u32, sleep: u32 },
    #[error("Varied wake-up hour {wakeup} is not before varied sleeping hour {sleep} on day {day}, choose a smaller variability band")]
    VariedWakeupNotBeforeSleep { day: usize, wakeup: u32, sleep: u32 },
}

#[derive(Clone, Debug, PartialEq)]
enum DailyHours {
    Constant(u32),
    PerDay(Vec<u32>),
}

impl DailyHours {
    fn for_day(&self, day: usize) -> Option<u32> {
        match self {
            DailyHours::Constant(hour) => (day < DAYS_PER_YEAR).then_some(*hour),
            DailyHours::PerDay(hours) => hours.get(day).copied(),
        }
    }
}

/// Classifies the hours of the year into day and night from wake-up and sleeping hours, which
/// are either the same for every day or varied per calendar day.
#[derive(Clone, Debug, PartialEq)]
pub struct NighttimePatternGenerator {
    nominal_wakeup_hour: u32,
    nominal_sleep_hour: u32,
    wakeup_hours: DailyHours,
    sleep_hours: DailyHours,
}

impl NighttimePatternGenerator {
    pub fn new(wakeup_hour: u32, sleep_hour: u32) -> Result<Self, NighttimePatternError> {
        for hour in [wakeup_hour, sleep_hour] {
            if hour as usize >= HOURS_PER_DAY {
                return Err(NighttimePatternError::HourOutOfRange(hour));
            }
        }
        if wakeup_hour >= sleep_hour {
            return Err(NighttimePatternError::WakeupNotBeforeSleep {
                wakeup: wakeup_hour,
                sleep: sleep_hour,
            });
        }

        Ok(Self {
            nominal_wakeup_hour: wakeup_hour,
            nominal_sleep_hour: sleep_hour,
            wakeup_hours: DailyHours::Constant(wakeup_hour),
            sleep_hours: DailyHours::Constant(sleep_hour),
        })
    }

    /// Draw wake-up and sleeping hours independently for every day of the year, each uniformly
    /// within `band` hours around the nominal hour and clipped to the hours of a day. On error
    /// the generator keeps its previous hours.
    pub fn activate_variability<R: Rng + ?Sized>(
        &mut self,
        band: u32,
        rng: &mut R,
    ) -> Result<(), NighttimePatternError> {
        let mut vary = |nominal: u32| {
            let offset = rng.random_range(-(band as i64)..=band as i64);
            (nominal as i64 + offset).clamp(0, HOURS_PER_DAY as i64 - 1) as u32
        };
        let mut wakeup_hours = Vec::with_capacity(DAYS_PER_YEAR);
        let mut sleep_hours = Vec::with_capacity(DAYS_PER_YEAR);
        for day in 0..DAYS_PER_YEAR {
            let wakeup = vary(self.nominal_wakeup_hour);
            let sleep = vary(self.nominal_sleep_hour);
            if wakeup >= sleep {
                return Err(NighttimePatternError::VariedWakeupNotBeforeSleep {
                    day,
                    wakeup,
                    sleep,
                });
            }
            wakeup_hours.push(wakeup);
            sleep_hours.push(sleep);
        }
        debug!(band, "varying wake-up and sleeping hours per day");

        self.wakeup_hours = DailyHours::PerDay(wakeup_hours);
        self.sleep_hours = DailyHours::PerDay(sleep_hours);
        Ok(())
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.wakeup_hours, DailyHours::PerDay(_))
    }

    /// Wake-up hour of a day of the year, `None` past the last day.
    pub fn wakeup_hour(&self, day: usize) -> Option<u32> {
        self.wakeup_hours.for_day(day)
    }

    pub fn sleep_hour(&self, day: usize) -> Option<u32> {
        self.sleep_hours.for_day(day)
    }

    /// Night covers the hours before waking up and from the sleeping hour on, so the late hours
    /// of a day and the early hours of the same day both count as night.
    pub fn get_nighttime_year_profile(&self) -> NightPattern {
        hours_of_year()
            .map(|hour| {
                let day = hour.day_of_year();
                let hour_of_day = hour.hour_of_day() as u32;
                match (self.wakeup_hour(day), self.sleep_hour(day)) {
                    (Some(wakeup), Some(sleep)) => hour_of_day < wakeup || hour_of_day >= sleep,
                    _ => false,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::HOURS_PER_YEAR;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use rstest::*;

    #[rstest]
    fn should_classify_hours_with_constant_wake_and_sleep_hours() {
        let pattern = NighttimePatternGenerator::new(8, 22)
            .unwrap()
            .get_nighttime_year_profile();
        assert_eq!(pattern.len(), HOURS_PER_YEAR);
        assert!(pattern[0]);
        assert!(pattern[7]);
        assert!(!pattern[8]);
        assert!(!pattern[10]);
        assert!(!pattern[21]);
        assert!(pattern[22]);
        assert!(pattern[10 * 24 + 23]);
        assert_eq!(pattern.iter().filter(|night| **night).count(), 10 * 365);
    }

    #[rstest]
    #[case(22, 8)]
    #[case(8, 8)]
    fn should_reject_wakeup_not_before_sleep(#[case] wakeup: u32, #[case] sleep: u32) {
        assert_eq!(
            NighttimePatternGenerator::new(wakeup, sleep),
            Err(NighttimePatternError::WakeupNotBeforeSleep { wakeup, sleep })
        );
    }

    #[rstest]
    fn should_reject_hours_beyond_a_day() {
        assert_eq!(
            NighttimePatternGenerator::new(6, 24),
            Err(NighttimePatternError::HourOutOfRange(24))
        );
    }

    #[rstest]
    fn should_vary_hours_per_day_within_band() {
        let mut rng = Pcg64::seed_from_u64(11);
        let mut generator = NighttimePatternGenerator::new(7, 22).unwrap();
        generator.activate_variability(1, &mut rng).unwrap();

        assert!(generator.is_variable());
        let wakeups = (0..365)
            .map(|day| generator.wakeup_hour(day).unwrap())
            .collect::<Vec<_>>();
        let sleeps = (0..365)
            .map(|day| generator.sleep_hour(day).unwrap())
            .collect::<Vec<_>>();
        assert!(wakeups.iter().all(|hour| (6..=8).contains(hour)));
        assert!(sleeps.iter().all(|hour| (21..=23).contains(hour)));
        assert!(wakeups.iter().any(|hour| *hour != 7));

        let pattern = generator.get_nighttime_year_profile();
        for day in [0, 100, 364] {
            let wakeup = wakeups[day] as usize;
            assert!(pattern[day * 24 + wakeup - 1]);
            assert!(!pattern[day * 24 + wakeup]);
        }
    }

    #[rstest]
    fn should_clip_varied_hours_to_the_day() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut generator = NighttimePatternGenerator::new(0, 23).unwrap();
        generator.activate_variability(2, &mut rng).unwrap();
        for day in 0..365 {
            assert!(generator.sleep_hour(day).is_some_and(|hour| hour <= 23));
        }
    }

    #[rstest]
    fn should_reject_band_making_days_invalid_and_keep_previous_hours() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut generator = NighttimePatternGenerator::new(8, 9).unwrap();
        let result = generator.activate_variability(4, &mut rng);

        assert!(matches!(
            result,
            Err(NighttimePatternError::VariedWakeupNotBeforeSleep { .. })
        ));
        assert!(!generator.is_variable());
        assert_eq!(generator.wakeup_hour(3), Some(8));
    }

    #[rstest]
    fn should_be_reproducible_with_same_seed() {
        let varied = |seed| {
            let mut generator = NighttimePatternGenerator::new(7, 22).unwrap();
            generator
                .activate_variability(2, &mut Pcg64::seed_from_u64(seed))
                .unwrap();
            generator.get_nighttime_year_profile()
        };
        assert_eq!(varied(99), varied(99));
    }

    #[rstest]
    fn should_report_no_hours_past_the_last_day() {
        let mut generator = NighttimePatternGenerator::new(7, 22).unwrap();
        assert_eq!(generator.sleep_hour(364), Some(22));
        assert_eq!(generator.wakeup_hour(365), None);

        generator
            .activate_variability(1, &mut Pcg64::seed_from_u64(3))
            .unwrap();
        assert!(generator.wakeup_hour(364).is_some());
        assert_eq!(generator.wakeup_hour(365), None);
        assert_eq!(generator.sleep_hour(400), None);
    }
}
