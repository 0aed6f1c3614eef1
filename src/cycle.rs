use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::models::{CalendarCell, CycleConfig, CycleDay, MonthGrid, Phase};

pub const MIN_CYCLE_LENGTH: u32 = 20;
pub const MAX_CYCLE_LENGTH: u32 = 40;
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
/// Three months of calendar data.
pub const DEFAULT_WINDOW_DAYS: u32 = 90;
/// Upper bound accepted from config and the command line.
pub const MAX_WINDOW_DAYS: u32 = 3660;

const PERIOD_DAYS: u32 = 5;
const FERTILE_FIRST: u32 = 9;
const FERTILE_LAST: u32 = 13;
const PMS_DAYS: u32 = 10;
const MIN_GRID_WEEKS: usize = 6;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("invalid calendar month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

pub fn clamp_cycle_length(days: u32) -> u32 {
    days.clamp(MIN_CYCLE_LENGTH, MAX_CYCLE_LENGTH)
}

/// Classify a zero-based day index inside a cycle.
///
/// Precedence is Period > Ovulation > Fertile > PMS > Normal. With even cycle
/// lengths the ovulation day can fall on the last fertile day; ovulation wins.
pub fn classify(day_index: u32, cycle_length_days: u32) -> Phase {
    let length = clamp_cycle_length(cycle_length_days);

    if day_index < PERIOD_DAYS {
        Phase::Period
    } else if day_index == length / 2 - 1 {
        Phase::Ovulation
    } else if (FERTILE_FIRST..=FERTILE_LAST).contains(&day_index) {
        Phase::Fertile
    } else if day_index >= length - PMS_DAYS && day_index < length {
        Phase::Pms
    } else {
        Phase::Normal
    }
}

/// Lay out `window_days` consecutive days from the cycle start, one entry per day.
///
/// The window stops early at the last date chrono can represent.
pub fn compute_cycle_days(config: CycleConfig, window_days: u32) -> Vec<CycleDay> {
    let length = clamp_cycle_length(config.cycle_length_days);

    (0..window_days)
        .map_while(|offset| {
            let date = config
                .start_date
                .checked_add_days(Days::new(u64::from(offset)))?;
            let index = offset % length;
            Some(CycleDay {
                date,
                day_in_cycle: index + 1,
                phase: classify(index, length),
            })
        })
        .collect()
}

/// Cycle day for any date on or after the cycle start.
pub fn phase_on(config: CycleConfig, date: NaiveDate) -> Option<CycleDay> {
    let offset = (date - config.start_date).num_days();
    if offset < 0 {
        return None;
    }

    let length = clamp_cycle_length(config.cycle_length_days);
    let index = (offset % i64::from(length)) as u32;
    Some(CycleDay {
        date,
        day_in_cycle: index + 1,
        phase: classify(index, length),
    })
}

/// Move `delta` months from (year, month), wrapping across years.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

/// Build a Sunday-first calendar for one month and attach the cycle day for
/// every date that has one.
pub fn month_grid(year: i32, month: u32, days: &[CycleDay]) -> Result<MonthGrid, CycleError> {
    let invalid = CycleError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid.clone())?;
    let (next_year, next_month) = shift_month(year, month, 1);
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or(invalid)?
        - chrono::Duration::days(1);

    let by_date: HashMap<NaiveDate, CycleDay> = days.iter().map(|d| (d.date, *d)).collect();

    let mut cursor =
        first - chrono::Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let mut weeks = Vec::with_capacity(MIN_GRID_WEEKS);

    while cursor <= last || weeks.len() < MIN_GRID_WEEKS {
        let mut week = Vec::with_capacity(7);
        for _ in 0..7 {
            week.push(CalendarCell {
                date: cursor,
                in_month: cursor.month() == month && cursor.year() == year,
                cycle_day: by_date.get(&cursor).copied(),
            });
            cursor += chrono::Duration::days(1);
        }
        weeks.push(week);
    }

    Ok(MonthGrid { year, month, weeks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn phases(length: u32) -> Vec<Phase> {
        compute_cycle_days(CycleConfig::new(date("2026-01-01"), length), length)
            .into_iter()
            .map(|d| d.phase)
            .collect()
    }

    #[test]
    fn every_length_fills_the_window_one_day_apart() {
        for length in MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH {
            let days = compute_cycle_days(CycleConfig::new(date("2026-03-10"), length), 90);
            assert_eq!(days.len(), 90);
            assert_eq!(days[0].date, date("2026-03-10"));
            for pair in days.windows(2) {
                assert_eq!((pair[1].date - pair[0].date).num_days(), 1);
            }
        }
    }

    #[test]
    fn pattern_repeats_every_cycle() {
        for length in MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH {
            let days = compute_cycle_days(CycleConfig::new(date("2026-03-10"), length), 90);
            for i in 0..(90 - length as usize) {
                let next = &days[i + length as usize];
                assert_eq!(days[i].day_in_cycle, next.day_in_cycle);
                assert_eq!(days[i].phase, next.phase);
            }
        }
    }

    #[test]
    fn twenty_eight_day_cycle_layout() {
        let p = phases(28);
        assert!(p[0..5].iter().all(|&x| x == Phase::Period));
        assert!(p[5..9].iter().all(|&x| x == Phase::Normal));
        assert!(p[9..13].iter().all(|&x| x == Phase::Fertile));
        assert_eq!(p[13], Phase::Ovulation);
        assert!(p[14..18].iter().all(|&x| x == Phase::Normal));
        assert!(p[18..28].iter().all(|&x| x == Phase::Pms));
    }

    #[test]
    fn phase_day_is_one_based() {
        let days = compute_cycle_days(CycleConfig::new(date("2026-01-01"), 28), 30);
        assert_eq!(days[0].day_in_cycle, 1);
        assert_eq!(days[27].day_in_cycle, 28);
        assert_eq!(days[28].day_in_cycle, 1);
    }

    #[test]
    fn short_cycle_prefers_fertile_over_pms() {
        // length 20: ovulation at 9, PMS from 10; fertile 10..=13 wins the overlap
        let p = phases(20);
        assert_eq!(p[9], Phase::Ovulation);
        assert!(p[10..14].iter().all(|&x| x == Phase::Fertile));
        assert!(p[14..20].iter().all(|&x| x == Phase::Pms));
    }

    #[test]
    fn long_cycle_ovulation_outside_fertile_range() {
        let p = phases(40);
        assert_eq!(p[19], Phase::Ovulation);
        assert_eq!(p[13], Phase::Fertile);
        assert_eq!(p[18], Phase::Normal);
        assert_eq!(p[30], Phase::Pms);
    }

    #[test]
    fn out_of_range_lengths_are_clamped() {
        let short = compute_cycle_days(CycleConfig::new(date("2026-01-01"), 3), 45);
        assert_eq!(short[20].day_in_cycle, 1);
        let long = compute_cycle_days(CycleConfig::new(date("2026-01-01"), 90), 45);
        assert_eq!(long[40].day_in_cycle, 1);
        assert_eq!(classify(0, 0), Phase::Period);
    }

    #[test]
    fn same_inputs_same_output() {
        let config = CycleConfig::new(date("2026-05-02"), 31);
        assert_eq!(compute_cycle_days(config, 90), compute_cycle_days(config, 90));
    }

    #[test]
    fn phase_on_matches_window() {
        let config = CycleConfig::new(date("2026-01-01"), 28);
        let day = phase_on(config, date("2026-01-14")).unwrap();
        assert_eq!(day.phase, Phase::Ovulation);
        assert_eq!(day.describe(), "Ovulation Day (Day 14)");
        assert!(phase_on(config, date("2025-12-31")).is_none());

        for day in compute_cycle_days(config, 90) {
            assert_eq!(phase_on(config, day.date), Some(day));
        }
    }

    #[test]
    fn phase_on_keeps_repeating_past_the_window() {
        let config = CycleConfig::new(date("2026-01-01"), 28);
        // offset 90 is day 7 of the fourth cycle, offset 365 is day 2 of the fourteenth
        let later = phase_on(config, date("2026-04-01")).unwrap();
        assert_eq!((later.day_in_cycle, later.phase), (7, Phase::Normal));
        let next_year = phase_on(config, date("2027-01-01")).unwrap();
        assert_eq!((next_year.day_in_cycle, next_year.phase), (2, Phase::Period));
    }

    #[test]
    fn window_stops_at_the_last_representable_date() {
        let start = NaiveDate::MAX - Days::new(9);
        let days = compute_cycle_days(CycleConfig::new(start, 28), 100_000_000);
        assert_eq!(days.len(), 10);
        assert_eq!(days[9].date, NaiveDate::MAX);
    }

    #[test]
    fn month_grid_is_six_sunday_weeks() {
        let config = CycleConfig::new(date("2026-02-01"), 28);
        let days = compute_cycle_days(config, DEFAULT_WINDOW_DAYS);
        let grid = month_grid(2026, 2, &days).unwrap();

        assert_eq!(grid.weeks.len(), 6);
        assert!(grid.weeks.iter().all(|w| w.len() == 7));
        assert_eq!(grid.weeks[0][0].date.weekday(), Weekday::Sun);
        // Feb 1 2026 is a Sunday
        assert_eq!(grid.weeks[0][0].date, date("2026-02-01"));
        assert_eq!(grid.weeks[0][0].cycle_day.unwrap().phase, Phase::Period);
        assert!(!grid.weeks[5][6].in_month);
    }

    #[test]
    fn month_grid_leaves_days_without_data_empty() {
        let grid = month_grid(2026, 8, &[]).unwrap();
        assert!(grid.weeks.iter().flatten().all(|c| c.cycle_day.is_none()));
        assert_eq!(grid.weeks[0][0].date, date("2026-07-26"));
    }

    #[test]
    fn month_grid_rejects_bad_month() {
        assert_eq!(
            month_grid(2026, 13, &[]).unwrap_err(),
            CycleError::InvalidMonth { year: 2026, month: 13 }
        );
    }

    #[test]
    fn shift_month_wraps_years() {
        assert_eq!(shift_month(2026, 1, -1), (2025, 12));
        assert_eq!(shift_month(2026, 12, 1), (2027, 1));
        assert_eq!(shift_month(2026, 6, 0), (2026, 6));
    }
}
