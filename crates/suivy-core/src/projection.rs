//! Half-day exhaustion projection over the working-day calendar.

use chrono::NaiveDate;

use suivy_domain::{DayMoment, EndEstimate, HalfDaySlot};

use crate::{calendar::BusinessCalendar, EPSILON};

/// Iteration guard: ten simulated years of half-day slots. Exceeding it
/// yields the current slot as a best-effort estimate, never an error.
const MAX_HALF_DAY_STEPS: usize = 3650;

/// Simulates forward from a start slot, burning a fractional rate on working
/// days only, until the remaining day-budget crosses zero.
pub struct ProjectionService;

impl ProjectionService {
    pub fn project(
        calendar: &mut BusinessCalendar,
        start_date: NaiveDate,
        start_moment: DayMoment,
        days_remaining: f64,
        attendance_pct: f64,
    ) -> EndEstimate {
        if days_remaining <= 0.0 {
            return EndEstimate::AlreadyComplete;
        }
        if attendance_pct <= 0.0 {
            return EndEstimate::Never;
        }

        let half_day_burn = (attendance_pct / 100.0) / 2.0;
        let mut slot = HalfDaySlot::new(start_date, start_moment);
        let mut remaining = days_remaining;

        for _ in 0..MAX_HALF_DAY_STEPS {
            if calendar.is_working_day(slot.date) {
                remaining -= half_day_burn;
            }
            // Stop on the slot that crosses the threshold, without advancing
            // past it.
            if remaining <= EPSILON {
                break;
            }
            slot = slot.advance();
        }

        EndEstimate::On {
            date: slot.date,
            moment: slot.moment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> BusinessCalendar {
        BusinessCalendar::default()
    }

    #[test]
    fn non_positive_budgets_are_already_complete() {
        let mut cal = calendar();
        let estimate =
            ProjectionService::project(&mut cal, date(2024, 1, 2), DayMoment::Morning, 0.0, 100.0);
        assert_eq!(estimate, EndEstimate::AlreadyComplete);
        let estimate =
            ProjectionService::project(&mut cal, date(2024, 1, 2), DayMoment::Morning, -3.0, 100.0);
        assert_eq!(estimate, EndEstimate::AlreadyComplete);
    }

    #[test]
    fn zero_attendance_never_finishes() {
        let mut cal = calendar();
        let estimate =
            ProjectionService::project(&mut cal, date(2024, 1, 2), DayMoment::Morning, 5.0, 0.0);
        assert_eq!(estimate, EndEstimate::Never);
    }

    #[test]
    fn full_attendance_burns_one_day_in_two_slots() {
        let mut cal = calendar();
        // Tuesday 2 January 2024 is a plain working day.
        let estimate =
            ProjectionService::project(&mut cal, date(2024, 1, 2), DayMoment::Morning, 1.0, 100.0);
        assert_eq!(
            estimate,
            EndEstimate::On {
                date: date(2024, 1, 2),
                moment: DayMoment::Afternoon,
            }
        );
    }

    #[test]
    fn half_attendance_needs_twice_the_slots() {
        let mut cal = calendar();
        let estimate =
            ProjectionService::project(&mut cal, date(2024, 1, 2), DayMoment::Morning, 1.0, 50.0);
        assert_eq!(
            estimate,
            EndEstimate::On {
                date: date(2024, 1, 3),
                moment: DayMoment::Afternoon,
            }
        );
    }

    #[test]
    fn weekends_and_holidays_advance_without_burning() {
        let mut cal = calendar();
        // Friday 5 January 2024; 1.5 days spills over the weekend.
        let estimate =
            ProjectionService::project(&mut cal, date(2024, 1, 5), DayMoment::Morning, 1.5, 100.0);
        assert_eq!(
            estimate,
            EndEstimate::On {
                date: date(2024, 1, 8),
                moment: DayMoment::Morning,
            }
        );
        // Starting on New Year's Day burns nothing until 2 January.
        let estimate =
            ProjectionService::project(&mut cal, date(2024, 1, 1), DayMoment::Morning, 1.0, 100.0);
        assert_eq!(
            estimate,
            EndEstimate::On {
                date: date(2024, 1, 2),
                moment: DayMoment::Afternoon,
            }
        );
    }

    #[test]
    fn afternoon_start_counts_the_first_half_day() {
        let mut cal = calendar();
        let estimate = ProjectionService::project(
            &mut cal,
            date(2024, 1, 2),
            DayMoment::Afternoon,
            1.0,
            100.0,
        );
        assert_eq!(
            estimate,
            EndEstimate::On {
                date: date(2024, 1, 3),
                moment: DayMoment::Morning,
            }
        );
    }

    #[test]
    fn tiny_attendance_is_bounded_by_the_step_cap() {
        let mut cal = calendar();
        // 0.01% attendance cannot finish 100 days within ten years; the
        // projection still terminates with a far-future estimate.
        let estimate = ProjectionService::project(
            &mut cal,
            date(2024, 1, 2),
            DayMoment::Morning,
            100.0,
            0.01,
        );
        match estimate {
            EndEstimate::On { date: end, .. } => assert!(end > date(2028, 1, 1)),
            other => panic!("expected a bounded estimate, got {other:?}"),
        }
    }
}
