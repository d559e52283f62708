//! Working-day calendar with per-year holiday memoization.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use suivy_domain::Jurisdiction;

/// Upper bound on memoized holiday years. Purely a performance guard; the
/// cache evicts the year farthest from the one being requested.
const HOLIDAY_CACHE_YEARS: usize = 32;

/// Decides whether a calendar date is a working day for one holiday zone.
/// Weekends are never working days; public holidays are computed once per
/// year and cached on the instance.
#[derive(Debug, Clone)]
pub struct BusinessCalendar {
    jurisdiction: Jurisdiction,
    holiday_cache: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

impl BusinessCalendar {
    pub fn new(jurisdiction: Jurisdiction) -> Self {
        Self {
            jurisdiction,
            holiday_cache: BTreeMap::new(),
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    /// A date is non-working when it falls on a weekend or on one of the
    /// zone's public holidays for that year.
    pub fn is_working_day(&mut self, date: NaiveDate) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        !self.holidays(date.year()).contains(&date)
    }

    /// The zone's holiday set for a year, computed on first use.
    pub fn holidays(&mut self, year: i32) -> &BTreeSet<NaiveDate> {
        if !self.holiday_cache.contains_key(&year) {
            if self.holiday_cache.len() >= HOLIDAY_CACHE_YEARS {
                if let Some(&farthest) = self
                    .holiday_cache
                    .keys()
                    .max_by_key(|&&cached| (cached - year).abs())
                {
                    self.holiday_cache.remove(&farthest);
                }
            }
            self.holiday_cache
                .insert(year, holiday_set(self.jurisdiction, year));
        }
        &self.holiday_cache[&year]
    }

    pub fn cached_years(&self) -> usize {
        self.holiday_cache.len()
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::new(Jurisdiction::Metropole)
    }
}

fn holiday_set(jurisdiction: Jurisdiction, year: i32) -> BTreeSet<NaiveDate> {
    let fixed = |month: u32, day: u32| NaiveDate::from_ymd_opt(year, month, day);
    let easter = easter_sunday(year);

    let mut holidays: BTreeSet<NaiveDate> = [
        fixed(1, 1),   // Jour de l'an
        fixed(5, 1),   // Fête du travail
        fixed(5, 8),   // Victoire 1945
        fixed(7, 14),  // Fête nationale
        fixed(8, 15),  // Assomption
        fixed(11, 1),  // Toussaint
        fixed(11, 11), // Armistice 1918
        fixed(12, 25), // Noël
    ]
    .into_iter()
    .flatten()
    .collect();

    holidays.insert(easter + Duration::days(1)); // Lundi de Pâques
    holidays.insert(easter + Duration::days(39)); // Ascension
    holidays.insert(easter + Duration::days(50)); // Lundi de Pentecôte

    if jurisdiction == Jurisdiction::AlsaceMoselle {
        holidays.insert(easter - Duration::days(2)); // Vendredi saint
        if let Some(saint_etienne) = fixed(12, 26) {
            holidays.insert(saint_etienne);
        }
    }

    holidays
}

/// Gregorian Easter Sunday, Meeus/Jones/Butcher computus.
fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 4, 1).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn computes_easter_for_known_years() {
        assert_eq!(easter_sunday(2024), date(2024, 3, 31));
        assert_eq!(easter_sunday(2025), date(2025, 4, 20));
        assert_eq!(easter_sunday(2026), date(2026, 4, 5));
    }

    #[test]
    fn saturdays_are_never_working_days() {
        let mut calendar = BusinessCalendar::default();
        assert!(!calendar.is_working_day(date(2024, 7, 13)));
        assert!(!calendar.is_working_day(date(2024, 7, 14))); // Sunday and holiday
    }

    #[test]
    fn weekday_holidays_are_non_working() {
        let mut calendar = BusinessCalendar::default();
        // Bastille Day 2020 fell on a Tuesday.
        assert!(!calendar.is_working_day(date(2020, 7, 14)));
        // Easter Monday 2024.
        assert!(!calendar.is_working_day(date(2024, 4, 1)));
        // Ascension 2024 (Thursday).
        assert!(!calendar.is_working_day(date(2024, 5, 9)));
        // An ordinary Wednesday.
        assert!(calendar.is_working_day(date(2024, 7, 10)));
    }

    #[test]
    fn alsace_moselle_adds_good_friday_and_saint_stephen() {
        let mut metropole = BusinessCalendar::new(Jurisdiction::Metropole);
        let mut alsace = BusinessCalendar::new(Jurisdiction::AlsaceMoselle);
        // Good Friday 2024.
        assert!(metropole.is_working_day(date(2024, 3, 29)));
        assert!(!alsace.is_working_day(date(2024, 3, 29)));
        // 26 December 2024 (Thursday).
        assert!(metropole.is_working_day(date(2024, 12, 26)));
        assert!(!alsace.is_working_day(date(2024, 12, 26)));
    }

    #[test]
    fn holiday_cache_stays_bounded() {
        let mut calendar = BusinessCalendar::default();
        for year in 1980..2040 {
            calendar.holidays(year);
        }
        assert!(calendar.cached_years() <= HOLIDAY_CACHE_YEARS);
        // Recent years survive; the farthest ones were evicted.
        assert!(calendar.holidays(2039).contains(&date(2039, 12, 25)));
    }
}
