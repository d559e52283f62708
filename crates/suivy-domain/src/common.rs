//! Shared traits, half-day time primitives, and period keys.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in a roster.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
/// Half-day granularity marker for order starts and projections.
pub enum DayMoment {
    #[default]
    Morning,
    Afternoon,
}

impl DayMoment {
    /// Parses a moment label. Anything unrecognized defaults to Morning.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "afternoon" | "pm" | "apres-midi" | "après-midi" => DayMoment::Afternoon,
            _ => DayMoment::Morning,
        }
    }
}

impl fmt::Display for DayMoment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayMoment::Morning => "Morning",
            DayMoment::Afternoon => "Afternoon",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for DayMoment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|raw| DayMoment::parse(&raw))
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A calendar date pinned to one of its two half-day slots.
pub struct HalfDaySlot {
    pub date: NaiveDate,
    pub moment: DayMoment,
}

impl HalfDaySlot {
    pub fn new(date: NaiveDate, moment: DayMoment) -> Self {
        Self { date, moment }
    }

    /// Advances one half-day: Morning to Afternoon on the same date,
    /// Afternoon to the next date's Morning. Saturates at the calendar's end.
    pub fn advance(self) -> Self {
        match self.moment {
            DayMoment::Morning => Self::new(self.date, DayMoment::Afternoon),
            DayMoment::Afternoon => Self::new(
                self.date.succ_opt().unwrap_or(self.date),
                DayMoment::Morning,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Keys a consumption period: either the reserved pre-system bucket or a
/// calendar month. `Initial` orders before every month.
pub enum PeriodKey {
    Initial,
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    pub const INITIAL_LABEL: &'static str = "initial";

    pub fn month(year: i32, month: u32) -> Self {
        PeriodKey::Month { year, month }
    }

    /// Returns the period key for the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        PeriodKey::Month {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Initial => f.write_str(Self::INITIAL_LABEL),
            PeriodKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Error returned when a period key string is neither `initial` nor `YYYY-MM`.
pub struct PeriodKeyParseError;

impl fmt::Display for PeriodKeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("period key must be `initial` or `YYYY-MM`")
    }
}

impl std::error::Error for PeriodKeyParseError {}

impl FromStr for PeriodKey {
    type Err = PeriodKeyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(Self::INITIAL_LABEL) {
            return Ok(PeriodKey::Initial);
        }
        let (year, month) = trimmed.split_once('-').ok_or(PeriodKeyParseError)?;
        let year: i32 = year.parse().map_err(|_| PeriodKeyParseError)?;
        let month: u32 = month.parse().map_err(|_| PeriodKeyParseError)?;
        if !(1..=12).contains(&month) {
            return Err(PeriodKeyParseError);
        }
        Ok(PeriodKey::Month { year, month })
    }
}

impl Serialize for PeriodKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
/// Legal holiday zone used by the business calendar.
pub enum Jurisdiction {
    #[default]
    Metropole,
    AlsaceMoselle,
}

impl Jurisdiction {
    /// Parses a zone label. Anything unrecognized defaults to Metropole.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "alsace-moselle" | "alsace_moselle" | "alsacemoselle" => Jurisdiction::AlsaceMoselle,
            _ => Jurisdiction::Metropole,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Jurisdiction::Metropole => "metropole",
            Jurisdiction::AlsaceMoselle => "alsace-moselle",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Jurisdiction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|raw| Jurisdiction::parse(&raw))
            .unwrap_or_default())
    }
}

/// Serde helper that maps malformed date strings to `None` instead of failing
/// a whole roster load. Callers surface the gap through roster warnings.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.trim().parse().ok()))
    }
}
