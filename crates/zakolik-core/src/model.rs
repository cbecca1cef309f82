use crate::error::ZakolikError;
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Membership tier; each one is exported to its own TSV file.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TariffKind {
    #[default]
    Basic,
    Active,
    Business,
}

impl TariffKind {
    pub const ALL: [TariffKind; 3] = [TariffKind::Basic, TariffKind::Active, TariffKind::Business];

    pub fn name(&self) -> &'static str {
        match self {
            TariffKind::Basic => "basic",
            TariffKind::Active => "active",
            TariffKind::Business => "business",
        }
    }

    /// Name of the exported table for this tier, e.g. `basic.tsv`.
    pub fn file_name(&self) -> String {
        format!("{}.tsv", self.name())
    }
}

impl fmt::Display for TariffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for TariffKind {
    type Err = ZakolikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TariffKind::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| ZakolikError::UnknownTariff(s.to_string()))
    }
}

/// Vehicle category; each has its own price column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarType {
    Legend,
    Fancy,
    Boss,
}

impl CarType {
    pub const ALL: [CarType; 3] = [CarType::Legend, CarType::Fancy, CarType::Boss];

    pub fn name(&self) -> &'static str {
        match self {
            CarType::Legend => "legend",
            CarType::Fancy => "fancy",
            CarType::Boss => "boss",
        }
    }

    /// Example models as printed in the price list column header.
    pub fn models(&self) -> &'static str {
        match self {
            CarType::Legend => "Fabia",
            CarType::Fancy => "Scala, Karoq, Octavia, Caddy Van",
            CarType::Boss => "Superb / Kodiaq",
        }
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for CarType {
    type Err = ZakolikError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CarType::ALL
            .into_iter()
            .find(|car_type| car_type.name() == lower)
            .ok_or_else(|| ZakolikError::UnknownCarType(s.to_string()))
    }
}

/// Per-minute rate applied daily within `[start, end)`.
///
/// A window with `end <= start` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerMinuteTariff {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub per_minute_czk: Decimal,
}

impl PerMinuteTariff {
    pub fn covers(&self, time: NaiveTime) -> bool {
        if self.start < self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayTime {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

/// Weekly window a package may be used in, e.g. Friday 16:00 to Monday 10:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLimitation {
    pub from: WeekdayTime,
    pub to: WeekdayTime,
}

impl TimeLimitation {
    /// The occurrence of this window that opens at or before `at`.
    ///
    /// Returns `(open, close)`; `at` may lie past `close` if the window
    /// already ended that week.
    pub fn window_at(&self, at: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let days_back = (at.weekday().num_days_from_monday() + 7
            - self.from.weekday.num_days_from_monday())
            % 7;
        let mut open = (at.date() - Duration::days(days_back.into())).and_time(self.from.time);
        if open > at {
            open -= Duration::days(7);
        }

        let days_forward = (self.to.weekday.num_days_from_monday() + 7
            - open.weekday().num_days_from_monday())
            % 7;
        let mut close = (open.date() + Duration::days(days_forward.into())).and_time(self.to.time);
        if close <= open {
            close += Duration::days(7);
        }

        (open, close)
    }
}

/// Prepaid block of time with a kilometre allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Item label from the price list, e.g. "3 hodiny + 50 km".
    pub name: String,
    pub duration_minutes: i64,
    pub kilometers: Decimal,
    pub czk: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limitation: Option<TimeLimitation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerCarTariff {
    pub per_minute: Vec<PerMinuteTariff>,
    pub packages: Vec<Package>,
}

impl PerCarTariff {
    /// Per-minute rate at noon.
    pub fn day_rate(&self) -> Option<Decimal> {
        let noon = clock(12, 0);
        self.per_minute
            .iter()
            .find(|t| t.covers(noon))
            .map(|t| t.per_minute_czk)
    }
}

/// One tier's complete price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tariff {
    pub kind: TariffKind,
    pub per_car_type: BTreeMap<CarType, PerCarTariff>,
    /// Price of each kilometre beyond a package allowance.
    pub per_km_czk: Decimal,
    pub airport_enter_czk: Decimal,
    pub airport_leave_czk: Decimal,
}

/// Longest trip the fare engine will price.
pub const MAX_TRIP_DAYS: i64 = 90;

/// Longest distance the fare engine will price.
pub const MAX_TRIP_KM: i64 = 100_000;

/// A planned trip in local civil time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub km: Decimal,
    pub begin: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub airport_enter: bool,
    #[serde(default)]
    pub airport_leave: bool,
}

impl Trip {
    pub fn new(km: Decimal, begin: NaiveDateTime, end: NaiveDateTime) -> Result<Trip, ZakolikError> {
        let trip = Trip {
            km,
            begin,
            end,
            airport_enter: false,
            airport_leave: false,
        };
        trip.validate()?;
        Ok(trip)
    }

    /// Checks the bounds `new` enforces, for trips built field by field
    /// or deserialized.
    pub fn validate(&self) -> Result<(), ZakolikError> {
        if self.km < Decimal::ZERO {
            return Err(ZakolikError::InvalidTrip(format!(
                "distance must not be negative, got {} km",
                self.km
            )));
        }
        if self.km > Decimal::from(MAX_TRIP_KM) {
            return Err(ZakolikError::InvalidTrip(format!(
                "distance is limited to {MAX_TRIP_KM} km, got {} km",
                self.km
            )));
        }
        if self.end <= self.begin {
            return Err(ZakolikError::InvalidTrip(format!(
                "end {} must be after begin {}",
                self.end, self.begin
            )));
        }
        if self.end - self.begin > Duration::days(MAX_TRIP_DAYS) {
            return Err(ZakolikError::InvalidTrip(format!(
                "trips are limited to {MAX_TRIP_DAYS} days"
            )));
        }
        Ok(())
    }

    /// The default trip: 10 km, starting at the next 5-minute mark, one hour long.
    pub fn starting_soon(now: NaiveDateTime) -> Trip {
        let time = now.time();
        let mut seconds = i64::from(time.num_seconds_from_midnight());
        if time.nanosecond() > 0 {
            seconds += 1;
        }
        let rounded = (seconds + 299) / 300 * 300;
        let begin = now.date().and_time(NaiveTime::MIN) + Duration::seconds(rounded);

        Trip {
            km: Decimal::from(10),
            begin,
            end: begin + Duration::hours(1),
            airport_enter: false,
            airport_leave: false,
        }
    }

    pub fn with_airport_enter(mut self) -> Trip {
        self.airport_enter = true;
        self
    }

    pub fn with_airport_leave(mut self) -> Trip {
        self.airport_leave = true;
        self
    }

    /// Billed interval: begin truncated, end rounded up to whole minutes.
    pub fn billing_interval(&self) -> (NaiveDateTime, NaiveDateTime) {
        (floor_minute(self.begin), ceil_minute(self.end))
    }

    pub fn billable_minutes(&self) -> i64 {
        let (begin, end) = self.billing_interval();
        (end - begin).num_minutes()
    }
}

fn floor_minute(at: NaiveDateTime) -> NaiveDateTime {
    let minutes = i64::from(at.time().num_seconds_from_midnight() / 60);
    at.date().and_time(NaiveTime::MIN) + Duration::minutes(minutes)
}

fn ceil_minute(at: NaiveDateTime) -> NaiveDateTime {
    let floored = floor_minute(at);
    if floored == at {
        floored
    } else {
        floored + Duration::minutes(1)
    }
}

/// Time of day from hours and minutes.
pub(crate) fn clock(hour: i64, minute: i64) -> NaiveTime {
    NaiveTime::MIN + Duration::hours(hour) + Duration::minutes(minute)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a local date-time as typed into a `datetime-local` field.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, ZakolikError> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .ok_or_else(|| {
            ZakolikError::InvalidTrip(format!(
                "cannot read '{s}' as a date and time, expected e.g. 2026-10-17T14:30"
            ))
        })
}
