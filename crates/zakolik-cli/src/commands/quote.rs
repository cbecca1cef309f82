use chrono::{Duration, Local};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::debug;
use zakolik_core::error::ZakolikError;
use zakolik_core::model::{parse_datetime, CarType, TariffKind, Trip};
use zakolik_core::provider::Car4way;
use zakolik_core::tariffs::TariffSource;

use crate::output;

pub struct QuoteArgs {
    pub km: Decimal,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub minutes: Option<i64>,
    pub tariffs: Vec<TariffKind>,
    pub car_types: Vec<CarType>,
    pub airport_enter: bool,
    pub airport_leave: bool,
    pub tariff_dir: Option<PathBuf>,
    pub output_format: String,
    pub show_all: bool,
}

pub fn run(args: QuoteArgs) -> Result<(), ZakolikError> {
    let trip = build_trip(&args)?;
    debug!(
        "trip: {} km, {} - {}, {} billable min",
        trip.km,
        trip.begin,
        trip.end,
        trip.billable_minutes()
    );

    let tariffs = if args.tariffs.is_empty() {
        vec![TariffKind::default()]
    } else {
        args.tariffs
    };
    let car_types: BTreeSet<CarType> = if args.car_types.is_empty() {
        CarType::ALL.into_iter().collect()
    } else {
        args.car_types.into_iter().collect()
    };

    let source = TariffSource::from_dir(args.tariff_dir);
    let car4way = Car4way::new(tariffs, car_types, source)?;
    let result = zakolik_core::quote_trip(&trip, &[&car4way])?;

    match args.output_format.as_str() {
        "json" => output::json::print(&result)?,
        _ => output::table::print(&result, args.show_all),
    }

    Ok(())
}

fn build_trip(args: &QuoteArgs) -> Result<Trip, ZakolikError> {
    let default = Trip::starting_soon(Local::now().naive_local());

    let begin = match &args.begin {
        Some(s) => parse_datetime(s)?,
        None => default.begin,
    };
    let end = match (&args.end, args.minutes) {
        (Some(s), _) => parse_datetime(s)?,
        (None, Some(minutes)) => Duration::try_minutes(minutes)
            .and_then(|length| begin.checked_add_signed(length))
            .ok_or_else(|| {
                ZakolikError::InvalidTrip(format!("trip length of {minutes} minutes is out of range"))
            })?,
        (None, None) => begin
            .checked_add_signed(Duration::hours(1))
            .ok_or_else(|| ZakolikError::InvalidTrip(format!("begin {begin} is out of range")))?,
    };

    let mut trip = Trip::new(args.km, begin, end)?;
    if args.airport_enter {
        trip = trip.with_airport_enter();
    }
    if args.airport_leave {
        trip = trip.with_airport_leave();
    }
    Ok(trip)
}
