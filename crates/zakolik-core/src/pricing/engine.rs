use crate::model::{CarType, Package, PerCarTariff, Tariff, Trip};
use crate::pricing::outcome::{PricingOption, Quote};
use crate::pricing::windows::{minute_price, rate_spans};
use chrono::{Duration, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeSet;
use tracing::debug;

/// Round to hellers, half away from zero.
pub fn round_czk(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Every way to pay for `trip` under one tariff, for the selected car types.
pub fn quote_tariff(
    provider: &str,
    tariff: &Tariff,
    car_types: &BTreeSet<CarType>,
    trip: &Trip,
) -> Vec<Quote> {
    let mut quotes = Vec::new();

    for car_type in car_types {
        let Some(per_car) = tariff.per_car_type.get(car_type) else {
            debug!("{} tariff has no prices for {car_type}", tariff.kind);
            continue;
        };
        let ctx = QuoteContext {
            provider,
            tariff,
            car_type: *car_type,
            per_car,
            trip,
        };

        quotes.push(ctx.per_minute());
        for package in &per_car.packages {
            let quote = if package.time_limitation.is_some() {
                ctx.limited_package(package)
            } else {
                ctx.stacked_package(package)
            };
            if let Some(quote) = quote {
                debug!("{}/{}: {} -> {}", tariff.kind, car_type, quote.option, quote.total_czk);
                quotes.push(quote);
            }
        }
    }

    quotes
}

struct QuoteContext<'a> {
    provider: &'a str,
    tariff: &'a Tariff,
    car_type: CarType,
    per_car: &'a PerCarTariff,
    trip: &'a Trip,
}

/// Breakdown before it becomes a `Quote`.
struct Parts {
    option: PricingOption,
    time_czk: Decimal,
    package_czk: Decimal,
    km_czk: Decimal,
    notes: Vec<String>,
}

impl QuoteContext<'_> {
    fn airport_czk(&self) -> (Decimal, Vec<String>) {
        let mut czk = Decimal::ZERO;
        let mut notes = Vec::new();
        if self.trip.airport_enter {
            czk += self.tariff.airport_enter_czk;
            notes.push(format!("airport entry {}", self.tariff.airport_enter_czk));
        }
        if self.trip.airport_leave {
            czk += self.tariff.airport_leave_czk;
            notes.push(format!("airport exit {}", self.tariff.airport_leave_czk));
        }
        (czk, notes)
    }

    fn finish(&self, parts: Parts) -> Quote {
        let (airport_czk, airport_notes) = self.airport_czk();
        let time_czk = round_czk(parts.time_czk);
        let package_czk = round_czk(parts.package_czk);
        let km_czk = round_czk(parts.km_czk);
        let airport_czk = round_czk(airport_czk);
        let total_czk = time_czk + package_czk + km_czk + airport_czk;

        let mut notes = parts.notes;
        notes.extend(airport_notes);

        Quote {
            provider: self.provider.to_string(),
            tariff: self.tariff.kind,
            car_type: self.car_type,
            option: parts.option,
            time_czk,
            package_czk,
            km_czk,
            airport_czk,
            total_czk,
            reason: format!("{} = {} CZK", notes.join(" + "), total_czk),
        }
    }

    fn minute_notes(&self, begin: NaiveDateTime, end: NaiveDateTime) -> Vec<String> {
        rate_spans(&self.per_car.per_minute, begin, end)
            .iter()
            .map(|span| format!("{} min x {}", span.minutes, span.per_minute_czk))
            .collect()
    }

    fn excess_km(&self, allowance: Decimal) -> (Decimal, Option<String>) {
        let over = (self.trip.km - allowance).max(Decimal::ZERO);
        if over.is_zero() {
            (Decimal::ZERO, None)
        } else {
            (
                over * self.tariff.per_km_czk,
                Some(format!("{over} km x {}", self.tariff.per_km_czk)),
            )
        }
    }

    fn per_minute(&self) -> Quote {
        let (begin, end) = self.trip.billing_interval();
        let mut notes = self.minute_notes(begin, end);
        if notes.is_empty() {
            notes.push("0 min".to_string());
        }
        self.finish(Parts {
            option: PricingOption::PerMinute,
            time_czk: minute_price(&self.per_car.per_minute, begin, end),
            package_czk: Decimal::ZERO,
            km_czk: Decimal::ZERO,
            notes,
        })
    }

    /// Cheapest number of back-to-back copies of `package`, remainder by the minute.
    fn stacked_package(&self, package: &Package) -> Option<Quote> {
        if package.duration_minutes <= 0 {
            return None;
        }
        let (begin, end) = self.trip.billing_interval();
        let minutes = (end - begin).num_minutes();
        let duration = package.duration_minutes;
        let max_count = (minutes / duration + i64::from(minutes % duration != 0)).max(1);

        let mut best: Option<Quote> = None;
        for count in 1..=max_count {
            let covered = count.saturating_mul(duration);
            let count_czk = Decimal::from(count);

            let mut notes = vec![format!("{count} x {} ({})", package.czk, package.name)];
            let time_czk = if covered < minutes {
                let covered_end = begin + Duration::minutes(covered);
                notes.extend(self.minute_notes(covered_end, end));
                minute_price(&self.per_car.per_minute, covered_end, end)
            } else {
                Decimal::ZERO
            };
            let (km_czk, km_note) = self.excess_km(package.kilometers.saturating_mul(count_czk));
            notes.extend(km_note);

            let quote = self.finish(Parts {
                option: PricingOption::Package {
                    name: package.name.clone(),
                    count: u32::try_from(count).unwrap_or(u32::MAX),
                },
                time_czk,
                package_czk: package.czk * count_czk,
                km_czk,
                notes,
            });

            if best.as_ref().map_or(true, |b| quote.total_czk < b.total_czk) {
                best = Some(quote);
            }
        }
        best
    }

    /// A package bound to a weekly window: the whole trip must fit in one occurrence.
    fn limited_package(&self, package: &Package) -> Option<Quote> {
        let limitation = package.time_limitation?;
        let (begin, end) = self.trip.billing_interval();
        let (open, close) = limitation.window_at(begin);
        if end > close {
            debug!(
                "{} not applicable: trip {begin} - {end} outside {open} - {close}",
                package.name
            );
            return None;
        }

        let mut notes = vec![format!("1 x {} ({})", package.czk, package.name)];
        let (km_czk, km_note) = self.excess_km(package.kilometers);
        notes.extend(km_note);

        Some(self.finish(Parts {
            option: PricingOption::Package {
                name: package.name.clone(),
                count: 1,
            },
            time_czk: Decimal::ZERO,
            package_czk: package.czk,
            km_czk,
            notes,
        }))
    }
}
