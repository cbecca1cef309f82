use crate::model::{CarType, TariffKind, Trip};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a quote is paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingOption {
    /// Day and night minute rates, kilometres included.
    PerMinute,
    /// `count` consecutive copies of a package, the rest by the minute.
    Package { name: String, count: u32 },
}

impl fmt::Display for PricingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingOption::PerMinute => write!(f, "minute tariff"),
            PricingOption::Package { name, count: 1 } => write!(f, "{name}"),
            PricingOption::Package { name, count } => write!(f, "{count}x {name}"),
        }
    }
}

/// Price of one trip under one tariff, car type and option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub provider: String,
    pub tariff: TariffKind,
    pub car_type: CarType,
    pub option: PricingOption,
    /// Minutes billed at minute rates.
    pub time_czk: Decimal,
    pub package_czk: Decimal,
    /// Kilometres beyond the package allowance.
    pub km_czk: Decimal,
    pub airport_czk: Decimal,
    pub total_czk: Decimal,
    /// Human-readable breakdown.
    pub reason: String,
}

/// All quotes for a trip, cheapest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    pub trip: Trip,
    pub billable_minutes: i64,
    pub quotes: Vec<Quote>,
}

impl QuoteResult {
    pub fn new(trip: Trip, mut quotes: Vec<Quote>) -> QuoteResult {
        quotes.sort_by(|a, b| {
            a.total_czk
                .cmp(&b.total_czk)
                .then(a.car_type.cmp(&b.car_type))
                .then(a.tariff.cmp(&b.tariff))
                .then_with(|| a.provider.cmp(&b.provider))
        });
        QuoteResult {
            billable_minutes: trip.billable_minutes(),
            trip,
            quotes,
        }
    }

    pub fn cheapest(&self) -> Option<&Quote> {
        self.quotes.first()
    }

    /// Cheapest quote for each (provider, tariff, car type).
    pub fn cheapest_per_car_type(&self) -> Vec<&Quote> {
        let mut best: BTreeMap<(&str, TariffKind, CarType), &Quote> = BTreeMap::new();
        for quote in &self.quotes {
            best.entry((quote.provider.as_str(), quote.tariff, quote.car_type))
                .or_insert(quote);
        }
        let mut cheapest: Vec<&Quote> = best.into_values().collect();
        cheapest.sort_by(|a, b| a.total_czk.cmp(&b.total_czk).then(a.car_type.cmp(&b.car_type)));
        cheapest
    }
}
