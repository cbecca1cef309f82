use crate::model::{CarType, TariffKind};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ZakolikError {
    #[error("failed to load {kind} tariff from {path}: {reason}")]
    TariffLoad {
        kind: TariffKind,
        path: PathBuf,
        reason: String,
    },

    #[error("bundled {kind} tariff is broken: {reason}")]
    BuiltinTariff { kind: TariffKind, reason: String },

    #[error("{tariff} tariff: the item {item:?} doesn't match any known row")]
    UnknownItem { tariff: TariffKind, item: String },

    #[error("item {item:?} has no price for {car_type}")]
    MissingPrice { item: String, car_type: CarType },

    #[error("item {item:?} should have exactly one price, found {found}")]
    AmbiguousPrice { item: String, found: usize },

    #[error("{tariff} tariff: no row for {row}")]
    MissingRow {
        tariff: TariffKind,
        row: &'static str,
    },

    #[error("package {item:?} covers no time")]
    InvalidPackage { item: String },

    #[error("invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },

    #[error("invalid trip: {0}")]
    InvalidTrip(String),

    #[error("unknown tariff '{0}'. Available: basic, active, business")]
    UnknownTariff(String),

    #[error("unknown car type '{0}'. Available: legend, fancy, boss")]
    UnknownCarType(String),

    #[error("no car types selected")]
    NoCarTypes,

    #[error("no tariffs selected")]
    NoTariffs,

    #[error("no provider could price this trip")]
    NoQuotes,

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
