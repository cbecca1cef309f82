use crate::error::ZakolikError;
use crate::model::{Tariff, TariffKind};
use crate::parsing::load_tariff;
use std::sync::LazyLock;
use tracing::debug;

const BASIC_TSV: &str = include_str!("../../../../provider-data/car4way/basic.tsv");
const ACTIVE_TSV: &str = include_str!("../../../../provider-data/car4way/active.tsv");
const BUSINESS_TSV: &str = include_str!("../../../../provider-data/car4way/business.tsv");

static TARIFFS: LazyLock<Result<Vec<Tariff>, (TariffKind, String)>> = LazyLock::new(|| {
    TariffKind::ALL
        .into_iter()
        .map(|kind| {
            debug!("loading bundled {kind} tariff");
            load_tariff(kind, source(kind).as_bytes()).map_err(|e| (kind, e.to_string()))
        })
        .collect()
});

/// The bundled export for a tier, as shipped in `provider-data/`.
pub fn source(kind: TariffKind) -> &'static str {
    match kind {
        TariffKind::Basic => BASIC_TSV,
        TariffKind::Active => ACTIVE_TSV,
        TariffKind::Business => BUSINESS_TSV,
    }
}

/// All bundled tariffs, parsed once.
pub fn all() -> Result<&'static [Tariff], ZakolikError> {
    match &*TARIFFS {
        Ok(tariffs) => Ok(tariffs),
        Err((kind, reason)) => Err(ZakolikError::BuiltinTariff {
            kind: *kind,
            reason: reason.clone(),
        }),
    }
}

/// Load a bundled tariff by tier.
pub fn tariff(kind: TariffKind) -> Result<&'static Tariff, ZakolikError> {
    all()?
        .iter()
        .find(|t| t.kind == kind)
        .ok_or_else(|| ZakolikError::BuiltinTariff {
            kind,
            reason: "not bundled".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CarType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bundled_tariffs_parse() {
        let tariffs = all().unwrap();
        assert_eq!(tariffs.len(), 3);
        for tariff in tariffs {
            assert_eq!(tariff.per_car_type.len(), CarType::ALL.len());
            for per_car in tariff.per_car_type.values() {
                assert_eq!(per_car.per_minute.len(), 2);
                assert!(!per_car.packages.is_empty());
            }
        }
    }

    #[test]
    fn test_basic_tariff_values() {
        let basic = tariff(TariffKind::Basic).unwrap();
        let legend = &basic.per_car_type[&CarType::Legend];
        assert_eq!(legend.per_minute[0].per_minute_czk, dec!(5.90));
        assert_eq!(legend.per_minute[1].per_minute_czk, dec!(3.90));
        assert_eq!(basic.per_km_czk, dec!(4.90));
    }

    #[test]
    fn test_bundled_weekend_package_is_time_limited() {
        for tariff in all().unwrap() {
            let boss = &tariff.per_car_type[&CarType::Boss];
            let weekend: Vec<_> = boss
                .packages
                .iter()
                .filter(|p| p.time_limitation.is_some())
                .collect();
            assert_eq!(weekend.len(), 1, "{} tariff", tariff.kind);
        }
    }
}
