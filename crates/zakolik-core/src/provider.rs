use crate::error::ZakolikError;
use crate::model::{CarType, TariffKind, Trip};
use crate::pricing::{quote_tariff, Quote};
use crate::tariffs::TariffSource;
use std::collections::BTreeSet;

/// A car-sharing service that can price a trip.
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Every applicable pricing option for the trip.
    fn quote(&self, trip: &Trip) -> Result<Vec<Quote>, ZakolikError>;
}

/// Car4way: per-tier price lists with per-car-type columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Car4way {
    pub tariffs: Vec<TariffKind>,
    pub car_types: BTreeSet<CarType>,
    pub source: TariffSource,
}

impl Default for Car4way {
    fn default() -> Self {
        Self {
            tariffs: vec![TariffKind::default()],
            car_types: CarType::ALL.into_iter().collect(),
            source: TariffSource::Builtin,
        }
    }
}

impl Car4way {
    pub fn new(
        tariffs: Vec<TariffKind>,
        car_types: BTreeSet<CarType>,
        source: TariffSource,
    ) -> Result<Self, ZakolikError> {
        if tariffs.is_empty() {
            return Err(ZakolikError::NoTariffs);
        }
        if car_types.is_empty() {
            return Err(ZakolikError::NoCarTypes);
        }
        Ok(Self {
            tariffs,
            car_types,
            source,
        })
    }
}

impl Provider for Car4way {
    fn name(&self) -> &str {
        "car4way"
    }

    fn quote(&self, trip: &Trip) -> Result<Vec<Quote>, ZakolikError> {
        if self.tariffs.is_empty() {
            return Err(ZakolikError::NoTariffs);
        }
        if self.car_types.is_empty() {
            return Err(ZakolikError::NoCarTypes);
        }

        let mut quotes = Vec::new();
        for kind in &self.tariffs {
            let tariff = self.source.load(*kind)?;
            quotes.extend(quote_tariff(self.name(), &tariff, &self.car_types, trip));
        }
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_datetime;
    use rust_decimal_macros::dec;

    fn trip() -> Trip {
        Trip::new(
            dec!(10),
            parse_datetime("2026-10-15T10:00").unwrap(),
            parse_datetime("2026-10-15T11:00").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_selection() {
        let car4way = Car4way::default();
        assert_eq!(car4way.tariffs, vec![TariffKind::Basic]);
        assert_eq!(car4way.car_types.len(), 3);
        assert_eq!(car4way.name(), "car4way");
    }

    #[test]
    fn test_quotes_every_selected_tariff() {
        let car4way = Car4way::new(
            vec![TariffKind::Basic, TariffKind::Business],
            BTreeSet::from([CarType::Legend]),
            TariffSource::Builtin,
        )
        .unwrap();
        let quotes = car4way.quote(&trip()).unwrap();
        assert!(quotes.iter().any(|q| q.tariff == TariffKind::Basic));
        assert!(quotes.iter().any(|q| q.tariff == TariffKind::Business));
        assert!(quotes.iter().all(|q| q.tariff != TariffKind::Active));
        assert!(quotes.iter().all(|q| q.provider == "car4way"));
    }

    #[test]
    fn test_empty_selection_rejected() {
        assert!(matches!(
            Car4way::new(vec![], BTreeSet::from([CarType::Boss]), TariffSource::Builtin),
            Err(ZakolikError::NoTariffs)
        ));
        assert!(matches!(
            Car4way::new(vec![TariffKind::Basic], BTreeSet::new(), TariffSource::Builtin),
            Err(ZakolikError::NoCarTypes)
        ));
    }

    #[test]
    fn test_missing_directory_propagates() {
        let car4way = Car4way {
            source: TariffSource::Dir("/nonexistent/zakolik".into()),
            ..Car4way::default()
        };
        assert!(matches!(
            car4way.quote(&trip()),
            Err(ZakolikError::TariffLoad { .. })
        ));
    }
}
