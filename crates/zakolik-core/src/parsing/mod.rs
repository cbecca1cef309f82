pub mod items;
pub mod values;

use crate::error::ZakolikError;
use crate::model::{
    clock, CarType, Package, PerCarTariff, PerMinuteTariff, Tariff, TariffKind, TimeLimitation,
    WeekdayTime,
};
use chrono::{NaiveTime, Weekday};
use csv::{ReaderBuilder, Trim};
use items::{classify_item, ItemKind};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::{debug, warn};
use values::parse_czk;

/// Weekend package: Friday 16:00 through Monday 10:00.
const WEEKEND_HOURS: i64 = 8 + 24 + 24 + 10;

/// One exported row: item label plus one price cell per car type.
#[derive(Debug, Clone, Deserialize)]
struct TariffRow {
    #[serde(alias = "Minutový tarif  (km v ceně)", alias = "Minutový tarif (km v ceně)")]
    item: String,
    #[serde(
        default,
        alias = "Legend Fabia",
        deserialize_with = "deserialize_czk"
    )]
    legend: Option<Decimal>,
    #[serde(
        default,
        alias = "Fancy  Scala, Karoq, Octavia, Caddy Van",
        alias = "Fancy Scala, Karoq, Octavia, Caddy Van",
        deserialize_with = "deserialize_czk"
    )]
    fancy: Option<Decimal>,
    #[serde(
        default,
        alias = "Boss Superb / Kodiaq",
        deserialize_with = "deserialize_czk"
    )]
    boss: Option<Decimal>,
}

impl TariffRow {
    fn prices(&self) -> [(CarType, Option<Decimal>); 3] {
        [
            (CarType::Legend, self.legend),
            (CarType::Fancy, self.fancy),
            (CarType::Boss, self.boss),
        ]
    }

    /// Every car type must have a price.
    fn all_prices(&self) -> Result<Vec<(CarType, Decimal)>, ZakolikError> {
        self.prices()
            .into_iter()
            .map(|(car_type, price)| {
                price
                    .map(|p| (car_type, p))
                    .ok_or_else(|| ZakolikError::MissingPrice {
                        item: self.item.clone(),
                        car_type,
                    })
            })
            .collect()
    }

    /// Exactly one cell filled, whichever column the export put it in.
    fn single_price(&self) -> Result<Decimal, ZakolikError> {
        let filled: Vec<Decimal> = self.prices().iter().filter_map(|(_, p)| *p).collect();
        match filled.as_slice() {
            [price] => Ok(*price),
            _ => Err(ZakolikError::AmbiguousPrice {
                item: self.item.clone(),
                found: filled.len(),
            }),
        }
    }
}

fn deserialize_czk<'de, D: Deserializer<'de>>(des: D) -> Result<Option<Decimal>, D::Error> {
    let cell = String::deserialize(des)?;
    parse_czk(&cell).map_err(de::Error::custom)
}

/// Accumulates rows until every required one has been seen.
#[derive(Default)]
struct TariffBuilder {
    day: BTreeMap<CarType, PerMinuteTariff>,
    night: BTreeMap<CarType, PerMinuteTariff>,
    packages: BTreeMap<CarType, Vec<Package>>,
    per_km_czk: Option<Decimal>,
    airport_enter_czk: Option<Decimal>,
    airport_leave_czk: Option<Decimal>,
}

impl TariffBuilder {
    fn minute_rate(
        target: &mut BTreeMap<CarType, PerMinuteTariff>,
        row: &TariffRow,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<(), ZakolikError> {
        if !target.is_empty() {
            warn!("duplicate row {:?}, the later one wins", row.item);
        }
        for (car_type, per_minute_czk) in row.all_prices()? {
            target.insert(
                car_type,
                PerMinuteTariff {
                    start,
                    end,
                    per_minute_czk,
                },
            );
        }
        Ok(())
    }

    fn package(
        &mut self,
        row: &TariffRow,
        duration_minutes: i64,
        kilometers: Decimal,
        time_limitation: Option<TimeLimitation>,
    ) -> Result<(), ZakolikError> {
        if duration_minutes <= 0 {
            return Err(ZakolikError::InvalidPackage {
                item: row.item.clone(),
            });
        }
        for (car_type, czk) in row.all_prices()? {
            self.packages.entry(car_type).or_default().push(Package {
                name: row.item.split_whitespace().collect::<Vec<_>>().join(" "),
                duration_minutes,
                kilometers,
                czk,
                time_limitation,
            });
        }
        Ok(())
    }

    fn add_row(&mut self, kind: TariffKind, row: &TariffRow) -> Result<(), ZakolikError> {
        let day_start = clock(6, 0);
        let night_start = clock(20, 0);

        match classify_item(&row.item) {
            Some(ItemKind::DayRate) => {
                Self::minute_rate(&mut self.day, row, day_start, night_start)
            }
            Some(ItemKind::NightRate) => {
                Self::minute_rate(&mut self.night, row, night_start, day_start)
            }
            Some(ItemKind::SectionHeading) => Ok(()),
            Some(ItemKind::Package {
                duration_minutes,
                kilometers,
            }) => self.package(row, duration_minutes, kilometers, None),
            Some(ItemKind::WeekendPackage { kilometers }) => {
                let weekend = TimeLimitation {
                    from: WeekdayTime {
                        weekday: Weekday::Fri,
                        time: clock(16, 0),
                    },
                    to: WeekdayTime {
                        weekday: Weekday::Mon,
                        time: clock(10, 0),
                    },
                };
                self.package(row, WEEKEND_HOURS * 60, kilometers, Some(weekend))
            }
            Some(ItemKind::PerKm) => {
                self.per_km_czk = Some(row.single_price()?);
                Ok(())
            }
            Some(ItemKind::AirportEnter) => {
                self.airport_enter_czk = Some(row.single_price()?);
                Ok(())
            }
            Some(ItemKind::AirportLeave) => {
                self.airport_leave_czk = Some(row.single_price()?);
                Ok(())
            }
            None => Err(ZakolikError::UnknownItem {
                tariff: kind,
                item: row.item.clone(),
            }),
        }
    }

    fn build(mut self, kind: TariffKind) -> Result<Tariff, ZakolikError> {
        let missing = |row: &'static str| ZakolikError::MissingRow { tariff: kind, row };

        let mut per_car_type = BTreeMap::new();
        for car_type in CarType::ALL {
            let day = self
                .day
                .get(&car_type)
                .copied()
                .ok_or_else(|| missing("the day minute rate"))?;
            let night = self
                .night
                .get(&car_type)
                .copied()
                .ok_or_else(|| missing("the night minute rate"))?;
            per_car_type.insert(
                car_type,
                PerCarTariff {
                    per_minute: vec![day, night],
                    packages: self.packages.remove(&car_type).unwrap_or_default(),
                },
            );
        }

        Ok(Tariff {
            kind,
            per_car_type,
            per_km_czk: self
                .per_km_czk
                .ok_or_else(|| missing("the per km price"))?,
            airport_enter_czk: self
                .airport_enter_czk
                .ok_or_else(|| missing("the airport entry fee"))?,
            airport_leave_czk: self
                .airport_leave_czk
                .ok_or_else(|| missing("the airport exit fee"))?,
        })
    }
}

/// Parse one exported price list (tab-separated, header row first).
pub fn load_tariff<R: Read>(kind: TariffKind, data: R) -> Result<Tariff, ZakolikError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let mut builder = TariffBuilder::default();
    for result in rdr.deserialize() {
        let row: TariffRow = result?;
        if row.item.is_empty() && row.prices().iter().all(|(_, p)| p.is_none()) {
            continue;
        }
        debug!("{kind}: {row:?}");
        builder.add_row(kind, &row)?;
    }

    builder.build(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Minutový tarif  (km v ceně)\tLegend Fabia\tFancy  Scala, Karoq, Octavia, Caddy Van\tBoss Superb / Kodiaq\n";

    fn table(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for row in rows {
            s.push_str(row);
            s.push('\n');
        }
        s
    }

    fn complete_rows() -> Vec<&'static str> {
        vec![
            "Denní: 6:00 - 20:00 Po-Ne\t5,90\t6,90\t8,90",
            "Noční: 20:00 - 6:00 Po-Ne\t3,90\t4,90\t5,90",
            "Výhodné balíčky\t\t\t",
            "3 hodiny + 50 km\t449\t549\t749",
            "Víkend + 200 km\t1 790\t2 090\t2 690",
            "Km nad rámec balíčků\t\t4,90\t",
            "Letiště Praha - příjezd\t\t199\t",
            "Letiště Praha - výjezd\t\t299\t",
        ]
    }

    #[test]
    fn test_load_complete_table() {
        let data = table(&complete_rows());
        let tariff = load_tariff(TariffKind::Basic, data.as_bytes()).unwrap();

        assert_eq!(tariff.kind, TariffKind::Basic);
        assert_eq!(tariff.per_km_czk, dec!(4.90));
        assert_eq!(tariff.airport_enter_czk, dec!(199));
        assert_eq!(tariff.airport_leave_czk, dec!(299));

        let fancy = &tariff.per_car_type[&CarType::Fancy];
        assert_eq!(fancy.per_minute.len(), 2);
        assert_eq!(fancy.per_minute[0].per_minute_czk, dec!(6.90));
        assert_eq!(fancy.per_minute[0].start, clock(6, 0));
        assert_eq!(fancy.per_minute[1].start, clock(20, 0));
        assert_eq!(fancy.packages.len(), 2);
        assert_eq!(fancy.packages[0].duration_minutes, 180);
        assert_eq!(fancy.packages[1].czk, dec!(2090));
        assert_eq!(fancy.packages[1].duration_minutes, 66 * 60);
        assert!(fancy.packages[1].time_limitation.is_some());
    }

    #[test]
    fn test_lowercase_header_names() {
        let data = table(&complete_rows()).replacen(HEADER, "item\tlegend\tfancy\tboss\n", 1);
        assert!(load_tariff(TariffKind::Active, data.as_bytes()).is_ok());
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut rows = complete_rows();
        rows.push("Parkování\t10\t10\t10");
        let err = load_tariff(TariffKind::Basic, table(&rows).as_bytes()).unwrap_err();
        assert!(matches!(err, ZakolikError::UnknownItem { item, .. } if item == "Parkování"));
    }

    #[test]
    fn test_missing_column_price_rejected() {
        let mut rows = complete_rows();
        rows[0] = "Denní: 6:00 - 20:00 Po-Ne\t5,90\t\t8,90";
        let err = load_tariff(TariffKind::Basic, table(&rows).as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ZakolikError::MissingPrice {
                car_type: CarType::Fancy,
                ..
            }
        ));
    }

    #[test]
    fn test_ambiguous_single_price_rejected() {
        let mut rows = complete_rows();
        rows[5] = "Km nad rámec balíčků\t4,90\t4,90\t";
        let err = load_tariff(TariffKind::Basic, table(&rows).as_bytes()).unwrap_err();
        assert!(matches!(err, ZakolikError::AmbiguousPrice { found: 2, .. }));
    }

    #[test]
    fn test_missing_row_rejected() {
        let mut rows = complete_rows();
        rows.retain(|r| !r.starts_with("Letiště Praha - výjezd"));
        let err = load_tariff(TariffKind::Business, table(&rows).as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ZakolikError::MissingRow {
                tariff: TariffKind::Business,
                row: "the airport exit fee"
            }
        ));
    }

    #[test]
    fn test_missing_night_rate_rejected() {
        let mut rows = complete_rows();
        rows.remove(1);
        let err = load_tariff(TariffKind::Basic, table(&rows).as_bytes()).unwrap_err();
        assert!(matches!(err, ZakolikError::MissingRow { .. }));
    }

    #[test]
    fn test_duplicate_minute_rate_later_row_wins() {
        let mut rows = complete_rows();
        rows.insert(1, "Denní: 6:00 - 20:00 Po-Ne\t6,50\t7,50\t9,50");
        let tariff = load_tariff(TariffKind::Basic, table(&rows).as_bytes()).unwrap();

        let legend = &tariff.per_car_type[&CarType::Legend];
        assert_eq!(legend.per_minute.len(), 2);
        assert_eq!(legend.per_minute[0].per_minute_czk, dec!(6.50));
        assert_eq!(
            tariff.per_car_type[&CarType::Boss].per_minute[0].per_minute_czk,
            dec!(9.50)
        );
    }

    #[test]
    fn test_zero_length_package_rejected() {
        let mut rows = complete_rows();
        rows.push("0 hodin + 10 km\t1\t1\t1");
        let err = load_tariff(TariffKind::Basic, table(&rows).as_bytes()).unwrap_err();
        assert!(matches!(err, ZakolikError::InvalidPackage { .. }));
    }

    #[test]
    fn test_bad_price_cell_rejected() {
        let mut rows = complete_rows();
        rows[3] = "3 hodiny + 50 km\t449\tcca 500\t749";
        assert!(load_tariff(TariffKind::Basic, table(&rows).as_bytes()).is_err());
    }
}
