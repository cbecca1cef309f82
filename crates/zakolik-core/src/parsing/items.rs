use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// What a row of the price list describes, recognised from its item label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// "Denní: 6:00 - 20:00 Po-Ne"
    DayRate,
    /// "Noční: 20:00 - 6:00 Po-Ne"
    NightRate,
    /// "Výhodné balíčky", a heading above the packages.
    SectionHeading,
    /// "3 hodiny + 50 km", "2 dny + 400 km"
    Package {
        duration_minutes: i64,
        kilometers: Decimal,
    },
    /// "Víkend + 200 km"
    WeekendPackage { kilometers: Decimal },
    /// "Km nad rámec balíčků"
    PerKm,
    /// "Letiště Praha - příjezd"
    AirportEnter,
    /// "Letiště Praha - výjezd"
    AirportLeave,
}

// Keep in sync with the windows in `parsing::load_tariff`.
static DAY_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Denní:\s*6:00\s*-\s*20:00\s*Po\s*-\s*Ne$").expect("valid regex")
});
static NIGHT_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Noční:\s*20:00\s*-\s*6:00\s*Po\s*-\s*Ne$").expect("valid regex")
});
static HOUR_PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s+hodin[ay]?\s*\+\s*([0-9]+)\s*km$").expect("valid regex")
});
static DAY_PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s+(?:den|dny|dní)\s*\+\s*([0-9]+)\s*km$").expect("valid regex")
});
static WEEKEND_PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Víkend\s*\+\s*([0-9]+)\s*km$").expect("valid regex")
});

/// Recognise an item label. Whitespace runs are collapsed first, since the
/// viewer's export tends to double spaces where the PDF wrapped a cell.
pub fn classify_item(label: &str) -> Option<ItemKind> {
    let label = label.split_whitespace().collect::<Vec<_>>().join(" ");

    match label.as_str() {
        "Výhodné balíčky" => return Some(ItemKind::SectionHeading),
        "Km nad rámec balíčků" => return Some(ItemKind::PerKm),
        "Letiště Praha - příjezd" => return Some(ItemKind::AirportEnter),
        "Letiště Praha - výjezd" => return Some(ItemKind::AirportLeave),
        _ => {}
    }

    if DAY_RATE_RE.is_match(&label) {
        return Some(ItemKind::DayRate);
    }
    if NIGHT_RATE_RE.is_match(&label) {
        return Some(ItemKind::NightRate);
    }
    if let Some(caps) = HOUR_PACKAGE_RE.captures(&label) {
        return package(&caps[1], &caps[2], 60);
    }
    if let Some(caps) = DAY_PACKAGE_RE.captures(&label) {
        return package(&caps[1], &caps[2], 24 * 60);
    }
    if let Some(caps) = WEEKEND_PACKAGE_RE.captures(&label) {
        let kilometers = Decimal::from_str(&caps[1]).ok()?;
        return Some(ItemKind::WeekendPackage { kilometers });
    }

    None
}

fn package(count: &str, kilometers: &str, unit_minutes: i64) -> Option<ItemKind> {
    let count: i64 = count.parse().ok()?;
    let kilometers = Decimal::from_str(kilometers).ok()?;
    Some(ItemKind::Package {
        duration_minutes: count.checked_mul(unit_minutes)?,
        kilometers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minute_rates() {
        assert_eq!(
            classify_item("Denní: 6:00 - 20:00 Po-Ne"),
            Some(ItemKind::DayRate)
        );
        assert_eq!(
            classify_item("Noční:  20:00 - 6:00 Po-Ne"),
            Some(ItemKind::NightRate)
        );
    }

    #[test]
    fn test_hour_packages() {
        assert_eq!(
            classify_item("3 hodiny + 50 km"),
            Some(ItemKind::Package {
                duration_minutes: 180,
                kilometers: dec!(50)
            })
        );
        assert_eq!(
            classify_item("12 hodin + 150 km"),
            Some(ItemKind::Package {
                duration_minutes: 720,
                kilometers: dec!(150)
            })
        );
        assert_eq!(
            classify_item("1 hodina + 20 km"),
            Some(ItemKind::Package {
                duration_minutes: 60,
                kilometers: dec!(20)
            })
        );
    }

    #[test]
    fn test_day_packages() {
        assert_eq!(
            classify_item("2 dny + 400 km"),
            Some(ItemKind::Package {
                duration_minutes: 2 * 24 * 60,
                kilometers: dec!(400)
            })
        );
        assert_eq!(
            classify_item("7 dní + 1000 km"),
            Some(ItemKind::Package {
                duration_minutes: 7 * 24 * 60,
                kilometers: dec!(1000)
            })
        );
        assert_eq!(
            classify_item("1 den + 200 km"),
            Some(ItemKind::Package {
                duration_minutes: 24 * 60,
                kilometers: dec!(200)
            })
        );
    }

    #[test]
    fn test_weekend_package() {
        assert_eq!(
            classify_item("Víkend + 200 km"),
            Some(ItemKind::WeekendPackage {
                kilometers: dec!(200)
            })
        );
    }

    #[test]
    fn test_fixed_labels() {
        assert_eq!(classify_item("Výhodné balíčky"), Some(ItemKind::SectionHeading));
        assert_eq!(classify_item("Km nad  rámec balíčků"), Some(ItemKind::PerKm));
        assert_eq!(
            classify_item("Letiště Praha - příjezd"),
            Some(ItemKind::AirportEnter)
        );
        assert_eq!(
            classify_item("Letiště Praha - výjezd"),
            Some(ItemKind::AirportLeave)
        );
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(classify_item("Parkování v zóně"), None);
        assert_eq!(classify_item("hodiny + 50 km"), None);
    }

    #[test]
    fn test_overflowing_count_is_unknown() {
        assert_eq!(classify_item("99999999999999999999 hodin + 5 km"), None);
    }
}
