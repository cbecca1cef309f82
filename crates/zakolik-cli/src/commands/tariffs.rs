use std::path::{Path, PathBuf};
use zakolik_core::error::ZakolikError;
use zakolik_core::model::{CarType, TariffKind};
use zakolik_core::tariffs::{check_dir, TariffSource};

fn hours_label(minutes: i64) -> String {
    if minutes % (24 * 60) == 0 {
        format!("{} d", minutes / (24 * 60))
    } else if minutes % 60 == 0 {
        format!("{} h", minutes / 60)
    } else {
        format!("{minutes} min")
    }
}

pub fn list(tariff_dir: Option<PathBuf>) -> Result<(), ZakolikError> {
    let source = TariffSource::from_dir(tariff_dir);
    println!("Tariff tiers ({}):\n", source.describe());

    for kind in TariffKind::ALL {
        let tariff = source.load(kind)?;
        let packages = tariff
            .per_car_type
            .values()
            .next()
            .map(|p| p.packages.len())
            .unwrap_or(0);
        println!("  {:<10} {}", kind, kind.file_name());
        for (car_type, per_car) in &tariff.per_car_type {
            let rates: Vec<String> = per_car
                .per_minute
                .iter()
                .map(|t| {
                    format!(
                        "{}-{} {} CZK/min",
                        t.start.format("%H:%M"),
                        t.end.format("%H:%M"),
                        t.per_minute_czk
                    )
                })
                .collect();
            println!("             {:<8} {}", car_type, rates.join(", "));
        }
        println!(
            "             {} package(s), {} CZK/km beyond allowance",
            packages, tariff.per_km_czk
        );
        println!();
    }
    Ok(())
}

pub fn explain(kind: TariffKind, tariff_dir: Option<PathBuf>) -> Result<(), ZakolikError> {
    let source = TariffSource::from_dir(tariff_dir);
    let tariff = source.load(kind)?;

    println!("{} tariff ({})\n", kind, source.describe());

    println!("Car types:");
    for car_type in CarType::ALL {
        println!("  {:<8} {}", car_type, car_type.models());
    }
    println!();

    let max_name_len = tariff
        .per_car_type
        .values()
        .flat_map(|p| p.packages.iter().map(|pkg| pkg.name.chars().count()))
        .chain(std::iter::once("Minute rate 06:00-20:00".len()))
        .max()
        .unwrap_or(24);

    print!("  {:<width$}", "Item", width = max_name_len + 2);
    for car_type in tariff.per_car_type.keys() {
        print!("  {:>10}", car_type);
    }
    println!("  Allowance");
    println!(
        "  {}",
        "-".repeat(max_name_len + 2 + tariff.per_car_type.len() * 12 + 11)
    );

    let first = tariff.per_car_type.values().next();
    if let Some(first) = first {
        for (i, window) in first.per_minute.iter().enumerate() {
            let label = format!(
                "Minute rate {}-{}",
                window.start.format("%H:%M"),
                window.end.format("%H:%M")
            );
            print!("  {:<width$}", label, width = max_name_len + 2);
            for per_car in tariff.per_car_type.values() {
                match per_car.per_minute.get(i) {
                    Some(t) => print!("  {:>10}", t.per_minute_czk),
                    None => print!("  {:>10}", "-"),
                }
            }
            println!("  km included");
        }

        for (i, package) in first.packages.iter().enumerate() {
            let pad = max_name_len + 2 - package.name.chars().count().min(max_name_len + 2);
            print!("  {}{}", package.name, " ".repeat(pad));
            for per_car in tariff.per_car_type.values() {
                match per_car.packages.get(i) {
                    Some(p) => print!("  {:>10}", p.czk),
                    None => print!("  {:>10}", "-"),
                }
            }
            let mut allowance = format!(
                "{}, {} km",
                hours_label(package.duration_minutes),
                package.kilometers
            );
            if let Some(limit) = package.time_limitation {
                allowance.push_str(&format!(
                    ", {:?} {} to {:?} {}",
                    limit.from.weekday,
                    limit.from.time.format("%H:%M"),
                    limit.to.weekday,
                    limit.to.time.format("%H:%M")
                ));
            }
            println!("  {allowance}");
        }
    }

    println!();
    println!("  Beyond package allowance:  {} CZK/km", tariff.per_km_czk);
    println!("  Airport entry (Prague):    {} CZK", tariff.airport_enter_czk);
    println!("  Airport exit (Prague):     {} CZK", tariff.airport_leave_czk);
    println!();

    Ok(())
}

/// Returns false if any file failed.
pub fn check(dir: &Path) -> Result<bool, ZakolikError> {
    let checks = check_dir(dir);
    let mut all_ok = true;

    for check in &checks {
        match &check.error {
            None => println!(
                "  ok      {}  ({} packages)",
                check.path.display(),
                check.packages
            ),
            Some(error) => {
                all_ok = false;
                println!("  FAILED  {}", check.path.display());
                println!("          {error}");
            }
        }
        for w in &check.warnings {
            println!("          warning: {w}");
        }
    }

    println!();
    if all_ok {
        println!("All {} tariff files are valid.", checks.len());
    } else {
        println!("Some tariff files are invalid. Re-export them and run the check again.");
    }
    Ok(all_ok)
}

pub fn layout() -> Result<(), ZakolikError> {
    print!(
        r#"Tariff TSV layout
=================

Each tier is one tab-separated file named after it: basic.tsv,
active.tsv, business.tsv. Export them from the provider's price list PDF
by selecting the minute-tariff table with the viewer's table tool.

Columns (header row required, cells are trimmed):
  1  item     "Minutový tarif  (km v ceně)" or "item"
  2  legend   "Legend Fabia" or "legend"
  3  fancy    "Fancy  Scala, Karoq, Octavia, Caddy Van" or "fancy"
  4  boss     "Boss Superb / Kodiaq" or "boss"

Prices use a decimal comma and may use spaces as thousands separators:
"5,90", "1 290". Empty cells mean no value.

Recognised rows (by the item column):
  Denní: 6:00 - 20:00 Po-Ne    day minute rate, all three prices
  Noční: 20:00 - 6:00 Po-Ne    night minute rate, all three prices
  Výhodné balíčky              heading, ignored
  <N> hodin[y|a] + <K> km      package of N hours, all three prices
  <N> den|dny|dní + <K> km     package of N days, all three prices
  Víkend + <K> km              weekend package, Friday 16:00 to Monday 10:00
  Km nad rámec balíčků         price per km beyond a package, one cell
  Letiště Praha - příjezd      airport entry fee, one cell
  Letiště Praha - výjezd       airport exit fee, one cell

Any other row is rejected. Run `zakolik tariffs check <dir>` on a fresh
export before replacing provider-data/car4way/.
"#
    );
    Ok(())
}
