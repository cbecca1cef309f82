pub mod builtin;

use crate::error::ZakolikError;
use crate::model::{Tariff, TariffKind};
use crate::parsing::load_tariff;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where tariff tables are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TariffSource {
    /// The exports bundled into the binary.
    #[default]
    Builtin,
    /// A directory with fresh `basic.tsv`, `active.tsv` and `business.tsv`.
    Dir(PathBuf),
}

impl TariffSource {
    pub fn from_dir(dir: Option<PathBuf>) -> TariffSource {
        dir.map(TariffSource::Dir).unwrap_or_default()
    }

    pub fn load(&self, kind: TariffKind) -> Result<Cow<'static, Tariff>, ZakolikError> {
        match self {
            TariffSource::Builtin => builtin::tariff(kind).map(Cow::Borrowed),
            TariffSource::Dir(dir) => load_dir(dir, kind).map(Cow::Owned),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TariffSource::Builtin => "bundled price list".to_string(),
            TariffSource::Dir(dir) => dir.display().to_string(),
        }
    }
}

/// Load `<dir>/<kind>.tsv`.
pub fn load_dir(dir: &Path, kind: TariffKind) -> Result<Tariff, ZakolikError> {
    let path = dir.join(kind.file_name());
    let load_error = |reason: String| ZakolikError::TariffLoad {
        kind,
        path: path.clone(),
        reason,
    };

    let file = File::open(&path).map_err(|e| load_error(e.to_string()))?;
    let tariff = load_tariff(kind, BufReader::new(file)).map_err(|e| load_error(e.to_string()))?;
    info!("loaded {kind} tariff from {}", path.display());
    Ok(tariff)
}

/// Load all three tiers from a directory.
pub fn load_dir_all(dir: &Path) -> Result<Vec<Tariff>, ZakolikError> {
    TariffKind::ALL
        .into_iter()
        .map(|kind| load_dir(dir, kind))
        .collect()
}

/// Outcome of checking one exported file.
#[derive(Debug, Clone, Serialize)]
pub struct FileCheck {
    pub kind: TariffKind,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub packages: usize,
    pub warnings: Vec<String>,
}

impl FileCheck {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Check a directory of freshly exported tables, one report per tier.
pub fn check_dir(dir: &Path) -> Vec<FileCheck> {
    TariffKind::ALL
        .into_iter()
        .map(|kind| {
            let path = dir.join(kind.file_name());
            match load_dir(dir, kind) {
                Ok(tariff) => {
                    let warnings = sanity_warnings(&tariff);
                    for w in &warnings {
                        warn!("{}: {w}", path.display());
                    }
                    FileCheck {
                        kind,
                        path,
                        error: None,
                        packages: tariff
                            .per_car_type
                            .values()
                            .next()
                            .map(|p| p.packages.len())
                            .unwrap_or(0),
                        warnings,
                    }
                }
                Err(e) => FileCheck {
                    kind,
                    path,
                    error: Some(e.to_string()),
                    packages: 0,
                    warnings: vec![],
                },
            }
        })
        .collect()
}

/// Plausibility checks that catch a misplaced selection box: a package
/// should never cost more than driving the same time at the day rate.
pub fn sanity_warnings(tariff: &Tariff) -> Vec<String> {
    let mut warnings = Vec::new();

    for (car_type, per_car) in &tariff.per_car_type {
        let Some(day_rate) = per_car.day_rate() else {
            continue;
        };
        for package in &per_car.packages {
            if package.time_limitation.is_some() {
                continue;
            }
            let Some(by_minute) =
                day_rate.checked_mul(rust_decimal::Decimal::from(package.duration_minutes))
            else {
                continue;
            };
            if package.czk >= by_minute {
                warnings.push(format!(
                    "{car_type}: package '{}' costs {} CZK, not cheaper than {} CZK by the minute",
                    package.name, package.czk, by_minute
                ));
            }
        }
    }

    if tariff.airport_enter_czk.is_zero() && tariff.airport_leave_czk.is_zero() {
        warnings.push("both airport fees are zero".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CarType;
    use std::fs;

    fn write_bundled(dir: &Path) {
        for kind in TariffKind::ALL {
            fs::write(dir.join(kind.file_name()), builtin::source(kind)).unwrap();
        }
    }

    #[test]
    fn test_load_dir_matches_bundled() {
        let dir = tempfile::tempdir().unwrap();
        write_bundled(dir.path());

        let from_dir = load_dir(dir.path(), TariffKind::Active).unwrap();
        assert_eq!(&from_dir, builtin::tariff(TariffKind::Active).unwrap());
        assert_eq!(load_dir_all(dir.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dir(dir.path(), TariffKind::Business).unwrap_err();
        match err {
            ZakolikError::TariffLoad { path, kind, .. } => {
                assert_eq!(kind, TariffKind::Business);
                assert!(path.ends_with("business.tsv"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_check_dir_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        write_bundled(dir.path());
        fs::write(dir.path().join("active.tsv"), "item\tlegend\tfancy\tboss\nNesmysl\t1\t2\t3\n")
            .unwrap();

        let checks = check_dir(dir.path());
        assert_eq!(checks.len(), 3);
        assert!(checks[0].is_ok());
        assert!(!checks[1].is_ok());
        assert!(checks[1].error.as_deref().unwrap().contains("Nesmysl"));
        assert!(checks[2].is_ok());
        assert_eq!(checks[0].packages, 7);
    }

    #[test]
    fn test_bundled_tariffs_have_no_warnings() {
        for tariff in builtin::all().unwrap() {
            assert!(sanity_warnings(tariff).is_empty(), "{} tariff", tariff.kind);
        }
    }

    #[test]
    fn test_overpriced_package_warns() {
        let mut tariff = builtin::tariff(TariffKind::Basic).unwrap().clone();
        for per_car in tariff.per_car_type.values_mut() {
            per_car.packages[0].czk = rust_decimal::Decimal::from(100_000);
        }
        let warnings = sanity_warnings(&tariff);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("3 hodiny + 50 km"));
    }

    #[test]
    fn test_warning_uses_day_rate_not_night() {
        let mut tariff = builtin::tariff(TariffKind::Basic).unwrap().clone();
        let legend = tariff.per_car_type.get_mut(&CarType::Legend).unwrap();
        // night dearer than day: 3 hours by day cost 180 x 5.90 = 1062
        legend.per_minute[1].per_minute_czk = rust_decimal::Decimal::from(100);
        legend.packages[0].czk = rust_decimal::Decimal::from(1100);

        let warnings = sanity_warnings(&tariff);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("legend: package '3 hodiny + 50 km'"));
    }

    #[test]
    fn test_check_dir_reports_huge_price_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_bundled(dir.path());
        let broken = builtin::source(TariffKind::Basic)
            .replace("3 hodiny + 50 km\t449", "3 hodiny + 50 km\t99999999999999999999999999");
        fs::write(dir.path().join("basic.tsv"), broken).unwrap();

        let checks = check_dir(dir.path());
        assert!(!checks[0].is_ok());
        assert!(checks[0].error.as_deref().unwrap().contains("more than"));
        assert!(checks[1].is_ok());
    }

    #[test]
    fn test_source_defaults_to_builtin() {
        assert_eq!(TariffSource::from_dir(None), TariffSource::Builtin);
        assert!(matches!(
            TariffSource::Builtin.load(TariffKind::Basic).unwrap(),
            Cow::Borrowed(_)
        ));
    }
}
