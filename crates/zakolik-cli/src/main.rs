mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use zakolik_core::model::{CarType, TariffKind};

#[derive(Parser)]
#[command(
    name = "zakolik",
    version,
    about = "How much will the ride cost? Car-sharing fare calculator"
)]
struct Cli {
    /// Directory with freshly exported basic.tsv, active.tsv and business.tsv
    /// (default: the bundled price list)
    #[arg(long, global = true, env = "ZAKOLIK_TARIFF_DIR", value_name = "DIR")]
    tariff_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a trip
    Quote {
        /// Distance in kilometres
        #[arg(short, long, default_value = "10")]
        km: Decimal,

        /// Start, e.g. 2026-10-17T14:30 (default: next 5-minute mark)
        #[arg(short, long)]
        begin: Option<String>,

        /// End, e.g. 2026-10-17T15:30 (default: one hour after start)
        #[arg(short, long, conflicts_with = "minutes")]
        end: Option<String>,

        /// Trip length in minutes, instead of --end
        #[arg(short, long)]
        minutes: Option<i64>,

        /// Tariff tier(s): basic, active, business (default: basic)
        #[arg(short, long = "tariff", value_name = "TIER")]
        tariff: Vec<TariffKind>,

        /// Car type(s): legend, fancy, boss (default: all)
        #[arg(short, long = "car-type", value_name = "TYPE")]
        car_type: Vec<CarType>,

        /// The trip ends at Prague airport
        #[arg(long)]
        airport_enter: bool,

        /// The trip starts at Prague airport
        #[arg(long)]
        airport_leave: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show every option, not just the cheapest per car type
        #[arg(long)]
        all: bool,
    },
    /// Inspect and validate tariff tables
    Tariffs {
        #[command(subcommand)]
        action: TariffsAction,
    },
}

#[derive(Subcommand)]
enum TariffsAction {
    /// Summarise each tier
    List,
    /// Print a tier's full price table
    Explain {
        /// Tier name (e.g., "basic")
        tier: TariffKind,
    },
    /// Validate a directory of freshly exported TSV files
    Check {
        /// Directory containing basic.tsv, active.tsv, business.tsv
        dir: PathBuf,
    },
    /// Print the TSV layout the exports must follow
    Layout,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Quote {
            km,
            begin,
            end,
            minutes,
            tariff,
            car_type,
            airport_enter,
            airport_leave,
            output,
            all,
        } => commands::quote::run(commands::quote::QuoteArgs {
            km,
            begin,
            end,
            minutes,
            tariffs: tariff,
            car_types: car_type,
            airport_enter,
            airport_leave,
            tariff_dir: cli.tariff_dir,
            output_format: output,
            show_all: all,
        })
        .map(|()| true),
        Commands::Tariffs { action } => match action {
            TariffsAction::List => commands::tariffs::list(cli.tariff_dir).map(|()| true),
            TariffsAction::Explain { tier } => {
                commands::tariffs::explain(tier, cli.tariff_dir).map(|()| true)
            }
            TariffsAction::Check { dir } => commands::tariffs::check(&dir),
            TariffsAction::Layout => commands::tariffs::layout().map(|()| true),
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
