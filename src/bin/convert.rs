//! Convert a quantity between units
//!
//! ```text
//! convert "1e-29 g cm^-3" --to "Msun Mpc^-3"
//! convert "3 Mearth" --config units.toml --cgs
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dimensionful::config::{read_config_file, Config};
use dimensionful::{Quantity, Unit};

/// Command line interface for `convert` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "convert", about = "Convert a quantity between units")]
struct Cli {
    /// Number followed by a unit expression, e.g. "1e-29 g cm^-3"
    #[clap(allow_hyphen_values = true)]
    quantity: String,

    /// TOML file defining extra unit symbols
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Unit expression to convert to
    #[clap(short, long, conflicts_with = "cgs")]
    to: Option<String>,

    /// Convert to cgs base units
    #[clap(long)]
    cgs: bool,

    /// Digits after the decimal point (overrides the config file)
    #[clap(short, long)]
    precision: Option<usize>,

    /// Log debugging information
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = match &args.config {
        Some(path) => read_config_file(path.clone())?,
        None       => Config::default(),
    };
    let registry = config.registry()?;
    let precision = args.precision.or(config.precision);

    let mut quantity = Quantity::parse_with(&args.quantity, &registry)?;
    tracing::debug!(%quantity, scale = quantity.unit().scale(), "parsed input");

    if let Some(target) = &args.to {
        quantity.convert_to(Unit::parse_with(target, &registry)?)?;
        println!("{}", show(&quantity, precision));
    } else if args.cgs {
        println!("{}", show(quantity.convert_to_cgs(), precision));
    } else {
        println!("{}", show(&quantity.get_in_cgs(), precision));
        println!("{}", show(&quantity, precision));
    }
    Ok(())
}

fn show(quantity: &Quantity<f64>, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!("{:.digits$e} {}", quantity.data(), quantity.unit()),
        None         => quantity.to_string(),
    }
}
