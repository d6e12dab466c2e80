//! Validation data generator
//!
//! Reads IANA zone identifiers from stdin, one per line, and writes the
//! validation dataset for them to stdout as JSON.
//!
//! ```text
//! validation-gen [--start_year 2000] [--until_year 2050] < zones.txt > validation_data.json
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::{eyre::WrapErr, Result};
use log::info;
use tzvalidation::{
    config::{DEFAULT_START_YEAR, DEFAULT_UNTIL_YEAR},
    generate_dataset, read_zone_identifiers, GeneratorConfig,
};
use zone_provider::{CompiledTzdbProvider, FsTzdbProvider, ZoneProvider, DEFAULT_HORIZON_YEAR};

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Generates time zone validation data for the zones listed on stdin",
    after_help = "Zone identifiers are read from stdin, one per line. Blank lines and lines starting with '#' are ignored."
)]
struct Cli {
    /// The first year of the generated range.
    #[arg(long = "start_year", value_name = "YEAR", default_value_t = DEFAULT_START_YEAR, allow_negative_numbers = true)]
    start_year: i32,

    /// The year the generated range ends before.
    #[arg(long = "until_year", value_name = "YEAR", default_value_t = DEFAULT_UNTIL_YEAR, allow_negative_numbers = true)]
    until_year: i32,

    /// Read TZif files from this zoneinfo directory instead of the bundled
    /// database.
    #[arg(long = "zoneinfo_dir", value_name = "DIR")]
    zoneinfo_dir: Option<PathBuf>,

    /// Report this string as the time zone database version.
    #[arg(long = "tz_version", value_name = "VERSION")]
    tz_version: Option<String>,

    /// Generate zones one at a time instead of in parallel.
    #[arg(long)]
    sequential: bool,
}

impl Cli {
    fn generator_config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::default()
            .with_years(self.start_year, self.until_year)
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_parallel(!self.sequential);
        match &self.tz_version {
            Some(tz_version) => config.with_tz_version(tz_version.clone()),
            None => config,
        }
    }

    /// Recurring rules must be expanded past the local new year of
    /// `until_year`.
    fn horizon_year(&self) -> i32 {
        DEFAULT_HORIZON_YEAR.max(self.until_year.saturating_add(1))
    }
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and succeed. Everything else is
            // a usage error.
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print()?;
            return Ok(ExitCode::from(code));
        }
    };

    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let zones = read_zone_identifiers(io::stdin().lock()).wrap_err("could not read zones from stdin")?;
    info!("read {} zones from stdin", zones.len());

    let config = cli.generator_config();
    match &cli.zoneinfo_dir {
        Some(dir) => {
            info!("reading TZif files from `{}`", dir.display());
            let provider =
                FsTzdbProvider::from_directory(dir).with_horizon_year(cli.horizon_year());
            run(&provider, &zones, &config)?;
        }
        None => {
            let provider = CompiledTzdbProvider::default().with_horizon_year(cli.horizon_year());
            run(&provider, &zones, &config)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run<P: ZoneProvider + Sync>(
    provider: &P,
    zones: &[String],
    config: &GeneratorConfig,
) -> Result<()> {
    let dataset = generate_dataset(provider, zones, config)?;
    dataset
        .write_json(io::stdout().lock())
        .wrap_err("could not write the dataset to stdout")
}
