use std::path::PathBuf;

use anyhow::Context;
use chrono::Datelike;
use clap::builder::PossibleValuesParser;
use clap::{arg, value_parser, Command};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ds_testgen::header::{write_header_file, DEFAULT_FILE_NAME};
use ds_testgen::{generate_suite, GeneratorConfig, Target};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Command::new("ds-testgen")
        .about("Generates digital signature peripheral test cases")
        .arg(
            arg!(--target <TARGET> "Target to generate test cases for, different targets support different max key length")
                .value_parser(PossibleValuesParser::new(
                    Target::ALL.iter().map(|t| t.name()),
                )),
        )
        .arg(
            arg!(--out <FILE> "Output header")
                .required(false)
                .default_value(DEFAULT_FILE_NAME)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--seed <U64> "Seed for reproducible output")
                .required(false)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--year <YEAR> "Copyright year, defaults to the current year")
                .required(false)
                .value_parser(value_parser!(i32)),
        )
        .arg(arg!(--verify "Decrypt and check every case before writing"))
        .get_matches();

    let target: Target = args
        .get_one::<String>("target")
        .context("missing --target")?
        .parse()?;
    let out = args
        .get_one::<PathBuf>("out")
        .context("missing --out")?;
    let year = args
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| chrono::Utc::now().year());

    let config = GeneratorConfig::new(target);
    let suite = match args.get_one::<u64>("seed") {
        Some(&seed) => {
            log::info!("Using seed {}", seed);
            generate_suite(&config, &mut ChaCha8Rng::seed_from_u64(seed))?
        }
        None => generate_suite(&config, &mut rand_core::OsRng)?,
    };

    if args.contains_id("verify") {
        suite.verify().context("generated cases failed self-check")?;
        log::info!("All {} cases verified", suite.cases.len());
    }

    write_header_file(out, &suite, year)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
