mod discretize;
mod estimate;
mod simulate;
mod utils;
mod utr;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "polyalen";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Bayesian estimation of poly(A) tail lengths from 3'-end sequencing read positions.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log per-read detail (RUST_LOG overrides the default level)"),
        )
        .subcommand(discretize::cli::create_discretize_cli())
        .subcommand(utr::cli::create_utr_cli())
        .subcommand(simulate::cli::create_simulate_cli())
        .subcommand(estimate::cli::create_estimate_cli())
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // PROFILE DISCRETIZATION
        //
        Some((discretize::cli::DISCRETIZE_CMD, matches)) => {
            discretize::handlers::run_discretize(matches)?;
        }

        //
        // 3' UTR EXTRACTION
        //
        Some((utr::cli::UTR_CMD, matches)) => {
            utr::handlers::run_utr(matches)?;
        }

        //
        // READ SIMULATION
        //
        Some((simulate::cli::SIMULATE_CMD, matches)) => {
            simulate::handlers::run_simulate(matches)?;
        }

        //
        // TAIL LENGTH ESTIMATION
        //
        Some((estimate::cli::ESTIMATE_CMD, matches)) => {
            estimate::handlers::run_estimate(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbose_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["polyalen", "discretize", "--profile", "p.txt", "--verbose"])
            .unwrap();
        assert_eq!(matches.get_flag("verbose"), true);
    }

    #[rstest]
    fn test_subcommand_required() {
        assert!(build_parser().try_get_matches_from(["polyalen"]).is_err());
    }
}
