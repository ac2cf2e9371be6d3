/// Estimates the odds of finding Sets in the first cards dealt from a shuffled deck.
#[macro_use]
extern crate log;
extern crate pretty_env_logger;
extern crate speculate;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate maplit;
#[macro_use]
extern crate approx;

pub mod card;
pub mod config;
pub mod deck;
pub mod property;
pub mod report;
pub mod shuffle;
pub mod simulation;
pub mod testing;

use crate::config::*;
use crate::report::*;
use crate::simulation::*;

use std::error::Error;
use std::process;

fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);

    let simulation = Simulation::new(config.clone());
    let histogram = simulation.run_parallel(seed);

    match config.format {
        OutputFormat::Table => print!("{}", render_table(&histogram, config.trials)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render_json(
                &histogram,
                config.variant,
                config.trials,
                config.draw_limit
            ))?
        ),
    }
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    let matches = app().get_matches();

    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = run(config) {
        error!("{}", e);
        process::exit(1);
    }
}
