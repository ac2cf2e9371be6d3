/// Run configuration, read from the command line and checked before any trial runs.
use crate::card::*;
use crate::report::OutputFormat;
use crate::testing;

use clap::{App, Arg, ArgMatches};
use speculate::speculate;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TRIALS: u64 = 5_000_000;
pub const DEFAULT_DRAW_LIMIT: usize = 19;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("trial count must be positive")]
    NoTrials,

    #[error("draw limit must be positive")]
    NoDraws,

    #[error("draw limit {limit} exceeds the {size} cards of a {variant} deck")]
    DrawLimitTooLarge {
        limit: usize,
        size: usize,
        variant: Variant,
    },

    #[error("worker count must be positive")]
    NoWorkers,

    #[error("invalid value '{value}' for --{flag}: {reason}")]
    Parse {
        flag: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub trials: u64,
    pub draw_limit: usize,
    pub variant: Variant,
    /// Seed for the random source; a fresh one is picked when absent.
    pub seed: Option<u64>,
    pub workers: usize,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            draw_limit: DEFAULT_DRAW_LIMIT,
            variant: Variant::Full,
            seed: None,
            workers: 1,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Checks the configuration, returning it unchanged if it can be run.
    ///
    /// Draw limits below three are accepted but deal no rows.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        if self.draw_limit == 0 {
            return Err(ConfigError::NoDraws);
        }
        if self.draw_limit > self.variant.deck_size() {
            return Err(ConfigError::DrawLimitTooLarge {
                limit: self.draw_limit,
                size: self.variant.deck_size(),
                variant: self.variant,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.draw_limit < 3 {
            warn!("A draw limit of {} deals no hands of three", self.draw_limit);
        }
        Ok(self)
    }

    /// Builds a validated configuration from parsed command line arguments.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            trials: parse_or(matches, "trials", defaults.trials)?,
            draw_limit: parse_or(matches, "limit", defaults.draw_limit)?,
            variant: parse_or(matches, "variant", defaults.variant)?,
            seed: match matches.value_of("seed") {
                Some(_) => Some(parse_or(matches, "seed", 0)?),
                None => None,
            },
            workers: parse_or(matches, "workers", defaults.workers)?,
            format: parse_or(matches, "format", defaults.format)?,
        };
        config.validate()
    }
}

fn parse_or<T>(matches: &ArgMatches, flag: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match matches.value_of(flag) {
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Parse {
            flag,
            value: value.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// The command line interface.
pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("setodds")
        .version(crate_version!())
        .about("Estimates the odds of finding Sets in the first cards dealt from a shuffled deck")
        .arg(
            Arg::with_name("trials")
                .short("t")
                .long("trials")
                .takes_value(true)
                .help("Number of shuffled decks to deal"),
        )
        .arg(
            Arg::with_name("limit")
                .short("l")
                .long("limit")
                .takes_value(true)
                .help("Largest number of cards to deal"),
        )
        .arg(
            Arg::with_name("variant")
                .short("v")
                .long("variant")
                .takes_value(true)
                .possible_values(&["mini", "full"])
                .help("Which deck to deal from"),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .takes_value(true)
                .help("Seed for reproducible runs"),
        )
        .arg(
            Arg::with_name("workers")
                .short("w")
                .long("workers")
                .takes_value(true)
                .help("Number of parallel workers"),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .takes_value(true)
                .possible_values(&["table", "json"])
                .help("How to print the results"),
        )
}

speculate! {
    before {
        testing::set_up();
    }

    describe "validation" {
        it "accepts the defaults" {
            assert_eq!(Ok(Config::default()), Config::default().validate());
        }

        it "rejects zero trials" {
            let config = Config { trials: 0, ..Config::default() };
            assert_eq!(Err(ConfigError::NoTrials), config.validate());
        }

        it "rejects a draw limit beyond the deck" {
            let config = Config { variant: Variant::Mini, draw_limit: 28, ..Config::default() };
            assert_eq!(
                Err(ConfigError::DrawLimitTooLarge { limit: 28, size: 27, variant: Variant::Mini }),
                config.validate()
            );
            let config = Config { variant: Variant::Full, draw_limit: 81, ..Config::default() };
            assert!(config.validate().is_ok());
        }

        it "rejects zero draws and zero workers" {
            let config = Config { draw_limit: 0, ..Config::default() };
            assert_eq!(Err(ConfigError::NoDraws), config.validate());
            let config = Config { workers: 0, ..Config::default() };
            assert_eq!(Err(ConfigError::NoWorkers), config.validate());
        }

        it "describes the failure" {
            let err = ConfigError::DrawLimitTooLarge { limit: 30, size: 27, variant: Variant::Mini };
            assert_eq!("draw limit 30 exceeds the 27 cards of a mini deck", err.to_string());
        }
    }

    describe "command line" {
        it "falls back to defaults" {
            let matches = app().get_matches_from(vec!["setodds"]);
            assert_eq!(Ok(Config::default()), Config::from_matches(&matches));
        }

        it "reads every flag" {
            let matches = app().get_matches_from(vec![
                "setodds", "-t", "1000", "-l", "12", "-v", "mini", "-s", "42", "-w", "4", "-f", "json",
            ]);
            let config = Config::from_matches(&matches).unwrap();
            assert_eq!(1000, config.trials);
            assert_eq!(12, config.draw_limit);
            assert_eq!(Variant::Mini, config.variant);
            assert_eq!(Some(42), config.seed);
            assert_eq!(4, config.workers);
            assert_eq!(OutputFormat::Json, config.format);
        }

        it "reports unparseable numbers" {
            let matches = app().get_matches_from(vec!["setodds", "--trials", "lots"]);
            match Config::from_matches(&matches) {
                Err(ConfigError::Parse { flag, value, .. }) => {
                    assert_eq!("trials", flag);
                    assert_eq!("lots", value);
                }
                other => panic!("expected a parse error, got {:?}", other),
            }
        }
    }
}
