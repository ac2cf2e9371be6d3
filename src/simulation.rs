/// Monte Carlo driver: shuffle, deal, count Sets, tally.
use crate::card::*;
use crate::config::*;
use crate::deck::*;
use crate::shuffle::*;
use crate::testing;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use speculate::speculate;
use std::collections::BTreeMap;

/// Smallest deal that can hold a Set.
pub const MIN_DEAL: usize = 3;

/// For each deal size, how many trials found exactly each number of Sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    table: BTreeMap<usize, BTreeMap<usize, u64>>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes one more trial that found `sets` Sets in `dealt` cards.
    pub fn record(&mut self, dealt: usize, sets: usize) {
        *self
            .table
            .entry(dealt)
            .or_insert_with(BTreeMap::new)
            .entry(sets)
            .or_insert(0) += 1;
    }

    /// Trials that found exactly `sets` Sets in `dealt` cards.
    pub fn frequency(&self, dealt: usize, sets: usize) -> u64 {
        self.table
            .get(&dealt)
            .and_then(|row| row.get(&sets))
            .cloned()
            .unwrap_or(0)
    }

    /// Trials that found at least `sets` Sets in `dealt` cards.
    pub fn at_least(&self, dealt: usize, sets: usize) -> u64 {
        self.table
            .get(&dealt)
            .map(|row| row.range(sets..).map(|(_, n)| n).sum::<u64>())
            .unwrap_or(0)
    }

    /// Trials recorded for a deal size.
    pub fn trials(&self, dealt: usize) -> u64 {
        self.at_least(dealt, 0)
    }

    /// Largest number of Sets any trial found in `dealt` cards.
    pub fn max_sets(&self, dealt: usize) -> usize {
        self.table
            .get(&dealt)
            .and_then(|row| row.keys().next_back().cloned())
            .unwrap_or(0)
    }

    pub fn deal_sizes(&self) -> Vec<usize> {
        self.table.keys().cloned().collect()
    }

    /// (Set count, frequency) pairs for one deal size, in increasing count.
    pub fn row(&self, dealt: usize) -> Vec<(usize, u64)> {
        self.table
            .get(&dealt)
            .map(|row| row.iter().map(|(&sets, &n)| (sets, n)).collect())
            .unwrap_or_else(Vec::new)
    }

    /// Sums another histogram into this one.
    pub fn merge(mut self, other: Histogram) -> Histogram {
        for (dealt, row) in other.table {
            let mine = self.table.entry(dealt).or_insert_with(BTreeMap::new);
            for (sets, n) in row {
                *mine.entry(sets).or_insert(0) += n;
            }
        }
        self
    }
}

/// Runs trials for a validated configuration.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Config,
}

impl Simulation {
    /// The configuration must already have passed `Config::validate`; a draw
    /// limit larger than the deck only deals as many cards as there are.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// One trial: build a fresh deck, shuffle it once, then count the Sets
    /// in every prefix from three cards up to the draw limit.
    pub fn trial<R: BoundedRandom + ?Sized>(&self, rng: &mut R, histogram: &mut Histogram) {
        let mut deck = Deck::new(self.config.variant);
        deck.shuffle(rng);
        trace!("Dealing from {}", deck);
        let limit = self.config.draw_limit.min(deck.size());
        for dealt in MIN_DEAL..=limit {
            histogram.record(dealt, deck.count_sets(dealt));
        }
    }

    /// Runs `trials` trials one after another against a single random source.
    pub fn run_trials<R: BoundedRandom + ?Sized>(&self, trials: u64, rng: &mut R) -> Histogram {
        let mut histogram = Histogram::new();
        let report_every = (trials / 10).max(1);
        for i in 0..trials {
            if i > 0 && i % report_every == 0 {
                debug!("{} / {} trials", i, trials);
            }
            self.trial(rng, &mut histogram);
        }
        histogram
    }

    /// Runs every configured trial sequentially.
    pub fn run<R: BoundedRandom + ?Sized>(&self, rng: &mut R) -> Histogram {
        info!(
            "Dealing {} {} decks up to {} cards",
            self.config.trials, self.config.variant, self.config.draw_limit
        );
        self.run_trials(self.config.trials, rng)
    }

    /// Splits the trials across the configured workers, each with its own
    /// generator seeded from `seed`, and sums their histograms.
    ///
    /// The result depends only on the seed and the worker count.
    pub fn run_parallel(&self, seed: u64) -> Histogram {
        let workers = self.config.workers.max(1);
        if workers == 1 {
            return self.run(&mut StdRng::seed_from_u64(seed));
        }

        info!(
            "Dealing {} {} decks up to {} cards across {} workers",
            self.config.trials, self.config.variant, self.config.draw_limit, workers
        );
        worker_shares(self.config.trials, workers)
            .into_par_iter()
            .enumerate()
            .map(|(worker, trials)| {
                let mut rng = StdRng::seed_from_u64(worker_seed(seed, worker));
                let histogram = self.run_trials(trials, &mut rng);
                debug!("Worker {} finished {} trials", worker, trials);
                histogram
            })
            .reduce(Histogram::new, Histogram::merge)
    }
}

/// Splits trials as evenly as possible, earlier workers taking the remainder.
fn worker_shares(trials: u64, workers: usize) -> Vec<u64> {
    let workers = workers as u64;
    (0..workers)
        .map(|w| trials / workers + if w < trials % workers { 1 } else { 0 })
        .collect()
}

fn worker_seed(seed: u64, worker: usize) -> u64 {
    seed.wrapping_add((worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

speculate! {
    before {
        testing::set_up();
    }

    describe "histogram" {
        it "counts trials per deal size and set count" {
            let mut histogram = Histogram::new();
            histogram.record(3, 0);
            histogram.record(3, 1);
            histogram.record(3, 0);
            assert_eq!(2, histogram.frequency(3, 0));
            assert_eq!(1, histogram.frequency(3, 1));
            assert_eq!(0, histogram.frequency(4, 0));
            assert_eq!(3, histogram.trials(3));
            assert_eq!(1, histogram.max_sets(3));
            assert_eq!(vec![3], histogram.deal_sizes());
        }

        it "merges by summation in any order" {
            let mut a = Histogram::new();
            a.record(3, 0);
            a.record(4, 2);
            let mut b = Histogram::new();
            b.record(3, 0);
            b.record(3, 1);
            let ab = a.clone().merge(b.clone());
            assert_eq!(ab, b.merge(a));
            assert_eq!(
                btreemap! { 3 => btreemap! { 0 => 2, 1 => 1 }, 4 => btreemap! { 2 => 1 } },
                ab.table
            );
        }
    }

    describe "trials" {
        it "finds the canonical set when nothing moves" {
            // Drawing the last position every time leaves the deck unshuffled.
            let config = Config { trials: 1, draw_limit: 3, ..Config::default() };
            let mut draws = ScriptedDraws::new((2..=81).rev().map(|n| n - 1).collect());
            let histogram = Simulation::new(config).run(&mut draws);
            assert_eq!(1, histogram.frequency(3, 1));
            assert_eq!(80, draws.taken());
        }

        it "records every deal size for every trial" {
            let config = Config { trials: 50, draw_limit: 9, variant: Variant::Mini, ..Config::default() };
            let histogram = Simulation::new(config).run(&mut StdRng::seed_from_u64(7));
            assert_eq!((3..=9).collect::<Vec<usize>>(), histogram.deal_sizes());
            for dealt in 3..=9 {
                assert_eq!(50, histogram.trials(dealt));
            }
        }

        it "deals nothing below three cards" {
            let config = Config { trials: 5, draw_limit: 2, ..Config::default() };
            let histogram = Simulation::new(config).run(&mut StdRng::seed_from_u64(1));
            assert!(histogram.deal_sizes().is_empty());
        }

        it "never loses a threshold as it rises" {
            let config = Config { trials: 200, draw_limit: 12, ..Config::default() };
            let histogram = Simulation::new(config).run(&mut StdRng::seed_from_u64(11));
            for dealt in histogram.deal_sizes() {
                for j in 0..=histogram.max_sets(dealt) {
                    assert!(histogram.at_least(dealt, j + 1) <= histogram.at_least(dealt, j));
                }
            }
        }

        it "always finds a set in ten mini cards" {
            // Nine mini-Set cards can avoid every Set, ten cannot.
            let config = Config { trials: 100, draw_limit: 10, variant: Variant::Mini, ..Config::default() };
            let histogram = Simulation::new(config).run(&mut StdRng::seed_from_u64(5));
            assert_eq!(100, histogram.at_least(10, 1));
        }

        it "matches the exact odds of a set in three full cards" {
            // Any two cards fix the third: 1 in 79.
            let config = Config { trials: 100_000, draw_limit: 3, ..Config::default() };
            let histogram = Simulation::new(config).run(&mut StdRng::seed_from_u64(23));
            let p = histogram.at_least(3, 1) as f64 / 100_000.0;
            assert_abs_diff_eq!(1.0 / 79.0, p, epsilon = 0.002);
        }
    }

    describe "parallel runs" {
        it "splits trials evenly" {
            assert_eq!(vec![4, 3, 3], worker_shares(10, 3));
            assert_eq!(vec![1, 1, 0, 0], worker_shares(2, 4));
        }

        it "runs every trial and is reproducible" {
            let config = Config { trials: 101, draw_limit: 8, workers: 4, ..Config::default() };
            let simulation = Simulation::new(config);
            let a = simulation.run_parallel(99);
            let b = simulation.run_parallel(99);
            assert_eq!(a, b);
            assert_eq!(101, a.trials(8));
        }

        it "matches a sequential run with one worker" {
            let config = Config { trials: 20, draw_limit: 6, ..Config::default() };
            let simulation = Simulation::new(config);
            assert_eq!(
                simulation.run(&mut StdRng::seed_from_u64(8)),
                simulation.run_parallel(8)
            );
        }
    }
}
