/// Turns a finished histogram into something a person can read.
use crate::card::Variant;
use crate::simulation::*;
use crate::testing;

use serde_json::{json, Map, Value};
use speculate::speculate;
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

/// Percentage of trials that found at least j Sets, for j = 1..=max.
pub fn at_least_percentages(histogram: &Histogram, dealt: usize, trials: u64) -> Vec<f64> {
    if trials == 0 {
        return vec![];
    }
    (1..=histogram.max_sets(dealt))
        .map(|j| histogram.at_least(dealt, j) as f64 / trials as f64 * 100.0)
        .collect()
}

/// Renders one block per deal size: the thresholds, then their percentages.
pub fn render_table(histogram: &Histogram, trials: u64) -> String {
    let mut out = String::new();
    for dealt in histogram.deal_sizes() {
        let percentages = at_least_percentages(histogram, dealt, trials);
        // Writing to a String cannot fail.
        let _ = writeln!(out, "with {} cards drawn,", dealt);
        for j in 1..=percentages.len() {
            let _ = write!(out, "{:9} ", j);
        }
        let _ = writeln!(out);
        for p in percentages.iter() {
            let _ = write!(out, " {:8.5} ", p);
        }
        let _ = writeln!(out);
        let _ = writeln!(out);
    }
    out
}

/// The raw histogram as JSON, keyed by deal size and then by Set count.
pub fn render_json(histogram: &Histogram, variant: Variant, trials: u64, draw_limit: usize) -> Value {
    let mut rows = Map::new();
    for dealt in histogram.deal_sizes() {
        let mut row = Map::new();
        for (sets, frequency) in histogram.row(dealt) {
            row.insert(sets.to_string(), json!(frequency));
        }
        rows.insert(dealt.to_string(), Value::Object(row));
    }
    json!({
        "variant": variant.to_string(),
        "trials": trials,
        "draw_limit": draw_limit,
        "histogram": Value::Object(rows),
    })
}

speculate! {
    before {
        testing::set_up();

        // Four trials dealt 3 cards: one Set twice, none twice.
        // Dealt 4: two Sets once, one Set once, none twice.
        let mut histogram = Histogram::new();
        histogram.record(3, 1);
        histogram.record(3, 1);
        histogram.record(3, 0);
        histogram.record(3, 0);
        histogram.record(4, 2);
        histogram.record(4, 1);
        histogram.record(4, 0);
        histogram.record(4, 0);
    }

    describe "percentages" {
        it "accumulates counts at or above each threshold" {
            let p = at_least_percentages(&histogram, 4, 4);
            assert_eq!(2, p.len());
            assert_relative_eq!(50.0, p[0]);
            assert_relative_eq!(25.0, p[1]);
        }

        it "is empty for unseen deal sizes" {
            assert!(at_least_percentages(&histogram, 9, 4).is_empty());
        }
    }

    describe "rendering" {
        it "lays out the table" {
            let expected = "with 3 cards drawn,\n        1 \n 50.00000 \n\n\
                            with 4 cards drawn,\n        1         2 \n 50.00000  25.00000 \n\n";
            assert_eq!(expected, render_table(&histogram, 4));
        }

        it "writes the histogram as json" {
            let value = render_json(&histogram, Variant::Full, 4, 4);
            assert_eq!(json!("full"), value["variant"]);
            assert_eq!(json!(4), value["trials"]);
            assert_eq!(json!(2), value["histogram"]["3"]["0"]);
            assert_eq!(json!(1), value["histogram"]["4"]["2"]);
        }

        it "parses output formats" {
            assert_eq!(Ok(OutputFormat::Json), "json".parse::<OutputFormat>());
            assert!("xml".parse::<OutputFormat>().is_err());
        }
    }
}
