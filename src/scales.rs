// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use serde_derive::*;

use std::ops::Range;

/// Fraction of the log span left free on both ends of the x-axis.
const LOG_MARGIN: f64 = 0.05;

/// How x-axis ticks are chosen for a chart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickStrategy {
    /// One tick at each measured sequence length.
    Exact,
    /// Every power of two between the smallest and largest length.
    Range,
}

impl Default for TickStrategy {
    fn default() -> Self {
        TickStrategy::Exact
    }
}

impl std::str::FromStr for TickStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(TickStrategy::Exact),
            "range" => Ok(TickStrategy::Range),
            _ => Err(format!("unknown tick strategy: {}", s)),
        }
    }
}

/// Tick positions for an axis showing `values`.
pub fn ticks(strategy: TickStrategy, values: &[f64]) -> Vec<f64> {
    match strategy {
        TickStrategy::Exact => {
            let mut ticks: Vec<f64> = Vec::with_capacity(values.len());
            for v in values {
                if !ticks.contains(v) {
                    ticks.push(*v);
                }
            }
            ticks
        }
        TickStrategy::Range => match exponent_bounds(values) {
            Some((lo, hi)) => {
                let lo = lo.floor() as i32;
                let hi = hi.ceil() as i32;
                (lo..=hi).map(|k| 2f64.powi(k)).collect()
            }
            None => Vec::new(),
        },
    }
}

fn exponent_bounds(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().map(|v| v.log2()).fold(None, |acc, e| match acc {
        None => Some((e, e)),
        Some((lo, hi)) => Some((e.min(lo), e.max(hi))),
    })
}

/// Exponent shown for a tick, truncated like an integer conversion of `log2`.
pub fn exponent(x: f64) -> i32 {
    x.log2().trunc() as i32
}

/// Tick label for `x` as "2" with a superscript exponent, in the `^{..}`
/// markup understood by the PDF backend.
pub fn power_of_two_label(x: f64) -> String {
    format!("2^{{{}}}", exponent(x))
}

/// Base-2 logarithmic coordinate whose key points are a fixed tick list.
#[derive(Clone, Debug)]
pub struct Log2Coord {
    lower: f64,
    upper: f64,
    ticks: Vec<f64>,
}

impl Log2Coord {
    /// Covers both `values` and `ticks`. All inputs must be positive.
    pub fn new(values: &[f64], ticks: Vec<f64>) -> Self {
        let all: Vec<f64> = values.iter().chain(ticks.iter()).copied().collect();
        let (lo, hi) = exponent_bounds(&all).unwrap_or((0.0, 1.0));

        let span = hi - lo;
        let margin = if span > 0.0 { span * LOG_MARGIN } else { 0.5 };

        Self {
            lower: lo - margin,
            upper: hi + margin,
            ticks,
        }
    }

    pub fn ticks(&self) -> &[f64] {
        &self.ticks
    }

    /// The axis extent as exponents of two.
    pub fn exponents(&self) -> Range<f64> {
        self.lower..self.upper
    }
}

impl Ranged for Log2Coord {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let actual_length = limit.1 - limit.0;
        if actual_length == 0 {
            return limit.1;
        }

        let logic_length = (value.log2() - self.lower) / (self.upper - self.lower);
        limit.0 + (actual_length as f64 * logic_length + 1e-3).floor() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.lower.exp2()..self.upper.exp2()
    }
}
