// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Loading of newline-delimited benchmark results.
//!
//! Every non-blank line of the input is one JSON object describing how a
//! single query performed across a range of sequence lengths:
//!
//! ```text
//! {"query":"elias_fano::access", "seed":13, "sequence_lengths":[1024,2048], "avg_ns_per_query":[12.1,14.9]}
//! ```
//!
//! Keys other than the ones below are ignored.

use crate::error::{Error, Invalid};

use serde_derive::*;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BenchmarkEntry {
    sequence_lengths: Vec<f64>,
    avg_ns_per_query: Vec<f64>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
}

impl BenchmarkEntry {
    pub fn new(sequence_lengths: Vec<f64>, avg_ns_per_query: Vec<f64>) -> Self {
        Self {
            sequence_lengths,
            avg_ns_per_query,
            query: None,
            seed: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn sequence_lengths(&self) -> &[f64] {
        &self.sequence_lengths
    }

    pub fn avg_ns_per_query(&self) -> &[f64] {
        &self.avg_ns_per_query
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The chart title for the entry at `index` (0-based) in the dataset.
    pub fn title(&self, index: usize) -> String {
        match &self.query {
            Some(query) => query.clone(),
            None => format!("Query {}", index + 1),
        }
    }

    /// Measurements as `(sequence length, ns/query)` in file order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.sequence_lengths
            .iter()
            .copied()
            .zip(self.avg_ns_per_query.iter().copied())
    }

    /// Checks the preconditions the renderer relies on.
    pub fn validate(&self) -> Result<(), Invalid> {
        if self.sequence_lengths.len() != self.avg_ns_per_query.len() {
            return Err(Invalid::LengthMismatch {
                lengths: self.sequence_lengths.len(),
                timings: self.avg_ns_per_query.len(),
            });
        }
        if self.sequence_lengths.is_empty() {
            return Err(Invalid::NoPoints);
        }
        if let Some(bad) = self
            .sequence_lengths
            .iter()
            .find(|x| !(x.is_finite() && **x > 0.0))
        {
            return Err(Invalid::NonPositiveLength(*bad));
        }
        if let Some(bad) = self.avg_ns_per_query.iter().find(|y| !y.is_finite()) {
            return Err(Invalid::NonFiniteValue(*bad));
        }
        Ok(())
    }
}

fn is_power_of_two(x: f64) -> bool {
    x.log2().fract() == 0.0
}

/// All entries of one input file, in file order.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    entries: Vec<BenchmarkEntry>,
}

impl Dataset {
    pub fn new(entries: Vec<BenchmarkEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Parses from any buffered reader. `path` is only used in errors.
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self, Error> {
        let mut entries = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let number = index + 1;
            let line = line.map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: BenchmarkEntry =
                serde_json::from_str(&line).map_err(|source| Error::Parse {
                    path: path.to_path_buf(),
                    line: number,
                    source,
                })?;
            entry.validate().map_err(|source| Error::Validation {
                path: path.to_path_buf(),
                line: number,
                source,
            })?;

            if let Some(x) = entry.sequence_lengths.iter().find(|x| !is_power_of_two(**x)) {
                warn!(
                    "{}:{}: sequence length {} is not a power of two",
                    path.display(),
                    number,
                    x
                );
            }
            debug!(
                "entry {}: query: {} seed: {} points: {}",
                entries.len(),
                entry.query().unwrap_or("-"),
                entry
                    .seed()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                entry.sequence_lengths.len(),
            );

            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BenchmarkEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&BenchmarkEntry> {
        self.entries.get(index)
    }
}

/// The report file for `input`: same directory, extension replaced by `.pdf`.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}
