// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use plotters::drawing::DrawingAreaErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a report from being produced.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}:{line}: malformed benchmark entry: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error("{}:{line}: invalid benchmark entry: {source}", path.display())]
    Validation {
        path: PathBuf,
        line: usize,
        source: Invalid,
    },
    #[error("{}: no benchmark entries found", path.display())]
    EmptyDataset { path: PathBuf },
    #[error("{}: refusing to overwrite the input with the rendered report", path.display())]
    OutputCollision { path: PathBuf },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("rendering failed: {0}")]
    Render(String),
}

/// Shape problems in a single benchmark entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Invalid {
    #[error("{lengths} sequence lengths but {timings} timings")]
    LengthMismatch { lengths: usize, timings: usize },
    #[error("entry has no measurements")]
    NoPoints,
    #[error("sequence length {0} cannot be drawn on a log scale")]
    NonPositiveLength(f64),
    #[error("timing {0} is not a finite number")]
    NonFiniteValue(f64),
}

impl<E> From<DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Render(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
