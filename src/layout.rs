// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::dataset::Dataset;

use std::convert::TryFrom;

/// Charts per row of the report.
pub const COLUMNS: usize = 2;

/// Fraction of the data span added above and below an automatic y-range.
const AUTO_MARGIN: f64 = 0.05;

/// A fixed two-column grid with as many rows as the entries need.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
    rows: usize,
    cols: usize,
    panels: usize,
}

impl GridLayout {
    pub fn new(panels: usize) -> Self {
        Self {
            rows: (panels + COLUMNS - 1) / COLUMNS,
            cols: COLUMNS,
            panels,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of populated cells. Cells past this index are removed.
    pub fn panels(&self) -> usize {
        self.panels
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Row and column of the `index`-th entry, filled left to right.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Indices of the entries placed in `row`.
    pub fn row_entries(&self, row: usize) -> std::ops::Range<usize> {
        let start = (row * self.cols).min(self.panels);
        let end = ((row + 1) * self.cols).min(self.panels);
        start..end
    }

    /// Size of the whole figure given the size of one cell, or `None` when
    /// it does not fit drawing coordinates.
    pub fn figure_size(&self, panel: (u32, u32)) -> Option<(u32, u32)> {
        let scale = |size: u32, count: usize| {
            u32::try_from(count)
                .ok()
                .and_then(|count| size.checked_mul(count))
                .filter(|total| *total <= i32::MAX as u32)
        };
        Some((scale(panel.0, self.cols)?, scale(panel.1, self.rows)?))
    }
}

/// Closed y-axis interval.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct YRange {
    pub min: f64,
    pub max: f64,
}

impl YRange {
    /// The range shared by all charts of a row: one unit of headroom on
    /// either side of the row's values. `None` when there are no values.
    pub fn shared<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = bounds(values)?;
        Some(Self {
            min: min - 1.0,
            max: max + 1.0,
        })
    }

    /// Range used when no shared range applies.
    pub fn auto<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = bounds(values)?;
        let span = max - min;
        if span == 0.0 {
            Some(Self {
                min: min - 1.0,
                max: max + 1.0,
            })
        } else {
            Some(Self {
                min: min - span * AUTO_MARGIN,
                max: max + span * AUTO_MARGIN,
            })
        }
    }

    pub fn as_range(&self) -> std::ops::Range<f64> {
        self.min..self.max
    }
}

fn bounds<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

/// Shared y-ranges for every row of `layout`, computed from the union of the
/// timings of the entries in that row.
pub fn row_ranges(dataset: &Dataset, layout: &GridLayout) -> Vec<Option<YRange>> {
    (0..layout.rows())
        .map(|row| {
            let range = YRange::shared(
                layout
                    .row_entries(row)
                    .filter_map(|i| dataset.get(i))
                    .flat_map(|entry| entry.avg_ns_per_query().iter().copied()),
            );
            if let Some(range) = range {
                trace!("row {}: shared y-range {} .. {}", row, range.min, range.max);
            }
            range
        })
        .collect()
}
