// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Renders newline-delimited query benchmark results as a two-column grid
//! of line charts with a base-2 logarithmic x-axis, saved as a PDF next to
//! the input file.

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod config;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod logger;
pub mod pdf;
pub mod render;
pub mod scales;

pub use crate::config::{Config, Render};
pub use crate::dataset::{output_path, BenchmarkEntry, Dataset};
pub use crate::error::{Error, Invalid};
pub use crate::layout::{GridLayout, YRange};
pub use crate::logger::Logger;
pub use crate::pdf::PdfBackend;
pub use crate::scales::TickStrategy;

use plotters::prelude::*;

use std::path::{Path, PathBuf};

/// Loads `input`, renders one chart per entry and writes the report.
/// Returns the path of the written PDF.
pub fn run(input: &Path, settings: &Render) -> Result<PathBuf, Error> {
    let dataset = Dataset::load(input)?;
    if dataset.is_empty() {
        return Err(Error::EmptyDataset {
            path: input.to_path_buf(),
        });
    }

    let output = output_path(input);
    if output.as_path() == input {
        return Err(Error::OutputCollision { path: output });
    }

    let layout = GridLayout::new(dataset.len());
    let panels = render::plan(&dataset, &layout, settings);
    info!(
        "rendering {} charts in {}x{} grid to {}",
        panels.len(),
        layout.rows(),
        layout.cols(),
        output.display()
    );

    let (width, height) = settings.panel_size();
    let size = layout.figure_size((width, height)).ok_or_else(|| {
        Error::Render(format!(
            "{} rows of {}x{} pt charts exceed the drawable area",
            layout.rows(),
            width,
            height
        ))
    })?;

    let root = PdfBackend::new(&output, size).into_drawing_area();
    root.fill(&WHITE)?;
    render::draw(&root, &layout, &panels, settings)?;
    root.present()?;

    Ok(output)
}
