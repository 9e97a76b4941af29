// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::Render;
use crate::dataset::Dataset;
use crate::error::Error;
use crate::layout::{row_ranges, GridLayout, YRange};
use crate::pdf::text;
use crate::scales::{power_of_two_label, ticks, Log2Coord};

use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

const FONT: &str = "sans-serif";
const CAPTION_SIZE: u32 = 14;
const LABEL_SIZE: u32 = 10;
const DESC_SIZE: u32 = 11;

const MARGIN: u32 = 8;
const X_LABEL_AREA: u32 = 36;
// room for the tick marks and the rotated axis description
const Y_LABEL_PADDING: u32 = 12 + 2 * DESC_SIZE;
const Y_LABELS: usize = 8;

const X_DESC: &str = "sequence length";
const Y_DESC: &str = "avg. ns/query";

const GRID_COLOUR: RGBColor = RGBColor(0xB0, 0xB0, 0xB0);
const DASH: i32 = 3;
const GAP: i32 = 2;

/// Everything needed to draw one chart of the report.
#[derive(Clone, Debug)]
pub struct Panel {
    pub index: usize,
    pub title: String,
    pub points: Vec<(f64, f64)>,
    pub x: Log2Coord,
    pub y: YRange,
}

impl Panel {
    pub fn ticks(&self) -> &[f64] {
        self.x.ticks()
    }

    pub fn tick_labels(&self) -> Vec<String> {
        self.ticks().iter().map(|x| power_of_two_label(*x)).collect()
    }

    /// Values with a y-axis label and horizontal grid line.
    pub fn y_key_points(&self) -> Vec<f64> {
        let coord: RangedCoordf64 = self.y.as_range().into();
        coord.key_points(Y_LABELS)
    }

    /// Decimals needed to keep neighbouring y labels apart.
    pub fn y_decimals(&self) -> usize {
        let points = self.y_key_points();
        let step = points
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(f64::INFINITY, f64::min);
        if step.is_finite() {
            decimals(step)
        } else {
            decimals(self.y.max - self.y.min)
        }
    }

    pub fn y_tick_labels(&self) -> Vec<String> {
        let decimals = self.y_decimals();
        self.y_key_points()
            .iter()
            .map(|y| format_value(*y, decimals))
            .collect()
    }

    /// Width of the y label area: the widest tick label plus room for the
    /// axis description, so neighbouring charts never overlap.
    pub fn y_label_area(&self) -> u32 {
        let widest = self
            .y_tick_labels()
            .iter()
            .map(|label| text::width(label, LABEL_SIZE as f64))
            .fold(0.0, f64::max);
        widest.ceil() as u32 + Y_LABEL_PADDING
    }
}

/// Lays out one panel per entry. Shared row ranges are applied when enabled,
/// otherwise each chart scales to its own data.
pub fn plan(dataset: &Dataset, layout: &GridLayout, settings: &Render) -> Vec<Panel> {
    let shared = if settings.shared_y() {
        row_ranges(dataset, layout)
    } else {
        Vec::new()
    };

    dataset
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let (row, _) = layout.cell(index);
            let ticks = ticks(settings.ticks(), entry.sequence_lengths());
            let x = Log2Coord::new(entry.sequence_lengths(), ticks);
            let y = shared
                .get(row)
                .copied()
                .flatten()
                .or_else(|| YRange::auto(entry.avg_ns_per_query().iter().copied()))
                .unwrap_or(YRange {
                    min: -1.0,
                    max: 1.0,
                });

            Panel {
                index,
                title: entry.title(index),
                points: entry.points().collect(),
                x,
                y,
            }
        })
        .collect()
}

/// Draws `panels` into the grid cells of `root`. Cells past the last panel
/// are never drawn, so the figure has no empty charts.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &GridLayout,
    panels: &[Panel],
    settings: &Render,
) -> Result<(), Error> {
    if panels.is_empty() {
        return Ok(());
    }

    let cells = root.split_evenly((layout.rows(), layout.cols()));
    for (panel, area) in panels.iter().zip(cells.iter()) {
        trace!(
            "panel {}: '{}' ticks: {} y: {} .. {}",
            panel.index,
            panel.title,
            panel.ticks().len(),
            panel.y.min,
            panel.y.max
        );
        draw_panel(root, area, panel, settings)?;
    }

    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    settings: &Render,
) -> Result<(), Error> {
    let decimals = panel.y_decimals();
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, (FONT, CAPTION_SIZE))
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(panel.y_label_area())
        .build_cartesian_2d(panel.x.clone(), panel.y.as_range())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(panel.ticks().len())
        .y_labels(Y_LABELS)
        .x_label_formatter(&|x| power_of_two_label(*x))
        .y_label_formatter(&|y| format_value(*y, decimals))
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .label_style((FONT, LABEL_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    // dashed grid on every tick, underneath the series
    let (columns, rows) = chart.plotting_area().get_pixel_range();
    let grid = GRID_COLOUR.stroke_width(1);
    let x_start = panel.x.range().start;

    for x in panel.ticks() {
        let (px, _) = chart.backend_coord(&(*x, panel.y.min));
        for (a, b) in dashes(rows.start, rows.end) {
            root.draw(&PathElement::new(vec![(px, a), (px, b)], grid))?;
        }
    }
    for y in panel.y_key_points() {
        let (_, py) = chart.backend_coord(&(x_start, y));
        for (a, b) in dashes(columns.start, columns.end) {
            root.draw(&PathElement::new(vec![(a, py), (b, py)], grid))?;
        }
    }

    chart.draw_series(
        LineSeries::new(panel.points.iter().copied(), BLUE.stroke_width(1))
            .point_size(settings.marker_size()),
    )?;

    Ok(())
}

/// Splits the pixel span `from..to` into dash segments.
fn dashes(from: i32, to: i32) -> Vec<(i32, i32)> {
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    let mut segments = Vec::new();
    let mut start = lo;
    while start < hi {
        let end = (start + DASH).min(hi);
        segments.push((start, end));
        start = end + GAP;
    }
    segments
}

/// Fractional digits that tell apart values `step` apart.
pub fn decimals(step: f64) -> usize {
    if step.is_finite() && step > 0.0 {
        (-step.log10()).ceil().max(0.0) as usize
    } else {
        0
    }
}

/// Axis label for a timing value rounded to `decimals` places, with
/// trailing zeros removed.
pub fn format_value(value: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, value + 0.0);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::BenchmarkEntry;
    use crate::scales::TickStrategy;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            BenchmarkEntry::new(vec![1.0, 2.0, 4.0, 8.0], vec![10.0, 20.0, 15.0, 30.0])
                .with_query("Q1"),
            BenchmarkEntry::new(vec![4.0, 64.0], vec![5.0, 50.0]),
            BenchmarkEntry::new(vec![2.0, 8.0], vec![100.0, 90.0]),
        ])
    }

    #[test]
    fn one_panel_per_entry() {
        let dataset = dataset();
        let layout = GridLayout::new(dataset.len());
        let panels = plan(&dataset, &layout, &Render::default());
        assert_eq!(panels.len(), 3);
        assert_eq!(layout.cells(), 4);
        let titles: Vec<&str> = panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Q1", "Query 2", "Query 3"]);
    }

    #[test]
    fn single_entry() {
        let dataset = Dataset::new(vec![BenchmarkEntry::new(
            vec![1.0, 2.0, 4.0, 8.0],
            vec![10.0, 20.0, 15.0, 30.0],
        )
        .with_query("Q1")]);
        let layout = GridLayout::new(dataset.len());
        let panels = plan(&dataset, &layout, &Render::default());

        assert_eq!((layout.rows(), layout.cols()), (1, 2));
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].title, "Q1");
        assert_eq!(panels[0].ticks(), &[1.0, 2.0, 4.0, 8.0]);
        assert_eq!(
            panels[0].tick_labels(),
            vec!["2^{0}", "2^{1}", "2^{2}", "2^{3}"]
        );
        assert_eq!(
            panels[0].y,
            YRange {
                min: 9.0,
                max: 31.0
            }
        );
    }

    #[test]
    fn shared_rows() {
        let dataset = dataset();
        let layout = GridLayout::new(dataset.len());
        let panels = plan(&dataset, &layout, &Render::default());
        assert_eq!(panels[0].y, panels[1].y);
        assert_eq!(
            panels[0].y,
            YRange {
                min: 4.0,
                max: 51.0
            }
        );
        assert_eq!(
            panels[2].y,
            YRange {
                min: 89.0,
                max: 101.0
            }
        );
    }

    #[test]
    fn independent_rows() {
        let dataset = dataset();
        let layout = GridLayout::new(dataset.len());
        let mut settings = Render::default();
        settings.set_shared_y(false);
        let panels = plan(&dataset, &layout, &settings);
        assert_ne!(panels[0].y, panels[1].y);
        assert_eq!(panels[1].y, YRange::auto(vec![5.0, 50.0]).unwrap());
    }

    #[test]
    fn range_ticks() {
        let dataset = dataset();
        let layout = GridLayout::new(dataset.len());
        let mut settings = Render::default();
        settings.set_ticks(TickStrategy::Range);
        let panels = plan(&dataset, &layout, &settings);
        assert_eq!(panels[1].ticks(), &[4.0, 8.0, 16.0, 32.0, 64.0]);
    }

    #[test]
    fn points_keep_file_order() {
        let dataset = Dataset::new(vec![BenchmarkEntry::new(
            vec![8.0, 2.0, 4.0],
            vec![3.0, 1.0, 2.0],
        )]);
        let layout = GridLayout::new(1);
        let panels = plan(&dataset, &layout, &Render::default());
        assert_eq!(panels[0].points, vec![(8.0, 3.0), (2.0, 1.0), (4.0, 2.0)]);
    }

    #[test]
    fn dash_segments() {
        assert_eq!(dashes(0, 10), vec![(0, 3), (5, 8)]);
        assert_eq!(dashes(0, 12), vec![(0, 3), (5, 8), (10, 12)]);
        assert_eq!(dashes(10, 0), dashes(0, 10));
        assert!(dashes(5, 5).is_empty());
    }

    #[test]
    fn value_labels() {
        assert_eq!(format_value(10.0, 0), "10");
        assert_eq!(format_value(12.5, 1), "12.5");
        assert_eq!(format_value(12.5, 3), "12.5");
        assert_eq!(format_value(0.126, 2), "0.13");
        assert_eq!(format_value(7.5000001, 2), "7.5");
        assert_eq!(format_value(-0.0, 2), "0");
        assert_eq!(format_value(-0.001, 1), "0");
        assert_eq!(format_value(-2.0, 0), "-2");
        assert_eq!(format_value(20.0015, 5), "20.0015");
    }

    #[test]
    fn decimals_follow_step() {
        assert_eq!(decimals(10.0), 0);
        assert_eq!(decimals(1.0), 0);
        assert_eq!(decimals(0.5), 1);
        assert_eq!(decimals(0.2), 1);
        assert_eq!(decimals(0.05), 2);
        assert_eq!(decimals(0.0005), 4);
        assert_eq!(decimals(0.0), 0);
    }

    #[test]
    fn narrow_range_labels_are_distinct() {
        let dataset = Dataset::new(vec![BenchmarkEntry::new(
            vec![1024.0, 2048.0, 4096.0],
            vec![20.001, 20.002, 20.004],
        )]);
        let mut settings = Render::default();
        settings.set_shared_y(false);
        let panel = plan(&dataset, &GridLayout::new(1), &settings).remove(0);

        let labels = panel.y_tick_labels();
        assert!(labels.len() > 1);
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), labels.len(), "{:?}", labels);
    }

    #[test]
    fn wide_range_labels_are_integers() {
        let panel = plan(&dataset(), &GridLayout::new(3), &Render::default()).remove(0);
        assert_eq!(panel.y_decimals(), 0);
        assert!(panel.y_tick_labels().iter().all(|l| !l.contains('.')));
    }

    #[test]
    fn label_area_grows_with_labels() {
        let mut panel = plan(&dataset(), &GridLayout::new(3), &Render::default()).remove(0);
        let narrow = panel.y_label_area();
        panel.y = YRange {
            min: 100000.0,
            max: 900000.0,
        };
        assert!(panel.y_label_area() > narrow);
    }
}
