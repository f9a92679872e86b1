//! Chart model behind both the on-screen plot and the PNG export.
//!
//! Records are folded into one line series per thread count. A model is
//! repopulated wholesale for every run; nothing carries over between runs.

pub mod export;

use std::collections::HashMap;
use std::fmt::Display;

use tracing::{debug, info};

use crate::benchmark_utils::{parse_benchmark_records, BenchmarkRecord};
use crate::error::ChartError;

pub const DEFAULT_TITLE: &str = "Algorithm Performance";
pub const X_AXIS_LABEL: &str = "Data Size";
pub const Y_AXIS_LABEL: &str = "Duration (ms)";
pub const DEFAULT_EXPORT_BASE: &str = "chart";

/// Fraction of the visible range removed (or added) per scroll notch.
pub const ZOOM_FACTOR: f64 = 0.1;

/// One chart line: every (data size, duration) point measured with the same
/// thread count, in the order the records arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub threads: u32,
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

impl ChartSeries {
    pub fn new(threads: u32) -> Self {
        Self {
            threads,
            name: format!("Threads: {}", threads),
            points: Vec::new(),
        }
    }
}

/// Thread-count and data-size extremes of one batch of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRange {
    pub min_threads: u32,
    pub max_threads: u32,
    pub min_data_size: u64,
    pub max_data_size: u64,
}

impl Default for RunRange {
    fn default() -> Self {
        Self {
            min_threads: 1,
            max_threads: 1,
            min_data_size: 1,
            max_data_size: 1,
        }
    }
}

impl RunRange {
    /// Computed from this batch only. An empty batch gives the default range.
    pub fn from_records(records: &[BenchmarkRecord]) -> Self {
        let Some(first) = records.first() else {
            return Self::default();
        };

        let seed = Self {
            min_threads: first.threads,
            max_threads: first.threads,
            min_data_size: first.data_size,
            max_data_size: first.data_size,
        };
        records.iter().fold(seed, |range, r| Self {
            min_threads: range.min_threads.min(r.threads),
            max_threads: range.max_threads.max(r.threads),
            min_data_size: range.min_data_size.min(r.data_size),
            max_data_size: range.max_data_size.max(r.data_size),
        })
    }
}

/// Everything one population pass produces, computed off the UI thread and
/// applied to a [`ChartModel`] in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub algorithm: Option<String>,
    pub series: Vec<ChartSeries>,
    pub range: RunRange,
    pub iterative: bool,
    pub skipped: usize,
}

impl ChartData {
    pub fn from_json(json: &str, test_size: impl Display, iterative: bool) -> Result<Self, ChartError> {
        let batch = parse_benchmark_records(json)?;
        let mut data = Self::from_records(&batch.records, test_size, iterative);
        data.skipped = batch.skipped;
        Ok(data)
    }

    pub fn from_records(records: &[BenchmarkRecord], test_size: impl Display, iterative: bool) -> Self {
        let mut series: Vec<ChartSeries> = Vec::new();
        let mut index_by_threads: HashMap<u32, usize> = HashMap::new();

        for record in records {
            let index = *index_by_threads.entry(record.threads).or_insert_with(|| {
                series.push(ChartSeries::new(record.threads));
                series.len() - 1
            });
            series[index].points.push([record.data_size as f64, record.duration()]);
        }

        // The last record names the chart
        let algorithm = records.last().map(|r| r.algorithm.clone());
        let title = match &algorithm {
            Some(name) => format!("Algorithm {} Performance - Test Size: {}", name, test_size),
            None => DEFAULT_TITLE.to_string(),
        };

        debug!(records = records.len(), series = series.len(), "aggregated benchmark records");
        Self {
            title,
            algorithm,
            series,
            range: RunRange::from_records(records),
            iterative,
            skipped: 0,
        }
    }
}

/// Lower and upper bound of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Positive deltas zoom in, negative deltas zoom out, both by
    /// [`ZOOM_FACTOR`] of the current span on each side.
    pub fn zoomed(self, scroll_delta: f64) -> Self {
        let step = ZOOM_FACTOR * (self.max - self.min);
        if scroll_delta > 0.0 {
            Self::new(self.min + step, self.max - step)
        } else if scroll_delta < 0.0 {
            Self::new(self.min - step, self.max + step)
        } else {
            self
        }
    }

    fn padded(self) -> Self {
        if self.max > self.min {
            return self;
        }
        let pad = if self.min == 0.0 { 1.0 } else { self.min.abs() * 0.5 };
        Self::new(self.min - pad, self.max + pad)
    }
}

/// The visible window of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x: AxisBounds,
    pub y: AxisBounds,
}

impl ViewBounds {
    pub fn zoomed(self, scroll_delta: f64) -> Self {
        Self {
            x: self.x.zoomed(scroll_delta),
            y: self.y.zoomed(scroll_delta),
        }
    }
}

/// Chart state owned by whoever renders it (the UI thread, or a headless
/// exporter).
#[derive(Debug, Clone)]
pub struct ChartModel {
    title: String,
    series: Vec<ChartSeries>,
    range: RunRange,
    algorithm: Option<String>,
    iterative: bool,
    export_enabled: bool,
    generation: u64,
}

impl Default for ChartModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartModel {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            series: Vec::new(),
            range: RunRange::default(),
            algorithm: None,
            iterative: false,
            export_enabled: false,
            generation: 0,
        }
    }

    pub fn clear(&mut self) {
        self.series.clear();
        self.generation += 1;
    }

    pub fn add_series(&mut self, series: ChartSeries) {
        self.series.push(series);
        self.generation += 1;
    }

    /// Parses `json` and replaces the chart contents with it. On error the
    /// model is left exactly as it was.
    pub fn populate(&mut self, json: &str, test_size: impl Display, iterative: bool) -> Result<(), ChartError> {
        let data = ChartData::from_json(json, test_size, iterative)?;
        self.apply(data);
        Ok(())
    }

    /// Replaces all series with `data` and enables export.
    pub fn apply(&mut self, data: ChartData) {
        self.clear();
        for series in data.series {
            self.add_series(series);
        }
        self.title = data.title;
        self.range = data.range;
        self.algorithm = data.algorithm;
        self.iterative = data.iterative;
        self.export_enabled = true;
        info!(title = %self.title, series = self.series.len(), skipped = data.skipped, "chart populated");
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    pub fn range(&self) -> RunRange {
        self.range
    }

    pub fn export_enabled(&self) -> bool {
        self.export_enabled
    }

    /// Bumped on every content change so views know to re-fit their bounds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn export_base_name(&self) -> &str {
        self.algorithm.as_deref().unwrap_or(DEFAULT_EXPORT_BASE)
    }

    pub fn export_file_name(&self) -> String {
        export_file_name(self.export_base_name(), self.range, self.iterative)
    }

    /// Smallest window containing every point, or `None` for an empty chart.
    pub fn data_bounds(&self) -> Option<ViewBounds> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let seed = ViewBounds {
            x: AxisBounds::new(first[0], first[0]),
            y: AxisBounds::new(first[1], first[1]),
        };
        let bounds = points.fold(seed, |b, p| ViewBounds {
            x: AxisBounds::new(b.x.min.min(p[0]), b.x.max.max(p[0])),
            y: AxisBounds::new(b.y.min.min(p[1]), b.y.max.max(p[1])),
        });
        Some(ViewBounds {
            x: bounds.x.padded(),
            y: bounds.y.padded(),
        })
    }
}

pub fn export_file_name(base: &str, range: RunRange, iterative: bool) -> String {
    format!(
        "chart-{} threads_{}_{} data_size_{}_{}{}.png",
        base,
        range.min_threads,
        range.max_threads,
        range.min_data_size,
        range.max_data_size,
        if iterative { "_iterative" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RUN: &str = r#"[
        {"algorithm": "quick_sort", "threads": 1, "data_size": 32, "result": {"duration": 4.0}},
        {"algorithm": "quick_sort", "threads": 2, "data_size": 32, "result": {"duration": 3.0}},
        {"algorithm": "quick_sort", "threads": 1, "data_size": 64, "result": {"duration": 8.0}},
        {"algorithm": "quick_sort", "threads": 2, "data_size": 64, "result": {"duration": 5.0}},
        {"algorithm": "quick_sort", "threads": 4, "data_size": 128, "result": {"duration": 6.5}}
    ]"#;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_one_series_per_thread_count() {
        let mut chart = ChartModel::new();
        chart.populate(RUN, 3, false).unwrap();

        let names: Vec<_> = chart.series().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Threads: 1", "Threads: 2", "Threads: 4"]);
        assert_eq!(chart.series()[0].points, vec![[32.0, 4.0], [64.0, 8.0]]);
        assert_eq!(chart.series()[1].points, vec![[32.0, 3.0], [64.0, 5.0]]);
        assert_eq!(chart.series()[2].points, vec![[128.0, 6.5]]);
        assert_eq!(chart.title(), "Algorithm quick_sort Performance - Test Size: 3");
        assert!(chart.export_enabled());
    }

    #[test]
    fn test_range_is_computed_per_batch() {
        let mut chart = ChartModel::new();
        chart.populate(RUN, 1, false).unwrap();
        assert_eq!(
            chart.range(),
            RunRange { min_threads: 1, max_threads: 4, min_data_size: 32, max_data_size: 128 }
        );

        let second = r#"[{"algorithm": "heap_sort", "threads": 8, "data_size": 1024, "result": {"duration": 1.0}}]"#;
        chart.populate(second, 1, true).unwrap();
        assert_eq!(
            chart.range(),
            RunRange { min_threads: 8, max_threads: 8, min_data_size: 1024, max_data_size: 1024 }
        );
        assert_eq!(chart.series().len(), 1);
        assert_eq!(chart.export_file_name(), "chart-heap_sort threads_8_8 data_size_1024_1024_iterative.png");
    }

    #[test]
    fn test_empty_array_clears_and_enables_export() {
        let mut chart = ChartModel::new();
        chart.populate(RUN, 1, false).unwrap();
        chart.populate("[]", 1, false).unwrap();
        assert!(chart.series().is_empty());
        assert!(chart.export_enabled());
        assert_eq!(chart.range(), RunRange::default());
        assert!(chart.data_bounds().is_none());
        // Name and range both come from the empty batch
        assert_eq!(chart.export_file_name(), "chart-chart threads_1_1 data_size_1_1.png");
    }

    #[test]
    fn test_partial_records_do_not_block_the_rest() {
        let json = r#"[
            {"algorithm": "quick_sort", "threads": 1, "result": {"duration": 4.0}},
            {"algorithm": "quick_sort", "threads": 2, "data_size": 32, "result": {"duration": 3.0}}
        ]"#;
        let data = ChartData::from_json(json, 1, false).unwrap();
        assert_eq!(data.skipped, 1);
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].name, "Threads: 2");
    }

    #[test]
    fn test_failed_populate_leaves_chart_untouched() {
        let mut chart = ChartModel::new();
        chart.populate(RUN, 1, false).unwrap();
        let before = chart.series().to_vec();
        let title = chart.title().to_string();

        assert!(matches!(chart.populate(r#"{"a":1}"#, 1, false), Err(ChartError::NotAnArray)));
        assert!(matches!(chart.populate("[{", 1, false), Err(ChartError::Malformed(_))));
        assert_eq!(chart.series(), before.as_slice());
        assert_eq!(chart.title(), title);
    }

    #[test]
    fn test_fresh_chart_defaults() {
        let chart = ChartModel::new();
        assert_eq!(chart.title(), DEFAULT_TITLE);
        assert!(!chart.export_enabled());
        assert_eq!(chart.export_file_name(), "chart-chart threads_1_1 data_size_1_1.png");
    }

    #[test]
    fn test_clear_and_add_series() {
        let mut chart = ChartModel::new();
        let mut series = ChartSeries::new(16);
        series.points.push([1.0, 2.0]);
        chart.add_series(series.clone());
        chart.add_series(ChartSeries::new(32));
        assert_eq!(chart.series().len(), 2);
        assert_eq!(chart.series()[0], series);

        let generation = chart.generation();
        chart.clear();
        assert!(chart.series().is_empty());
        assert!(chart.generation() > generation);
    }

    #[test]
    fn test_zoom_in_and_out() {
        let bounds = AxisBounds::new(0.0, 100.0);

        let zoomed_in = bounds.zoomed(1.0);
        assert!(close(zoomed_in.min, 10.0) && close(zoomed_in.max, 90.0), "{:?}", zoomed_in);

        let zoomed_out = bounds.zoomed(-1.0);
        assert!(close(zoomed_out.min, -10.0) && close(zoomed_out.max, 110.0), "{:?}", zoomed_out);

        assert_eq!(bounds.zoomed(0.0), bounds);
    }

    #[test]
    fn test_view_zoom_applies_to_both_axes() {
        let view = ViewBounds { x: AxisBounds::new(0.0, 100.0), y: AxisBounds::new(0.0, 10.0) };
        let zoomed = view.zoomed(120.0);
        assert!(close(zoomed.x.min, 10.0) && close(zoomed.x.max, 90.0));
        assert!(close(zoomed.y.min, 1.0) && close(zoomed.y.max, 9.0));
    }

    #[test]
    fn test_data_bounds_pad_single_points() {
        let mut chart = ChartModel::new();
        chart
            .populate(r#"[{"algorithm": "a", "threads": 1, "data_size": 8, "result": {"duration": 0.0}}]"#, 1, false)
            .unwrap();
        let bounds = chart.data_bounds().unwrap();
        assert_eq!(bounds.x, AxisBounds::new(4.0, 12.0));
        assert_eq!(bounds.y, AxisBounds::new(-1.0, 1.0));
    }
}
