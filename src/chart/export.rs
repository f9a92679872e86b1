use std::fmt::Display;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use super::{AxisBounds, ChartModel, ViewBounds, X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::error::ExportError;

pub const EXPORT_SIZE: (u32, u32) = (1280, 720);

fn render_error(error: impl Display) -> ExportError {
    ExportError::Render(error.to_string())
}

/// Draws `chart` into a PNG at `path`.
///
/// `view` is the window currently shown on screen; without one the image is
/// fitted to the data.
pub fn render_png(chart: &ChartModel, view: Option<ViewBounds>, path: &Path, size: (u32, u32)) -> Result<(), ExportError> {
    let bounds = view.or_else(|| chart.data_bounds()).unwrap_or(ViewBounds {
        x: AxisBounds::new(0.0, 1.0),
        y: AxisBounds::new(0.0, 1.0),
    });

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut plot = ChartBuilder::on(&root)
        .caption(chart.title(), ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(bounds.x.min..bounds.x.max, bounds.y.min..bounds.y.max)
        .map_err(render_error)?;

    plot.configure_mesh()
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .draw()
        .map_err(render_error)?;

    for (index, series) in chart.series().iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();
        plot.draw_series(LineSeries::new(
            series.points.iter().map(|p| (p[0], p[1])),
            color.stroke_width(2),
        ))
        .map_err(render_error)?
        .label(series.name.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if !chart.series().is_empty() {
        plot.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;
    }

    // Nothing touches the file system until here
    root.present().map_err(|error| ExportError::Save(error.to_string()))?;
    info!(path = %path.display(), "chart saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_destination_is_a_save_error() {
        let chart = ChartModel::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("chart.png");

        let result = render_png(&chart, None, &path, (320, 240));

        assert!(matches!(result, Err(ExportError::Save(_))), "{:?}", result);
        assert!(!path.exists());
    }

    #[test]
    fn test_render_png_writes_file() {
        let mut chart = ChartModel::new();
        chart
            .populate(
                r#"[{"algorithm": "quick_sort", "threads": 1, "data_size": 32, "result": {"duration": 4.0}},
                    {"algorithm": "quick_sort", "threads": 1, "data_size": 64, "result": {"duration": 9.0}}]"#,
                1,
                false,
            )
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(chart.export_file_name());

        render_png(&chart, None, &path, (320, 240)).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
