use std::path::Path;

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};
use tracing::{debug, warn};

use super::output_log::OutputLog;
use crate::chart::export::{render_png, EXPORT_SIZE};
use crate::chart::{AxisBounds, ChartModel, ViewBounds, X_AXIS_LABEL, Y_AXIS_LABEL};

const SAVE_BUTTON_HEIGHT: f32 = 36.0;

/// The line chart plus its zoom state and PNG export.
#[derive(Default)]
pub struct ChartPanel {
    pub model: ChartModel,
    view: Option<ViewBounds>,
    pending_view: Option<ViewBounds>,
    fitted_generation: Option<u64>,
}

fn to_plot_bounds(view: ViewBounds) -> PlotBounds {
    PlotBounds::from_min_max([view.x.min, view.y.min], [view.x.max, view.y.max])
}

fn from_plot_bounds(bounds: PlotBounds) -> ViewBounds {
    let (min, max) = (bounds.min(), bounds.max());
    ViewBounds {
        x: AxisBounds::new(min[0], max[0]),
        y: AxisBounds::new(min[1], max[1]),
    }
}

impl ChartPanel {
    /// Visible window as of the last frame.
    pub fn view(&self) -> Option<ViewBounds> {
        self.view
    }

    /// Rescales both axes around the current window. Every notch moves each
    /// bound by a tenth of the visible span.
    pub fn zoom(&mut self, scroll_delta: f64) {
        if let Some(view) = self.pending_view.or(self.view) {
            self.pending_view = Some(view.zoomed(scroll_delta));
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, log: &mut OutputLog) {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        let generation = self.model.generation();
        let refit = self.fitted_generation != Some(generation);
        let model = &self.model;
        let pending_view = &mut self.pending_view;

        let response = Plot::new("benchmark_chart")
            .legend(Legend::default())
            .x_axis_label(X_AXIS_LABEL)
            .y_axis_label(Y_AXIS_LABEL)
            .allow_scroll(false)
            .allow_zoom(false)
            .height((ui.available_height() - SAVE_BUTTON_HEIGHT).max(120.0))
            .show(ui, |plot_ui| {
                if refit {
                    pending_view.take();
                    plot_ui.set_auto_bounds(egui::Vec2b::TRUE);
                } else if let Some(view) = pending_view.take() {
                    plot_ui.set_plot_bounds(to_plot_bounds(view));
                }
                for series in model.series() {
                    plot_ui.line(Line::new(PlotPoints::from(series.points.clone())).name(&series.name));
                }
                plot_ui.plot_bounds()
            });

        self.view = Some(from_plot_bounds(response.inner));
        self.fitted_generation = Some(generation);

        if response.response.hovered() && scroll != 0.0 {
            self.zoom(f64::from(scroll));
            // Consumed here, nothing else scrolls
            ui.input_mut(|i| {
                i.raw_scroll_delta = egui::Vec2::ZERO;
                i.smooth_scroll_delta = egui::Vec2::ZERO;
            });
            ui.ctx().request_repaint();
        }

        ui.vertical_centered(|ui| {
            let save = ui.add_enabled(self.model.export_enabled(), egui::Button::new("Save as PNG"));
            if save.clicked() {
                self.export_as_image(log);
            }
        });
    }

    /// Asks for a destination and writes the current view there. Cancelling
    /// the dialog does nothing; write failures end up in the log.
    pub fn export_as_image(&self, log: &mut OutputLog) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save Chart as PNG")
            .set_file_name(self.model.export_file_name())
            .add_filter("PNG Files", &["png"]);
        if let Some(home) = dirs::home_dir() {
            dialog = dialog.set_directory(home);
        }

        let Some(path) = dialog.save_file() else {
            debug!("chart export cancelled");
            return;
        };

        self.save_to(&path, log);
    }

    /// Writes the current view to `path` and reports the outcome in `log`.
    pub fn save_to(&self, path: &Path, log: &mut OutputLog) {
        match render_png(&self.model, self.view, path, EXPORT_SIZE) {
            Ok(()) => log.append(&format!("Chart saved to: {}\n", path.display())),
            Err(error) => {
                warn!(%error, path = %path.display(), "chart export failed");
                log.append(&format!("{}\n", error));
            }
        }
    }
}
