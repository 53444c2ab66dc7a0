use eframe::egui::{Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use super::{PresentationSink, RenderFrame, empty_view, invalid_selection};
use crate::data::filter::FilteredView;
use crate::data::histogram::LayeredHistogram;
use crate::data::scatter::scatter_series;

const PLOT_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Which bin control drives a histogram and whether it reacts to the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramKind {
    /// Zoomable, draggable; binned by the numeric input.
    Interactive,
    /// Fixed axes; binned by the slider.
    Static,
}

pub struct HistogramSink {
    kind: HistogramKind,
}

impl HistogramSink {
    pub fn new(kind: HistogramKind) -> Self {
        Self { kind }
    }

    fn bins(&self, frame: &RenderFrame<'_>) -> u32 {
        match self.kind {
            HistogramKind::Interactive => frame.criteria.bin_count_a,
            HistogramKind::Static => frame.criteria.bin_count_b,
        }
    }
}

impl PresentationSink for HistogramSink {
    fn title(&self, frame: &RenderFrame<'_>) -> String {
        let column = &frame.criteria.target_column;
        let category = &frame.config.category_column;
        match self.kind {
            HistogramKind::Interactive => format!("Histogram of {column} by {category}"),
            HistogramKind::Static => format!("Static Histogram of {column} by {category}"),
        }
    }

    fn show(&mut self, ui: &mut Ui, view: &FilteredView, frame: &RenderFrame<'_>) {
        let Some(hist) = LayeredHistogram::compute(view, self.bins(frame)) else {
            empty_view(ui);
            return;
        };
        let interactive = self.kind == HistogramKind::Interactive;
        let width = hist.bin_width();

        let plot = Plot::new(match self.kind {
            HistogramKind::Interactive => "interactive_histogram",
            HistogramKind::Static => "static_histogram",
        })
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(view.target_column())
        .y_axis_label("Count")
        .allow_zoom(interactive)
        .allow_drag(interactive)
        .allow_scroll(interactive)
        .allow_boxed_zoom(interactive)
        .allow_double_click_reset(interactive)
        .show_x(interactive)
        .show_y(interactive);

        plot.show(ui, |plot_ui| {
            for layer in &hist.layers {
                let color = frame.colors.color_for(&layer.label);
                let bars: Vec<Bar> = hist
                    .centers()
                    .zip(&layer.counts)
                    .filter(|(_, count)| **count > 0)
                    .map(|(center, &count)| {
                        Bar::new(center, count as f64)
                            .width(width)
                            .fill(frame.colors.fill_for(&layer.label))
                            .stroke(Stroke::new(1.0, color))
                    })
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).name(&layer.label).color(color));
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Scatterplot
// ---------------------------------------------------------------------------

/// Configured x / y columns, one point series per category.
pub struct ScatterSink;

impl PresentationSink for ScatterSink {
    fn title(&self, frame: &RenderFrame<'_>) -> String {
        format!("Scatterplot: {} vs {}", frame.config.scatter.x, frame.config.scatter.y)
    }

    fn show(&mut self, ui: &mut Ui, view: &FilteredView, frame: &RenderFrame<'_>) {
        let axes = &frame.config.scatter;
        let series = match scatter_series(view, &axes.x, &axes.y) {
            Ok(series) => series,
            Err(e) => {
                invalid_selection(ui, &e);
                return;
            }
        };
        if series.is_empty() {
            empty_view(ui);
            return;
        }

        Plot::new("scatterplot")
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(&axes.x)
            .y_axis_label(&axes.y)
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(ui, |plot_ui| {
                for s in series {
                    let color = frame.colors.color_for(&s.label);
                    plot_ui.points(
                        Points::new(PlotPoints::from(s.points))
                            .name(&s.label)
                            .color(color)
                            .radius(3.0),
                    );
                }
            });
    }
}
