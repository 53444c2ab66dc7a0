//! Presentation layer: sidebar controls plus the sinks that draw a
//! filtered view.
//!
//! ```text
//!   InputState ──criteria──▶ FilteredViewEngine ──view──▶ Dispatcher
//!                                                            │
//!                     ┌──────────────┬───────────────┬───────┴──────┐
//!                     ▼              ▼               ▼              ▼
//!                  tables      interactive hist  static hist    scatter
//! ```
//!
//! Sinks are registered explicitly under a layout [`Slot`] and only read
//! what the [`RenderFrame`] hands them.
use eframe::egui::{self, RichText, Ui};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{FilteredView, SelectionCriteria};
use crate::error::ConfigurationError;

pub mod panels;
pub mod plot;
pub mod table;

/// Everything a sink may read for one frame.
pub struct RenderFrame<'a> {
    pub view: Result<&'a FilteredView, &'a ConfigurationError>,
    pub criteria: &'a SelectionCriteria,
    pub config: &'a DashboardConfig,
    pub colors: &'a ColorMap,
}

/// A table or chart fed by the filtered view.
pub trait PresentationSink {
    fn title(&self, frame: &RenderFrame<'_>) -> String;

    /// Draw a valid view.
    fn show(&mut self, ui: &mut Ui, view: &FilteredView, frame: &RenderFrame<'_>);
}

/// Where a sink is laid out on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Tables,
    Histograms,
    Scatter,
}

/// Routes each frame to the registered sinks of a slot.
#[derive(Default)]
pub struct Dispatcher {
    sinks: Vec<(Slot, Box<dyn PresentationSink>)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, slot: Slot, sink: Box<dyn PresentationSink>) {
        self.sinks.push((slot, sink));
    }

    pub fn count(&self, slot: Slot) -> usize {
        self.sinks.iter().filter(|(s, _)| *s == slot).count()
    }

    /// Draw every sink of `slot` side by side. An invalid selection replaces
    /// each sink's content with an explicit notice.
    pub fn show_slot(&mut self, ui: &mut Ui, slot: Slot, frame: &RenderFrame<'_>) {
        let mut sinks: Vec<&mut Box<dyn PresentationSink>> = self
            .sinks
            .iter_mut()
            .filter(|(s, _)| *s == slot)
            .map(|(_, sink)| sink)
            .collect();
        if sinks.is_empty() {
            return;
        }

        ui.columns(sinks.len(), |columns: &mut [Ui]| {
            for (ui, sink) in columns.iter_mut().zip(sinks.iter_mut()) {
                ui.strong(sink.title(frame));
                match frame.view {
                    Ok(view) => sink.show(ui, view, frame),
                    Err(e) => invalid_selection(ui, e),
                }
            }
        });
    }
}

/// Placeholder shown instead of stale or partial data.
pub fn invalid_selection(ui: &mut Ui, error: &ConfigurationError) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(12.0);
        ui.label(RichText::new("Invalid selection").strong().color(egui::Color32::RED));
        ui.label(RichText::new(error.to_string()).weak());
        ui.add_space(12.0);
    });
}

/// Placeholder for a valid but empty view.
pub fn empty_view(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(12.0);
        ui.label(RichText::new("No rows match the current selection").weak());
        ui.add_space(12.0);
    });
}
