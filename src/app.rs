use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::plot::{HistogramKind, HistogramSink, ScatterSink};
use crate::ui::table::TableSink;
use crate::ui::{Dispatcher, RenderFrame, Slot, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpeciesBoardApp {
    pub state: AppState,
    dispatcher: Dispatcher,
}

impl SpeciesBoardApp {
    /// Register the tables and charts with the dispatcher.
    pub fn new(state: AppState) -> Self {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Slot::Tables, Box::new(TableSink::data_table()));
        dispatcher.register(Slot::Tables, Box::new(TableSink::data_grid()));
        dispatcher.register(
            Slot::Histograms,
            Box::new(HistogramSink::new(HistogramKind::Interactive)),
        );
        dispatcher.register(
            Slot::Histograms,
            Box::new(HistogramSink::new(HistogramKind::Static)),
        );
        dispatcher.register(Slot::Scatter, Box::new(ScatterSink));

        Self { state, dispatcher }
    }
}

impl eframe::App for SpeciesBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Left side panel: controls (input settles here) ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui: &mut Ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- One read of the view per frame ----
        let AppState {
            config,
            dataset,
            input,
            engine,
            colors,
        } = &mut self.state;
        let criteria = input.criteria();
        let outcome = engine.read(&criteria);
        let frame = RenderFrame {
            view: outcome.as_ref().copied(),
            criteria: &criteria,
            config,
            colors,
        };

        // ---- Bottom panel: status ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui: &mut Ui| {
            let visible = frame.view.map(|view| view.len());
            panels::status_bar(ui, dataset.len(), input.controls(), visible);
        });

        // ---- Central panel: tables and charts ----
        let dispatcher = &mut self.dispatcher;
        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dispatcher.show_slot(ui, Slot::Tables, &frame);
                    ui.separator();
                    dispatcher.show_slot(ui, Slot::Histograms, &frame);
                    ui.separator();
                    egui::CollapsingHeader::new(format!(
                        "Scatterplot: {}",
                        frame.config.category_column
                    ))
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        dispatcher.show_slot(ui, Slot::Scatter, &frame);
                    });
                });
        });
    }
}
