use eframe::egui::{self, Color32, RichText, Ui};

use crate::error::ConfigurationError;
use crate::input::Controls;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – input controls
// ---------------------------------------------------------------------------

/// Render the sidebar. Widgets edit local copies; the input state is only
/// updated once a widget reports a change, so observers see settled values.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(&state.config.title);
    ui.separator();

    // ---- Column selector ----
    ui.strong("Choose a column:");
    let current = state.input.controls().selected_column.clone();
    let mut chosen = None;
    egui::ComboBox::from_id_salt("selected_column")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &state.config.selectable_columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    chosen = Some(col.clone());
                }
            }
        });
    if let Some(col) = chosen {
        state.input.set_column(&col);
    }
    ui.add_space(6.0);

    // ---- Numeric bin input ----
    let bins_a = &state.config.numeric_bins;
    ui.strong(&bins_a.label);
    let mut count_a = state.input.controls().bin_count_a;
    if ui
        .add(egui::DragValue::new(&mut count_a).range(bins_a.min..=bins_a.max))
        .changed()
    {
        state.input.set_bin_count_a(count_a);
    }
    ui.add_space(6.0);

    // ---- Slider bin input ----
    let bins_b = &state.config.slider_bins;
    ui.strong(&bins_b.label);
    let mut count_b = state.input.controls().bin_count_b;
    if ui
        .add(egui::Slider::new(&mut count_b, bins_b.min..=bins_b.max))
        .changed()
    {
        state.input.set_bin_count_b(count_b);
    }
    ui.add_space(6.0);

    // ---- Category checkboxes ----
    let selected = state.input.controls().selected_categories.clone();
    let n_total = state.dataset.categories().len();
    ui.strong(format!(
        "Selected {}  ({}/{n_total})",
        state.config.category_column,
        selected.len()
    ));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let mut toggled = Vec::new();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for label in state.dataset.categories() {
            let mut checked = selected.contains(label);
            let text = RichText::new(title_case(label)).color(state.colors.color_for(label));
            if ui.checkbox(&mut checked, text).changed() {
                toggled.push((label.clone(), checked));
            }
        }
    });
    for (label, checked) in toggled {
        state.input.set_category(&label, checked);
    }

    ui.separator();
    if ui.small_button("Reset controls").clicked() {
        state.reset_controls();
    }
    if let Some(link) = &state.config.link {
        ui.hyperlink_to(&link.label, &link.url);
    }
}

fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

/// Render the bottom status line for the current frame.
pub fn status_bar(
    ui: &mut Ui,
    total_rows: usize,
    controls: &Controls,
    visible: Result<usize, &ConfigurationError>,
) {
    ui.horizontal(|ui: &mut Ui| {
        match visible {
            Ok(n) => {
                ui.label(format!("{total_rows} rows loaded, {n} visible"));
            }
            Err(e) => {
                ui.label(format!("{total_rows} rows loaded"));
                ui.separator();
                ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            }
        }
        ui.separator();
        ui.label(format!(
            "bins: {} / {}",
            controls.bin_count_a, controls.bin_count_b
        ));
    });
}

#[cfg(test)]
mod tests {
    use super::title_case;

    #[test]
    fn title_case_labels() {
        assert_eq!(title_case("setosa"), "Setosa");
        assert_eq!(title_case("Gentoo"), "Gentoo");
        assert_eq!(title_case(""), "");
    }
}
