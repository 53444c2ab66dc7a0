use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use super::{PresentationSink, RenderFrame, empty_view};
use crate::data::filter::FilteredView;

// ---------------------------------------------------------------------------
// Table query: per-column text filters and an optional sort key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Display-only refinement of a filtered view. Never feeds back into the
/// selection criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    /// Case-insensitive substring filters, aligned with the dataset columns.
    pub filters: Vec<String>,
    pub sort: Option<(usize, SortOrder)>,
}

impl TableQuery {
    /// Cycle a column through ascending → descending → unsorted.
    pub fn toggle_sort(&mut self, column: usize) {
        self.sort = match self.sort {
            Some((c, SortOrder::Ascending)) if c == column => Some((c, SortOrder::Descending)),
            Some((c, SortOrder::Descending)) if c == column => None,
            _ => Some((column, SortOrder::Ascending)),
        };
    }

    /// Rows of `view` passing every non-blank filter, sorted if requested.
    /// Sorting is stable, so ties keep source order.
    pub fn apply(&self, view: &FilteredView) -> Vec<usize> {
        let ds = view.dataset();
        let width = ds.columns().len();
        let needles: Vec<(usize, String)> = self
            .filters
            .iter()
            .enumerate()
            .filter(|(col, f)| *col < width && !f.trim().is_empty())
            .map(|(col, f)| (col, f.trim().to_lowercase()))
            .collect();

        let mut rows: Vec<usize> = view
            .rows()
            .filter(|row| {
                needles.iter().all(|(col, needle)| {
                    row.values()[*col]
                        .to_string()
                        .to_lowercase()
                        .contains(needle.as_str())
                })
            })
            .map(|row| row.index())
            .collect();

        if let Some((col, order)) = self.sort.filter(|(col, _)| *col < width) {
            rows.sort_by(|&a, &b| {
                let ord = ds.value(a, col).cmp(ds.value(b, col));
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        rows
    }
}

// ---------------------------------------------------------------------------
// Table sink
// ---------------------------------------------------------------------------

/// Scrollable table of the visible rows with a filter box per column.
/// The grid flavour also sorts by a clicked header.
pub struct TableSink {
    id: &'static str,
    title: &'static str,
    sortable: bool,
    query: TableQuery,
}

impl TableSink {
    pub fn data_table() -> Self {
        Self {
            id: "data_table",
            title: "Data Table",
            sortable: false,
            query: TableQuery::default(),
        }
    }

    pub fn data_grid() -> Self {
        Self {
            id: "data_grid",
            title: "Data Grid",
            sortable: true,
            query: TableQuery::default(),
        }
    }
}

impl PresentationSink for TableSink {
    fn title(&self, _frame: &RenderFrame<'_>) -> String {
        self.title.to_string()
    }

    fn show(&mut self, ui: &mut Ui, view: &FilteredView, _frame: &RenderFrame<'_>) {
        if view.is_empty() {
            empty_view(ui);
            return;
        }

        let ds = view.dataset();
        let columns = ds.columns();
        self.query.filters.resize(columns.len(), String::new());
        let rows = self.query.apply(view);
        ui.label(format!("{} of {} rows", rows.len(), view.len()));

        let text_height = egui::TextStyle::Body.resolve(ui.style()).size * 1.5;
        let sortable = self.sortable;
        let query = &mut self.query;

        ui.push_id(self.id, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), columns.len())
                .min_scrolled_height(0.0)
                .max_scroll_height(260.0)
                .header(text_height * 2.2, |mut header| {
                    for (i, spec) in columns.iter().enumerate() {
                        header.col(|ui: &mut Ui| {
                            ui.vertical(|ui: &mut Ui| {
                                if sortable {
                                    let marker = match query.sort {
                                        Some((c, SortOrder::Ascending)) if c == i => " ⏶",
                                        Some((c, SortOrder::Descending)) if c == i => " ⏷",
                                        _ => "",
                                    };
                                    if ui.button(format!("{}{marker}", spec.name)).clicked() {
                                        query.toggle_sort(i);
                                    }
                                } else {
                                    ui.strong(&spec.name);
                                }
                                ui.add(
                                    egui::TextEdit::singleline(&mut query.filters[i])
                                        .hint_text("filter")
                                        .desired_width(70.0),
                                );
                            });
                        });
                    }
                })
                .body(|body| {
                    body.rows(text_height, rows.len(), |mut row| {
                        let source = rows[row.index()];
                        for value in ds.row(source) {
                            row.col(|ui: &mut Ui| {
                                ui.label(value.to_string());
                            });
                        }
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::BuiltinDataset;
    use crate::data::filter::compute_view;
    use crate::data::filter::tests::criteria;
    use crate::data::loader;

    fn iris_view() -> FilteredView {
        let ds = Arc::new(loader::load_builtin(BuiltinDataset::Iris, "species").unwrap());
        compute_view(&ds, &criteria("sepal_length", &["setosa", "virginica"])).unwrap()
    }

    #[test]
    fn blank_query_keeps_view_order() {
        let view = iris_view();
        assert_eq!(TableQuery::default().apply(&view), view.indices());
    }

    #[test]
    fn substring_filter_is_case_insensitive() {
        let view = iris_view();
        let query = TableQuery {
            filters: vec![String::new(), String::new(), String::new(), String::new(), "VIRG".into()],
            sort: None,
        };
        let rows = query.apply(&view);
        assert_eq!(rows.len(), 50);
        assert!(rows.iter().all(|&r| view.dataset().category_of(r) == Some("virginica")));
    }

    #[test]
    fn sort_cycles_and_orders_rows() {
        let view = iris_view();
        let mut query = TableQuery::default();

        query.toggle_sort(0);
        let asc = query.apply(&view);
        let first = view.dataset().value(asc[0], 0).as_f64().unwrap();
        assert_eq!(first, 4.3);

        query.toggle_sort(0);
        let desc = query.apply(&view);
        assert_eq!(view.dataset().value(desc[0], 0).as_f64().unwrap(), 7.9);

        query.toggle_sort(0);
        assert_eq!(query.sort, None);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let view = iris_view();
        let query = TableQuery {
            filters: Vec::new(),
            sort: Some((4, SortOrder::Ascending)),
        };
        let rows = query.apply(&view);
        // Species ties keep source order: setosa rows first, ascending indices.
        assert_eq!(&rows[..3], &[0, 1, 2]);
        assert!(rows[..50].windows(2).all(|w| w[0] < w[1]));
    }
}
