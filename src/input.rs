use std::collections::BTreeSet;

use crate::config::{BinControl, DashboardConfig};
use crate::data::filter::SelectionCriteria;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Change events
// ---------------------------------------------------------------------------

/// Which control changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    Column,
    BinCountA,
    BinCountB,
    Categories,
}

/// Receives a notification after a control change has settled.
pub trait InputObserver {
    fn on_input_changed(&mut self, change: InputChange);
}

impl<F> InputObserver for F
where
    F: FnMut(InputChange),
{
    fn on_input_changed(&mut self, change: InputChange) {
        self(change)
    }
}

// ---------------------------------------------------------------------------
// Control values
// ---------------------------------------------------------------------------

/// Current values of the sidebar controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub selected_column: String,
    pub bin_count_a: u32,
    pub bin_count_b: u32,
    pub selected_categories: BTreeSet<String>,
}

impl Controls {
    fn changes_to(&self, next: &Controls) -> Vec<InputChange> {
        let mut changes = Vec::new();
        if self.selected_column != next.selected_column {
            changes.push(InputChange::Column);
        }
        if self.bin_count_a != next.bin_count_a {
            changes.push(InputChange::BinCountA);
        }
        if self.bin_count_b != next.bin_count_b {
            changes.push(InputChange::BinCountB);
        }
        if self.selected_categories != next.selected_categories {
            changes.push(InputChange::Categories);
        }
        changes
    }
}

// ---------------------------------------------------------------------------
// Input state
// ---------------------------------------------------------------------------

/// Owns the control values and publishes every settled change to its
/// observers. Observers never see a half-applied edit: a batch made through
/// [`InputState::update`] is applied in full before anyone is notified.
pub struct InputState {
    controls: Controls,
    bins_a: BinControl,
    bins_b: BinControl,
    observers: Vec<Box<dyn InputObserver>>,
}

impl InputState {
    pub fn new(controls: Controls, bins_a: BinControl, bins_b: BinControl) -> Self {
        let mut controls = controls;
        controls.bin_count_a = bins_a.clamp(controls.bin_count_a);
        controls.bin_count_b = bins_b.clamp(controls.bin_count_b);
        Self {
            controls,
            bins_a,
            bins_b,
            observers: Vec::new(),
        }
    }

    /// Initial controls: default column, default bin counts, every category selected.
    pub fn from_config(config: &DashboardConfig, dataset: &Dataset) -> Self {
        let controls = Controls {
            selected_column: config.default_column.clone(),
            bin_count_a: config.numeric_bins.default,
            bin_count_b: config.slider_bins.default,
            selected_categories: dataset.categories().clone(),
        };
        Self::new(
            controls,
            config.numeric_bins.clone(),
            config.slider_bins.clone(),
        )
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn subscribe(&mut self, observer: Box<dyn InputObserver>) {
        self.observers.push(observer);
    }

    /// Apply an edit to a copy of the controls, then swap it in and notify
    /// observers once per changed control. No-op edits publish nothing.
    pub fn update(&mut self, edit: impl FnOnce(&mut Controls)) {
        let mut next = self.controls.clone();
        edit(&mut next);
        next.bin_count_a = self.bins_a.clamp(next.bin_count_a);
        next.bin_count_b = self.bins_b.clamp(next.bin_count_b);

        let changes = self.controls.changes_to(&next);
        if changes.is_empty() {
            return;
        }
        self.controls = next;

        for change in changes {
            log::debug!("input changed: {change:?}");
            for observer in &mut self.observers {
                observer.on_input_changed(change);
            }
        }
    }

    pub fn set_column(&mut self, column: &str) {
        self.update(|c| c.selected_column = column.to_string());
    }

    pub fn set_bin_count_a(&mut self, n: u32) {
        self.update(|c| c.bin_count_a = n);
    }

    pub fn set_bin_count_b(&mut self, n: u32) {
        self.update(|c| c.bin_count_b = n);
    }

    /// Check or uncheck a single category.
    pub fn set_category(&mut self, label: &str, selected: bool) {
        self.update(|c| {
            if selected {
                c.selected_categories.insert(label.to_string());
            } else {
                c.selected_categories.remove(label);
            }
        });
    }

    /// Replace the whole category selection.
    pub fn select_categories(&mut self, labels: BTreeSet<String>) {
        self.update(|c| c.selected_categories = labels);
    }

    /// Snapshot the controls as a fresh [`SelectionCriteria`].
    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria {
            target_column: self.controls.selected_column.clone(),
            category_filter: self.controls.selected_categories.clone(),
            bin_count_a: self.controls.bin_count_a,
            bin_count_b: self.controls.bin_count_b,
        }
    }
}
