use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::engine::FilteredViewEngine;
use crate::data::model::Dataset;
use crate::input::InputState;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded once at startup; shared with the engine.
    pub dataset: Arc<Dataset>,

    /// Sidebar control values.
    pub input: InputState,

    /// Memoised filtered view, invalidated by `input`.
    pub engine: FilteredViewEngine,

    /// One colour per category label.
    pub colors: ColorMap,
}

impl AppState {
    /// Wire the engine to the input state and initialise the controls.
    pub fn new(config: DashboardConfig, dataset: Arc<Dataset>) -> Self {
        let engine = FilteredViewEngine::new(Arc::clone(&dataset));
        let mut input = InputState::from_config(&config, &dataset);
        input.subscribe(Box::new(engine.invalidator()));
        let colors = ColorMap::new(dataset.categories());

        Self {
            config,
            dataset,
            input,
            engine,
            colors,
        }
    }

    /// Restore default column, bin counts and a full category selection.
    pub fn reset_controls(&mut self) {
        let defaults = InputState::from_config(&self.config, &self.dataset);
        let defaults = defaults.controls().clone();
        self.input.update(|c| *c = defaults);
    }

    /// Select every category.
    pub fn select_all(&mut self) {
        self.input.select_categories(self.dataset.categories().clone());
    }

    /// Deselect every category.
    pub fn select_none(&mut self) {
        self.input.select_categories(BTreeSet::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::engine::CacheState;
    use crate::data::loader;
    use crate::error::ConfigurationError;

    fn iris_state() -> AppState {
        let config = DashboardConfig::iris();
        let dataset = loader::load_dataset(&config.dataset, &config.category_column).unwrap();
        AppState::new(config, Arc::new(dataset))
    }

    #[test]
    fn initial_view_shows_every_row() {
        let mut state = iris_state();
        let criteria = state.input.criteria();
        assert_eq!(criteria.target_column, "sepal_length");
        assert_eq!(criteria.bin_count_a, 10);
        assert_eq!(criteria.bin_count_b, 5);
        assert_eq!(state.engine.read(&criteria).unwrap().len(), 150);
    }

    #[test]
    fn control_changes_invalidate_the_engine() {
        let mut state = iris_state();
        state.engine.read(&state.input.criteria()).unwrap();
        assert_eq!(state.engine.state(), CacheState::Fresh);

        state.input.set_bin_count_b(20);
        assert_eq!(state.engine.state(), CacheState::Stale);

        state.input.set_category("setosa", false);
        let criteria = state.input.criteria();
        assert_eq!(state.engine.read(&criteria).unwrap().len(), 100);
        assert_eq!(state.engine.recompute_count(), 2);
    }

    #[test]
    fn species_column_is_an_invalid_selection() {
        let mut state = iris_state();
        state.input.set_column("species");
        let err = state.engine.read(&state.input.criteria()).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotNumeric { .. }));
    }

    #[test]
    fn select_none_then_reset() {
        let mut state = iris_state();
        state.select_none();
        assert!(state.engine.read(&state.input.criteria()).unwrap().is_empty());

        state.input.set_column("petal_width");
        state.reset_controls();
        let criteria = state.input.criteria();
        assert_eq!(criteria.target_column, "sepal_length");
        assert_eq!(criteria.category_filter.len(), 3);
        assert_eq!(state.engine.read(&criteria).unwrap().len(), 150);

        state.select_none();
        state.select_all();
        assert_eq!(state.input.controls().selected_categories.len(), 3);
    }
}
