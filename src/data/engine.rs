use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use super::filter::{FilteredView, SelectionCriteria, compute_view};
use super::model::Dataset;
use crate::error::ConfigurationError;
use crate::input::{InputChange, InputObserver};

// ---------------------------------------------------------------------------
// Filtered view engine: a single-slot memo over compute_view
// ---------------------------------------------------------------------------

/// Whether the cached slot may be served as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Stale,
    Fresh,
}

struct Cached {
    criteria: SelectionCriteria,
    outcome: Result<FilteredView, ConfigurationError>,
}

/// Owns the dataset handle and the most recent view.
///
/// Starts `Stale`. Any published input change (via [`Invalidator`]) makes it
/// `Stale` again; the next [`read`](Self::read) recomputes and becomes `Fresh`.
/// A `Fresh` read with equal criteria returns the cached outcome without
/// scanning the dataset. Outcomes are deterministic, so a cached
/// configuration error is served the same way as a cached view.
pub struct FilteredViewEngine {
    dataset: Arc<Dataset>,
    slot: Option<Cached>,
    stale: Rc<Cell<bool>>,
    recomputes: usize,
}

impl FilteredViewEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            slot: None,
            stale: Rc::new(Cell::new(true)),
            recomputes: 0,
        }
    }

    pub fn state(&self) -> CacheState {
        if self.stale.get() {
            CacheState::Stale
        } else {
            CacheState::Fresh
        }
    }

    /// Number of times the dataset has been scanned.
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    /// An observer that marks this engine stale, for [`crate::input::InputState::subscribe`].
    pub fn invalidator(&self) -> Invalidator {
        Invalidator {
            stale: Rc::clone(&self.stale),
        }
    }

    /// Return the view for `criteria`, recomputing only when needed.
    ///
    /// The previous slot is replaced only after the new outcome is complete.
    pub fn read(
        &mut self,
        criteria: &SelectionCriteria,
    ) -> Result<&FilteredView, ConfigurationError> {
        let hit = self.state() == CacheState::Fresh
            && self.slot.as_ref().is_some_and(|c| c.criteria == *criteria);

        let cached = match self.slot.take() {
            Some(cached) if hit => cached,
            _ => self.recompute(criteria),
        };
        self.stale.set(false);

        match &self.slot.insert(cached).outcome {
            Ok(view) => Ok(view),
            Err(e) => Err(e.clone()),
        }
    }

    fn recompute(&mut self, criteria: &SelectionCriteria) -> Cached {
        self.recomputes += 1;
        let outcome = compute_view(&self.dataset, criteria);
        match &outcome {
            Ok(view) => log::debug!(
                "recompute #{} on '{}': {} of {} rows",
                self.recomputes,
                criteria.target_column,
                view.len(),
                self.dataset.len()
            ),
            Err(e) => log::warn!("invalid selection: {e}"),
        }
        Cached {
            criteria: criteria.clone(),
            outcome,
        }
    }
}

/// Marks a [`FilteredViewEngine`] stale when an input changes.
#[derive(Clone)]
pub struct Invalidator {
    stale: Rc<Cell<bool>>,
}

impl InputObserver for Invalidator {
    fn on_input_changed(&mut self, _change: InputChange) {
        self.stale.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BinControl;
    use crate::data::filter::tests::{criteria, measure_group};
    use crate::input::{Controls, InputState};

    #[test]
    fn starts_stale_and_becomes_fresh() {
        let mut engine = FilteredViewEngine::new(measure_group());
        assert_eq!(engine.state(), CacheState::Stale);
        assert_eq!(engine.recompute_count(), 0);

        engine.read(&criteria("measure", &["a"])).unwrap();
        assert_eq!(engine.state(), CacheState::Fresh);
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn fresh_read_with_same_criteria_does_not_scan() {
        let mut engine = FilteredViewEngine::new(measure_group());
        let c = criteria("measure", &["a", "c"]);

        let first = engine.read(&c).unwrap().clone();
        let second = engine.read(&c).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn different_criteria_recompute_without_invalidation() {
        let mut engine = FilteredViewEngine::new(measure_group());
        engine.read(&criteria("measure", &["a"])).unwrap();
        let view = engine.read(&criteria("measure", &["c"])).unwrap();

        assert_eq!(view.indices(), &[3]);
        assert_eq!(engine.recompute_count(), 2);
    }

    #[test]
    fn invalidation_forces_a_rescan() {
        let mut engine = FilteredViewEngine::new(measure_group());
        let c = criteria("measure", &["a"]);
        engine.read(&c).unwrap();

        let mut invalidator = engine.invalidator();
        invalidator.on_input_changed(InputChange::BinCountA);
        assert_eq!(engine.state(), CacheState::Stale);

        engine.read(&c).unwrap();
        assert_eq!(engine.recompute_count(), 2);
        assert_eq!(engine.state(), CacheState::Fresh);
    }

    #[test]
    fn configuration_error_is_returned_without_a_view() {
        let mut engine = FilteredViewEngine::new(measure_group());
        engine.read(&criteria("measure", &["a"])).unwrap();

        let c = criteria("does_not_exist", &["a"]);
        let err = engine.read(&c).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownColumn("does_not_exist".into()));
        assert_eq!(engine.state(), CacheState::Fresh);

        // Deterministic: served again from the slot.
        assert!(engine.read(&c).is_err());
        assert_eq!(engine.recompute_count(), 2);
    }

    #[test]
    fn subscribed_to_input_state() {
        let mut engine = FilteredViewEngine::new(measure_group());
        let bins = BinControl {
            label: "bins".into(),
            min: 1,
            max: 100,
            default: 10,
        };
        let mut input = InputState::new(
            Controls {
                selected_column: "measure".into(),
                bin_count_a: 10,
                bin_count_b: 5,
                selected_categories: ["a", "b", "c"].iter().map(|s| s.to_string()).collect(),
            },
            bins.clone(),
            bins,
        );
        input.subscribe(Box::new(engine.invalidator()));

        assert_eq!(engine.read(&input.criteria()).unwrap().len(), 3);
        assert_eq!(engine.read(&input.criteria()).unwrap().len(), 3);
        assert_eq!(engine.recompute_count(), 1);

        input.set_category("a", false);
        assert_eq!(engine.state(), CacheState::Stale);
        assert_eq!(engine.read(&input.criteria()).unwrap().indices(), &[3]);
        assert_eq!(engine.recompute_count(), 2);
    }
}
