use std::collections::BTreeSet;
use std::sync::Arc;

use super::model::{CellValue, ColumnType, Dataset};
use crate::error::ConfigurationError;

// ---------------------------------------------------------------------------
// Selection criteria: the settled state of the sidebar controls
// ---------------------------------------------------------------------------

/// One snapshot of the user-controlled inputs.
///
/// Built fresh from the input state for every read and compared wholesale
/// against the cached key, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    /// Numeric column used for missing-value filtering and as the charted measure.
    pub target_column: String,
    /// Category labels to keep. Empty means nothing passes.
    pub category_filter: BTreeSet<String>,
    /// Bin count of the interactive histogram.
    pub bin_count_a: u32,
    /// Bin count of the static histogram.
    pub bin_count_b: u32,
}

// ---------------------------------------------------------------------------
// Filtered view: row indices into the shared dataset
// ---------------------------------------------------------------------------

/// The rows of a dataset that match a [`SelectionCriteria`], in source order.
///
/// Only indices are held, so every row is the dataset's own row.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    target: usize,
    indices: Vec<usize>,
}

impl PartialEq for FilteredView {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dataset, &other.dataset)
            && self.target == other.target
            && self.indices == other.indices
    }
}

impl FilteredView {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Indices of the visible rows in the source dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn target_column(&self) -> &str {
        &self.dataset.columns()[self.target].name
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        self.indices.iter().map(move |&index| RowRef {
            dataset: &self.dataset,
            index,
        })
    }

    /// Values of the target column, paired with the row's category.
    pub fn target_values(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.indices.iter().filter_map(move |&i| {
            let value = self.dataset.value(i, self.target).as_f64()?;
            Some((self.dataset.category_of(i)?, value))
        })
    }
}

/// A borrowed row of a [`FilteredView`].
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> RowRef<'a> {
    /// Position of this row in the source dataset.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn values(&self) -> &'a [CellValue] {
        self.dataset.row(self.index)
    }

    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let col = self.dataset.column_index(column)?;
        Some(self.dataset.value(self.index, col))
    }

    pub fn category(&self) -> Option<&'a str> {
        self.dataset.category_of(self.index)
    }
}

// ---------------------------------------------------------------------------
// compute_view
// ---------------------------------------------------------------------------

/// Check that `column` exists and is numeric, returning its index.
pub fn validate_target(dataset: &Dataset, column: &str) -> Result<usize, ConfigurationError> {
    let index = dataset
        .column_index(column)
        .ok_or_else(|| ConfigurationError::UnknownColumn(column.to_string()))?;
    let kind = dataset.columns()[index].kind;
    if kind != ColumnType::Numeric {
        return Err(ConfigurationError::NotNumeric {
            column: column.to_string(),
            found: kind,
        });
    }
    Ok(index)
}

/// Return the rows of `dataset` that pass `criteria`.
///
/// A row passes when:
/// * its value in `target_column` is not missing, and
/// * its category label is in `category_filter` (an empty filter passes nothing).
///
/// Relative order is preserved. Bin counts do not take part in filtering.
pub fn compute_view(
    dataset: &Arc<Dataset>,
    criteria: &SelectionCriteria,
) -> Result<FilteredView, ConfigurationError> {
    let target = validate_target(dataset, &criteria.target_column)?;

    let indices = (0..dataset.len())
        .filter(|&i| !dataset.value(i, target).is_missing())
        .filter(|&i| {
            dataset
                .category_of(i)
                .is_some_and(|label| criteria.category_filter.contains(label))
        })
        .collect();

    Ok(FilteredView {
        dataset: Arc::clone(dataset),
        target,
        indices,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::model::ColumnSpec;

    /// `measure = [1.0, null, 3.0, 4.0]`, `group = [a, b, a, c]`.
    pub(crate) fn measure_group() -> Arc<Dataset> {
        let rows = vec![
            vec![CellValue::Number(1.0), CellValue::Category("a".into())],
            vec![CellValue::Missing, CellValue::Category("b".into())],
            vec![CellValue::Number(3.0), CellValue::Category("a".into())],
            vec![CellValue::Number(4.0), CellValue::Category("c".into())],
        ];
        let columns = vec![
            ColumnSpec {
                name: "measure".into(),
                kind: ColumnType::Numeric,
            },
            ColumnSpec {
                name: "group".into(),
                kind: ColumnType::Categorical,
            },
        ];
        Arc::new(Dataset::new(columns, rows, "group").unwrap())
    }

    pub(crate) fn criteria(column: &str, labels: &[&str]) -> SelectionCriteria {
        SelectionCriteria {
            target_column: column.to_string(),
            category_filter: labels.iter().map(|s| s.to_string()).collect(),
            bin_count_a: 10,
            bin_count_b: 5,
        }
    }

    #[test]
    fn keeps_present_values_in_selected_groups() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &["a", "c"])).unwrap();

        assert_eq!(view.indices(), &[0, 2, 3]);
        let rows: Vec<(f64, &str)> = view
            .rows()
            .map(|r| (r.get("measure").unwrap().as_f64().unwrap(), r.category().unwrap()))
            .collect();
        assert_eq!(rows, vec![(1.0, "a"), (3.0, "a"), (4.0, "c")]);
    }

    #[test]
    fn missing_values_are_dropped_even_when_group_selected() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &["a", "b", "c"])).unwrap();

        assert_eq!(view.indices(), &[0, 2, 3]);
        assert!(view.rows().all(|r| !r.get("measure").unwrap().is_missing()));
    }

    #[test]
    fn every_row_is_a_source_row_in_a_selected_group() {
        let ds = measure_group();
        let c = criteria("measure", &["c", "b"]);
        let view = compute_view(&ds, &c).unwrap();

        assert!(view.len() <= ds.len());
        for row in view.rows() {
            assert_eq!(row.values(), ds.row(row.index()));
            assert!(c.category_filter.contains(row.category().unwrap()));
        }
        assert_eq!(view.indices(), &[3]);
    }

    #[test]
    fn empty_filter_gives_empty_view() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &[])).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn unknown_column_fails_fast() {
        let ds = measure_group();
        let err = compute_view(&ds, &criteria("does_not_exist", &["a"])).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownColumn("does_not_exist".into()));
    }

    #[test]
    fn categorical_target_is_rejected() {
        let ds = measure_group();
        let err = compute_view(&ds, &criteria("group", &["a"])).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotNumeric { found: ColumnType::Categorical, .. }));
    }

    #[test]
    fn repeated_calls_agree() {
        let ds = measure_group();
        let c = criteria("measure", &["a"]);
        assert_eq!(compute_view(&ds, &c).unwrap(), compute_view(&ds, &c).unwrap());
    }

    #[test]
    fn target_values_pair_category_and_measure() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &["a", "c"])).unwrap();
        let values: Vec<_> = view.target_values().collect();
        assert_eq!(values, vec![("a", 1.0), ("a", 3.0), ("c", 4.0)]);
        assert_eq!(view.target_column(), "measure");
    }
}
