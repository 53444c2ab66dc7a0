use std::collections::BTreeMap;

use super::filter::{FilteredView, validate_target};
use crate::error::ConfigurationError;

/// Points of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Group the view's rows into `(x, y)` point series by category.
///
/// Rows missing either coordinate are skipped. Series are sorted by label.
pub fn scatter_series(
    view: &FilteredView,
    x: &str,
    y: &str,
) -> Result<Vec<ScatterSeries>, ConfigurationError> {
    let dataset = view.dataset();
    let x_idx = validate_target(dataset, x)?;
    let y_idx = validate_target(dataset, y)?;

    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for row in view.rows() {
        let values = row.values();
        let (Some(px), Some(py), Some(label)) = (
            values[x_idx].as_f64(),
            values[y_idx].as_f64(),
            row.category(),
        ) else {
            continue;
        };
        groups.entry(label).or_default().push([px, py]);
    }

    Ok(groups
        .into_iter()
        .map(|(label, points)| ScatterSeries {
            label: label.to_string(),
            points,
        })
        .collect())
}
