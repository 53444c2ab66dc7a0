use std::collections::BTreeMap;

use super::filter::FilteredView;

/// Equal-width bins over the target column of a view, with one count
/// layer per category.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredHistogram {
    /// `bins + 1` ascending edges.
    pub edges: Vec<f64>,
    /// Layers sorted by category label; only categories present in the view.
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub label: String,
    pub counts: Vec<usize>,
}

impl LayeredHistogram {
    /// Bin the view's target values into `bins` equal-width bins spanning
    /// `[min, max]`. The last bin is closed on the right. A single distinct
    /// value gets a unit-wide range centred on it. Returns `None` for an
    /// empty view.
    pub fn compute(view: &FilteredView, bins: u32) -> Option<Self> {
        let values: Vec<(&str, f64)> = view.target_values().collect();
        if values.is_empty() {
            return None;
        }
        let bins = bins.max(1) as usize;

        let mut min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let mut max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        if (max - min).abs() < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();

        let mut counts: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (label, value) in values {
            let idx = (((value - min) / width).floor() as usize).min(bins - 1);
            counts.entry(label).or_insert_with(|| vec![0; bins])[idx] += 1;
        }

        let layers = counts
            .into_iter()
            .map(|(label, counts)| Layer {
                label: label.to_string(),
                counts,
            })
            .collect();

        Some(Self { edges, layers })
    }

    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Centre of each bin, for bar placement.
    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0)
    }

    /// Total number of binned values across layers.
    pub fn total(&self) -> usize {
        self.layers.iter().flat_map(|l| &l.counts).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::compute_view;
    use crate::data::filter::tests::{criteria, measure_group};

    #[test]
    fn bins_span_the_visible_range() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &["a", "c"])).unwrap();
        let hist = LayeredHistogram::compute(&view, 3).unwrap();

        assert_eq!(hist.edges, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.bin_count(), 3);
        assert_eq!(hist.layers.len(), 2);
        assert_eq!(hist.layers[0].label, "a");
        assert_eq!(hist.layers[0].counts, vec![1, 0, 1]);
        // 4.0 sits on the closed right edge of the last bin.
        assert_eq!(hist.layers[1].counts, vec![0, 0, 1]);
        assert_eq!(hist.total(), view.len());
    }

    #[test]
    fn single_value_gets_unit_range() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &["c"])).unwrap();
        let hist = LayeredHistogram::compute(&view, 2).unwrap();

        assert_eq!(hist.edges, vec![3.5, 4.0, 4.5]);
        assert_eq!(hist.layers[0].counts, vec![0, 1]);
        assert_eq!(hist.centers().collect::<Vec<_>>(), vec![3.75, 4.25]);
    }

    #[test]
    fn empty_view_has_no_histogram() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &[])).unwrap();
        assert!(LayeredHistogram::compute(&view, 10).is_none());
    }

    #[test]
    fn zero_bins_is_treated_as_one() {
        let ds = measure_group();
        let view = compute_view(&ds, &criteria("measure", &["a", "c"])).unwrap();
        let hist = LayeredHistogram::compute(&view, 0).unwrap();
        assert_eq!(hist.bin_count(), 1);
        assert_eq!(hist.bin_width(), 3.0);
        assert_eq!(hist.total(), 3);
    }
}
