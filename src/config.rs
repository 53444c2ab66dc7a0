use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::data::model::{ColumnType, Dataset};

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Everything that differs between dashboard variants: which dataset is
/// shown, which columns can be charted, the bin controls and the scatter axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub dataset: DatasetSource,
    /// Categorical column driving the checkbox filter and chart colours.
    pub category_column: String,
    /// Columns offered by the column selector.
    pub selectable_columns: Vec<String>,
    pub default_column: String,
    /// Numeric input feeding the interactive histogram.
    pub numeric_bins: BinControl,
    /// Slider feeding the static histogram.
    pub slider_bins: BinControl,
    pub scatter: ScatterAxes,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSource {
    Builtin { name: BuiltinDataset },
    File { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinDataset {
    Iris,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinControl {
    pub label: String,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl BinControl {
    /// Clamp `n` into `[min, max]`; never below one bin.
    pub fn clamp(&self, n: u32) -> u32 {
        n.clamp(self.min.max(1), self.max.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterAxes {
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Built-in dashboard variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    Iris,
    Penguins,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::iris()
    }
}

impl DashboardConfig {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Iris => Self::iris(),
            Profile::Penguins => Self::penguins(),
        }
    }

    /// Iris measurements, embedded in the binary.
    pub fn iris() -> Self {
        Self {
            title: "Iris Dashboard".to_string(),
            dataset: DatasetSource::Builtin {
                name: BuiltinDataset::Iris,
            },
            category_column: "species".to_string(),
            selectable_columns: [
                "sepal_length",
                "sepal_width",
                "petal_length",
                "petal_width",
                "species",
            ]
            .map(String::from)
            .to_vec(),
            default_column: "sepal_length".to_string(),
            numeric_bins: BinControl {
                label: "Interactive Bin Count".to_string(),
                min: 1,
                max: 500,
                default: 10,
            },
            slider_bins: BinControl {
                label: "Static Bin Count".to_string(),
                min: 1,
                max: 100,
                default: 5,
            },
            scatter: ScatterAxes {
                x: "sepal_length".to_string(),
                y: "sepal_width".to_string(),
            },
            link: None,
        }
    }

    /// Palmer penguins measurements read from a local file
    /// (see the `generate_sample` binary).
    pub fn penguins() -> Self {
        Self {
            title: "Penguins Dashboard".to_string(),
            dataset: DatasetSource::File {
                path: PathBuf::from("penguins.csv"),
            },
            category_column: "species".to_string(),
            selectable_columns: [
                "bill_length_mm",
                "bill_depth_mm",
                "flipper_length_mm",
                "body_mass_g",
            ]
            .map(String::from)
            .to_vec(),
            default_column: "bill_length_mm".to_string(),
            scatter: ScatterAxes {
                x: "bill_length_mm".to_string(),
                y: "bill_depth_mm".to_string(),
            },
            ..Self::iris()
        }
    }

    /// Read a JSON config file. Missing fields fall back to the iris profile.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Check every referenced column against the loaded dataset.
    ///
    /// Selectable columns only need to exist: choosing a categorical one is
    /// reported at view time as an invalid selection.
    pub fn validate(&self, dataset: &Dataset) -> Result<()> {
        ensure!(
            dataset.category_column().name == self.category_column,
            "dataset category column is '{}', config expects '{}'",
            dataset.category_column().name,
            self.category_column
        );
        ensure!(
            !self.selectable_columns.is_empty(),
            "no selectable columns configured"
        );
        for col in &self.selectable_columns {
            if dataset.column(col).is_none() {
                bail!("selectable column '{col}' is not in the dataset");
            }
        }
        ensure!(
            self.selectable_columns.contains(&self.default_column),
            "default column '{}' is not selectable",
            self.default_column
        );
        for axis in [&self.scatter.x, &self.scatter.y] {
            match dataset.column(axis) {
                None => bail!("scatter axis '{axis}' is not in the dataset"),
                Some(spec) if spec.kind != ColumnType::Numeric => {
                    bail!("scatter axis '{axis}' is {}, expected numeric", spec.kind)
                }
                Some(_) => {}
            }
        }
        for (name, bins) in [("numeric_bins", &self.numeric_bins), ("slider_bins", &self.slider_bins)] {
            ensure!(
                bins.min >= 1 && bins.min <= bins.default && bins.default <= bins.max,
                "{name}: expected 1 <= min <= default <= max, got {}..={} default {}",
                bins.min,
                bins.max,
                bins.default
            );
        }
        Ok(())
    }
}
