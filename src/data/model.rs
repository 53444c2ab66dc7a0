use std::collections::BTreeSet;
use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the measurement table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Used as a `BTreeSet` / sort key downstream, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Category(String),
    Missing,
}

// -- Manual Eq/Ord so we can sort table rows and collect unique values --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Number(_) => 1,
                Category(_) => 2,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Number(a), Number(b)) => a.total_cmp(b),
            (Category(a), Category(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Number(v) => v.to_bits().hash(state),
            CellValue::Category(s) => s.hash(state),
            CellValue::Missing => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Category(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, "NA"),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            CellValue::Category(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// Column schema
// ---------------------------------------------------------------------------

/// Logical type of a column, fixed for the lifetime of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnType,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table. Immutable once built; shared behind an `Arc`.
///
/// Rows are stored as value vectors aligned with `columns`. One categorical
/// column is designated the category column (e.g. `species`); its unique
/// labels are pre-computed.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<CellValue>>,
    category_index: usize,
    categories: BTreeSet<String>,
}

impl Dataset {
    /// Build a dataset from raw cells, inferring each column's type.
    ///
    /// A column is numeric when every non-missing cell is a number. Any
    /// other column is categorical and its numeric cells are kept as text.
    pub fn from_cells(
        headers: Vec<String>,
        mut rows: Vec<Vec<CellValue>>,
        category_column: &str,
    ) -> Result<Self> {
        if rows.is_empty() {
            bail!("dataset has no rows");
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                bail!(
                    "row {i} has {} values but the header has {} columns",
                    row.len(),
                    headers.len()
                );
            }
        }

        let mut columns = Vec::with_capacity(headers.len());
        for (col, name) in headers.into_iter().enumerate() {
            let numeric = rows
                .iter()
                .all(|row| matches!(row[col], CellValue::Number(_) | CellValue::Missing));
            let kind = if numeric {
                ColumnType::Numeric
            } else {
                for row in rows.iter_mut() {
                    if let CellValue::Number(v) = row[col] {
                        row[col] = CellValue::Category(v.to_string());
                    }
                }
                ColumnType::Categorical
            };
            columns.push(ColumnSpec { name, kind });
        }

        Self::new(columns, rows, category_column)
    }

    /// Build a dataset from an explicit schema.
    pub fn new(
        columns: Vec<ColumnSpec>,
        rows: Vec<Vec<CellValue>>,
        category_column: &str,
    ) -> Result<Self> {
        let Some(category_index) = columns.iter().position(|c| c.name == category_column) else {
            bail!("category column '{category_column}' is not in the dataset");
        };
        if columns[category_index].kind != ColumnType::Categorical {
            bail!("category column '{category_column}' is not categorical");
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                bail!("row {i} has {} values, expected {}", row.len(), columns.len());
            }
            for (spec, value) in columns.iter().zip(row) {
                let fits = match (spec.kind, value) {
                    (_, CellValue::Missing) => true,
                    (ColumnType::Numeric, CellValue::Number(_)) => true,
                    (ColumnType::Categorical, CellValue::Category(_)) => true,
                    _ => false,
                };
                if !fits {
                    bail!("row {i}: value '{value}' does not fit {} column '{}'", spec.kind, spec.name);
                }
            }
        }

        let categories = rows
            .iter()
            .filter_map(|row| row[category_index].as_category())
            .map(str::to_string)
            .collect();

        Ok(Dataset {
            columns,
            rows,
            category_index,
            categories,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row(&self, index: usize) -> &[CellValue] {
        &self.rows[index]
    }

    pub fn value(&self, row: usize, column: usize) -> &CellValue {
        &self.rows[row][column]
    }

    pub fn category_column(&self) -> &ColumnSpec {
        &self.columns[self.category_index]
    }

    /// Category label of a row, `None` when the cell is missing.
    pub fn category_of(&self, row: usize) -> Option<&str> {
        self.rows[row][self.category_index].as_category()
    }

    /// Sorted set of category labels present in the data.
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }
}
