use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset};
use crate::config::{BuiltinDataset, DatasetSource};

const IRIS_CSV: &str = include_str!("../../assets/iris.csv");

/// Cell texts read as a missing value (compared trimmed, case-insensitive).
const MISSING_MARKERS: &[&str] = &["", "na", "nan", "n/a", "null", "none", "-"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset a dashboard is configured with.
pub fn load_dataset(source: &DatasetSource, category_column: &str) -> Result<Dataset> {
    match source {
        DatasetSource::Builtin { name } => load_builtin(*name, category_column),
        DatasetSource::File { path } => load_file(path, category_column),
    }
}

pub fn load_builtin(name: BuiltinDataset, category_column: &str) -> Result<Dataset> {
    match name {
        BuiltinDataset::Iris => {
            read_csv(IRIS_CSV.as_bytes(), category_column).context("parsing embedded iris data")
        }
    }
}

/// Load a flat table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one row per observation
/// * `.json`    – `[{ "column": value, ... }, ...]`
/// * `.parquet` – one scalar column per field
pub fn load_file(path: &Path, category_column: &str) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            read_csv(file, category_column)
        }
        "json" => load_json(path, category_column),
        "parquet" | "pq" => load_parquet(path, category_column),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

fn is_missing_marker(s: &str) -> bool {
    let s = s.trim();
    MISSING_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m))
}

fn parse_cell(s: &str) -> CellValue {
    if is_missing_marker(s) {
        return CellValue::Missing;
    }
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Category(s.trim().to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv<R: Read>(reader: R, category_column: &str) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    Dataset::from_cells(headers, rows, category_column)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "bill_length_mm": 39.1, "species": "Adelie" },
///   { "bill_length_mm": null, "species": "Adelie" }
/// ]
/// ```
///
/// Keys absent from a record read as missing.
fn load_json(path: &Path, category_column: &str) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Missing, json_to_cell))
                .collect()
        })
        .collect();

    Dataset::from_cells(headers, rows, category_column)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Number(n) => match n.as_f64() {
            Some(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Missing,
        },
        JsonValue::String(s) => parse_text_cell(s),
        JsonValue::Bool(b) => CellValue::Category(b.to_string()),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Category(other.to_string()),
    }
}

/// Text cells stay text even when they look numeric; only missing markers
/// are recognised.
fn parse_text_cell(s: &str) -> CellValue {
    if is_missing_marker(s) {
        CellValue::Missing
    } else {
        CellValue::Category(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns.
///
/// Numeric fields (any int / float width) become numbers, NaN reads as
/// missing. Strings, booleans and dictionary-encoded categories become text.
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, category_column: &str) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let first = rows.len();
        rows.extend((0..batch.num_rows()).map(|_| Vec::with_capacity(headers.len())));

        for (col_idx, name) in headers.iter().enumerate() {
            let cells = column_cells(batch.column(col_idx))
                .with_context(|| format!("reading column '{name}'"))?;
            for (offset, cell) in cells.into_iter().enumerate() {
                rows[first + offset].push(cell);
            }
        }
    }

    Dataset::from_cells(headers, rows, category_column)
}

// -- Parquet / Arrow helpers --

/// Convert one Arrow column into cells.
fn column_cells(col: &Arc<dyn Array>) -> Result<Vec<CellValue>> {
    if col.data_type().is_numeric() {
        let floats = cast(col, &DataType::Float64).context("casting to Float64")?;
        let floats = floats.as_primitive::<Float64Type>();
        return Ok(floats
            .iter()
            .map(|v| match v {
                Some(v) if v.is_finite() => CellValue::Number(v),
                _ => CellValue::Missing,
            })
            .collect());
    }

    let text = match col.data_type() {
        DataType::Utf8 => Arc::clone(col),
        DataType::LargeUtf8 | DataType::Utf8View | DataType::Boolean | DataType::Dictionary(_, _) => {
            cast(col, &DataType::Utf8).context("casting to Utf8")?
        }
        other => bail!("unsupported column type {other:?}"),
    };
    let text = text.as_string::<i32>();
    Ok(text
        .iter()
        .map(|v| v.map_or(CellValue::Missing, parse_text_cell))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{DictionaryArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Int32Type, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::ColumnType;

    #[test]
    fn builtin_iris_has_three_balanced_species() {
        let ds = load_builtin(BuiltinDataset::Iris, "species").unwrap();
        assert_eq!(ds.len(), 150);
        assert_eq!(ds.columns().len(), 5);
        assert_eq!(
            ds.columns()
                .iter()
                .filter(|c| c.kind == ColumnType::Numeric)
                .count(),
            4
        );
        let species: Vec<&str> = ds.categories().iter().map(String::as_str).collect();
        assert_eq!(species, vec!["setosa", "versicolor", "virginica"]);
        assert_eq!(ds.value(0, 0), &CellValue::Number(5.1));
    }

    #[test]
    fn csv_missing_markers_become_missing() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "bill_length_mm,island,species").unwrap();
        writeln!(file, "39.1,Torgersen,Adelie").unwrap();
        writeln!(file, "NA,Torgersen,Adelie").unwrap();
        writeln!(file, ",Dream,Gentoo").unwrap();
        writeln!(file, "46.5, nan ,Chinstrap").unwrap();
        file.flush().unwrap();

        let ds = load_file(file.path(), "species").unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.column("bill_length_mm").unwrap().kind, ColumnType::Numeric);
        assert_eq!(ds.column("island").unwrap().kind, ColumnType::Categorical);
        assert!(ds.value(1, 0).is_missing());
        assert!(ds.value(2, 0).is_missing());
        assert!(ds.value(3, 1).is_missing());
        assert_eq!(ds.value(3, 0), &CellValue::Number(46.5));
    }

    #[test]
    fn json_records_with_nulls_and_absent_keys() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"mass": 3750, "species": "Adelie"}},
                {{"mass": null, "species": "Gentoo"}},
                {{"species": "Adelie"}}
            ]"#
        )
        .unwrap();
        file.flush().unwrap();

        let ds = load_file(file.path(), "species").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("mass").unwrap().kind, ColumnType::Numeric);
        let mass = ds.column_index("mass").unwrap();
        assert_eq!(ds.value(0, mass), &CellValue::Number(3750.0));
        assert!(ds.value(1, mass).is_missing());
        assert!(ds.value(2, mass).is_missing());
    }

    #[test]
    fn parquet_scalar_columns() {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();

        let species: DictionaryArray<Int32Type> =
            vec!["Adelie", "Gentoo", "Adelie"].into_iter().collect();
        let schema = Arc::new(Schema::new(vec![
            Field::new("flipper", DataType::Int64, true),
            Field::new("bill", DataType::Float64, true),
            Field::new(
                "species",
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                false,
            ),
            Field::new("island", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![Some(181), None, Some(195)])),
                Arc::new(Float64Array::from(vec![39.1, f64::NAN, 40.3])),
                Arc::new(species),
                Arc::new(StringArray::from(vec![Some("Torgersen"), Some("Biscoe"), None])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path(), "species").unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("flipper").unwrap().kind, ColumnType::Numeric);
        assert_eq!(ds.value(0, 0), &CellValue::Number(181.0));
        assert!(ds.value(1, 0).is_missing());
        assert!(ds.value(1, 1).is_missing());
        assert!(ds.value(2, 3).is_missing());
        assert_eq!(ds.category_of(1), Some("Gentoo"));
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("data.xlsx"), "species").unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }
}
