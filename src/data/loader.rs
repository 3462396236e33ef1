use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use calamine::{Data, Range, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record};
use super::schema::{Column, ColumnIndex};
use super::synthetic;
use crate::config::DashboardConfig;
use crate::error::{LoadError, LoadResult};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from `source`, or the synthetic sample when `None`.
///
/// Supported formats, by extension:
/// * `.csv`             – header row, one record per line
/// * `.json`            – `[{ "Item Identifier": "...", ... }, ...]`
/// * `.parquet` / `.pq` – one column per field
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, header in its first row
pub fn load(source: Option<&Path>) -> LoadResult<Dataset> {
    match source {
        None => Ok(synthetic::generate(synthetic::SAMPLE_SEED)),
        Some(path) => load_file(path),
    }
}

/// Load a dataset from a file.  Dispatch by extension.
pub fn load_file(path: &Path) -> LoadResult<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?),
        "json" => read_json(&std::fs::read_to_string(path)?),
        "parquet" | "pq" => load_parquet(path),
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Where the dashboard's data came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOrigin {
    File(PathBuf),
    Sample,
}

/// Result of [`load_or_sample`]: always a usable dataset.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub origin: DataOrigin,
    /// Set when a file was given but could not be loaded.
    pub warning: Option<String>,
}

/// Load `source`, falling back to the synthetic sample on any error.
pub fn load_or_sample(source: Option<&Path>, config: &DashboardConfig) -> LoadOutcome {
    let sample = || synthetic::generate_with(&config.sample);

    match source {
        None => LoadOutcome {
            dataset: sample(),
            origin: DataOrigin::Sample,
            warning: None,
        },
        Some(path) => match load_file(path) {
            Ok(dataset) => LoadOutcome {
                dataset,
                origin: DataOrigin::File(path.to_path_buf()),
                warning: None,
            },
            Err(e) => {
                log::warn!("Failed to load {}: {e}; using sample data", path.display());
                LoadOutcome {
                    dataset: sample(),
                    origin: DataOrigin::Sample,
                    warning: Some(format!("Failed to load the file ({e}). Using sample data.")),
                }
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Cell → Record conversion shared by every format
// ---------------------------------------------------------------------------

/// A single source cell before it is typed.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    fn from_text(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Builds a [`Record`] from the 12 cells of one row, validating as it goes.
struct RowParser {
    /// 1-based; counts the header line for CSV and spreadsheet sources.
    row: usize,
    cells: Vec<Cell>,
}

impl RowParser {
    fn cell(&self, col: Column) -> &Cell {
        &self.cells[col as usize]
    }

    fn invalid(&self, col: Column, value: impl ToString) -> LoadError {
        LoadError::InvalidValue {
            row: self.row,
            column: col.canonical(),
            value: value.to_string(),
        }
    }

    fn text(&self, col: Column) -> LoadResult<String> {
        match self.cell(col) {
            Cell::Text(s) => Ok(s.clone()),
            // identifiers exported as numbers, e.g. 1001.0 → "1001"
            Cell::Number(n) if n.fract() == 0.0 => Ok(format!("{n:.0}")),
            Cell::Number(n) => Ok(n.to_string()),
            Cell::Missing => Err(LoadError::MissingValue {
                row: self.row,
                column: col.canonical(),
            }),
        }
    }

    fn parsed<T: std::str::FromStr>(&self, col: Column) -> LoadResult<T> {
        let raw = self.text(col)?;
        raw.parse().map_err(|_| self.invalid(col, raw))
    }

    fn number(&self, col: Column) -> LoadResult<Option<f64>> {
        let value = match self.cell(col) {
            Cell::Missing if col.nullable() => return Ok(None),
            Cell::Missing => {
                return Err(LoadError::MissingValue {
                    row: self.row,
                    column: col.canonical(),
                })
            }
            Cell::Number(n) => *n,
            Cell::Text(s) => s.parse::<f64>().map_err(|_| self.invalid(col, s))?,
        };
        if value.is_nan() {
            return if col.nullable() {
                Ok(None)
            } else {
                Err(self.invalid(col, "NaN"))
            };
        }
        Ok(Some(value))
    }

    fn bounded(&self, col: Column, ok: impl Fn(f64) -> bool, range: &'static str) -> LoadResult<f64> {
        let value = self
            .number(col)?
            .ok_or(LoadError::MissingValue { row: self.row, column: col.canonical() })?;
        if ok(value) {
            Ok(value)
        } else {
            Err(LoadError::OutOfRange {
                row: self.row,
                column: col.canonical(),
                value,
                range,
            })
        }
    }

    fn year(&self) -> LoadResult<i32> {
        let col = Column::OutletEstablishmentYear;
        let value = self.bounded(col, f64::is_finite, "finite numbers")?;
        if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(self.invalid(col, value));
        }
        Ok(value as i32)
    }

    fn into_record(self) -> LoadResult<Record> {
        let item_weight = match self.number(Column::ItemWeight)? {
            Some(w) if w <= 0.0 || !w.is_finite() => {
                return Err(LoadError::OutOfRange {
                    row: self.row,
                    column: Column::ItemWeight.canonical(),
                    value: w,
                    range: "(0, ∞)",
                })
            }
            other => other,
        };

        Ok(Record {
            item_id: self.text(Column::ItemId)?,
            item_weight,
            item_fat_content: self.parsed(Column::ItemFatContent)?,
            item_visibility: self.bounded(
                Column::ItemVisibility,
                |v| (0.0..=1.0).contains(&v),
                "[0, 1]",
            )?,
            item_type: self.text(Column::ItemType)?,
            sales: self.bounded(Column::Sales, |v| v >= 0.0 && v.is_finite(), "[0, ∞)")?,
            rating: self.bounded(Column::Rating, |v| (1.0..=5.0).contains(&v), "[1, 5]")?,
            outlet_id: self.text(Column::OutletId)?,
            outlet_establishment_year: self.year()?,
            outlet_size: self.parsed(Column::OutletSize)?,
            outlet_location_type: self.parsed(Column::OutletLocationType)?,
            outlet_type: self.text(Column::OutletType)?,
        })
    }
}

fn finish(records: Vec<Record>) -> LoadResult<Dataset> {
    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(records.into())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names (spreadsheet headers such as
/// `Item Identifier` or snake_case `item_id`), one record per row.
pub fn read_csv<R: Read>(source: R) -> LoadResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(false).from_reader(source);
    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(headers.iter()).map_err(|c| LoadError::MissingColumn(c.header()))?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let line = row.position().map_or(i + 2, |pos| pos.line() as usize);
        let cells = Column::ALL
            .iter()
            .map(|col| Cell::from_text(row.get(index.position(*col)).unwrap_or("")))
            .collect();
        records.push(RowParser { row: line, cells }.into_record()?);
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Item Identifier": "FDA15", "Item Weight": 9.3, "Sales": 141.6, ... },
///   ...
/// ]
/// ```
pub fn read_json(text: &str) -> LoadResult<Dataset> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Layout("expected top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Layout(format!("row {} is not a JSON object", i + 1)))?;

        let mut cells = vec![None; Column::ALL.len()];
        for (key, value) in obj {
            if let Some(col) = Column::from_header(key) {
                cells[col as usize].get_or_insert_with(|| json_to_cell(value));
            }
        }

        let cells = Column::ALL
            .iter()
            .map(|col| cells[*col as usize].take().ok_or(LoadError::MissingColumn(col.header())))
            .collect::<LoadResult<Vec<Cell>>>()?;
        records.push(RowParser { row: i + 1, cells }.into_record()?);
    }

    finish(records)
}

fn json_to_cell(value: &JsonValue) -> Cell {
    match value {
        JsonValue::String(s) => Cell::from_text(s),
        JsonValue::Number(n) => n.as_f64().map_or(Cell::Missing, Cell::Number),
        JsonValue::Null => Cell::Missing,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`) as well as the `generate_sample` tool.
fn load_parquet(path: &Path) -> LoadResult<Dataset> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let index = ColumnIndex::resolve(schema.fields().iter().map(|f| f.name().as_str()))
            .map_err(|c| LoadError::MissingColumn(c.header()))?;

        for row in 0..batch.num_rows() {
            let cells = Column::ALL
                .iter()
                .map(|col| extract_cell(batch.column(index.position(*col)), row))
                .collect::<LoadResult<Vec<Cell>>>()?;
            let row_no = records.len() + 1;
            records.push(RowParser { row: row_no, cells }.into_record()?);
        }
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an Excel or OpenDocument workbook.
fn load_spreadsheet(path: &Path) -> LoadResult<Dataset> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Layout("workbook has no worksheets".into()))??;
    read_sheet(&range)
}

/// Sheet layout: first used row holds the headers, one record per row below.
/// Row numbers in errors are the sheet's own 1-based row numbers.
pub fn read_sheet(range: &Range<Data>) -> LoadResult<Dataset> {
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();
    let index = ColumnIndex::resolve(headers.iter().map(String::as_str))
        .map_err(|c| LoadError::MissingColumn(c.header()))?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let cells = Column::ALL
            .iter()
            .map(|col| row.get(index.position(*col)).map_or(Cell::Missing, sheet_cell))
            .collect();
        let sheet_row = first_row + i + 2;
        records.push(RowParser { row: sheet_row, cells }.into_record()?);
    }

    finish(records)
}

fn sheet_cell(cell: &Data) -> Cell {
    match cell {
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        // #N/A and friends read as blanks, like pandas does
        Data::Empty | Data::Error(_) => Cell::Missing,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Arrow cell extraction
// ---------------------------------------------------------------------------

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> LoadResult<Cell> {
    fn downcast<T: 'static>(col: &Arc<dyn Array>) -> LoadResult<&T> {
        col.as_any().downcast_ref::<T>().ok_or_else(|| {
            LoadError::Layout(format!("unexpected array type {:?}", col.data_type()))
        })
    }

    if col.is_null(row) {
        return Ok(Cell::Missing);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => Cell::from_text(downcast::<StringArray>(col)?.value(row)),
        DataType::LargeUtf8 => Cell::from_text(downcast::<LargeStringArray>(col)?.value(row)),
        DataType::Utf8View => Cell::from_text(col.as_string_view().value(row)),
        DataType::Int16 => Cell::Number(downcast::<Int16Array>(col)?.value(row) as f64),
        DataType::Int32 => Cell::Number(downcast::<Int32Array>(col)?.value(row) as f64),
        DataType::Int64 => Cell::Number(downcast::<Int64Array>(col)?.value(row) as f64),
        DataType::Float32 => Cell::Number(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => Cell::Number(downcast::<Float64Array>(col)?.value(row)),
        other => {
            return Err(LoadError::Layout(format!(
                "unsupported column type {other:?}"
            )))
        }
    };
    Ok(cell)
}
