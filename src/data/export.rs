use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{Dataset, Record};
use super::schema::Column;
use crate::error::{LoadError, LoadResult};

/// Write `dataset` as CSV with spreadsheet headers; a missing weight is an
/// empty cell.
pub fn write_csv<W: Write>(dataset: &Dataset, sink: W) -> LoadResult<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(Column::ALL.iter().map(|c| c.header()))?;

    for r in dataset {
        writer.write_record([
            r.item_id.clone(),
            r.item_weight.map(|w| w.to_string()).unwrap_or_default(),
            r.item_fat_content.to_string(),
            r.item_visibility.to_string(),
            r.item_type.clone(),
            r.sales.to_string(),
            r.rating.to_string(),
            r.outlet_id.clone(),
            r.outlet_establishment_year.to_string(),
            r.outlet_size.to_string(),
            r.outlet_location_type.to_string(),
            r.outlet_type.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Convert `dataset` into a single Arrow record batch.
pub fn to_record_batch(dataset: &Dataset) -> LoadResult<RecordBatch> {
    fn strings(dataset: &Dataset, f: impl Fn(&Record) -> String) -> ArrayRef {
        Arc::new(StringArray::from(dataset.iter().map(f).collect::<Vec<String>>()))
    }
    fn floats(dataset: &Dataset, f: impl Fn(&Record) -> Option<f64>) -> ArrayRef {
        Arc::new(Float64Array::from(dataset.iter().map(f).collect::<Vec<Option<f64>>>()))
    }

    let schema = Arc::new(Schema::new(
        Column::ALL
            .iter()
            .map(|c| {
                let ty = match c {
                    Column::ItemWeight | Column::ItemVisibility | Column::Sales | Column::Rating => {
                        DataType::Float64
                    }
                    Column::OutletEstablishmentYear => DataType::Int32,
                    _ => DataType::Utf8,
                };
                Field::new(c.header(), ty, c.nullable())
            })
            .collect::<Vec<Field>>(),
    ));

    let years: ArrayRef = Arc::new(Int32Array::from(
        dataset.iter().map(|r| r.outlet_establishment_year).collect::<Vec<i32>>(),
    ));

    let columns: Vec<ArrayRef> = vec![
        strings(dataset, |r| r.item_id.clone()),
        floats(dataset, |r| r.item_weight),
        strings(dataset, |r| r.item_fat_content.to_string()),
        floats(dataset, |r| Some(r.item_visibility)),
        strings(dataset, |r| r.item_type.clone()),
        floats(dataset, |r| Some(r.sales)),
        floats(dataset, |r| Some(r.rating)),
        strings(dataset, |r| r.outlet_id.clone()),
        years,
        strings(dataset, |r| r.outlet_size.to_string()),
        strings(dataset, |r| r.outlet_location_type.to_string()),
        strings(dataset, |r| r.outlet_type.clone()),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Write `dataset` as a Parquet file at `path`.
pub fn write_parquet(dataset: &Dataset, path: &Path) -> LoadResult<()> {
    let batch = to_record_batch(dataset)?;
    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write `dataset` to `path`, choosing the format by extension.
pub fn write_file(dataset: &Dataset, path: &Path) -> LoadResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(dataset, std::fs::File::create(path)?),
        "parquet" | "pq" => write_parquet(dataset, path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}
