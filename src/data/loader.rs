use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{DistrictRecord, HouseholdDataset, MalaysianState};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the district table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the seven [`DistrictRecord`] fields, any order
/// * `.json`    – `[{ "state": "Johor", "district": "...", ... }, ...]`
/// * `.parquet` – one column per field, string `state`/`district`
pub fn load_file(path: &Path) -> Result<HouseholdDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv(file)?
        }
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = HouseholdDataset::new(records)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse district rows from any CSV source.  Columns are matched by header
/// name, extra columns are ignored, and cells are trimmed.
pub fn read_csv<R: Read>(source: R) -> Result<Vec<DistrictRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            bail!("CSV missing '{required}' column");
        }
    }

    reader
        .deserialize::<DistrictRecord>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {}", row_no + 1)))
        .collect()
}

const REQUIRED_COLUMNS: [&str; 7] = [
    "state",
    "district",
    "income_mean",
    "income_median",
    "expenditure_mean",
    "poverty",
    "gini",
];

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "state": "Johor", "district": "Batu Pahat", "income_mean": 5326,
///     "income_median": 4254, "expenditure_mean": 3516, "poverty": 3.2, "gini": 0.35 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<DistrictRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON district records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per [`DistrictRecord`] field.
///
/// `state` and `district` must be Utf8 or LargeUtf8; the numeric columns may be
/// any of Float64, Float32, Int64 or Int32.  Nulls are rejected.
fn load_parquet(path: &Path) -> Result<Vec<DistrictRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(records_from_batch(&batch)?);
    }
    Ok(records)
}

fn records_from_batch(batch: &RecordBatch) -> Result<Vec<DistrictRecord>> {
    let state = column(batch, "state")?;
    let district = column(batch, "district")?;
    let income_mean = column(batch, "income_mean")?;
    let income_median = column(batch, "income_median")?;
    let expenditure_mean = column(batch, "expenditure_mean")?;
    let poverty = column(batch, "poverty")?;
    let gini = column(batch, "gini")?;

    (0..batch.num_rows())
        .map(|row| {
            let state_label = extract_string(state, row)
                .with_context(|| format!("Row {row}: failed to read 'state'"))?;
            let state: MalaysianState = state_label
                .parse()
                .with_context(|| format!("Row {row}"))?;
            Ok(DistrictRecord {
                state,
                district: extract_string(district, row)
                    .with_context(|| format!("Row {row}: failed to read 'district'"))?,
                income_mean: extract_f64(income_mean, row)
                    .with_context(|| format!("Row {row}: failed to read 'income_mean'"))?,
                income_median: extract_f64(income_median, row)
                    .with_context(|| format!("Row {row}: failed to read 'income_median'"))?,
                expenditure_mean: extract_f64(expenditure_mean, row)
                    .with_context(|| format!("Row {row}: failed to read 'expenditure_mean'"))?,
                poverty: extract_f64(poverty, row)
                    .with_context(|| format!("Row {row}: failed to read 'poverty'"))?,
                gini: extract_f64(gini, row)
                    .with_context(|| format!("Row {row}: failed to read 'gini'"))?,
            })
        })
        .collect()
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Ok(arr.value(row).to_string())
        }
        other => bail!("Expected Utf8 or LargeUtf8 column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    /// Per-process scratch path, removed again by `load_from`.
    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hies-loader-{}-{name}", std::process::id()))
    }

    fn load_from(path: &Path) -> Result<HouseholdDataset> {
        let result = load_file(path);
        std::fs::remove_file(path).ok();
        result
    }

    fn sabah_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("state", DataType::Utf8, false),
            Field::new("district", DataType::Utf8, false),
            Field::new("income_mean", DataType::Int64, false),
            Field::new("income_median", DataType::Int32, false),
            Field::new("expenditure_mean", DataType::Float32, false),
            Field::new("poverty", DataType::Float64, false),
            Field::new("gini", DataType::Float64, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["Sabah", "Sabah"])),
                Arc::new(StringArray::from(vec!["Tawau", "Sandakan"])),
                Arc::new(Int64Array::from(vec![4500, 5200])),
                Arc::new(Int32Array::from(vec![3600, 4100])),
                Arc::new(Float32Array::from(vec![3000.5, 3400.0])),
                Arc::new(Float64Array::from(vec![12.5, 17.1])),
                Arc::new(Float64Array::from(vec![0.41, 0.39])),
            ],
        )
        .unwrap()
    }

    const SAMPLE: &str = "\
state,district,income_mean,income_median,expenditure_mean,poverty,gini
Johor,Batu Pahat,5326,4254,3516,3.2,0.35
Johor, Kluang ,5544,4516,3748,1.9,0.33
W.P. Labuan,W.P. Labuan,8319,6726,4790,3.1,0.39
";

    #[test]
    fn reads_records_in_file_order() {
        let records = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].state, MalaysianState::Johor);
        assert_eq!(records[1].district, "Kluang");
        assert_eq!(records[1].income_mean, 5544.0);
        assert_eq!(records[2].state, MalaysianState::Labuan);
        assert_eq!(records[2].gini, 0.39);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "\
date,state,district,income_mean,income_median,expenditure_mean,poverty,gini
2019-01-01,Perlis,Perlis,4594,3854,3150,3.9,0.34
";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].state, MalaysianState::Perlis);
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "state,district,income_mean\nJohor,Kluang,5544\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("income_median"));
    }

    #[test]
    fn unknown_state_fails_with_row_context() {
        let csv = "\
state,district,income_mean,income_median,expenditure_mean,poverty,gini
Atlantis,Nowhere,1,1,1,1,0.1
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("districts.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn converts_mixed_numeric_arrow_columns() {
        let records = records_from_batch(&sabah_batch()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, MalaysianState::Sabah);
        assert_eq!(records[0].income_mean, 4500.0);
        assert_eq!(records[0].income_median, 3600.0);
        assert_eq!(records[0].expenditure_mean, 3000.5);
    }

    #[test]
    fn loads_csv_file() {
        let path = scratch("districts.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let dataset = load_from(&path).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.in_state(MalaysianState::Johor).count(), 2);
    }

    #[test]
    fn loads_json_file() {
        let path = scratch("districts.json");
        let json = r#"[
            {"state": "Perak", "district": "Kinta", "income_mean": 6000,
             "income_median": 4800, "expenditure_mean": 3900, "poverty": 2.1, "gini": 0.36},
            {"state": "Perak", "district": "Manjung", "income_mean": 5100,
             "income_median": 4000, "expenditure_mean": 3300, "poverty": 4.4, "gini": 0.33}
        ]"#;
        std::fs::write(&path, json).unwrap();
        let dataset = load_from(&path).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].district, "Manjung");
        assert_eq!(dataset.records()[1].poverty, 4.4);
    }

    #[test]
    fn loads_parquet_file() {
        let batch = sabah_batch();
        for name in ["districts.parquet", "districts.pq"] {
            let path = scratch(name);
            let file = std::fs::File::create(&path).unwrap();
            let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
            writer.write(&batch).unwrap();
            writer.close().unwrap();

            let dataset = load_from(&path).unwrap();
            assert_eq!(dataset.len(), 2);
            assert_eq!(dataset.records()[1].district, "Sandakan");
            assert_eq!(dataset.records()[1].gini, 0.39);
        }
    }

    #[test]
    fn duplicate_district_in_file_fails_validation() {
        let path = scratch("duplicates.csv");
        let csv = "\
state,district,income_mean,income_median,expenditure_mean,poverty,gini
Kedah,Baling,3800,3100,2700,9.1,0.33
Kedah,Baling,3900,3200,2800,8.7,0.34
";
        std::fs::write(&path, csv).unwrap();
        let err = load_from(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("validating"));
        assert!(msg.contains("Baling"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_file(&scratch("absent.csv")).unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}
