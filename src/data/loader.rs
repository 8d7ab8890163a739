use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, EmployeeDataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Anything that can go wrong turning a file into an [`EmployeeDataset`].
/// All variants are fatal for the file being loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited file '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed Parquet file '{}': {source}", path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("cannot decode Parquet batch in '{}': {source}", path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("unsupported file extension '.{0}' (expected csv, tsv, json or parquet)")]
    UnsupportedExtension(String),

    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    #[error("record {0} is not a JSON object")]
    NotAnObject(usize),

    #[error("column '{column}' has unsupported Parquet type {data_type}")]
    UnsupportedColumnType { column: String, data_type: DataType },

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("row {row}: expected {expected} cells, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: column '{column}' must be {expected}, found '{found}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        expected: &'static str,
        found: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an employee dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – delimited text with a header row
/// * `.json`         – `[{ "Age": 41, "Department": "Sales", ... }, ...]`
/// * `.parquet`      – flat table of scalar columns
pub fn load_file(path: &Path) -> Result<EmployeeDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (columns, rows) = match ext.as_str() {
        "csv" => read_delimited(path, b',')?,
        "tsv" => read_delimited(path, b'\t')?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = EmployeeDataset::from_table(columns, rows)?;
    log::info!(
        "Loaded {} employees with {} columns from {}",
        dataset.len(),
        dataset.column_names.len(),
        path.display()
    );
    Ok(dataset)
}

type RawTable = (Vec<String>, Vec<Vec<CellValue>>);

// ---------------------------------------------------------------------------
// Memoized loading
// ---------------------------------------------------------------------------

/// Loaded datasets keyed by canonical source path.
///
/// Entries are never invalidated: a file edited after its first load keeps
/// serving the original table until the process restarts.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<EmployeeDataset>>,
}

impl DatasetCache {
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<EmployeeDataset>, LoadError> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if let Some(dataset) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for {}", key.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(path)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }

    Ok((headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns are the union of all record keys in order of first appearance;
/// a key missing from a record reads as null.
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut objects = Vec::with_capacity(records.len());
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or(LoadError::NotAnObject(i))?;
        for key in obj.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok((columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table, as written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let parquet_err = |source: parquet::errors::ParquetError| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        let arrays = batch
            .columns()
            .iter()
            .zip(&columns)
            .map(|(col, name)| normalize_column(path, name, col))
            .collect::<Result<Vec<_>, _>>()?;
        for row in 0..batch.num_rows() {
            rows.push(arrays.iter().map(|col| extract_cell(col, row)).collect());
        }
    }

    Ok((columns, rows))
}

/// Cast a column to one of the types [`extract_cell`] reads. Narrow and
/// unsigned integers widen to Int64, Float16 to Float64, and dictionary
/// columns (pandas `category`) decode to their value type.
fn normalize_column(path: &Path, name: &str, col: &ArrayRef) -> Result<ArrayRef, LoadError> {
    let target = match col.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => return Ok(Arc::clone(col)),
        DataType::Int8
        | DataType::Int16
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16 => DataType::Float64,
        DataType::Dictionary(_, value) => value.as_ref().clone(),
        other => {
            return Err(LoadError::UnsupportedColumnType {
                column: name.to_string(),
                data_type: other.clone(),
            })
        }
    };

    let cast = arrow::compute::cast(col.as_ref(), &target).map_err(|source| LoadError::Arrow {
        path: path.to_path_buf(),
        source,
    })?;
    if matches!(col.data_type(), DataType::Dictionary(..)) {
        normalize_column(path, name, &cast)
    } else {
        Ok(cast)
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        // Ruled out by `normalize_column`.
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const CSV: &str = "\
Age,Attrition,BusinessTravel,Department,EducationField,Gender,JobRole,MonthlyIncome,TotalWorkingYears,YearsAtCompany,Over18
41,Yes,Travel_Rarely,Sales,Life Sciences,Female,Sales Executive,5993,8,6,Y
49,No,Travel_Frequently,Research & Development,Life Sciences,Male,Research Scientist,5130,10,10,Y
37,Yes,Travel_Rarely,Research & Development,Other,Male,Laboratory Technician,2090,7,0,Y
";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "EA.csv", CSV);
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column_names.len(), 11);
        assert_eq!(ds.records[0].age, 41);
        assert_eq!(ds.records[1].department, "Research & Development");
        assert_eq!(ds.records[2].monthly_income, 2090.0);
        assert_eq!(ds.records[0].cells[10], CellValue::String("Y".into()));
        assert_eq!(ds.age_bounds, Some((37, 49)));
    }

    #[test]
    fn test_load_tsv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "EA.tsv", &CSV.replace(',', "\t"));
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].job_role, "Sales Executive");
    }

    #[test]
    fn test_load_json_records() {
        let dir = TempDir::new().unwrap();
        let json = r#"[
            {"Age": 30, "Attrition": "No", "BusinessTravel": "Non-Travel", "Department": "Sales",
             "EducationField": "Marketing", "Gender": "Male", "JobRole": "Manager",
             "MonthlyIncome": 10000.5, "TotalWorkingYears": 9, "YearsAtCompany": 3}
        ]"#;
        let path = write_file(&dir, "EA.json", json);
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].monthly_income, 10000.5);
        assert_eq!(ds.records[0].years_at_company, 3.0);
    }

    #[test]
    fn test_json_keeps_file_column_order_and_late_keys() {
        let dir = TempDir::new().unwrap();
        let json = r#"[
            {"YearsAtCompany": 3, "Age": 30, "Attrition": "No", "BusinessTravel": "Non-Travel",
             "Department": "Sales", "EducationField": "Marketing", "Gender": "Male",
             "JobRole": "Manager", "MonthlyIncome": 10000, "TotalWorkingYears": 9, "Zeta": 1},
            {"YearsAtCompany": 5, "Age": 41, "Attrition": "Yes", "BusinessTravel": "Non-Travel",
             "Department": "Sales", "EducationField": "Medical", "Gender": "Female",
             "JobRole": "Manager", "MonthlyIncome": 12000, "TotalWorkingYears": 15, "Zeta": 2,
             "Extra": "late"}
        ]"#;
        let path = write_file(&dir, "EA.json", json);
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.column_names[0], "YearsAtCompany");
        assert_eq!(ds.column_names[1], "Age");
        assert_eq!(ds.column_names[10], "Zeta");
        assert_eq!(ds.column_names[11], "Extra");
        assert_eq!(ds.records[0].cells[11], CellValue::Null);
        assert_eq!(ds.records[1].cells[11], CellValue::String("late".into()));
        assert_eq!(ds.records[1].years_at_company, 5.0);
    }

    fn write_parquet(dir: &TempDir, columns: Vec<(&str, ArrayRef)>) -> PathBuf {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));
        let arrays = columns.into_iter().map(|(_, array)| array).collect();
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let path = dir.path().join("EA.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn parquet_columns() -> Vec<(&'static str, ArrayRef)> {
        use arrow::array::{BooleanArray, Float64Array, Int32Array, Int64Array, StringArray};

        let text = |a: &str, b: &str| -> ArrayRef { Arc::new(StringArray::from(vec![a, b])) };
        vec![
            ("Age", Arc::new(Int32Array::from(vec![41, 29])) as ArrayRef),
            ("Attrition", text("Yes", "No")),
            ("BusinessTravel", text("Travel_Rarely", "Non-Travel")),
            ("Department", text("Sales", "Research & Development")),
            ("EducationField", text("Life Sciences", "Medical")),
            ("Gender", text("Female", "Male")),
            ("JobRole", text("Sales Executive", "Research Scientist")),
            ("MonthlyIncome", Arc::new(Float64Array::from(vec![5993.5, 3100.0])) as ArrayRef),
            ("TotalWorkingYears", Arc::new(Int64Array::from(vec![8_i64, 4])) as ArrayRef),
            ("YearsAtCompany", Arc::new(Int64Array::from(vec![6_i64, 2])) as ArrayRef),
            ("Remote", Arc::new(BooleanArray::from(vec![Some(true), None])) as ArrayRef),
        ]
    }

    #[test]
    fn test_load_parquet() {
        let dir = TempDir::new().unwrap();
        let path = write_parquet(&dir, parquet_columns());
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names.len(), 11);
        assert_eq!(ds.column_names[0], "Age");
        assert_eq!(ds.records[0].age, 41);
        assert_eq!(ds.records[1].department, "Research & Development");
        assert_eq!(ds.records[0].monthly_income, 5993.5);
        assert_eq!(ds.records[1].total_working_years, 4.0);
        assert_eq!(ds.records[0].cells[0], CellValue::Integer(41));
        assert_eq!(ds.records[0].cells[10], CellValue::Bool(true));
        assert_eq!(ds.records[1].cells[10], CellValue::Null);
    }

    #[test]
    fn test_parquet_narrow_and_dictionary_columns_are_decoded() {
        use arrow::array::{DictionaryArray, Int16Array, UInt8Array};

        let mut columns = parquet_columns();
        let department: DictionaryArray<Int32Type> =
            vec!["Sales", "Research & Development"].into_iter().collect();
        columns[3].1 = Arc::new(department) as ArrayRef;
        columns[8].1 = Arc::new(Int16Array::from(vec![8_i16, 4])) as ArrayRef;
        columns[9].1 = Arc::new(UInt8Array::from(vec![6_u8, 2])) as ArrayRef;

        let dir = TempDir::new().unwrap();
        let path = write_parquet(&dir, columns);
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.records[0].department, "Sales");
        assert_eq!(ds.records[1].department, "Research & Development");
        assert_eq!(ds.records[0].total_working_years, 8.0);
        assert_eq!(ds.records[1].years_at_company, 2.0);
        assert_eq!(ds.records[0].cells[9], CellValue::Integer(6));
    }

    #[test]
    fn test_parquet_unsupported_column_type_is_named() {
        use arrow::array::Date32Array;

        let mut columns = parquet_columns();
        columns.push(("HireDate", Arc::new(Date32Array::from(vec![19000, 19001])) as ArrayRef));

        let dir = TempDir::new().unwrap();
        let path = write_parquet(&dir, columns);
        let err = load_file(&path).unwrap_err();
        assert!(
            matches!(&err, LoadError::UnsupportedColumnType { column, .. } if column == "HireDate"),
            "got {err:?}"
        );
    }

    #[test]
    fn test_json_must_be_array() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "EA.json", r#"{"Age": 30}"#);
        assert!(matches!(load_file(&path), Err(LoadError::NotAnArray)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn test_missing_column_detected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "EA.csv", "Age,Department\n30,Sales\n");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(_)));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let dir = TempDir::new().unwrap();
        let mut text = CSV.to_string();
        text.push_str("30,No\n");
        let path = write_file(&dir, "EA.csv", &text);
        assert!(matches!(load_file(&path), Err(LoadError::Csv { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("employees.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn test_cache_does_not_reread() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "EA.csv", CSV);
        let mut cache = DatasetCache::default();

        let first = cache.get_or_load(&path).unwrap();
        // Replace the file with garbage: a cached load must not notice.
        write_file(&dir, "EA.csv", "not,a,valid,dataset\n");
        let second = cache.get_or_load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_does_not_store_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("EA.csv");
        let mut cache = DatasetCache::default();
        assert!(cache.get_or_load(&path).is_err());
        assert_eq!(cache.len(), 0);

        write_file(&dir, "EA.csv", CSV);
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 3);
    }
}
