use crate::error::{IoError, ModelError};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use ndarray::Array2;
use std::io::Read;
use std::path::Path;

/// Values of one table column.
///
/// # Variants
///
/// - `Numeric` - Every non-empty cell parsed as a number; empty cells are stored as NaN
/// - `Text` - Any other column, cells kept verbatim (after trimming)
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    /// Infers the column type from raw cells.
    ///
    /// A column is numeric when every non-empty cell parses as `f64` and it has at
    /// least one non-empty cell. A column without any cells is numeric as well.
    pub fn infer(cells: Vec<String>) -> Self {
        let mut has_value = false;
        let mut parsed = Vec::with_capacity(cells.len());

        for cell in &cells {
            if cell.is_empty() {
                parsed.push(f64::NAN);
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) => {
                    has_value = true;
                    parsed.push(v);
                }
                Err(_) => return ColumnData::Text(cells),
            }
        }

        if has_value || cells.is_empty() {
            ColumnData::Numeric(parsed)
        } else {
            ColumnData::Text(cells)
        }
    }

    /// Number of cells in the column
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    /// Returns `true` if the column has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named table column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Tabular telemetry loaded from CSV.
///
/// Keeps the original column order. Numeric columns feed the clustering pipeline,
/// the remaining columns (for example a split label) are kept for reporting.
///
/// # Example
/// ```rust
/// use deepcluster::dataset::TelemetryTable;
///
/// let csv = "throughput,latency,split_type\n1.5,20,uplink\n2.5,,downlink\n";
/// let table = TelemetryTable::from_reader(csv.as_bytes()).unwrap();
///
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.numeric_feature_names(), vec!["throughput", "latency"]);
/// assert!(table.numeric_column("latency").unwrap()[1].is_nan());
/// assert_eq!(table.text_column("split_type").unwrap(), &["uplink", "downlink"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl TelemetryTable {
    /// Builds a table from columns of equal length.
    ///
    /// # Returns
    ///
    /// - `Ok(TelemetryTable)` - The table
    /// - `Err(ModelError::InputValidationError)` - If lengths differ or a column name repeats
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, ModelError> {
        let n_rows = columns.first().map_or(0, |c| c.data.len());

        for (i, column) in columns.iter().enumerate() {
            if column.data.len() != n_rows {
                return Err(ModelError::InputValidationError(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.data.len(),
                    n_rows
                )));
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(ModelError::InputValidationError(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }

        Ok(TelemetryTable { columns, n_rows })
    }

    /// Reads a table from CSV with a header row.
    ///
    /// # Parameters
    ///
    /// * `reader` - CSV source
    ///
    /// # Returns
    ///
    /// - `Ok(TelemetryTable)` - The table, column types inferred per column
    /// - `Err(IoError::CsvError)` - Malformed CSV, including rows with a different field count
    /// - `Err(IoError::Model)` - Duplicate column names
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, IoError> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        debug!("CSV headers: {:?}", headers);

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column {
                name,
                data: ColumnData::infer(cells),
            })
            .collect();

        Ok(Self::from_columns(columns)?)
    }

    /// Reads a table from a CSV file.
    pub fn from_csv_path(path: &Path) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        let table = Self::from_reader(reader)?;

        info!(
            "loaded {} rows x {} columns from {}",
            table.n_rows,
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// All columns in file order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in file order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the values of a numeric column, `None` if absent or not numeric
    pub fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Text(_) => None,
        }
    }

    /// Returns the cells of a text column, `None` if absent or numeric
    pub fn text_column(&self, name: &str) -> Option<&[String]> {
        match &self.column(name)?.data {
            ColumnData::Text(values) => Some(values),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Names of the numeric columns, in file order
    pub fn numeric_feature_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| matches!(c.data, ColumnData::Numeric(_)))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Checks that every named column exists.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - All present
    /// - `Err(ModelError::InputValidationError)` - Listing every missing column
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<(), ModelError> {
        let missing: Vec<&str> = names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| self.column(name).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(ModelError::InputValidationError(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Stacks numeric columns into a matrix, one row per table row.
    ///
    /// # Parameters
    ///
    /// * `names` - Columns to stack, in output column order
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f64>)` - Matrix with shape (n_rows, names.len())
    /// - `Err(ModelError::InputValidationError)` - If a column is missing or is not numeric
    pub fn numeric_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<Array2<f64>, ModelError> {
        self.require_columns(names)?;

        let mut selected: Vec<&[f64]> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let values = self.numeric_column(name).ok_or_else(|| {
                ModelError::InputValidationError(format!("column '{}' is not numeric", name))
            })?;
            selected.push(values);
        }

        Ok(Array2::from_shape_fn(
            (self.n_rows, selected.len()),
            |(r, c)| selected[c][r],
        ))
    }

    /// Stacks every numeric column, in file order.
    ///
    /// # Returns
    ///
    /// * `(Vec<String>, Array2<f64>)` - The selected column names and the matrix
    pub fn select_numeric(&self) -> (Vec<String>, Array2<f64>) {
        let names: Vec<String> = self
            .numeric_feature_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let selected: Vec<&[f64]> = names
            .iter()
            .filter_map(|name| self.numeric_column(name))
            .collect();
        let matrix = Array2::from_shape_fn((self.n_rows, selected.len()), |(r, c)| selected[c][r]);
        (names, matrix)
    }
}
