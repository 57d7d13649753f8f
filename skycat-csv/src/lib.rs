//! CSV-backed column provider for skycat catalogs.
//!
//! Reads a delimited text file into a [`CatalogSource`]: the schema is
//! inferred with `arrow::csv`, numeric columns are coerced to `Float64`
//! catalog columns, and non-numeric columns are skipped. The result is an
//! ordinary lazy catalog; only the file scan itself is eager.
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::csv::reader::{Format, ReaderBuilder};
use arrow::datatypes::DataType;
use skycat_catalog::CatalogSource;
use skycat_result::{Error, Result};

/// Options controlling how a CSV catalog is read.
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    pub has_header: bool,
    pub delimiter: u8,
    /// Rows examined for schema inference; `None` scans the whole file.
    pub max_read_records: Option<usize>,
    /// Restrict the catalog to these columns; `None` keeps every numeric
    /// column in the file.
    pub projection: Option<Vec<String>>,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            max_read_records: Some(1024),
            projection: None,
        }
    }
}

impl CsvReadOptions {
    fn to_format(&self) -> Format {
        let mut format = Format::default().with_header(self.has_header);
        if self.delimiter != b',' {
            format = format.with_delimiter(self.delimiter);
        }
        format
    }
}

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}

/// Read a CSV file into a catalog of rank-1 `Float64` columns.
///
/// Fails with `NotFound` if the projection names a column the file does
/// not have, and with `InvalidArgumentError` if no numeric column
/// survives.
pub fn read_csv_catalog(path: impl AsRef<Path>, options: &CsvReadOptions) -> Result<CatalogSource> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let format = options.to_format();
    let (schema, _) = format
        .infer_schema(&mut file, options.max_read_records)
        .map_err(Error::from)?;
    file.seek(SeekFrom::Start(0))?;

    if let Some(projection) = &options.projection {
        for name in projection {
            if schema.field_with_name(name).is_err() {
                return Err(Error::not_found(name.clone()));
            }
        }
    }

    let reader = ReaderBuilder::new(Arc::new(schema.clone()))
        .with_format(format)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let mut columns: Vec<(String, ArrayRef)> = Vec::new();
    for (idx, field) in schema.fields().iter().enumerate() {
        let wanted = options
            .projection
            .as_ref()
            .is_none_or(|p| p.iter().any(|name| name == field.name()));
        if !wanted {
            continue;
        }
        if !is_numeric(field.data_type()) {
            tracing::debug!(column = %field.name(), data_type = ?field.data_type(),
                "skipping non-numeric CSV column");
            continue;
        }
        let parts: Vec<ArrayRef> = batches.iter().map(|b| b.column(idx).clone()).collect();
        let array = if parts.is_empty() {
            arrow::array::new_empty_array(field.data_type())
        } else {
            let refs: Vec<&dyn arrow::array::Array> =
                parts.iter().map(|p| p.as_ref()).collect();
            arrow::compute::concat(&refs)?
        };
        let array = arrow::compute::cast(&array, &DataType::Float64)?;
        columns.push((field.name().clone(), array));
    }

    if columns.is_empty() {
        return Err(Error::InvalidArgumentError(format!(
            "{} contains no numeric columns to load",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), columns = columns.len(), "loaded CSV catalog");
    CatalogSource::from_arrays(columns)
}
