use std::io::Write;

use arrow::array::{Array, ArrayRef, Float64Array};
use skycat_csv::{read_csv_catalog, CsvReadOptions};
use skycat_result::Error;

fn f64_values(array: &ArrayRef) -> Vec<f64> {
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("float column")
        .values()
        .to_vec()
}

fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

#[test]
fn reads_numeric_columns_as_a_catalog() {
    let file = write_fixture("ra,dec,z\n10.0,-5.0,0.1\n20.0,2.5,0.2\n30.0,0.0,0.3\n");

    let cat = read_csv_catalog(file.path(), &CsvReadOptions::default()).expect("read");
    assert_eq!(cat.size(), 3);
    assert!(cat.contains("ra"));
    assert!(cat.contains("Selection"));

    let z = cat.compute(&cat.get("z").unwrap()).unwrap();
    assert_eq!(f64_values(&z), vec![0.1, 0.2, 0.3]);
}

#[test]
fn integer_columns_are_coerced_to_float() {
    let file = write_fixture("id,x\n1,1.5\n2,2.5\n");

    let cat = read_csv_catalog(file.path(), &CsvReadOptions::default()).unwrap();
    let id = cat.compute(&cat.get("id").unwrap()).unwrap();
    assert_eq!(f64_values(&id), vec![1.0, 2.0]);
}

#[test]
fn non_numeric_columns_are_skipped() {
    let file = write_fixture("name,x\nngc1275,1.0\nm87,2.0\n");

    let cat = read_csv_catalog(file.path(), &CsvReadOptions::default()).unwrap();
    assert!(!cat.contains("name"));
    assert!(cat.contains("x"));
}

#[test]
fn projection_restricts_and_validates_names() {
    let file = write_fixture("ra,dec,z\n1.0,2.0,0.1\n");

    let options = CsvReadOptions {
        projection: Some(vec!["ra".into(), "z".into()]),
        ..CsvReadOptions::default()
    };
    let cat = read_csv_catalog(file.path(), &options).unwrap();
    assert!(cat.contains("ra"));
    assert!(!cat.contains("dec"));

    let options = CsvReadOptions {
        projection: Some(vec!["missing".into()]),
        ..CsvReadOptions::default()
    };
    assert!(matches!(
        read_csv_catalog(file.path(), &options),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn custom_delimiter() {
    let file = write_fixture("x;y\n1.0;2.0\n");

    let options = CsvReadOptions {
        delimiter: b';',
        ..CsvReadOptions::default()
    };
    let cat = read_csv_catalog(file.path(), &options).unwrap();
    assert_eq!(cat.size(), 1);
    let y = cat.compute(&cat.get("y").unwrap()).unwrap();
    assert_eq!(f64_values(&y), vec![2.0]);
}

#[test]
fn rows_with_missing_fields_are_rejected() {
    // The empty field parses as a null, which cannot enter a catalog
    // column.
    let file = write_fixture("x,y\n1.0,2.0\n3.0,\n");
    assert!(matches!(
        read_csv_catalog(file.path(), &CsvReadOptions::default()),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn missing_file_surfaces_io_error() {
    assert!(matches!(
        read_csv_catalog("/definitely/not/here.csv", &CsvReadOptions::default()),
        Err(Error::Io(_))
    ));
}
