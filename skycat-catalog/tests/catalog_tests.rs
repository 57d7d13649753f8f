use arrow::array::{Array, ArrayRef, BooleanArray, FixedSizeListArray, Float64Array};
use skycat_catalog::{CatalogSource, RowSelection, UniformCatalog};
use skycat_lazy::LazyValue;
use skycat_result::Error;

fn f64_values(array: &ArrayRef) -> Vec<f64> {
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("float column")
        .values()
        .to_vec()
}

fn bool_values(array: &ArrayRef) -> Vec<bool> {
    let array = array
        .as_any()
        .downcast_ref::<BooleanArray>()
        .expect("boolean column");
    (0..array.len()).map(|i| array.value(i)).collect()
}

fn vector_rows(array: &ArrayRef) -> Vec<Vec<f64>> {
    let list = array
        .as_any()
        .downcast_ref::<FixedSizeListArray>()
        .expect("vector column");
    (0..list.len())
        .map(|i| {
            let row = list.value(i);
            row.as_any()
                .downcast_ref::<Float64Array>()
                .expect("float rows")
                .values()
                .to_vec()
        })
        .collect()
}

#[test]
fn assignment_roundtrips_through_compute() {
    let mut cat = CatalogSource::new(4);
    cat.set("Mass", vec![1.0, 2.0, 3.0, 4.0]).expect("set");

    assert!(cat.contains("Mass"));
    let out = cat.compute(&cat.get("Mass").expect("get")).expect("compute");
    assert_eq!(f64_values(&out), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn scalar_assignment_broadcasts_to_size() {
    let mut cat = CatalogSource::new(5);
    cat.set("Weight", 0.25).expect("set scalar");

    let out = cat.compute(&cat.get("Weight").expect("get")).expect("compute");
    assert_eq!(f64_values(&out), vec![0.25; 5]);
}

#[test]
fn defaults_are_present_and_canonical() {
    let cat = CatalogSource::new(3);

    assert!(cat.contains("Selection"));
    assert!(cat.contains("Weight"));
    assert!(cat.contains("Value"));

    let selection = cat.compute(&cat.get("Selection").unwrap()).unwrap();
    assert_eq!(bool_values(&selection), vec![true; 3]);

    let weight = cat.compute(&cat.get("Weight").unwrap()).unwrap();
    assert_eq!(f64_values(&weight), vec![1.0; 3]);
}

#[test]
fn unknown_column_is_not_found() {
    let cat = CatalogSource::new(3);
    assert!(matches!(cat.get("Position"), Err(Error::NotFound(_))));
}

#[test]
fn mask_selection_is_lazy_and_exact() {
    let mut cat = CatalogSource::new(4);
    cat.set("Mass", vec![10.0, 20.0, 30.0, 40.0]).unwrap();

    let mask = BooleanArray::from(vec![true, false, true, false]);
    let sub = cat.select_mask(&mask).expect("mask select");

    assert_eq!(sub.size(), 2);
    let sub_mass = sub.compute(&sub.get("Mass").unwrap()).unwrap();
    assert_eq!(f64_values(&sub_mass), vec![10.0, 30.0]);

    // The default selection mask re-synthesizes at the reduced size.
    let sub_sel = sub.compute(&sub.get("Selection").unwrap()).unwrap();
    assert_eq!(bool_values(&sub_sel), vec![true, true]);
}

#[test]
fn mask_of_wrong_length_is_rejected_eagerly() {
    let cat = CatalogSource::new(4);
    let mask = BooleanArray::from(vec![true, false]);
    assert!(matches!(
        cat.select_mask(&mask),
        Err(Error::LengthMismatch { expected: 4, got: 2 })
    ));
}

#[test]
fn scalar_row_selection_is_unsupported() {
    let mut cat = CatalogSource::new(4);
    cat.set("Mass", vec![1.0, 2.0, 3.0, 4.0]).unwrap();

    assert!(matches!(
        cat.select(RowSelection::Scalar(2)),
        Err(Error::InvalidIndex(_))
    ));

    // A length-one index sequence is the supported spelling.
    let one = cat.take_rows(&[2]).expect("take one row");
    assert_eq!(one.size(), 1);
    let mass = one.compute(&one.get("Mass").unwrap()).unwrap();
    assert_eq!(f64_values(&mass), vec![3.0]);
}

#[test]
fn out_of_range_indices_are_rejected() {
    let cat = CatalogSource::new(4);
    assert!(matches!(
        cat.take_rows(&[0, 4]),
        Err(Error::InvalidIndex(_))
    ));
}

#[test]
fn slice_selection_keeps_a_contiguous_range() {
    let mut cat = CatalogSource::new(5);
    cat.set("Mass", vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

    let sub = cat.slice(1..4).expect("slice");
    assert_eq!(sub.size(), 3);
    let mass = sub.compute(&sub.get("Mass").unwrap()).unwrap();
    assert_eq!(f64_values(&mass), vec![2.0, 3.0, 4.0]);
}

#[test]
fn selection_shares_nodes_but_not_bindings() {
    let mut cat = CatalogSource::new(3);
    cat.set("Mass", vec![1.0, 2.0, 3.0]).unwrap();
    let sub = cat.take_rows(&[0, 2]).unwrap();

    // Rebinding a name on the original must not affect the subset, which
    // still references the old node.
    cat.set("Mass", vec![9.0, 9.0, 9.0]).unwrap();
    let mass = sub.compute(&sub.get("Mass").unwrap()).unwrap();
    assert_eq!(f64_values(&mass), vec![1.0, 3.0]);
}

#[test]
fn assignment_order_is_preserved() {
    // size=5, Position and Velocity all-ones 3-vectors; after
    // Velocity = Position + Velocity then Position = Position + Velocity,
    // Velocity materializes to all-2 rows and Position to all-3 rows.
    let mut cat = CatalogSource::new(5);
    cat.set("Position", LazyValue::from_vector_rows(vec![1.0; 15], 3).unwrap())
        .unwrap();
    cat.set("Velocity", LazyValue::from_vector_rows(vec![1.0; 15], 3).unwrap())
        .unwrap();

    let sum = cat
        .get("Position")
        .unwrap()
        .add(&cat.get("Velocity").unwrap())
        .unwrap();
    cat.set("Velocity", sum).unwrap();

    let sum = cat
        .get("Position")
        .unwrap()
        .add(&cat.get("Velocity").unwrap())
        .unwrap();
    cat.set("Position", sum).unwrap();

    let velocity = cat.compute(&cat.get("Velocity").unwrap()).unwrap();
    for row in vector_rows(&velocity) {
        assert_eq!(row, vec![2.0, 2.0, 2.0]);
    }
    let position = cat.compute(&cat.get("Position").unwrap()).unwrap();
    for row in vector_rows(&position) {
        assert_eq!(row, vec![3.0, 3.0, 3.0]);
    }
}

#[test]
fn column_projection_keeps_requested_and_defaults() {
    let cat = UniformCatalog::new(96, 100.0, 3).expect("uniform catalog");
    assert_eq!(cat.size(), 96);

    let sub = cat.project(&["Position", "Mass"]).expect("project");
    assert_eq!(sub.size(), 96);
    assert_eq!(
        sub.columns(),
        vec!["Mass", "Position", "Selection", "Weight", "Value"]
    );
    assert!(!sub.contains("Velocity"));
    assert!(sub.contains("Selection"));
}

#[test]
fn projection_of_unknown_column_fails() {
    let cat = UniformCatalog::new(8, 100.0, 3).unwrap();
    assert!(matches!(
        cat.project(&["Position", "Spin"]),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn projection_carries_attrs() {
    let cat = UniformCatalog::new(8, 100.0, 3).unwrap();
    let sub = cat.project(&["Mass"]).unwrap();
    assert_eq!(sub.attrs().get("BoxSize"), cat.attrs().get("BoxSize"));
}

#[test]
fn compute_many_matches_individual_computation() {
    let mut cat = CatalogSource::new(3);
    cat.set("A", vec![1.0, 2.0, 3.0]).unwrap();
    cat.set("B", vec![4.0, 5.0, 6.0]).unwrap();

    let a = cat.get("A").unwrap();
    let b = cat.get("B").unwrap();
    let out = cat.compute_many(&[a.clone(), b.clone()]).expect("compute many");
    assert_eq!(out.len(), 2);
    assert_eq!(f64_values(&out[0]), f64_values(&cat.compute(&a).unwrap()));
    assert_eq!(f64_values(&out[1]), f64_values(&cat.compute(&b).unwrap()));
}

#[test]
fn masks_can_be_derived_from_columns() {
    let mut cat = CatalogSource::new(4);
    cat.set("Mass", vec![1.0, 10.0, 3.0, 20.0]).unwrap();

    // Build a lazy mask from a column comparison, materialize it, then
    // use it to subset the catalog.
    let heavy = cat.get("Mass").unwrap().gt_scalar(5.0).unwrap();
    let mask = cat.compute(&heavy).unwrap();
    let mask = mask
        .as_any()
        .downcast_ref::<BooleanArray>()
        .expect("boolean mask")
        .clone();

    let sub = cat.select_mask(&mask).unwrap();
    assert_eq!(sub.size(), 2);
    let mass = sub.compute(&sub.get("Mass").unwrap()).unwrap();
    assert_eq!(f64_values(&mass), vec![10.0, 20.0]);
}

#[test]
fn null_bearing_columns_are_rejected_at_assignment() {
    use std::sync::Arc;
    let mut cat = CatalogSource::new(3);
    let with_nulls: ArrayRef = Arc::new(Float64Array::from(vec![Some(1.0), None, Some(3.0)]));
    assert!(matches!(
        cat.set("x", with_nulls),
        Err(Error::InvalidArgumentError(_))
    ));

    // The graph never sees the nulls, so no derived value can fabricate
    // numbers for the missing rows.
    assert!(!cat.contains("x"));
}

#[test]
fn from_arrays_requires_consistent_lengths() {
    use std::sync::Arc;
    let a: ArrayRef = Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0]));
    let b: ArrayRef = Arc::new(Float64Array::from(vec![1.0, 2.0]));
    let err = CatalogSource::from_arrays(vec![("A".to_string(), a), ("B".to_string(), b)])
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 3, got: 2 }));
}
