use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array};
use skycat_catalog::{concatenate_sources, AttrValue, CatalogSource};
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

fn catalog(masses: Vec<f64>) -> CatalogSource {
    let mut cat = CatalogSource::new(masses.len());
    cat.set("Mass", masses).expect("set Mass");
    cat
}

#[test]
fn sizes_add_and_rows_keep_argument_order() {
    let a = catalog(vec![1.0, 2.0]);
    let b = catalog(vec![3.0, 4.0, 5.0]);

    let joined = concatenate_sources(&[&a, &b]).expect("concatenate");
    assert_eq!(joined.size(), a.size() + b.size());

    let mass = joined.compute(&joined.get("Mass").unwrap()).unwrap();
    assert_eq!(f64_values(&mass), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn partial_columns_are_excluded() {
    let mut a = catalog(vec![1.0, 2.0]);
    a.set("Spin", vec![0.1, 0.2]).unwrap();
    let b = catalog(vec![3.0]);

    let joined = concatenate_sources(&[&a, &b]).unwrap();
    assert!(joined.contains("Mass"));
    assert!(!joined.contains("Spin"));
}

#[test]
fn disjoint_sources_are_incompatible() {
    let mut a = CatalogSource::new(2);
    a.set("Mass", vec![1.0, 2.0]).unwrap();
    let mut b = CatalogSource::new(2);
    b.set("Spin", vec![0.1, 0.2]).unwrap();

    assert!(matches!(
        concatenate_sources(&[&a, &b]),
        Err(Error::IncompatibleSources(_))
    ));
}

#[test]
fn attrs_are_first_source_wins() {
    let mut a = catalog(vec![1.0]);
    a.attrs_mut().insert("BoxSize".into(), AttrValue::Float(100.0));
    let mut b = catalog(vec![2.0]);
    b.attrs_mut().insert("BoxSize".into(), AttrValue::Float(999.0));

    let joined = concatenate_sources(&[&a, &b]).unwrap();
    assert_eq!(joined.attrs().get("BoxSize"), Some(&AttrValue::Float(100.0)));
}

#[test]
fn frozen_selection_concatenates_per_source_resolutions() {
    // a overrides the Selection default; b leaves it synthesized. The
    // concatenation must glue a's explicit mask to b's all-true default.
    let mut a = catalog(vec![1.0, 2.0]);
    a.set("Selection", LazyValue::from_bools(vec![true, false]))
        .unwrap();
    let b = catalog(vec![3.0, 4.0, 5.0]);

    let joined = concatenate_sources(&[&a, &b]).unwrap();
    let selection = joined.compute(&joined.get("Selection").unwrap()).unwrap();
    let selection = selection
        .as_any()
        .downcast_ref::<BooleanArray>()
        .expect("boolean column");
    let values: Vec<bool> = (0..selection.len()).map(|i| selection.value(i)).collect();
    assert_eq!(values, vec![true, false, true, true, true]);
}

#[test]
fn untouched_defaults_stay_synthesized() {
    let a = catalog(vec![1.0]);
    let b = catalog(vec![2.0]);

    let joined = concatenate_sources(&[&a, &b]).unwrap();
    let weight = joined.compute(&joined.get("Weight").unwrap()).unwrap();
    assert_eq!(f64_values(&weight), vec![1.0, 1.0]);
}

#[test]
fn concatenation_of_zero_sources_is_invalid() {
    assert!(matches!(
        concatenate_sources(&[]),
        Err(Error::InvalidArgumentError(_))
    ));
}

#[test]
fn three_way_concatenation() {
    let a = catalog(vec![1.0]);
    let b = catalog(vec![2.0]);
    let c = catalog(vec![3.0]);

    let joined = concatenate_sources(&[&a, &b, &c]).unwrap();
    assert_eq!(joined.size(), 3);
    let mass = joined.compute(&joined.get("Mass").unwrap()).unwrap();
    assert_eq!(f64_values(&mass), vec![1.0, 2.0, 3.0]);
}
