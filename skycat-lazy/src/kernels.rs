//! Concrete-array kernels used by graph evaluation.
//!
//! Everything here operates on already-materialized Arrow arrays. Rank-1
//! float columns are `Float64Array`, boolean columns are `BooleanArray`,
//! and `(n, k)` vector columns are `FixedSizeListArray` with a `Float64`
//! child. Arithmetic and comparisons delegate to `arrow::compute`; vector
//! operands are handled by operating on the flat child array and rebuilding
//! the list.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, FixedSizeListArray, UInt64Array};
use arrow::compute::kernels::cmp;
use arrow::compute::{cast, kernels::numeric};
use arrow::datatypes::{DataType, Field};
use skycat_result::{Error, Result};

use crate::value::{BinaryOp, CompareOp, UnaryOp};

pub(crate) fn as_f64(array: &ArrayRef) -> Result<&Float64Array> {
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| Error::Internal(format!("expected Float64 array, got {:?}", array.data_type())))
}

#[cfg(test)]
pub(crate) fn as_bool(array: &ArrayRef) -> Result<&BooleanArray> {
    array
        .as_any()
        .downcast_ref::<BooleanArray>()
        .ok_or_else(|| Error::Internal(format!("expected Boolean array, got {:?}", array.data_type())))
}

pub(crate) fn as_vector(array: &ArrayRef) -> Result<&FixedSizeListArray> {
    array
        .as_any()
        .downcast_ref::<FixedSizeListArray>()
        .ok_or_else(|| {
            Error::Internal(format!(
                "expected FixedSizeList array, got {:?}",
                array.data_type()
            ))
        })
}

fn width_of(array: &ArrayRef) -> Option<usize> {
    match array.data_type() {
        DataType::FixedSizeList(_, n) => Some(*n as usize),
        _ => None,
    }
}

/// Build a `(n, width)` vector array over a flat row-major child.
pub(crate) fn build_vector(child: Float64Array, width: usize) -> Result<ArrayRef> {
    let field = Arc::new(Field::new("item", DataType::Float64, false));
    let list = FixedSizeListArray::try_new(field, width as i32, Arc::new(child), None)?;
    Ok(Arc::new(list))
}

/// Flat row-major child of a vector array, compacted if the list was built
/// over an offset child.
fn vector_child(list: &FixedSizeListArray) -> Result<ArrayRef> {
    let width = list.value_length() as usize;
    let child = list.values();
    if list.len() == 0 || (list.value_offset(0) == 0 && child.len() == list.len() * width) {
        return Ok(child.clone());
    }
    let child = as_f64(child)?;
    let start = list.value_offset(0) as usize;
    let flat =
        Float64Array::from_iter_values((0..list.len() * width).map(|i| child.value(start + i)));
    Ok(Arc::new(flat))
}

/// Coerce a caller-supplied source array into one of the supported layouts,
/// casting other numeric types to `Float64`.
///
/// Null-bearing arrays are rejected here, at the graph boundary: the
/// kernels operate on raw value buffers and carry no null mask, so a null
/// admitted as a source would silently turn into a fabricated value.
pub(crate) fn coerce_source(array: ArrayRef) -> Result<ArrayRef> {
    if array.null_count() > 0 {
        return Err(Error::InvalidArgumentError(format!(
            "source column contains {} null values; fill or drop them before \
             building a catalog column",
            array.null_count()
        )));
    }
    match array.data_type() {
        DataType::Float64 | DataType::Boolean => Ok(array),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32 => Ok(cast(&array, &DataType::Float64)?),
        DataType::FixedSizeList(field, width) => {
            // A list-level null count of zero says nothing about the child.
            let list = as_vector(&array)?;
            if list.values().null_count() > 0 {
                return Err(Error::InvalidArgumentError(format!(
                    "source column contains {} null elements; fill or drop \
                     them before building a catalog column",
                    list.values().null_count()
                )));
            }
            if field.data_type() == &DataType::Float64 {
                return Ok(array);
            }
            let child = cast(list.values(), &DataType::Float64)?;
            let child = as_f64(&child)?.clone();
            build_vector(child, *width as usize)
        }
        other => Err(Error::InvalidArgumentError(format!(
            "unsupported column type {other:?}; expected a numeric, boolean or \
             fixed-size-list-of-float array"
        ))),
    }
}

/// Repeat each element of a rank-1 column `width` times, aligning it with
/// the flat child of a vector operand.
fn expand_rows(flat: &Float64Array, width: usize) -> Float64Array {
    Float64Array::from_iter_values(
        flat.values()
            .iter()
            .flat_map(|v| std::iter::repeat_n(*v, width)),
    )
}

fn binary_flat(lhs: &ArrayRef, rhs: &ArrayRef, op: BinaryOp) -> Result<ArrayRef> {
    let out = match op {
        BinaryOp::Add => numeric::add(lhs, rhs)?,
        BinaryOp::Subtract => numeric::sub(lhs, rhs)?,
        BinaryOp::Multiply => numeric::mul(lhs, rhs)?,
        BinaryOp::Divide => numeric::div(lhs, rhs)?,
    };
    Ok(out)
}

/// Element-wise arithmetic with per-row broadcast between rank-1 and vector
/// operands.
pub(crate) fn compute_binary(lhs: &ArrayRef, rhs: &ArrayRef, op: BinaryOp) -> Result<ArrayRef> {
    match (width_of(lhs), width_of(rhs)) {
        (None, None) => binary_flat(lhs, rhs, op),
        (Some(k), None) => {
            let list = as_vector(lhs)?;
            let left = vector_child(list)?;
            let right: ArrayRef = Arc::new(expand_rows(as_f64(rhs)?, k));
            let child = binary_flat(&left, &right, op)?;
            build_vector(as_f64(&child)?.clone(), k)
        }
        (None, Some(k)) => {
            let list = as_vector(rhs)?;
            let left: ArrayRef = Arc::new(expand_rows(as_f64(lhs)?, k));
            let right = vector_child(list)?;
            let child = binary_flat(&left, &right, op)?;
            build_vector(as_f64(&child)?.clone(), k)
        }
        (Some(k), Some(_)) => {
            // Widths already validated equal at graph construction.
            let left = vector_child(as_vector(lhs)?)?;
            let right = vector_child(as_vector(rhs)?)?;
            let child = binary_flat(&left, &right, op)?;
            build_vector(as_f64(&child)?.clone(), k)
        }
    }
}

pub(crate) fn compute_compare(lhs: &ArrayRef, rhs: &ArrayRef, op: CompareOp) -> Result<ArrayRef> {
    let out = match op {
        CompareOp::Eq => cmp::eq(lhs, rhs)?,
        CompareOp::NotEq => cmp::neq(lhs, rhs)?,
        CompareOp::Lt => cmp::lt(lhs, rhs)?,
        CompareOp::LtEq => cmp::lt_eq(lhs, rhs)?,
        CompareOp::Gt => cmp::gt(lhs, rhs)?,
        CompareOp::GtEq => cmp::gt_eq(lhs, rhs)?,
    };
    Ok(Arc::new(out))
}

fn unary_flat(values: &Float64Array, op: UnaryOp) -> Float64Array {
    let apply = |v: f64| -> f64 {
        match op {
            UnaryOp::Neg => -v,
            UnaryOp::Abs => v.abs(),
            UnaryOp::Sqrt => v.sqrt(),
            UnaryOp::Sin => v.sin(),
            UnaryOp::Cos => v.cos(),
        }
    };
    Float64Array::from_iter_values(values.values().iter().map(|v| apply(*v)))
}

pub(crate) fn compute_unary(input: &ArrayRef, op: UnaryOp) -> Result<ArrayRef> {
    match width_of(input) {
        None => Ok(Arc::new(unary_flat(as_f64(input)?, op))),
        Some(k) => {
            let list = as_vector(input)?;
            let child = vector_child(list)?;
            build_vector(unary_flat(as_f64(&child)?, op), k)
        }
    }
}

pub(crate) fn compute_map(input: &ArrayRef, f: &(dyn Fn(f64) -> f64 + Send + Sync)) -> Result<ArrayRef> {
    match width_of(input) {
        None => {
            let values = as_f64(input)?;
            Ok(Arc::new(Float64Array::from_iter_values(
                values.values().iter().map(|v| f(*v)),
            )))
        }
        Some(k) => {
            let list = as_vector(input)?;
            let child = vector_child(list)?;
            let child = as_f64(&child)?;
            build_vector(
                Float64Array::from_iter_values(child.values().iter().map(|v| f(*v))),
                k,
            )
        }
    }
}

pub(crate) fn filter_array(input: &ArrayRef, mask: &BooleanArray) -> Result<ArrayRef> {
    Ok(arrow::compute::filter(input.as_ref(), mask)?)
}

pub(crate) fn take_array(input: &ArrayRef, indices: &UInt64Array) -> Result<ArrayRef> {
    Ok(arrow::compute::take(input.as_ref(), indices, None)?)
}

pub(crate) fn concat_arrays(parts: &[ArrayRef]) -> Result<ArrayRef> {
    let refs: Vec<&dyn Array> = parts.iter().map(|p| p.as_ref()).collect();
    Ok(arrow::compute::concat(&refs)?)
}

/// Interleave k rank-1 columns of equal length into a `(len, k)` vector
/// array: flat index `i * k + j` holds element i of column j.
pub(crate) fn stack_arrays(parts: &[ArrayRef]) -> Result<ArrayRef> {
    let width = parts.len();
    let columns: Vec<&Float64Array> = parts
        .iter()
        .map(as_f64)
        .collect::<Result<Vec<_>>>()?;
    let len = columns.first().map(|c| c.len()).unwrap_or(0);
    let mut flat = Vec::with_capacity(len * width);
    for i in 0..len {
        for column in &columns {
            flat.push(column.value(i));
        }
    }
    build_vector(Float64Array::from(flat), width)
}

/// Extract component `index` of each row of a vector array.
pub(crate) fn component_array(input: &ArrayRef, index: usize) -> Result<ArrayRef> {
    let list = as_vector(input)?;
    let child = as_f64(list.values())?;
    let out = Float64Array::from_iter_values(
        (0..list.len()).map(|i| child.value(list.value_offset(i) as usize + index)),
    );
    Ok(Arc::new(out))
}

/// Materialized form of a lazily broadcast float scalar.
pub(crate) fn fill_f64(value: f64, len: usize) -> ArrayRef {
    Arc::new(Float64Array::from(vec![value; len]))
}

/// Materialized form of a lazily broadcast boolean scalar.
pub(crate) fn fill_bool(value: bool, len: usize) -> ArrayRef {
    Arc::new(BooleanArray::from(vec![value; len]))
}
