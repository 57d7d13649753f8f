//! Lazy array values and the graph nodes behind them.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, UInt64Array};
use arrow::datatypes::{DataType, Field};
use skycat_result::{Error, Result};

use crate::kernels;

/// Element-wise binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Element-wise comparison operators producing boolean values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Element-wise unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Abs,
    Sqrt,
    Sin,
    Cos,
}

/// Scalar fill value for lazily broadcast columns.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FillValue {
    Float(f64),
    Bool(bool),
}

/// A node in the deferred computation graph.
///
/// Nodes are immutable once built; a node never changes after another node
/// starts referencing it.
pub(crate) enum Node {
    /// A concrete seed array.
    Source(ArrayRef),
    /// A scalar broadcast to `len` rows, filled only at materialization.
    Full { value: FillValue, len: usize },
    Binary {
        op: BinaryOp,
        lhs: LazyValue,
        rhs: LazyValue,
    },
    Compare {
        op: CompareOp,
        lhs: LazyValue,
        rhs: LazyValue,
    },
    Unary {
        op: UnaryOp,
        input: LazyValue,
    },
    /// Element-wise application of an opaque scalar function. This is the
    /// collaborator seam: e.g. a cosmology's comoving-distance function
    /// applied to a redshift column.
    Map {
        input: LazyValue,
        f: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    },
    /// Boolean-mask row selection; the mask is concrete and validated
    /// against the input length at construction.
    Filter {
        input: LazyValue,
        mask: BooleanArray,
    },
    /// Ordered integer row selection; indices validated in-range at
    /// construction.
    Take {
        input: LazyValue,
        indices: UInt64Array,
    },
    /// Row-wise concatenation of same-typed inputs.
    Concat { parts: Vec<LazyValue> },
    /// Column-wise stacking of rank-1 inputs into a `(len, k)` vector value.
    Stack { parts: Vec<LazyValue> },
    /// Column `index` of a `(len, k)` vector value, as a rank-1 value.
    Component { input: LazyValue, index: usize },
}

/// An opaque deferred array: a handle to a computation-graph node plus the
/// structural facts (row count, element type) known without evaluating it.
///
/// Cloning a `LazyValue` is cheap; clones share the underlying node.
/// Concrete data only exists after [`LazyValue::materialize`].
#[derive(Clone)]
pub struct LazyValue {
    pub(crate) node: Arc<Node>,
    len: usize,
    data_type: DataType,
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue")
            .field("len", &self.len)
            .field("data_type", &self.data_type)
            .finish()
    }
}

/// Arrow type of a `(n, width)` float vector value.
pub(crate) fn vector_type(width: usize) -> DataType {
    DataType::FixedSizeList(
        Arc::new(Field::new("item", DataType::Float64, false)),
        width as i32,
    )
}

fn width_of(data_type: &DataType) -> Option<usize> {
    match data_type {
        DataType::FixedSizeList(_, n) => Some(*n as usize),
        _ => None,
    }
}

impl LazyValue {
    fn new(node: Node, len: usize, data_type: DataType) -> Self {
        Self {
            node: Arc::new(node),
            len,
            data_type,
        }
    }

    /// Wrap a concrete Arrow array as a graph source.
    ///
    /// Accepts `Float64`, `Boolean` and fixed-size lists of `Float64`;
    /// other numeric types are coerced to `Float64`.
    pub fn from_array(array: ArrayRef) -> Result<Self> {
        let array = kernels::coerce_source(array)?;
        let len = array.len();
        let data_type = array.data_type().clone();
        Ok(Self::new(Node::Source(array), len, data_type))
    }

    /// A rank-1 float column from raw values.
    pub fn from_f64s(values: Vec<f64>) -> Self {
        let array: ArrayRef = Arc::new(Float64Array::from(values));
        let len = array.len();
        Self::new(Node::Source(array), len, DataType::Float64)
    }

    /// A rank-1 boolean column from raw values.
    pub fn from_bools(values: Vec<bool>) -> Self {
        let array: ArrayRef = Arc::new(BooleanArray::from(values));
        let len = array.len();
        Self::new(Node::Source(array), len, DataType::Boolean)
    }

    /// A `(len, width)` vector column from row-major flat values.
    pub fn from_vector_rows(flat: Vec<f64>, width: usize) -> Result<Self> {
        if width == 0 {
            return Err(Error::ShapeMismatch("vector width must be positive".into()));
        }
        if flat.len() % width != 0 {
            return Err(Error::ShapeMismatch(format!(
                "flat length {} is not a multiple of width {}",
                flat.len(),
                width
            )));
        }
        let len = flat.len() / width;
        let array = kernels::build_vector(Float64Array::from(flat), width)?;
        Ok(Self::new(Node::Source(array), len, vector_type(width)))
    }

    /// A float scalar lazily broadcast to `len` rows.
    pub fn full(value: f64, len: usize) -> Self {
        Self::new(
            Node::Full {
                value: FillValue::Float(value),
                len,
            },
            len,
            DataType::Float64,
        )
    }

    /// A boolean scalar lazily broadcast to `len` rows.
    pub fn full_bool(value: bool, len: usize) -> Self {
        Self::new(
            Node::Full {
                value: FillValue::Bool(value),
                len,
            },
            len,
            DataType::Boolean,
        )
    }

    /// Row count of the eventual materialization.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Arrow type of the eventual materialization.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Inner width for vector values, `None` for rank-1 values.
    pub fn width(&self) -> Option<usize> {
        width_of(&self.data_type)
    }

    pub fn is_vector(&self) -> bool {
        self.width().is_some()
    }

    pub fn is_boolean(&self) -> bool {
        self.data_type == DataType::Boolean
    }

    fn require_float(&self, what: &str) -> Result<()> {
        if self.is_boolean() {
            return Err(Error::InvalidArgumentError(format!(
                "{what} requires a float value, got a boolean value"
            )));
        }
        Ok(())
    }

    /// Result type of a broadcasting binary op, or the reason it is invalid.
    fn binary_type(&self, rhs: &LazyValue, what: &str) -> Result<DataType> {
        self.require_float(what)?;
        rhs.require_float(what)?;
        if self.len != rhs.len {
            return Err(Error::ShapeMismatch(format!(
                "{what} operands have lengths {} and {}",
                self.len, rhs.len
            )));
        }
        match (self.width(), rhs.width()) {
            (None, None) => Ok(DataType::Float64),
            (Some(k), None) | (None, Some(k)) => Ok(vector_type(k)),
            (Some(a), Some(b)) if a == b => Ok(vector_type(a)),
            (Some(a), Some(b)) => Err(Error::ShapeMismatch(format!(
                "{what} operands have vector widths {a} and {b}"
            ))),
        }
    }

    fn binary(&self, rhs: &LazyValue, op: BinaryOp) -> Result<LazyValue> {
        let data_type = self.binary_type(rhs, "arithmetic")?;
        Ok(Self::new(
            Node::Binary {
                op,
                lhs: self.clone(),
                rhs: rhs.clone(),
            },
            self.len,
            data_type,
        ))
    }

    pub fn add(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.binary(rhs, BinaryOp::Add)
    }

    pub fn sub(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.binary(rhs, BinaryOp::Subtract)
    }

    pub fn mul(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.binary(rhs, BinaryOp::Multiply)
    }

    pub fn div(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.binary(rhs, BinaryOp::Divide)
    }

    pub fn add_scalar(&self, rhs: f64) -> Result<LazyValue> {
        self.binary(&Self::full(rhs, self.len), BinaryOp::Add)
    }

    pub fn sub_scalar(&self, rhs: f64) -> Result<LazyValue> {
        self.binary(&Self::full(rhs, self.len), BinaryOp::Subtract)
    }

    pub fn mul_scalar(&self, rhs: f64) -> Result<LazyValue> {
        self.binary(&Self::full(rhs, self.len), BinaryOp::Multiply)
    }

    pub fn div_scalar(&self, rhs: f64) -> Result<LazyValue> {
        self.binary(&Self::full(rhs, self.len), BinaryOp::Divide)
    }

    fn compare(&self, rhs: &LazyValue, op: CompareOp) -> Result<LazyValue> {
        self.require_float("comparison")?;
        rhs.require_float("comparison")?;
        if self.is_vector() || rhs.is_vector() {
            return Err(Error::InvalidArgumentError(
                "comparison requires rank-1 values".into(),
            ));
        }
        if self.len != rhs.len {
            return Err(Error::ShapeMismatch(format!(
                "comparison operands have lengths {} and {}",
                self.len, rhs.len
            )));
        }
        Ok(Self::new(
            Node::Compare {
                op,
                lhs: self.clone(),
                rhs: rhs.clone(),
            },
            self.len,
            DataType::Boolean,
        ))
    }

    pub fn eq_values(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.compare(rhs, CompareOp::Eq)
    }

    pub fn ne_values(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.compare(rhs, CompareOp::NotEq)
    }

    pub fn gt(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.compare(rhs, CompareOp::Gt)
    }

    pub fn ge(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.compare(rhs, CompareOp::GtEq)
    }

    pub fn lt(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.compare(rhs, CompareOp::Lt)
    }

    pub fn le(&self, rhs: &LazyValue) -> Result<LazyValue> {
        self.compare(rhs, CompareOp::LtEq)
    }

    pub fn eq_scalar(&self, rhs: f64) -> Result<LazyValue> {
        self.compare(&Self::full(rhs, self.len), CompareOp::Eq)
    }

    pub fn gt_scalar(&self, rhs: f64) -> Result<LazyValue> {
        self.compare(&Self::full(rhs, self.len), CompareOp::Gt)
    }

    pub fn lt_scalar(&self, rhs: f64) -> Result<LazyValue> {
        self.compare(&Self::full(rhs, self.len), CompareOp::Lt)
    }

    fn unary(&self, op: UnaryOp) -> Result<LazyValue> {
        self.require_float("unary arithmetic")?;
        Ok(Self::new(
            Node::Unary {
                op,
                input: self.clone(),
            },
            self.len,
            self.data_type.clone(),
        ))
    }

    pub fn neg(&self) -> Result<LazyValue> {
        self.unary(UnaryOp::Neg)
    }

    pub fn abs(&self) -> Result<LazyValue> {
        self.unary(UnaryOp::Abs)
    }

    pub fn sqrt(&self) -> Result<LazyValue> {
        self.unary(UnaryOp::Sqrt)
    }

    pub fn sin(&self) -> Result<LazyValue> {
        self.unary(UnaryOp::Sin)
    }

    pub fn cos(&self) -> Result<LazyValue> {
        self.unary(UnaryOp::Cos)
    }

    /// Apply an opaque scalar function element-wise, deferred like every
    /// other node. The function must be pure; it may run once per element
    /// on every materialization.
    pub fn map<F>(&self, f: F) -> Result<LazyValue>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.require_float("map")?;
        Ok(Self::new(
            Node::Map {
                input: self.clone(),
                f: Arc::new(f),
            },
            self.len,
            self.data_type.clone(),
        ))
    }

    /// Lazily select the rows where `mask` is true.
    ///
    /// The mask length must equal this value's length; the result length is
    /// the mask's true count. Both facts are fixed here, before any
    /// materialization.
    pub fn filter(&self, mask: &BooleanArray) -> Result<LazyValue> {
        if mask.len() != self.len {
            return Err(Error::length_mismatch(self.len, mask.len()));
        }
        if mask.null_count() > 0 {
            return Err(Error::InvalidArgumentError(
                "selection mask must not contain nulls".into(),
            ));
        }
        let selected = mask.true_count();
        Ok(Self::new(
            Node::Filter {
                input: self.clone(),
                mask: mask.clone(),
            },
            selected,
            self.data_type.clone(),
        ))
    }

    /// Lazily select rows by ordered index, duplicates allowed.
    pub fn take(&self, indices: &[usize]) -> Result<LazyValue> {
        for &idx in indices {
            if idx >= self.len {
                return Err(Error::InvalidIndex(format!(
                    "row index {idx} out of range for length {}",
                    self.len
                )));
            }
        }
        let taken = indices.len();
        let indices = UInt64Array::from_iter_values(indices.iter().map(|&i| i as u64));
        Ok(Self::new(
            Node::Take {
                input: self.clone(),
                indices,
            },
            taken,
            self.data_type.clone(),
        ))
    }

    /// Lazily select a contiguous row range.
    pub fn slice(&self, range: Range<usize>) -> Result<LazyValue> {
        if range.start > range.end || range.end > self.len {
            return Err(Error::InvalidIndex(format!(
                "slice {}..{} out of range for length {}",
                range.start, range.end, self.len
            )));
        }
        let indices: Vec<usize> = range.collect();
        self.take(&indices)
    }

    /// Row-wise concatenation of same-typed values.
    pub fn concat(parts: &[LazyValue]) -> Result<LazyValue> {
        let first = parts
            .first()
            .ok_or_else(|| Error::InvalidArgumentError("concat of zero values".into()))?;
        for part in &parts[1..] {
            if part.data_type != first.data_type {
                return Err(Error::ShapeMismatch(format!(
                    "concat inputs have types {:?} and {:?}",
                    first.data_type, part.data_type
                )));
            }
        }
        let len = parts.iter().map(|p| p.len).sum();
        Ok(Self::new(
            Node::Concat {
                parts: parts.to_vec(),
            },
            len,
            first.data_type.clone(),
        ))
    }

    /// Stack k rank-1 float values of equal length into a `(len, k)` vector
    /// value: row i, component j is element i of the j-th input.
    pub fn stack(parts: &[LazyValue]) -> Result<LazyValue> {
        let first = parts
            .first()
            .ok_or_else(|| Error::ShapeMismatch("stack of zero columns".into()))?;
        for part in parts {
            part.require_float("stack")
                .map_err(|_| Error::ShapeMismatch("stack inputs must be float columns".into()))?;
            if part.is_vector() {
                return Err(Error::ShapeMismatch(
                    "stack inputs must be rank-1 columns".into(),
                ));
            }
            if part.len != first.len {
                return Err(Error::ShapeMismatch(format!(
                    "stack inputs have lengths {} and {}",
                    first.len, part.len
                )));
            }
        }
        Ok(Self::new(
            Node::Stack {
                parts: parts.to_vec(),
            },
            first.len,
            vector_type(parts.len()),
        ))
    }

    /// Component `index` of a vector value, as a rank-1 value.
    pub fn component(&self, index: usize) -> Result<LazyValue> {
        let width = self.width().ok_or_else(|| {
            Error::ShapeMismatch("component access requires a vector value".into())
        })?;
        if index >= width {
            return Err(Error::InvalidIndex(format!(
                "component {index} out of range for vector width {width}"
            )));
        }
        Ok(Self::new(
            Node::Component {
                input: self.clone(),
                index,
            },
            self.len,
            DataType::Float64,
        ))
    }

    /// Walk the graph and produce the concrete Arrow array.
    ///
    /// Shared subgraphs evaluate once per call; nothing is cached across
    /// calls.
    pub fn materialize(&self) -> Result<ArrayRef> {
        crate::eval::materialize_one(self)
    }
}
