//! Deferred array computation graph backing skycat catalog columns.
//!
//! Every catalog column is a [`LazyValue`]: an immutable handle to a node in
//! a dependency graph rather than a concrete buffer. Arithmetic, masking,
//! row selection, concatenation and stacking all build new nodes that
//! reference their parents; no numeric work happens until an explicit
//! [`LazyValue::materialize`] call walks the graph and produces concrete
//! Arrow arrays.
//!
//! Structural properties (row count, element type, vector width) are known
//! at graph-construction time, so shape and index violations fail
//! synchronously when a node is built, never inside materialization.
#![forbid(unsafe_code)]

pub mod eval;
pub mod kernels;
pub mod value;

pub use eval::materialize_many;
pub use value::{BinaryOp, CompareOp, LazyValue, UnaryOp};
