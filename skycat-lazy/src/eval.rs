//! Graph walking and materialization.

use std::sync::Arc;

use arrow::array::ArrayRef;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use skycat_result::Result;

use crate::kernels;
use crate::value::{FillValue, LazyValue, Node};

/// Evaluate a single graph root.
///
/// A per-call memo table keyed by node identity makes shared subgraphs
/// (diamonds) evaluate once; the table is dropped when the call returns, so
/// nothing is cached across materializations.
pub(crate) fn materialize_one(value: &LazyValue) -> Result<ArrayRef> {
    let mut memo: FxHashMap<usize, ArrayRef> = FxHashMap::default();
    evaluate(value, &mut memo)
}

/// Materialize several graph roots, preserving input order.
///
/// Roots evaluate in parallel; each root walks its own graph independently,
/// so subgraphs shared *across* roots recompute per root.
pub fn materialize_many(values: &[LazyValue]) -> Result<Vec<ArrayRef>> {
    tracing::debug!(roots = values.len(), "materializing lazy values");
    values.par_iter().map(materialize_one).collect()
}

fn evaluate(value: &LazyValue, memo: &mut FxHashMap<usize, ArrayRef>) -> Result<ArrayRef> {
    let key = Arc::as_ptr(&value.node) as usize;
    if let Some(hit) = memo.get(&key) {
        return Ok(hit.clone());
    }

    let out = match value.node.as_ref() {
        Node::Source(array) => array.clone(),
        Node::Full {
            value: FillValue::Float(v),
            len,
        } => kernels::fill_f64(*v, *len),
        Node::Full {
            value: FillValue::Bool(v),
            len,
        } => kernels::fill_bool(*v, *len),
        Node::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, memo)?;
            let rhs = evaluate(rhs, memo)?;
            kernels::compute_binary(&lhs, &rhs, *op)?
        }
        Node::Compare { op, lhs, rhs } => {
            let lhs = evaluate(lhs, memo)?;
            let rhs = evaluate(rhs, memo)?;
            kernels::compute_compare(&lhs, &rhs, *op)?
        }
        Node::Unary { op, input } => {
            let input = evaluate(input, memo)?;
            kernels::compute_unary(&input, *op)?
        }
        Node::Map { input, f } => {
            let input = evaluate(input, memo)?;
            kernels::compute_map(&input, f.as_ref())?
        }
        Node::Filter { input, mask } => {
            let input = evaluate(input, memo)?;
            kernels::filter_array(&input, mask)?
        }
        Node::Take { input, indices } => {
            let input = evaluate(input, memo)?;
            kernels::take_array(&input, indices)?
        }
        Node::Concat { parts } => {
            let parts = parts
                .iter()
                .map(|p| evaluate(p, memo))
                .collect::<Result<Vec<_>>>()?;
            kernels::concat_arrays(&parts)?
        }
        Node::Stack { parts } => {
            let parts = parts
                .iter()
                .map(|p| evaluate(p, memo))
                .collect::<Result<Vec<_>>>()?;
            kernels::stack_arrays(&parts)?
        }
        Node::Component { input, index } => {
            let input = evaluate(input, memo)?;
            kernels::component_array(&input, *index)?
        }
    };

    memo.insert(key, out.clone());
    Ok(out)
}
