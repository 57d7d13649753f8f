//! Lazy columnar catalog containers for large-scale-structure analysis.
//!
//! A [`CatalogSource`] is a fixed-row-count container of named columns
//! whose values are nodes in a deferred computation graph
//! ([`skycat_lazy::LazyValue`]) rather than concrete buffers. Column
//! assignment, row/column subsetting and concatenation all stay lazy;
//! [`CatalogSource::compute`] is the single point where deferred
//! computation becomes real Arrow arrays.
//!
//! Structural contract violations (unknown columns, wrong lengths, scalar
//! row indexing, shapeless stacking, disjoint concatenation inputs) fail
//! synchronously at the violating call, never at materialization.
#![forbid(unsafe_code)]

pub mod attrs;
pub mod combine;
pub mod cosmology;
pub mod mock;
pub mod source;
pub mod store;
pub mod transform;

pub use attrs::{AttrValue, Attrs};
pub use combine::concatenate_sources;
pub use cosmology::{Cosmology, FlatLambdaCdm};
pub use mock::UniformCatalog;
pub use source::{CatalogSource, RowSelection};
pub use store::{ColumnStore, ColumnValue, DEFAULT_COLUMNS};
pub use transform::{sky_to_cartesian, sky_to_unit_sphere, stack_columns, vector_projection};
