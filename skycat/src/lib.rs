//! skycat: lazy catalog containers for large-scale-structure analysis.
//!
//! This crate is the primary entrypoint for the skycat toolkit. It
//! re-exports the catalog containers, lazy array engine and file-backed
//! providers from the underlying `skycat-*` crates, providing a unified
//! API surface.
//!
//! # Quick Start
//!
//! Build a mock catalog, derive a column, and materialize it:
//!
//! ```rust
//! use skycat::{UniformCatalog, LazyValue};
//!
//! let mut cat = UniformCatalog::new(64, 100.0, 42).unwrap();
//! let doubled = cat.get("Mass").unwrap().mul_scalar(2.0).unwrap();
//! cat.set("Mass2", doubled).unwrap();
//!
//! let mass2: LazyValue = cat.get("Mass2").unwrap();
//! assert_eq!(mass2.len(), 64);
//! let _concrete = cat.compute(&mass2).unwrap(); // the only eager step
//! ```
//!
//! # Architecture
//!
//! skycat is organized as a layered workspace:
//!
//! - **Catalog model** (`skycat-catalog`): the [`CatalogSource`] container,
//!   column store, combinators and coordinate transforms.
//! - **Lazy engine** (`skycat-lazy`): the deferred array graph behind every
//!   column, materialized into Arrow arrays on demand.
//! - **Providers** (`skycat-csv`): file-backed catalog constructors.
//! - **Errors** (`skycat-result`): the unified [`Error`]/[`Result`] pair.

pub use skycat_catalog::{
    concatenate_sources, sky_to_cartesian, sky_to_unit_sphere, stack_columns, vector_projection,
    AttrValue, Attrs, CatalogSource, ColumnStore, ColumnValue, Cosmology, FlatLambdaCdm,
    RowSelection, UniformCatalog, DEFAULT_COLUMNS,
};
pub use skycat_csv::{read_csv_catalog, CsvReadOptions};
pub use skycat_lazy::{materialize_many, LazyValue};
pub use skycat_result::{Error, Result};
