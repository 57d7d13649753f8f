//! The public catalog container.

use std::ops::Range;

use arrow::array::{Array, ArrayRef, BooleanArray};
use skycat_lazy::{materialize_many, LazyValue};
use skycat_result::{Error, Result};

use crate::attrs::Attrs;
use crate::store::{ColumnStore, ColumnValue};

/// A row-subset request against a catalog.
///
/// Single-integer selection ([`RowSelection::Scalar`]) is deliberately
/// unsupported and always fails with `InvalidIndex`; callers needing one
/// row must pass a length-one index sequence.
#[derive(Clone, Debug)]
pub enum RowSelection<'a> {
    /// Keep the rows where the mask is true. Mask length must equal the
    /// catalog size.
    Mask(&'a BooleanArray),
    /// Keep exactly these rows, in this order; duplicates allowed.
    Indices(&'a [usize]),
    /// Keep a contiguous row range.
    Range(Range<usize>),
    /// Rejected: selecting one row as a scalar row.
    Scalar(usize),
}

/// A fixed-row-count, named-column lazy data container.
///
/// Every column is a [`LazyValue`] node in a dependency graph; the catalog
/// itself only does synchronous in-memory bookkeeping. Row and column
/// subsetting build new catalogs whose columns are re-bound to selection
/// nodes composed with the originals — nothing is materialized until
/// [`CatalogSource::compute`].
#[derive(Clone, Debug)]
pub struct CatalogSource {
    store: ColumnStore,
    attrs: Attrs,
}

impl CatalogSource {
    /// An empty catalog of `size` rows: only the default columns resolve.
    pub fn new(size: usize) -> Self {
        Self {
            store: ColumnStore::new(size),
            attrs: Attrs::default(),
        }
    }

    /// Build a catalog from named lazy columns; the row count comes from
    /// the first column and every other column must match it.
    pub fn from_columns<I>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, LazyValue)>,
    {
        let mut iter = columns.into_iter();
        let (first_name, first) = iter.next().ok_or_else(|| {
            Error::InvalidArgumentError("cannot build a catalog from zero columns".into())
        })?;
        let mut source = Self::new(first.len());
        source.set(first_name, first)?;
        for (name, column) in iter {
            source.set(name, column)?;
        }
        Ok(source)
    }

    /// Build a catalog from named concrete arrays ("array catalog").
    pub fn from_arrays<I>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, ArrayRef)>,
    {
        let lazy = columns
            .into_iter()
            .map(|(name, array)| Ok((name, LazyValue::from_array(array)?)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(lazy)
    }

    /// Attach attrs at construction.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Row count, fixed for the life of the instance.
    pub fn size(&self) -> usize {
        self.store.size()
    }

    /// Metadata mapping (e.g. `BoxSize`).
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut Attrs {
        &mut self.attrs
    }

    /// Resolvable column names: explicit columns then unshadowed defaults.
    pub fn columns(&self) -> Vec<String> {
        self.store.names()
    }

    /// True if `name` is explicitly stored or a default column.
    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// The lazy value currently bound to `name` (the most recent
    /// assignment wins), or a synthesized default.
    pub fn get(&self, name: &str) -> Result<LazyValue> {
        self.store.get(name)
    }

    /// Bind `name` to a new column. Scalars broadcast to the catalog size;
    /// sequences of any other length are rejected here, eagerly.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ColumnValue>) -> Result<()> {
        self.store.set(name, value)
    }

    /// Materialize one lazy value (a column or any expression built from
    /// columns). The single point where deferred computation becomes real
    /// data; results are not cached across calls.
    pub fn compute(&self, value: &LazyValue) -> Result<ArrayRef> {
        value.materialize()
    }

    /// Materialize several lazy values, preserving arity and order.
    pub fn compute_many(&self, values: &[LazyValue]) -> Result<Vec<ArrayRef>> {
        materialize_many(values)
    }

    /// Build a new catalog holding the selected rows of every column.
    ///
    /// Selection is itself lazy: each explicit column is re-bound to a
    /// mask/take node composed with the original value, and defaults are
    /// re-synthesized at the new size. The originals are untouched.
    pub fn select(&self, selection: RowSelection<'_>) -> Result<CatalogSource> {
        let size = self.size();
        let rebind: Box<dyn Fn(&LazyValue) -> Result<LazyValue>>;
        let new_size;

        match &selection {
            RowSelection::Scalar(row) => {
                return Err(Error::InvalidIndex(format!(
                    "single-integer row selection (row {row}) is unsupported; \
                     use a length-one index sequence"
                )));
            }
            RowSelection::Mask(mask) => {
                if mask.len() != size {
                    return Err(Error::length_mismatch(size, mask.len()));
                }
                new_size = mask.true_count();
                let mask = (*mask).clone();
                rebind = Box::new(move |column| column.filter(&mask));
            }
            RowSelection::Indices(indices) => {
                for &idx in *indices {
                    if idx >= size {
                        return Err(Error::InvalidIndex(format!(
                            "row index {idx} out of range for catalog of size {size}"
                        )));
                    }
                }
                new_size = indices.len();
                let indices = indices.to_vec();
                rebind = Box::new(move |column| column.take(&indices));
            }
            RowSelection::Range(range) => {
                if range.start > range.end || range.end > size {
                    return Err(Error::InvalidIndex(format!(
                        "row range {}..{} out of range for catalog of size {size}",
                        range.start, range.end
                    )));
                }
                new_size = range.len();
                let range = range.clone();
                rebind = Box::new(move |column| column.slice(range.clone()));
            }
        }

        tracing::debug!(from = size, to = new_size, "row-subsetting catalog");

        let mut out = CatalogSource::new(new_size).with_attrs(self.attrs.clone());
        for name in self.store.explicit_names() {
            let column = self.store.get(&name)?;
            out.set(name, rebind(&column)?)?;
        }
        Ok(out)
    }

    /// Keep the rows where `mask` is true.
    pub fn select_mask(&self, mask: &BooleanArray) -> Result<CatalogSource> {
        self.select(RowSelection::Mask(mask))
    }

    /// Keep exactly these rows, in this order.
    pub fn take_rows(&self, indices: &[usize]) -> Result<CatalogSource> {
        self.select(RowSelection::Indices(indices))
    }

    /// Keep a contiguous row range.
    pub fn slice(&self, range: Range<usize>) -> Result<CatalogSource> {
        self.select(RowSelection::Range(range))
    }

    /// Build a same-size catalog holding only the requested explicit
    /// columns. Default columns remain implicitly available whether or not
    /// they were requested; a name that is neither stored nor a default
    /// fails with `NotFound`.
    pub fn project(&self, names: &[&str]) -> Result<CatalogSource> {
        let mut out = CatalogSource::new(self.size()).with_attrs(self.attrs.clone());
        for &name in names {
            if self.store.is_explicit(name) {
                out.set(name, self.store.get(name)?)?;
            } else if !ColumnStore::is_default_name(name) {
                return Err(Error::not_found(name));
            }
        }
        Ok(out)
    }

    pub(crate) fn store(&self) -> &ColumnStore {
        &self.store
    }
}
