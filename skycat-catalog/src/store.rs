//! Per-catalog mapping from column name to lazy value.

use arrow::array::{Array, ArrayRef};
use rustc_hash::FxHashMap;
use skycat_lazy::LazyValue;
use skycat_result::{Error, Result};

/// Names of the columns every catalog resolves even when never assigned,
/// in canonical listing order. Synthesized lazily from the catalog size:
/// `Selection` is an all-true boolean mask, `Weight` and `Value` are
/// all-ones float columns.
pub const DEFAULT_COLUMNS: [&str; 3] = ["Selection", "Weight", "Value"];

/// A column assignment. Scalars broadcast to the catalog size; sequences
/// must match it exactly.
#[derive(Clone, Debug)]
pub enum ColumnValue {
    Lazy(LazyValue),
    Array(ArrayRef),
    Values(Vec<f64>),
    Scalar(f64),
}

impl From<LazyValue> for ColumnValue {
    fn from(v: LazyValue) -> Self {
        ColumnValue::Lazy(v)
    }
}

impl From<ArrayRef> for ColumnValue {
    fn from(v: ArrayRef) -> Self {
        ColumnValue::Array(v)
    }
}

impl From<Vec<f64>> for ColumnValue {
    fn from(v: Vec<f64>) -> Self {
        ColumnValue::Values(v)
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Scalar(v)
    }
}

/// Mapping from column name to [`LazyValue`], with two-tier lookup: the
/// explicit map first, then the fixed default-column constructors
/// parameterized by the store's size.
///
/// Assignment always rebinds a name to a new lazy value; values are never
/// mutated in place. Once a default name is explicitly assigned, the entry
/// shadows synthesis permanently.
#[derive(Clone, Debug)]
pub struct ColumnStore {
    size: usize,
    columns: FxHashMap<String, LazyValue>,
}

impl ColumnStore {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            columns: FxHashMap::default(),
        }
    }

    /// Fixed row count every column must match.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `name` is one of the declared default columns.
    pub fn is_default_name(name: &str) -> bool {
        DEFAULT_COLUMNS.contains(&name)
    }

    fn synthesize_default(&self, name: &str) -> Option<LazyValue> {
        match name {
            "Selection" => Some(LazyValue::full_bool(true, self.size)),
            "Weight" | "Value" => Some(LazyValue::full(1.0, self.size)),
            _ => None,
        }
    }

    /// Resolve a column: the stored value if present, otherwise a
    /// synthesized default, otherwise [`Error::NotFound`].
    pub fn get(&self, name: &str) -> Result<LazyValue> {
        if let Some(value) = self.columns.get(name) {
            return Ok(value.clone());
        }
        self.synthesize_default(name)
            .ok_or_else(|| Error::not_found(name))
    }

    /// Bind `name` to a new lazy value, overwriting any previous entry
    /// under the same name (including a previously synthesized default).
    ///
    /// Scalars broadcast lazily to the store size; arrays and sequences
    /// are validated against it here, at assignment, never at
    /// materialization.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ColumnValue>) -> Result<()> {
        let value = match value.into() {
            ColumnValue::Lazy(v) => {
                if v.len() != self.size {
                    return Err(Error::length_mismatch(self.size, v.len()));
                }
                v
            }
            ColumnValue::Array(a) => {
                if a.len() != self.size {
                    return Err(Error::length_mismatch(self.size, a.len()));
                }
                LazyValue::from_array(a)?
            }
            ColumnValue::Values(v) => {
                if v.len() != self.size {
                    return Err(Error::length_mismatch(self.size, v.len()));
                }
                LazyValue::from_f64s(v)
            }
            ColumnValue::Scalar(s) => LazyValue::full(s, self.size),
        };
        self.columns.insert(name.into(), value);
        Ok(())
    }

    /// True if explicitly stored or a default-column name.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name) || Self::is_default_name(name)
    }

    /// True only if explicitly stored (a default that was never assigned
    /// does not count).
    pub fn is_explicit(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Explicitly stored names, sorted for deterministic listings.
    pub fn explicit_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.columns.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// All resolvable names: explicit columns (sorted) followed by the
    /// default columns not shadowed by an explicit entry, in canonical
    /// order.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.explicit_names();
        for default in DEFAULT_COLUMNS {
            if !self.columns.contains_key(default) {
                names.push(default.to_string());
            }
        }
        names
    }
}
