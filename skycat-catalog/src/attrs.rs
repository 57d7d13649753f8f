//! Catalog metadata values.

use rustc_hash::FxHashMap;

/// Metadata attached to a catalog (e.g. the physical box size), carried
/// unchanged through combinators unless explicitly overwritten.
pub type Attrs = FxHashMap<String, AttrValue>;

/// A metadata value. Attrs are descriptive, not computed: they never enter
/// the lazy graph.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
    Vector(Vec<f64>),
}

macro_rules! impl_from_for_attr {
    ($variant:ident, $($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(v: $t) -> Self {
                    AttrValue::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_attr!(Int, i8, i16, i32, i64, u8, u16, u32);
impl_from_for_attr!(Float, f32, f64);
impl_from_for_attr!(Bool, bool);
impl_from_for_attr!(Text, String);
impl_from_for_attr!(Vector, Vec<f64>);

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<[f64; 3]> for AttrValue {
    fn from(v: [f64; 3]) -> Self {
        AttrValue::Vector(v.to_vec())
    }
}

impl AttrValue {
    /// The float payload, if this is a `Float` attr.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The vector payload, if this is a `Vector` attr.
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            AttrValue::Vector(v) => Some(v),
            _ => None,
        }
    }
}
