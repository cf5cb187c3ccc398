//! Typed attribute and action-state values.
//!
//! Menu items and action groups hand out dynamically typed values. They are
//! modelled as a tagged sum type with structural equality, a GVariant-style
//! type code and a type-annotated printable form used in failure messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed value read from a menu item attribute or action state
///
/// Absence of a value is expressed as `Option<Variant>::None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Boolean (`b`)
    Bool(bool),
    /// Signed 32-bit integer (`i`)
    Int32(i32),
    /// Signed 64-bit integer (`x`)
    Int64(i64),
    /// Double precision float (`d`)
    Double(f64),
    /// UTF-8 string (`s`)
    String(String),
    /// Serialized icon (`(sv)`)
    Icon(Icon),
    /// List of boxed values (`av`)
    Array(Vec<Variant>),
    /// String-keyed dictionary of boxed values (`a{sv}`)
    Dict(BTreeMap<String, Variant>),
}

impl Variant {
    /// GVariant-style type code of this value
    #[must_use]
    pub const fn type_string(&self) -> &'static str {
        match self {
            Self::Bool(_) => "b",
            Self::Int32(_) => "i",
            Self::Int64(_) => "x",
            Self::Double(_) => "d",
            Self::String(_) => "s",
            Self::Icon(_) => "(sv)",
            Self::Array(_) => "av",
            Self::Dict(_) => "a{sv}",
        }
    }

    /// Whether both values carry the same type code
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        self.type_string() == other.type_string()
    }

    /// Boolean payload, if this is a boolean
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String payload, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Double payload, if this is a double
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Array payload, if this is an `av` list
    #[must_use]
    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Dictionary payload, if this is a vardict
    #[must_use]
    pub const fn as_dict(&self) -> Option<&BTreeMap<String, Variant>> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Build a vardict from key/value pairs
    pub fn dict<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Variant)>,
    {
        Self::Dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Icon> for Variant {
    fn from(value: Icon) -> Self {
        Self::Icon(value)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            _ => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            // int32 is the default integer type and prints unannotated
            Self::Int32(i) => write!(f, "{i}"),
            Self::Int64(i) => write!(f, "int64 {i}"),
            Self::Double(d) => write!(f, "{d:?}"),
            Self::String(s) => write_quoted(f, s),
            Self::Icon(icon) => write!(f, "{icon}"),
            Self::Array(values) if values.is_empty() => f.write_str("@av []"),
            Self::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "<{value}>")?;
                }
                f.write_str("]")
            }
            Self::Dict(map) if map.is_empty() => f.write_str("@a{sv} {}"),
            Self::Dict(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": <{value}>")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// An icon reference as carried in menu attributes and action state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    /// Ordered fallback list of symbolic icon names
    Themed(Vec<String>),
    /// Icon loaded from a file path or URI
    File(String),
}

impl Icon {
    /// Create a themed icon from an ordered list of names
    pub fn themed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Themed(names.into_iter().map(Into::into).collect())
    }

    /// Create a file icon
    pub fn file(path: impl Into<String>) -> Self {
        Self::File(path.into())
    }

    /// Deserialize an icon from an attribute value.
    ///
    /// Accepts a serialized icon, or a string: absolute paths and URIs yield
    /// file icons, anything else a single-name themed icon.
    #[must_use]
    pub fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Icon(icon) => Some(icon.clone()),
            Variant::String(s) if s.is_empty() => None,
            Variant::String(s) if s.starts_with('/') || s.contains("://") => {
                Some(Self::File(s.clone()))
            }
            Variant::String(s) => Some(Self::Themed(vec![s.clone()])),
            _ => None,
        }
    }

    /// Fallback names, for themed icons
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        match self {
            Self::Themed(names) => Some(names),
            Self::File(_) => None,
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Themed(names) => {
                f.write_str("('themed', <[")?;
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, name)?;
                }
                f.write_str("]>)")
            }
            Self::File(path) => {
                f.write_str("('file', <")?;
                write_quoted(f, path)?;
                f.write_str(">)")
            }
        }
    }
}

/// Proptest strategies for generating values
#[cfg(any(test, feature = "proptest"))]
pub mod strategies {
    use super::{Icon, Variant};
    use proptest::prelude::*;

    /// Any scalar value (no containers)
    pub fn any_scalar() -> impl Strategy<Value = Variant> {
        prop_oneof![
            any::<bool>().prop_map(Variant::Bool),
            any::<i32>().prop_map(Variant::Int32),
            any::<i64>().prop_map(Variant::Int64),
            (-1.0e6..1.0e6f64).prop_map(Variant::Double),
            "[a-z.-]{0,12}".prop_map(Variant::String),
            proptest::collection::vec("[a-z-]{1,10}", 1..4)
                .prop_map(|names| Variant::Icon(Icon::Themed(names))),
        ]
    }

    /// Any value, including nested arrays and vardicts
    pub fn any_variant() -> impl Strategy<Value = Variant> {
        any_scalar().prop_recursive(2, 16, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Variant::Array),
                proptest::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(Variant::Dict),
            ]
        })
    }
}
