//! Argument values passed to test methods
//!
//! Methods declare their parameters as [`ParamType`]s; argument providers
//! resolve them into an [`Args`] list which method bodies read back with
//! [`Args::get`].

use std::borrow::Cow;
use std::fmt;

/// Declared type of a method parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 64-bit float
    Float,
    /// Boolean
    Bool,
    /// Owned text
    Text,
    /// Any other type; no built-in provider can produce it
    Other(Cow<'static, str>),
}

impl ParamType {
    /// A parameter type outside the supported set
    #[inline]
    #[must_use]
    pub fn other(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Other(name.into())
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("i32"),
            Self::Long => f.write_str("i64"),
            Self::Float => f.write_str("f64"),
            Self::Bool => f.write_str("bool"),
            Self::Text => f.write_str("String"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// A resolved argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Owned text
    Text(String),
}

impl ArgValue {
    /// Parameter type this value satisfies
    #[must_use]
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Int(_) => ParamType::Int,
            Self::Long(_) => ParamType::Long,
            Self::Float(_) => ParamType::Float,
            Self::Bool(_) => ParamType::Bool,
            Self::Text(_) => ParamType::Text,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Typed access to an argument inside a method body
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgError {
    /// Fewer arguments were resolved than the body reads
    #[error("argument {index} missing: {len} argument(s) resolved")]
    Missing {
        /// Requested position
        index: usize,
        /// Number of resolved arguments
        len: usize,
    },

    /// The resolved value has another type
    #[error("argument {index} is {found}, expected {expected}")]
    TypeMismatch {
        /// Requested position
        index: usize,
        /// Type the body asked for
        expected: ParamType,
        /// Type of the resolved value
        found: ParamType,
    },
}

/// Conversion from a resolved [`ArgValue`]
pub trait FromArg: Sized {
    /// Parameter type this conversion reads
    const PARAM_TYPE: ParamType;

    /// Extract the value, `None` on a type mismatch
    fn from_arg(value: &ArgValue) -> Option<Self>;
}

impl FromArg for i32 {
    const PARAM_TYPE: ParamType = ParamType::Int;

    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for i64 {
    const PARAM_TYPE: ParamType = ParamType::Long;

    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Long(v) => Some(*v),
            ArgValue::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }
}

impl FromArg for f64 {
    const PARAM_TYPE: ParamType = ParamType::Float;

    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for bool {
    const PARAM_TYPE: ParamType = ParamType::Bool;

    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromArg for String {
    const PARAM_TYPE: ParamType = ParamType::Text;

    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// Ordered argument list for one method call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<ArgValue>);

impl Args {
    /// Wrap resolved values
    #[inline]
    #[must_use]
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self(values)
    }

    /// No arguments
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of arguments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no arguments
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[ArgValue] {
        &self.0
    }

    /// Read the argument at `index` as `V`
    ///
    /// # Errors
    /// [`ArgError::Missing`] past the end, [`ArgError::TypeMismatch`] when the
    /// resolved value has another type.
    pub fn get<V: FromArg>(&self, index: usize) -> Result<V, ArgError> {
        let value = self.0.get(index).ok_or(ArgError::Missing {
            index,
            len: self.0.len(),
        })?;
        V::from_arg(value).ok_or_else(|| ArgError::TypeMismatch {
            index,
            expected: V::PARAM_TYPE,
            found: value.param_type(),
        })
    }
}

impl From<Vec<ArgValue>> for Args {
    fn from(values: Vec<ArgValue>) -> Self {
        Self(values)
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}
