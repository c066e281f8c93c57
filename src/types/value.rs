//! PMT value types.

use std::borrow::Cow;
use std::fmt;

use super::element::{Complex32, Complex64, VectorKind};

/// A scalar that can be stored as a dictionary value.
///
/// Only the wire's scalar types have a `From` conversion, so passing an
/// unsupported Rust type to [`Pmt::dict_add`](crate::Pmt::dict_add) is a
/// compile error rather than a silent mis-encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int32(i32),
    UInt64(u64),
    Real(f64),
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Self::Int32(i)
    }
}

impl From<u64> for Scalar {
    fn from(u: u64) -> Self {
        Self::UInt64(u)
    }
}

impl From<usize> for Scalar {
    fn from(u: usize) -> Self {
        Self::UInt64(u as u64)
    }
}

/// 32-bit floats are widened; there is no 32-bit real on the wire.
impl From<f32> for Scalar {
    fn from(f: f32) -> Self {
        Self::Real(f64::from(f))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Self::Real(f)
    }
}

impl From<Scalar> for PmtValue {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Bool(b) => Self::Bool(b),
            Scalar::Int32(i) => Self::Int32(i),
            Scalar::UInt64(u) => Self::UInt64(u),
            Scalar::Real(f) => Self::Real(f),
        }
    }
}

/// A dictionary value: any [`Scalar`] or a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum DictValue<'a> {
    Scalar(Scalar),
    Symbol(Cow<'a, str>),
}

impl DictValue<'_> {
    /// Detaches a borrowed symbol from its source.
    pub fn into_owned(self) -> DictValue<'static> {
        match self {
            Self::Scalar(s) => DictValue::Scalar(s),
            Self::Symbol(s) => DictValue::Symbol(Cow::Owned(s.into_owned())),
        }
    }
}

macro_rules! impl_dict_value_from_scalar {
    ($($t:ty),*) => {$(
        impl From<$t> for DictValue<'_> {
            fn from(v: $t) -> Self {
                Self::Scalar(v.into())
            }
        }
    )*};
}

impl_dict_value_from_scalar!(Scalar, bool, i32, u64, usize, f32, f64);

impl<'a> From<&'a str> for DictValue<'a> {
    fn from(s: &'a str) -> Self {
        Self::Symbol(Cow::Borrowed(s))
    }
}

impl From<String> for DictValue<'_> {
    fn from(s: String) -> Self {
        Self::Symbol(Cow::Owned(s))
    }
}

impl From<DictValue<'_>> for PmtValue {
    fn from(v: DictValue<'_>) -> Self {
        match v {
            DictValue::Scalar(s) => s.into(),
            DictValue::Symbol(s) => Self::Symbol(s.into_owned()),
        }
    }
}

/// A homogeneous, typed array.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformVector {
    U8(Vec<u8>),
    S8(Vec<i8>),
    U16(Vec<u16>),
    S16(Vec<i16>),
    U32(Vec<u32>),
    S32(Vec<i32>),
    U64(Vec<u64>),
    S64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    C64(Vec<Complex32>),
    C128(Vec<Complex64>),
}

impl UniformVector {
    pub fn kind(&self) -> VectorKind {
        match self {
            Self::U8(_) => VectorKind::U8,
            Self::S8(_) => VectorKind::S8,
            Self::U16(_) => VectorKind::U16,
            Self::S16(_) => VectorKind::S16,
            Self::U32(_) => VectorKind::U32,
            Self::S32(_) => VectorKind::S32,
            Self::U64(_) => VectorKind::U64,
            Self::S64(_) => VectorKind::S64,
            Self::F32(_) => VectorKind::F32,
            Self::F64(_) => VectorKind::F64,
            Self::C64(_) => VectorKind::C64,
            Self::C128(_) => VectorKind::C128,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::S8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::S16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::S32(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::S64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::C64(v) => v.len(),
            Self::C128(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded PMT value.
///
/// The encoder never builds this tree; it exists as the output of
/// [`decode_value`](crate::wire::decode_value).
#[derive(Debug, Clone, PartialEq)]
pub enum PmtValue {
    Nil,
    Bool(bool),
    Int32(i32),
    UInt64(u64),
    Real(f64),
    Symbol(String),
    Pair(Box<PmtValue>, Box<PmtValue>),
    /// Entries in insertion order. Keys may repeat.
    Dict(Vec<(String, PmtValue)>),
    Vector(UniformVector),
}

impl PmtValue {
    pub fn pair(car: PmtValue, cdr: PmtValue) -> Self {
        Self::Pair(Box::new(car), Box::new(cdr))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the value as a string reference, if it is a `Symbol`.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an f64, if it is a `Real`.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the first dictionary entry stored under `key`.
    pub fn dict_get(&self, key: &str) -> Option<&PmtValue> {
        match self {
            Self::Dict(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the two halves of a pair.
    pub fn as_pair(&self) -> Option<(&PmtValue, &PmtValue)> {
        match self {
            Self::Pair(car, cdr) => Some((car, cdr)),
            _ => None,
        }
    }
}

impl fmt::Display for PmtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "()"),
            Self::Bool(b) => write!(f, "{}", if *b { "#t" } else { "#f" }),
            Self::Int32(i) => write!(f, "{i}"),
            Self::UInt64(u) => write!(f, "{u}"),
            Self::Real(x) => write!(f, "{x}"),
            Self::Symbol(s) => write!(f, "{s}"),
            Self::Pair(car, cdr) => write!(f, "({car} . {cdr})"),
            Self::Dict(entries) => {
                write!(f, "(")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({k} . {v})")?;
                }
                write!(f, ")")
            }
            Self::Vector(v) => write!(f, "#[{} x{}]", v.kind(), v.len()),
        }
    }
}
