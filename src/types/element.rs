//! Uniform vector element types.

use std::fmt;

use crate::error::PmtError;
use crate::wire::endian::WireOrder;
use crate::wire::tag::uvec;

/// A complex number stored as real part followed by imaginary part.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

impl<T> From<(T, T)> for Complex<T> {
    fn from((re, im): (T, T)) -> Self {
        Self { re, im }
    }
}

impl<T: fmt::Display> fmt::Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.re, self.im)
    }
}

/// Single-precision complex sample (wire sub-tag `complex64`).
pub type Complex32 = Complex<f32>;

/// Double-precision complex sample (wire sub-tag `complex128`).
pub type Complex64 = Complex<f64>;

/// Element type of a uniform vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    U64,
    S64,
    F32,
    F64,
    C64,
    C128,
}

impl VectorKind {
    pub const ALL: [VectorKind; 12] = [
        Self::U8,
        Self::S8,
        Self::U16,
        Self::S16,
        Self::U32,
        Self::S32,
        Self::U64,
        Self::S64,
        Self::F32,
        Self::F64,
        Self::C64,
        Self::C128,
    ];

    /// Wire sub-tag written after the uniform vector tag.
    pub const fn subtag(self) -> u8 {
        match self {
            Self::U8 => uvec::U8,
            Self::S8 => uvec::S8,
            Self::U16 => uvec::U16,
            Self::S16 => uvec::S16,
            Self::U32 => uvec::U32,
            Self::S32 => uvec::S32,
            Self::U64 => uvec::U64,
            Self::S64 => uvec::S64,
            Self::F32 => uvec::F32,
            Self::F64 => uvec::F64,
            Self::C64 => uvec::C64,
            Self::C128 => uvec::C128,
        }
    }

    /// Encoded size of one element in bytes.
    pub const fn element_size(self) -> usize {
        match self {
            Self::U8 | Self::S8 => 1,
            Self::U16 | Self::S16 => 2,
            Self::U32 | Self::S32 | Self::F32 => 4,
            Self::U64 | Self::S64 | Self::F64 | Self::C64 => 8,
            Self::C128 => 16,
        }
    }

    /// Looks up the element type for a wire sub-tag.
    pub fn from_subtag(subtag: u8) -> Result<Self, PmtError> {
        Self::ALL
            .into_iter()
            .find(|k| k.subtag() == subtag)
            .ok_or(PmtError::UnsupportedType { tag: subtag })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::S8 => "s8",
            Self::U16 => "u16",
            Self::S16 => "s16",
            Self::U32 => "u32",
            Self::S32 => "s32",
            Self::U64 => "u64",
            Self::S64 => "s64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::C64 => "c64",
            Self::C128 => "c128",
        }
    }
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that can be stored in a uniform vector.
///
/// Sealed: only the twelve wire element types implement it, so requesting
/// any other element type fails to compile.
pub trait UniformElement: WireOrder + sealed::Sealed {
    const KIND: VectorKind;
}

macro_rules! uniform_element {
    ($($t:ty => $kind:ident),* $(,)?) => {$(
        impl sealed::Sealed for $t {}
        impl UniformElement for $t {
            const KIND: VectorKind = VectorKind::$kind;
        }
    )*};
}

uniform_element! {
    u8 => U8,
    i8 => S8,
    u16 => U16,
    i16 => S16,
    u32 => U32,
    i32 => S32,
    u64 => U64,
    i64 => S64,
    f32 => F32,
    f64 => F64,
    Complex32 => C64,
    Complex64 => C128,
}
