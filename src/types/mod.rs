//! PMT value types and uniform vector element types.

mod element;
mod value;

pub use element::{Complex, Complex32, Complex64, UniformElement, VectorKind};
pub use value::{DictValue, PmtValue, Scalar, UniformVector};
