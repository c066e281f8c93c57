//! PMT encoding: values → bytes.
//!
//! Every function appends one complete tagged unit to `buf`. Fallible
//! functions validate first and leave `buf` untouched on error.

use bytes::{BufMut, BytesMut};

use super::endian::WireOrder;
use super::tag;
use crate::error::PmtError;
use crate::types::{
    Complex32, Complex64, DictValue, PmtValue, Scalar, UniformElement, UniformVector, VectorKind,
};

/// Longest symbol representable by the 2-byte length field.
pub const MAX_SYMBOL_LEN: usize = u16::MAX as usize;

/// Most elements representable by the 4-byte count field.
pub const MAX_VECTOR_LEN: usize = u32::MAX as usize;

/// Tag + sub-tag + count + marker.
pub const UNIFORM_VECTOR_HEADER_LEN: usize = 1 + 1 + 4 + tag::UNIFORM_VECTOR_MARKER.len();

pub fn encode_nil(buf: &mut BytesMut) {
    buf.put_u8(tag::NIL);
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { tag::TRUE } else { tag::FALSE });
}

pub fn encode_int32(buf: &mut BytesMut, value: i32) {
    buf.put_u8(tag::INT32);
    value.put_wire(buf);
}

pub fn encode_uint64(buf: &mut BytesMut, value: u64) {
    buf.put_u8(tag::UINT64);
    value.put_wire(buf);
}

pub fn encode_real(buf: &mut BytesMut, value: f64) {
    buf.put_u8(tag::REAL);
    value.put_wire(buf);
}

/// Widens to f64 first; the wire has a single real type.
pub fn encode_real32(buf: &mut BytesMut, value: f32) {
    encode_real(buf, f64::from(value));
}

/// Encodes a symbol (length = byte length, not char count).
pub fn encode_symbol(buf: &mut BytesMut, value: &str) -> Result<(), PmtError> {
    let len = check_symbol_len(value)?;
    buf.reserve(3 + value.len());
    buf.put_u8(tag::SYMBOL);
    len.put_wire(buf);
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn check_symbol_len(value: &str) -> Result<u16, PmtError> {
    u16::try_from(value.len()).map_err(|_| PmtError::LengthOverflow {
        len: value.len(),
        max: MAX_SYMBOL_LEN,
    })
}

pub fn encode_scalar(buf: &mut BytesMut, value: Scalar) {
    match value {
        Scalar::Bool(b) => encode_bool(buf, b),
        Scalar::Int32(i) => encode_int32(buf, i),
        Scalar::UInt64(u) => encode_uint64(buf, u),
        Scalar::Real(f) => encode_real(buf, f),
    }
}

/// Appends one dictionary entry: `DICT PAIR symbol(key) value`.
///
/// Entries accumulate in call order. Keys are not deduplicated.
pub fn dict_add<'a>(
    buf: &mut BytesMut,
    key: &str,
    value: impl Into<DictValue<'a>>,
) -> Result<(), PmtError> {
    let value = value.into();
    check_symbol_len(key)?;
    if let DictValue::Symbol(s) = &value {
        check_symbol_len(s)?;
    }
    buf.put_slice(&tag::DICT_ENTRY);
    encode_symbol(buf, key)?;
    match value {
        DictValue::Scalar(s) => encode_scalar(buf, s),
        DictValue::Symbol(s) => encode_symbol(buf, &s)?,
    }
    Ok(())
}

/// Appends a pair: `PAIR car NIL cdr`. Neither half is inspected.
pub fn encode_pair(buf: &mut BytesMut, car: &[u8], cdr: &[u8]) {
    buf.reserve(2 + car.len() + cdr.len());
    buf.put_u8(tag::PAIR);
    buf.put_slice(car);
    buf.put_u8(tag::TERMINATOR);
    buf.put_slice(cdr);
}

fn check_vector_len(len: usize) -> Result<u32, PmtError> {
    u32::try_from(len).map_err(|_| PmtError::LengthOverflow {
        len,
        max: MAX_VECTOR_LEN,
    })
}

fn encode_uniform_vector_header(buf: &mut BytesMut, kind: VectorKind, count: u32) {
    buf.put_u8(tag::UNIFORM_VECTOR);
    buf.put_u8(kind.subtag());
    count.put_wire(buf);
    buf.put_slice(&tag::UNIFORM_VECTOR_MARKER);
}

/// Encodes a uniform vector of `data.len()` elements.
///
/// An empty slice is valid and writes a header with count 0.
pub fn encode_uniform_vector<T: UniformElement>(
    buf: &mut BytesMut,
    data: &[T],
) -> Result<(), PmtError> {
    let count = check_vector_len(data.len())?;
    buf.reserve(UNIFORM_VECTOR_HEADER_LEN + data.len() * T::WIDTH);
    encode_uniform_vector_header(buf, T::KIND, count);
    for &item in data {
        item.put_wire(buf);
    }
    let kind = T::KIND;
    tracing::trace!(%kind, count, "encoded uniform vector");
    Ok(())
}

/// Encodes a uniform vector from raw host-order element memory, such as
/// samples loaded straight from a `.32fc` capture.
pub fn encode_uniform_vector_ne_bytes(
    buf: &mut BytesMut,
    kind: VectorKind,
    raw: &[u8],
) -> Result<(), PmtError> {
    let element_size = kind.element_size();
    if raw.len() % element_size != 0 {
        return Err(PmtError::MisalignedPayload {
            len: raw.len(),
            element_size,
        });
    }
    let count = check_vector_len(raw.len() / element_size)?;
    buf.reserve(UNIFORM_VECTOR_HEADER_LEN + raw.len());
    encode_uniform_vector_header(buf, kind, count);
    match kind {
        VectorKind::U8 => normalize_into::<u8>(buf, raw),
        VectorKind::S8 => normalize_into::<i8>(buf, raw),
        VectorKind::U16 => normalize_into::<u16>(buf, raw),
        VectorKind::S16 => normalize_into::<i16>(buf, raw),
        VectorKind::U32 => normalize_into::<u32>(buf, raw),
        VectorKind::S32 => normalize_into::<i32>(buf, raw),
        VectorKind::U64 => normalize_into::<u64>(buf, raw),
        VectorKind::S64 => normalize_into::<i64>(buf, raw),
        VectorKind::F32 => normalize_into::<f32>(buf, raw),
        VectorKind::F64 => normalize_into::<f64>(buf, raw),
        VectorKind::C64 => normalize_into::<Complex32>(buf, raw),
        VectorKind::C128 => normalize_into::<Complex64>(buf, raw),
    }
    tracing::trace!(%kind, count, "encoded uniform vector from raw samples");
    Ok(())
}

fn normalize_into<T: UniformElement>(buf: &mut BytesMut, mut raw: &[u8]) {
    while !raw.is_empty() {
        T::get_native(&mut raw).put_wire(buf);
    }
}

/// Encodes a decoded value tree back into wire form.
///
/// Validates the whole tree before writing, so `buf` is unchanged on error.
pub fn encode_value(buf: &mut BytesMut, value: &PmtValue) -> Result<(), PmtError> {
    validate(value)?;
    let mut scratch = BytesMut::new();
    write_value(&mut scratch, value)?;
    buf.put_slice(&scratch);
    Ok(())
}

fn validate(value: &PmtValue) -> Result<(), PmtError> {
    match value {
        PmtValue::Symbol(s) => check_symbol_len(s).map(|_| ()),
        PmtValue::Pair(car, cdr) => {
            validate(car)?;
            validate(cdr)
        }
        PmtValue::Dict(entries) => {
            for (k, v) in entries {
                check_symbol_len(k)?;
                validate(v)?;
            }
            Ok(())
        }
        PmtValue::Vector(v) => check_vector_len(v.len()).map(|_| ()),
        _ => Ok(()),
    }
}

fn write_value(buf: &mut BytesMut, value: &PmtValue) -> Result<(), PmtError> {
    match value {
        PmtValue::Nil => encode_nil(buf),
        PmtValue::Bool(b) => encode_bool(buf, *b),
        PmtValue::Int32(i) => encode_int32(buf, *i),
        PmtValue::UInt64(u) => encode_uint64(buf, *u),
        PmtValue::Real(f) => encode_real(buf, *f),
        PmtValue::Symbol(s) => encode_symbol(buf, s)?,
        PmtValue::Pair(car, cdr) => {
            buf.put_u8(tag::PAIR);
            write_value(buf, car)?;
            buf.put_u8(tag::TERMINATOR);
            write_value(buf, cdr)?;
        }
        PmtValue::Dict(entries) => {
            for (k, v) in entries {
                buf.put_slice(&tag::DICT_ENTRY);
                encode_symbol(buf, k)?;
                write_value(buf, v)?;
            }
        }
        PmtValue::Vector(v) => write_uniform_vector(buf, v)?,
    }
    Ok(())
}

fn write_uniform_vector(buf: &mut BytesMut, v: &UniformVector) -> Result<(), PmtError> {
    match v {
        UniformVector::U8(d) => encode_uniform_vector(buf, d),
        UniformVector::S8(d) => encode_uniform_vector(buf, d),
        UniformVector::U16(d) => encode_uniform_vector(buf, d),
        UniformVector::S16(d) => encode_uniform_vector(buf, d),
        UniformVector::U32(d) => encode_uniform_vector(buf, d),
        UniformVector::S32(d) => encode_uniform_vector(buf, d),
        UniformVector::U64(d) => encode_uniform_vector(buf, d),
        UniformVector::S64(d) => encode_uniform_vector(buf, d),
        UniformVector::F32(d) => encode_uniform_vector(buf, d),
        UniformVector::F64(d) => encode_uniform_vector(buf, d),
        UniformVector::C64(d) => encode_uniform_vector(buf, d),
        UniformVector::C128(d) => encode_uniform_vector(buf, d),
    }
}
