//! PMT decoding: bytes → `PmtValue`.
//!
//! The wire format has no explicit dictionary or chain length, so a few
//! shapes are recovered by convention:
//!
//! - a dictionary is the longest run of consecutive `DICT`-tagged entries;
//! - an empty half of a pair (a `cons` of an empty buffer) reads as `Nil`.

use bytes::Buf;

use super::endian::WireOrder;
use super::tag;
use crate::error::PmtError;
use crate::types::{Complex32, Complex64, PmtValue, UniformElement, UniformVector, VectorKind};

/// Limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    max_depth: usize,
    max_elements: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_elements: 16 * 1024 * 1024,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth of pairs and dictionary values.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the maximum element count accepted for one uniform vector.
    pub fn max_elements(mut self, limit: u32) -> Self {
        self.max_elements = limit;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    pub fn element_limit(&self) -> u32 {
        self.max_elements
    }
}

/// Decodes a single `PmtValue` from the buffer with default limits.
pub fn decode_value(buf: &mut impl Buf) -> Result<PmtValue, PmtError> {
    decode_value_with(buf, &DecodeOptions::default())
}

/// Decodes a single `PmtValue` from the buffer.
pub fn decode_value_with(
    buf: &mut impl Buf,
    options: &DecodeOptions,
) -> Result<PmtValue, PmtError> {
    decode_at(buf, options, 0)
        .inspect_err(|e| tracing::debug!(error = %e, "rejected PMT input"))
}

/// Decodes a complete PDU: exactly one pair and no trailing bytes.
pub fn decode_pdu(data: &[u8]) -> Result<(PmtValue, PmtValue), PmtError> {
    let mut cursor = data;
    let value = decode_value(&mut cursor)?;
    if cursor.has_remaining() {
        return Err(PmtError::decode(format_args!(
            "{} trailing bytes after PDU",
            cursor.remaining()
        )));
    }
    match value {
        PmtValue::Pair(car, cdr) => Ok((*car, *cdr)),
        other => Err(PmtError::decode(format_args!("expected pair, got: {other}"))),
    }
}

fn decode_at(
    buf: &mut impl Buf,
    options: &DecodeOptions,
    depth: usize,
) -> Result<PmtValue, PmtError> {
    if depth > options.max_depth {
        return Err(PmtError::decode(format_args!(
            "nesting exceeds maximum depth of {}",
            options.max_depth
        )));
    }
    if !buf.has_remaining() {
        return Err(PmtError::decode("unexpected end of data"));
    }

    let t = buf.get_u8();
    match t {
        tag::NIL => Ok(PmtValue::Nil),

        tag::TRUE => Ok(PmtValue::Bool(true)),
        tag::FALSE => Ok(PmtValue::Bool(false)),

        tag::SYMBOL => decode_symbol_data(buf).map(PmtValue::Symbol),

        tag::INT32 => {
            ensure_remaining(buf, 4)?;
            Ok(PmtValue::Int32(i32::get_wire(buf)))
        }
        tag::UINT64 => {
            ensure_remaining(buf, 8)?;
            Ok(PmtValue::UInt64(u64::get_wire(buf)))
        }
        tag::REAL => {
            ensure_remaining(buf, 8)?;
            Ok(PmtValue::Real(f64::get_wire(buf)))
        }

        tag::PAIR => decode_pair(buf, options, depth),
        tag::DICT => decode_dict(buf, options, depth),
        tag::UNIFORM_VECTOR => decode_uniform_vector(buf, options).map(PmtValue::Vector),

        t if tag::is_reserved(t) => Err(PmtError::UnsupportedType { tag: t }),
        _ => Err(PmtError::decode(format_args!("unknown PMT tag: 0x{t:02X}"))),
    }
}

fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), PmtError> {
    if buf.remaining() < needed {
        Err(PmtError::decode(format_args!(
            "need {needed} bytes but only {} remaining",
            buf.remaining()
        )))
    } else {
        Ok(())
    }
}

fn peek(buf: &impl Buf) -> Option<u8> {
    buf.chunk().first().copied()
}

fn expect_tag(buf: &mut impl Buf, expected: u8, what: &str) -> Result<(), PmtError> {
    ensure_remaining(buf, 1)?;
    let t = buf.get_u8();
    if t == expected {
        Ok(())
    } else {
        Err(PmtError::decode(format_args!(
            "expected {what} tag 0x{expected:02X}, got 0x{t:02X}"
        )))
    }
}

fn decode_symbol_data(buf: &mut impl Buf) -> Result<String, PmtError> {
    ensure_remaining(buf, 2)?;
    let len = usize::from(u16::get_wire(buf));
    ensure_remaining(buf, len)?;
    let mut data = vec![0u8; len];
    buf.copy_to_slice(&mut data);
    String::from_utf8(data)
        .map_err(|e| PmtError::decode(format_args!("invalid UTF-8 symbol: {e}")))
}

fn decode_pair(
    buf: &mut impl Buf,
    options: &DecodeOptions,
    depth: usize,
) -> Result<PmtValue, PmtError> {
    let car = decode_at(buf, options, depth + 1)?;
    match peek(buf) {
        Some(tag::TERMINATOR) => buf.advance(1),
        // An empty car: the Nil just read was the terminator.
        Some(_) if car.is_nil() => {}
        Some(other) => {
            return Err(PmtError::decode(format_args!(
                "expected pair terminator, got 0x{other:02X}"
            )));
        }
        None if car.is_nil() => return Ok(PmtValue::pair(PmtValue::Nil, PmtValue::Nil)),
        None => return Err(PmtError::decode("unexpected end of data in pair")),
    }
    let cdr = if buf.has_remaining() {
        decode_at(buf, options, depth + 1)?
    } else {
        PmtValue::Nil
    };
    Ok(PmtValue::pair(car, cdr))
}

/// Called with the first `DICT` tag already consumed.
fn decode_dict(
    buf: &mut impl Buf,
    options: &DecodeOptions,
    depth: usize,
) -> Result<PmtValue, PmtError> {
    let mut entries = Vec::new();
    loop {
        expect_tag(buf, tag::PAIR, "dictionary pair")?;
        expect_tag(buf, tag::SYMBOL, "dictionary key")?;
        let key = decode_symbol_data(buf)?;
        let value = decode_at(buf, options, depth + 1)?;
        entries.push((key, value));

        if peek(buf) != Some(tag::DICT) {
            break;
        }
        buf.advance(1);
    }
    Ok(PmtValue::Dict(entries))
}

fn decode_uniform_vector(
    buf: &mut impl Buf,
    options: &DecodeOptions,
) -> Result<UniformVector, PmtError> {
    ensure_remaining(buf, 1)?;
    let kind = VectorKind::from_subtag(buf.get_u8())?;

    ensure_remaining(buf, 4 + tag::UNIFORM_VECTOR_MARKER.len())?;
    let count = u32::get_wire(buf);
    if count > options.max_elements {
        return Err(PmtError::decode(format_args!(
            "vector of {count} elements exceeds limit of {}",
            options.max_elements
        )));
    }
    let mut found = [0u8; 2];
    buf.copy_to_slice(&mut found);
    if found != tag::UNIFORM_VECTOR_MARKER {
        return Err(PmtError::decode(format_args!(
            "bad uniform vector marker: {:02X} {:02X}",
            found[0], found[1]
        )));
    }

    let count = count as usize;
    let payload_len = count.checked_mul(kind.element_size()).ok_or_else(|| {
        PmtError::decode(format_args!("vector of {count} {kind} elements is too large"))
    })?;
    ensure_remaining(buf, payload_len)?;
    Ok(match kind {
        VectorKind::U8 => UniformVector::U8(read_elements(buf, count)),
        VectorKind::S8 => UniformVector::S8(read_elements(buf, count)),
        VectorKind::U16 => UniformVector::U16(read_elements(buf, count)),
        VectorKind::S16 => UniformVector::S16(read_elements(buf, count)),
        VectorKind::U32 => UniformVector::U32(read_elements(buf, count)),
        VectorKind::S32 => UniformVector::S32(read_elements(buf, count)),
        VectorKind::U64 => UniformVector::U64(read_elements(buf, count)),
        VectorKind::S64 => UniformVector::S64(read_elements(buf, count)),
        VectorKind::F32 => UniformVector::F32(read_elements(buf, count)),
        VectorKind::F64 => UniformVector::F64(read_elements(buf, count)),
        VectorKind::C64 => UniformVector::C64(read_elements::<Complex32>(buf, count)),
        VectorKind::C128 => UniformVector::C128(read_elements::<Complex64>(buf, count)),
    })
}

fn read_elements<T: UniformElement>(buf: &mut impl Buf, count: usize) -> Vec<T> {
    (0..count).map(|_| T::get_wire(buf)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::encode;
    use bytes::BytesMut;

    fn decode(bytes: &[u8]) -> Result<PmtValue, PmtError> {
        let mut cursor = bytes;
        decode_value(&mut cursor)
    }

    #[test]
    fn decode_scalars() {
        assert_eq!(decode(&[0x06]).unwrap(), PmtValue::Nil);
        assert_eq!(decode(&[0x00]).unwrap(), PmtValue::Bool(true));
        assert_eq!(decode(&[0x01]).unwrap(), PmtValue::Bool(false));
        assert_eq!(decode(&[0x03, 0xFF, 0xFF, 0xFF, 0xFE]).unwrap(), PmtValue::Int32(-2));
        assert_eq!(
            decode(&[0x0B, 0, 0, 0, 0, 0, 0, 1, 0]).unwrap(),
            PmtValue::UInt64(256)
        );
        assert_eq!(
            decode(&[0x02, 0x00, 0x02, b'h', b'i']).unwrap(),
            PmtValue::Symbol("hi".into())
        );
    }

    #[test]
    fn decode_real() {
        let mut buf = BytesMut::new();
        encode::encode_real(&mut buf, -123.456);
        assert_eq!(decode(&buf).unwrap(), PmtValue::Real(-123.456));
    }

    #[test]
    fn decode_dict_run() {
        let mut buf = BytesMut::new();
        encode::dict_add(&mut buf, "timetag", 123.456f64).unwrap();
        encode::dict_add(&mut buf, "freq", 10e6f64).unwrap();
        encode::dict_add(&mut buf, "freq", 1u64).unwrap();
        assert_eq!(
            decode(&buf).unwrap(),
            PmtValue::Dict(vec![
                ("timetag".into(), PmtValue::Real(123.456)),
                ("freq".into(), PmtValue::Real(10e6)),
                ("freq".into(), PmtValue::UInt64(1)),
            ])
        );
    }

    #[test]
    fn decode_pdu_with_dict_and_vector() {
        let mut meta = BytesMut::new();
        encode::dict_add(&mut meta, "timetag", 1.5f64).unwrap();
        encode::dict_add(&mut meta, "on", true).unwrap();
        let mut vec = BytesMut::new();
        let samples = [Complex32::new(1.0, -1.0), Complex32::new(0.5, 0.5)];
        encode::encode_uniform_vector(&mut vec, &samples).unwrap();
        let mut pdu = BytesMut::new();
        encode::encode_pair(&mut pdu, &meta, &vec);

        let (car, cdr) = decode_pdu(&pdu).unwrap();
        assert_eq!(car.dict_get("timetag"), Some(&PmtValue::Real(1.5)));
        assert_eq!(car.dict_get("on"), Some(&PmtValue::Bool(true)));
        assert_eq!(cdr, PmtValue::Vector(UniformVector::C64(samples.to_vec())));
    }

    #[test]
    fn decode_pair_with_nil_cdr() {
        let bytes = [0x07, 0x02, 0x00, 0x01, b'x', 0x06, 0x06];
        assert_eq!(
            decode(&bytes).unwrap(),
            PmtValue::pair(PmtValue::Symbol("x".into()), PmtValue::Nil)
        );
    }

    #[test]
    fn decode_pair_with_empty_halves() {
        // cons(empty, vector)
        let mut vec = BytesMut::new();
        encode::encode_uniform_vector(&mut vec, &[9u8]).unwrap();
        let mut pdu = BytesMut::new();
        encode::encode_pair(&mut pdu, &[], &vec);
        let (car, cdr) = decode_pdu(&pdu).unwrap();
        assert_eq!(car, PmtValue::Nil);
        assert_eq!(cdr, PmtValue::Vector(UniformVector::U8(vec![9])));

        // cons(symbol, empty)
        assert_eq!(
            decode(&[0x07, 0x02, 0x00, 0x00, 0x06]).unwrap(),
            PmtValue::pair(PmtValue::Symbol(String::new()), PmtValue::Nil)
        );

        // cons(empty, empty)
        assert_eq!(
            decode(&[0x07, 0x06]).unwrap(),
            PmtValue::pair(PmtValue::Nil, PmtValue::Nil)
        );
    }

    #[test]
    fn decode_vector_kinds() {
        let mut buf = BytesMut::new();
        encode::encode_uniform_vector(&mut buf, &[-1i64, 2]).unwrap();
        assert_eq!(decode(&buf).unwrap(), PmtValue::Vector(UniformVector::S64(vec![-1, 2])));

        buf.clear();
        encode::encode_uniform_vector::<Complex64>(&mut buf, &[]).unwrap();
        assert_eq!(decode(&buf).unwrap(), PmtValue::Vector(UniformVector::C128(vec![])));
    }

    #[test]
    fn reserved_tags_are_unsupported() {
        for t in [0x05, 0x08, 0x0C, 0x0D] {
            assert_eq!(decode(&[t]), Err(PmtError::UnsupportedType { tag: t }));
        }
        assert_eq!(
            decode(&[0x0A, 0x0C, 0, 0, 0, 0, 1, 0]),
            Err(PmtError::UnsupportedType { tag: 0x0C })
        );
    }

    #[test]
    fn unknown_tag_is_decode_error() {
        assert!(decode(&[0xEE]).unwrap_err().is_decode());
    }

    #[test]
    fn truncated_input() {
        assert!(decode(&[]).unwrap_err().is_decode());
        assert!(decode(&[0x03, 0x00, 0x01]).unwrap_err().is_decode());
        assert!(decode(&[0x02, 0x00, 0x05, b'a']).unwrap_err().is_decode());
        assert!(decode(&[0x0A, 0x08, 0, 0, 0, 1, 1, 0, 0x3F]).unwrap_err().is_decode());
    }

    #[test]
    fn bad_marker_rejected() {
        let err = decode(&[0x0A, 0x00, 0, 0, 0, 0, 0x00, 0x00]).unwrap_err();
        assert!(err.to_string().contains("marker"));
    }

    #[test]
    fn element_limit_enforced() {
        let mut buf = BytesMut::new();
        encode::encode_uniform_vector(&mut buf, &[0u8; 4]).unwrap();
        let options = DecodeOptions::new().max_elements(3);
        let mut cursor = &buf[..];
        assert!(decode_value_with(&mut cursor, &options).is_err());
    }

    #[test]
    fn huge_declared_count_is_rejected_without_reading() {
        let options = DecodeOptions::new().max_elements(u32::MAX);
        let bytes = [0x0A, 0x0B, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x3F];
        let mut cursor = &bytes[..];
        let err = decode_value_with(&mut cursor, &options).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn invalid_utf8_symbol() {
        let err = decode(&[0x02, 0x00, 0x01, 0xFF]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn depth_limit_enforced() {
        // ((((x . ()) . ()) . ()) . ())
        let mut value = BytesMut::new();
        encode::encode_bool(&mut value, true);
        for _ in 0..4 {
            let mut outer = BytesMut::new();
            encode::encode_pair(&mut outer, &value, &[tag::NIL]);
            value = outer;
        }
        let options = DecodeOptions::new().max_depth(2);
        let mut cursor = &value[..];
        assert!(decode_value_with(&mut cursor, &options).is_err());

        let mut cursor = &value[..];
        assert!(decode_value_with(&mut cursor, &DecodeOptions::default()).is_ok());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let err = decode_pdu(&[0x07, 0x00, 0x06, 0x01, 0x06]).unwrap_err();
        assert!(err.to_string().contains("trailing"));
        assert!(decode_pdu(&[0x00]).is_err());
    }
}
