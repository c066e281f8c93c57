//! Append-only PMT buffers.
//!
//! A [`Pmt`] is an encoded value under construction: its bytes are always a
//! valid sequence of tagged units and can be extended or embedded as-is.
//! [`cons`] and [`Pmt::freeze`] produce an immutable [`Pdu`].

use bytes::{Bytes, BytesMut};

use crate::error::PmtError;
use crate::types::{DictValue, Scalar, UniformElement, VectorKind};
use crate::wire::encode;

/// A growable, exclusively-owned encoded value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pmt {
    buf: BytesMut,
}

impl Pmt {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// A buffer holding a single Nil tag.
    pub fn nil() -> Self {
        let mut pmt = Self::with_capacity(1);
        encode::encode_nil(&mut pmt.buf);
        pmt
    }

    /// An empty dictionary. No tag is written until the first entry.
    pub fn make_dict() -> Self {
        Self::new()
    }

    /// Encodes a uniform vector holding `data`.
    pub fn uniform_vector<T: UniformElement>(data: &[T]) -> Result<Self, PmtError> {
        let mut pmt = Self::new();
        encode::encode_uniform_vector(&mut pmt.buf, data)?;
        Ok(pmt)
    }

    /// Encodes a uniform vector from host-order element memory.
    pub fn uniform_vector_from_ne_bytes(kind: VectorKind, raw: &[u8]) -> Result<Self, PmtError> {
        let mut pmt = Self::new();
        encode::encode_uniform_vector_ne_bytes(&mut pmt.buf, kind, raw)?;
        Ok(pmt)
    }

    pub fn push_nil(&mut self) -> &mut Self {
        encode::encode_nil(&mut self.buf);
        self
    }

    pub fn push_bool(&mut self, value: bool) -> &mut Self {
        encode::encode_bool(&mut self.buf, value);
        self
    }

    pub fn push_int32(&mut self, value: i32) -> &mut Self {
        encode::encode_int32(&mut self.buf, value);
        self
    }

    pub fn push_uint64(&mut self, value: u64) -> &mut Self {
        encode::encode_uint64(&mut self.buf, value);
        self
    }

    pub fn push_real(&mut self, value: f64) -> &mut Self {
        encode::encode_real(&mut self.buf, value);
        self
    }

    pub fn push_real32(&mut self, value: f32) -> &mut Self {
        encode::encode_real32(&mut self.buf, value);
        self
    }

    pub fn push_scalar(&mut self, value: impl Into<Scalar>) -> &mut Self {
        encode::encode_scalar(&mut self.buf, value.into());
        self
    }

    pub fn push_symbol(&mut self, symbol: &str) -> Result<&mut Self, PmtError> {
        encode::encode_symbol(&mut self.buf, symbol)?;
        Ok(self)
    }

    /// Appends a key/value entry. Insertion order is kept and keys may repeat.
    pub fn dict_add<'a>(
        &mut self,
        key: &str,
        value: impl Into<DictValue<'a>>,
    ) -> Result<&mut Self, PmtError> {
        encode::dict_add(&mut self.buf, key, value)?;
        Ok(self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finishes the value, making it immutable.
    pub fn freeze(self) -> Pdu {
        Pdu(self.buf.freeze())
    }

    pub fn into_inner(self) -> BytesMut {
        self.buf
    }
}

impl AsRef<[u8]> for Pmt {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

/// A finished, immutable encoded value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pdu(Bytes);

impl Pdu {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for Pdu {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Pdu> for Bytes {
    fn from(pdu: Pdu) -> Self {
        pdu.0
    }
}

/// An empty dictionary buffer.
pub fn make_dict() -> Pmt {
    Pmt::make_dict()
}

/// Pairs two encoded values: `PAIR car NIL cdr`.
///
/// Typically `car` is a metadata dictionary and `cdr` a payload vector.
/// Neither half is validated.
pub fn cons(car: impl AsRef<[u8]>, cdr: impl AsRef<[u8]>) -> Pdu {
    let (car, cdr) = (car.as_ref(), cdr.as_ref());
    let mut buf = BytesMut::new();
    encode::encode_pair(&mut buf, car, cdr);
    tracing::debug!(car_len = car.len(), cdr_len = cdr.len(), "assembled PMT pair");
    Pdu(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Complex32;
    use crate::wire::tag;

    #[test]
    fn empty_dict_is_zero_length() {
        assert!(make_dict().is_empty());
        assert_eq!(Pmt::make_dict().len(), 0);
    }

    #[test]
    fn nil_buffer() {
        assert_eq!(Pmt::nil().as_bytes(), &[tag::NIL]);
    }

    #[test]
    fn cons_symbol_with_nil() {
        let mut a = Pmt::new();
        a.push_symbol("x").unwrap();
        let pdu = cons(&a, Pmt::nil());

        let mut expected = vec![tag::PAIR];
        expected.extend_from_slice(a.as_bytes());
        expected.extend_from_slice(&[tag::NIL, tag::NIL]);
        assert_eq!(pdu.as_bytes(), &expected[..]);
    }

    #[test]
    fn cons_nests_finished_values() {
        let inner = cons(Pmt::nil(), Pmt::nil());
        let outer = cons(&inner, Pmt::nil());
        assert_eq!(
            outer.as_bytes(),
            &[0x07, 0x07, 0x06, 0x06, 0x06, 0x06, 0x06]
        );
    }

    #[test]
    fn chained_pushes_accumulate() {
        let mut pmt = Pmt::new();
        pmt.push_bool(true).push_bool(false).push_int32(1).push_nil();
        assert_eq!(pmt.as_bytes(), &[0x00, 0x01, 0x03, 0, 0, 0, 1, 0x06]);
    }

    #[test]
    fn push_scalar_dispatch() {
        let mut pmt = Pmt::new();
        pmt.push_scalar(2u64).push_scalar(0.5f32);
        let mut expected = vec![tag::UINT64, 0, 0, 0, 0, 0, 0, 0, 2, tag::REAL];
        expected.extend_from_slice(&0.5f64.to_be_bytes());
        assert_eq!(pmt.as_bytes(), &expected[..]);
    }

    #[test]
    fn dict_entries_in_insertion_order() {
        let mut meta = make_dict();
        meta.dict_add("timetag", 123.456f64)
            .unwrap()
            .dict_add("freq", 10e6f64)
            .unwrap();
        let bytes = meta.as_bytes();

        // DICT PAIR SYMBOL len(2) "timetag" REAL f64
        assert_eq!(&bytes[..5], &[0x09, 0x07, 0x02, 0x00, 0x07]);
        assert_eq!(&bytes[5..12], b"timetag");
        let second = 5 + 7 + 9;
        assert_eq!(&bytes[second..second + 5], &[0x09, 0x07, 0x02, 0x00, 0x04]);
        assert_eq!(&bytes[second + 5..second + 9], b"freq");
        assert_eq!(bytes.len(), second + 9 + 9);
    }

    #[test]
    fn dict_mixes_scalar_and_symbol_values() {
        let mut meta = make_dict();
        meta.dict_add("gain", 3i32)
            .unwrap()
            .dict_add("antenna", String::from("TX/RX"))
            .unwrap();
        let bytes = meta.as_bytes();
        let second = 2 + 3 + 4 + 5;
        assert_eq!(&bytes[second + 5..second + 12], b"antenna");
        assert_eq!(&bytes[second + 12..second + 15], &[tag::SYMBOL, 0x00, 0x05]);
        assert_eq!(&bytes[second + 15..], b"TX/RX");
    }

    #[test]
    fn failed_dict_add_leaves_buffer_untouched() {
        let mut meta = make_dict();
        meta.dict_add("a", 1i32).unwrap();
        let before = meta.clone();
        let key = "k".repeat(70_000);
        assert!(meta.dict_add(&key, true).is_err());
        assert_eq!(meta, before);
    }

    #[test]
    fn uniform_vector_from_samples() {
        let v = Pmt::uniform_vector(&[Complex32::new(1.0, -1.0)]).unwrap();
        assert_eq!(&v.as_bytes()[..8], &[0x0A, 0x0A, 0, 0, 0, 1, 0x01, 0x00]);
        assert_eq!(v.len(), 16);
    }

    #[test]
    fn freeze_keeps_bytes() {
        let mut pmt = Pmt::new();
        pmt.push_real32(1.0);
        let expected = pmt.as_bytes().to_vec();
        let pdu = pmt.freeze();
        assert_eq!(pdu.as_bytes(), &expected[..]);
        assert_eq!(Bytes::from(pdu).len(), 9);
    }
}
