//! PMT binary wire format.
//!
//! Every unit starts with a one-byte type tag and all multi-byte numbers are
//! big-endian. Composite values are built by concatenating encoded units.

pub mod decode;
pub mod encode;
pub mod endian;
pub mod tag;

pub use decode::{decode_pdu, decode_value, decode_value_with, DecodeOptions};
pub use encode::encode_value;
