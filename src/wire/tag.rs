//! PMT type tag constants.

// Boolean (note: true sorts before false on the wire)
pub const TRUE: u8 = 0x00;
pub const FALSE: u8 = 0x01;

// Symbol: 2-byte length + raw bytes
pub const SYMBOL: u8 = 0x02;

// Fixed-width numbers
pub const INT32: u8 = 0x03;
pub const REAL: u8 = 0x04;
pub const COMPLEX: u8 = 0x05; // reserved

// Nil, also used as the terminator between the two halves of a pair.
pub const NIL: u8 = 0x06;
pub const TERMINATOR: u8 = NIL;

// Composites
pub const PAIR: u8 = 0x07;
pub const VECTOR: u8 = 0x08; // reserved
pub const DICT: u8 = 0x09;
pub const UNIFORM_VECTOR: u8 = 0x0A;

pub const UINT64: u8 = 0x0B;
pub const TUPLE: u8 = 0x0C; // reserved
pub const INT64: u8 = 0x0D; // reserved

/// Fixed bytes written after every uniform vector's element count.
pub const UNIFORM_VECTOR_MARKER: [u8; 2] = [0x01, 0x00];

/// Dictionary entry prefix: `DICT` followed by `PAIR`.
pub const DICT_ENTRY: [u8; 2] = [DICT, PAIR];

/// Uniform vector element sub-tags.
pub mod uvec {
    pub const U8: u8 = 0x00;
    pub const S8: u8 = 0x01;
    pub const U16: u8 = 0x02;
    pub const S16: u8 = 0x03;
    pub const U32: u8 = 0x04;
    pub const S32: u8 = 0x05;
    pub const U64: u8 = 0x06;
    pub const S64: u8 = 0x07;
    pub const F32: u8 = 0x08;
    pub const F64: u8 = 0x09;
    pub const C64: u8 = 0x0A;
    pub const C128: u8 = 0x0B;
}

/// Tags that have a number assigned but no encoding rule.
pub const fn is_reserved(tag: u8) -> bool {
    matches!(tag, COMPLEX | VECTOR | TUPLE | INT64)
}
