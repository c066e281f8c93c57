//! pmtwire — a pure-Rust encoder for the PMT binary wire format.
//!
//! PMT ("polymorphic type") values are self-describing tagged messages used
//! between signal-processing blocks. This crate builds them directly as flat
//! byte buffers, with no intermediate value tree.
//!
//! # Architecture
//!
//! - **`wire`** — Tag table, byte-order normalization, encoder and decoder
//! - **`types`** — Scalar, uniform-vector and decoded value types
//! - **`pmt`** — Append-only [`Pmt`] buffers, immutable [`Pdu`]s and [`cons`]
//! - **`pdu`** — Metadata + payload PDU builder
//!
//! ```
//! use pmtwire::{cons, make_dict, Complex32, Pmt};
//!
//! let mut meta = make_dict();
//! meta.dict_add("timetag", 123.456f64)?;
//! meta.dict_add("freq", 10e6f64)?;
//! let samples = [Complex32::new(1.0, -1.0), Complex32::new(0.5, 0.5)];
//! let vec = Pmt::uniform_vector(&samples)?;
//! let pdu = cons(&meta, &vec);
//! assert_eq!(pdu.as_bytes()[0], 0x07);
//! # Ok::<(), pmtwire::PmtError>(())
//! ```

pub mod error;
pub mod pdu;
pub mod pmt;
pub mod types;
pub mod wire;

pub use error::PmtError;
pub use pdu::{make_pdu, PduBuilder};
pub use pmt::{cons, make_dict, Pdu, Pmt};
pub use types::{
    Complex, Complex32, Complex64, DictValue, PmtValue, Scalar, UniformVector, VectorKind,
};
