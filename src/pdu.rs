//! PDU assembly: a metadata dictionary paired with a payload vector.

use crate::error::PmtError;
use crate::pmt::{cons, Pdu, Pmt};
use crate::types::{Complex32, DictValue};

/// Builder for a metadata + payload PDU.
///
/// Metadata entries are encoded in the order they were added; repeated keys
/// are all kept.
#[derive(Debug, Clone, Default)]
pub struct PduBuilder {
    meta: Vec<(String, DictValue<'static>)>,
    capacity: Option<usize>,
}

impl PduBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial capacity of the metadata buffer.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Adds a metadata entry.
    pub fn meta<'a>(mut self, key: impl Into<String>, value: impl Into<DictValue<'a>>) -> Self {
        self.meta.push((key.into(), value.into().into_owned()));
        self
    }

    /// Encodes the metadata and pairs it with `payload`.
    pub fn build(self, payload: impl AsRef<[u8]>) -> Result<Pdu, PmtError> {
        let mut dict = match self.capacity {
            Some(n) => Pmt::with_capacity(n),
            None => Pmt::make_dict(),
        };
        for (key, value) in self.meta {
            dict.dict_add(&key, value)?;
        }
        Ok(cons(&dict, payload))
    }
}

/// Builds the canonical sample PDU: `{timetag}` paired with a complex64
/// vector of `samples`.
pub fn make_pdu(samples: &[Complex32], timetag: f32) -> Result<Pdu, PmtError> {
    let payload = Pmt::uniform_vector(samples)?;
    PduBuilder::new().meta("timetag", timetag).build(&payload)
}
