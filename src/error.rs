//! Error types for PMT encoding and decoding.

/// Errors that can occur while building or parsing PMT buffers.
///
/// Encoding operations validate their input before touching the buffer, so
/// an error always means nothing was appended.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PmtError {
    #[error("unsupported PMT type tag: 0x{tag:02X}")]
    UnsupportedType { tag: u8 },

    #[error("length {len} exceeds the wire limit of {max}")]
    LengthOverflow { len: usize, max: usize },

    #[error("payload of {len} bytes is not a multiple of the {element_size}-byte element size")]
    MisalignedPayload { len: usize, element_size: usize },

    #[error("decode error: {0}")]
    Decode(String),
}

impl PmtError {
    /// Wraps any displayable error as a decode error.
    pub fn decode(e: impl std::fmt::Display) -> Self {
        Self::Decode(e.to_string())
    }

    /// Returns `true` if the error was raised while parsing input.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            PmtError::UnsupportedType { tag: 0x0C }.to_string(),
            "unsupported PMT type tag: 0x0C"
        );
        assert_eq!(
            PmtError::LengthOverflow { len: 70000, max: 65535 }.to_string(),
            "length 70000 exceeds the wire limit of 65535"
        );
        assert!(PmtError::decode("truncated").is_decode());
        assert!(!PmtError::UnsupportedType { tag: 0 }.is_decode());
    }
}
