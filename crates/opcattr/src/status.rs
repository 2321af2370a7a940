//! OPC UA status codes produced by the attribute services.
//!
//! Only the codes this layer can actually emit are modelled. The numeric values are
//! the ones defined by the OPC UA specification, so results can be handed straight
//! to an encoder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single read/write item or of a whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    Good,
    /// Batch-level: the request contained no items.
    BadNothingToDo,
    /// Batch-level: the request exceeded a configured operation limit.
    BadTooManyOperations,
    /// Write: the node id does not resolve.
    BadNodeIdInvalid,
    /// Read: the node id does not resolve.
    BadNodeIdUnknown,
    BadAttributeIdInvalid,
    BadNotReadable,
    BadNotWritable,
    BadWriteNotSupported,
    /// Write: the payload does not have the attribute's declared type.
    BadTypeMismatch,
}

impl StatusCode {
    pub const ALL: [StatusCode; 10] = [
        StatusCode::Good,
        StatusCode::BadNothingToDo,
        StatusCode::BadTooManyOperations,
        StatusCode::BadNodeIdInvalid,
        StatusCode::BadNodeIdUnknown,
        StatusCode::BadAttributeIdInvalid,
        StatusCode::BadNotReadable,
        StatusCode::BadNotWritable,
        StatusCode::BadWriteNotSupported,
        StatusCode::BadTypeMismatch,
    ];

    /// The 32-bit wire value.
    pub const fn bits(self) -> u32 {
        match self {
            StatusCode::Good => 0x0000_0000,
            StatusCode::BadNothingToDo => 0x800F_0000,
            StatusCode::BadTooManyOperations => 0x8010_0000,
            StatusCode::BadNodeIdInvalid => 0x8033_0000,
            StatusCode::BadNodeIdUnknown => 0x8034_0000,
            StatusCode::BadAttributeIdInvalid => 0x8035_0000,
            StatusCode::BadNotReadable => 0x803A_0000,
            StatusCode::BadNotWritable => 0x803B_0000,
            StatusCode::BadWriteNotSupported => 0x8073_0000,
            StatusCode::BadTypeMismatch => 0x8074_0000,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.bits() == bits)
    }

    pub const fn name(self) -> &'static str {
        match self {
            StatusCode::Good => "Good",
            StatusCode::BadNothingToDo => "BadNothingToDo",
            StatusCode::BadTooManyOperations => "BadTooManyOperations",
            StatusCode::BadNodeIdInvalid => "BadNodeIdInvalid",
            StatusCode::BadNodeIdUnknown => "BadNodeIdUnknown",
            StatusCode::BadAttributeIdInvalid => "BadAttributeIdInvalid",
            StatusCode::BadNotReadable => "BadNotReadable",
            StatusCode::BadNotWritable => "BadNotWritable",
            StatusCode::BadWriteNotSupported => "BadWriteNotSupported",
            StatusCode::BadTypeMismatch => "BadTypeMismatch",
        }
    }

    pub fn is_good(self) -> bool {
        self.bits() & 0xC000_0000 == 0
    }

    pub fn is_bad(self) -> bool {
        self.bits() & 0x8000_0000 != 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.name(), self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bits() {
        assert!(StatusCode::Good.is_good());
        assert!(!StatusCode::Good.is_bad());
        for code in StatusCode::ALL.into_iter().skip(1) {
            assert!(code.is_bad(), "{} should be bad", code.name());
            assert!(!code.is_good());
        }
    }

    #[test]
    fn from_bits_finds_every_code() {
        for code in StatusCode::ALL {
            assert_eq!(StatusCode::from_bits(code.bits()), Some(code));
        }
        assert_eq!(StatusCode::from_bits(0x8001_0000), None);
    }

    #[test]
    fn display_includes_hex() {
        assert_eq!(
            StatusCode::BadNotReadable.to_string(),
            "BadNotReadable (0x803A0000)"
        );
        assert_eq!(
            StatusCode::BadTypeMismatch.to_string(),
            "BadTypeMismatch (0x80740000)"
        );
    }
}
