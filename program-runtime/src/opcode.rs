//! Instruction tags

use std::fmt;

/// Raw instruction tag read from code
///
/// No validation happens here; deciding whether a tag names a real
/// instruction is the dispatch loop's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpCode(pub u8);

impl OpCode {
    /// The tag as a byte
    pub fn byte(self) -> u8 {
        self.0
    }
}

impl From<u8> for OpCode {
    fn from(byte: u8) -> Self {
        OpCode(byte)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}
