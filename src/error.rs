//! Error related data structures.

use std::fmt::{self, Display, Formatter};

/// Top level enum for error handling within the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The cartridge header at 0x0147 names a type other than ROM-only
    /// (0x00). Bank-switching cartridges are left to an external adapter.
    UnsupportedCartridgeType(u8),

    /// The supplied cartridge image is shorter than 0x0150 bytes, so the
    /// header cannot be read in full.
    TruncatedRom,

    /// `step_instruction` fetched an opcode with no implemented handler.
    /// The CPU's program counter is left at the pre-fetch value.
    UnimplementedOpcode { opcode: u8, cb_prefixed: bool },
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Error::UnsupportedCartridgeType(byte) => {
                format!("Unsupported cartridge type: 0x{byte:02x}")
            }
            Error::TruncatedRom => String::from("Cartridge image is too short to hold a header"),
            Error::UnimplementedOpcode {
                opcode,
                cb_prefixed,
            } => {
                if *cb_prefixed {
                    format!("Unimplemented opcode: 0xcb 0x{opcode:02x}")
                } else {
                    format!("Unimplemented opcode: 0x{opcode:02x}")
                }
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Error {}
