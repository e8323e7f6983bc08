//! Cartridge (ROM) related functions and structures (spec §4.6, §6).
//!
//! Only the ROM-only cartridge type is implemented; any other type byte at
//! 0x0147 is rejected with [`Error::UnsupportedCartridgeType`], leaving bank
//! switching to an external adapter (spec §1 Non-goals).

use std::fmt::{self, Display, Formatter};

use crate::error::Error;

/// Minimum size a cartridge image must have for the header (0x0100-0x014F)
/// to be read in full.
pub const HEADER_END: usize = 0x0150;

/// Size of a single ROM-only cartridge's address space, mapped at
/// 0x0000-0x7FFF with no banking.
pub const ROM_CAPACITY: usize = 0x8000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RomType {
    RomOnly,
    Other(u8),
}

impl RomType {
    fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => RomType::RomOnly,
            other => RomType::Other(other),
        }
    }

    pub fn description(&self) -> String {
        match self {
            RomType::RomOnly => String::from("ROM Only"),
            RomType::Other(byte) => format!("Unsupported (0x{byte:02x})"),
        }
    }
}

impl Display for RomType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Parsed view of the cartridge header fields this core cares about. Kept
/// separate from [`Cartridge`]'s raw bytes so callers can inspect it without
/// re-deriving title/checksum on every access.
#[derive(Clone, Debug)]
pub struct CartridgeHeader {
    pub title: String,
    pub rom_type: RomType,
    pub header_checksum: u8,
}

impl CartridgeHeader {
    fn parse(data: &[u8]) -> Self {
        let title_bytes = &data[0x0134..0x0144];
        let title_end = title_bytes
            .iter()
            .position(|&b| b == 0x00)
            .unwrap_or(title_bytes.len());
        let title = String::from_utf8_lossy(&title_bytes[..title_end])
            .trim()
            .to_string();
        Self {
            title,
            rom_type: RomType::from_byte(data[0x0147]),
            header_checksum: data[0x014d],
        }
    }
}

/// The ROM-only cartridge adapter: raw bytes, read for 0x0000-0x7FFF, a
/// scratch external RAM region for 0xA000-0xBFFF. Writes to the ROM region
/// are silently ignored (spec §4.1).
#[derive(Clone)]
pub struct Cartridge {
    rom_data: Vec<u8>,
    ram_data: Vec<u8>,
    header: CartridgeHeader,
}

impl Cartridge {
    /// Builds an empty, unloaded cartridge. Reads return 0xff until
    /// [`Cartridge::from_bytes`] produces a loaded one.
    pub fn empty() -> Self {
        Self {
            rom_data: vec![],
            ram_data: vec![0x00; 0x2000],
            header: CartridgeHeader {
                title: String::new(),
                rom_type: RomType::RomOnly,
                header_checksum: 0,
            },
        }
    }

    /// Loads a raw cartridge image. Rejects images shorter than the header
    /// (`Error::TruncatedRom`) and any type byte other than ROM-only
    /// (`Error::UnsupportedCartridgeType`), per spec §6/§7.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() < HEADER_END {
            return Err(Error::TruncatedRom);
        }
        let header = CartridgeHeader::parse(data);
        if header.rom_type != RomType::RomOnly {
            let RomType::Other(byte) = header.rom_type else {
                unreachable!()
            };
            return Err(Error::UnsupportedCartridgeType(byte));
        }
        Ok(Self {
            rom_data: data.to_vec(),
            ram_data: vec![0x00; 0x2000],
            header,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    /// Recomputes the header checksum the way the boot ROM does and
    /// compares it against the byte stored at 0x014D.
    pub fn valid_checksum(&self) -> bool {
        if self.rom_data.len() < HEADER_END {
            return false;
        }
        let mut sum: u8 = 0;
        for &byte in &self.rom_data[0x0134..=0x014c] {
            sum = sum.wrapping_sub(byte).wrapping_sub(1);
        }
        sum == self.header.header_checksum
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7fff => *self.rom_data.get(addr as usize).unwrap_or(&0xff),
            0xa000..=0xbfff => self.ram_data[(addr - 0xa000) as usize],
            _ => 0xff,
        }
    }

    /// Writes to ROM are no-ops under ROM-only (spec §4.1); external RAM is
    /// free.
    pub fn write(&mut self, addr: u16, value: u8) {
        if let 0xa000..=0xbfff = addr {
            self.ram_data[(addr - 0xa000) as usize] = value;
        }
    }
}

impl Default for Cartridge {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_of_size(rom_type: u8, len: usize) -> Vec<u8> {
        let mut data = vec![0x00; len];
        if len > 0x0147 {
            data[0x0147] = rom_type;
        }
        data
    }

    #[test]
    fn truncated_rom_is_rejected() {
        let data = vec![0x00; 0x10];
        assert_eq!(Cartridge::from_bytes(&data), Err(Error::TruncatedRom));
    }

    #[test]
    fn non_rom_only_type_is_rejected() {
        let data = rom_of_size(0x01, HEADER_END);
        assert_eq!(
            Cartridge::from_bytes(&data),
            Err(Error::UnsupportedCartridgeType(0x01))
        );
    }

    #[test]
    fn rom_only_loads_and_reads_back() {
        let mut data = rom_of_size(0x00, HEADER_END + 0x10);
        data[0x0100] = 0xAB;
        let cartridge = Cartridge::from_bytes(&data).unwrap();
        assert_eq!(cartridge.read(0x0100), 0xAB);
    }

    #[test]
    fn rom_writes_are_ignored() {
        let data = rom_of_size(0x00, HEADER_END);
        let mut cartridge = Cartridge::from_bytes(&data).unwrap();
        cartridge.write(0x0100, 0xFF);
        assert_eq!(cartridge.read(0x0100), 0x00);
    }

    #[test]
    fn external_ram_is_read_write() {
        let data = rom_of_size(0x00, HEADER_END);
        let mut cartridge = Cartridge::from_bytes(&data).unwrap();
        cartridge.write(0xa010, 0x42);
        assert_eq!(cartridge.read(0xa010), 0x42);
    }

    #[test]
    fn title_is_trimmed_and_nul_terminated() {
        let mut data = rom_of_size(0x00, HEADER_END);
        data[0x0134..0x0134 + 5].copy_from_slice(b"HELLO");
        let cartridge = Cartridge::from_bytes(&data).unwrap();
        assert_eq!(cartridge.title(), "HELLO");
    }
}
