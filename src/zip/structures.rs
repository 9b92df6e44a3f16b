use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{ExtractError, ExtractResult};

/// ZIP compression methods we know how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unsupported(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unsupported(value),
        }
    }

}

/// End of Central Directory record - 22 bytes minimum.
pub struct EndOfCentralDir {
    pub entry_count: u16,
    pub dir_size: u32,
    pub dir_offset: u32,
}

impl EndOfCentralDir {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> ExtractResult<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ExtractError::open("bad end of central directory"));
        }

        let mut cursor = Cursor::new(&data[4..]);
        let _disk_number = read_u16(&mut cursor)?;
        let _disk_with_dir = read_u16(&mut cursor)?;
        let _disk_entries = read_u16(&mut cursor)?;
        let entry_count = read_u16(&mut cursor)?;
        let dir_size = read_u32(&mut cursor)?;
        let dir_offset = read_u32(&mut cursor)?;

        Ok(Self {
            entry_count,
            dir_size,
            dir_offset,
        })
    }

    /// Any saturated field means the real values live in the ZIP64 record.
    pub fn is_zip64(&self) -> bool {
        self.entry_count == 0xFFFF || self.dir_size == 0xFFFFFFFF || self.dir_offset == 0xFFFFFFFF
    }
}

/// ZIP64 End of Central Directory Locator - 20 bytes.
pub struct Zip64Locator {
    pub eocd64_offset: u64,
}

impl Zip64Locator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";
    pub const SIZE: usize = 20;

    pub fn from_bytes(data: &[u8]) -> ExtractResult<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ExtractError::open("bad ZIP64 locator"));
        }

        let mut cursor = Cursor::new(&data[4..]);
        let _disk_with_eocd64 = read_u32(&mut cursor)?;
        let eocd64_offset = read_u64(&mut cursor)?;

        Ok(Self { eocd64_offset })
    }
}

/// ZIP64 End of Central Directory record - 56 bytes minimum.
pub struct Zip64EndOfCentralDir {
    pub entry_count: u64,
    pub dir_size: u64,
    pub dir_offset: u64,
}

impl Zip64EndOfCentralDir {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const MIN_SIZE: usize = 56;

    pub fn from_bytes(data: &[u8]) -> ExtractResult<Self> {
        if data.len() < Self::MIN_SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(ExtractError::open("bad ZIP64 end of central directory"));
        }

        let mut cursor = Cursor::new(&data[4..]);
        let _record_size = read_u64(&mut cursor)?;
        let _version_made_by = read_u16(&mut cursor)?;
        let _version_needed = read_u16(&mut cursor)?;
        let _disk_number = read_u32(&mut cursor)?;
        let _disk_with_dir = read_u32(&mut cursor)?;
        let _disk_entries = read_u64(&mut cursor)?;
        let entry_count = read_u64(&mut cursor)?;
        let dir_size = read_u64(&mut cursor)?;
        let dir_offset = read_u64(&mut cursor)?;

        Ok(Self {
            entry_count,
            dir_size,
            dir_offset,
        })
    }
}

/// Central Directory File Header - 46 bytes minimum.
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";

/// Local File Header - 30 bytes.
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// One entry of the archive, as recorded in the central directory.
///
/// `file_name` is the relative path stored in the archive; it may use `/`,
/// `\`, or a mix of both as separators. Entries are listed in
/// central-directory (storage) order, which drives progress accounting.
#[derive(Debug, Clone)]
pub struct ZipFileEntry {
    pub file_name: String,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub lfh_offset: u64,
    pub is_directory: bool,
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> ExtractResult<u16> {
    cursor
        .read_u16::<LittleEndian>()
        .map_err(ExtractError::read)
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> ExtractResult<u32> {
    cursor
        .read_u32::<LittleEndian>()
        .map_err(ExtractError::read)
}

fn read_u64(cursor: &mut Cursor<&[u8]>) -> ExtractResult<u64> {
    cursor
        .read_u64::<LittleEndian>()
        .map_err(ExtractError::read)
}
