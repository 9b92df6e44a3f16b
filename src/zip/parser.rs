//! Central-directory parsing over a [`ReadAt`] source.
//!
//! ZIP archives are read from the end: the End of Central Directory (EOCD)
//! record locates the central directory, and the central directory lists
//! every entry with its name, sizes, and the offset of its local header.
//! Parsing the central directory once gives both the total entry count
//! (needed for progress fractions before the first entry is touched) and
//! the entries themselves, in storage order.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use log::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::io::ReadAt;

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes); bounds the
/// backwards search for an EOCD that follows a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Low-level ZIP container parser, generic over the archive source.
pub struct ZipParser<R: ReadAt> {
    reader: Arc<R>,
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Tries the comment-free layout first (EOCD flush with the end of the
    /// file), then searches backwards through the maximum comment span.
    /// Failure here means the file is not a ZIP container at all.
    async fn find_eocd(&self) -> ExtractResult<(EndOfCentralDir, u64)> {
        if self.size >= EndOfCentralDir::SIZE as u64 {
            let offset = self.size - EndOfCentralDir::SIZE as u64;
            let mut buf = vec![0u8; EndOfCentralDir::SIZE];
            self.read_exact(offset, &mut buf).await?;

            if &buf[0..4] == EndOfCentralDir::SIGNATURE && &buf[20..22] == b"\x00\x00" {
                let eocd = EndOfCentralDir::from_bytes(&buf)?;
                return Ok((eocd, offset));
            }
        }

        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDir::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.read_exact(search_start, &mut buf).await?;

        for i in (0..buf.len().saturating_sub(EndOfCentralDir::SIZE)).rev() {
            if &buf[i..i + 4] == EndOfCentralDir::SIGNATURE {
                // Candidate signature; the comment length field must account
                // for every byte that follows the record.
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
                if comment_len == buf.len() - i - EndOfCentralDir::SIZE {
                    let eocd = EndOfCentralDir::from_bytes(&buf[i..i + EndOfCentralDir::SIZE])?;
                    return Ok((eocd, search_start + i as u64));
                }
            }
        }

        Err(ExtractError::open("end of central directory not found"))
    }

    /// Read the ZIP64 record when the EOCD reports saturated fields.
    async fn read_zip64_eocd(&self, eocd_offset: u64) -> ExtractResult<Zip64EndOfCentralDir> {
        let locator_offset = eocd_offset
            .checked_sub(Zip64Locator::SIZE as u64)
            .ok_or_else(|| ExtractError::open("missing ZIP64 locator"))?;
        let mut locator_buf = vec![0u8; Zip64Locator::SIZE];
        self.read_exact(locator_offset, &mut locator_buf).await?;
        let locator = Zip64Locator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EndOfCentralDir::MIN_SIZE];
        self.read_exact(locator.eocd64_offset, &mut eocd64_buf)
            .await?;
        Zip64EndOfCentralDir::from_bytes(&eocd64_buf)
    }

    /// Parse the central directory into the full entry list.
    ///
    /// The returned vector is in storage order; its length is the total
    /// entry count used for progress accounting.
    pub async fn entries(&self) -> ExtractResult<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        let (dir_offset, dir_size, entry_count) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            (eocd64.dir_offset, eocd64.dir_size, eocd64.entry_count)
        } else {
            (
                eocd.dir_offset as u64,
                eocd.dir_size as u64,
                eocd.entry_count as u64,
            )
        };

        debug!(
            "central directory: {} entries, {} bytes at offset {}",
            entry_count, dir_size, dir_offset
        );

        let mut dir_data = vec![0u8; dir_size as usize];
        self.reader
            .read_exact_at(dir_offset, &mut dir_data)
            .await
            .map_err(ExtractError::read)?;

        let mut entries = Vec::with_capacity(entry_count as usize);
        let mut cursor = Cursor::new(dir_data.as_slice());
        for _ in 0..entry_count {
            entries.push(Self::parse_dir_entry(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse one Central Directory File Header from the cursor.
    fn parse_dir_entry(cursor: &mut Cursor<&[u8]>) -> ExtractResult<ZipFileEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig).map_err(ExtractError::read)?;
        if sig != CDFH_SIGNATURE {
            return Err(ExtractError::read("bad central directory file header"));
        }

        let read_err = ExtractError::read;

        let _version_made_by = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _version_needed = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _flags = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let compression_method = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _last_mod_time = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _last_mod_date = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _crc32 = cursor.read_u32::<LittleEndian>().map_err(read_err)?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>().map_err(read_err)? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>().map_err(read_err)? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let extra_field_length = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let file_comment_length = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
        let _external_attrs = cursor.read_u32::<LittleEndian>().map_err(read_err)?;
        let mut lfh_offset = cursor.read_u32::<LittleEndian>().map_err(read_err)? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor
            .read_exact(&mut file_name_bytes)
            .map_err(ExtractError::read)?;
        // Lossy conversion keeps extraction going for non-UTF8 names.
        let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

        // Directory entries end with a separator.
        let is_directory = file_name.ends_with('/') || file_name.ends_with('\\');

        // ZIP64 extended information lives in extra field 0x0001; each
        // 64-bit value is present only when its 32-bit field is saturated.
        let extra_field_end = cursor.position() + extra_field_length as u64;
        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>().map_err(read_err)?;
            let field_size = cursor.read_u16::<LittleEndian>().map_err(read_err)?;

            if header_id == 0x0001 {
                if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>().map_err(read_err)?;
                }
                if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>().map_err(read_err)?;
                }
                if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= extra_field_end {
                    lfh_offset = cursor.read_u64::<LittleEndian>().map_err(read_err)?;
                }
                break;
            } else {
                cursor.set_position(cursor.position() + field_size as u64);
            }
        }
        cursor.set_position(extra_field_end);

        // File comment is unused.
        cursor.set_position(cursor.position() + file_comment_length as u64);

        Ok(ZipFileEntry {
            file_name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            lfh_offset,
            is_directory,
        })
    }

    /// Compute the offset of an entry's data by sizing its local header.
    ///
    /// The local header repeats the name and extra field with lengths that
    /// may differ from the central directory's copy, so the data offset has
    /// to be derived from the local header itself.
    pub async fn data_offset(&self, entry: &ZipFileEntry) -> ExtractResult<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.read_exact(entry.lfh_offset, &mut lfh_buf).await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            return Err(ExtractError::read("bad local file header"));
        }

        let mut cursor = Cursor::new(lfh_buf.as_slice());
        cursor.set_position(26); // filename length field
        let file_name_length = cursor
            .read_u16::<LittleEndian>()
            .map_err(ExtractError::read)? as u64;
        let extra_field_length = cursor
            .read_u16::<LittleEndian>()
            .map_err(ExtractError::read)? as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }

    async fn read_exact(&self, offset: u64, buf: &mut [u8]) -> ExtractResult<()> {
        self.reader
            .read_exact_at(offset, buf)
            .await
            .map_err(ExtractError::read)
    }
}
