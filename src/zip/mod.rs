//! ZIP archive parsing and resource pack extraction.
//!
//! The module splits along the same seams as the container format:
//!
//! - [`structures`]: the on-disk records (end of central directory, ZIP64
//!   records, central directory entries)
//! - [`parser`]: locating and decoding those records over a positioned
//!   reader
//! - [`extractor`]: destination naming, the extraction loop, and writing
//!   entries out to disk
//!
//! Extraction is strictly sequential: entries are visited in
//! central-directory order, the progress sink is awaited for each entry,
//! and only then is the entry materialized.
//!
//! ## Limitations
//!
//! - STORED and DEFLATE entries only
//! - No encryption, multi-disk archives, or integrity verification

mod extractor;
mod parser;
mod structures;

pub use extractor::{ZipExtractor, entry_rel_path, extract, resolve_destination};
pub use parser::ZipParser;
pub use structures::*;
