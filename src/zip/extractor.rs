//! Resource pack extraction: destination naming, the extraction loop, and
//! per-entry materialization.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use flate2::read::DeflateDecoder;
use log::debug;
use tokio::fs;

use crate::error::{ExtractError, ExtractResult};
use crate::io::{LocalFileReader, ReadAt};
use crate::progress::{EntryPeek, EntrySource, ProgressSink};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Extract the archive at `archive_path` into a freshly named sibling
/// directory, returning the directory's path.
///
/// The sink is notified once per entry, in storage order, before that entry
/// is written to disk. The notification is awaited, so extraction never
/// runs ahead of the sink. Any failure aborts the whole extraction and
/// leaves whatever was already written in place.
pub async fn extract<S>(archive_path: &Path, sink: &mut S) -> ExtractResult<PathBuf>
where
    S: ProgressSink + ?Sized,
{
    if !archive_path.exists() {
        return Err(ExtractError::InvalidInput(archive_path.to_path_buf()));
    }

    let destination = resolve_destination(archive_path);
    debug!("destination resolved to \"{}\"", destination.display());

    let reader = Arc::new(LocalFileReader::open(archive_path).map_err(ExtractError::open)?);
    let extractor = ZipExtractor::new(reader);

    // Full entry list up front: the total count has to be known before the
    // first progress event.
    let entries = extractor.entries().await?;
    let total = entries.len();
    debug!("extracting {} entries", total);

    // Created even when the archive is empty. Deferred until after the
    // archive opened cleanly so invalid input leaves no trace on disk.
    fs::create_dir_all(&destination)
        .await
        .map_err(|e| ExtractError::write(&destination, e))?;

    for (index, entry) in entries.iter().enumerate() {
        let fraction = (index + 1) as f64 / total as f64;
        sink.on_entry(fraction, entry, EntryPeek::new(&extractor, entry))
            .await;
        extractor.materialize_entry(entry, &destination).await?;
    }

    Ok(destination)
}

/// Resolve the destination directory for an archive.
///
/// The directory is a sibling of the archive, named after the archive's
/// file name truncated at its *first* dot ("my.pack.v2.zip" becomes "my").
/// If that name is taken, " (2)", " (3)", ... are appended until an unused
/// name is found. The path is only chosen here, never created.
pub fn resolve_destination(archive_path: &Path) -> PathBuf {
    let file_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    // A leading-dot name like ".zip" would leave an empty base; fall back
    // to the whole file name so the destination never aliases the parent.
    let base = match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    };

    let parent = archive_path.parent().unwrap_or_else(|| Path::new(""));
    let mut candidate = parent.join(&base);
    let mut index = 2u32;
    while candidate.exists() {
        candidate = parent.join(format!("{base} ({index})"));
        index += 1;
    }
    candidate
}

/// Map an archive entry name onto a host-relative path.
///
/// Entry names may be delimited by `/`, `\`, or a mix of both. Empty, `.`
/// and `..` components are dropped, so an entry can never name a path
/// outside the destination directory.
pub fn entry_rel_path(name: &str) -> PathBuf {
    name.split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect()
}

/// High-level extractor bound to one open archive.
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries, in storage order.
    pub async fn entries(&self) -> ExtractResult<Vec<ZipFileEntry>> {
        self.parser.entries().await
    }

    /// Decode an entry's full content into memory.
    ///
    /// Every call performs its own positioned read, so a sink peeking at an
    /// entry does not disturb the read the materializer performs afterwards.
    pub async fn entry_bytes(&self, entry: &ZipFileEntry) -> ExtractResult<Vec<u8>> {
        let data_offset = self.parser.data_offset(entry).await?;

        let mut compressed = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut compressed)
            .await
            .map_err(ExtractError::read)?;

        match entry.compression_method {
            CompressionMethod::Stored => Ok(compressed),
            CompressionMethod::Deflate => {
                let mut decoder = DeflateDecoder::new(compressed.as_slice());
                let mut decoded = Vec::with_capacity(entry.uncompressed_size as usize);
                decoder.read_to_end(&mut decoded).map_err(|e| {
                    ExtractError::read(format!("inflating \"{}\": {e}", entry.file_name))
                })?;
                Ok(decoded)
            }
            CompressionMethod::Unsupported(method) => Err(ExtractError::read(format!(
                "unsupported compression method {method} for \"{}\"",
                entry.file_name
            ))),
        }
    }

    /// Reproduce one entry under the destination directory.
    ///
    /// Directory entries are created in full, including the leaf directory,
    /// so an explicit empty-directory entry appears in the output tree.
    /// File entries replace any file already at the target path.
    pub async fn materialize_entry(
        &self,
        entry: &ZipFileEntry,
        destination: &Path,
    ) -> ExtractResult<()> {
        let target = destination.join(entry_rel_path(&entry.file_name));

        if entry.is_directory {
            return fs::create_dir_all(&target)
                .await
                .map_err(|e| ExtractError::write(&target, e));
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ExtractError::write(parent, e))?;
        }

        // The entry is buffered in full before the first write, so a slow
        // or failing destination write never holds an archive read open.
        let data = self.entry_bytes(entry).await?;

        match fs::remove_file(&target).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ExtractError::write(&target, e)),
        }

        fs::write(&target, &data)
            .await
            .map_err(|e| ExtractError::write(&target, e))
    }
}

#[async_trait]
impl<R: ReadAt> EntrySource for ZipExtractor<R> {
    async fn entry_bytes(&self, entry: &ZipFileEntry) -> ExtractResult<Vec<u8>> {
        ZipExtractor::entry_bytes(self, entry).await
    }
}
