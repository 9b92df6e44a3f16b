//! Per-entry progress notifications.
//!
//! The extractor calls the sink exactly once per archive entry, in storage
//! order, before the entry is materialized on disk. The completion
//! fraction is `one_based_index / total_entries`: non-decreasing, and 1.0
//! on the final entry. A zero-entry archive produces no notifications.

use async_trait::async_trait;

use crate::error::ExtractResult;
use crate::zip::ZipFileEntry;

/// Receiver of per-entry progress notifications.
///
/// `on_entry` is awaited inline; extraction does not touch the entry until
/// it returns.
#[async_trait]
pub trait ProgressSink: Send {
    async fn on_entry(&mut self, fraction: f64, entry: &ZipFileEntry, peek: EntryPeek<'_>);
}

/// Object-safe source of an entry's decoded bytes.
///
/// Implemented by the extractor so a sink can read entry content without
/// owning the archive.
#[async_trait]
pub trait EntrySource: Send + Sync {
    async fn entry_bytes(&self, entry: &ZipFileEntry) -> ExtractResult<Vec<u8>>;
}

/// Handle passed to the sink alongside each notification.
///
/// Lets the sink opportunistically read the *current* entry's content (for
/// side effects such as pulling `pack.png` out as an icon) through an
/// independent positioned read; the materializer performs its own read
/// after the sink returns, so peeking never disturbs extraction.
pub struct EntryPeek<'a> {
    source: &'a dyn EntrySource,
    entry: &'a ZipFileEntry,
}

impl<'a> EntryPeek<'a> {
    pub(crate) fn new(source: &'a dyn EntrySource, entry: &'a ZipFileEntry) -> Self {
        Self { source, entry }
    }

    /// Decode this entry's full content.
    pub async fn bytes(&self) -> ExtractResult<Vec<u8>> {
        self.source.entry_bytes(self.entry).await
    }
}
