mod local;

pub use local::LocalFileReader;

use async_trait::async_trait;

/// Trait for positioned reads from an archive source.
///
/// The archive is shared for the whole extraction call, so reads take
/// `&self` and carry their own offset instead of moving a cursor. This is
/// what lets a progress sink peek at an entry's bytes without disturbing
/// the read the materializer performs afterwards.
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Fill `buf` completely with the bytes starting at `offset`.
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<()>;

    /// Total size of the archive in bytes.
    fn size(&self) -> u64;
}
