use std::path::Path;

use async_trait::async_trait;

use super::ReadAt;

/// Local archive file with positioned-read access.
///
/// Owns the underlying file handle for the duration of one extraction;
/// dropping the reader closes the archive on every exit path.
pub struct LocalFileReader {
    file: std::fs::File,
    size: u64,
}

impl LocalFileReader {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_exact_at(buf, offset)
        }

        #[cfg(windows)]
        {
            use std::os::windows::fs::FileExt;
            // No pread equivalent that fills the buffer in one call; loop
            // over seek_read until the buffer is full.
            let mut filled = 0usize;
            while filled < buf.len() {
                let n = self.file.seek_read(&mut buf[filled..], offset + filled as u64)?;
                if n == 0 {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "archive truncated",
                    ));
                }
                filled += n;
            }
            Ok(())
        }

        #[cfg(not(any(unix, windows)))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(buf)
        }
    }

    fn size(&self) -> u64 {
        self.size
    }
}
