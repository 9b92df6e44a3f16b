//! # mcunzip
//!
//! Extracts a zipped Minecraft resource pack into a sibling directory,
//! reporting progress once per archive entry.
//!
//! The destination directory is named after the archive's file name with
//! everything from the first dot dropped; if that name is taken, " (2)",
//! " (3)", ... are appended until an unused name is found. The archive's
//! internal paths are mirrored under the destination with separators
//! normalized to the host convention.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use async_trait::async_trait;
//! use mcunzip::{EntryPeek, ProgressSink, ZipFileEntry};
//!
//! struct Console;
//!
//! #[async_trait]
//! impl ProgressSink for Console {
//!     async fn on_entry(&mut self, fraction: f64, entry: &ZipFileEntry, _peek: EntryPeek<'_>) {
//!         println!("{}% - Extracting: {}", (fraction * 100.0).floor(), entry.file_name);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let destination = mcunzip::extract(Path::new("Pack.zip"), &mut Console).await?;
//!     println!("Resource Pack extracted at {}", destination.display());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod progress;
pub mod settings;
pub mod zip;

pub use cli::Cli;
pub use error::{ExtractError, ExtractResult};
pub use io::{LocalFileReader, ReadAt};
pub use progress::{EntryPeek, ProgressSink};
pub use settings::Settings;
pub use zip::{ZipExtractor, ZipFileEntry, extract, resolve_destination};
