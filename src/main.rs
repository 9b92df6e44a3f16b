//! Command-line front end for mcunzip.
//!
//! The core only returns the destination path and streams progress events;
//! everything user-facing (diagnostics, progress lines, the remembered
//! last-used directory) lives here.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use log::debug;

use mcunzip::progress::EntryPeek;
use mcunzip::{Cli, ProgressSink, Settings, ZipFileEntry};

/// Prints one progress line per entry, with the percentage floored the way
/// the progress fraction is quoted everywhere else.
struct ConsoleSink;

#[async_trait]
impl ProgressSink for ConsoleSink {
    async fn on_entry(&mut self, fraction: f64, entry: &ZipFileEntry, _peek: EntryPeek<'_>) {
        println!(
            "{}% - Extracting: {}",
            (fraction * 100.0).floor(),
            entry.file_name
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut errlog = stderrlog::new();
    errlog.verbosity(cli.verbose as usize);
    errlog.init()?;

    // A missing or nonexistent input is a diagnostic and a clean exit, not
    // a failure.
    let Some(file) = cli.file.as_deref() else {
        println!("Please specify which zipped resource pack file to extract.");
        return Ok(());
    };

    let archive_path = Path::new(file);
    if !archive_path.exists() {
        println!(
            "The specified zipped resource pack file \"{}\" does not exist.",
            display_absolute(archive_path)
        );
        return Ok(());
    }

    let destination = mcunzip::extract(archive_path, &mut ConsoleSink).await?;

    remember_last_directory(archive_path);

    for _ in 0..10 {
        println!();
    }
    println!(
        "Resource Pack extracted at {}",
        display_absolute(&destination)
    );

    Ok(())
}

/// Record the archive's parent directory for the next invocation. Purely a
/// convenience; failure to persist is not worth failing the extraction.
fn remember_last_directory(archive_path: &Path) {
    let Some(parent) = archive_path.parent() else {
        return;
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let parent = std::path::absolute(parent).unwrap_or_else(|_| parent.to_path_buf());

    let mut settings = Settings::load();
    settings.last_directory = Some(parent);
    if let Err(e) = settings.store() {
        debug!("couldn't persist settings: {e:#}");
    }
}

fn display_absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
