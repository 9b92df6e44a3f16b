use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "mcunzip")]
#[command(version)]
#[command(about = "Extracts a zipped Minecraft resource pack next to the archive", long_about = None)]
#[command(after_help = "Examples:\n  \
  mcunzip Pack.zip         extract into a sibling directory named Pack\n  \
  mcunzip -vv Pack.zip     extract with debug logging on stderr")]
pub struct Cli {
    /// Zipped resource pack file to extract
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Pass multiple times for additional verbosity (info, debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
