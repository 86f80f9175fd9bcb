use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod loopback;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Frame a payload.
    Encode(EncodeArgs),
    /// Recover payloads from a framed byte stream.
    Decode(DecodeArgs),
    /// Encode and decode locally through both decode paths.
    Loopback(LoopbackArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Loopback(args) => loopback::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw string payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read payload from file. Default: stdin.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Write the frame to a file; a summary goes to stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Buffer payload capacity in bytes.
    #[arg(long, default_value_t = lmx_codec::DEFAULT_CAPACITY)]
    pub capacity: usize,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Framed input file. Default: stdin.
    pub input: Option<PathBuf>,
    /// Use the find-then-copy path instead of byte-at-a-time decoding.
    #[arg(long)]
    pub bulk: bool,
    /// Exit after recovering N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Buffer payload capacity in bytes; larger frames are discarded.
    #[arg(long, default_value_t = lmx_codec::DEFAULT_CAPACITY)]
    pub capacity: usize,
}

#[derive(Args, Debug)]
pub struct LoopbackArgs {
    /// Payload to loop; defaults to 255 bytes of cycling digits.
    #[arg(long)]
    pub data: Option<String>,
    /// Buffer payload capacity in bytes.
    #[arg(long, default_value_t = 512)]
    pub capacity: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
