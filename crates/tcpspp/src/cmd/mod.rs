use std::path::PathBuf;

use clap::{Args, Subcommand};
use tcpspp_bundle::BundleVersion;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod inspect;
pub mod send;
pub mod verify;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wrap a serialized bundle in a space packet and send it to a node.
    Send(SendArgs),
    /// Parse one framed packet from a capture file and print it.
    Inspect(InspectArgs),
    /// Check the block checksums of a decoded bundle manifest.
    Verify(VerifyArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Verify(args) => verify::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Host to connect to.
    #[arg(long, short = 'l', default_value = "127.0.0.1")]
    pub host: String,
    /// Port to connect to.
    #[arg(long, short = 'p', default_value_t = 4223)]
    pub port: u16,
    /// Application process identifier for the outgoing frame.
    #[arg(long, default_value_t = 1)]
    pub apid: u16,
    /// Packet sequence count.
    #[arg(long, default_value_t = 0)]
    pub sequence_count: u16,
    /// Bundle protocol generation of the payload (6 or 7).
    #[arg(long, short = 'b', default_value = "7")]
    pub bundle_version: BundleVersion,
    /// Disable the SPP CRC-16 trailer.
    #[arg(long)]
    pub no_crc: bool,
    /// Omit the secondary-header time code.
    #[arg(long)]
    pub no_timecode: bool,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Hex-encoded payload.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read the serialized bundle from a file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
    /// Wait for one reply frame and print it.
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Capture file containing one framed packet.
    pub path: PathBuf,
    /// The capture was taken with the CRC trailer disabled.
    #[arg(long)]
    pub no_crc: bool,
    /// The capture was taken without secondary-header time codes.
    #[arg(long)]
    pub no_timecode: bool,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Block manifest (JSON) produced by an external bundle decoder.
    pub path: PathBuf,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
