use std::fs::File;

use tcpspp_spp::PacketReader;

use crate::cmd::InspectArgs;
use crate::exit::{io_error, spp_error, CliResult, SUCCESS};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.path)
        .map_err(|err| io_error(&format!("failed opening {}", args.path.display()), err))?;

    // The capture file is driven through the same framer as a socket.
    let mut reader = PacketReader::new(file, !args.no_timecode, !args.no_crc);
    let packet = reader
        .read_packet()
        .map_err(|err| spp_error("frame parse failed", err))?;

    print_packet(&packet, format);
    Ok(SUCCESS)
}
