use std::fs;

use tcpspp_bundle::BundleVersion;
use tcpspp_spp::{Packet, PacketReader, PacketWriter, PrimaryHeader, SequenceFlags, Timecode};

use crate::cmd::SendArgs;
use crate::exit::{io_error, spp_error, CliError, CliResult, SUCCESS, USAGE};
use crate::net;
use crate::output::{print_packet, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;

    let stream = net::connect(&args.host, args.port)
        .map_err(|err| io_error("connect failed", err))?;
    let reply_stream = stream
        .try_clone()
        .map_err(|err| io_error("stream clone failed", err))?;

    let header = PrimaryHeader {
        apid: args.apid,
        sequence_flags: SequenceFlags::Unsegmented,
        sequence_count: args.sequence_count,
        ..PrimaryHeader::default()
    };
    let timecode = (!args.no_timecode).then(Timecode::default);
    let packet = Packet::build(header, timecode, payload, !args.no_crc)
        .map_err(|err| spp_error("frame build failed", err))?;

    let mut writer = PacketWriter::new(stream);
    writer
        .send(&packet)
        .map_err(|err| spp_error("send failed", err))?;
    tracing::info!(
        apid = args.apid,
        bytes = packet.wire_size(),
        "frame sent"
    );

    if args.wait {
        let mut reader = PacketReader::new(reply_stream, !args.no_timecode, !args.no_crc);
        let reply = reader
            .read_packet()
            .map_err(|err| spp_error("receive failed", err))?;
        print_packet(&reply, format);

        match args.bundle_version {
            BundleVersion::V7 => tracing::info!(
                "block decoding is delegated to the bundle codec; run `tcpspp verify` on its block manifest"
            ),
            // No block-checksum path is defined for RFC 5050 bundles.
            BundleVersion::V6 => {}
        }
    }

    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(hex_str) = &args.hex {
        return hex::decode(hex_str.trim())
            .map_err(|err| CliError::new(USAGE, format!("--hex is not valid hex: {err}")));
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(
        USAGE,
        "a payload is required (--data, --hex, or --file)",
    ))
}
