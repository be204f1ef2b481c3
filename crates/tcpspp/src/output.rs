use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tcpspp_bundle::{block_type_name, BlockReport, CrcStatus};
use tcpspp_spp::{Packet, PacketType, SequenceFlags};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput<'a> {
    version: u8,
    packet_type: &'a str,
    apid: u16,
    sequence_flags: &'a str,
    sequence_count: u16,
    data_length: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    timecode: Option<TimecodeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crc: Option<String>,
    payload_size: usize,
    payload: String,
}

#[derive(Serialize)]
struct TimecodeOutput {
    coarse: u32,
    fine: u16,
}

pub fn print_packet(packet: &Packet, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput {
                version: packet.header.version,
                packet_type: packet_type_name(packet.header.packet_type),
                apid: packet.header.apid,
                sequence_flags: sequence_flags_name(packet.header.sequence_flags),
                sequence_count: packet.header.sequence_count,
                data_length: packet.header.data_length,
                timecode: packet.timecode.map(|tc| TimecodeOutput {
                    coarse: tc.coarse,
                    fine: tc.fine,
                }),
                crc: packet.crc.map(|crc| format!("{crc:#06x}")),
                payload_size: packet.payload.len(),
                payload: hex::encode(&packet.payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["version".to_string(), packet.header.version.to_string()])
                .add_row(vec![
                    "packet_type".to_string(),
                    packet_type_name(packet.header.packet_type).to_string(),
                ])
                .add_row(vec!["apid".to_string(), packet.header.apid.to_string()])
                .add_row(vec![
                    "sequence_flags".to_string(),
                    sequence_flags_name(packet.header.sequence_flags).to_string(),
                ])
                .add_row(vec![
                    "sequence_count".to_string(),
                    packet.header.sequence_count.to_string(),
                ])
                .add_row(vec![
                    "data_length".to_string(),
                    packet.header.data_length.to_string(),
                ])
                .add_row(vec![
                    "timecode".to_string(),
                    packet.timecode.map_or_else(
                        || "-".to_string(),
                        |tc| format!("coarse={} fine={}", tc.coarse, tc.fine),
                    ),
                ])
                .add_row(vec![
                    "crc".to_string(),
                    packet
                        .crc
                        .map_or_else(|| "-".to_string(), |crc| format!("{crc:#06x}")),
                ])
                .add_row(vec![
                    "payload".to_string(),
                    payload_preview(packet.payload.as_ref()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "apid={} type={} seq={}/{} len={} timecode={} crc={} payload={}",
                packet.header.apid,
                packet_type_name(packet.header.packet_type),
                sequence_flags_name(packet.header.sequence_flags),
                packet.header.sequence_count,
                packet.header.data_length,
                packet
                    .timecode
                    .map_or_else(|| "-".to_string(), |tc| format!("{}+{}", tc.coarse, tc.fine)),
                packet
                    .crc
                    .map_or_else(|| "-".to_string(), |crc| format!("{crc:#06x}")),
                payload_preview(packet.payload.as_ref()),
            );
        }
        OutputFormat::Raw => {
            print_raw(packet.payload.as_ref());
        }
    }
}

#[derive(Serialize)]
struct BlockReportOutput<'a> {
    block_number: u64,
    block_type: u64,
    block_type_name: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    provided: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    computed: Option<String>,
}

pub fn print_block_reports(reports: &[BlockReport], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<BlockReportOutput> = reports
                .iter()
                .map(|report| {
                    let (provided, computed) = status_values(report.status);
                    BlockReportOutput {
                        block_number: report.block_number,
                        block_type: report.block_type,
                        block_type_name: block_type_name(report.block_type),
                        status: status_name(report.status),
                        provided,
                        computed,
                    }
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["BLOCK", "TYPE", "PROVIDED", "COMPUTED", "STATUS"]);
            for report in reports {
                let (provided, computed) = status_values(report.status);
                table.add_row(vec![
                    report.block_number.to_string(),
                    block_type_name(report.block_type).to_string(),
                    provided.unwrap_or_else(|| "-".to_string()),
                    computed.unwrap_or_else(|| "-".to_string()),
                    status_name(report.status).to_uppercase(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for report in reports {
                match report.status {
                    CrcStatus::Valid { value } => println!(
                        "Block {} {} CRC: provided={value:#010x}, calculated={value:#010x} (OK)",
                        report.block_number,
                        block_type_name(report.block_type),
                    ),
                    CrcStatus::Mismatch { provided, computed } => println!(
                        "Block {} {} CRC: provided={provided:#010x}, calculated={computed:#010x} (FAIL)",
                        report.block_number,
                        block_type_name(report.block_type),
                    ),
                    CrcStatus::Unprotected => println!(
                        "Block {} {} CRC: none",
                        report.block_number,
                        block_type_name(report.block_type),
                    ),
                }
            }
        }
        OutputFormat::Raw => {
            for report in reports {
                println!("{}", status_name(report.status).to_uppercase());
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn packet_type_name(packet_type: PacketType) -> &'static str {
    match packet_type {
        PacketType::Telemetry => "telemetry",
        PacketType::Telecommand => "telecommand",
    }
}

fn sequence_flags_name(flags: SequenceFlags) -> &'static str {
    match flags {
        SequenceFlags::Continuation => "continuation",
        SequenceFlags::First => "first",
        SequenceFlags::Last => "last",
        SequenceFlags::Unsegmented => "unsegmented",
    }
}

fn status_name(status: CrcStatus) -> &'static str {
    match status {
        CrcStatus::Valid { .. } => "ok",
        CrcStatus::Mismatch { .. } => "fail",
        CrcStatus::Unprotected => "unprotected",
    }
}

fn status_values(status: CrcStatus) -> (Option<String>, Option<String>) {
    match status {
        CrcStatus::Valid { value } => {
            (Some(format!("{value:#010x}")), Some(format!("{value:#010x}")))
        }
        CrcStatus::Mismatch { provided, computed } => (
            Some(format!("{provided:#010x}")),
            Some(format!("{computed:#010x}")),
        ),
        CrcStatus::Unprotected => (None, None),
    }
}

const PREVIEW_BYTES: usize = 64;

fn payload_preview(payload: &[u8]) -> String {
    if payload.len() <= PREVIEW_BYTES {
        hex::encode(payload)
    } else {
        format!(
            "{}.. (+{} bytes)",
            hex::encode(&payload[..PREVIEW_BYTES]),
            payload.len() - PREVIEW_BYTES
        )
    }
}
