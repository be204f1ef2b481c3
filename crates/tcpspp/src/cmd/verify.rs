use std::fs;

use serde::Deserialize;
use tcpspp_bundle::{verify_bundle, Block, Bundle, CrcType};

use crate::cmd::VerifyArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS};
use crate::output::{print_block_reports, OutputFormat};

/// One block as described by an external bundle decoder's manifest.
#[derive(Deserialize, Debug)]
struct ManifestBlock {
    block_number: u64,
    block_type: u64,
    crc_type: ManifestCrcType,
    #[serde(default)]
    crc_provided: u32,
    /// Canonical block bytes, hex-encoded.
    data: String,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum ManifestCrcType {
    None,
    Crc16,
    Crc32c,
}

impl From<ManifestCrcType> for CrcType {
    fn from(value: ManifestCrcType) -> Self {
        match value {
            ManifestCrcType::None => CrcType::None,
            ManifestCrcType::Crc16 => CrcType::Crc16,
            ManifestCrcType::Crc32c => CrcType::Crc32c,
        }
    }
}

pub fn run(args: VerifyArgs, format: OutputFormat) -> CliResult<i32> {
    let manifest = fs::read_to_string(&args.path)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))?;
    let bundle = parse_manifest(&manifest)?;

    let reports = verify_bundle(&bundle);
    print_block_reports(&reports, format);

    // Every block is checked and reported before the exit code reflects
    // whether any checksum failed.
    if reports.iter().all(|report| report.is_ok()) {
        Ok(SUCCESS)
    } else {
        Ok(FAILURE)
    }
}

fn parse_manifest(manifest: &str) -> CliResult<Bundle> {
    let blocks: Vec<ManifestBlock> = serde_json::from_str(manifest)
        .map_err(|err| CliError::new(DATA_INVALID, format!("manifest is not valid JSON: {err}")))?;

    let blocks = blocks
        .into_iter()
        .map(|block| {
            let data = hex::decode(block.data.trim()).map_err(|err| {
                CliError::new(
                    DATA_INVALID,
                    format!("block {} data is not valid hex: {err}", block.block_number),
                )
            })?;
            Ok(Block::new(
                block.block_number,
                block.block_type,
                block.crc_type.into(),
                block.crc_provided,
                data,
            ))
        })
        .collect::<CliResult<Vec<Block>>>()?;

    Ok(Bundle::new(blocks))
}
