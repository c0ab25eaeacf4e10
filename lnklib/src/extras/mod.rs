/**
 * Extra data blocks form a chain after the string data section. Each block is
 * `[u32 total size][u32 signature][payload]` and the chain ends at the first
 * block whose size is below the minimum. Blocks with signatures this library
 * does not recognize are preserved verbatim so that files written by newer
 * shell versions survive a parse and rebuild without loss
 */
use crate::utils::nom_helper::{nom_data, nom_unsigned_four_bytes};
use common::windows::{ExtraData, RawDataBlock};
use log::warn;

pub(crate) mod codepage;
pub(crate) mod console;
pub(crate) mod darwin;
pub(crate) mod environment;
pub(crate) mod known;
pub(crate) mod property;
pub(crate) mod shim;
pub(crate) mod special;
pub(crate) mod tracker;
pub(crate) mod vista;

pub(crate) const ENVIRONMENT_SIG: u32 = 0xa0000001;
pub(crate) const CONSOLE_SIG: u32 = 0xa0000002;
pub(crate) const TRACKER_SIG: u32 = 0xa0000003;
pub(crate) const CODEPAGE_SIG: u32 = 0xa0000004;
pub(crate) const SPECIAL_FOLDER_SIG: u32 = 0xa0000005;
pub(crate) const DARWIN_SIG: u32 = 0xa0000006;
pub(crate) const ICON_ENVIRONMENT_SIG: u32 = 0xa0000007;
pub(crate) const SHIM_SIG: u32 = 0xa0000008;
pub(crate) const PROPERTY_SIG: u32 = 0xa0000009;
pub(crate) const KNOWN_FOLDER_SIG: u32 = 0xa000000b;
pub(crate) const VISTA_ID_LIST_SIG: u32 = 0xa000000c;

/// Any block smaller than its own size and signature fields ends the chain
const MIN_BLOCK_SIZE: u32 = 8;

/// Walk the extra data block chain. Returns the decoded blocks and the bytes
/// following the terminal marker
pub(crate) fn parse_extra_blocks(data: &[u8]) -> nom::IResult<&[u8], ExtraData> {
    let mut extra = ExtraData::default();
    let mut input = data;

    while input.len() >= 4 {
        let (block_input, size) = nom_unsigned_four_bytes(input)?;
        if size < MIN_BLOCK_SIZE {
            // Terminal marker. Anything after it is overlay data
            input = block_input;
            break;
        }
        if (size - 4) as usize > block_input.len() {
            warn!("[shortcuts] Extra data block size {size} exceeds remaining data");
            break;
        }
        let (next_input, block_data) = nom_data(block_input, (size - 4) as u64)?;
        let (payload, signature) = nom_unsigned_four_bytes(block_data)?;

        decode_block(&mut extra, &signature, payload);
        input = next_input;
    }

    Ok((input, extra))
}

/// Dispatch one block payload on its signature. Payloads that fail to decode
/// are kept as raw blocks rather than dropped
fn decode_block(extra: &mut ExtraData, signature: &u32, payload: &[u8]) {
    let keep_raw = |extra: &mut ExtraData| {
        extra.unknown.push(RawDataBlock {
            signature: *signature,
            data: payload.to_vec(),
        });
    };

    match *signature {
        ENVIRONMENT_SIG => match environment::parse_environment(payload) {
            Ok((_, value)) => extra.environment_variable = Some(value),
            Err(_err) => keep_raw(extra),
        },
        CONSOLE_SIG => match console::parse_console(payload) {
            Ok((_, value)) => extra.console = Some(value),
            Err(_err) => keep_raw(extra),
        },
        TRACKER_SIG => match tracker::parse_tracker(payload) {
            Ok((_, value)) => extra.tracker = Some(value),
            Err(_err) => keep_raw(extra),
        },
        CODEPAGE_SIG => match codepage::parse_codepage(payload) {
            Ok((_, value)) => extra.codepage = Some(value),
            Err(_err) => keep_raw(extra),
        },
        SPECIAL_FOLDER_SIG => match special::parse_special(payload) {
            Ok((_, value)) => extra.special_folder = Some(value),
            Err(_err) => keep_raw(extra),
        },
        DARWIN_SIG => match environment::parse_environment(payload) {
            Ok((_, value)) => extra.darwin_id = Some(value),
            Err(_err) => keep_raw(extra),
        },
        ICON_ENVIRONMENT_SIG => match environment::parse_environment(payload) {
            Ok((_, value)) => extra.icon_environment = Some(value),
            Err(_err) => keep_raw(extra),
        },
        SHIM_SIG => match shim::parse_shim(payload) {
            Ok((_, value)) => extra.shim_layer = Some(value),
            Err(_err) => keep_raw(extra),
        },
        PROPERTY_SIG => extra.property_store = Some(payload.to_vec()),
        KNOWN_FOLDER_SIG => match known::parse_known(payload) {
            Ok((_, value)) => extra.known_folder = Some(value),
            Err(_err) => keep_raw(extra),
        },
        VISTA_ID_LIST_SIG => extra.vista_id_list = Some(payload.to_vec()),
        _ => keep_raw(extra),
    }
}

/// Serialize the extra data block chain in its fixed order, followed by any
/// preserved unknown blocks and the terminal marker
pub(crate) fn build_extra_blocks(extra: &ExtraData) -> Vec<u8> {
    let mut data = Vec::new();

    if let Some(value) = &extra.environment_variable {
        data.extend_from_slice(&environment::build_environment(value, &ENVIRONMENT_SIG));
    }
    if let Some(console) = &extra.console {
        data.extend_from_slice(&console::build_console(console));
    }
    if let Some(tracker) = &extra.tracker {
        data.extend_from_slice(&tracker::build_tracker(tracker));
    }
    if let Some(codepage) = &extra.codepage {
        data.extend_from_slice(&codepage::build_codepage(codepage));
    }
    if let Some(special) = &extra.special_folder {
        data.extend_from_slice(&special::build_special(special));
    }
    if let Some(darwin) = &extra.darwin_id {
        data.extend_from_slice(&environment::build_environment(darwin, &DARWIN_SIG));
    }
    if let Some(icon) = &extra.icon_environment {
        data.extend_from_slice(&environment::build_environment(icon, &ICON_ENVIRONMENT_SIG));
    }
    if let Some(shim) = &extra.shim_layer {
        data.extend_from_slice(&shim::build_shim(shim));
    }
    if let Some(store) = &extra.property_store {
        data.extend_from_slice(&property::build_property(store));
    }
    if let Some(known) = &extra.known_folder {
        data.extend_from_slice(&known::build_known(known));
    }
    if let Some(id_list) = &extra.vista_id_list {
        data.extend_from_slice(&vista::build_vista(id_list));
    }

    for block in &extra.unknown {
        data.extend_from_slice(&((block.data.len() + 8) as u32).to_le_bytes());
        data.extend_from_slice(&block.signature.to_le_bytes());
        data.extend_from_slice(&block.data);
    }

    data.extend_from_slice(&0u32.to_le_bytes());
    data
}
