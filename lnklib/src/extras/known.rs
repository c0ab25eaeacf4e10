use crate::extras::KNOWN_FOLDER_SIG;
use crate::utils::nom_helper::{nom_data, nom_unsigned_four_bytes};
use crate::utils::uuid::guid_from_le_bytes;
use common::windows::KnownFolderData;
use std::mem::size_of;

const BLOCK_SIZE: u32 = 28;

/// Parse the known folder payload: the folder GUID and the offset of the
/// item ID record it applies to
pub(crate) fn parse_known(data: &[u8]) -> nom::IResult<&[u8], KnownFolderData> {
    let (input, guid_data) = nom_data(data, size_of::<u128>() as u64)?;
    let (input, offset) = nom_unsigned_four_bytes(input)?;

    // The slice is always exactly 16 bytes, conversion cannot fail
    let folder_id = guid_from_le_bytes(guid_data).unwrap_or_default();

    Ok((input, KnownFolderData { folder_id, offset }))
}

/// Serialize the known folder block
pub(crate) fn build_known(known: &KnownFolderData) -> Vec<u8> {
    let mut data = Vec::with_capacity(BLOCK_SIZE as usize);
    data.extend_from_slice(&BLOCK_SIZE.to_le_bytes());
    data.extend_from_slice(&KNOWN_FOLDER_SIG.to_le_bytes());
    data.extend_from_slice(&known.folder_id.to_bytes_le());
    data.extend_from_slice(&known.offset.to_le_bytes());
    data
}
