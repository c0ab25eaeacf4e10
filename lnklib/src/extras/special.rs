use crate::extras::SPECIAL_FOLDER_SIG;
use crate::utils::nom_helper::nom_unsigned_four_bytes;
use common::windows::SpecialFolderData;

const BLOCK_SIZE: u32 = 16;

/// Parse the special folder payload: a CSIDL value and the offset of the
/// item ID record it applies to
pub(crate) fn parse_special(data: &[u8]) -> nom::IResult<&[u8], SpecialFolderData> {
    let (input, folder_id) = nom_unsigned_four_bytes(data)?;
    let (input, offset) = nom_unsigned_four_bytes(input)?;

    Ok((input, SpecialFolderData { folder_id, offset }))
}

/// Serialize the special folder block
pub(crate) fn build_special(special: &SpecialFolderData) -> Vec<u8> {
    let mut data = Vec::with_capacity(BLOCK_SIZE as usize);
    data.extend_from_slice(&BLOCK_SIZE.to_le_bytes());
    data.extend_from_slice(&SPECIAL_FOLDER_SIG.to_le_bytes());
    data.extend_from_slice(&special.folder_id.to_le_bytes());
    data.extend_from_slice(&special.offset.to_le_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::{build_special, parse_special};
    use common::windows::SpecialFolderData;

    #[test]
    fn test_build_special_round_trip() {
        let special = SpecialFolderData {
            folder_id: 36,
            offset: 221,
        };
        let data = build_special(&special);
        assert_eq!(data.len(), 16);

        let (_, parsed) = parse_special(&data[8..]).unwrap();
        assert_eq!(parsed, special);
    }
}
