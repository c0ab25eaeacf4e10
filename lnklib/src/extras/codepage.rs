use crate::extras::CODEPAGE_SIG;
use crate::utils::nom_helper::nom_unsigned_four_bytes;

const BLOCK_SIZE: u32 = 12;

/// Parse the console code page payload
pub(crate) fn parse_codepage(data: &[u8]) -> nom::IResult<&[u8], u32> {
    nom_unsigned_four_bytes(data)
}

/// Serialize the console code page block
pub(crate) fn build_codepage(codepage: &u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(BLOCK_SIZE as usize);
    data.extend_from_slice(&BLOCK_SIZE.to_le_bytes());
    data.extend_from_slice(&CODEPAGE_SIG.to_le_bytes());
    data.extend_from_slice(&codepage.to_le_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::{build_codepage, parse_codepage};

    #[test]
    fn test_build_codepage_round_trip() {
        let data = build_codepage(&65001);
        assert_eq!(data, [12, 0, 0, 0, 4, 0, 0, 160, 233, 253, 0, 0]);

        let (_, codepage) = parse_codepage(&data[8..]).unwrap();
        assert_eq!(codepage, 65001);
    }
}
