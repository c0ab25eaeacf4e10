use crate::extras::SHIM_SIG;
use crate::utils::strings::{extract_utf16_string, utf16_bytes_nul};

/// Parse the compatibility shim layer name payload
pub(crate) fn parse_shim(data: &[u8]) -> nom::IResult<&[u8], String> {
    Ok((&[], extract_utf16_string(data)))
}

/// Serialize the compatibility shim layer block. Variable length, the payload
/// is the NUL terminated UTF16 layer name
pub(crate) fn build_shim(layer_name: &str) -> Vec<u8> {
    let name_data = utf16_bytes_nul(layer_name);

    let mut data = Vec::with_capacity(8 + name_data.len());
    data.extend_from_slice(&((8 + name_data.len()) as u32).to_le_bytes());
    data.extend_from_slice(&SHIM_SIG.to_le_bytes());
    data.extend_from_slice(&name_data);
    data
}

#[cfg(test)]
mod tests {
    use super::{build_shim, parse_shim};

    #[test]
    fn test_build_shim_round_trip() {
        let data = build_shim("WIN95");
        assert_eq!(data.len(), 8 + 12);
        assert_eq!(&data[4..8], &[8, 0, 0, 160]);

        let (_, layer) = parse_shim(&data[8..]).unwrap();
        assert_eq!(layer, "WIN95");
    }
}
