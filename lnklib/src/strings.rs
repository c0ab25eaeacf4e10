use crate::utils::nom_helper::{nom_data, nom_unsigned_two_bytes};
use crate::utils::strings::{extract_utf8_string, extract_utf16_string, utf16_bytes};

/// Extract one string data field from `shortcut` data. The 16-bit prefix
/// counts characters, so UTF16 fields span twice that many bytes
pub(crate) fn extract_string(data: &[u8], unicode: bool) -> nom::IResult<&[u8], String> {
    let (input, size) = nom_unsigned_two_bytes(data)?;

    if unicode {
        let wide_size = 2;
        let (input, string_data) = nom_data(input, size as u64 * wide_size)?;
        return Ok((input, extract_utf16_string(string_data)));
    }
    let (input, string_data) = nom_data(input, size as u64)?;
    Ok((input, extract_utf8_string(string_data)))
}

/// Serialize one string data field: 16-bit character count, then the text
/// without a terminator
pub(crate) fn write_string_data(value: &str, unicode: bool) -> Vec<u8> {
    let mut data = Vec::new();
    if unicode {
        let text = utf16_bytes(value);
        let wide_size = 2;
        data.extend_from_slice(&((text.len() / wide_size) as u16).to_le_bytes());
        data.extend_from_slice(&text);
    } else {
        let text = value.as_bytes();
        data.extend_from_slice(&(text.len() as u16).to_le_bytes());
        data.extend_from_slice(text);
    }
    data
}
