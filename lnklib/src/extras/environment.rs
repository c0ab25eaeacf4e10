use crate::utils::nom_helper::nom_data;
use crate::utils::strings::{extract_utf8_string, extract_utf16_string, utf16_bytes};

/// Fixed single-byte buffer length (MAX_PATH)
const ANSI_BUFFER: usize = 260;
/// Fixed UTF16 buffer length in bytes
const UNICODE_BUFFER: usize = 520;

/// Parse an environment style block: a fixed 260-byte single-byte buffer
/// followed by a fixed 520-byte UTF16 buffer. The UTF16 copy wins when both
/// are set. Shared by the environment variable, icon environment, and Darwin
/// blocks which differ only in signature
pub(crate) fn parse_environment(data: &[u8]) -> nom::IResult<&[u8], String> {
    let (input, ansi_data) = nom_data(data, ANSI_BUFFER as u64)?;
    let (input, unicode_data) = nom_data(input, UNICODE_BUFFER as u64)?;

    let unicode_value = extract_utf16_string(unicode_data);
    if !unicode_value.is_empty() {
        return Ok((input, unicode_value));
    }
    Ok((input, extract_utf8_string(ansi_data)))
}

/// Serialize an environment style block with the provided signature. The
/// target is truncated to fit the fixed buffers with their terminators
pub(crate) fn build_environment(target: &str, signature: &u32) -> Vec<u8> {
    let block_size = 8 + ANSI_BUFFER + UNICODE_BUFFER;

    let mut data = Vec::with_capacity(block_size);
    data.extend_from_slice(&(block_size as u32).to_le_bytes());
    data.extend_from_slice(&signature.to_le_bytes());

    let mut ansi_buffer = [0; ANSI_BUFFER];
    let target_ansi = target.as_bytes();
    let copy_len = target_ansi.len().min(ANSI_BUFFER - 1);
    ansi_buffer[..copy_len].copy_from_slice(&target_ansi[..copy_len]);
    data.extend_from_slice(&ansi_buffer);

    let mut unicode_buffer = [0; UNICODE_BUFFER];
    let target_unicode = utf16_bytes(target);
    let copy_len = target_unicode.len().min(UNICODE_BUFFER - 2);
    unicode_buffer[..copy_len].copy_from_slice(&target_unicode[..copy_len]);
    data.extend_from_slice(&unicode_buffer);

    data
}

#[cfg(test)]
mod tests {
    use super::{build_environment, parse_environment};

    #[test]
    fn test_build_environment_round_trip() {
        let data = build_environment("%windir%\\System32\\notepad.exe", &0xa0000001);
        assert_eq!(data.len(), 788);
        assert_eq!(&data[..4], &[20, 3, 0, 0]);

        let (_, value) = parse_environment(&data[8..]).unwrap();
        assert_eq!(value, "%windir%\\System32\\notepad.exe");
    }

    #[test]
    fn test_build_environment_non_ascii() {
        let data = build_environment("%USERPROFILE%\\Документы", &0xa0000007);
        let (_, value) = parse_environment(&data[8..]).unwrap();
        assert_eq!(value, "%USERPROFILE%\\Документы");
    }

    #[test]
    fn test_parse_environment_short_data() {
        let test = [0; 100];
        assert!(parse_environment(&test).is_err());
    }
}
