use crate::utils::encoding::base64_encode_standard;
use log::warn;

/// Get a UTF16 string from provided bytes data. Stops at the first NUL wide
/// character or when the data runs out
pub(crate) fn extract_utf16_string(data: &[u8]) -> String {
    let mut wide_chars: Vec<u16> = Vec::new();
    let wide_size = 2;
    for wide_char in data.chunks(wide_size) {
        if wide_char.len() < wide_size {
            break;
        }
        let value = u16::from_le_bytes([wide_char[0], wide_char[1]]);
        if value == 0 {
            break;
        }
        wide_chars.push(value);
    }

    let utf16_result = String::from_utf16(&wide_chars);
    match utf16_result {
        Ok(result) => result,
        Err(err) => {
            warn!("[strings] Failed to get UTF16 string: {err:?}");
            format!("Failed to get UTF16: {}", base64_encode_standard(data))
        }
    }
}

/// Get a UTF8 string from provided bytes data, trimming trailing NUL padding
pub(crate) fn extract_utf8_string(data: &[u8]) -> String {
    let utf8_result = String::from_utf8(data.to_vec());
    match utf8_result {
        Ok(result) => result.trim_end_matches('\0').to_string(),
        Err(err) => {
            warn!("[strings] Failed to get UTF8 string: {err:?}");
            format!("Failed to get UTF8: {}", base64_encode_standard(data))
        }
    }
}

/// Encode a string as UTF16 little-endian bytes without a terminator
pub(crate) fn utf16_bytes(value: &str) -> Vec<u8> {
    value
        .encode_utf16()
        .flat_map(|wide_char| wide_char.to_le_bytes())
        .collect()
}

/// Encode a string as UTF16 little-endian bytes with a NUL terminator
pub(crate) fn utf16_bytes_nul(value: &str) -> Vec<u8> {
    let mut data = utf16_bytes(value);
    data.extend_from_slice(&[0, 0]);
    data
}

/// Encode a string in the single-byte (non-unicode) form with a NUL
/// terminator. Non-ASCII text is emitted as UTF8 bytes so the stream stays
/// well formed even when callers force single-byte mode
pub(crate) fn ansi_bytes_nul(value: &str) -> Vec<u8> {
    let mut data = value.as_bytes().to_vec();
    data.push(0);
    data
}

/// Whether text survives the single-byte encoding unchanged
pub(crate) fn is_single_byte(value: &str) -> bool {
    value.is_ascii()
}

#[cfg(test)]
mod tests {
    use crate::utils::strings::{
        ansi_bytes_nul, extract_utf8_string, extract_utf16_string, is_single_byte, utf16_bytes,
        utf16_bytes_nul,
    };

    #[test]
    fn test_extract_utf16_string() {
        let test = [
            78, 0, 79, 0, 84, 0, 69, 0, 80, 0, 65, 0, 68, 0, 46, 0, 69, 0, 88, 0, 69, 0, 0, 0,
        ];
        assert_eq!(extract_utf16_string(&test), "NOTEPAD.EXE");
    }

    #[test]
    fn test_extract_utf16_string_no_terminator() {
        let test = [109, 0, 101, 0, 109, 0, 111, 0];
        assert_eq!(extract_utf16_string(&test), "memo");
    }

    #[test]
    fn test_extract_utf8_string() {
        let test = [78, 79, 84, 69, 80, 65, 68, 46, 69, 88, 69, 0, 0];
        assert_eq!(extract_utf8_string(&test), "NOTEPAD.EXE");
    }

    #[test]
    fn test_utf16_bytes() {
        assert_eq!(utf16_bytes("ab"), [97, 0, 98, 0]);
    }

    #[test]
    fn test_utf16_bytes_nul() {
        assert_eq!(utf16_bytes_nul("ab"), [97, 0, 98, 0, 0, 0]);
    }

    #[test]
    fn test_ansi_bytes_nul() {
        assert_eq!(ansi_bytes_nul("C:"), [67, 58, 0]);
    }

    #[test]
    fn test_is_single_byte() {
        assert!(is_single_byte("C:\\Windows"));
        assert!(!is_single_byte("C:\\Документы"));
    }

    #[test]
    fn test_utf16_round_trip() {
        let value = "C:\\Users\\テスト";
        assert_eq!(extract_utf16_string(&utf16_bytes_nul(value)), value);
    }
}
