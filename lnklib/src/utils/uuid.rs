use log::warn;
use uuid::Uuid;

/// Convert little endian bytes to a UUID/GUID string
pub(crate) fn format_guid_le_bytes(data: &[u8]) -> String {
    let guid_result = guid_from_le_bytes(data);
    match guid_result {
        Some(result) => result.hyphenated().to_string(),
        None => format!("Not a GUID/UUID: {data:?}"),
    }
}

/// Convert little endian bytes to a UUID/GUID value
pub(crate) fn guid_from_le_bytes(data: &[u8]) -> Option<Uuid> {
    let guid_size = 16;
    if data.len() != guid_size {
        warn!(
            "[uuid] Provided little endian data does not meet GUID size of 16 bytes, got: {}",
            data.len()
        );
        return None;
    }

    let guid_data = data.try_into();
    match guid_data {
        Ok(result) => Some(Uuid::from_bytes_le(result)),
        Err(_err) => {
            warn!("[uuid] Could not convert little endian bytes to a GUID/UUID: {data:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::uuid::{format_guid_le_bytes, guid_from_le_bytes};

    #[test]
    fn test_format_guid_le_bytes() {
        let test = [
            17, 17, 17, 17, 17, 17, 17, 17, 17, 17, 17, 17, 17, 17, 17, 17,
        ];
        assert_eq!(
            format_guid_le_bytes(&test),
            "11111111-1111-1111-1111-111111111111"
        );
    }

    #[test]
    fn test_format_bad_guid_le_bytes() {
        let test = [17, 17, 17];
        assert_eq!(format_guid_le_bytes(&test), "Not a GUID/UUID: [17, 17, 17]");
    }

    #[test]
    fn test_guid_from_le_bytes() {
        let test = [
            224, 79, 208, 32, 234, 58, 105, 16, 162, 216, 8, 0, 43, 48, 48, 157,
        ];
        let guid = guid_from_le_bytes(&test).unwrap();
        assert_eq!(
            guid.hyphenated().to_string(),
            "20d04fe0-3aea-1069-a2d8-08002b30309d"
        );
    }
}
