use crate::network::{build_network, parse_network};
use crate::utils::nom_helper::{nom_data, nom_unsigned_four_bytes};
use crate::utils::strings::{ansi_bytes_nul, extract_utf8_string, extract_utf16_string, utf16_bytes_nul};
use crate::volume::{build_volume, parse_volume};
use common::windows::{LinkInfo, LocalVolume, NetworkShare};
use nom::Needed;
use nom::bytes::complete::take_while;

const VOLUME_AND_BASE_PATH: u32 = 0x1;
const NETWORK_AND_SUFFIX: u32 = 0x2;

const ANSI_HEADER_SIZE: u32 = 0x1c;
const EXTENDED_HEADER_SIZE: u32 = 0x24;

/// Parse the location information from `shortcut` data. Returns the location
/// and whether the extended (UTF16) header form was used
pub(crate) fn parse_location(data: &[u8]) -> nom::IResult<&[u8], (LinkInfo, bool)> {
    let (_, size) = nom_unsigned_four_bytes(data)?;

    // Size includes the size field itself
    let adjust_size = 4;
    if size < adjust_size {
        return Err(nom::Err::Incomplete(Needed::Unknown));
    }
    let (remaining_input, block) = nom_data(data, size as u64)?;

    let (input, _size) = nom_unsigned_four_bytes(block)?;
    let (input, header_size) = nom_unsigned_four_bytes(input)?;
    let (input, flags) = nom_unsigned_four_bytes(input)?;
    let (input, volume_offset) = nom_unsigned_four_bytes(input)?;
    let (input, local_path_offset) = nom_unsigned_four_bytes(input)?;
    let (input, network_offset) = nom_unsigned_four_bytes(input)?;
    let (input, suffix_offset) = nom_unsigned_four_bytes(input)?;

    // The short header form has no UTF16 offset pair
    let extended = header_size >= EXTENDED_HEADER_SIZE;
    let (unicode_local_path_offset, unicode_suffix_offset) = if extended {
        let (input, local_unicode) = nom_unsigned_four_bytes(input)?;
        let (_, suffix_unicode) = nom_unsigned_four_bytes(input)?;
        (local_unicode, suffix_unicode)
    } else {
        (0, 0)
    };

    let mut info = LinkInfo::default();

    if (flags & VOLUME_AND_BASE_PATH) == VOLUME_AND_BASE_PATH && volume_offset != 0 {
        let (volume_data, _) = nom_data(block, volume_offset as u64)?;
        let (_, volume) = parse_volume(volume_data)?;

        let base_path = if extended && unicode_local_path_offset != 0 {
            read_utf16_at(block, &unicode_local_path_offset)?
        } else {
            read_ansi_at(block, &local_path_offset)?
        };

        info.local = Some(LocalVolume {
            drive_type: volume.drive_type,
            drive_serial: volume.drive_serial,
            volume_label: volume.volume_label,
            base_path,
        });
    }

    if (flags & NETWORK_AND_SUFFIX) == NETWORK_AND_SUFFIX && network_offset != 0 {
        let (network_data, _) = nom_data(block, network_offset as u64)?;
        let (_, network) = parse_network(network_data)?;

        let path_suffix = if extended && unicode_suffix_offset != 0 {
            read_utf16_at(block, &unicode_suffix_offset)?
        } else {
            read_ansi_at(block, &suffix_offset)?
        };

        info.network = Some(NetworkShare {
            share_name: network.share_name,
            device_name: network.device_name,
            provider_type: network.provider_type,
            path_suffix,
        });
    }

    Ok((remaining_input, (info, extended)))
}

/// Serialize the location information block. Sub-structures are laid out in a
/// fixed order and the header offset table is computed as they are appended.
/// The path suffix field is written even when no network structure is present
pub(crate) fn build_location(info: &LinkInfo, unicode: bool) -> Vec<u8> {
    let mut flags = 0;
    if info.local.is_some() {
        flags |= VOLUME_AND_BASE_PATH;
    }
    if info.network.is_some() {
        flags |= NETWORK_AND_SUFFIX;
    }

    let header_size = if unicode {
        EXTENDED_HEADER_SIZE
    } else {
        ANSI_HEADER_SIZE
    };

    let volume_data = info.local.as_ref().map(|local| build_volume(local, unicode));
    let base_path_ansi = info.local.as_ref().map(|local| ansi_bytes_nul(&local.base_path));
    let network_data = info
        .network
        .as_ref()
        .map(|network| build_network(network, unicode));

    // The suffix is mandatory, a lone NUL stands in when there is no network
    // structure
    let suffix_ansi = match &info.network {
        Some(network) => ansi_bytes_nul(&network.path_suffix),
        None => vec![0],
    };

    let mut volume_offset = 0;
    let mut local_path_offset = 0;
    let mut network_offset = 0;

    let mut current_offset = header_size as usize;
    if let (Some(volume), Some(base_path)) = (&volume_data, &base_path_ansi) {
        volume_offset = current_offset;
        current_offset += volume.len();
        local_path_offset = current_offset;
        current_offset += base_path.len();
    }
    if let Some(network) = &network_data {
        network_offset = current_offset;
        current_offset += network.len();
    }
    let suffix_offset = current_offset;
    current_offset += suffix_ansi.len();

    // UTF16 copies land after all single-byte payload
    let mut unicode_local_path_offset = 0;
    let mut unicode_suffix_offset = 0;
    let base_path_unicode = info
        .local
        .as_ref()
        .filter(|_| unicode)
        .map(|local| utf16_bytes_nul(&local.base_path));
    let suffix_unicode = if unicode {
        Some(match &info.network {
            Some(network) => utf16_bytes_nul(&network.path_suffix),
            None => utf16_bytes_nul(""),
        })
    } else {
        None
    };

    if let Some(base_path) = &base_path_unicode {
        unicode_local_path_offset = current_offset;
        current_offset += base_path.len();
    }
    if let Some(suffix) = &suffix_unicode {
        unicode_suffix_offset = current_offset;
        current_offset += suffix.len();
    }

    let mut data = Vec::with_capacity(current_offset);
    data.extend_from_slice(&(current_offset as u32).to_le_bytes());
    data.extend_from_slice(&header_size.to_le_bytes());
    data.extend_from_slice(&flags.to_le_bytes());
    data.extend_from_slice(&(volume_offset as u32).to_le_bytes());
    data.extend_from_slice(&(local_path_offset as u32).to_le_bytes());
    data.extend_from_slice(&(network_offset as u32).to_le_bytes());
    data.extend_from_slice(&(suffix_offset as u32).to_le_bytes());
    if unicode {
        data.extend_from_slice(&(unicode_local_path_offset as u32).to_le_bytes());
        data.extend_from_slice(&(unicode_suffix_offset as u32).to_le_bytes());
    }

    if let (Some(volume), Some(base_path)) = (volume_data, base_path_ansi) {
        data.extend_from_slice(&volume);
        data.extend_from_slice(&base_path);
    }
    if let Some(network) = network_data {
        data.extend_from_slice(&network);
    }
    data.extend_from_slice(&suffix_ansi);

    if let Some(base_path) = base_path_unicode {
        data.extend_from_slice(&base_path);
    }
    if let Some(suffix) = suffix_unicode {
        data.extend_from_slice(&suffix);
    }

    data
}

fn read_ansi_at<'a>(
    data: &'a [u8],
    offset: &u32,
) -> Result<String, nom::Err<nom::error::Error<&'a [u8]>>> {
    let (value_start, _) = nom_data(data, *offset as u64)?;
    let (_, value_data) = take_while(|value| value != 0)(value_start)?;
    Ok(extract_utf8_string(value_data))
}

fn read_utf16_at<'a>(
    data: &'a [u8],
    offset: &u32,
) -> Result<String, nom::Err<nom::error::Error<&'a [u8]>>> {
    let (value_start, _) = nom_data(data, *offset as u64)?;
    Ok(extract_utf16_string(value_start))
}

#[cfg(test)]
mod tests {
    use super::{build_location, parse_location};
    use common::windows::{DriveType, LinkInfo, LocalVolume, NetworkShare};

    #[test]
    fn test_parse_location() {
        let test = [
            101, 0, 0, 0, 28, 0, 0, 0, 1, 0, 0, 0, 28, 0, 0, 0, 45, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0,
            0, 17, 0, 0, 0, 3, 0, 0, 0, 62, 147, 144, 66, 16, 0, 0, 0, 0, 67, 58, 92, 85, 115, 101,
            114, 115, 92, 98, 111, 98, 92, 80, 114, 111, 106, 101, 99, 116, 115, 92, 97, 114, 116,
            101, 109, 105, 115, 45, 99, 111, 114, 101, 92, 115, 114, 99, 92, 102, 105, 108, 101,
            115, 121, 115, 116, 101, 109, 92, 110, 116, 102, 115, 0, 0,
        ];

        let (_, (info, extended)) = parse_location(&test).unwrap();
        assert!(!extended);
        let local = info.local.unwrap();
        assert_eq!(local.drive_type, DriveType::DriveFixed);
        assert_eq!(local.drive_serial, 0x4290933e);
        assert_eq!(local.volume_label, "");
        assert_eq!(
            local.base_path,
            "C:\\Users\\bob\\Projects\\artemis-core\\src\\filesystem\\ntfs"
        );
        assert_eq!(info.network, None);
    }

    #[test]
    fn test_build_location_local_round_trip() {
        let info = LinkInfo {
            local: Some(LocalVolume {
                drive_type: DriveType::DriveFixed,
                drive_serial: 0x12345678,
                volume_label: String::from("Windows"),
                base_path: String::from("C:\\Windows\\notepad.exe"),
            }),
            network: None,
        };

        let data = build_location(&info, false);
        let (remaining, (parsed, extended)) = parse_location(&data).unwrap();
        assert!(remaining.is_empty());
        assert!(!extended);
        assert_eq!(parsed, info);
    }

    #[test]
    fn test_build_location_network_round_trip() {
        let info = LinkInfo {
            local: None,
            network: Some(NetworkShare {
                share_name: String::from("\\\\server\\share"),
                device_name: Some(String::from("Z:")),
                provider_type: Some(0x00020000),
                path_suffix: String::from("document.docx"),
            }),
        };

        let data = build_location(&info, false);
        let (_, (parsed, _)) = parse_location(&data).unwrap();
        assert_eq!(parsed, info);
    }

    #[test]
    fn test_build_location_unicode_round_trip() {
        let info = LinkInfo {
            local: Some(LocalVolume {
                drive_type: DriveType::DriveFixed,
                drive_serial: 44,
                volume_label: String::from("テスト"),
                base_path: String::from("C:\\Users\\テスト\\Documents\\ファイル.txt"),
            }),
            network: Some(NetworkShare {
                share_name: String::from("\\\\サーバー\\共有"),
                device_name: Some(String::from("Z:")),
                provider_type: Some(0x00020000),
                path_suffix: String::from("ドキュメント.docx"),
            }),
        };

        let data = build_location(&info, true);
        let (_, (parsed, extended)) = parse_location(&data).unwrap();
        assert!(extended);
        assert_eq!(parsed, info);
    }

    #[test]
    fn test_build_location_empty_still_has_suffix() {
        let info = LinkInfo::default();
        let data = build_location(&info, false);
        // Header plus the lone NUL suffix byte
        assert_eq!(data.len(), 0x1c + 1);

        let (_, (parsed, _)) = parse_location(&data).unwrap();
        assert_eq!(parsed, LinkInfo::default());
    }
}
