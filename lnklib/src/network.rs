use crate::utils::nom_helper::{nom_data, nom_unsigned_four_bytes};
use crate::utils::strings::{ansi_bytes_nul, extract_utf8_string, extract_utf16_string, utf16_bytes_nul};
use common::windows::NetworkShare;
use nom::bytes::complete::take_while;

const VALID_DEVICE: u32 = 0x1;
const VALID_NET_TYPE: u32 = 0x2;

/// ANSI header is five 32-bit fields. A net name offset beyond this value
/// signals the extended header with UTF16 offsets
const ANSI_HEADER_SIZE: u32 = 0x14;
const EXTENDED_HEADER_SIZE: u32 = 0x1c;

const PROVIDER_LANMAN: u32 = 0x00020000;

#[derive(Debug)]
pub(crate) struct LnkNetwork {
    pub(crate) share_name: String,
    pub(crate) device_name: Option<String>,
    pub(crate) provider_type: Option<u32>,
}

/// Parse the common network relative link structure of the link location info
pub(crate) fn parse_network(data: &[u8]) -> nom::IResult<&[u8], LnkNetwork> {
    let (input, _size) = nom_unsigned_four_bytes(data)?;
    let (input, flags) = nom_unsigned_four_bytes(input)?;
    let (input, net_name_offset) = nom_unsigned_four_bytes(input)?;
    let (input, device_name_offset) = nom_unsigned_four_bytes(input)?;
    let (input, provider_type) = nom_unsigned_four_bytes(input)?;

    let extended = net_name_offset > ANSI_HEADER_SIZE;
    let (net_name_offset_unicode, device_name_offset_unicode) = if extended {
        let (input, net_unicode) = nom_unsigned_four_bytes(input)?;
        let (_, device_unicode) = nom_unsigned_four_bytes(input)?;
        (net_unicode, device_unicode)
    } else {
        (0, 0)
    };

    let share_name = if extended && net_name_offset_unicode != 0 {
        read_utf16_at(data, &net_name_offset_unicode)?
    } else {
        read_ansi_at(data, &net_name_offset)?
    };

    let device_name = if (flags & VALID_DEVICE) == VALID_DEVICE {
        let value = if extended && device_name_offset_unicode != 0 {
            read_utf16_at(data, &device_name_offset_unicode)?
        } else {
            read_ansi_at(data, &device_name_offset)?
        };
        Some(value)
    } else {
        None
    };

    let network = LnkNetwork {
        share_name,
        device_name,
        provider_type: if (flags & VALID_NET_TYPE) == VALID_NET_TYPE {
            Some(provider_type)
        } else {
            None
        },
    };
    Ok((input, network))
}

/// Serialize the common network relative link structure. The extended form
/// appends UTF16 copies of the share and device names after the ANSI copies,
/// with their own offset pair in the header
pub(crate) fn build_network(network: &NetworkShare, unicode: bool) -> Vec<u8> {
    let share_ansi = ansi_bytes_nul(&network.share_name);
    let device_ansi = network
        .device_name
        .as_deref()
        .map(ansi_bytes_nul)
        .unwrap_or_default();

    let mut flags = 0;
    if network.device_name.is_some() {
        flags |= VALID_DEVICE;
    }
    if network.provider_type.is_some() {
        flags |= VALID_NET_TYPE;
    }

    let mut data = Vec::new();
    if unicode {
        let share_unicode = utf16_bytes_nul(&network.share_name);
        let device_unicode = network
            .device_name
            .as_deref()
            .map(utf16_bytes_nul)
            .unwrap_or_default();

        let header_size = EXTENDED_HEADER_SIZE as usize;
        let device_offset = if network.device_name.is_some() {
            header_size + share_ansi.len()
        } else {
            0
        };
        let ansi_end = header_size + share_ansi.len() + device_ansi.len();
        let device_offset_unicode = if network.device_name.is_some() {
            ansi_end + share_unicode.len()
        } else {
            0
        };
        let size = ansi_end + share_unicode.len() + device_unicode.len();

        data.extend_from_slice(&(size as u32).to_le_bytes());
        data.extend_from_slice(&flags.to_le_bytes());
        data.extend_from_slice(&EXTENDED_HEADER_SIZE.to_le_bytes());
        data.extend_from_slice(&(device_offset as u32).to_le_bytes());
        data.extend_from_slice(&network.provider_type.unwrap_or(PROVIDER_LANMAN).to_le_bytes());
        data.extend_from_slice(&(ansi_end as u32).to_le_bytes());
        data.extend_from_slice(&(device_offset_unicode as u32).to_le_bytes());
        data.extend_from_slice(&share_ansi);
        data.extend_from_slice(&device_ansi);
        data.extend_from_slice(&share_unicode);
        data.extend_from_slice(&device_unicode);
    } else {
        let header_size = ANSI_HEADER_SIZE as usize;
        let device_offset = if network.device_name.is_some() {
            header_size + share_ansi.len()
        } else {
            0
        };
        let size = header_size + share_ansi.len() + device_ansi.len();

        data.extend_from_slice(&(size as u32).to_le_bytes());
        data.extend_from_slice(&flags.to_le_bytes());
        data.extend_from_slice(&ANSI_HEADER_SIZE.to_le_bytes());
        data.extend_from_slice(&(device_offset as u32).to_le_bytes());
        data.extend_from_slice(&network.provider_type.unwrap_or(PROVIDER_LANMAN).to_le_bytes());
        data.extend_from_slice(&share_ansi);
        data.extend_from_slice(&device_ansi);
    }
    data
}

/// Read a NUL terminated single-byte string at an offset from the structure
/// start
fn read_ansi_at<'a>(data: &'a [u8], offset: &u32) -> Result<String, nom::Err<nom::error::Error<&'a [u8]>>> {
    let (value_start, _) = nom_data(data, *offset as u64)?;
    let (_, value_data) = take_while(|value| value != 0)(value_start)?;
    Ok(extract_utf8_string(value_data))
}

/// Read a NUL terminated UTF16 string at an offset from the structure start
fn read_utf16_at<'a>(data: &'a [u8], offset: &u32) -> Result<String, nom::Err<nom::error::Error<&'a [u8]>>> {
    let (value_start, _) = nom_data(data, *offset as u64)?;
    Ok(extract_utf16_string(value_start))
}
