use crate::utils::nom_helper::{nom_data, nom_unsigned_four_bytes};
use crate::utils::strings::{ansi_bytes_nul, extract_utf8_string, extract_utf16_string, utf16_bytes_nul};
use common::windows::{DriveType, LocalVolume};
use nom::bytes::complete::take_while;

/// Label offset value that signals an additional UTF16 label offset field
const UNICODE_LABEL_SENTINEL: u32 = 0x14;
const ANSI_LABEL_OFFSET: u32 = 0x10;

#[derive(Debug)]
pub(crate) struct LnkVolume {
    pub(crate) drive_type: DriveType,
    pub(crate) drive_serial: u32,
    pub(crate) volume_label: String,
}

/// Parse the volume ID structure of the link location info
pub(crate) fn parse_volume(data: &[u8]) -> nom::IResult<&[u8], LnkVolume> {
    let (input, _size) = nom_unsigned_four_bytes(data)?;
    let (input, drive_type) = nom_unsigned_four_bytes(input)?;
    let (input, drive_serial) = nom_unsigned_four_bytes(input)?;
    let (input, label_offset) = nom_unsigned_four_bytes(input)?;

    let volume_label = if label_offset == UNICODE_LABEL_SENTINEL {
        let (_, unicode_label_offset) = nom_unsigned_four_bytes(input)?;
        let (label_start, _) = nom_data(data, unicode_label_offset as u64)?;
        extract_utf16_string(label_start)
    } else {
        let (label_start, _) = nom_data(data, label_offset as u64)?;
        let (_, label_data) = take_while(|value| value != 0)(label_start)?;
        extract_utf8_string(label_data)
    };

    let volume = LnkVolume {
        drive_type: get_drive_type(&drive_type),
        drive_serial,
        volume_label,
    };
    Ok((input, volume))
}

/// Serialize the volume ID structure. The extended form appends a UTF16 copy
/// of the label and marks it with the label offset sentinel
pub(crate) fn build_volume(volume: &LocalVolume, unicode: bool) -> Vec<u8> {
    let label_ansi = ansi_bytes_nul(&volume.volume_label);

    let mut data = Vec::new();
    if unicode {
        let label_unicode = utf16_bytes_nul(&volume.volume_label);
        let header_size = 20;
        let size = header_size + label_ansi.len() + label_unicode.len();
        data.extend_from_slice(&(size as u32).to_le_bytes());
        data.extend_from_slice(&drive_type_value(&volume.drive_type).to_le_bytes());
        data.extend_from_slice(&volume.drive_serial.to_le_bytes());
        data.extend_from_slice(&UNICODE_LABEL_SENTINEL.to_le_bytes());
        data.extend_from_slice(&((header_size + label_ansi.len()) as u32).to_le_bytes());
        data.extend_from_slice(&label_ansi);
        data.extend_from_slice(&label_unicode);
    } else {
        let header_size = 16;
        let size = header_size + label_ansi.len();
        data.extend_from_slice(&(size as u32).to_le_bytes());
        data.extend_from_slice(&drive_type_value(&volume.drive_type).to_le_bytes());
        data.extend_from_slice(&volume.drive_serial.to_le_bytes());
        data.extend_from_slice(&ANSI_LABEL_OFFSET.to_le_bytes());
        data.extend_from_slice(&label_ansi);
    }
    data
}

/// Get the drive type associated with the volume
pub(crate) fn get_drive_type(value: &u32) -> DriveType {
    match value {
        0 => DriveType::DriveUnknown,
        1 => DriveType::DriveNotRootDir,
        2 => DriveType::DriveRemovable,
        3 => DriveType::DriveFixed,
        4 => DriveType::DriveRemote,
        5 => DriveType::DriveCdrom,
        6 => DriveType::DriveRamdisk,
        _ => DriveType::None,
    }
}

pub(crate) fn drive_type_value(drive_type: &DriveType) -> u32 {
    match drive_type {
        DriveType::DriveUnknown | DriveType::None => 0,
        DriveType::DriveNotRootDir => 1,
        DriveType::DriveRemovable => 2,
        DriveType::DriveFixed => 3,
        DriveType::DriveRemote => 4,
        DriveType::DriveCdrom => 5,
        DriveType::DriveRamdisk => 6,
    }
}
