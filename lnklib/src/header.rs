use crate::utils::nom_helper::{
    nom_data, nom_signed_four_bytes, nom_unsigned_eight_bytes, nom_unsigned_four_bytes,
    nom_unsigned_two_bytes,
};
use crate::utils::uuid::format_guid_le_bytes;
use common::windows::{AttributeFlags, DataFlags, Hotkey, ShowCommand, Shortcut};
use std::mem::size_of;

/// Class ID every shortcut header carries, in little endian byte order
pub(crate) const LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

const HEADER_SIZE: u32 = 76;
const HEADER_CLSID: &str = "00021401-0000-0000-c000-000000000046";

#[derive(Debug)]
pub(crate) struct LnkHeader {
    pub(crate) data_flags: Vec<DataFlags>,
    pub(crate) attribute_flags: u32,
    /// Raw FILETIME values
    pub(crate) created: u64,
    pub(crate) access: u64,
    pub(crate) modified: u64,
    pub(crate) file_size: u32,
    pub(crate) icon_index: i32,
    pub(crate) show_command: ShowCommand,
    pub(crate) hotkey: Hotkey,
}

impl LnkHeader {
    /// Parse the fixed 76-byte `Shortcut` header. Contains target file size and
    /// target created, modified, accessed timestamps
    pub(crate) fn parse_header(data: &[u8]) -> nom::IResult<&[u8], LnkHeader> {
        let (input, _size) = nom_unsigned_four_bytes(data)?;
        let (input, _guid_data) = nom_data(input, size_of::<u128>() as u64)?;
        let (input, data_flags) = nom_unsigned_four_bytes(input)?;
        let (input, attribute_flags) = nom_unsigned_four_bytes(input)?;

        let (input, created) = nom_unsigned_eight_bytes(input)?;
        let (input, access) = nom_unsigned_eight_bytes(input)?;
        let (input, modified) = nom_unsigned_eight_bytes(input)?;

        let (input, file_size) = nom_unsigned_four_bytes(input)?;
        let (input, icon_index) = nom_signed_four_bytes(input)?;
        let (input, window_value) = nom_unsigned_four_bytes(input)?;
        let (input, hot_key) = nom_unsigned_two_bytes(input)?;

        let (input, _reserved) = nom_unsigned_two_bytes(input)?;
        let (input, _reserved2) = nom_unsigned_four_bytes(input)?;
        let (input, _reserved3) = nom_unsigned_four_bytes(input)?;

        let header = LnkHeader {
            data_flags: get_flags(&data_flags),
            attribute_flags,
            created,
            access,
            modified,
            file_size,
            icon_index,
            show_command: get_show_command(&window_value),
            hotkey: Hotkey {
                key: (hot_key & 0xff) as u8,
                modifiers: (hot_key >> 8) as u8,
            },
        };

        Ok((input, header))
    }

    /// Verify if provided bytes start with a `shortcut` header
    pub(crate) fn check_header(data: &[u8]) -> nom::IResult<&[u8], bool> {
        let (input, size) = nom_unsigned_four_bytes(data)?;
        let (_, guid_data) = nom_data(input, size_of::<u128>() as u64)?;

        let class_id = format_guid_le_bytes(guid_data);
        Ok((data, size == HEADER_SIZE && class_id == HEADER_CLSID))
    }
}

/// Serialize the fixed 76-byte header. Flag and attribute bitmasks are
/// supplied by the caller since they depend on which other structures get
/// written
pub(crate) fn build_header(shortcut: &Shortcut, data_flags: &u32, attributes: &u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_SIZE as usize);
    data.extend_from_slice(&HEADER_SIZE.to_le_bytes());
    data.extend_from_slice(&LINK_CLSID);
    data.extend_from_slice(&data_flags.to_le_bytes());
    data.extend_from_slice(&attributes.to_le_bytes());

    data.extend_from_slice(&shortcut.created.to_le_bytes());
    data.extend_from_slice(&shortcut.accessed.to_le_bytes());
    data.extend_from_slice(&shortcut.modified.to_le_bytes());

    data.extend_from_slice(&shortcut.file_size.to_le_bytes());
    data.extend_from_slice(&shortcut.icon_index.to_le_bytes());
    data.extend_from_slice(&show_command_value(&shortcut.show_command).to_le_bytes());

    let hot_key = shortcut.hotkey.key as u16 | ((shortcut.hotkey.modifiers as u16) << 8);
    data.extend_from_slice(&hot_key.to_le_bytes());

    // Reserved1, Reserved2, Reserved3
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    data
}

/// Get data flags from `Shortcut` header. These control which other structures
/// follow the header
pub(crate) fn get_flags(flags: &u32) -> Vec<DataFlags> {
    let flag_bits = [
        (0x1, DataFlags::HasTargetIdList),
        (0x2, DataFlags::HasLinkInfo),
        (0x4, DataFlags::HasName),
        (0x8, DataFlags::HasRelativePath),
        (0x10, DataFlags::HasWorkingDirectory),
        (0x20, DataFlags::HasArguments),
        (0x40, DataFlags::HasIconLocation),
        (0x80, DataFlags::IsUnicode),
        (0x100, DataFlags::ForceNoLinkInfo),
        (0x200, DataFlags::HasExpString),
        (0x400, DataFlags::RunInSeparateProcess),
        (0x1000, DataFlags::HasDarwinId),
        (0x2000, DataFlags::RunAsUser),
        (0x4000, DataFlags::HasExpIcon),
        (0x8000, DataFlags::NoPidAlias),
        (0x20000, DataFlags::RunWithShimLayer),
        (0x40000, DataFlags::ForceNoLinkTrack),
        (0x80000, DataFlags::EnableTargetMetadata),
        (0x100000, DataFlags::DisableLinkPathTracking),
        (0x200000, DataFlags::DisableKnownFolderTracking),
        (0x400000, DataFlags::DisableKnownFolderAlias),
        (0x800000, DataFlags::AllowLinkToLink),
        (0x1000000, DataFlags::UnaliasOnSave),
        (0x2000000, DataFlags::PreferEnvironmentPath),
        (0x4000000, DataFlags::KeepLocalDListForUncTarget),
    ];

    let mut lnk_flags = Vec::new();
    for (bit, flag) in flag_bits {
        if (flags & bit) == bit {
            lnk_flags.push(flag);
        }
    }
    lnk_flags
}

/// Get file attributes associated with the target of the `Shortcut`
pub fn file_attribute_flags(attributes: &u32) -> Vec<AttributeFlags> {
    let attribute_bits = [
        (0x1, AttributeFlags::ReadOnly),
        (0x2, AttributeFlags::Hidden),
        (0x4, AttributeFlags::System),
        (0x10, AttributeFlags::Directory),
        (0x20, AttributeFlags::Archive),
        (0x80, AttributeFlags::Normal),
        (0x100, AttributeFlags::Temporary),
        (0x200, AttributeFlags::SparseFile),
        (0x400, AttributeFlags::ReparsePoint),
        (0x800, AttributeFlags::Compressed),
        (0x1000, AttributeFlags::Offline),
        (0x2000, AttributeFlags::NotContentIndexed),
        (0x4000, AttributeFlags::Encrypted),
    ];

    let mut attr_flags = Vec::new();
    for (bit, flag) in attribute_bits {
        if (attributes & bit) == bit {
            attr_flags.push(flag);
        }
    }
    attr_flags
}

/// Get the launch window state. Values other than maximized or minimized are
/// treated as normal
pub(crate) fn get_show_command(value: &u32) -> ShowCommand {
    match value {
        3 => ShowCommand::Maximized,
        7 => ShowCommand::Minimized,
        _ => ShowCommand::Normal,
    }
}

pub(crate) fn show_command_value(command: &ShowCommand) -> u32 {
    match command {
        ShowCommand::Normal => 1,
        ShowCommand::Maximized => 3,
        ShowCommand::Minimized => 7,
    }
}

#[cfg(test)]
mod tests {
    use super::{LnkHeader, build_header, file_attribute_flags, get_flags, get_show_command};
    use crate::utils::time::filetime_to_unixepoch;
    use common::windows::{AttributeFlags, DataFlags, Hotkey, ShowCommand, Shortcut};

    #[test]
    fn test_parse_header() {
        let test = [
            76, 0, 0, 0, 1, 20, 2, 0, 0, 0, 0, 0, 192, 0, 0, 0, 0, 0, 0, 70, 139, 0, 32, 0, 16, 0,
            0, 0, 159, 38, 31, 30, 26, 246, 216, 1, 133, 5, 25, 151, 28, 27, 217, 1, 40, 54, 5,
            151, 28, 27, 217, 1, 0, 192, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0,
        ];

        let (_, result) = LnkHeader::parse_header(&test).unwrap();
        assert_eq!(
            result.data_flags,
            [
                DataFlags::HasTargetIdList,
                DataFlags::HasLinkInfo,
                DataFlags::HasRelativePath,
                DataFlags::IsUnicode,
                DataFlags::DisableKnownFolderTracking
            ]
        );
        assert_eq!(result.attribute_flags, 0x10);
        assert_eq!(filetime_to_unixepoch(&result.created), 1668204504);
        assert_eq!(filetime_to_unixepoch(&result.access), 1672273759);
        assert_eq!(filetime_to_unixepoch(&result.modified), 1672273759);
        assert_eq!(result.file_size, 49152);
        assert_eq!(result.icon_index, 0);
        assert_eq!(result.show_command, ShowCommand::Normal);
        assert_eq!(result.hotkey, Hotkey::default());
    }

    #[test]
    fn test_check_header() {
        let test = [
            76, 0, 0, 0, 1, 20, 2, 0, 0, 0, 0, 0, 192, 0, 0, 0, 0, 0, 0, 70, 139, 0, 32, 0, 16, 0,
            0, 0, 159, 38, 31, 30, 26, 246, 216, 1, 133, 5, 25, 151, 28, 27, 217, 1, 40, 54, 5,
            151, 28, 27, 217, 1, 0, 192, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0,
        ];

        let (_, result) = LnkHeader::check_header(&test).unwrap();
        assert!(result);

        let bad = [76, 0, 0, 0, 1, 1, 1, 1];
        assert!(LnkHeader::check_header(&bad).is_err());
    }

    #[test]
    fn test_get_flags() {
        let result = get_flags(&0x2081);
        assert_eq!(
            result,
            [
                DataFlags::HasTargetIdList,
                DataFlags::IsUnicode,
                DataFlags::RunAsUser
            ]
        );
    }

    #[test]
    fn test_file_attribute_flags() {
        let result = file_attribute_flags(&0x21);
        assert_eq!(result, [AttributeFlags::ReadOnly, AttributeFlags::Archive]);
    }

    #[test]
    fn test_get_show_command() {
        assert_eq!(get_show_command(&3), ShowCommand::Maximized);
        assert_eq!(get_show_command(&11), ShowCommand::Normal);
    }

    #[test]
    fn test_build_header_round_trip() {
        let shortcut = Shortcut {
            file_size: 4096,
            icon_index: -2,
            show_command: ShowCommand::Minimized,
            hotkey: Hotkey {
                key: 0x54,
                modifiers: 0x6,
            },
            created: 132244766418940254,
            accessed: 132244766418940254,
            modified: 132244766418940254,
            ..Default::default()
        };

        let data = build_header(&shortcut, &0x2083, &0x20);
        assert_eq!(data.len(), 76);

        let (_, header) = LnkHeader::parse_header(&data).unwrap();
        assert_eq!(
            header.data_flags,
            [
                DataFlags::HasTargetIdList,
                DataFlags::HasLinkInfo,
                DataFlags::IsUnicode,
                DataFlags::RunAsUser
            ]
        );
        assert_eq!(header.attribute_flags, 0x20);
        assert_eq!(header.created, 132244766418940254);
        assert_eq!(header.file_size, 4096);
        assert_eq!(header.icon_index, -2);
        assert_eq!(header.show_command, ShowCommand::Minimized);
        assert_eq!(
            header.hotkey,
            Hotkey {
                key: 0x54,
                modifiers: 0x6
            }
        );

        let (_, valid) = LnkHeader::check_header(&data).unwrap();
        assert!(valid);
    }
}
