use crate::utils::nom_helper::{nom_data, nom_unsigned_two_bytes};
use crate::utils::strings::ansi_bytes_nul;

/// "My Computer" class ID, little endian
const COMPUTER_CLSID: [u8; 16] = [
    0xe0, 0x4f, 0xd0, 0x20, 0xea, 0x3a, 0x69, 0x10, 0xa2, 0xd8, 0x08, 0x00, 0x2b, 0x30, 0x30, 0x9d,
];
/// "Network Places" class ID, little endian
const NETWORK_CLSID: [u8; 16] = [
    0x60, 0x2c, 0x8d, 0x20, 0xea, 0x3a, 0x69, 0x10, 0xa2, 0xd7, 0x08, 0x00, 0x2b, 0x30, 0x30, 0x9d,
];

const PREFIX_LOCAL_ROOT: &[u8] = &[0x2f];
const PREFIX_NETWORK_ROOT: &[u8] = &[0xc3, 0x01, 0x81];
const PREFIX_NETWORK_PRINTER: &[u8] = &[0xc3, 0x02, 0xc1];
const PREFIX_FOLDER: &[u8] = &[
    0x31, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
const PREFIX_FILE: &[u8] = &[
    0x32, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

pub(crate) const ATTRIBUTE_DIRECTORY: u32 = 0x10;
pub(crate) const ATTRIBUTE_FILE: u32 = 0x20;

/// Root and leaf portions of a target path, classified for item ID list
/// construction
#[derive(Debug)]
pub(crate) struct TargetPath {
    pub(crate) network_link: bool,
    pub(crate) root_link: bool,
    pub(crate) root: String,
    pub(crate) leaf: Option<String>,
    /// FILE_ATTRIBUTE value implied by the leaf extension
    pub(crate) attributes: u32,
    root_prefix: &'static [u8],
    leaf_prefix: &'static [u8],
}

/// Split a target path into its root and leaf portions. Local paths split at
/// the first separator and keep a trailing separator on the root, network
/// paths split at the last separator. A leaf with a 1-3 character extension
/// marks the target as a file instead of a folder
pub(crate) fn classify_target(target: &str, printer_link: bool) -> TargetPath {
    let network_link = target.starts_with("\\\\");
    // Printer links point at the share itself and have no leaf segment
    let mut root_link = network_link && printer_link;

    let root_prefix = if network_link {
        if printer_link {
            PREFIX_NETWORK_PRINTER
        } else {
            PREFIX_NETWORK_ROOT
        }
    } else {
        PREFIX_LOCAL_ROOT
    };

    let mut root = target.to_string();
    let mut leaf = None;
    if !root_link {
        if network_link {
            if let Some(last_slash) = target.rfind('\\') {
                leaf = Some(target[last_slash + 1..].to_string());
                root = target[..last_slash].to_string();
            }
        } else {
            if let Some(first_slash) = target.find('\\') {
                leaf = Some(target[first_slash + 1..].to_string());
                root = target[..first_slash].to_string();
            }
            root.push('\\');
        }
    }

    if leaf.as_deref().unwrap_or_default().is_empty() {
        leaf = None;
        root_link = true;
    }

    let extension_length = leaf
        .as_deref()
        .and_then(|value| value.rsplit_once('.'))
        .map_or(0, |(_, extension)| extension.len());

    let is_file = (1..=3).contains(&extension_length);
    TargetPath {
        network_link,
        root_link,
        root,
        leaf,
        attributes: if is_file {
            ATTRIBUTE_FILE
        } else {
            ATTRIBUTE_DIRECTORY
        },
        root_prefix,
        leaf_prefix: if is_file { PREFIX_FILE } else { PREFIX_FOLDER },
    }
}

/// Construct the shell item records for a classified target path: one fixed
/// 18-byte root record, one root path record, and one leaf record unless the
/// target is a bare root
pub(crate) fn target_items(info: &TargetPath) -> Vec<Vec<u8>> {
    let mut root_item = Vec::with_capacity(18);
    root_item.push(0x1f);
    root_item.push(if info.network_link { 0x58 } else { 0x50 });
    root_item.extend_from_slice(if info.network_link {
        &NETWORK_CLSID
    } else {
        &COMPUTER_CLSID
    });

    // The root path carries 21 NUL characters of padding before its terminator
    let pad_count = 21;
    let mut padded_root = info.root.clone();
    padded_root.extend(std::iter::repeat('\0').take(pad_count));

    let mut root_path_item = info.root_prefix.to_vec();
    root_path_item.extend_from_slice(&ansi_bytes_nul(&padded_root));

    let mut items = vec![root_item, root_path_item];
    if !info.root_link {
        if let Some(leaf) = &info.leaf {
            let mut leaf_item = info.leaf_prefix.to_vec();
            leaf_item.extend_from_slice(&ansi_bytes_nul(leaf));
            items.push(leaf_item);
        }
    }
    items
}

/// Serialize shell item records: each record gets a 16-bit size prefix that
/// counts the prefix itself, the whole list gets an outer 16-bit total and a
/// two-byte terminal record
pub(crate) fn write_id_list(items: &[Vec<u8>]) -> Vec<u8> {
    let prefix_size = 2;
    let terminal_size = 2;
    let total: usize = items.len() * prefix_size + items.iter().map(Vec::len).sum::<usize>();

    let mut data = Vec::new();
    data.extend_from_slice(&((total + terminal_size) as u16).to_le_bytes());
    for item in items {
        data.extend_from_slice(&((item.len() + prefix_size) as u16).to_le_bytes());
        data.extend_from_slice(item);
    }
    data.extend_from_slice(&0u16.to_le_bytes());
    data
}

/// Parse the item ID list into opaque records. Records are not resolved to
/// paths, only their boundaries are interpreted
pub(crate) fn parse_lnk_shellitems(data: &[u8]) -> nom::IResult<&[u8], Vec<Vec<u8>>> {
    let (remaining_input, total) = nom_unsigned_two_bytes(data)?;
    let (remaining_input, mut input) = nom_data(remaining_input, total as u64)?;

    let prefix_size = 2;
    let mut items = Vec::new();
    while input.len() >= prefix_size {
        let (item_input, item_size) = nom_unsigned_two_bytes(input)?;
        if item_size < prefix_size as u16 {
            // Terminal record
            break;
        }
        let (item_input, item_data) = nom_data(item_input, (item_size - prefix_size as u16) as u64)?;
        items.push(item_data.to_vec());
        input = item_input;
    }

    Ok((remaining_input, items))
}

#[cfg(test)]
mod tests {
    use super::{
        ATTRIBUTE_DIRECTORY, ATTRIBUTE_FILE, classify_target, parse_lnk_shellitems, target_items,
        write_id_list,
    };

    #[test]
    fn test_classify_target_local_file() {
        let info = classify_target("C:\\Windows\\System32\\notepad.exe", false);
        assert!(!info.network_link);
        assert!(!info.root_link);
        assert_eq!(info.root, "C:\\");
        assert_eq!(info.leaf.as_deref(), Some("Windows\\System32\\notepad.exe"));
        assert_eq!(info.attributes, ATTRIBUTE_FILE);
    }

    #[test]
    fn test_classify_target_local_folder() {
        let info = classify_target("C:\\Windows\\System32", false);
        assert_eq!(info.root, "C:\\");
        assert_eq!(info.leaf.as_deref(), Some("Windows\\System32"));
        assert_eq!(info.attributes, ATTRIBUTE_DIRECTORY);
    }

    #[test]
    fn test_classify_target_drive_root() {
        let info = classify_target("D:", false);
        assert!(info.root_link);
        assert_eq!(info.root, "D:\\");
        assert_eq!(info.leaf, None);
    }

    #[test]
    fn test_classify_target_network() {
        let info = classify_target("\\\\server\\share\\document.docx", false);
        assert!(info.network_link);
        assert!(!info.root_link);
        assert_eq!(info.root, "\\\\server\\share");
        assert_eq!(info.leaf.as_deref(), Some("document.docx"));
        assert_eq!(info.attributes, ATTRIBUTE_FILE);
    }

    #[test]
    fn test_classify_target_printer() {
        let info = classify_target("\\\\printserver\\HP_LaserJet", true);
        assert!(info.network_link);
        assert!(info.root_link);
        assert_eq!(info.root, "\\\\printserver\\HP_LaserJet");
        assert_eq!(info.leaf, None);
    }

    #[test]
    fn test_target_items() {
        let info = classify_target("C:\\Windows\\System32\\notepad.exe", false);
        let items = target_items(&info);
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].len(), 18);
        assert_eq!(items[0][0], 0x1f);
        assert_eq!(items[0][1], 0x50);

        // Prefix byte + "C:\" + 21 NUL pad + terminator
        assert_eq!(items[1].len(), 1 + 3 + 21 + 1);
        assert_eq!(items[1][0], 0x2f);

        assert_eq!(items[2][0], 0x32);
        assert_eq!(items[2].len(), 12 + "Windows\\System32\\notepad.exe".len() + 1);
    }

    #[test]
    fn test_target_items_root_only() {
        let info = classify_target("C:", false);
        let items = target_items(&info);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_write_id_list() {
        let items = vec![vec![1, 2, 3], vec![4, 5]];
        let data = write_id_list(&items);
        // Outer prefix counts both record prefixes and the terminal record
        assert_eq!(data[0] as usize, 3 + 2 + 2 + 2 + 2);
        assert_eq!(data.len(), 2 + 5 + 4 + 2);
        assert_eq!(&data[data.len() - 2..], &[0, 0]);
    }

    #[test]
    fn test_parse_lnk_shellitems_round_trip() {
        let info = classify_target("\\\\server\\share\\report.txt", false);
        let items = target_items(&info);
        let data = write_id_list(&items);

        let (remaining, parsed) = parse_lnk_shellitems(&data).unwrap();
        assert!(remaining.is_empty());
        assert_eq!(parsed, items);
    }
}
