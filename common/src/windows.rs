use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DataFlags {
    HasTargetIdList,
    HasLinkInfo,
    HasName,
    HasRelativePath,
    HasWorkingDirectory,
    HasArguments,
    HasIconLocation,
    IsUnicode,
    ForceNoLinkInfo,
    HasExpString,
    RunInSeparateProcess,
    HasDarwinId,
    RunAsUser,
    HasExpIcon,
    NoPidAlias,
    RunWithShimLayer,
    ForceNoLinkTrack,
    EnableTargetMetadata,
    DisableLinkPathTracking,
    DisableKnownFolderTracking,
    DisableKnownFolderAlias,
    AllowLinkToLink,
    UnaliasOnSave,
    PreferEnvironmentPath,
    KeepLocalDListForUncTarget,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum AttributeFlags {
    ReadOnly,
    Hidden,
    System,
    Directory,
    Archive,
    Normal,
    Temporary,
    SparseFile,
    ReparsePoint,
    Compressed,
    Offline,
    NotContentIndexed,
    Encrypted,
}

/// Window state the target is launched with. Any other value on disk is
/// treated as `Normal` per the format
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub enum ShowCommand {
    #[default]
    Normal,
    Maximized,
    Minimized,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DriveType {
    DriveUnknown,
    DriveNotRootDir,
    DriveRemovable,
    DriveFixed,
    DriveRemote,
    DriveCdrom,
    DriveRamdisk,
    None,
}

/// Hotkey assigned to the shortcut. `key` is a virtual key code, `modifiers`
/// is the HOTKEYF bitmask (1 = Shift, 2 = Control, 4 = Alt)
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct Hotkey {
    pub key: u8,
    pub modifiers: u8,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct LocalVolume {
    pub drive_type: DriveType,
    pub drive_serial: u32,
    pub volume_label: String,
    pub base_path: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct NetworkShare {
    pub share_name: String,
    pub device_name: Option<String>,
    pub provider_type: Option<u32>,
    /// Appended to the share name to form the full target path. Always
    /// serialized, even when empty
    pub path_suffix: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct LinkInfo {
    pub local: Option<LocalVolume>,
    pub network: Option<NetworkShare>,
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct TrackerData {
    /// NetBIOS name, at most 15 characters survive serialization
    pub machine_id: String,
    pub volume_id: Uuid,
    pub object_id: Uuid,
    /// Falls back to `volume_id` when not set
    pub birth_volume_id: Option<Uuid>,
    /// Falls back to `object_id` when not set
    pub birth_object_id: Option<Uuid>,
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleData {
    pub fill_attributes: u16,
    pub popup_fill_attributes: u16,
    pub screen_width_buffer_size: u16,
    pub screen_height_buffer_size: u16,
    pub window_width: u16,
    pub window_height: u16,
    pub window_x_coordinate: u16,
    pub window_y_coordinate: u16,
    pub font_size: u32,
    pub font_family: u32,
    pub font_weight: u32,
    /// At most 31 characters survive serialization (fixed 64-byte field)
    pub face_name: String,
    pub cursor_size: u32,
    pub full_screen: bool,
    pub quick_edit: bool,
    pub insert_mode: bool,
    pub automatic_position: bool,
    pub history_buffer_size: u32,
    pub number_history_buffers: u32,
    pub duplicates_allowed_history: bool,
    pub color_table: [u32; 16],
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct KnownFolderData {
    pub folder_id: Uuid,
    pub offset: u32,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SpecialFolderData {
    pub folder_id: u32,
    pub offset: u32,
}

/// Extra data block with a signature this library does not recognize.
/// Preserved verbatim so files written by newer shell versions survive a
/// parse/build cycle without loss
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct RawDataBlock {
    pub signature: u32,
    pub data: Vec<u8>,
}

/// Decoded Windows Installer advertised-shortcut descriptor
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct DarwinDescriptor {
    pub product_code: Uuid,
    pub feature_id: String,
    pub component_code: Uuid,
}

/// Optional extra data blocks following the string data section
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct ExtraData {
    pub environment_variable: Option<String>,
    pub console: Option<ConsoleData>,
    pub tracker: Option<TrackerData>,
    pub codepage: Option<u32>,
    pub special_folder: Option<SpecialFolderData>,
    pub darwin_id: Option<String>,
    pub icon_environment: Option<String>,
    pub shim_layer: Option<String>,
    /// Serialized property store payload. Use the property store reader and
    /// builder to interpret or produce these bytes
    pub property_store: Option<Vec<u8>>,
    pub known_folder: Option<KnownFolderData>,
    pub vista_id_list: Option<Vec<u8>>,
    pub unknown: Vec<RawDataBlock>,
}

/// The full value model of one shortcut file. Produced by parsing and
/// consumed by building. Header flag bits are derived from which fields are
/// set, they are not stored here
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Shortcut {
    /// Target path used to construct the item ID list when `id_list` is not
    /// provided
    pub target: Option<String>,
    pub printer_link: bool,
    /// Raw FILE_ATTRIBUTE bitmask of the target. Zero means derive from the
    /// target path when building
    pub attribute_flags: u32,
    /// FILETIME values (100ns ticks since 1601-01-01)
    pub created: u64,
    pub accessed: u64,
    pub modified: u64,
    pub file_size: u32,
    pub icon_index: i32,
    pub show_command: ShowCommand,
    pub hotkey: Hotkey,
    /// String data encoding. `None` selects single-byte when every string is
    /// representable in it, UTF-16 otherwise
    pub unicode_strings: Option<bool>,
    pub run_as_user: bool,
    pub prefer_environment_path: bool,
    /// Opaque shell item records, each without its 16-bit size prefix
    pub id_list: Option<Vec<Vec<u8>>>,
    pub link_info: Option<LinkInfo>,
    /// Link info header width. `None` auto-detects from the link info text
    pub unicode_link_info: Option<bool>,
    pub name: Option<String>,
    pub relative_path: Option<String>,
    pub working_directory: Option<String>,
    pub arguments: Option<String>,
    pub icon_location: Option<String>,
    pub extra: ExtraData,
    /// Bytes after the terminal extra data block, preserved verbatim
    pub trailer: Vec<u8>,
}

/// Key of one property store entry. Numeric IDs are scoped to the entry
/// format ID, names are used under the named-property format ID
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum PropertyKey {
    Id(u32),
    Name(String),
}

/// Typed property store value. Each arm corresponds to one 16-bit VT code
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum PropertyValue {
    /// VT_I2 (2)
    Int16(i16),
    /// VT_I4 (3)
    Int32(i32),
    /// VT_BOOL (11)
    Bool(bool),
    /// VT_UI2 (18)
    UInt16(u16),
    /// VT_UI4 (19)
    UInt32(u32),
    /// VT_I8 (20)
    Int64(i64),
    /// VT_UI8 (21)
    UInt64(u64),
    /// VT_LPSTR (30)
    AnsiString(String),
    /// VT_LPWSTR (31)
    UnicodeString(String),
    /// VT_FILETIME (64), raw FILETIME value
    FileTime(u64),
    /// VT_BLOB (65)
    Blob(Vec<u8>),
    /// VT_CLSID (72)
    Guid(Uuid),
}

impl PropertyValue {
    /// The VT code this value serializes with
    pub fn vt_type(&self) -> u16 {
        match self {
            PropertyValue::Int16(_) => 2,
            PropertyValue::Int32(_) => 3,
            PropertyValue::Bool(_) => 11,
            PropertyValue::UInt16(_) => 18,
            PropertyValue::UInt32(_) => 19,
            PropertyValue::Int64(_) => 20,
            PropertyValue::UInt64(_) => 21,
            PropertyValue::AnsiString(_) => 30,
            PropertyValue::UnicodeString(_) => 31,
            PropertyValue::FileTime(_) => 64,
            PropertyValue::Blob(_) => 65,
            PropertyValue::Guid(_) => 72,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub format_id: Uuid,
    pub key: PropertyKey,
    pub value: PropertyValue,
}
