use common::windows::{
    ConsoleData, DriveType, ExtraData, Hotkey, KnownFolderData, LinkInfo, LocalVolume,
    NetworkShare, PropertyEntry, PropertyKey, PropertyValue, RawDataBlock, ShowCommand, Shortcut,
    SpecialFolderData, TrackerData,
};
use lnklib::{build_lnk_data, parse_lnk_data, read_property_store, write_property_store};
use uuid::Uuid;

fn base_shortcut(target: &str) -> Shortcut {
    Shortcut {
        target: Some(target.to_string()),
        created: 132244766410000000,
        accessed: 132244766410000000,
        modified: 132244766410000000,
        file_size: 4096,
        ..Default::default()
    }
}

#[test]
fn simple_shortcut_round_trips() {
    let shortcut = base_shortcut("C:\\Windows\\System32\\notepad.exe");
    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();

    assert_eq!(parsed.id_list.as_ref().unwrap().len(), 3);
    assert_eq!(parsed.file_size, 4096);
    assert_eq!(parsed.created, 132244766410000000);
    assert_eq!(parsed.attribute_flags, 0x20);
    assert_eq!(parsed.show_command, ShowCommand::Normal);

    // A second cycle through the value model is stable
    let rebuilt = build_lnk_data(&parsed).unwrap();
    assert_eq!(rebuilt, data);
}

#[test]
fn all_string_fields_round_trip() {
    let mut shortcut = base_shortcut("C:\\Windows\\System32\\notepad.exe");
    shortcut.name = Some(String::from("Notepad with notes"));
    shortcut.relative_path = Some(String::from(".\\notepad.exe"));
    shortcut.working_directory = Some(String::from("C:\\Windows"));
    shortcut.arguments = Some(String::from("C:\\notes.txt"));
    shortcut.icon_location = Some(String::from("C:\\Windows\\System32\\notepad.exe"));
    shortcut.show_command = ShowCommand::Maximized;
    shortcut.hotkey = Hotkey {
        key: 0x54,
        modifiers: 0x06,
    };
    shortcut.icon_index = 1;
    shortcut.run_as_user = true;

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();

    assert_eq!(parsed.name, shortcut.name);
    assert_eq!(parsed.relative_path, shortcut.relative_path);
    assert_eq!(parsed.working_directory, shortcut.working_directory);
    assert_eq!(parsed.arguments, shortcut.arguments);
    assert_eq!(parsed.icon_location, shortcut.icon_location);
    assert_eq!(parsed.show_command, ShowCommand::Maximized);
    assert_eq!(parsed.hotkey, shortcut.hotkey);
    assert_eq!(parsed.icon_index, 1);
    assert!(parsed.run_as_user);
    // ASCII only strings select the single byte form
    assert_eq!(parsed.unicode_strings, Some(false));
}

#[test]
fn non_ascii_strings_select_unicode() {
    let mut shortcut = base_shortcut("C:\\Windows\\System32\\notepad.exe");
    shortcut.name = Some(String::from("メモ帳"));
    shortcut.arguments = Some(String::from("C:\\メモ.txt"));

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();
    assert_eq!(parsed.unicode_strings, Some(true));
    assert_eq!(parsed.name.as_deref(), Some("メモ帳"));
    assert_eq!(parsed.arguments.as_deref(), Some("C:\\メモ.txt"));
}

#[test]
fn link_info_variants_round_trip() {
    let mut shortcut = base_shortcut("C:\\Windows\\System32\\notepad.exe");
    shortcut.link_info = Some(LinkInfo {
        local: Some(LocalVolume {
            drive_type: DriveType::DriveFixed,
            drive_serial: 0x12345678,
            volume_label: String::from("Windows"),
            base_path: String::from("C:\\Windows\\System32\\notepad.exe"),
        }),
        network: None,
    });

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();
    assert_eq!(parsed.link_info, shortcut.link_info);
    assert_eq!(parsed.unicode_link_info, Some(false));

    let mut network = base_shortcut("\\\\server\\share\\document.docx");
    network.link_info = Some(LinkInfo {
        local: None,
        network: Some(NetworkShare {
            share_name: String::from("\\\\server\\share"),
            device_name: Some(String::from("Z:")),
            provider_type: Some(0x00020000),
            path_suffix: String::from("document.docx"),
        }),
    });

    let data = build_lnk_data(&network).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();
    assert_eq!(parsed.link_info, network.link_info);
}

#[test]
fn unicode_link_info_auto_detects() {
    let path = "C:\\Users\\テスト\\Documents\\ファイル.txt";
    let mut shortcut = base_shortcut(path);
    shortcut.link_info = Some(LinkInfo {
        local: Some(LocalVolume {
            drive_type: DriveType::DriveFixed,
            drive_serial: 0x44,
            volume_label: String::from("テスト"),
            base_path: path.to_string(),
        }),
        network: None,
    });

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();
    assert_eq!(parsed.unicode_link_info, Some(true));
    let local = parsed.link_info.unwrap().local.unwrap();
    assert_eq!(local.base_path, path);
    assert_eq!(local.volume_label, "テスト");
}

#[test]
fn extra_blocks_round_trip() {
    let mut shortcut = base_shortcut("C:\\Windows\\System32\\cmd.exe");
    shortcut.extra = ExtraData {
        environment_variable: Some(String::from("%windir%\\System32\\cmd.exe")),
        console: Some(ConsoleData {
            fill_attributes: 0x07,
            screen_width_buffer_size: 120,
            screen_height_buffer_size: 3000,
            window_width: 120,
            window_height: 30,
            font_size: 0x000e0000,
            font_weight: 400,
            face_name: String::from("Cascadia Mono"),
            cursor_size: 25,
            insert_mode: true,
            quick_edit: true,
            history_buffer_size: 50,
            number_history_buffers: 4,
            color_table: [3; 16],
            ..Default::default()
        }),
        tracker: Some(TrackerData {
            machine_id: String::from("workstation"),
            volume_id: Uuid::parse_str("3e8d4568-e411-4918-8f78-97cd6cb340c5").unwrap(),
            object_id: Uuid::parse_str("09f158c0-5a6a-11ed-a10d-0800276eb45e").unwrap(),
            birth_volume_id: None,
            birth_object_id: None,
        }),
        codepage: Some(65001),
        special_folder: Some(SpecialFolderData {
            folder_id: 36,
            offset: 221,
        }),
        icon_environment: Some(String::from("%windir%\\System32\\shell32.dll")),
        shim_layer: Some(String::from("WIN98")),
        known_folder: Some(KnownFolderData {
            folder_id: Uuid::parse_str("905e63b6-c1bf-494e-b29c-65b732d3d21a").unwrap(),
            offset: 221,
        }),
        vista_id_list: Some(vec![20, 0, 31, 80, 0, 0]),
        ..Default::default()
    };

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();

    let expected = ExtraData {
        tracker: Some(TrackerData {
            birth_volume_id: Some(shortcut.extra.tracker.as_ref().unwrap().volume_id),
            birth_object_id: Some(shortcut.extra.tracker.as_ref().unwrap().object_id),
            ..shortcut.extra.tracker.clone().unwrap()
        }),
        ..shortcut.extra.clone()
    };
    assert_eq!(parsed.extra, expected);
}

#[test]
fn unknown_blocks_and_trailer_survive() {
    let mut shortcut = base_shortcut("C:\\test.exe");
    shortcut.extra.unknown = vec![
        RawDataBlock {
            signature: 0xa00000ff,
            data: vec![0xde, 0xad, 0xbe, 0xef],
        },
        RawDataBlock {
            signature: 0xa00000fd,
            data: vec![3, 4, 5],
        },
    ];
    shortcut.trailer = b"payload after the terminal".to_vec();

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();
    assert_eq!(parsed.extra.unknown, shortcut.extra.unknown);
    assert_eq!(parsed.trailer, shortcut.trailer);

    // And they survive a full second cycle unchanged
    let rebuilt = build_lnk_data(&parsed).unwrap();
    assert_eq!(rebuilt, data);
}

#[test]
fn property_store_block_round_trips() {
    let entries = vec![PropertyEntry {
        format_id: Uuid::parse_str("9f4c2855-9f79-4b39-a8d0-e1d42de1d5f3").unwrap(),
        key: PropertyKey::Id(5),
        value: PropertyValue::UnicodeString(String::from("Contoso.Notepad")),
    }];
    let store = write_property_store(&entries);

    let mut shortcut = base_shortcut("C:\\Windows\\System32\\notepad.exe");
    shortcut.extra.property_store = Some(store.clone());

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();
    assert_eq!(parsed.extra.property_store.as_ref(), Some(&store));

    let recovered = read_property_store(parsed.extra.property_store.as_ref().unwrap()).unwrap();
    assert_eq!(recovered, entries);
}

#[test]
fn printer_link_round_trips() {
    let mut shortcut = base_shortcut("\\\\printserver\\HP_LaserJet");
    shortcut.printer_link = true;

    let data = build_lnk_data(&shortcut).unwrap();
    let parsed = parse_lnk_data(&data).unwrap();
    // Printer links carry only the root pair of records
    assert_eq!(parsed.id_list.as_ref().unwrap().len(), 2);
    assert_eq!(parsed.id_list.as_ref().unwrap()[0][1], 0x58);
}
