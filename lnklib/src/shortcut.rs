use crate::error::LnkError;
use crate::extras::{build_extra_blocks, parse_extra_blocks};
use crate::header::{LnkHeader, build_header};
use crate::location::{build_location, parse_location};
use crate::shellitems::{classify_target, parse_lnk_shellitems, target_items, write_id_list};
use crate::strings::{extract_string, write_string_data};
use crate::utils::strings::is_single_byte;
use common::windows::{DataFlags, Shortcut};
use log::error;

/// Parse a single `shortcut` file
pub fn parse_lnk_file(path: &str) -> Result<Shortcut, LnkError> {
    let read_result = std::fs::read(path);
    let lnk_data = match read_result {
        Ok(data) => data,
        Err(err) => {
            error!("[shortcuts] Could not read lnk file {path}: {err:?}");
            return Err(LnkError::ReadFile);
        }
    };
    parse_lnk_data(&lnk_data)
}

/// Parse the raw bytes of `shortcut` data
pub fn parse_lnk_data(data: &[u8]) -> Result<Shortcut, LnkError> {
    let header_result = LnkHeader::check_header(data);
    let is_header = match header_result {
        Ok((_, result)) => result,
        Err(_err) => {
            error!("[shortcuts] Could not check lnk header");
            return Err(LnkError::BadHeader);
        }
    };
    if !is_header {
        return Err(LnkError::NotLnkData);
    }

    let shortcut_result = get_shortcut_data(data);
    match shortcut_result {
        Ok((_, shortcut)) => Ok(shortcut),
        Err(_err) => {
            error!("[shortcuts] Could not parse shortcut data");
            Err(LnkError::Parse)
        }
    }
}

/// Walk the `shortcut` structures in file order: header, item ID list,
/// location info, string data, then the extra data block chain
pub(crate) fn get_shortcut_data(data: &[u8]) -> nom::IResult<&[u8], Shortcut> {
    let (mut input, header) = LnkHeader::parse_header(data)?;

    let unicode = header.data_flags.contains(&DataFlags::IsUnicode);
    let mut shortcut = Shortcut {
        attribute_flags: header.attribute_flags,
        created: header.created,
        accessed: header.access,
        modified: header.modified,
        file_size: header.file_size,
        icon_index: header.icon_index,
        show_command: header.show_command,
        hotkey: header.hotkey,
        unicode_strings: Some(unicode),
        run_as_user: header.data_flags.contains(&DataFlags::RunAsUser),
        prefer_environment_path: header
            .data_flags
            .contains(&DataFlags::PreferEnvironmentPath),
        ..Default::default()
    };

    if header.data_flags.contains(&DataFlags::HasTargetIdList) {
        let (remaining_input, items) = parse_lnk_shellitems(input)?;
        shortcut.id_list = Some(items);
        input = remaining_input;
    }

    if header.data_flags.contains(&DataFlags::HasLinkInfo)
        && !header.data_flags.contains(&DataFlags::ForceNoLinkInfo)
    {
        let (remaining_input, (info, extended)) = parse_location(input)?;
        shortcut.link_info = Some(info);
        shortcut.unicode_link_info = Some(extended);
        input = remaining_input;
    }

    let string_fields = [
        (DataFlags::HasName, &mut shortcut.name),
        (DataFlags::HasRelativePath, &mut shortcut.relative_path),
        (
            DataFlags::HasWorkingDirectory,
            &mut shortcut.working_directory,
        ),
        (DataFlags::HasArguments, &mut shortcut.arguments),
        (DataFlags::HasIconLocation, &mut shortcut.icon_location),
    ];
    for (flag, field) in string_fields {
        if header.data_flags.contains(&flag) {
            let (remaining_input, value) = extract_string(input, unicode)?;
            *field = Some(value);
            input = remaining_input;
        }
    }

    let (input, extra) = parse_extra_blocks(input)?;
    shortcut.extra = extra;
    shortcut.trailer = input.to_vec();

    Ok((input, shortcut))
}

/// Serialize a `Shortcut` back into file bytes. The header flag bits are
/// derived from which fields are set
pub fn build_lnk_data(shortcut: &Shortcut) -> Result<Vec<u8>, LnkError> {
    let mut attributes = shortcut.attribute_flags;
    let id_list_data = if let Some(items) = &shortcut.id_list {
        Some(write_id_list(items))
    } else if let Some(target) = &shortcut.target {
        let info = classify_target(target, shortcut.printer_link);
        if attributes == 0 {
            attributes = info.attributes;
        }
        Some(write_id_list(&target_items(&info)))
    } else {
        None
    };

    // The shortcut has to point at something: an item ID list, location info,
    // or an environment style target
    if id_list_data.is_none()
        && shortcut.link_info.is_none()
        && shortcut.extra.environment_variable.is_none()
        && shortcut.extra.darwin_id.is_none()
    {
        return Err(LnkError::MissingTarget);
    }

    let strings = [
        &shortcut.name,
        &shortcut.relative_path,
        &shortcut.working_directory,
        &shortcut.arguments,
        &shortcut.icon_location,
    ];
    let unicode = shortcut.unicode_strings.unwrap_or_else(|| {
        !strings
            .iter()
            .filter_map(|value| value.as_deref())
            .all(is_single_byte)
    });
    let unicode_info = shortcut.unicode_link_info.unwrap_or_else(|| {
        shortcut.link_info.as_ref().is_some_and(|info| {
            let local_text = info.local.as_ref().map(|local| {
                is_single_byte(&local.base_path) && is_single_byte(&local.volume_label)
            });
            let network_text = info.network.as_ref().map(|network| {
                is_single_byte(&network.share_name)
                    && is_single_byte(&network.path_suffix)
                    && network
                        .device_name
                        .as_deref()
                        .map(is_single_byte)
                        .unwrap_or(true)
            });
            !(local_text.unwrap_or(true) && network_text.unwrap_or(true))
        })
    });

    let mut flags = 0;
    if id_list_data.is_some() {
        flags |= 0x1;
    }
    if shortcut.link_info.is_some() {
        flags |= 0x2;
    }
    let string_bits = [0x4, 0x8, 0x10, 0x20, 0x40];
    for (bit, value) in string_bits.iter().zip(strings.iter()) {
        if value.is_some() {
            flags |= bit;
        }
    }
    if unicode {
        flags |= 0x80;
    }
    if shortcut.extra.environment_variable.is_some() {
        flags |= 0x200;
    }
    if shortcut.extra.darwin_id.is_some() {
        flags |= 0x1000;
    }
    if shortcut.run_as_user {
        flags |= 0x2000;
    }
    if shortcut.extra.icon_environment.is_some() {
        flags |= 0x4000;
    }
    if shortcut.extra.shim_layer.is_some() {
        flags |= 0x20000;
    }
    if shortcut.prefer_environment_path {
        flags |= 0x2000000;
    }

    let mut data = build_header(shortcut, &flags, &attributes);
    if let Some(id_list) = id_list_data {
        data.extend_from_slice(&id_list);
    }
    if let Some(info) = &shortcut.link_info {
        data.extend_from_slice(&build_location(info, unicode_info));
    }
    for value in strings.iter().filter_map(|value| value.as_deref()) {
        data.extend_from_slice(&write_string_data(value, unicode));
    }
    data.extend_from_slice(&build_extra_blocks(&shortcut.extra));
    data.extend_from_slice(&shortcut.trailer);

    Ok(data)
}
