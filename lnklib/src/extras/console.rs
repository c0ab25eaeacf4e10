use crate::extras::CONSOLE_SIG;
use crate::utils::nom_helper::{nom_data, nom_unsigned_four_bytes, nom_unsigned_two_bytes};
use crate::utils::strings::{extract_utf16_string, utf16_bytes};
use common::windows::ConsoleData;

/// The console block is always 204 bytes including size and signature
const BLOCK_SIZE: usize = 204;
/// FaceName is a fixed 32 wide character field
const FACE_NAME_SIZE: usize = 64;

/// Parse the console appearance payload
pub(crate) fn parse_console(data: &[u8]) -> nom::IResult<&[u8], ConsoleData> {
    let (input, fill_attributes) = nom_unsigned_two_bytes(data)?;
    let (input, popup_fill_attributes) = nom_unsigned_two_bytes(input)?;
    let (input, screen_width_buffer_size) = nom_unsigned_two_bytes(input)?;
    let (input, screen_height_buffer_size) = nom_unsigned_two_bytes(input)?;
    let (input, window_width) = nom_unsigned_two_bytes(input)?;
    let (input, window_height) = nom_unsigned_two_bytes(input)?;
    let (input, window_x_coordinate) = nom_unsigned_two_bytes(input)?;
    let (input, window_y_coordinate) = nom_unsigned_two_bytes(input)?;

    let (input, _unused) = nom_unsigned_four_bytes(input)?;
    let (input, _unused2) = nom_unsigned_four_bytes(input)?;

    let (input, font_size) = nom_unsigned_four_bytes(input)?;
    let (input, font_family) = nom_unsigned_four_bytes(input)?;
    let (input, font_weight) = nom_unsigned_four_bytes(input)?;

    let (input, face_name_data) = nom_data(input, FACE_NAME_SIZE as u64)?;

    let (input, cursor_size) = nom_unsigned_four_bytes(input)?;
    let (input, full_screen) = nom_unsigned_four_bytes(input)?;
    let (input, quick_edit) = nom_unsigned_four_bytes(input)?;
    let (input, insert_mode) = nom_unsigned_four_bytes(input)?;
    let (input, automatic_position) = nom_unsigned_four_bytes(input)?;
    let (input, history_buffer_size) = nom_unsigned_four_bytes(input)?;
    let (input, number_history_buffers) = nom_unsigned_four_bytes(input)?;
    let (mut input, duplicates_allowed_history) = nom_unsigned_four_bytes(input)?;

    let mut color_table = [0; 16];
    for color in &mut color_table {
        let (color_input, value) = nom_unsigned_four_bytes(input)?;
        *color = value;
        input = color_input;
    }

    let console = ConsoleData {
        fill_attributes,
        popup_fill_attributes,
        screen_width_buffer_size,
        screen_height_buffer_size,
        window_width,
        window_height,
        window_x_coordinate,
        window_y_coordinate,
        font_size,
        font_family,
        font_weight,
        face_name: extract_utf16_string(face_name_data),
        cursor_size,
        full_screen: full_screen != 0,
        quick_edit: quick_edit != 0,
        insert_mode: insert_mode != 0,
        automatic_position: automatic_position != 0,
        history_buffer_size,
        number_history_buffers,
        duplicates_allowed_history: duplicates_allowed_history != 0,
        color_table,
    };
    Ok((input, console))
}

/// Serialize the console appearance block. The face name is truncated and NUL
/// padded to its fixed 64-byte field
pub(crate) fn build_console(console: &ConsoleData) -> Vec<u8> {
    let mut data = Vec::with_capacity(BLOCK_SIZE);
    data.extend_from_slice(&(BLOCK_SIZE as u32).to_le_bytes());
    data.extend_from_slice(&CONSOLE_SIG.to_le_bytes());

    data.extend_from_slice(&console.fill_attributes.to_le_bytes());
    data.extend_from_slice(&console.popup_fill_attributes.to_le_bytes());
    data.extend_from_slice(&console.screen_width_buffer_size.to_le_bytes());
    data.extend_from_slice(&console.screen_height_buffer_size.to_le_bytes());
    data.extend_from_slice(&console.window_width.to_le_bytes());
    data.extend_from_slice(&console.window_height.to_le_bytes());
    data.extend_from_slice(&console.window_x_coordinate.to_le_bytes());
    data.extend_from_slice(&console.window_y_coordinate.to_le_bytes());

    // Unused1, Unused2
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    data.extend_from_slice(&console.font_size.to_le_bytes());
    data.extend_from_slice(&console.font_family.to_le_bytes());
    data.extend_from_slice(&console.font_weight.to_le_bytes());

    let mut face_name = [0; FACE_NAME_SIZE];
    let face_data = utf16_bytes(&console.face_name);
    let copy_len = face_data.len().min(FACE_NAME_SIZE - 2);
    face_name[..copy_len].copy_from_slice(&face_data[..copy_len]);
    data.extend_from_slice(&face_name);

    data.extend_from_slice(&console.cursor_size.to_le_bytes());
    data.extend_from_slice(&(console.full_screen as u32).to_le_bytes());
    data.extend_from_slice(&(console.quick_edit as u32).to_le_bytes());
    data.extend_from_slice(&(console.insert_mode as u32).to_le_bytes());
    data.extend_from_slice(&(console.automatic_position as u32).to_le_bytes());
    data.extend_from_slice(&console.history_buffer_size.to_le_bytes());
    data.extend_from_slice(&console.number_history_buffers.to_le_bytes());
    data.extend_from_slice(&(console.duplicates_allowed_history as u32).to_le_bytes());

    for color in console.color_table {
        data.extend_from_slice(&color.to_le_bytes());
    }

    data
}
