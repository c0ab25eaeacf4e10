/**
 * Serialized property stores are a sequence of storages:
 * `[u32 storage size][u32 "1SPS"][16 byte format ID][entries...][u32 0]`
 * terminated by one more zero size. Each entry is
 * `[u32 entry size][key][u8 reserved][u16 type][u16 padding][payload]` where
 * the key is a numeric ID, or a length prefixed UTF16 name under the named
 * property format ID.
 *
 * Reading is deliberately defensive. Every length field is checked against
 * its enclosing frame and an inconsistent entry only loses itself, the reader
 * jumps to the declared boundary and keeps going
 */
use crate::utils::nom_helper::{
    nom_data, nom_signed_eight_bytes, nom_signed_four_bytes, nom_signed_two_bytes,
    nom_unsigned_eight_bytes, nom_unsigned_four_bytes, nom_unsigned_one_byte,
    nom_unsigned_two_bytes,
};
use crate::utils::strings::{ansi_bytes_nul, extract_utf8_string, extract_utf16_string, utf16_bytes_nul};
use crate::utils::uuid::guid_from_le_bytes;
use common::windows::{PropertyEntry, PropertyKey, PropertyValue};
use log::warn;
use nom::error::ErrorKind;
use std::mem::size_of;
use uuid::{Uuid, uuid};

/// "1SPS"
const STORE_MAGIC: u32 = 0x53505331;

/// Format ID whose entries are keyed by UTF16 name instead of numeric ID
pub(crate) const NAMED_PROPERTY_FORMAT: Uuid = uuid!("d5cdd505-2e9c-101b-9397-08002b2cf9ae");

/// Parse serialized property store bytes into typed entries
pub(crate) fn parse_property_store(data: &[u8]) -> nom::IResult<&[u8], Vec<PropertyEntry>> {
    let mut entries = Vec::new();
    let mut input = data;

    while input.len() >= 4 {
        let (storage_input, storage_size) = nom_unsigned_four_bytes(input)?;
        let prefix_size = 4;
        if storage_size < prefix_size {
            // Terminal storage
            input = storage_input;
            break;
        }
        if (storage_size - prefix_size) as usize > storage_input.len() {
            warn!("[propertystore] Storage size {storage_size} exceeds remaining data");
            break;
        }
        let (next_input, storage_data) = nom_data(storage_input, (storage_size - prefix_size) as u64)?;
        input = next_input;

        let (storage_data, magic) = nom_unsigned_four_bytes(storage_data)?;
        if magic != STORE_MAGIC {
            warn!("[propertystore] Unexpected storage magic {magic:x}, skipping storage");
            continue;
        }
        let (mut entry_input, guid_data) = nom_data(storage_data, size_of::<u128>() as u64)?;
        let format_id = match guid_from_le_bytes(guid_data) {
            Some(result) => result,
            None => continue,
        };
        let named = format_id == NAMED_PROPERTY_FORMAT;

        while entry_input.len() >= 4 {
            let (value_input, entry_size) = nom_unsigned_four_bytes(entry_input)?;
            if entry_size == 0 {
                break;
            }
            // Smallest valid entry: size, key, reserved byte, type and padding
            let min_entry = 13;
            if entry_size < min_entry || (entry_size - prefix_size) as usize > value_input.len() {
                warn!("[propertystore] Entry size {entry_size} is inconsistent, skipping storage remainder");
                break;
            }
            let (next_entry, entry_data) = nom_data(value_input, (entry_size - prefix_size) as u64)?;
            entry_input = next_entry;

            // One bad entry only loses itself, the boundary is already known
            match parse_entry(entry_data, &format_id, named) {
                Ok((_, entry)) => entries.push(entry),
                Err(_err) => warn!("[propertystore] Could not parse property entry"),
            }
        }
    }

    Ok((input, entries))
}

/// Parse one entry after its size prefix
fn parse_entry<'a>(
    data: &'a [u8],
    format_id: &Uuid,
    named: bool,
) -> nom::IResult<&'a [u8], PropertyEntry> {
    let (input, key) = if named {
        let (input, name_size) = nom_unsigned_four_bytes(data)?;
        let (input, _reserved) = nom_unsigned_one_byte(input)?;
        let (input, name_data) = nom_data(input, name_size as u64)?;
        (input, PropertyKey::Name(extract_utf16_string(name_data)))
    } else {
        let (input, id) = nom_unsigned_four_bytes(data)?;
        let (input, _reserved) = nom_unsigned_one_byte(input)?;
        (input, PropertyKey::Id(id))
    };

    let (input, vt_type) = nom_unsigned_two_bytes(input)?;
    let (input, _padding) = nom_unsigned_two_bytes(input)?;
    let (input, value) = parse_value(input, &vt_type)?;

    let entry = PropertyEntry {
        format_id: *format_id,
        key,
        value,
    };
    Ok((input, entry))
}

/// Parse one typed value payload. Unsupported type codes fail the entry,
/// which the caller skips
fn parse_value<'a>(data: &'a [u8], vt_type: &u16) -> nom::IResult<&'a [u8], PropertyValue> {
    let (input, value) = match vt_type {
        2 => {
            let (input, value) = nom_signed_two_bytes(data)?;
            (input, PropertyValue::Int16(value))
        }
        3 => {
            let (input, value) = nom_signed_four_bytes(data)?;
            (input, PropertyValue::Int32(value))
        }
        11 => {
            let (input, value) = nom_signed_two_bytes(data)?;
            (input, PropertyValue::Bool(value != 0))
        }
        18 => {
            let (input, value) = nom_unsigned_two_bytes(data)?;
            (input, PropertyValue::UInt16(value))
        }
        19 => {
            let (input, value) = nom_unsigned_four_bytes(data)?;
            (input, PropertyValue::UInt32(value))
        }
        20 => {
            let (input, value) = nom_signed_eight_bytes(data)?;
            (input, PropertyValue::Int64(value))
        }
        21 => {
            let (input, value) = nom_unsigned_eight_bytes(data)?;
            (input, PropertyValue::UInt64(value))
        }
        30 => {
            let (input, size) = nom_unsigned_four_bytes(data)?;
            let (input, value_data) = nom_data(input, size as u64)?;
            (input, PropertyValue::AnsiString(extract_utf8_string(value_data)))
        }
        31 => {
            let (input, size) = nom_unsigned_four_bytes(data)?;
            let (input, value_data) = nom_data(input, size as u64)?;
            (
                input,
                PropertyValue::UnicodeString(extract_utf16_string(value_data)),
            )
        }
        64 => {
            let (input, value) = nom_unsigned_eight_bytes(data)?;
            (input, PropertyValue::FileTime(value))
        }
        65 => {
            let (input, size) = nom_unsigned_four_bytes(data)?;
            let (input, value_data) = nom_data(input, size as u64)?;
            (input, PropertyValue::Blob(value_data.to_vec()))
        }
        72 => {
            let (input, guid_data) = nom_data(data, size_of::<u128>() as u64)?;
            (
                input,
                PropertyValue::Guid(guid_from_le_bytes(guid_data).unwrap_or_default()),
            )
        }
        _ => {
            warn!("[propertystore] Unsupported property type {vt_type}");
            return Err(nom::Err::Failure(nom::error::Error::new(
                data,
                ErrorKind::Fail,
            )));
        }
    };
    Ok((input, value))
}

/// Serialize one typed value: 16-bit type code, 16-bit padding, then the type
/// specific payload. Two-byte values pad out to a four-byte boundary
pub(crate) fn serialize_value(value: &PropertyValue) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&value.vt_type().to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());

    match value {
        PropertyValue::Int16(value) => {
            data.extend_from_slice(&value.to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        PropertyValue::Int32(value) => data.extend_from_slice(&value.to_le_bytes()),
        PropertyValue::Bool(value) => {
            let bool_value: i16 = if *value { -1 } else { 0 };
            data.extend_from_slice(&bool_value.to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        PropertyValue::UInt16(value) => {
            data.extend_from_slice(&value.to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        PropertyValue::UInt32(value) => data.extend_from_slice(&value.to_le_bytes()),
        PropertyValue::Int64(value) => data.extend_from_slice(&value.to_le_bytes()),
        PropertyValue::UInt64(value) => data.extend_from_slice(&value.to_le_bytes()),
        PropertyValue::AnsiString(value) => {
            let text = ansi_bytes_nul(value);
            data.extend_from_slice(&(text.len() as u32).to_le_bytes());
            data.extend_from_slice(&text);
        }
        PropertyValue::UnicodeString(value) => {
            let text = utf16_bytes_nul(value);
            data.extend_from_slice(&(text.len() as u32).to_le_bytes());
            data.extend_from_slice(&text);
        }
        PropertyValue::FileTime(value) => data.extend_from_slice(&value.to_le_bytes()),
        PropertyValue::Blob(value) => {
            data.extend_from_slice(&(value.len() as u32).to_le_bytes());
            data.extend_from_slice(value);
        }
        PropertyValue::Guid(value) => data.extend_from_slice(&value.to_bytes_le()),
    }
    data
}

/// Serialize one storage: size prefix, magic, format ID, entries, and the
/// zero terminal entry
pub(crate) fn write_storage(format_id: &Uuid, entries: &[(PropertyKey, PropertyValue)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&STORE_MAGIC.to_le_bytes());
    body.extend_from_slice(&format_id.to_bytes_le());

    for (key, value) in entries {
        let value_data = serialize_value(value);
        match key {
            PropertyKey::Id(id) => {
                let entry_size = 4 + 4 + 1 + value_data.len();
                body.extend_from_slice(&(entry_size as u32).to_le_bytes());
                body.extend_from_slice(&id.to_le_bytes());
                body.push(0);
            }
            PropertyKey::Name(name) => {
                let name_data = utf16_bytes_nul(name);
                let entry_size = 4 + 4 + 1 + name_data.len() + value_data.len();
                body.extend_from_slice(&(entry_size as u32).to_le_bytes());
                body.extend_from_slice(&(name_data.len() as u32).to_le_bytes());
                body.push(0);
                body.extend_from_slice(&name_data);
            }
        }
        body.extend_from_slice(&value_data);
    }
    body.extend_from_slice(&0u32.to_le_bytes());

    let mut data = Vec::with_capacity(4 + body.len());
    data.extend_from_slice(&((4 + body.len()) as u32).to_le_bytes());
    data.extend_from_slice(&body);
    data
}

/// Serialize entries back into a full property store. Consecutive entries
/// sharing a format ID land in one storage
pub(crate) fn write_property_store(entries: &[PropertyEntry]) -> Vec<u8> {
    let mut data = Vec::new();

    let mut pending: Vec<(PropertyKey, PropertyValue)> = Vec::new();
    let mut pending_format = None;
    for entry in entries {
        if pending_format != Some(entry.format_id) {
            if let Some(format_id) = pending_format {
                data.extend_from_slice(&write_storage(&format_id, &pending));
                pending.clear();
            }
            pending_format = Some(entry.format_id);
        }
        pending.push((entry.key.clone(), entry.value.clone()));
    }
    if let Some(format_id) = pending_format {
        data.extend_from_slice(&write_storage(&format_id, &pending));
    }

    data.extend_from_slice(&0u32.to_le_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::{parse_property_store, write_property_store, write_storage};
    use common::windows::{PropertyEntry, PropertyKey, PropertyValue};
    use uuid::uuid;

    #[test]
    fn test_empty_store() {
        let data = write_property_store(&[]);
        assert_eq!(data, [0, 0, 0, 0]);

        let (remaining, entries) = parse_property_store(&data).unwrap();
        assert!(remaining.is_empty());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_every_value_type_round_trips() {
        let format_id = uuid!("9f4c2855-9f79-4b39-a8d0-e1d42de1d5f3");
        let values = [
            PropertyValue::Int16(-5),
            PropertyValue::Int32(-500000),
            PropertyValue::Bool(true),
            PropertyValue::UInt16(65500),
            PropertyValue::UInt32(4000000000),
            PropertyValue::Int64(-9000000000),
            PropertyValue::UInt64(18000000000000000000),
            PropertyValue::AnsiString(String::from("plain text")),
            PropertyValue::UnicodeString(String::from("Текст")),
            PropertyValue::FileTime(132244766418940254),
            PropertyValue::Blob(vec![1, 2, 3, 4, 5]),
            PropertyValue::Guid(uuid!("b9b4b3fc-2b51-4a42-b5d8-324146afcf25")),
        ];
        let entries: Vec<PropertyEntry> = values
            .iter()
            .enumerate()
            .map(|(index, value)| PropertyEntry {
                format_id,
                key: PropertyKey::Id(index as u32 + 2),
                value: value.clone(),
            })
            .collect();

        let data = write_property_store(&entries);
        let (remaining, parsed) = parse_property_store(&data).unwrap();
        assert!(remaining.is_empty());
        assert_eq!(parsed, entries);
        for (entry, value) in parsed.iter().zip(values.iter()) {
            assert_eq!(entry.value.vt_type(), value.vt_type());
        }
    }

    #[test]
    fn test_named_entries_round_trip() {
        let entries = vec![
            PropertyEntry {
                format_id: super::NAMED_PROPERTY_FORMAT,
                key: PropertyKey::Name(String::from("CustomMarker")),
                value: PropertyValue::UInt32(7),
            },
            PropertyEntry {
                format_id: super::NAMED_PROPERTY_FORMAT,
                key: PropertyKey::Name(String::from("CustomLabel")),
                value: PropertyValue::UnicodeString(String::from("Search Results")),
            },
        ];

        let data = write_property_store(&entries);
        let (_, parsed) = parse_property_store(&data).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn test_corrupt_entry_is_skipped() {
        let format_id = uuid!("b725f130-47ef-101a-a5f1-02608c9eebac");
        let good = write_storage(
            &format_id,
            &[(
                PropertyKey::Id(4),
                PropertyValue::UnicodeString(String::from("Text Document")),
            )],
        );

        // A second storage whose single entry declares a size far past its frame
        let mut corrupt_body = Vec::new();
        corrupt_body.extend_from_slice(&0x53505331u32.to_le_bytes());
        corrupt_body.extend_from_slice(&format_id.to_bytes_le());
        corrupt_body.extend_from_slice(&9999u32.to_le_bytes());
        corrupt_body.extend_from_slice(&[0; 9]);
        let mut corrupt = Vec::new();
        corrupt.extend_from_slice(&((4 + corrupt_body.len()) as u32).to_le_bytes());
        corrupt.extend_from_slice(&corrupt_body);

        let mut data = Vec::new();
        data.extend_from_slice(&good);
        data.extend_from_slice(&corrupt);
        data.extend_from_slice(&0u32.to_le_bytes());

        let (_, parsed) = parse_property_store(&data).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].key, PropertyKey::Id(4));
    }

    #[test]
    fn test_storage_size_past_buffer() {
        let data = [200, 0, 0, 0, 49, 83, 80, 83, 1, 2, 3];
        let (_, parsed) = parse_property_store(&data).unwrap();
        assert!(parsed.is_empty());
    }
}
