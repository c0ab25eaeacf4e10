use crate::extras::TRACKER_SIG;
use crate::utils::nom_helper::{nom_data, nom_unsigned_four_bytes};
use crate::utils::strings::extract_utf8_string;
use crate::utils::time::unixepoch_to_iso;
use crate::utils::uuid::guid_from_le_bytes;
use common::windows::TrackerData;
use std::mem::size_of;

const BLOCK_SIZE: u32 = 96;
const TRACKER_SIZE: u32 = 88;
const MACHINE_FIELD: usize = 16;

/// Parse the distributed link tracking payload
pub(crate) fn parse_tracker(data: &[u8]) -> nom::IResult<&[u8], TrackerData> {
    let (input, _tracker_size) = nom_unsigned_four_bytes(data)?;
    let (input, _tracker_version) = nom_unsigned_four_bytes(input)?;

    let (input, machine_data) = nom_data(input, MACHINE_FIELD as u64)?;
    let (input, droid_volume) = nom_data(input, size_of::<u128>() as u64)?;
    let (input, droid_file) = nom_data(input, size_of::<u128>() as u64)?;
    let (input, birth_volume) = nom_data(input, size_of::<u128>() as u64)?;
    let (input, birth_file) = nom_data(input, size_of::<u128>() as u64)?;

    // The slices are always exactly 16 bytes, conversion cannot fail
    let tracker = TrackerData {
        machine_id: extract_utf8_string(machine_data),
        volume_id: guid_from_le_bytes(droid_volume).unwrap_or_default(),
        object_id: guid_from_le_bytes(droid_file).unwrap_or_default(),
        birth_volume_id: Some(guid_from_le_bytes(birth_volume).unwrap_or_default()),
        birth_object_id: Some(guid_from_le_bytes(birth_file).unwrap_or_default()),
    };
    Ok((input, tracker))
}

/// Serialize the distributed link tracking block. Fixed 96 bytes: the machine
/// name is NUL padded to 16 bytes (so at most 15 characters survive) and the
/// birth pair falls back to the current pair
pub(crate) fn build_tracker(tracker: &TrackerData) -> Vec<u8> {
    let mut data = Vec::with_capacity(BLOCK_SIZE as usize);
    data.extend_from_slice(&BLOCK_SIZE.to_le_bytes());
    data.extend_from_slice(&TRACKER_SIG.to_le_bytes());
    data.extend_from_slice(&TRACKER_SIZE.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    let mut machine = [0; MACHINE_FIELD];
    let machine_data = tracker.machine_id.as_bytes();
    let copy_len = machine_data.len().min(MACHINE_FIELD - 1);
    machine[..copy_len].copy_from_slice(&machine_data[..copy_len]);
    data.extend_from_slice(&machine);

    data.extend_from_slice(&tracker.volume_id.to_bytes_le());
    data.extend_from_slice(&tracker.object_id.to_bytes_le());
    data.extend_from_slice(
        &tracker
            .birth_volume_id
            .unwrap_or(tracker.volume_id)
            .to_bytes_le(),
    );
    data.extend_from_slice(
        &tracker
            .birth_object_id
            .unwrap_or(tracker.object_id)
            .to_bytes_le(),
    );
    data
}

/// Whether the identifier is a version 1 (time based) UUID. Only those embed
/// a timestamp and hardware address
pub fn is_version1_guid(id: &uuid::Uuid) -> bool {
    id.get_version_num() == 1
}

/// Extract the embedded hardware (node) address of a version 1 identifier,
/// formatted as colon separated uppercase hex pairs
pub fn guid_node_address(id: &uuid::Uuid) -> Option<String> {
    if !is_version1_guid(id) {
        return None;
    }

    let node_start = 10;
    let node = &id.as_bytes()[node_start..];
    let pairs: Vec<String> = node.iter().map(|value| format!("{value:02X}")).collect();
    Some(pairs.join(":"))
}

/// Extract the embedded creation time of a version 1 identifier as unixepoch
/// seconds. The 60-bit field counts 100ns ticks since 1582-10-15
pub fn guid_timestamp(id: &uuid::Uuid) -> Option<i64> {
    if !is_version1_guid(id) {
        return None;
    }

    let bytes = id.as_bytes();
    let time_low = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64;
    let time_mid = u16::from_be_bytes([bytes[4], bytes[5]]) as u64;
    // High nibble is the version
    let time_high = (u16::from_be_bytes([bytes[6], bytes[7]]) & 0xfff) as u64;

    let ticks = (time_high << 48) | (time_mid << 32) | time_low;

    let ticks_per_second = 10000000;
    let gregorian_to_unix = 12219292800;
    Some((ticks / ticks_per_second) as i64 - gregorian_to_unix)
}

/// Embedded creation time of a version 1 identifier in ISO8601 format
pub fn guid_timestamp_iso(id: &uuid::Uuid) -> Option<String> {
    let timestamp = guid_timestamp(id)?;
    Some(unixepoch_to_iso(&timestamp))
}
