/**
 * Shortcuts placed in the Power User Menu folder are ignored unless they
 * carry a validation hash over their target and arguments, stored as a
 * property under {FB8D2D7B-90D1-4E34-BF60-6EAC09922BBF} PID 2. The hash is
 * the 4-byte shlwapi HashData rolling hash and has to match the original bit
 * pattern exactly
 */
use crate::propertystore::builder::PropertyStoreBuilder;
use crate::utils::strings::utf16_bytes;

const HASH_SEED: [u8; 4] = [0x81, 0x3a, 0xde, 0x67];
const HASH_SALT: &str = "Do not prehash links. This should only be done by the user.";

/// Compute the Power User Menu hash for a target path and optional arguments
pub fn winx_hash(target: &str, arguments: Option<&str>) -> u32 {
    let input = format!("{target}{}", arguments.unwrap_or_default());
    let salted = format!("{}{HASH_SALT}", input.to_lowercase());
    hash_data(&utf16_bytes(&salted))
}

/// Build the one-property store carrying the Power User Menu hash, ready to
/// use as a property store block payload
pub fn winx_property_store(target: &str, arguments: Option<&str>) -> Vec<u8> {
    let mut builder = PropertyStoreBuilder::new();
    builder.winx_hash = Some(winx_hash(target, arguments));
    builder.build()
}

/// The shlwapi HashData algorithm with a 4-byte output: one hash byte is
/// updated per input byte via XOR, a 3-bit rotate, a second XOR, and a final
/// rotate by the input byte value
fn hash_data(data: &[u8]) -> u32 {
    let mut hash = HASH_SEED;
    for (index, value) in data.iter().enumerate() {
        let slot = index % 4;
        hash[slot] ^= value;
        hash[slot] = hash[slot].rotate_left(3);
        hash[slot] ^= value;
        hash[slot] = hash[slot].rotate_left((value & 7) as u32);
    }
    u32::from_le_bytes(hash)
}

#[cfg(test)]
mod tests {
    use super::{winx_hash, winx_property_store};
    use crate::propertystore::store::parse_property_store;
    use common::windows::{PropertyKey, PropertyValue};
    use uuid::uuid;

    #[test]
    fn test_winx_hash_deterministic() {
        let first = winx_hash("C:\\Windows\\System32\\cmd.exe", None);
        let second = winx_hash("C:\\Windows\\System32\\cmd.exe", None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_winx_hash_case_insensitive() {
        let lower = winx_hash("c:\\windows\\system32\\cmd.exe", Some("/k"));
        let upper = winx_hash("C:\\WINDOWS\\System32\\CMD.EXE", Some("/K"));
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_winx_hash_arguments_matter() {
        let plain = winx_hash("C:\\Windows\\System32\\cmd.exe", None);
        let with_args = winx_hash("C:\\Windows\\System32\\cmd.exe", Some("/k echo hi"));
        assert_ne!(plain, with_args);
    }

    #[test]
    fn test_winx_property_store() {
        let data = winx_property_store("C:\\Windows\\System32\\control.exe", None);
        let entries = parse_property_store(&data).unwrap().1;
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].format_id,
            uuid!("fb8d2d7b-90d1-4e34-bf60-6eac09922bbf")
        );
        assert_eq!(entries[0].key, PropertyKey::Id(2));
        assert_eq!(
            entries[0].value,
            PropertyValue::UInt32(winx_hash("C:\\Windows\\System32\\control.exe", None))
        );
    }
}
