/**
 * Software installation advertised shortcuts carry a descriptor string in the
 * Darwin data block instead of a real target path:
 * `<packed product code><feature id>['>'<packed component code>]`
 *
 * The packed form renders a 128-bit identifier as 32 uppercase hex characters
 * and reverses the characters within each canonical group independently. It
 * is not a global string reversal
 */
use common::windows::DarwinDescriptor;
use uuid::Uuid;

const PACKED_SIZE: usize = 32;

/// Encode an identifier into its 32-character packed hex form
pub fn encode_compressed_guid(id: &Uuid) -> String {
    let mut buffer = Uuid::encode_buffer();
    let hex = id.simple().encode_upper(&mut buffer);
    reorder_packed(hex)
}

/// Decode a 32-character packed hex form back into an identifier. Returns
/// `None` for inputs shorter than 32 characters or with non-hex content
pub fn decode_compressed_guid(packed: &str) -> Option<Uuid> {
    if packed.chars().count() < PACKED_SIZE {
        return None;
    }
    let packed_id: String = packed.chars().take(PACKED_SIZE).collect();
    Uuid::parse_str(&reorder_packed(&packed_id)).ok()
}

/// Reverse the characters within each canonical identifier group: the 8-4-4
/// leading groups and the eight trailing byte pairs. The transform is its own
/// inverse
fn reorder_packed(hex: &str) -> String {
    let chars: Vec<char> = hex.chars().collect();
    let groups = [
        (0, 8),
        (8, 4),
        (12, 4),
        (16, 2),
        (18, 2),
        (20, 2),
        (22, 2),
        (24, 2),
        (26, 2),
        (28, 2),
        (30, 2),
    ];

    let mut reordered = String::with_capacity(PACKED_SIZE);
    for (start, length) in groups {
        reordered.extend(chars[start..start + length].iter().rev());
    }
    reordered
}

/// Decode a full advertised shortcut descriptor. The first 32 characters are
/// the product code, the remainder splits at the first `>` into the feature
/// ID and an optional packed component code. Returns `None` for empty or
/// too-short input
pub fn parse_darwin_descriptor(descriptor: &str) -> Option<DarwinDescriptor> {
    if descriptor.chars().count() < PACKED_SIZE {
        return None;
    }

    let product_code = decode_compressed_guid(descriptor)?;
    let remaining: String = descriptor.chars().skip(PACKED_SIZE).collect();

    let (feature_id, component) = match remaining.split_once('>') {
        Some((feature, rest)) => (feature.to_string(), rest.to_string()),
        None => (remaining, String::new()),
    };

    let component_code = if component.chars().count() >= PACKED_SIZE {
        decode_compressed_guid(&component)?
    } else {
        Uuid::nil()
    };

    Some(DarwinDescriptor {
        product_code,
        feature_id,
        component_code,
    })
}

/// Encode an advertised shortcut descriptor back into its string form. A nil
/// component code is omitted along with its `>` separator
pub fn encode_darwin_descriptor(descriptor: &DarwinDescriptor) -> String {
    let mut value = encode_compressed_guid(&descriptor.product_code);
    value.push_str(&descriptor.feature_id);
    if !descriptor.component_code.is_nil() {
        value.push('>');
        value.push_str(&encode_compressed_guid(&descriptor.component_code));
    }
    value
}
