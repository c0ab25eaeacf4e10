use crate::extras::PROPERTY_SIG;

/// Serialize the property store block. The payload is a serialized property
/// store produced by the store builder or preserved from parsing
pub(crate) fn build_property(store: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + store.len());
    data.extend_from_slice(&((8 + store.len()) as u32).to_le_bytes());
    data.extend_from_slice(&PROPERTY_SIG.to_le_bytes());
    data.extend_from_slice(store);
    data
}
