use crate::error::LnkError;
use common::windows::PropertyEntry;
use log::error;

pub(crate) mod builder;
pub(crate) mod store;

/// Parse serialized property store bytes, for example the payload of the
/// property store extra data block
pub fn read_property_store(data: &[u8]) -> Result<Vec<PropertyEntry>, LnkError> {
    let store_result = store::parse_property_store(data);
    match store_result {
        Ok((_, entries)) => Ok(entries),
        Err(_err) => {
            error!("[propertystore] Could not parse property store data");
            Err(LnkError::PropertyStore)
        }
    }
}

/// Serialize property entries back into property store bytes. Consecutive
/// entries sharing a format ID are grouped into one storage
pub fn write_property_store(entries: &[PropertyEntry]) -> Vec<u8> {
    store::write_property_store(entries)
}
