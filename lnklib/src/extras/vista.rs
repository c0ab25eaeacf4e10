use crate::extras::VISTA_ID_LIST_SIG;

/// Serialize the Vista and above item ID list block. The payload is an
/// alternate item ID list kept opaque, like the primary list records
pub(crate) fn build_vista(id_list: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + id_list.len());
    data.extend_from_slice(&((8 + id_list.len()) as u32).to_le_bytes());
    data.extend_from_slice(&VISTA_ID_LIST_SIG.to_le_bytes());
    data.extend_from_slice(id_list);
    data
}

#[cfg(test)]
mod tests {
    use super::build_vista;

    #[test]
    fn test_build_vista() {
        let data = build_vista(&[1, 2, 3, 4]);
        assert_eq!(data, [12, 0, 0, 0, 12, 0, 0, 160, 1, 2, 3, 4]);
    }
}
