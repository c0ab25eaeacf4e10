/**
 * Codec for Windows `Shortcut` (`lnk`) files: the fixed header, the target
 * item ID list, the location (link info) block, the string data fields, and
 * the extra data block chain with its embedded property store.
 *
 * Parsing is byte-exact and loss free: blocks with unrecognized signatures
 * and any trailing overlay bytes are preserved verbatim, so a parse and
 * rebuild cycle does not corrupt files written by newer or third party
 * writers. Building produces spec compliant output from the same value model.
 *
 * References:
 * `https://winprotocoldoc.blob.core.windows.net/productionwindowsarchives/MS-SHLLINK/%5bMS-SHLLINK%5d.pdf`
 * `https://github.com/libyal/liblnk/blob/main/documentation/Windows%20Shortcut%20File%20(LNK)%20format.asciidoc`
 */
pub mod error;
mod extras;
mod header;
mod location;
mod network;
mod propertystore;
mod shellitems;
mod shortcut;
mod strings;
mod utils;
mod volume;
mod winx;

pub use crate::extras::darwin::{
    decode_compressed_guid, encode_compressed_guid, encode_darwin_descriptor,
    parse_darwin_descriptor,
};
pub use crate::extras::tracker::{
    guid_node_address, guid_timestamp, guid_timestamp_iso, is_version1_guid,
};
pub use crate::header::file_attribute_flags;
pub use crate::propertystore::builder::PropertyStoreBuilder;
pub use crate::propertystore::{read_property_store, write_property_store};
pub use crate::shortcut::{build_lnk_data, parse_lnk_data, parse_lnk_file};
pub use crate::winx::{winx_hash, winx_property_store};
