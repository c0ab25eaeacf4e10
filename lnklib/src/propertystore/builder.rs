use crate::propertystore::store::{NAMED_PROPERTY_FORMAT, write_storage};
use common::windows::{PropertyKey, PropertyValue};
use uuid::{Uuid, uuid};

const APP_USER_MODEL_FORMAT: Uuid = uuid!("9f4c2855-9f79-4b39-a8d0-e1d42de1d5f3");
const LINK_FORMAT: Uuid = uuid!("b9b4b3fc-2b51-4a42-b5d8-324146afcf25");
const SYSTEM_FORMAT: Uuid = uuid!("b725f130-47ef-101a-a5f1-02608c9eebac");
const TARGET_URL_FORMAT: Uuid = uuid!("5cbf2787-48cf-4208-b90e-ee5e5d420294");
const TARGET_EXTENSION_FORMAT: Uuid = uuid!("7a7d76f4-b630-4bd7-95ff-37cc51a975c9");
const WINX_FORMAT: Uuid = uuid!("fb8d2d7b-90d1-4e34-bf60-6eac09922bbf");

/// Accumulates well-known shortcut properties plus arbitrary named entries
/// and serializes them into property store bytes. Each storage section is
/// emitted only when at least one of its fields is set. Owned by a single
/// caller, `build` does not consume or reset the accumulated state
#[derive(Debug, Default)]
pub struct PropertyStoreBuilder {
    // System.AppUserModel properties
    pub relaunch_command: Option<String>,
    pub relaunch_icon_resource: Option<String>,
    pub relaunch_display_name_resource: Option<String>,
    pub app_user_model_id: Option<String>,
    pub is_dest_list_separator: Option<bool>,
    pub is_dest_list_link: Option<bool>,
    pub exclude_from_show_in_new_install: Option<bool>,
    pub prevent_pinning: Option<bool>,
    pub best_shortcut: Option<bool>,
    pub is_dual_mode: Option<bool>,
    pub start_pin_option: Option<u32>,
    pub package_relative_application_id: Option<String>,
    pub host_environment: Option<u32>,
    pub package_family_name: Option<String>,
    pub package_full_name: Option<String>,
    pub package_install_path: Option<String>,
    pub installed_by: Option<String>,
    pub record_state: Option<u32>,
    pub parent_id: Option<String>,
    pub relevance: Option<u32>,
    pub dest_list_provided_title: Option<String>,
    pub dest_list_provided_description: Option<String>,
    pub dest_list_provided_group_name: Option<String>,
    pub dest_list_logo_uri: Option<String>,
    pub toast_activator_clsid: Option<Uuid>,
    pub run_flags: Option<u32>,
    pub activation_context: Option<String>,
    pub visual_elements_manifest_hint_path: Option<String>,
    pub excluded_from_launcher: Option<bool>,
    pub feature_on_demand: Option<bool>,
    pub tile_unique_id: Option<String>,
    // System.Link properties
    pub target_parsing_path: Option<String>,
    pub link_comment: Option<String>,
    /// Raw FILETIME value
    pub date_visited: Option<u64>,
    pub feed_url: Option<String>,
    pub link_status: Option<i32>,
    pub target_sfgao_flags: Option<u32>,
    // System properties
    pub item_type_text: Option<String>,
    pub mime_type: Option<String>,
    // Single property storages
    pub target_url: Option<String>,
    pub target_extension: Option<String>,
    /// Power User Menu validation hash, see the winx module
    pub winx_hash: Option<u32>,

    named: Vec<(String, PropertyValue)>,
}

impl PropertyStoreBuilder {
    pub fn new() -> PropertyStoreBuilder {
        PropertyStoreBuilder::default()
    }

    /// Add a custom named property. Named entries serialize under the string
    /// named property format ID in insertion order
    pub fn add_named_property(&mut self, name: &str, value: PropertyValue) -> &mut Self {
        self.named.push((name.to_string(), value));
        self
    }

    pub fn add_named_string(&mut self, name: &str, value: &str) -> &mut Self {
        self.add_named_property(name, PropertyValue::UnicodeString(value.to_string()))
    }

    pub fn add_named_ansi_string(&mut self, name: &str, value: &str) -> &mut Self {
        self.add_named_property(name, PropertyValue::AnsiString(value.to_string()))
    }

    pub fn add_named_bool(&mut self, name: &str, value: bool) -> &mut Self {
        self.add_named_property(name, PropertyValue::Bool(value))
    }

    pub fn add_named_i16(&mut self, name: &str, value: i16) -> &mut Self {
        self.add_named_property(name, PropertyValue::Int16(value))
    }

    pub fn add_named_i32(&mut self, name: &str, value: i32) -> &mut Self {
        self.add_named_property(name, PropertyValue::Int32(value))
    }

    pub fn add_named_i64(&mut self, name: &str, value: i64) -> &mut Self {
        self.add_named_property(name, PropertyValue::Int64(value))
    }

    pub fn add_named_u16(&mut self, name: &str, value: u16) -> &mut Self {
        self.add_named_property(name, PropertyValue::UInt16(value))
    }

    pub fn add_named_u32(&mut self, name: &str, value: u32) -> &mut Self {
        self.add_named_property(name, PropertyValue::UInt32(value))
    }

    pub fn add_named_u64(&mut self, name: &str, value: u64) -> &mut Self {
        self.add_named_property(name, PropertyValue::UInt64(value))
    }

    pub fn add_named_filetime(&mut self, name: &str, value: u64) -> &mut Self {
        self.add_named_property(name, PropertyValue::FileTime(value))
    }

    pub fn add_named_blob(&mut self, name: &str, value: &[u8]) -> &mut Self {
        self.add_named_property(name, PropertyValue::Blob(value.to_vec()))
    }

    /// Serialize all set properties. Pure with respect to builder state
    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();

        let app_user_model = self.app_user_model_entries();
        if !app_user_model.is_empty() {
            data.extend_from_slice(&write_storage(&APP_USER_MODEL_FORMAT, &app_user_model));
        }
        let link = self.link_entries();
        if !link.is_empty() {
            data.extend_from_slice(&write_storage(&LINK_FORMAT, &link));
        }
        let system = self.system_entries();
        if !system.is_empty() {
            data.extend_from_slice(&write_storage(&SYSTEM_FORMAT, &system));
        }
        if let Some(url) = &self.target_url {
            let entries = [(
                PropertyKey::Id(2),
                PropertyValue::UnicodeString(url.clone()),
            )];
            data.extend_from_slice(&write_storage(&TARGET_URL_FORMAT, &entries));
        }
        if let Some(extension) = &self.target_extension {
            let entries = [(
                PropertyKey::Id(2),
                PropertyValue::UnicodeString(extension.clone()),
            )];
            data.extend_from_slice(&write_storage(&TARGET_EXTENSION_FORMAT, &entries));
        }
        if let Some(hash) = self.winx_hash {
            let entries = [(PropertyKey::Id(2), PropertyValue::UInt32(hash))];
            data.extend_from_slice(&write_storage(&WINX_FORMAT, &entries));
        }
        if !self.named.is_empty() {
            let entries: Vec<(PropertyKey, PropertyValue)> = self
                .named
                .iter()
                .map(|(name, value)| (PropertyKey::Name(name.clone()), value.clone()))
                .collect();
            data.extend_from_slice(&write_storage(&NAMED_PROPERTY_FORMAT, &entries));
        }

        // Terminal storage
        data.extend_from_slice(&0u32.to_le_bytes());
        data
    }

    fn app_user_model_entries(&self) -> Vec<(PropertyKey, PropertyValue)> {
        let strings = [
            (2, &self.relaunch_command),
            (3, &self.relaunch_icon_resource),
            (4, &self.relaunch_display_name_resource),
            (5, &self.app_user_model_id),
            (13, &self.package_relative_application_id),
            (15, &self.package_family_name),
            (16, &self.package_full_name),
            (17, &self.package_install_path),
            (18, &self.installed_by),
            (20, &self.parent_id),
            (22, &self.dest_list_provided_title),
            (23, &self.dest_list_provided_description),
            (24, &self.dest_list_provided_group_name),
            (25, &self.dest_list_logo_uri),
            (28, &self.activation_context),
            (29, &self.visual_elements_manifest_hint_path),
            (32, &self.tile_unique_id),
        ];
        let bools = [
            (6, self.is_dest_list_separator),
            (7, self.is_dest_list_link),
            (8, self.exclude_from_show_in_new_install),
            (9, self.prevent_pinning),
            (10, self.best_shortcut),
            (11, self.is_dual_mode),
            (30, self.excluded_from_launcher),
            (31, self.feature_on_demand),
        ];
        let numbers = [
            (12, self.start_pin_option),
            (14, self.host_environment),
            (19, self.record_state),
            (21, self.relevance),
            (27, self.run_flags),
        ];

        let mut entries = Vec::new();
        for (id, value) in strings {
            if let Some(value) = value {
                entries.push((
                    PropertyKey::Id(id),
                    PropertyValue::UnicodeString(value.clone()),
                ));
            }
        }
        for (id, value) in bools {
            if let Some(value) = value {
                entries.push((PropertyKey::Id(id), PropertyValue::Bool(value)));
            }
        }
        for (id, value) in numbers {
            if let Some(value) = value {
                entries.push((PropertyKey::Id(id), PropertyValue::UInt32(value)));
            }
        }
        if let Some(clsid) = self.toast_activator_clsid {
            entries.push((PropertyKey::Id(26), PropertyValue::Guid(clsid)));
        }
        entries.sort_by_key(|(key, _)| match key {
            PropertyKey::Id(id) => *id,
            PropertyKey::Name(_) => 0,
        });
        entries
    }

    fn link_entries(&self) -> Vec<(PropertyKey, PropertyValue)> {
        let mut entries = Vec::new();
        if let Some(path) = &self.target_parsing_path {
            entries.push((
                PropertyKey::Id(2),
                PropertyValue::UnicodeString(path.clone()),
            ));
        }
        if let Some(comment) = &self.link_comment {
            entries.push((
                PropertyKey::Id(3),
                PropertyValue::UnicodeString(comment.clone()),
            ));
        }
        if let Some(visited) = self.date_visited {
            entries.push((PropertyKey::Id(4), PropertyValue::FileTime(visited)));
        }
        if let Some(url) = &self.feed_url {
            entries.push((
                PropertyKey::Id(5),
                PropertyValue::UnicodeString(url.clone()),
            ));
        }
        if let Some(status) = self.link_status {
            entries.push((PropertyKey::Id(6), PropertyValue::Int32(status)));
        }
        if let Some(flags) = self.target_sfgao_flags {
            entries.push((PropertyKey::Id(8), PropertyValue::UInt32(flags)));
        }
        entries
    }

    fn system_entries(&self) -> Vec<(PropertyKey, PropertyValue)> {
        let mut entries = Vec::new();
        if let Some(text) = &self.item_type_text {
            entries.push((
                PropertyKey::Id(4),
                PropertyValue::UnicodeString(text.clone()),
            ));
        }
        if let Some(mime) = &self.mime_type {
            entries.push((
                PropertyKey::Id(26),
                PropertyValue::UnicodeString(mime.clone()),
            ));
        }
        entries
    }
}
