//! Mapping state: which names are tracked, and which remote uid each maps to.
//!
//! Two files hold the state:
//! - **Public** (`postmgn.config`, committed): document directories and the
//!   ordered list of tracked names per kind.
//! - **Private** (`postmgn.private.config`, ignored): the API key and the
//!   name → uid map per kind. Uids are account specific, so teammates each
//!   keep their own.
//!
//! A third, read-only **legacy** file (`personal.json`) is the single-file
//! predecessor and is only read to migrate from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::gitignore::ensure_ignored;
use crate::error::{Error, Result};
use crate::model::ResourceKind;
use crate::sync::{atomic_write, atomic_write_private, read_json_if_exists, to_pretty_json};

/// Private config file name.
pub const PRIVATE_FILE: &str = "postmgn.private.config";

/// Public config file name.
pub const PUBLIC_FILE: &str = "postmgn.config";

/// Legacy single-file config name.
pub const LEGACY_FILE: &str = "personal.json";

/// Contents of the private config.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateConfig {
    /// Postman API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Collection name → uid.
    #[serde(default)]
    pub collections: BTreeMap<String, String>,
    /// Environment name → uid.
    #[serde(default)]
    pub environments: BTreeMap<String, String>,
}

impl PrivateConfig {
    fn map(&self, kind: ResourceKind) -> &BTreeMap<String, String> {
        match kind {
            ResourceKind::Collection => &self.collections,
            ResourceKind::Environment => &self.environments,
        }
    }

    fn map_mut(&mut self, kind: ResourceKind) -> &mut BTreeMap<String, String> {
        match kind {
            ResourceKind::Collection => &mut self.collections,
            ResourceKind::Environment => &mut self.environments,
        }
    }

    fn has_mappings(&self) -> bool {
        !self.collections.is_empty() || !self.environments.is_empty()
    }
}

/// Contents of the public config.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    /// Directory for collection documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_path: Option<String>,
    /// Directory for environment documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_path: Option<String>,
    /// Tracked collection names, in insertion order.
    #[serde(default)]
    pub collections: Vec<String>,
    /// Tracked environment names, in insertion order.
    #[serde(default)]
    pub environments: Vec<String>,
}

impl PublicConfig {
    fn list(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Collection => &self.collections,
            ResourceKind::Environment => &self.environments,
        }
    }

    fn list_mut(&mut self, kind: ResourceKind) -> &mut Vec<String> {
        match kind {
            ResourceKind::Collection => &mut self.collections,
            ResourceKind::Environment => &mut self.environments,
        }
    }
}

/// Contents of the legacy `personal.json`.
///
/// Maps are kept as JSON objects so their file order survives migration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyConfig {
    /// Postman API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Collection name → uid.
    #[serde(default)]
    pub collections: serde_json::Map<String, serde_json::Value>,
    /// Environment name → uid.
    #[serde(default)]
    pub environments: serde_json::Map<String, serde_json::Value>,
}

impl LegacyConfig {
    fn map(&self, kind: ResourceKind) -> &serde_json::Map<String, serde_json::Value> {
        match kind {
            ResourceKind::Collection => &self.collections,
            ResourceKind::Environment => &self.environments,
        }
    }

    /// A legacy config counts as present once it carries an API key.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// In-memory mapping state for one project directory.
///
/// Loaded once at startup, mutated during a single action, and flushed with
/// [`MappingState::save`] at the end of a successful action.
#[derive(Debug, Clone)]
pub struct MappingState {
    root: PathBuf,
    private: PrivateConfig,
    public: PublicConfig,
    legacy: LegacyConfig,
    dirty: bool,
}

impl MappingState {
    /// Load state from `root`. Missing files load as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but is unreadable or malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let private = load_file(&root.join(PRIVATE_FILE))?;
        let public = load_file(&root.join(PUBLIC_FILE))?;
        let legacy = load_file(&root.join(LEGACY_FILE))?;
        debug!(root = %root.display(), "Loaded mapping state");

        Ok(Self::from_parts(root, private, public, legacy))
    }

    /// Build state from already-parsed parts.
    #[must_use]
    pub fn from_parts(
        root: &Path,
        private: PrivateConfig,
        public: PublicConfig,
        legacy: LegacyConfig,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            private,
            public,
            legacy,
            dirty: false,
        }
    }

    /// Persist both files.
    ///
    /// The private file is only written after the ignore file is confirmed
    /// (or made) to list it.
    ///
    /// # Errors
    ///
    /// Returns an error if the ignore file cannot be updated or either
    /// config file cannot be written.
    pub fn save(&mut self) -> Result<()> {
        ensure_ignored(&self.root, PRIVATE_FILE)?;

        let private_path = self.private_path();
        atomic_write_private(&private_path, &to_pretty_json(&self.private)?)?;
        info!(path = %private_path.display(), "Saved private config");

        let public_path = self.public_path();
        atomic_write(&public_path, &to_pretty_json(&self.public)?)?;
        info!(path = %public_path.display(), "Saved public config");

        self.dirty = false;
        Ok(())
    }

    /// Whether anything changed since the last load or save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Project root the files live in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the private config.
    #[must_use]
    pub fn private_path(&self) -> PathBuf {
        self.root.join(PRIVATE_FILE)
    }

    /// Path of the public config.
    #[must_use]
    pub fn public_path(&self) -> PathBuf {
        self.root.join(PUBLIC_FILE)
    }

    /// Path of the legacy config.
    #[must_use]
    pub fn legacy_path(&self) -> PathBuf {
        self.root.join(LEGACY_FILE)
    }

    /// The API key stored in the private config, if any.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.private.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Store an API key in the private config.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.private.api_key = Some(api_key.into());
        self.dirty = true;
    }

    /// Document directory for `kind`, relative to the root.
    #[must_use]
    pub fn document_dir(&self, kind: ResourceKind) -> &str {
        let configured = match kind {
            ResourceKind::Collection => self.public.collection_path.as_deref(),
            ResourceKind::Environment => self.public.environment_path.as_deref(),
        };
        configured
            .filter(|p| !p.is_empty())
            .unwrap_or(kind.default_dir())
    }

    /// Set the document directory for `kind`.
    pub fn set_document_dir(&mut self, kind: ResourceKind, dir: impl Into<String>) {
        let dir = Some(dir.into());
        match kind {
            ResourceKind::Collection => self.public.collection_path = dir,
            ResourceKind::Environment => self.public.environment_path = dir,
        }
        self.dirty = true;
    }

    /// Tracked names of `kind`, in list order.
    #[must_use]
    pub fn tracked_names(&self, kind: ResourceKind) -> &[String] {
        self.public.list(kind)
    }

    /// Name → uid map of `kind`.
    #[must_use]
    pub fn mapping(&self, kind: ResourceKind) -> &BTreeMap<String, String> {
        self.private.map(kind)
    }

    /// The remote uid linked to `name`, if any.
    #[must_use]
    pub fn uid_for(&self, kind: ResourceKind, name: &str) -> Option<&str> {
        self.private
            .map(kind)
            .get(name)
            .map(String::as_str)
            .filter(|uid| !uid.is_empty())
    }

    /// Link `name` to `uid`, tracking the name if it is not tracked yet.
    ///
    /// An existing link for the name is replaced.
    pub fn record_link(&mut self, kind: ResourceKind, name: &str, uid: &str) {
        let list = self.public.list_mut(kind);
        if !list.iter().any(|n| n == name) {
            list.push(name.to_string());
        }
        self.private
            .map_mut(kind)
            .insert(name.to_string(), uid.to_string());
        self.dirty = true;
        debug!(%kind, name, uid, "Recorded link");
    }

    /// True when no names are tracked for any kind.
    #[must_use]
    pub fn is_untracked(&self) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|kind| self.public.list(*kind).is_empty())
    }

    /// Whether a legacy config is available to migrate from.
    #[must_use]
    pub fn has_legacy(&self) -> bool {
        self.legacy.is_present()
    }

    /// API key of the legacy config, if it has one.
    #[must_use]
    pub fn legacy_api_key(&self) -> Option<&str> {
        self.legacy.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Convert the legacy flat config into the public/private split.
    ///
    /// Tracked lists take the legacy names (in file order) and the private
    /// map takes the legacy uids. Entries are read as name → uid, except
    /// uid-keyed entries written by older tools, which are flipped. The
    /// private API key wins over the
    /// legacy one when both are set. Returns `false` when nothing was
    /// migrated because names are already tracked or no legacy config exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousState`] if the private config already holds
    /// mappings of its own.
    pub fn migrate_legacy(&mut self) -> Result<bool> {
        if !self.is_untracked() || !self.has_legacy() {
            return Ok(false);
        }
        if self.private.has_mappings() {
            return Err(Error::AmbiguousState {
                legacy: self.legacy_path(),
                private: self.private_path(),
            });
        }

        if self.api_key().is_none() {
            self.private.api_key.clone_from(&self.legacy.api_key);
        }

        for kind in ResourceKind::ALL {
            let entries: Vec<(String, String)> = self
                .legacy
                .map(kind)
                .iter()
                .filter_map(|(key, value)| value.as_str().map(|value| legacy_entry(key, value)))
                .collect();
            for (name, uid) in entries {
                self.record_link(kind, &name, &uid);
            }
        }

        self.dirty = true;
        info!(
            collections = self.public.collections.len(),
            environments = self.public.environments.len(),
            "Migrated legacy config"
        );
        Ok(true)
    }
}

/// Orient one legacy entry as (name, uid).
///
/// Older tools wrote uid → name; an entry whose key is a Postman uid and
/// whose value is not gets flipped. Everything else reads as name → uid.
fn legacy_entry(key: &str, value: &str) -> (String, String) {
    if is_postman_uid(key) && !is_postman_uid(value) {
        (value.to_string(), key.to_string())
    } else {
        (key.to_string(), value.to_string())
    }
}

/// Whether `s` has the `<owner id>-<uuid>` shape of a Postman uid.
fn is_postman_uid(s: &str) -> bool {
    let Some((owner, uuid)) = s.split_once('-') else {
        return false;
    };
    if owner.is_empty() || !owner.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let groups: Vec<&str> = uuid.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn load_file<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T> {
    read_json_if_exists(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))
        .map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn empty_state(root: &Path) -> MappingState {
        MappingState::from_parts(
            root,
            PrivateConfig::default(),
            PublicConfig::default(),
            LegacyConfig::default(),
        )
    }

    fn legacy_from(value: serde_json::Value) -> LegacyConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_load_missing_files_is_empty() {
        let temp = TempDir::new().unwrap();
        let state = MappingState::load(temp.path()).unwrap();

        assert!(state.is_untracked());
        assert!(state.api_key().is_none());
        assert!(!state.has_legacy());
        assert_eq!(state.document_dir(ResourceKind::Collection), "collections");
        assert_eq!(state.document_dir(ResourceKind::Environment), "environments");
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PUBLIC_FILE), "[1, 2").unwrap();

        let result = MappingState::load(temp.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_record_link_tracks_once_and_replaces_uid() {
        let temp = TempDir::new().unwrap();
        let mut state = empty_state(temp.path());

        state.record_link(ResourceKind::Collection, "orders", "uid-1");
        state.record_link(ResourceKind::Collection, "orders", "uid-2");

        assert_eq!(state.tracked_names(ResourceKind::Collection), ["orders"]);
        assert_eq!(state.uid_for(ResourceKind::Collection, "orders"), Some("uid-2"));
        assert!(state.uid_for(ResourceKind::Environment, "orders").is_none());
        assert!(state.is_dirty());
    }

    #[test]
    fn test_save_writes_ignore_entry_and_both_files() {
        let temp = TempDir::new().unwrap();
        let mut state = empty_state(temp.path());
        state.set_api_key("PMAK-1");
        state.record_link(ResourceKind::Environment, "dev", "uid-9");

        state.save().unwrap();

        let ignore = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert!(ignore.lines().any(|l| l == PRIVATE_FILE));

        let private: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.path().join(PRIVATE_FILE)).unwrap()).unwrap();
        assert_eq!(private["apiKey"], "PMAK-1");
        assert_eq!(private["environments"]["dev"], "uid-9");

        let public: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp.path().join(PUBLIC_FILE)).unwrap()).unwrap();
        assert_eq!(public["environments"], json!(["dev"]));
        assert!(public.get("apiKey").is_none());
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_save_refuses_when_ignore_file_unusable() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".gitignore")).unwrap();
        let mut state = empty_state(temp.path());
        state.set_api_key("PMAK-1");

        let result = state.save();

        assert!(matches!(result, Err(Error::IgnoreFile { .. })));
        assert!(!temp.path().join(PRIVATE_FILE).exists());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let mut state = empty_state(temp.path());
        state.set_document_dir(ResourceKind::Collection, "postman/collections");
        state.record_link(ResourceKind::Collection, "b", "uid-b");
        state.record_link(ResourceKind::Collection, "a", "uid-a");
        state.save().unwrap();

        let loaded = MappingState::load(temp.path()).unwrap();
        assert_eq!(loaded.tracked_names(ResourceKind::Collection), ["b", "a"]);
        assert_eq!(loaded.uid_for(ResourceKind::Collection, "a"), Some("uid-a"));
        assert_eq!(loaded.document_dir(ResourceKind::Collection), "postman/collections");
    }

    #[test]
    fn test_migrate_legacy() {
        let temp = TempDir::new().unwrap();
        let legacy = legacy_from(json!({"apiKey": "k", "collections": {"foo": "uid1"}}));
        let mut state =
            MappingState::from_parts(temp.path(), PrivateConfig::default(), PublicConfig::default(), legacy);

        assert!(state.migrate_legacy().unwrap());

        assert_eq!(state.tracked_names(ResourceKind::Collection), ["foo"]);
        assert_eq!(state.uid_for(ResourceKind::Collection, "foo"), Some("uid1"));
        assert!(state.tracked_names(ResourceKind::Environment).is_empty());
        assert_eq!(state.api_key(), Some("k"));
    }

    #[test]
    fn test_migrate_legacy_flips_uid_keyed_entries() {
        let temp = TempDir::new().unwrap();
        let legacy = legacy_from(json!({
            "apiKey": "k",
            "collections": {"1234-0c0ffee0-aaaa-bbbb-cccc-000000000001": "orders"},
            "environments": {"dev": "1234-0c0ffee0-aaaa-bbbb-cccc-000000000002"}
        }));
        let mut state =
            MappingState::from_parts(temp.path(), PrivateConfig::default(), PublicConfig::default(), legacy);

        state.migrate_legacy().unwrap();

        assert_eq!(state.tracked_names(ResourceKind::Collection), ["orders"]);
        assert_eq!(
            state.uid_for(ResourceKind::Collection, "orders"),
            Some("1234-0c0ffee0-aaaa-bbbb-cccc-000000000001")
        );
        assert_eq!(state.tracked_names(ResourceKind::Environment), ["dev"]);
        assert_eq!(
            state.uid_for(ResourceKind::Environment, "dev"),
            Some("1234-0c0ffee0-aaaa-bbbb-cccc-000000000002")
        );
    }

    #[test]
    fn test_is_postman_uid() {
        assert!(is_postman_uid("1234-0c0ffee0-aaaa-bbbb-cccc-000000000001"));
        assert!(!is_postman_uid("orders"));
        assert!(!is_postman_uid("uid1"));
        assert!(!is_postman_uid("x1-0c0ffee0-aaaa-bbbb-cccc-000000000001"));
        assert!(!is_postman_uid("1234-0c0ffee0-aaaa-bbbb-cccc"));
    }

    #[test]
    fn test_migrate_legacy_keeps_file_order() {
        let temp = TempDir::new().unwrap();
        let legacy: LegacyConfig =
            serde_json::from_str(r#"{"apiKey":"k","environments":{"zeta":"u1","alpha":"u2"}}"#).unwrap();
        let mut state =
            MappingState::from_parts(temp.path(), PrivateConfig::default(), PublicConfig::default(), legacy);

        state.migrate_legacy().unwrap();

        assert_eq!(state.tracked_names(ResourceKind::Environment), ["zeta", "alpha"]);
    }

    #[test]
    fn test_migrate_skipped_when_already_tracked() {
        let temp = TempDir::new().unwrap();
        let legacy = legacy_from(json!({"apiKey": "k", "collections": {"old": "uid0"}}));
        let public = PublicConfig {
            collections: vec!["new".into()],
            ..PublicConfig::default()
        };
        let mut state = MappingState::from_parts(temp.path(), PrivateConfig::default(), public, legacy);

        assert!(!state.migrate_legacy().unwrap());
        assert_eq!(state.tracked_names(ResourceKind::Collection), ["new"]);
    }

    #[test]
    fn test_migrate_ambiguous_when_private_has_mappings() {
        let temp = TempDir::new().unwrap();
        let legacy = legacy_from(json!({"apiKey": "k", "collections": {"foo": "uid1"}}));
        let private = PrivateConfig {
            collections: BTreeMap::from([("bar".to_string(), "uid2".to_string())]),
            ..PrivateConfig::default()
        };
        let mut state = MappingState::from_parts(temp.path(), private, PublicConfig::default(), legacy);

        let result = state.migrate_legacy();
        assert!(matches!(result, Err(Error::AmbiguousState { .. })));
    }

    #[test]
    fn test_private_key_wins_over_legacy_key() {
        let temp = TempDir::new().unwrap();
        let legacy = legacy_from(json!({"apiKey": "old", "collections": {"foo": "uid1"}}));
        let private = PrivateConfig {
            api_key: Some("new".into()),
            ..PrivateConfig::default()
        };
        let mut state = MappingState::from_parts(temp.path(), private, PublicConfig::default(), legacy);

        state.migrate_legacy().unwrap();
        assert_eq!(state.api_key(), Some("new"));
    }
}
