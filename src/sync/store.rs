//! Local document store.
//!
//! Documents live at `<root>/<kind dir>/<tracked name>.json`, one file per
//! tracked resource, always wrapped as `{ <wrap_key>: <body> }`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::MappingState;
use crate::error::{Error, Result};
use crate::model::{Document, ResourceKind};
use crate::sync::file::{atomic_write, to_pretty_json};
use crate::sync::hash::{content_hash, has_changed};
use crate::sync::types::WriteOutcome;

const DOCUMENT_EXT: &str = "json";

/// Reads and writes tracked documents under the project directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    collection_dir: PathBuf,
    environment_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root` with the given per-kind directories.
    ///
    /// Relative directories are resolved against `root`.
    #[must_use]
    pub fn new(root: &Path, collection_dir: impl AsRef<Path>, environment_dir: impl AsRef<Path>) -> Self {
        Self {
            collection_dir: root.join(collection_dir),
            environment_dir: root.join(environment_dir),
        }
    }

    /// Create a store using the document directories configured in `state`.
    #[must_use]
    pub fn from_state(state: &MappingState) -> Self {
        Self::new(
            state.root(),
            state.document_dir(ResourceKind::Collection),
            state.document_dir(ResourceKind::Environment),
        )
    }

    /// Directory holding documents of `kind`.
    #[must_use]
    pub fn dir(&self, kind: ResourceKind) -> &Path {
        match kind {
            ResourceKind::Collection => &self.collection_dir,
            ResourceKind::Environment => &self.environment_dir,
        }
    }

    /// File path for a tracked name.
    #[must_use]
    pub fn path_for(&self, kind: ResourceKind, name: &str) -> PathBuf {
        self.dir(kind).join(format!("{name}.{DOCUMENT_EXT}"))
    }

    /// List the names of all documents of `kind`, sorted.
    ///
    /// A missing directory lists as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn list(&self, kind: ResourceKind) -> Result<Vec<String>> {
        let dir = self.dir(kind);
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXT) || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read the document for `name`.
    ///
    /// A bare document (not under the kind's wrap key) is wrapped and the
    /// file rewritten, so every later read and export sees the same shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the file is absent, or an I/O or JSON
    /// error if it cannot be read or parsed.
    pub fn read(&self, kind: ResourceKind, name: &str) -> Result<Document> {
        let path = self.path_for(kind, name);
        debug!(%kind, name, path = %path.display(), "Reading document");

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound {
                    kind,
                    name: name.to_string(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let doc = Document::new(serde_json::from_slice(&bytes)?);
        let (doc, wrapped) = doc.into_wrapped(kind);
        if wrapped {
            atomic_write(&path, &to_pretty_json(&doc)?)?;
            info!(%kind, name, "Wrapped bare document under `{}`", kind.wrap_key());
        }
        Ok(doc)
    }

    /// Write the document for `name`.
    ///
    /// The file is replaced atomically, and left untouched when its content
    /// would not change.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be rendered or written.
    pub fn write(&self, kind: ResourceKind, name: &str, doc: &Document) -> Result<WriteOutcome> {
        let path = self.path_for(kind, name);
        let rendered = to_pretty_json(doc)?;

        let existing = match fs::read(&path) {
            Ok(bytes) => Some(content_hash(&bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if !has_changed(&content_hash(&rendered), existing.as_deref()) {
            debug!(%kind, name, "Document unchanged");
            return Ok(WriteOutcome::Unchanged);
        }

        debug!(%kind, name, path = %path.display(), "Writing document");
        atomic_write(&path, &rendered)?;
        Ok(WriteOutcome::Written)
    }

    /// Create both document directories if missing.
    ///
    /// A freshly created directory gets a `README.md` explaining what goes in it.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or README cannot be created.
    pub fn ensure_directories(&self) -> Result<()> {
        for kind in ResourceKind::ALL {
            let dir = self.dir(kind);
            if dir.is_dir() {
                continue;
            }
            fs::create_dir_all(dir)?;
            fs::write(dir.join("README.md"), readme_content(kind))?;
            info!(%kind, path = %dir.display(), "Created document directory");
        }
        Ok(())
    }
}

fn readme_content(kind: ResourceKind) -> String {
    format!(
        "Put your {kind} json in this folder, list its file name (without `.json`) \
         under `{}` in postmgn.config, and then `postmgn import`\n",
        kind.plural()
    )
}
