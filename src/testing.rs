//! In-memory collaborators for unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::api::ResourceClient;
use crate::error::{Error, Result};
use crate::model::{Document, RemoteResource, ResourceKind};
use crate::prompt::Prompter;

/// A request the fake client received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(ResourceKind),
    Get(ResourceKind, String),
    Create(ResourceKind),
    Update(ResourceKind, String),
}

#[derive(Default)]
struct Remote {
    resources: BTreeMap<(ResourceKind, String), (RemoteResource, Value)>,
    failures: BTreeMap<(ResourceKind, String), u16>,
    created: usize,
    calls: Vec<Call>,
}

/// Postman stand-in keyed by (kind, uid).
#[derive(Default)]
pub struct FakeClient {
    remote: Mutex<Remote>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; its uid is `owner-<id>`.
    pub fn with_resource(self, kind: ResourceKind, id: &str, name: &str, body: Value) -> Self {
        let resource = RemoteResource {
            id: id.to_string(),
            name: name.to_string(),
            uid: format!("owner-{id}"),
        };
        self.remote
            .lock()
            .unwrap()
            .resources
            .insert((kind, resource.uid.clone()), (resource, body));
        self
    }

    /// Make every request for `uid` fail with `status`.
    pub fn failing(self, kind: ResourceKind, uid: &str, status: u16) -> Self {
        self.remote
            .lock()
            .unwrap()
            .failures
            .insert((kind, uid.to_string()), status);
        self
    }

    /// Replace a resource body in place.
    pub fn set_body(&self, kind: ResourceKind, uid: &str, body: Value) {
        let mut remote = self.remote.lock().unwrap();
        if let Some(entry) = remote.resources.get_mut(&(kind, uid.to_string())) {
            entry.1 = body;
        }
    }

    pub fn body(&self, kind: ResourceKind, uid: &str) -> Option<Value> {
        let remote = self.remote.lock().unwrap();
        remote
            .resources
            .get(&(kind, uid.to_string()))
            .map(|(_, body)| body.clone())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.remote.lock().unwrap().calls.clone()
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        let remote = self.remote.lock().unwrap();
        remote.resources.keys().filter(|(k, _)| *k == kind).count()
    }
}

fn summary(kind: ResourceKind, resource: &RemoteResource) -> Document {
    Document::new(json!({
        kind.wrap_key(): {"id": resource.id, "name": resource.name, "uid": resource.uid}
    }))
}

fn api_error(kind: ResourceKind, operation: &'static str, status: u16) -> Error {
    Error::Api {
        kind,
        operation,
        status,
        message: "fake".into(),
    }
}

fn body_of(kind: ResourceKind, doc: &Document) -> Value {
    doc.as_value()
        .get(kind.wrap_key())
        .cloned()
        .unwrap_or(Value::Null)
}

impl ResourceClient for FakeClient {
    async fn list(&self, kind: ResourceKind) -> Result<Vec<RemoteResource>> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::List(kind));
        Ok(remote
            .resources
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, (resource, _))| resource.clone())
            .collect())
    }

    async fn get(&self, kind: ResourceKind, uid: &str) -> Result<Document> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Get(kind, uid.to_string()));
        let key = (kind, uid.to_string());
        if let Some(status) = remote.failures.get(&key) {
            return Err(api_error(kind, "get", *status));
        }
        match remote.resources.get(&key) {
            Some((_, body)) => Ok(Document::new(json!({ kind.wrap_key(): body }))),
            None => Err(api_error(kind, "get", 404)),
        }
    }

    async fn create(&self, kind: ResourceKind, doc: &Document) -> Result<Document> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Create(kind));
        remote.created += 1;
        let id = format!("created-{}", remote.created);
        let body = body_of(kind, doc);
        let resource = RemoteResource {
            name: body
                .get("info")
                .and_then(|i| i.get("name"))
                .or_else(|| body.get("name"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            uid: format!("owner-{id}"),
            id,
        };
        let response = summary(kind, &resource);
        remote
            .resources
            .insert((kind, resource.uid.clone()), (resource, body));
        Ok(response)
    }

    async fn update(&self, kind: ResourceKind, uid: &str, doc: &Document) -> Result<Document> {
        let mut remote = self.remote.lock().unwrap();
        remote.calls.push(Call::Update(kind, uid.to_string()));
        let key = (kind, uid.to_string());
        if let Some(status) = remote.failures.get(&key) {
            return Err(api_error(kind, "update", *status));
        }
        let body = body_of(kind, doc);
        match remote.resources.get_mut(&key) {
            Some(entry) => {
                entry.1 = body;
                Ok(summary(kind, &entry.0))
            }
            None => Err(api_error(kind, "update", 404)),
        }
    }
}

/// Prompter answering from a script and recording what it was asked.
pub struct ScriptedPrompter {
    pub api_key: String,
    /// Names to pick during selection; `None` picks everything.
    pub select: Option<Vec<String>>,
    pub dirs: BTreeMap<ResourceKind, String>,
    pub confirm_import: bool,
    pub confirm_pending: bool,
    pub asked: RefCell<Vec<String>>,
}

impl Default for ScriptedPrompter {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            select: None,
            dirs: BTreeMap::new(),
            confirm_import: true,
            confirm_pending: true,
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedPrompter {
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn api_key(&self) -> Result<String> {
        self.asked.borrow_mut().push("api_key".into());
        Ok(self.api_key.clone())
    }

    fn document_dir(&self, kind: ResourceKind, default: &str) -> Result<String> {
        self.asked.borrow_mut().push(format!("dir:{kind}"));
        Ok(self
            .dirs
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    fn select_resources(
        &self,
        kind: ResourceKind,
        remotes: &[RemoteResource],
    ) -> Result<Vec<RemoteResource>> {
        self.asked.borrow_mut().push(format!("select:{kind}"));
        Ok(remotes
            .iter()
            .filter(|r| {
                self.select
                    .as_ref()
                    .is_none_or(|names| names.contains(&r.name))
            })
            .cloned()
            .collect())
    }

    fn confirm_import(&self, _names: &[(ResourceKind, String)]) -> Result<bool> {
        self.asked.borrow_mut().push("confirm_import".into());
        Ok(self.confirm_import)
    }

    fn confirm_pending_import(&self, added: &[(ResourceKind, String)]) -> Result<bool> {
        for (kind, name) in added {
            self.asked.borrow_mut().push(format!("pending:{kind}:{name}"));
        }
        self.asked.borrow_mut().push("confirm_pending".into());
        Ok(self.confirm_pending)
    }
}
