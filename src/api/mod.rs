//! Remote resource API.
//!
//! [`ResourceClient`] is the seam between reconciliation and the network:
//! the exporter and importer are generic over it, [`PostmanClient`] talks to
//! the real API, and tests plug in an in-memory fake.

mod postman;

pub use postman::{PostmanClient, DEFAULT_API_URL};

use std::future::Future;

use crate::error::Result;
use crate::model::{Document, RemoteResource, ResourceKind};

/// List/get/create/update against a remote resource collection.
///
/// Any non-success response is an [`crate::Error::Api`] carrying the kind,
/// operation and status. Implementations never retry.
pub trait ResourceClient: Send + Sync {
    /// List every resource of `kind` visible to the credential.
    fn list(&self, kind: ResourceKind) -> impl Future<Output = Result<Vec<RemoteResource>>> + Send;

    /// Fetch one resource as a wrapped document.
    fn get(&self, kind: ResourceKind, uid: &str) -> impl Future<Output = Result<Document>> + Send;

    /// Create a resource. The returned document carries the server-assigned uid.
    fn create(
        &self,
        kind: ResourceKind,
        doc: &Document,
    ) -> impl Future<Output = Result<Document>> + Send;

    /// Overwrite an existing resource.
    fn update(
        &self,
        kind: ResourceKind,
        uid: &str,
        doc: &Document,
    ) -> impl Future<Output = Result<Document>> + Send;
}
