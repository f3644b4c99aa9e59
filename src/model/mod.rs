//! Data models for postmgn.
//!
//! This module contains the domain types shared by every layer:
//! - ResourceKind (closed set of synced resource types)
//! - RemoteResource (one entry of a remote listing)
//! - Document (a JSON document as stored on disk and sent to the API)

pub mod document;
pub mod kind;

pub use document::{tracked_name, Document, RemoteResource};
pub use kind::ResourceKind;
