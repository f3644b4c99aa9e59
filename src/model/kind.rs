//! Resource kinds synced by postmgn.
//!
//! Every kind-dependent constant (API path, response keys, default local
//! directory) lives in one table so adding a kind is a compile error until
//! each match is extended.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A type of Postman resource that can be tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A request collection.
    Collection,
    /// A variable environment.
    Environment,
}

/// Per-kind constants.
#[derive(Debug, Clone, Copy)]
struct KindConsts {
    api_path: &'static str,
    plural: &'static str,
    wrap_key: &'static str,
    default_dir: &'static str,
}

const COLLECTION: KindConsts = KindConsts {
    api_path: "/collections",
    plural: "collections",
    wrap_key: "collection",
    default_dir: "collections",
};

const ENVIRONMENT: KindConsts = KindConsts {
    api_path: "/environments",
    plural: "environments",
    wrap_key: "environment",
    default_dir: "environments",
};

impl ResourceKind {
    /// All kinds in processing order. Collections always come first.
    pub const ALL: [Self; 2] = [Self::Collection, Self::Environment];

    const fn consts(self) -> &'static KindConsts {
        match self {
            Self::Collection => &COLLECTION,
            Self::Environment => &ENVIRONMENT,
        }
    }

    /// API path segment, e.g. `/collections`.
    #[must_use]
    pub const fn api_path(self) -> &'static str {
        self.consts().api_path
    }

    /// Plural key used by list responses and the config files.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        self.consts().plural
    }

    /// Key a single resource body is wrapped under.
    #[must_use]
    pub const fn wrap_key(self) -> &'static str {
        self.consts().wrap_key
    }

    /// Local directory used when the public config does not name one.
    #[must_use]
    pub const fn default_dir(self) -> &'static str {
        self.consts().default_dir
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wrap_key())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collection" | "collections" => Ok(Self::Collection),
            "environment" | "environments" => Ok(Self::Environment),
            _ => Err(Error::InvalidArgument(format!("Unknown resource kind: {s}"))),
        }
    }
}
