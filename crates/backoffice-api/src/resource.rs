// ── Resource identity ──
//
// `Resource` describes one managed entity type: where it lives, how its
// records are identified, and how its payloads are encoded. The four
// concrete resources are configuration on top of one generic client.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::transport::RequestBody;

// ── RecordId ────────────────────────────────────────────────────────

/// Server-assigned record identifier.
///
/// Backends hand these out as strings (ObjectIds, UUIDs) or integers;
/// both normalize to the string form used in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

// ── Resource ────────────────────────────────────────────────────────

/// A managed entity type.
///
/// Implemented by zero-sized marker types (`Messages`, `Coupons`, ...).
pub trait Resource: Send + Sync + 'static {
    /// The record as the server returns it.
    type Record: DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static;
    /// Payload for `create`.
    type Create: Send + 'static;
    /// Payload for `update` (full or partial, per resource).
    type Update: Serialize + fmt::Debug + Send + Sync + 'static;

    /// Sub-path under the API base (`"coupons"`).
    const PATH: &'static str;
    /// Singular noun used in failure messages (`"coupon"`).
    const SINGULAR: &'static str;
    /// Plural noun used in failure messages (`"coupons"`).
    const PLURAL: &'static str;

    fn id(record: &Self::Record) -> &RecordId;

    /// Encode a create payload. Most resources send JSON.
    fn create_body(payload: Self::Create) -> Result<RequestBody, Error>;
}

// ── Operation ───────────────────────────────────────────────────────

/// Every call a client can make, used to pick the fallback failure
/// message when the server does not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    SetStatus,
    Activate,
    Deactivate,
    Apply,
    Export,
}

impl Operation {
    /// `"Failed to {verb} {noun}."`
    pub fn fallback_message<R: Resource>(self) -> String {
        match self {
            Self::List => format!("Failed to fetch {}.", R::PLURAL),
            Self::Get => format!("Failed to fetch {}.", R::SINGULAR),
            Self::Create => format!("Failed to create {}.", R::SINGULAR),
            Self::Update => format!("Failed to update {}.", R::SINGULAR),
            Self::Delete => format!("Failed to delete {}.", R::SINGULAR),
            Self::SetStatus => format!("Failed to update {} status.", R::SINGULAR),
            Self::Activate => format!("Failed to activate {}.", R::SINGULAR),
            Self::Deactivate => format!("Failed to deactivate {}.", R::SINGULAR),
            Self::Apply => format!("Failed to apply {}.", R::SINGULAR),
            Self::Export => format!("Failed to export {}.", R::PLURAL),
        }
    }
}
