// FAQ entries: plain CRUD. Delete is a hard delete on the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::resource::{RecordId, Resource};
use crate::transport::RequestBody;

/// Marker for the `/faqs` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faqs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Display position within its category.
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default = "default_true", alias = "isActive")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqCreate {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "isActive")]
    pub active: Option<bool>,
}

impl Resource for Faqs {
    type Record = Faq;
    type Create = FaqCreate;
    type Update = FaqUpdate;

    const PATH: &'static str = "faqs";
    const SINGULAR: &'static str = "FAQ";
    const PLURAL: &'static str = "FAQs";

    fn id(record: &Faq) -> &RecordId {
        &record.id
    }

    fn create_body(payload: FaqCreate) -> Result<RequestBody, Error> {
        RequestBody::json(&payload)
    }
}
