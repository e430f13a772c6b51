// Support messages submitted through the contact form.
//
// Beyond CRUD: `PATCH /contact/{id}/status` and
// `GET /contact/export?format=csv|excel`. The export endpoint answers with
// a file body on success and a JSON error envelope on failure, so it is
// requested as binary and the transport branches on content type.

use std::future::Future;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{Display, EnumString};
use tracing::debug;

use crate::client::{CrudApi, ResourceClient};
use crate::envelope::Saved;
use crate::error::Error;
use crate::resource::{Operation, RecordId, Resource};
use crate::transport::{RawResult, RequestBody, ResponseKind};

/// Marker for the `/contact` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages;

/// Triage state of a support message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MessageStatus {
    #[default]
    New,
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCreate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MessageStatus>,
    /// Internal admin notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Resource for Messages {
    type Record = Message;
    type Create = MessageCreate;
    type Update = MessageUpdate;

    const PATH: &'static str = "contact";
    const SINGULAR: &'static str = "message";
    const PLURAL: &'static str = "messages";

    fn id(record: &Message) -> &RecordId {
        &record.id
    }

    fn create_body(payload: MessageCreate) -> Result<RequestBody, Error> {
        RequestBody::json(&payload)
    }
}

// ── Export ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xls",
        }
    }
}

/// A downloaded export. Saving it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub format: ExportFormat,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Export {
    /// Suggested file name (`messages.csv`, `messages.xls`).
    pub fn file_name(&self) -> String {
        format!("{}.{}", Messages::PLURAL, self.format.extension())
    }
}

// ── Message-specific verbs ──────────────────────────────────────────

pub trait MessageApi: CrudApi<Messages> {
    /// `PATCH /contact/{id}/status`
    fn set_status(
        &self,
        id: &RecordId,
        status: MessageStatus,
    ) -> impl Future<Output = Result<Saved<Message>, Error>> + Send;

    /// `GET /contact/export?format=...`
    fn export(&self, format: ExportFormat) -> impl Future<Output = Result<Export, Error>> + Send;
}

impl MessageApi for ResourceClient<Messages> {
    async fn set_status(&self, id: &RecordId, status: MessageStatus) -> Result<Saved<Message>, Error> {
        debug!(%id, %status, "updating message status");
        let request = self
            .record(Method::PATCH, id, Operation::SetStatus)
            .segment("status")
            .body(RequestBody::json(&json!({ "status": status }))?);
        self.send_saved(request).await
    }

    async fn export(&self, format: ExportFormat) -> Result<Export, Error> {
        debug!(%format, "exporting messages");
        let request = self
            .request(Method::GET, "export", Operation::Export)
            .query(&[("format".to_owned(), format.to_string())])
            .kind(ResponseKind::Binary);

        match self.send_raw(request).await? {
            RawResult::Binary {
                bytes,
                content_type,
            } => Ok(Export {
                format,
                content_type,
                bytes,
            }),
            RawResult::Json(_) => Err(Error::request_failed(
                Operation::Export.fallback_message::<Messages>(),
            )),
        }
    }
}
