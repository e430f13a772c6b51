// Product reviews.
//
// Creation is `multipart/form-data` so customers can attach photos;
// moderation (`isApproved`) goes through the regular JSON update.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::resource::{RecordId, Resource};
use crate::transport::RequestBody;

/// Marker for the `/reviews` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reviews;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub product_id: Option<RecordId>,
    #[serde(alias = "author")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_approved: bool,
    /// URLs of attached media, as stored by the server.
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A file attached to a new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCreate {
    pub product_id: Option<RecordId>,
    pub name: String,
    pub email: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub media: Vec<MediaUpload>,
}

impl ReviewCreate {
    /// Text fields in the order they are written to the form.
    fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(5);
        if let Some(product_id) = &self.product_id {
            fields.push(("productId", product_id.to_string()));
        }
        fields.push(("name", self.name.clone()));
        if let Some(email) = &self.email {
            fields.push(("email", email.clone()));
        }
        fields.push(("rating", self.rating.to_string()));
        fields.push(("comment", self.comment.clone()));
        fields
    }

    fn into_form(self) -> Result<Form, Error> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }
        for upload in self.media {
            let part = Part::bytes(upload.bytes.to_vec())
                .file_name(upload.file_name)
                .mime_str(&upload.content_type)
                .map_err(|e| Error::request_failed(format!("invalid media type: {e}")))?;
            form = form.part("media", part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ReviewUpdate {
    pub fn approve(approved: bool) -> Self {
        Self {
            is_approved: Some(approved),
            ..Self::default()
        }
    }
}

impl Resource for Reviews {
    type Record = Review;
    type Create = ReviewCreate;
    type Update = ReviewUpdate;

    const PATH: &'static str = "reviews";
    const SINGULAR: &'static str = "review";
    const PLURAL: &'static str = "reviews";

    fn id(record: &Review) -> &RecordId {
        &record.id
    }

    fn create_body(payload: ReviewCreate) -> Result<RequestBody, Error> {
        payload.into_form().map(RequestBody::Multipart)
    }
}
