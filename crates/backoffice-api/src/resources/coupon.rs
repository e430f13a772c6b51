// Discount coupons.
//
// Beyond CRUD: activation toggles (`POST /coupons/{id}/activate|deactivate`)
// and checkout-time application (`POST /coupons/apply`), which returns the
// computed discount without touching any cached record.

use std::future::Future;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{Display, EnumString};
use tracing::debug;

use crate::client::{CrudApi, ResourceClient};
use crate::envelope::{DataEnvelope, Saved};
use crate::error::Error;
use crate::resource::{Operation, RecordId, Resource};
use crate::transport::RequestBody;

/// Marker for the `/coupons` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coupons;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_order_amount: Option<f64>,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default, alias = "isActive")]
    pub active: bool,
    #[serde(default, alias = "expiresAt")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Coupon {
    /// Whether the coupon has passed its expiry date at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry <= now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponCreate {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
}

impl Resource for Coupons {
    type Record = Coupon;
    type Create = CouponCreate;
    type Update = CouponUpdate;

    const PATH: &'static str = "coupons";
    const SINGULAR: &'static str = "coupon";
    const PLURAL: &'static str = "coupons";

    fn id(record: &Coupon) -> &RecordId {
        &record.id
    }

    fn create_body(payload: CouponCreate) -> Result<RequestBody, Error> {
        RequestBody::json(&payload)
    }
}

// ── Applying a coupon ───────────────────────────────────────────────

/// Discount computed by the server for an order total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDiscount {
    pub discount: f64,
    #[serde(default)]
    pub final_total: Option<f64>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Result of `apply_coupon`.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub discount: CouponDiscount,
    pub message: Option<String>,
}

// ── Coupon-specific verbs ───────────────────────────────────────────

pub trait CouponApi: CrudApi<Coupons> {
    /// `POST /coupons/{id}/activate`
    fn activate(&self, id: &RecordId)
    -> impl Future<Output = Result<Saved<Coupon>, Error>> + Send;

    /// `POST /coupons/{id}/deactivate`
    fn deactivate(
        &self,
        id: &RecordId,
    ) -> impl Future<Output = Result<Saved<Coupon>, Error>> + Send;

    /// `POST /coupons/apply`
    fn apply_coupon(
        &self,
        code: &str,
        order_total: f64,
    ) -> impl Future<Output = Result<Applied, Error>> + Send;
}

impl CouponApi for ResourceClient<Coupons> {
    async fn activate(&self, id: &RecordId) -> Result<Saved<Coupon>, Error> {
        debug!(%id, "activating coupon");
        let request = self
            .record(Method::POST, id, Operation::Activate)
            .segment("activate");
        self.send_saved(request).await
    }

    async fn deactivate(&self, id: &RecordId) -> Result<Saved<Coupon>, Error> {
        debug!(%id, "deactivating coupon");
        let request = self
            .record(Method::POST, id, Operation::Deactivate)
            .segment("deactivate");
        self.send_saved(request).await
    }

    async fn apply_coupon(&self, code: &str, order_total: f64) -> Result<Applied, Error> {
        debug!(code, order_total, "applying coupon");
        let request = self
            .request(Method::POST, "apply", Operation::Apply)
            .body(RequestBody::json(&json!({
                "code": code,
                "orderTotal": order_total,
            }))?);
        let env: DataEnvelope<CouponDiscount> = self.send(request).await?;
        Ok(Applied {
            discount: env.data,
            message: env.message,
        })
    }
}
