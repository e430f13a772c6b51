// ── Resource-specific store operations ──
//
// Status, activation, apply, and export. Status and activation echoes
// replace the cached record; apply and export leave the cache alone.

use backoffice_api::{
    Applied, Coupon, CouponApi, Coupons, Export, ExportFormat, Message, MessageApi, MessageStatus,
    Messages, Operation, RecordId, Saved,
};

use super::ResourceStore;
use crate::error::CoreError;

impl<C: MessageApi> ResourceStore<Messages, C> {
    pub async fn set_status(
        &self,
        id: &RecordId,
        status: MessageStatus,
    ) -> Result<Saved<Message>, CoreError> {
        self.mutate(Operation::SetStatus, self.client().set_status(id, status))
            .await
    }

    /// Raw export body and content type. Saving it is up to the caller.
    pub async fn export(&self, format: ExportFormat) -> Result<Export, CoreError> {
        self.run(Operation::Export, self.client().export(format), |_, _, _| {})
            .await
    }
}

impl<C: CouponApi> ResourceStore<Coupons, C> {
    pub async fn activate(&self, id: &RecordId) -> Result<Saved<Coupon>, CoreError> {
        self.mutate(Operation::Activate, self.client().activate(id))
            .await
    }

    pub async fn deactivate(&self, id: &RecordId) -> Result<Saved<Coupon>, CoreError> {
        self.mutate(Operation::Deactivate, self.client().deactivate(id))
            .await
    }

    /// Quote a discount for `code` against `order_total`.
    pub async fn apply_coupon(&self, code: &str, order_total: f64) -> Result<Applied, CoreError> {
        self.run(
            Operation::Apply,
            self.client().apply_coupon(code, order_total),
            |_, _, _| {},
        )
        .await
    }
}
