// backoffice-api: Async REST client for the admin console backend
//
// One `Transport` (base URL + bearer credential + failure normalization)
// shared by a generic `ResourceClient<R>` per resource type. Messages,
// coupons, FAQs, and reviews are `Resource` implementations, not
// separate clients.

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod query;
pub mod resource;
pub mod resources;
pub mod transport;

pub use auth::{AUTH_TOKEN_KEY, Anonymous, CredentialProvider, CredentialStore};
pub use client::{CrudApi, ResourceClient};
pub use envelope::{Deleted, Page, Saved};
pub use error::Error;
pub use query::{ListQuery, SortOrder};
pub use resource::{Operation, RecordId, Resource};
pub use resources::coupon::{
    Applied, Coupon, CouponApi, CouponCreate, CouponDiscount, CouponUpdate, Coupons, DiscountType,
};
pub use resources::faq::{Faq, FaqCreate, FaqUpdate, Faqs};
pub use resources::message::{
    Export, ExportFormat, Message, MessageApi, MessageCreate, MessageStatus, MessageUpdate,
    Messages,
};
pub use resources::review::{MediaUpload, Review, ReviewCreate, ReviewUpdate, Reviews};
pub use transport::{RawResult, Request, RequestBody, ResponseKind, TlsMode, Transport, TransportConfig};
