//! Reactive data layer between `backoffice-api` and UI consumers.
//!
//! - **[`ResourceStore<R>`]**: one store per resource type holding the
//!   cached records, pagination counts, a loading flag, and the last error.
//!   Every operation clears the error, calls the resource client, applies a
//!   fixed cache-update rule on success, records the message on failure,
//!   and releases its hold on the loading flag. Lists carry a sequence
//!   number so a stale page never overwrites a newer one.
//!
//! - **[`StoreStream<T>`]**: subscription handle vended by a store.
//!   Exposes shared `Arc` snapshots via `current()` / `latest()` / `changed()`.
//!
//! - **[`StoreScope`]**: scoped store lookup. A UI subtree runs inside a
//!   scope and resolves stores with [`use_store`], which fails fast when no
//!   enclosing scope provides the requested store.
//!
//! - **[`Console`]**: facade owning the four concrete stores (messages,
//!   coupons, FAQs, reviews) over one shared transport.

pub mod config;
pub mod console;
pub mod error;
pub mod scope;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, DEFAULT_API_URL};
pub use console::Console;
pub use error::CoreError;
pub use scope::{StoreScope, try_use_store, try_use_store_with, use_store, use_store_with};
pub use store::{ResourceStore, StoreState};
pub use stream::{StoreStream, StoreWatchStream};

// Resource types consumers need alongside the stores.
pub use backoffice_api::{
    Applied, Coupon, CouponCreate, CouponDiscount, CouponUpdate, Coupons, Deleted, DiscountType,
    Export, ExportFormat, Faq, FaqCreate, FaqUpdate, Faqs, ListQuery, MediaUpload, Message,
    MessageCreate, MessageStatus, MessageUpdate, Messages, Page, RecordId, Resource, Review,
    ReviewCreate, ReviewUpdate, Reviews, Saved, SortOrder,
};
