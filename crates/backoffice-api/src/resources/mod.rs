// Concrete resources
//
// Each module defines the record shape, create/update payloads, the
// `Resource` marker, and any verbs beyond CRUD.

pub mod coupon;
pub mod faq;
pub mod message;
pub mod review;
