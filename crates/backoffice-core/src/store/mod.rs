// ── Resource stores ──
//
// Cached records plus loading/error/pagination bookkeeping, one store per
// resource type.

mod resource_store;
mod state;
mod verbs;

pub use resource_store::ResourceStore;
pub use state::StoreState;
