//! # Service Layer
//!
//! - `selection`: resolver cache and the selection API
//! - `context`: composition root wiring caches, mapper and service

pub mod context;
pub mod selection;

pub use context::{GossipMembershipCache, SelectionContext};
pub use selection::SelectionService;
