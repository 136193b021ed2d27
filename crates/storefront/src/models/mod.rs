//! Storefront-only models.
//!
//! Marketplace entities live in `blife-core`; this module holds what only
//! the web layer needs.

pub mod session;

pub use session::{Flash, FlashKind, keys as session_keys};
