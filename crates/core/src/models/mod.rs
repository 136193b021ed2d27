//! Marketplace entities.
//!
//! Every entity serializes with the field names used by the persisted
//! collections (camelCase, with `name_th` kept as is).

pub mod identity;
pub mod log;
pub mod order;
pub mod product;
pub mod review;
pub mod store;

pub use identity::{ADMIN_USER_ID, Identity, IdentityUpdate, MOCK_SELLER_STORE};
pub use log::{LogEntry, LogEvent, LogFilter};
pub use order::{Order, OrderItem, sort_newest_first};
pub use product::{Product, ProductInput};
pub use review::{NewReview, Review, ReviewError, average_rating};
pub use store::{StoreApplication, StoreCustomization};
