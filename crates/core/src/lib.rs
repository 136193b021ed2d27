//! Blife Healthy Core - Shared types and marketplace rules.
//!
//! This crate provides the types and pure logic used across all Blife Healthy
//! components:
//! - `storefront` - The server-rendered marketplace (customers, sellers, admins)
//! - `cli` - Operator commands for seeding and inspecting the data directory
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP. Anything that needs the current time or a fresh ID takes
//! it as an argument.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`models`] - Marketplace entities (identity, store, product, order, review, log)
//! - [`cart`] - Session-local shopping cart
//! - [`routing`] - Role-gated view resolution
//! - [`analytics`] - Seller revenue summaries
//! - [`commission`] - Seller commission ledger
//! - [`fixtures`] - The default dataset

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod commission;
pub mod fixtures;
pub mod models;
pub mod routing;
pub mod types;

pub use cart::{Cart, CartItem};
pub use models::*;
pub use routing::{Layout, Resolution, View, resolve, resolve_settled};
pub use types::*;
