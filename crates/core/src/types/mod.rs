//! Core value types for the marketplace.
//!
//! This module provides type-safe wrappers for IDs, emails, prices and the
//! role/lifecycle enums shared by every entity.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::*;
