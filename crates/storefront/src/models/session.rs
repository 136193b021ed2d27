//! Session-related types.
//!
//! Everything a visitor carries between requests lives in their session: the
//! mock identity, the cart, the last placed order and a one-shot flash message.

use serde::{Deserialize, Serialize};

/// Session keys.
pub mod keys {
    /// The logged-in `Identity`.
    pub const IDENTITY: &str = "identity";

    /// The shopper's `Cart`.
    pub const CART: &str = "cart";

    /// ID of the order placed most recently in this session.
    pub const LAST_ORDER: &str = "last_order";

    /// One-shot `Flash` shown on the next rendered page.
    pub const FLASH: &str = "flash";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Success,
    Error,
}

/// A message carried across a post/redirect/get round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// CSS modifier used by the flash banner.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "flash-success",
            FlashKind::Error => "flash-error",
        }
    }
}
