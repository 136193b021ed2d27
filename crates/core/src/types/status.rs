//! Role and lifecycle enums.
//!
//! Wire names match the persisted collections: roles and seller/store
//! statuses are `SCREAMING_CASE`, order item statuses and log sources are
//! `PascalCase`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a status string from a form or query is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Generates `as_str`, `ALL`, `Display` and `FromStr` for a fieldless enum
/// from a single name table.
macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire name of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

/// Marketplace role of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Seller,
    Admin,
}

wire_enum!(UserRole, "user role", {
    Customer => "CUSTOMER",
    Seller => "SELLER",
    Admin => "ADMIN",
});

/// Where a user is in the seller application lifecycle.
///
/// `None → Pending → Approved | Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellerStatus {
    #[default]
    None,
    Pending,
    Approved,
    Rejected,
}

wire_enum!(SellerStatus, "seller status", {
    None => "NONE",
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

/// Review state of a store application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

wire_enum!(StoreStatus, "store status", {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

impl StoreStatus {
    /// The role and seller status the store owner ends up with when an
    /// administrator moves the application to this status.
    #[must_use]
    pub const fn owner_standing(self) -> (UserRole, SellerStatus) {
        match self {
            Self::Approved => (UserRole::Seller, SellerStatus::Approved),
            Self::Rejected => (UserRole::Customer, SellerStatus::Rejected),
            Self::Pending => (UserRole::Customer, SellerStatus::Pending),
        }
    }
}

/// Per-line fulfillment stage of an order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderItemStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
}

wire_enum!(OrderItemStatus, "order item status", {
    Processing => "Processing",
    Shipped => "Shipped",
    Delivered => "Delivered",
});

/// Severity of a marketplace log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

wire_enum!(LogLevel, "log level", {
    Info => "INFO",
    Warn => "WARN",
    Error => "ERROR",
});

/// Subsystem that produced a marketplace log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogSource {
    Auth,
    Product,
    Order,
    Store,
    General,
}

wire_enum!(LogSource, "log source", {
    Auth => "Auth",
    Product => "Product",
    Order => "Order",
    Store => "Store",
    General => "General",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for role in UserRole::ALL {
            let json = serde_json::to_string(role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
        }
        for status in OrderItemStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
        for level in LogLevel::ALL {
            let json = serde_json::to_string(level).unwrap();
            assert_eq!(json, format!("\"{level}\""));
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!("SELLER".parse::<UserRole>().unwrap(), UserRole::Seller);
        let err = "seller".parse::<UserRole>().unwrap_err();
        assert_eq!(err.to_string(), "invalid user role: seller");
    }

    #[test]
    fn test_owner_standing_follows_store_status() {
        assert_eq!(
            StoreStatus::Approved.owner_standing(),
            (UserRole::Seller, SellerStatus::Approved)
        );
        assert_eq!(
            StoreStatus::Rejected.owner_standing(),
            (UserRole::Customer, SellerStatus::Rejected)
        );
        assert_eq!(
            StoreStatus::Pending.owner_standing(),
            (UserRole::Customer, SellerStatus::Pending)
        );
    }
}
