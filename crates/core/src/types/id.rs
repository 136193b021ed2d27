//! Newtype IDs for type-safe entity references.
//!
//! The marketplace mixes two ID shapes: opaque strings (`user-1678886400001`,
//! `STORE-MOCK-123`, `BLIFE-…`, `rev-…`) and millisecond counters (product and
//! log entry IDs). Each shape has its own macro so IDs of different entities
//! can never be swapped by accident.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Define a type-safe wrapper around an owned string identifier.
///
/// Creates a newtype with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`
///
/// # Example
///
/// ```rust
/// # use blife_core::define_string_id;
/// define_string_id!(CouponId);
///
/// let id = CouponId::new("SPRING-10");
/// assert_eq!(id.as_str(), "SPRING-10");
/// ```
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Define a type-safe wrapper around a numeric (millisecond-derived) identifier.
///
/// Creates a `Copy` newtype around `i64` with `new()`, `as_i64()`, `Display`,
/// `FromStr` and `From` conversions.
#[macro_export]
macro_rules! define_numeric_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_string_id!(UserId);
define_string_id!(StoreId);
define_string_id!(OrderId);
define_string_id!(ReviewId);

define_numeric_id!(ProductId);
define_numeric_id!(LogEntryId);

/// Strictly increasing millisecond clock used to mint IDs.
///
/// IDs are wall-clock milliseconds, bumped by one whenever two are requested
/// within the same millisecond, so consecutive calls never collide.
#[derive(Debug, Default)]
pub struct MillisClock {
    last: AtomicI64,
}

impl MillisClock {
    /// Create a clock that has not issued any value yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next value: `max(now_ms, previous + 1)`.
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}
