//! Store applications and their owner-editable customization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{StoreId, StoreStatus, UserId};

/// Banner used for new applications and for stores without one.
pub const DEFAULT_BANNER_URL: &str =
    "https://images.unsplash.com/photo-1516214124259-011a8a287136?q=80&w=1920";

/// Theme color given to new applications.
pub const DEFAULT_THEME_COLOR: &str = "#34D399";

/// Theme color shown in the settings form when a store has none.
pub const FALLBACK_THEME_COLOR: &str = "#10B981";

/// A seller's request to run a storefront.
///
/// One-to-one with the owning identity's `store_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreApplication {
    pub store_id: StoreId,
    pub user_id: UserId,
    pub store_name: String,
    pub store_description: String,
    pub status: StoreStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

impl StoreApplication {
    /// A fresh pending application with the default look.
    #[must_use]
    pub fn submit(
        user_id: UserId,
        store_name: impl Into<String>,
        store_description: impl Into<String>,
        millis: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let store_name = store_name.into();
        let profile = initials_avatar_url(&store_name);
        Self {
            store_id: StoreId::new(format!("STORE-{millis}")),
            user_id,
            store_name,
            store_description: store_description.into(),
            status: StoreStatus::Pending,
            submitted_at: now,
            banner_image_url: Some(DEFAULT_BANNER_URL.to_owned()),
            profile_image_url: Some(profile),
            theme_color: Some(DEFAULT_THEME_COLOR.to_owned()),
        }
    }

    /// Banner to display, falling back to the default image.
    #[must_use]
    pub fn banner_or_default(&self) -> &str {
        self.banner_image_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BANNER_URL)
    }

    /// Theme color to display, falling back to the brand green.
    #[must_use]
    pub fn theme_or_default(&self) -> &str {
        self.theme_color
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_THEME_COLOR)
    }

    /// Apply the owner's customization.
    pub fn customize(&mut self, customization: StoreCustomization) {
        self.banner_image_url = Some(customization.banner_image_url);
        self.profile_image_url = Some(customization.profile_image_url);
        self.theme_color = Some(customization.theme_color);
    }

    /// Case-insensitive store name match for the admin search box.
    #[must_use]
    pub fn name_matches(&self, needle: &str) -> bool {
        self.store_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

/// The subset of a store the owning seller may edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCustomization {
    pub banner_image_url: String,
    pub profile_image_url: String,
    pub theme_color: String,
}

/// Generated initials avatar for a store name.
#[must_use]
pub fn initials_avatar_url(store_name: &str) -> String {
    let encoded: String = store_name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                char::from(b).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect();
    format!("https://api.dicebear.com/8.x/initials/svg?seed={encoded}")
}
