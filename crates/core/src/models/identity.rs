//! The logged-in identity and the partial updates administrators apply to it.

use serde::{Deserialize, Serialize};

use crate::types::{Email, SellerStatus, StoreId, UserId, UserRole};

/// Store assigned to every mock seller login.
pub const MOCK_SELLER_STORE: &str = "STORE-MOCK-123";

/// Fixed ID used for every administrator login.
pub const ADMIN_USER_ID: &str = "ADMIN-USER-001";

/// An authenticated marketplace user.
///
/// Held by the session and mirrored in the persisted user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub seller_status: SellerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
}

impl Identity {
    /// Build the identity for a mock login.
    ///
    /// No credential check happens. Sellers are always treated as approved and
    /// attached to the mock store; administrators share one fixed ID.
    #[must_use]
    pub fn mock_login(email: Email, role: UserRole, millis: i64) -> Self {
        let mut identity = Self {
            id: UserId::new(format!("user-{millis}")),
            email,
            role,
            seller_status: SellerStatus::None,
            store_id: None,
        };

        match role {
            UserRole::Seller => {
                identity.seller_status = SellerStatus::Approved;
                identity.store_id = Some(StoreId::new(MOCK_SELLER_STORE));
            }
            UserRole::Admin => identity.id = UserId::new(ADMIN_USER_ID),
            UserRole::Customer => {}
        }

        identity
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Role `SELLER` with an approved application.
    #[must_use]
    pub fn is_approved_seller(&self) -> bool {
        self.role == UserRole::Seller && self.seller_status == SellerStatus::Approved
    }

    /// The store an approved seller manages, if any.
    #[must_use]
    pub fn seller_store(&self) -> Option<&StoreId> {
        if self.is_approved_seller() {
            self.store_id.as_ref()
        } else {
            None
        }
    }

    /// Apply a partial update, returning the new identity.
    #[must_use]
    pub fn with_update(&self, update: &IdentityUpdate) -> Self {
        let mut next = self.clone();
        if let Some(role) = update.role {
            next.role = role;
        }
        if let Some(status) = update.seller_status {
            next.seller_status = status;
        }
        if let Some(store_id) = &update.store_id {
            next.store_id = Some(store_id.clone());
        }
        next
    }
}

/// Fields an administrator (or the seller application flow) may change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUpdate {
    pub role: Option<UserRole>,
    pub seller_status: Option<SellerStatus>,
    pub store_id: Option<StoreId>,
}

impl IdentityUpdate {
    #[must_use]
    pub fn role(role: UserRole) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn seller_status(status: SellerStatus) -> Self {
        Self {
            seller_status: Some(status),
            ..Self::default()
        }
    }

    /// A submitted application: pending, pointing at the new store.
    #[must_use]
    pub fn application_submitted(store_id: StoreId) -> Self {
        Self {
            role: None,
            seller_status: Some(SellerStatus::Pending),
            store_id: Some(store_id),
        }
    }
}
