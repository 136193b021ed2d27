//! Identity extractor and session helpers.
//!
//! Login is a mock: the session holds whatever `Identity` the login form
//! produced. On every request the stored identity is refreshed from the
//! persisted user list, so role or seller-status changes made by an
//! administrator reach the affected user on their next page load.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use blife_core::{Cart, Identity, OrderId};

use crate::error::AppError;
use crate::models::{Flash, session_keys};
use crate::state::AppState;

/// The visitor behind a request: their session and, if logged in, their
/// identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(viewer: Viewer) -> impl IntoResponse {
///     match viewer.identity() {
///         Some(user) => format!("Hello, {}!", user.email),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Viewer {
    session: Session,
    identity: Option<Identity>,
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let stored: Option<Identity> = session
            .get(session_keys::IDENTITY)
            .await
            .ok()
            .flatten();

        let identity = match stored {
            Some(identity) => Some(refresh_identity(state, &session, identity).await?),
            None => None,
        };

        Ok(Self { session, identity })
    }
}

/// Replace the session identity with the user-list entry when they differ.
async fn refresh_identity(
    state: &AppState,
    session: &Session,
    identity: Identity,
) -> Result<Identity, AppError> {
    match state.repository().user(&identity.id).await {
        Some(latest) if latest != identity => {
            tracing::debug!(user_id = %latest.id, "Refreshed session identity from user list");
            session.insert(session_keys::IDENTITY, &latest).await?;
            Ok(latest)
        }
        _ => Ok(identity),
    }
}

impl Viewer {
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Store `identity` as the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_identity(&mut self, identity: Identity) -> Result<(), AppError> {
        self.session
            .insert(session_keys::IDENTITY, &identity)
            .await?;
        self.identity = Some(identity);
        Ok(())
    }

    /// Log out. The cart stays with the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear_identity(&mut self) -> Result<(), AppError> {
        self.session
            .remove::<Identity>(session_keys::IDENTITY)
            .await?;
        self.identity = None;
        Ok(())
    }

    /// The session cart, empty if none has been saved yet.
    pub async fn cart(&self) -> Cart {
        self.session
            .get::<Cart>(session_keys::CART)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save_cart(&self, cart: &Cart) -> Result<(), AppError> {
        self.session.insert(session_keys::CART, cart).await?;
        Ok(())
    }

    /// Queue a message for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn flash(&self, flash: Flash) -> Result<(), AppError> {
        self.session.insert(session_keys::FLASH, flash).await?;
        Ok(())
    }

    /// Remove and return the queued flash message.
    pub async fn take_flash(&self) -> Option<Flash> {
        self.session
            .remove::<Flash>(session_keys::FLASH)
            .await
            .ok()
            .flatten()
    }

    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set_last_order(&self, order_id: &OrderId) -> Result<(), AppError> {
        self.session
            .insert(session_keys::LAST_ORDER, order_id)
            .await?;
        Ok(())
    }

    pub async fn last_order(&self) -> Option<OrderId> {
        self.session
            .get::<OrderId>(session_keys::LAST_ORDER)
            .await
            .ok()
            .flatten()
    }
}
