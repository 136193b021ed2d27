//! Account route handlers: dashboard, profile and seller registration.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use blife_core::routing::DASHBOARD_PATH;
use blife_core::{Identity, IdentityUpdate, Order, SellerStatus, UserRole, View};

use crate::error::Result;
use crate::middleware::Viewer;
use crate::models::Flash;
use crate::state::AppState;

use super::pages::{Page, PageContext, authorize};
use super::{admin, seller};

/// A shortcut tile on the customer dashboard.
pub struct DashboardTile {
    pub href: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

const CUSTOMER_TILES: &[DashboardTile] = &[
    DashboardTile {
        href: "/profile",
        title: "Order History",
        subtitle: "ดูประวัติการสั่งซื้อของคุณ",
    },
    DashboardTile {
        href: "/profile",
        title: "Manage Profile",
        subtitle: "อัปเดตข้อมูลส่วนตัว",
    },
    DashboardTile {
        href: "/saved-addresses",
        title: "Saved Addresses",
        subtitle: "จัดการที่อยู่จัดส่ง",
    },
    DashboardTile {
        href: "/support-center",
        title: "Support Center",
        subtitle: "ติดต่อฝ่ายสนับสนุน",
    },
];

/// Seller registration form data.
#[derive(Debug, Deserialize)]
pub struct SellerRegistrationForm {
    pub store_name: String,
    #[serde(default)]
    pub store_description: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Customer dashboard template.
#[derive(Template)]
#[template(path = "pages/dashboard_customer.html")]
pub struct CustomerDashboardTemplate {
    pub role: UserRole,
    pub seller_status: SellerStatus,
    /// Shortcut tiles; pending or rejected sellers get none.
    pub tiles: &'static [DashboardTile],
}

/// Profile template.
#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct ProfileTemplate {
    pub identity: Identity,
    pub orders: Vec<Order>,
}

/// Seller registration template.
#[derive(Template)]
#[template(path = "pages/seller_registration.html")]
pub struct SellerRegistrationTemplate {
    pub seller_status: SellerStatus,
}

// =============================================================================
// Pages
// =============================================================================

/// The dashboard matching the visitor's role.
///
/// # Errors
///
/// Returns an error if the visitor is anonymous or rendering fails.
pub async fn dashboard(ctx: &PageContext) -> Result<Page> {
    let identity = ctx.require_identity()?;

    if identity.is_admin() {
        return admin::dashboard(ctx).await;
    }
    if let Some(store_id) = identity.seller_store() {
        return seller::dashboard(ctx, store_id).await;
    }

    let tiles = if identity.role == UserRole::Customer {
        CUSTOMER_TILES
    } else {
        &[]
    };
    Page::render(
        "Your Dashboard",
        &CustomerDashboardTemplate {
            role: identity.role,
            seller_status: identity.seller_status,
            tiles,
        },
    )
}

/// # Errors
///
/// Returns an error if the visitor is anonymous or rendering fails.
pub async fn profile(ctx: &PageContext) -> Result<Page> {
    let identity = ctx.require_identity()?;
    let orders = ctx.repository().orders_by_user(&identity.id).await;

    Page::render(
        "Your Profile",
        &ProfileTemplate {
            identity: identity.clone(),
            orders,
        },
    )
}

/// # Errors
///
/// Returns an error if the visitor is anonymous or rendering fails.
pub fn seller_registration(ctx: &PageContext) -> Result<Page> {
    let identity = ctx.require_identity()?;
    Page::render(
        "Become a Seller",
        &SellerRegistrationTemplate {
            seller_status: identity.seller_status,
        },
    )
}

// =============================================================================
// Actions
// =============================================================================

/// Submit a store application; the applicant becomes a pending seller.
#[instrument(skip(state, viewer, form))]
pub async fn submit_seller_registration(
    State(state): State<AppState>,
    mut viewer: Viewer,
    Form(form): Form<SellerRegistrationForm>,
) -> Result<Response> {
    authorize(&viewer, "/seller-registration", &View::SellerRegistration)?;
    let Some(identity) = viewer.identity().cloned() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let store_name = form.store_name.trim();
    if store_name.is_empty() {
        viewer.flash(Flash::error("Please enter a store name.")).await?;
        return Ok(Redirect::to("/seller-registration").into_response());
    }

    let application = state
        .repository()
        .create_store_application(&identity.id, store_name, form.store_description.trim())
        .await;

    let updated = identity.with_update(&IdentityUpdate::application_submitted(
        application.store_id.clone(),
    ));
    state.repository().upsert_user(&updated).await;
    viewer.set_identity(updated).await?;

    tracing::info!(store_id = %application.store_id, "Store application submitted");
    viewer
        .flash(Flash::success(
            "Your application has been submitted and is pending review.",
        ))
        .await?;
    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}
