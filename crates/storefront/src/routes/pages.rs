//! Resolver-driven page rendering.
//!
//! [`show`] handles every page request: the resolver decides between a
//! redirect and a view inside a layout, the view renders to a fragment, and
//! [`super::layout::wrap`] frames it.

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use blife_core::routing::normalize_path;
use blife_core::{Identity, Resolution, View, resolve};

use crate::error::{AppError, Result};
use crate::middleware::Viewer;
use crate::repository::Repository;
use crate::state::AppState;

use super::{account, admin, auth, catalog, checkout, layout, seller};

/// Request data shared by every view renderer.
pub struct PageContext {
    pub state: AppState,
    pub viewer: Viewer,
    /// Normalized request path.
    pub path: String,
    pub query: HashMap<String, String>,
}

impl PageContext {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.viewer.identity()
    }

    /// The signed-in identity. The resolver only renders member pages for
    /// signed-in visitors, so a missing identity here is refused.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for anonymous visitors.
    pub fn require_identity(&self) -> Result<&Identity> {
        self.identity()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))
    }

    #[must_use]
    pub fn repository(&self) -> &Repository {
        self.state.repository()
    }

    /// A non-blank query parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// A rendered view, ready to be framed.
pub struct Page {
    pub title: String,
    pub body: String,
    pub status: StatusCode,
}

impl Page {
    /// Render `template` as the page body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Template` if rendering fails.
    pub fn render(title: impl Into<String>, template: &impl Template) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            body: template.render()?,
            status: StatusCode::OK,
        })
    }

    /// A "not found" page for an unknown product or store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Template` if rendering fails.
    pub fn not_found(heading: &str, message: &str) -> Result<Self> {
        let template = NotFoundTemplate {
            heading: heading.to_string(),
            message: message.to_string(),
        };
        let mut page = Self::render(heading, &template)?;
        page.status = StatusCode::NOT_FOUND;
        Ok(page)
    }
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub heading: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "pages/landing.html")]
pub struct LandingTemplate;

#[derive(Template)]
#[template(path = "pages/permission_denied.html")]
pub struct PermissionDeniedTemplate {
    pub path: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Render whatever the resolver says the visitor may see at this path.
#[instrument(skip(state, viewer, uri, query), fields(path = %uri.path()))]
pub async fn show(
    State(state): State<AppState>,
    viewer: Viewer,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response> {
    let path = normalize_path(uri.path());

    match resolve(viewer.identity(), &path) {
        Resolution::Redirect(target) => {
            tracing::debug!(from = %path, to = %target, "Resolver redirect");
            Ok(Redirect::to(&target).into_response())
        }
        Resolution::Render { layout, view } => {
            let ctx = PageContext {
                state,
                viewer,
                path,
                query,
            };
            let page = render_view(&ctx, &view).await?;
            layout::wrap(ctx, layout, page).await
        }
    }
}

async fn render_view(ctx: &PageContext, view: &View) -> Result<Page> {
    match view {
        View::Landing => Page::render("Blife Healthy", &LandingTemplate),
        View::Login => auth::login_page(),
        View::RegistrationSuccess => auth::registration_success_page(),
        View::Dashboard => account::dashboard(ctx).await,
        View::ProductCatalog => catalog::catalog(ctx).await,
        View::ProductDetail(raw_id) => catalog::product_detail(ctx, raw_id).await,
        View::StorePage(store_id) => catalog::store_page(ctx, store_id).await,
        View::Checkout => checkout::checkout_page(ctx).await,
        View::OrderConfirmation => checkout::confirmation_page(ctx).await,
        View::Profile => account::profile(ctx).await,
        View::SellerRegistration => account::seller_registration(ctx),
        View::SellerProducts => seller::products(ctx).await,
        View::SellerOrders => seller::orders(ctx).await,
        View::SellerRevenue => seller::revenue(ctx).await,
        View::SellerStoreSettings => seller::store_settings(ctx).await,
        View::AdminManagement => admin::management(ctx).await,
        View::AdminLogs => admin::logs(ctx).await,
        View::AdminSettings => admin::settings(ctx),
        View::AdminCommissions => admin::commissions(ctx).await,
        View::AdminIntegrations => admin::integrations(),
        View::PermissionDenied => {
            tracing::info!(path = %ctx.path, "Seller page refused");
            Page::render(
                "Permission Denied",
                &PermissionDeniedTemplate {
                    path: ctx.path.clone(),
                },
            )
        }
    }
}

/// Check that the page behind an action would render `expected` for this
/// viewer. Actions reuse the resolver so they are gated exactly like the
/// page that shows their form.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the resolver redirects or renders a
/// different view.
pub fn authorize(viewer: &Viewer, path: &str, expected: &View) -> Result<()> {
    match resolve(viewer.identity(), path) {
        Resolution::Render { view, .. } if &view == expected => Ok(()),
        other => {
            tracing::warn!(path, ?other, "Action refused by resolver");
            Err(AppError::Forbidden(format!("not allowed at {path}")))
        }
    }
}
