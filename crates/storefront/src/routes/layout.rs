//! Page chrome: the frame drawn around every rendered view.
//!
//! A view renders to an HTML fragment; [`wrap`] places it inside the frame
//! the resolver picked. Only the `Public` and `Default` frames carry the
//! cart panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};

use blife_core::{Cart, CartItem, Identity, Layout, Price, StoreId};

use crate::error::Result;
use crate::filters;
use crate::models::Flash;

use super::pages::{Page, PageContext};

/// Cart contents shown in the slide-out panel.
pub struct CartPanel {
    pub items: Vec<CartItem>,
    pub count: u32,
    pub subtotal: Price,
}

impl CartPanel {
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// A sidebar entry.
pub struct NavLink {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

impl NavLink {
    fn new(href: impl Into<String>, label: &'static str, current: &str) -> Self {
        let href = href.into();
        let active = current == href || (href != "/dashboard" && current.starts_with(&href));
        Self {
            href,
            label,
            active,
        }
    }
}

/// Everything a frame needs besides the view body.
pub struct Chrome {
    pub title: String,
    pub content: String,
    pub identity: Option<Identity>,
    pub cart: Option<CartPanel>,
    pub flash: Option<Flash>,
    /// Current path, used as `return_to` by cart forms.
    pub path: String,
    pub nav: Vec<NavLink>,
}

#[derive(Template, WebTemplate)]
#[template(path = "layouts/bare.html")]
pub struct BareLayout {
    pub chrome: Chrome,
}

#[derive(Template, WebTemplate)]
#[template(path = "layouts/public.html")]
pub struct PublicLayout {
    pub chrome: Chrome,
}

#[derive(Template, WebTemplate)]
#[template(path = "layouts/default.html")]
pub struct DefaultLayout {
    pub chrome: Chrome,
}

#[derive(Template, WebTemplate)]
#[template(path = "layouts/seller.html")]
pub struct SellerLayout {
    pub chrome: Chrome,
}

#[derive(Template, WebTemplate)]
#[template(path = "layouts/admin.html")]
pub struct AdminLayout {
    pub chrome: Chrome,
}

fn seller_nav(store_id: Option<&StoreId>, current: &str) -> Vec<NavLink> {
    let mut nav = vec![
        NavLink::new("/dashboard", "Dashboard", current),
        NavLink::new("/seller/products", "Products", current),
        NavLink::new("/seller/orders", "Orders", current),
        NavLink::new("/seller/revenue", "Revenue", current),
        NavLink::new("/seller/store-settings", "Store Settings", current),
    ];
    if let Some(store_id) = store_id {
        nav.push(NavLink::new(
            format!("/store/{store_id}"),
            "View My Store",
            current,
        ));
    }
    nav
}

fn admin_nav(current: &str) -> Vec<NavLink> {
    vec![
        NavLink::new("/dashboard", "Dashboard", current),
        NavLink::new("/admin/management", "Store Management", current),
        NavLink::new("/admin/commissions", "Commissions", current),
        NavLink::new("/products", "Products", current),
        NavLink::new("/admin/integrations", "Integrations", current),
        NavLink::new("/admin/settings", "Site Settings", current),
        NavLink::new("/admin/logs", "System Logs", current),
    ]
}

/// Wrap a rendered view in the frame for `layout`.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn wrap(ctx: PageContext, layout: Layout, page: Page) -> Result<Response> {
    let cart = if layout.shows_cart() {
        Some(CartPanel::from_cart(&ctx.viewer.cart().await))
    } else {
        None
    };
    let flash = ctx.viewer.take_flash().await;
    let identity = ctx.identity().cloned();

    let nav = match layout {
        Layout::Seller => seller_nav(
            identity.as_ref().and_then(Identity::seller_store),
            &ctx.path,
        ),
        Layout::Admin => admin_nav(&ctx.path),
        Layout::Bare | Layout::Public | Layout::Default => Vec::new(),
    };

    let chrome = Chrome {
        title: page.title,
        content: page.body,
        identity,
        cart,
        flash,
        path: ctx.path,
        nav,
    };

    let status = page.status;
    Ok(match layout {
        Layout::Bare => (status, BareLayout { chrome }).into_response(),
        Layout::Public => (status, PublicLayout { chrome }).into_response(),
        Layout::Default => (status, DefaultLayout { chrome }).into_response(),
        Layout::Seller => (status, SellerLayout { chrome }).into_response(),
        Layout::Admin => (status, AdminLayout { chrome }).into_response(),
    })
}
