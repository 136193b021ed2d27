//! Role-gated view resolution.
//!
//! Every page request goes through [`resolve`], which maps the current
//! identity and request path to either a page (a [`View`] inside a
//! [`Layout`]) or a redirect. It is the single place where roles and seller
//! status decide what a visitor may see.
//!
//! # Decision order
//!
//! | Condition | Result |
//! |-----------|--------|
//! | `/login` | signed in: redirect `/dashboard`; else `Bare` login |
//! | `/registration-success` | `Bare` registration success |
//! | signed out, `/` | `Bare` landing |
//! | signed out, `/products…` or `/store…` | `Public` + page table |
//! | signed out, anything else | redirect `/` |
//! | admin, `/admin…` or `/dashboard` | `Admin` + page table |
//! | approved seller, `/seller…` or `/dashboard` | `Seller` + page table |
//! | otherwise | `Default` + page table |

use crate::models::Identity;
use crate::types::StoreId;

/// Redirect target for signed-out visitors.
pub const LANDING_PATH: &str = "/";

/// Redirect target for signed-in visitors.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Upper bound on redirect hops followed by [`resolve_settled`].
pub const MAX_REDIRECTS: usize = 4;

/// The page frame wrapped around a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Full-page screens with no header.
    Bare,
    /// Header for signed-out browsing.
    Public,
    /// Administrator sidebar.
    Admin,
    /// Approved seller sidebar.
    Seller,
    /// Header and footer for customers and sellers who are not approved.
    Default,
}

impl Layout {
    /// Whether the cart panel is part of this frame.
    #[must_use]
    pub const fn shows_cart(self) -> bool {
        matches!(self, Self::Public | Self::Default)
    }
}

/// A page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    Landing,
    Login,
    RegistrationSuccess,
    Dashboard,
    ProductCatalog,
    /// Raw path segment; the handler parses it and reports unknown products.
    ProductDetail(String),
    StorePage(StoreId),
    Checkout,
    OrderConfirmation,
    Profile,
    SellerRegistration,
    SellerProducts,
    SellerOrders,
    SellerRevenue,
    SellerStoreSettings,
    AdminManagement,
    AdminLogs,
    AdminSettings,
    AdminCommissions,
    AdminIntegrations,
    /// A seller page requested by someone who does not manage a store.
    PermissionDenied,
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render { layout: Layout, view: View },
    Redirect(String),
}

impl Resolution {
    fn render(layout: Layout, view: View) -> Self {
        Self::Render { layout, view }
    }

    fn redirect(path: &str) -> Self {
        Self::Redirect(path.to_owned())
    }
}

/// A resolution with all redirects followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    /// The path that finally rendered.
    pub path: String,
    pub layout: Layout,
    pub view: View,
}

/// Normalize a request path: ensure a leading `/`, drop trailing `/` on
/// anything but the root.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Resolve `path` for `identity`.
///
/// Pure and total: the same inputs always give the same resolution.
#[must_use]
pub fn resolve(identity: Option<&Identity>, path: &str) -> Resolution {
    let path = normalize_path(path);
    let path = path.as_str();

    if path == "/login" {
        return match identity {
            Some(_) => Resolution::redirect(DASHBOARD_PATH),
            None => Resolution::render(Layout::Bare, View::Login),
        };
    }
    if path == "/registration-success" {
        return Resolution::render(Layout::Bare, View::RegistrationSuccess);
    }

    let Some(user) = identity else {
        if path == LANDING_PATH {
            return Resolution::render(Layout::Bare, View::Landing);
        }
        if path.starts_with("/products") || path.starts_with("/store") {
            return page(Layout::Public, None, path);
        }
        return Resolution::redirect(LANDING_PATH);
    };

    let layout = if user.is_admin() && (path.starts_with("/admin") || path == DASHBOARD_PATH) {
        Layout::Admin
    } else if user.is_approved_seller()
        && (path.starts_with("/seller") || path == DASHBOARD_PATH)
    {
        Layout::Seller
    } else {
        Layout::Default
    };

    page(layout, Some(user), path)
}

/// The page table shared by every layout.
fn page(layout: Layout, identity: Option<&Identity>, path: &str) -> Resolution {
    let mut segments = path.split('/').skip(1);
    let head = segments.next().unwrap_or_default();
    let param = segments.next().filter(|s| !s.is_empty());

    match (head, param) {
        ("products", Some(id)) => return Resolution::render(layout, View::ProductDetail(id.to_owned())),
        ("store", Some(id)) => return Resolution::render(layout, View::StorePage(StoreId::new(id))),
        _ => {}
    }

    let manages_store = identity.and_then(Identity::seller_store).is_some();
    let is_admin = identity.is_some_and(Identity::is_admin);

    let seller_page = |view: View| {
        if manages_store {
            Resolution::render(layout, view)
        } else {
            Resolution::render(layout, View::PermissionDenied)
        }
    };
    let admin_page = |view: View| {
        if is_admin {
            Resolution::render(layout, view)
        } else {
            Resolution::redirect(DASHBOARD_PATH)
        }
    };

    match path {
        "/dashboard" => Resolution::render(layout, View::Dashboard),
        "/checkout" => Resolution::render(layout, View::Checkout),
        "/order-confirmation" => Resolution::render(layout, View::OrderConfirmation),
        "/profile" => Resolution::render(layout, View::Profile),
        "/seller-registration" => Resolution::render(layout, View::SellerRegistration),
        "/products" => Resolution::render(layout, View::ProductCatalog),
        "/seller/products" => seller_page(View::SellerProducts),
        "/seller/orders" => seller_page(View::SellerOrders),
        "/seller/revenue" => seller_page(View::SellerRevenue),
        "/seller/store-settings" => seller_page(View::SellerStoreSettings),
        "/admin/management" => admin_page(View::AdminManagement),
        "/admin/logs" => admin_page(View::AdminLogs),
        "/admin/settings" => admin_page(View::AdminSettings),
        "/admin/commissions" => admin_page(View::AdminCommissions),
        "/admin/integrations" => admin_page(View::AdminIntegrations),
        _ => Resolution::redirect(DASHBOARD_PATH),
    }
}

/// Resolve `path`, following redirects until a page renders.
///
/// Every redirect target renders within two hops; the hop limit only guards
/// against a future table change introducing a cycle, in which case the
/// landing page is returned.
#[must_use]
pub fn resolve_settled(identity: Option<&Identity>, path: &str) -> Settled {
    let mut current = normalize_path(path);
    for _ in 0..=MAX_REDIRECTS {
        match resolve(identity, &current) {
            Resolution::Render { layout, view } => {
                return Settled {
                    path: current,
                    layout,
                    view,
                };
            }
            Resolution::Redirect(next) => current = next,
        }
    }
    Settled {
        path: LANDING_PATH.to_owned(),
        layout: Layout::Bare,
        view: View::Landing,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Email, SellerStatus, UserRole};

    fn login(role: UserRole) -> Identity {
        Identity::mock_login(Email::parse("user@example.com").unwrap(), role, 1)
    }

    fn with_status(role: UserRole, status: SellerStatus) -> Identity {
        let mut identity = login(role);
        identity.seller_status = status;
        identity
    }

    const ALL_PATHS: &[&str] = &[
        "/",
        "/login",
        "/registration-success",
        "/dashboard",
        "/checkout",
        "/order-confirmation",
        "/profile",
        "/seller-registration",
        "/products",
        "/products/3",
        "/products/",
        "/store/STORE-MOCK-123",
        "/store",
        "/seller/products",
        "/seller/orders",
        "/seller/revenue",
        "/seller/store-settings",
        "/seller",
        "/admin",
        "/admin/management",
        "/admin/logs",
        "/admin/settings",
        "/admin/commissions",
        "/admin/integrations",
        "/nowhere",
        "/productsx",
        "",
    ];

    #[test]
    fn test_login_page() {
        assert_eq!(
            resolve(None, "/login"),
            Resolution::Render {
                layout: Layout::Bare,
                view: View::Login
            }
        );
        assert_eq!(
            resolve(Some(&login(UserRole::Customer)), "/login"),
            Resolution::Redirect("/dashboard".into())
        );
    }

    #[test]
    fn test_registration_success_ignores_session() {
        let expected = Resolution::Render {
            layout: Layout::Bare,
            view: View::RegistrationSuccess,
        };
        assert_eq!(resolve(None, "/registration-success"), expected);
        assert_eq!(
            resolve(Some(&login(UserRole::Admin)), "/registration-success"),
            expected
        );
    }

    #[test]
    fn test_signed_out_public_browsing() {
        assert_eq!(
            resolve(None, "/products/3"),
            Resolution::Render {
                layout: Layout::Public,
                view: View::ProductDetail("3".into())
            }
        );
        assert_eq!(
            resolve(None, "/store/STORE-MOCK-123"),
            Resolution::Render {
                layout: Layout::Public,
                view: View::StorePage(StoreId::new("STORE-MOCK-123"))
            }
        );
        assert_eq!(
            resolve(None, "/products"),
            Resolution::Render {
                layout: Layout::Public,
                view: View::ProductCatalog
            }
        );
    }

    #[test]
    fn test_signed_out_settles_on_landing() {
        let public = |p: &str| {
            let p = normalize_path(p);
            p == "/login"
                || p == "/registration-success"
                || p.starts_with("/products")
                || p.starts_with("/store")
        };
        for path in ALL_PATHS {
            let settled = resolve_settled(None, path);
            if !public(path) {
                assert_eq!(settled.view, View::Landing, "path {path}");
                assert_eq!(settled.layout, Layout::Bare);
            }
        }
    }

    #[test]
    fn test_admin_gets_admin_layout() {
        let admin = login(UserRole::Admin);
        let cases = [
            ("/dashboard", View::Dashboard),
            ("/admin/management", View::AdminManagement),
            ("/admin/logs", View::AdminLogs),
            ("/admin/settings", View::AdminSettings),
            ("/admin/commissions", View::AdminCommissions),
            ("/admin/integrations", View::AdminIntegrations),
        ];
        for (path, view) in cases {
            assert_eq!(
                resolve(Some(&admin), path),
                Resolution::Render {
                    layout: Layout::Admin,
                    view
                },
                "path {path}"
            );
        }
    }

    #[test]
    fn test_admin_outside_admin_section_uses_default_layout() {
        let admin = login(UserRole::Admin);
        assert_eq!(
            resolve(Some(&admin), "/products"),
            Resolution::Render {
                layout: Layout::Default,
                view: View::ProductCatalog
            }
        );
    }

    #[test]
    fn test_approved_seller_gets_seller_layout() {
        let seller = login(UserRole::Seller);
        let cases = [
            ("/dashboard", View::Dashboard),
            ("/seller/products", View::SellerProducts),
            ("/seller/orders", View::SellerOrders),
            ("/seller/revenue", View::SellerRevenue),
            ("/seller/store-settings", View::SellerStoreSettings),
        ];
        for (path, view) in cases {
            assert_eq!(
                resolve(Some(&seller), path),
                Resolution::Render {
                    layout: Layout::Seller,
                    view
                },
                "path {path}"
            );
        }
    }

    #[test]
    fn test_seller_pages_denied_without_store() {
        for identity in [
            login(UserRole::Customer),
            login(UserRole::Admin),
            with_status(UserRole::Seller, SellerStatus::Pending),
            with_status(UserRole::Customer, SellerStatus::Rejected),
        ] {
            assert_eq!(
                resolve(Some(&identity), "/seller/products"),
                Resolution::Render {
                    layout: Layout::Default,
                    view: View::PermissionDenied
                }
            );
        }

        let mut storeless = login(UserRole::Seller);
        storeless.store_id = None;
        assert_eq!(
            resolve(Some(&storeless), "/seller/orders"),
            Resolution::Render {
                layout: Layout::Seller,
                view: View::PermissionDenied
            }
        );
    }

    #[test]
    fn test_admin_pages_redirect_non_admins() {
        for role in [UserRole::Customer, UserRole::Seller] {
            assert_eq!(
                resolve(Some(&login(role)), "/admin/logs"),
                Resolution::Redirect("/dashboard".into())
            );
        }
    }

    #[test]
    fn test_pending_seller_uses_default_layout() {
        let pending = with_status(UserRole::Customer, SellerStatus::Pending);
        assert_eq!(
            resolve(Some(&pending), "/dashboard"),
            Resolution::Render {
                layout: Layout::Default,
                view: View::Dashboard
            }
        );
    }

    #[test]
    fn test_unknown_and_root_redirect_to_dashboard() {
        let customer = login(UserRole::Customer);
        for path in ["/", "/nowhere", "/store", "/seller", "/productsx"] {
            assert_eq!(
                resolve(Some(&customer), path),
                Resolution::Redirect("/dashboard".into()),
                "path {path}"
            );
        }
    }

    #[test]
    fn test_trailing_slash_ignored() {
        let customer = login(UserRole::Customer);
        assert_eq!(resolve(Some(&customer), "/profile/"), resolve(Some(&customer), "/profile"));
        assert_eq!(
            resolve(None, "/products/"),
            Resolution::Render {
                layout: Layout::Public,
                view: View::ProductCatalog
            }
        );
    }

    #[test]
    fn test_extra_segments_use_first_param() {
        assert_eq!(
            resolve(None, "/products/5/reviews"),
            Resolution::Render {
                layout: Layout::Public,
                view: View::ProductDetail("5".into())
            }
        );
    }

    #[test]
    fn test_every_path_settles_for_every_role() {
        let identities = [
            None,
            Some(login(UserRole::Customer)),
            Some(login(UserRole::Seller)),
            Some(login(UserRole::Admin)),
            Some(with_status(UserRole::Customer, SellerStatus::Pending)),
        ];
        for identity in &identities {
            for path in ALL_PATHS {
                let settled = resolve_settled(identity.as_ref(), path);
                assert!(matches!(
                    resolve(identity.as_ref(), &settled.path),
                    Resolution::Render { .. }
                ));
                // Idempotent.
                assert_eq!(settled, resolve_settled(identity.as_ref(), path));
            }
        }
    }

    #[test]
    fn test_signed_in_unknown_settles_on_dashboard() {
        let seller = login(UserRole::Seller);
        let settled = resolve_settled(Some(&seller), "/nowhere");
        assert_eq!(settled.path, "/dashboard");
        assert_eq!(settled.layout, Layout::Seller);
        assert_eq!(settled.view, View::Dashboard);
    }
}
