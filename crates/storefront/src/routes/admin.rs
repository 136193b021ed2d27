//! Administrator route handlers.
//!
//! Store applications, users, marketplace logs and the commission ledger.
//! Settings and integrations are informational pages with no actions.

use std::cmp::Reverse;
use std::collections::HashMap;

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use blife_core::analytics::RevenueSummary;
use blife_core::commission::{
    Commission, CommissionStatus, DIRECT_RATE_PERCENT, REFERRAL_RATE_PERCENT,
};
use blife_core::{
    Identity, IdentityUpdate, LogEntry, LogFilter, LogLevel, LogSource, Price, SellerStatus,
    StoreApplication, StoreId, StoreStatus, UserId, UserRole, View,
};

use crate::error::{AppError, Result};
use crate::middleware::Viewer;
use crate::models::Flash;
use crate::state::AppState;

use super::chart::{self, ChartBar};
use super::pages::{Page, PageContext, authorize};

const MANAGEMENT_PATH: &str = "/admin/management";
const COMMISSIONS_PATH: &str = "/admin/commissions";

/// Entries in the dashboard activity feed.
const RECENT_ACTIVITY: usize = 5;

const SETTINGS_TABS: &[&str] = &[
    "Basic Information",
    "Home Page Themes",
    "Media",
    "Seo",
    "Custom Css",
    "Scripts",
    "Shop & Checkout Page",
    "Footer & Contact Page",
];

/// An `<option>` with its selection state worked out up front.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn all(selected: Option<&str>) -> Self {
        Self {
            value: String::new(),
            label: "All".to_string(),
            selected: selected.is_none(),
        }
    }

    fn list<'a>(
        values: impl IntoIterator<Item = &'a str>,
        selected: Option<&str>,
    ) -> Vec<Self> {
        values
            .into_iter()
            .map(|value| Self {
                value: value.to_string(),
                label: value.to_string(),
                selected: selected == Some(value),
            })
            .collect()
    }
}

/// A line in the dashboard activity feed.
pub struct Activity {
    pub prefix: &'static str,
    pub subject: String,
    pub suffix: String,
    pub date: DateTime<Utc>,
}

/// A store application with its owner's email.
pub struct StoreRow {
    pub store: StoreApplication,
    pub owner_email: String,
}

// =============================================================================
// Forms
// =============================================================================

/// Store status form data.
#[derive(Debug, Deserialize)]
pub struct StoreStatusForm {
    pub status: StoreStatus,
}

/// User edit form data. Blank fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UserEditForm {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub seller_status: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template)]
#[template(path = "pages/admin_dashboard.html")]
pub struct AdminDashboardTemplate {
    pub total_revenue: Price,
    pub order_count: usize,
    pub user_count: usize,
    pub pending_count: usize,
    pub bars: Vec<ChartBar>,
    pub activity: Vec<Activity>,
}

/// Store and user management template.
#[derive(Template)]
#[template(path = "pages/admin_management.html")]
pub struct ManagementTemplate {
    /// `stores` or `users`.
    pub tab: String,
    pub search: String,
    pub status_options: Vec<SelectOption>,
    pub stores: Vec<StoreRow>,
    pub users: Vec<Identity>,
    pub roles: &'static [UserRole],
    pub seller_statuses: &'static [SellerStatus],
}

/// Log viewer template.
#[derive(Template)]
#[template(path = "pages/admin_logs.html")]
pub struct LogsTemplate {
    pub entries: Vec<LogEntry>,
    pub level_options: Vec<SelectOption>,
    pub source_options: Vec<SelectOption>,
    pub search: String,
}

/// Commission tracking template.
#[derive(Template)]
#[template(path = "pages/admin_commissions.html")]
pub struct CommissionsTemplate {
    pub commissions: Vec<Commission>,
    pub search: String,
    pub total_paid: Price,
    pub total_pending: Price,
    pub pending_count: usize,
    pub direct_rate: u32,
    pub referral_rate: u32,
}

/// Site settings template.
#[derive(Template)]
#[template(path = "pages/admin_settings.html")]
pub struct SettingsTemplate {
    pub tabs: Vec<SelectOption>,
    pub active: String,
}

/// Integrations template.
#[derive(Template)]
#[template(path = "pages/admin_integrations.html")]
pub struct IntegrationsTemplate {
    pub payment: &'static [Integration],
    pub logistics: &'static [Integration],
}

/// A third-party service card.
pub struct Integration {
    pub name: &'static str,
    pub description: &'static str,
}

const PAYMENT_GATEWAYS: &[Integration] = &[
    Integration {
        name: "Stripe",
        description: "Accept payments online.",
    },
    Integration {
        name: "Omise",
        description: "Online payment gateway for SEA.",
    },
];

const LOGISTICS_PROVIDERS: &[Integration] = &[
    Integration {
        name: "Flash Express",
        description: "Express delivery service.",
    },
    Integration {
        name: "Kerry Express",
        description: "Parcel delivery services.",
    },
];

// =============================================================================
// Pages
// =============================================================================

/// Platform overview for the admin dashboard.
///
/// # Errors
///
/// Returns an error if rendering fails.
pub async fn dashboard(ctx: &PageContext) -> Result<Page> {
    let orders = ctx.repository().orders().await;
    let users = ctx.repository().users().await;
    let stores = ctx.repository().store_applications().await;

    let summary = RevenueSummary::compute(&orders, Utc::now());
    let total_revenue = orders.iter().map(|o| o.total).sum();
    let user_count = users.iter().filter(|u| !u.is_admin()).count();
    let pending_count = stores
        .iter()
        .filter(|s| s.status == StoreStatus::Pending)
        .count();

    // Users carry no sign-up date, so the feed covers orders and stores.
    let mut activity: Vec<Activity> = orders
        .iter()
        .map(|o| Activity {
            prefix: "New order",
            subject: o.id.to_string(),
            suffix: format!("for {}", o.total),
            date: o.date,
        })
        .chain(stores.iter().map(|s| Activity {
            prefix: "Store",
            subject: s.store_name.clone(),
            suffix: "submitted an application.".to_string(),
            date: s.submitted_at,
        }))
        .collect();
    activity.sort_by_key(|a| Reverse(a.date));
    activity.truncate(RECENT_ACTIVITY);

    Page::render(
        "Admin Command Center",
        &AdminDashboardTemplate {
            total_revenue,
            order_count: orders.len(),
            user_count,
            pending_count,
            bars: chart::bars(&summary),
            activity,
        },
    )
}

/// # Errors
///
/// Returns an error if rendering fails.
pub async fn management(ctx: &PageContext) -> Result<Page> {
    let tab = match ctx.param("tab") {
        Some("users") => "users",
        _ => "stores",
    };
    let search = ctx.param("q").unwrap_or_default().to_string();
    let status = ctx
        .param("status")
        .and_then(|raw| raw.parse::<StoreStatus>().ok());

    let users = ctx.repository().users().await;
    let emails: HashMap<&UserId, String> =
        users.iter().map(|u| (&u.id, u.email.to_string())).collect();

    let stores = ctx
        .repository()
        .store_applications()
        .await
        .into_iter()
        .filter(|s| status.is_none_or(|status| s.status == status))
        .filter(|s| s.name_matches(&search))
        .map(|store| StoreRow {
            owner_email: emails
                .get(&store.user_id)
                .cloned()
                .unwrap_or_else(|| "N/A".to_string()),
            store,
        })
        .collect();

    let filtered_users = users
        .iter()
        .filter(|u| u.email.contains_ignore_case(&search))
        .cloned()
        .collect();

    let selected = status.map(|s| s.as_str());
    let mut status_options = vec![SelectOption::all(selected)];
    status_options.extend(SelectOption::list(
        StoreStatus::ALL.iter().map(StoreStatus::as_str),
        selected,
    ));

    Page::render(
        "Admin Command Center",
        &ManagementTemplate {
            tab: tab.to_string(),
            search,
            status_options,
            stores,
            users: filtered_users,
            roles: UserRole::ALL,
            seller_statuses: SellerStatus::ALL,
        },
    )
}

/// # Errors
///
/// Returns an error if rendering fails.
pub async fn logs(ctx: &PageContext) -> Result<Page> {
    let filter = LogFilter {
        level: ctx
            .param("level")
            .and_then(|raw| raw.parse::<LogLevel>().ok()),
        source: ctx
            .param("source")
            .and_then(|raw| raw.parse::<LogSource>().ok()),
        search: ctx.param("q").unwrap_or_default().to_string(),
    };

    let entries = ctx.repository().logs().await;
    let entries: Vec<LogEntry> = filter.apply(&entries).into_iter().cloned().collect();

    let level = filter.level.map(|l| l.as_str());
    let mut level_options = vec![SelectOption::all(level)];
    level_options.extend(SelectOption::list(
        LogLevel::ALL.iter().map(LogLevel::as_str),
        level,
    ));

    let source = filter.source.map(|s| s.as_str());
    let mut source_options = vec![SelectOption::all(source)];
    source_options.extend(SelectOption::list(
        LogSource::ALL.iter().map(LogSource::as_str),
        source,
    ));

    Page::render(
        "System Event Logs",
        &LogsTemplate {
            entries,
            level_options,
            source_options,
            search: filter.search,
        },
    )
}

/// # Errors
///
/// Returns an error if rendering fails.
pub async fn commissions(ctx: &PageContext) -> Result<Page> {
    let search = ctx.param("q").unwrap_or_default().to_string();
    let ledger = ctx.state.commissions().lock().await;

    let commissions: Vec<Commission> = ledger.search(&search).into_iter().cloned().collect();
    let pending_count = commissions
        .iter()
        .filter(|c| c.status == CommissionStatus::Pending)
        .count();

    Page::render(
        "Commission Tracking",
        &CommissionsTemplate {
            total_paid: ledger.total_paid(),
            total_pending: ledger.total_pending(),
            commissions,
            search,
            pending_count,
            direct_rate: DIRECT_RATE_PERCENT,
            referral_rate: REFERRAL_RATE_PERCENT,
        },
    )
}

/// # Errors
///
/// Returns an error if rendering fails.
pub fn settings(ctx: &PageContext) -> Result<Page> {
    let active = ctx
        .param("tab")
        .and_then(|tab| SETTINGS_TABS.iter().find(|t| **t == tab))
        .copied()
        .unwrap_or("Basic Information");

    Page::render(
        "Basic Information",
        &SettingsTemplate {
            tabs: SelectOption::list(SETTINGS_TABS.iter().copied(), Some(active)),
            active: active.to_string(),
        },
    )
}

/// # Errors
///
/// Returns an error if rendering fails.
pub fn integrations() -> Result<Page> {
    Page::render(
        "API Integrations",
        &IntegrationsTemplate {
            payment: PAYMENT_GATEWAYS,
            logistics: LOGISTICS_PROVIDERS,
        },
    )
}

// =============================================================================
// Actions
// =============================================================================

/// Move a store application to a new status and bring the owner's role and
/// seller status along with it.
#[instrument(skip(state, viewer, form), fields(status = %form.status))]
pub async fn update_store_status(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
    Form(form): Form<StoreStatusForm>,
) -> Result<Response> {
    authorize(&viewer, MANAGEMENT_PATH, &View::AdminManagement)?;

    let store = state
        .repository()
        .update_store_status(&StoreId::new(id), form.status)
        .await?;

    let (role, seller_status) = form.status.owner_standing();
    let update = IdentityUpdate {
        role: Some(role),
        seller_status: Some(seller_status),
        store_id: Some(store.store_id.clone()),
    };
    if let Err(e) = state.repository().update_user(&store.user_id, &update).await {
        tracing::warn!(
            store_id = %store.store_id,
            user_id = %store.user_id,
            error = %e,
            "Store owner missing from user list"
        );
    }

    viewer
        .flash(Flash::success(format!(
            "Store '{}' is now {}.",
            store.store_name, store.status
        )))
        .await?;
    Ok(Redirect::to(&format!("{MANAGEMENT_PATH}?tab=stores")).into_response())
}

/// Change a user's role and/or seller status. Administrators keep their role.
#[instrument(skip(state, viewer, form))]
pub async fn update_user(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
    Form(form): Form<UserEditForm>,
) -> Result<Response> {
    authorize(&viewer, MANAGEMENT_PATH, &View::AdminManagement)?;
    let users_tab = format!("{MANAGEMENT_PATH}?tab=users");

    let user_id = UserId::new(id);
    let Some(target) = state.repository().user(&user_id).await else {
        return Err(AppError::NotFound(format!("user {user_id}")));
    };

    let role = parse_field::<UserRole>(&form.role)?;
    let seller_status = parse_field::<SellerStatus>(&form.seller_status)?;

    if target.is_admin() && role.is_some_and(|r| r != UserRole::Admin) {
        viewer
            .flash(Flash::error("Administrator roles cannot be changed."))
            .await?;
        return Ok(Redirect::to(&users_tab).into_response());
    }

    let update = IdentityUpdate {
        role,
        seller_status,
        store_id: None,
    };
    let updated = state.repository().update_user(&user_id, &update).await?;
    tracing::info!(user_id = %updated.id, role = %updated.role, "User updated");

    viewer
        .flash(Flash::success(format!("Updated {}.", updated.email)))
        .await?;
    Ok(Redirect::to(&users_tab).into_response())
}

/// Parse an optional select value; blank means "leave unchanged".
fn parse_field<T>(raw: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Pay out the selected pending commissions.
#[instrument(skip(state, viewer, form))]
pub async fn payout(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<Vec<(String, String)>>,
) -> Result<Response> {
    authorize(&viewer, COMMISSIONS_PATH, &View::AdminCommissions)?;

    let ids: Vec<String> = form
        .into_iter()
        .filter(|(key, _)| key == "ids")
        .map(|(_, value)| value)
        .collect();
    if ids.is_empty() {
        viewer
            .flash(Flash::error("Select at least one pending commission."))
            .await?;
        return Ok(Redirect::to(COMMISSIONS_PATH).into_response());
    }

    let paid = state.commissions().lock().await.payout(&ids);
    tracing::info!(selected = ids.len(), paid, "Commission payout");
    viewer
        .flash(Flash::success(format!("Paid out {paid} commission(s).")))
        .await?;
    Ok(Redirect::to(COMMISSIONS_PATH).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_select_options_mark_selection() {
        let options = SelectOption::list(["INFO", "WARN", "ERROR"], Some("WARN"));
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, vec!["WARN"]);
        assert!(SelectOption::all(None).selected);
        assert!(!SelectOption::all(Some("WARN")).selected);
    }

    #[test]
    fn test_parse_field_blank_is_unchanged() {
        assert_eq!(parse_field::<UserRole>("").unwrap(), None);
        assert_eq!(parse_field::<UserRole>("SELLER").unwrap(), Some(UserRole::Seller));
        assert!(matches!(
            parse_field::<UserRole>("OWNER"),
            Err(AppError::BadRequest(_))
        ));
    }
}
