//! Authentication route handlers.
//!
//! Login is a mock: any well-formed email logs in with the chosen role and
//! no credential check. The identity is upserted into the user list so that
//! administrators can see and edit it.

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use blife_core::routing::DASHBOARD_PATH;
use blife_core::{Email, Identity, LogEvent, LogSource, UserRole};

use crate::error::{Result, breadcrumb, report_identity};
use crate::middleware::Viewer;
use crate::models::Flash;
use crate::state::AppState;

use super::pages::Page;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data. The password field is accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page with the demo role picker and the registration form.
#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub roles: &'static [UserRole],
}

#[derive(Template)]
#[template(path = "pages/registration_success.html")]
pub struct RegistrationSuccessTemplate;

/// # Errors
///
/// Returns an error if the template fails to render.
pub fn login_page() -> Result<Page> {
    Page::render(
        "Login",
        &LoginTemplate {
            roles: UserRole::ALL,
        },
    )
}

/// # Errors
///
/// Returns an error if the template fails to render.
pub fn registration_success_page() -> Result<Page> {
    Page::render("Account Created", &RegistrationSuccessTemplate)
}

// =============================================================================
// Actions
// =============================================================================

/// Sign `email` in as `role`: record the identity, log it, and attach it to
/// the session.
async fn sign_in(
    state: &AppState,
    viewer: &mut Viewer,
    email: Email,
    role: UserRole,
) -> Result<Identity> {
    let identity = Identity::mock_login(email, role, state.next_login_millis());

    state.repository().upsert_user(&identity).await;
    state
        .repository()
        .log_event(LogEvent::info(
            LogSource::Auth,
            format!("User '{}' logged in as {}.", identity.email, identity.role),
        ))
        .await;

    report_identity(Some(&identity));
    breadcrumb("auth", "Logged in", &[("role", identity.role.as_str())]);
    viewer.set_identity(identity.clone()).await?;

    tracing::info!(user_id = %identity.id, role = %identity.role, "User logged in");
    Ok(identity)
}

/// Handle the login form.
#[instrument(skip(state, viewer, form), fields(role = %form.role))]
pub async fn login(
    State(state): State<AppState>,
    mut viewer: Viewer,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let Ok(email) = Email::parse(&form.email) else {
        viewer
            .flash(Flash::error("Please enter a valid email address."))
            .await?;
        return Ok(Redirect::to("/login").into_response());
    };

    sign_in(&state, &mut viewer, email, form.role).await?;
    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}

/// Handle the registration form: a customer login under a new identity.
#[instrument(skip(state, viewer, form))]
pub async fn register(
    State(state): State<AppState>,
    mut viewer: Viewer,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if form.full_name.trim().is_empty() {
        viewer.flash(Flash::error("Please enter your full name.")).await?;
        return Ok(Redirect::to("/login").into_response());
    }
    let Ok(email) = Email::parse(&form.email) else {
        viewer
            .flash(Flash::error("Please enter a valid email address."))
            .await?;
        return Ok(Redirect::to("/login").into_response());
    };

    sign_in(&state, &mut viewer, email, UserRole::Customer).await?;
    Ok(Redirect::to("/registration-success").into_response())
}

/// Log out. The cart stays with the session.
#[instrument(skip(state, viewer))]
pub async fn logout(State(state): State<AppState>, mut viewer: Viewer) -> Result<Response> {
    if let Some(email) = viewer.identity().map(|identity| identity.email.clone()) {
        state
            .repository()
            .log_event(LogEvent::info(
                LogSource::Auth,
                format!("User '{email}' logged out."),
            ))
            .await;
        tracing::info!("User logged out");
    }

    viewer.clear_identity().await?;
    report_identity(None);
    Ok(Redirect::to("/").into_response())
}
