//! Role gating for protected views.
//!
//! The auth status starts out [`AuthStatus::Unknown`] until a session check has
//! completed. While it is unknown the gate only reports [`GateView::Loading`], so a
//! user whose session is still being resolved is never bounced to the login page.

use crate::auth::dto::PublicUser;
use crate::auth::repo_types::Role;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated(PublicUser),
    Unauthenticated,
}

/// Stateless access decision.
#[derive(Debug, PartialEq, Eq)]
pub enum Access<'a> {
    Pending,
    Denied,
    Granted(&'a PublicUser),
}

pub fn require_role(status: &AuthStatus, role: Role) -> Access<'_> {
    match status {
        AuthStatus::Unknown => Access::Pending,
        AuthStatus::Authenticated(user) if user.role == role => Access::Granted(user),
        AuthStatus::Authenticated(_) | AuthStatus::Unauthenticated => Access::Denied,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GateView<'a> {
    Loading,
    Redirect(String),
    /// A redirect was already issued; nothing further to do.
    Redirecting,
    Render(&'a PublicUser),
}

/// Layout-level gate that issues its redirect at most once.
#[derive(Debug)]
pub struct RoleGate {
    required: Role,
    login_path: String,
    redirected: bool,
}

impl RoleGate {
    pub fn new(required: Role, login_path: impl Into<String>) -> Self {
        Self {
            required,
            login_path: login_path.into(),
            redirected: false,
        }
    }

    pub fn evaluate<'a>(&mut self, status: &'a AuthStatus) -> GateView<'a> {
        match require_role(status, self.required) {
            Access::Pending => GateView::Loading,
            Access::Granted(user) => GateView::Render(user),
            Access::Denied if self.redirected => GateView::Redirecting,
            Access::Denied => {
                self.redirected = true;
                GateView::Redirect(self.login_path.clone())
            }
        }
    }
}
