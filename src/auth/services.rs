use axum_extra::extract::cookie::{Cookie, SameSite};
use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::dto::PublicUser;
use crate::auth::gate::AuthStatus;
use crate::auth::repo::{SessionStore, UserStore};
use crate::auth::repo_types::{Role, Session, User};
use crate::config::SessionConfig;

pub const SESSION_COOKIE: &str = "session_token";
const TOKEN_LEN: usize = 48;

/// Why a request ended up unauthenticated. Clients only ever see a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthReason {
    NoToken,
    NotFound,
    Expired,
}

/// Outcome of checking a session token against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Authenticated(PublicUser),
    Unauthenticated(UnauthReason),
}

impl From<Resolution> for AuthStatus {
    fn from(r: Resolution) -> Self {
        match r {
            Resolution::Authenticated(user) => AuthStatus::Authenticated(user),
            Resolution::Unauthenticated(_) => AuthStatus::Unauthenticated,
        }
    }
}

pub async fn resolve(store: &dyn SessionStore, token: Option<&str>) -> anyhow::Result<Resolution> {
    resolve_at(store, token, OffsetDateTime::now_utc()).await
}

/// Resolves `token` as of `now`. An expired session is deleted before returning.
pub async fn resolve_at(
    store: &dyn SessionStore,
    token: Option<&str>,
    now: OffsetDateTime,
) -> anyhow::Result<Resolution> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(Resolution::Unauthenticated(UnauthReason::NoToken));
    };

    let Some(found) = store.find_with_user(token).await? else {
        debug!("session token not found");
        return Ok(Resolution::Unauthenticated(UnauthReason::NotFound));
    };

    if found.session.is_expired_at(now) {
        warn!(
            session_id = %found.session.id,
            user_id = %found.user.id,
            expired_at = %found.session.expires_at,
            "expired session, deleting"
        );
        store.delete_session(found.session.id).await?;
        return Ok(Resolution::Unauthenticated(UnauthReason::Expired));
    }

    Ok(Resolution::Authenticated(found.user.into()))
}

/// Deletes every session carrying `token`. Succeeds even when nothing matched.
pub async fn logout(store: &dyn SessionStore, token: Option<&str>) -> anyhow::Result<u64> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(0);
    };
    let removed = store.delete_sessions_by_token(token).await?;
    info!(removed, "logout");
    Ok(removed)
}

/// Opens a session for the user owning `phone`. `None` when the phone is unknown.
pub async fn login(
    users: &dyn UserStore,
    sessions: &dyn SessionStore,
    phone: &str,
    ttl: Duration,
) -> anyhow::Result<Option<(User, Session)>> {
    let Some(user) = users.find_by_phone(phone).await? else {
        warn!(phone = %phone, "login unknown phone");
        return Ok(None);
    };
    let token = generate_token();
    let session = sessions
        .create_session(&token, user.id, OffsetDateTime::now_utc() + ttl)
        .await?;
    info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
    Ok(Some((user, session)))
}

/// Makes sure a user with `phone` exists and holds the admin role.
pub async fn ensure_admin(users: &dyn UserStore, phone: &str) -> anyhow::Result<User> {
    match users.find_by_phone(phone).await? {
        Some(mut user) if user.role != Role::Admin => {
            users.set_role(user.id, Role::Admin).await?;
            user.role = Role::Admin;
            info!(user_id = %user.id, "promoted user to admin");
            Ok(user)
        }
        Some(user) => Ok(user),
        None => {
            let user = users.create_user(phone, Role::Admin).await?;
            info!(user_id = %user.id, "seeded admin user");
            Ok(user)
        }
    }
}

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Strips spaces and dashes, then checks for an optional `+` and 6-15 digits.
pub fn normalize_phone(raw: &str) -> Option<String> {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{6,15}$").unwrap();
    }
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    PHONE_RE.is_match(&cleaned).then_some(cleaned)
}

pub fn session_cookie(token: String, cfg: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(cfg.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::hours(cfg.ttl_hours))
        .build()
}

/// Cookie that tells the browser to drop the session token.
pub fn cleared_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
