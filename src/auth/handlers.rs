use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use time::Duration;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AdminLanding, LoginRequest, LogoutResponse, PublicUser, UserResponse},
        gate::{AuthStatus, GateView, RoleGate},
        repo_types::Role,
        services::{
            cleared_cookie, login as open_session, logout as close_sessions, normalize_phone,
            resolve, session_cookie, Resolution, UnauthReason, SESSION_COOKIE,
        },
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

pub fn admin_gate_routes() -> Router<AppState> {
    Router::new().route("/admin", get(admin_landing))
}

fn token_from(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_owned())
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<UserResponse>)> {
    let phone = normalize_phone(&payload.phone)
        .ok_or_else(|| AppError::BadRequest("Invalid phone number".into()))?;

    let ttl = Duration::hours(state.config.session.ttl_hours);
    let (user, session) = open_session(state.users.as_ref(), state.sessions.as_ref(), &phone, ttl)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    let jar = jar.add(session_cookie(session.token, &state.config.session));
    Ok((
        jar,
        Json(UserResponse {
            success: true,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> AppResult<Json<UserResponse>> {
    let token = token_from(&jar);
    match resolve(state.sessions.as_ref(), token.as_deref()).await? {
        Resolution::Authenticated(user) => Ok(Json(UserResponse {
            success: true,
            user,
        })),
        Resolution::Unauthenticated(UnauthReason::Expired) => Err(AppError::SessionExpired),
        Resolution::Unauthenticated(_) => Err(AppError::Unauthenticated),
    }
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<LogoutResponse>)> {
    let token = token_from(&jar);
    close_sessions(state.sessions.as_ref(), token.as_deref()).await?;
    Ok((
        jar.add(cleared_cookie()),
        Json(LogoutResponse {
            success: true,
            message: "Logged out".into(),
        }),
    ))
}

/// Only a confirmed admin gets through; every other view ends at the login page.
fn gate_user<'a>(gate: &mut RoleGate, status: &'a AuthStatus) -> Option<&'a PublicUser> {
    match gate.evaluate(status) {
        GateView::Render(user) => Some(user),
        GateView::Loading | GateView::Redirect(_) | GateView::Redirecting => None,
    }
}

/// Admin layout entry point. Redirects to the login page unless the session
/// belongs to an admin.
#[instrument(skip(state, jar))]
pub async fn admin_landing(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let token = token_from(&jar);
    let resolution = resolve(state.sessions.as_ref(), token.as_deref()).await?;
    let expired = resolution == Resolution::Unauthenticated(UnauthReason::Expired);
    let status = AuthStatus::from(resolution);

    let login_path = &state.config.session.login_path;
    let mut gate = RoleGate::new(Role::Admin, login_path.clone());
    let Some(user) = gate_user(&mut gate, &status) else {
        let redirect = Redirect::to(login_path);
        if expired {
            return Ok((jar.add(cleared_cookie()), redirect).into_response());
        }
        return Ok(redirect.into_response());
    };

    let game_count = state.games.list_games().await?.len();
    info!(user_id = %user.id, "admin landing");
    Ok(Json(AdminLanding {
        success: true,
        user: user.clone(),
        game_count,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::build_app, auth::repo::UserStore, memory::MemoryStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use time::OffsetDateTime;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn setup() -> (Arc<MemoryStore>, AppState) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::in_memory_with(
            Arc::new(crate::config::AppConfig::local()),
            store.clone(),
        );
        (store, state)
    }

    async fn add_session(store: &MemoryStore, role: Role, phone: &str, ttl: Duration) -> String {
        let user = store.create_user(phone, role).await.unwrap();
        let token = format!("tok-{}", Uuid::new_v4());
        let now = OffsetDateTime::now_utc();
        store
            .insert_session(crate::auth::repo_types::Session {
                id: Uuid::new_v4(),
                token: token.clone(),
                user_id: user.id,
                expires_at: now + ttl,
                created_at: now,
            })
            .await;
        token
    }

    fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut b = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            b = b.header("cookie", format!("{SESSION_COOKIE}={t}"));
        }
        b.body(Body::empty()).unwrap()
    }

    async fn json_body(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(res: &Response) -> String {
        res.headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn me_without_cookie_is_401() {
        let (_, state) = setup().await;
        let res = build_app(state)
            .oneshot(request("GET", "/api/auth/me", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(res).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn me_returns_public_user() {
        let (store, state) = setup().await;
        let token = add_session(&store, Role::User, "13811112222", Duration::hours(1)).await;
        let res = build_app(state)
            .oneshot(request("GET", "/api/auth/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["phone"], "13811112222");
        assert_eq!(body["user"]["role"], "user");
        let user = body["user"].as_object().unwrap();
        assert_eq!(user.len(), 3);
    }

    #[tokio::test]
    async fn me_with_expired_session_deletes_it_and_clears_cookie() {
        let (store, state) = setup().await;
        let token = add_session(&store, Role::User, "13811113333", Duration::hours(-1)).await;
        let app = build_app(state);

        let res = app
            .clone()
            .oneshot(request("GET", "/api/auth/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let cookie = set_cookie(&res);
        assert!(cookie.starts_with("session_token="));
        assert!(cookie.contains("Max-Age=0"));
        assert_eq!(store.session_count().await, 0);

        let res = app
            .oneshot(request("GET", "/api/auth/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_sets_cookie_for_known_phone() {
        let (store, state) = setup().await;
        store.create_user("13899990000", Role::User).await.unwrap();

        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"phone":"138 9999 0000"}"#))
            .unwrap();
        let res = build_app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = set_cookie(&res);
        assert!(cookie.starts_with("session_token="));
        assert!(cookie.contains("HttpOnly"));
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn login_rejects_unknown_and_malformed_phones() {
        let (_, state) = setup().await;
        let app = build_app(state);
        for (phone, status) in [
            ("13800001111", StatusCode::UNAUTHORIZED),
            ("not-a-phone", StatusCode::BAD_REQUEST),
        ] {
            let req = Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(format!(r#"{{"phone":"{phone}"}}"#)))
                .unwrap();
            let res = app.clone().oneshot(req).await.unwrap();
            assert_eq!(res.status(), status, "phone {phone}");
        }
    }

    #[tokio::test]
    async fn logout_without_session_still_succeeds() {
        let (_, state) = setup().await;
        let res = build_app(state)
            .oneshot(request("POST", "/api/auth/logout", Some("ghost")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(set_cookie(&res).contains("Max-Age=0"));
        let body = json_body(res).await;
        assert_eq!(body["success"], true);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn logout_leaves_other_sessions_alone() {
        let (store, state) = setup().await;
        let mine = add_session(&store, Role::User, "13800000001", Duration::hours(1)).await;
        let theirs = add_session(&store, Role::User, "13800000002", Duration::hours(1)).await;
        let app = build_app(state);

        let res = app
            .clone()
            .oneshot(request("POST", "/api/auth/logout", Some(&mine)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(store.session_count().await, 1);

        let res = app
            .oneshot(request("GET", "/api/auth/me", Some(&theirs)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_landing_redirects_non_admins() {
        let (store, state) = setup().await;
        let token = add_session(&store, Role::User, "13800000003", Duration::hours(1)).await;
        let app = build_app(state);

        for t in [None, Some(token.as_str())] {
            let res = app.clone().oneshot(request("GET", "/admin", t)).await.unwrap();
            assert_eq!(res.status(), StatusCode::SEE_OTHER);
            assert_eq!(res.headers()["location"], "/login");
        }
    }

    #[tokio::test]
    async fn admin_landing_with_expired_session_redirects_and_clears_cookie() {
        let (store, state) = setup().await;
        let token = add_session(&store, Role::Admin, "13800000005", Duration::hours(-1)).await;
        let res = build_app(state)
            .oneshot(request("GET", "/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(set_cookie(&res).contains("Max-Age=0"));
        assert_eq!(store.session_count().await, 0);
    }

    #[test]
    fn gate_lets_only_confirmed_admins_through() {
        let admin = PublicUser {
            id: Uuid::new_v4(),
            phone: "13800000006".into(),
            role: Role::Admin,
        };
        let mut gate = RoleGate::new(Role::Admin, "/login");
        assert!(gate_user(&mut gate, &AuthStatus::Unknown).is_none());
        assert!(gate_user(&mut gate, &AuthStatus::Unauthenticated).is_none());
        // a second denial after the redirect was issued still stays out
        assert!(gate_user(&mut gate, &AuthStatus::Unauthenticated).is_none());
        let status = AuthStatus::Authenticated(admin.clone());
        assert_eq!(gate_user(&mut gate, &status), Some(&admin));
    }

    #[tokio::test]
    async fn admin_landing_renders_for_admin() {
        let (store, state) = setup().await;
        let token = add_session(&store, Role::Admin, "13800000004", Duration::hours(1)).await;
        let res = build_app(state)
            .oneshot(request("GET", "/admin", Some(&token)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["user"]["role"], "admin");
        assert_eq!(body["game_count"], 0);
    }
}
