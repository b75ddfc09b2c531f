use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AdminUser,
    error::{AppError, AppResult},
    state::AppState,
};

use super::dto::{EntryListResponse, EntryResponse};
use super::repo_types::{CatalogInput, CatalogKind};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/catalog/:kind", get(list_entries).post(create_entry))
        .route(
            "/admin/catalog/:kind/:id",
            axum::routing::put(update_entry).delete(delete_entry),
        )
}

#[instrument(skip(state, _admin))]
pub async fn list_entries(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(kind): Path<CatalogKind>,
) -> AppResult<Json<EntryListResponse>> {
    Ok(Json(EntryListResponse {
        success: true,
        entries: state.catalog.list_entries(kind).await?,
    }))
}

#[instrument(skip(state, _admin, input))]
pub async fn create_entry(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(kind): Path<CatalogKind>,
    Json(input): Json<CatalogInput>,
) -> AppResult<(StatusCode, Json<EntryResponse>)> {
    let input = input.validated()?;
    let entry = state.catalog.create_entry(kind, &input).await?;
    info!(kind = kind.table(), id = %entry.id, "catalog entry created");
    Ok((
        StatusCode::CREATED,
        Json(EntryResponse {
            success: true,
            entry,
        }),
    ))
}

#[instrument(skip(state, _admin, input))]
pub async fn update_entry(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((kind, id)): Path<(CatalogKind, Uuid)>,
    Json(input): Json<CatalogInput>,
) -> AppResult<Json<EntryResponse>> {
    let input = input.validated()?;
    let entry = state
        .catalog
        .update_entry(kind, id, &input)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(EntryResponse {
        success: true,
        entry,
    }))
}

#[instrument(skip(state, _admin))]
pub async fn delete_entry(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((kind, id)): Path<(CatalogKind, Uuid)>,
) -> AppResult<StatusCode> {
    if !state.catalog.delete_entry(kind, id).await? {
        return Err(AppError::NotFound);
    }
    info!(kind = kind.table(), %id, "catalog entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::build_app,
        auth::{repo::UserStore, repo_types::{Role, Session}},
        memory::MemoryStore,
    };
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use time::{Duration, OffsetDateTime};
    use tower::ServiceExt;

    async fn admin_app() -> (Router, String) {
        let store = Arc::new(MemoryStore::new());
        let admin = store.create_user("13800000020", Role::Admin).await.unwrap();
        let now = OffsetDateTime::now_utc();
        store
            .insert_session(Session {
                id: Uuid::new_v4(),
                token: "admin-tok".into(),
                user_id: admin.id,
                expires_at: now + Duration::hours(1),
                created_at: now,
            })
            .await;
        let state =
            AppState::in_memory_with(Arc::new(crate::config::AppConfig::local()), store);
        (build_app(state), "admin-tok".into())
    }

    fn request(method: &str, uri: &str, token: &str, body: Option<&str>) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("cookie", format!("session_token={token}"))
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap()
    }

    #[tokio::test]
    async fn categories_crud() {
        let (app, token) = admin_app().await;

        let res = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/admin/catalog/categories",
                &token,
                Some(r#"{"name":" Drinking ","name_en":"Drinking"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["entry"]["name"], "Drinking");
        assert_eq!(body["entry"]["kind"], "categories");
        let id = body["entry"]["id"].as_str().unwrap().to_string();

        let res = app
            .clone()
            .oneshot(request("GET", "/api/admin/catalog/game-types", &token, None))
            .await
            .unwrap();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["entries"].as_array().unwrap().is_empty());

        let res = app
            .clone()
            .oneshot(request(
                "PUT",
                &format!("/api/admin/catalog/categories/{id}"),
                &token,
                Some(r#"{"name":"Cards"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/admin/catalog/categories/{id}"),
                &token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = app
            .oneshot(request(
                "DELETE",
                &format!("/api/admin/catalog/categories/{id}"),
                &token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let (app, token) = admin_app().await;
        let res = app
            .oneshot(request("GET", "/api/admin/catalog/widgets", &token, None))
            .await
            .unwrap();
        assert!(res.status().is_client_error());
    }

    #[tokio::test]
    async fn empty_name_is_bad_request() {
        let (app, token) = admin_app().await;
        let res = app
            .oneshot(request(
                "POST",
                "/api/admin/catalog/items",
                &token,
                Some(r#"{"name":"   "}"#),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
