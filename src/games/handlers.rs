use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::{AdminUser, CurrentUser},
    error::{AppError, AppResult},
    state::AppState,
};

use super::dto::{
    DeletedResponse, GameFilter, GameListResponse, GameResponse, ImportResponse,
    RandomGameResponse,
};
use super::repo_types::{Game, GameInput};
use super::selector::select_random_game_by_weight;
use super::services::{browse, validate_game_input};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games))
        .route("/games/random", get(random_game))
        .route("/games/:id", get(get_game))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/games", get(admin_list_games).post(create_game))
        .route("/admin/games/export", get(export_games))
        .route("/admin/games/import", post(import_games))
        .route("/admin/games/:id", put(update_game).delete(delete_game))
}

// --- handlers ---

#[instrument(skip(state, _user))]
pub async fn list_games(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<GameFilter>,
) -> AppResult<Json<GameListResponse>> {
    let games = browse(state.games.list_games().await?, &filter);
    Ok(Json(GameListResponse {
        success: true,
        games,
    }))
}

#[instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn random_game(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<GameFilter>,
) -> AppResult<Json<RandomGameResponse>> {
    let candidates = browse(state.games.list_games().await?, &filter);
    let game = select_random_game_by_weight(&candidates).cloned();
    match &game {
        Some(g) => info!(game_id = %g.id, candidates = candidates.len(), "game selected"),
        None => info!("no candidate games"),
    }
    Ok(Json(RandomGameResponse {
        success: true,
        game,
    }))
}

#[instrument(skip(state, _user))]
pub async fn get_game(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<GameResponse>> {
    let game = state.games.find_game(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(GameResponse {
        success: true,
        game,
    }))
}

#[instrument(skip(state, _admin))]
pub async fn admin_list_games(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<GameListResponse>> {
    Ok(Json(GameListResponse {
        success: true,
        games: state.games.list_games().await?,
    }))
}

#[instrument(skip(state, admin, input), fields(admin_id = %admin.0.id))]
pub async fn create_game(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<GameInput>,
) -> AppResult<(StatusCode, Json<GameResponse>)> {
    let input = validate_game_input(input)?;
    let game = state.games.create_game(&input).await?;
    info!(game_id = %game.id, name = %game.name, "game created");
    Ok((
        StatusCode::CREATED,
        Json(GameResponse {
            success: true,
            game,
        }),
    ))
}

#[instrument(skip(state, admin, input), fields(admin_id = %admin.0.id))]
pub async fn update_game(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(input): Json<GameInput>,
) -> AppResult<Json<GameResponse>> {
    let input = validate_game_input(input)?;
    let game = state
        .games
        .update_game(id, &input)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(game_id = %game.id, "game updated");
    Ok(Json(GameResponse {
        success: true,
        game,
    }))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.id))]
pub async fn delete_game(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletedResponse>> {
    if !state.games.delete_game(id).await? {
        return Err(AppError::NotFound);
    }
    info!(game_id = %id, "game deleted");
    Ok(Json(DeletedResponse { success: true, id }))
}

#[instrument(skip(state, _admin))]
pub async fn export_games(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Game>>> {
    Ok(Json(state.games.list_games().await?))
}

/// Every input is validated first, then all of them are written in one batch.
#[instrument(skip(state, admin, inputs), fields(admin_id = %admin.0.id))]
pub async fn import_games(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(inputs): Json<Vec<GameInput>>,
) -> AppResult<Json<ImportResponse>> {
    let validated = inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            validate_game_input(input)
                .map_err(|e| AppError::BadRequest(format!("game #{}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let imported = state.games.create_games(&validated).await?.len();
    info!(imported, "games imported");
    Ok(Json(ImportResponse {
        success: true,
        imported,
    }))
}
