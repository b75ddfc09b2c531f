use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod extractors;
pub mod gate;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

/// Routes mounted under `/api`.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// UI-facing routes mounted at the root.
pub fn gate_router() -> Router<AppState> {
    handlers::admin_gate_routes()
}
