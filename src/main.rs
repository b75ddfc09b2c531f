mod app;
mod auth;
mod catalog;
mod config;
mod db;
mod error;
mod games;
mod memory;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "partypick=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    if let Some(phone) = app_state.config.admin_phone.as_deref() {
        match auth::services::normalize_phone(phone) {
            Some(phone) => {
                auth::services::ensure_admin(app_state.users.as_ref(), &phone).await?;
            }
            None => tracing::warn!(phone = %phone, "ADMIN_PHONE is not a valid phone number; skipping seed"),
        }
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}
