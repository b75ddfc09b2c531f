use anyhow::Context;
use async_trait::async_trait;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::db::PgStore;
use crate::games::repo_types::{Game, GameInput, GameRow};

#[async_trait]
pub trait GameStore: Send + Sync {
    /// All games in catalog order, inactive ones included.
    async fn list_games(&self) -> anyhow::Result<Vec<Game>>;
    async fn find_game(&self, id: Uuid) -> anyhow::Result<Option<Game>>;
    async fn create_game(&self, input: &GameInput) -> anyhow::Result<Game>;
    /// Inserts every input or none of them.
    async fn create_games(&self, inputs: &[GameInput]) -> anyhow::Result<Vec<Game>>;
    async fn update_game(&self, id: Uuid, input: &GameInput) -> anyhow::Result<Option<Game>>;
    async fn delete_game(&self, id: Uuid) -> anyhow::Result<bool>;
}

async fn insert_game<'e, E>(ex: E, input: &GameInput) -> anyhow::Result<Game>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, GameRow>(&format!(
        r#"
        INSERT INTO games (id, name, name_en, category, min_players, max_players, difficulty,
                           duration, materials, image, is_active, score, game_type_id, dataset_ids)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {GAME_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.name_en)
    .bind(&input.category)
    .bind(input.min_players)
    .bind(input.max_players)
    .bind(input.difficulty.as_str())
    .bind(&input.duration)
    .bind(&input.materials)
    .bind(&input.image)
    .bind(input.is_active)
    .bind(input.score)
    .bind(input.game_type_id)
    .bind(&input.dataset_ids)
    .fetch_one(ex)
    .await
    .context("insert game")?;
    row.try_into()
}

const GAME_COLUMNS: &str = "id, name, name_en, category, min_players, max_players, difficulty, \
     duration, materials, image, is_active, score, game_type_id, dataset_ids, created_at, updated_at";

#[async_trait]
impl GameStore for PgStore {
    async fn list_games(&self) -> anyhow::Result<Vec<Game>> {
        let rows = sqlx::query_as::<_, GameRow>(&format!(
            "SELECT {GAME_COLUMNS} FROM games ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.db)
        .await
        .context("list games")?;
        rows.into_iter().map(Game::try_from).collect()
    }

    async fn find_game(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
        let row = sqlx::query_as::<_, GameRow>(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find game")?;
        row.map(Game::try_from).transpose()
    }

    async fn create_game(&self, input: &GameInput) -> anyhow::Result<Game> {
        insert_game(&self.db, input).await
    }

    async fn create_games(&self, inputs: &[GameInput]) -> anyhow::Result<Vec<Game>> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let mut games = Vec::with_capacity(inputs.len());
        for input in inputs {
            games.push(insert_game(&mut *tx, input).await?);
        }
        tx.commit().await.context("commit tx")?;
        Ok(games)
    }

    async fn update_game(&self, id: Uuid, input: &GameInput) -> anyhow::Result<Option<Game>> {
        let row = sqlx::query_as::<_, GameRow>(&format!(
            r#"
            UPDATE games
               SET name = $2, name_en = $3, category = $4, min_players = $5, max_players = $6,
                   difficulty = $7, duration = $8, materials = $9, image = $10, is_active = $11,
                   score = $12, game_type_id = $13, dataset_ids = $14, updated_at = now()
             WHERE id = $1
            RETURNING {GAME_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.name_en)
        .bind(&input.category)
        .bind(input.min_players)
        .bind(input.max_players)
        .bind(input.difficulty.as_str())
        .bind(&input.duration)
        .bind(&input.materials)
        .bind(&input.image)
        .bind(input.is_active)
        .bind(input.score)
        .bind(input.game_type_id)
        .bind(&input.dataset_ids)
        .fetch_optional(&self.db)
        .await
        .context("update game")?;
        row.map(Game::try_from).transpose()
    }

    async fn delete_game(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete game")?;
        Ok(res.rows_affected() > 0)
    }
}
