use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo::{SessionStore, UserStore};
use crate::auth::repo_types::{Role, Session, SessionWithUser, User};
use crate::catalog::repo::CatalogStore;
use crate::catalog::repo_types::{CatalogEntry, CatalogInput, CatalogKind};
use crate::games::repo::GameStore;
use crate::games::repo_types::{Game, GameInput};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: Vec<Session>,
    games: Vec<Game>,
    catalog: HashMap<CatalogKind, Vec<CatalogEntry>>,
}

/// In-process store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session row as-is, expired or not.
    #[cfg(test)]
    pub async fn insert_session(&self, session: Session) {
        self.tables.write().await.sessions.push(session);
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.tables.read().await.sessions.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.phone == phone).cloned())
    }

    async fn create_user(&self, phone: &str, role: Role) -> anyhow::Result<User> {
        let mut t = self.tables.write().await;
        anyhow::ensure!(
            !t.users.values().any(|u| u.phone == phone),
            "phone {phone} already registered"
        );
        let user = User {
            id: Uuid::new_v4(),
            phone: phone.to_string(),
            role,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()> {
        if let Some(u) = self.tables.write().await.users.get_mut(&id) {
            u.role = role;
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_with_user(&self, token: &str) -> anyhow::Result<Option<SessionWithUser>> {
        let t = self.tables.read().await;
        let found = t.sessions.iter().find(|s| s.token == token).and_then(|s| {
            t.users.get(&s.user_id).map(|u| SessionWithUser {
                session: s.clone(),
                user: u.clone(),
            })
        });
        Ok(found)
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            token: token.to_string(),
            user_id,
            expires_at,
            created_at: OffsetDateTime::now_utc(),
        };
        self.tables.write().await.sessions.push(session.clone());
        Ok(session)
    }

    async fn delete_session(&self, id: Uuid) -> anyhow::Result<u64> {
        let mut t = self.tables.write().await;
        let before = t.sessions.len();
        t.sessions.retain(|s| s.id != id);
        Ok((before - t.sessions.len()) as u64)
    }

    async fn delete_sessions_by_token(&self, token: &str) -> anyhow::Result<u64> {
        let mut t = self.tables.write().await;
        let before = t.sessions.len();
        t.sessions.retain(|s| s.token != token);
        Ok((before - t.sessions.len()) as u64)
    }
}

fn game_from_input(id: Uuid, input: &GameInput, created_at: OffsetDateTime) -> Game {
    Game {
        id,
        name: input.name.clone(),
        name_en: input.name_en.clone(),
        category: input.category.clone(),
        min_players: input.min_players,
        max_players: input.max_players,
        difficulty: input.difficulty,
        duration: input.duration.clone(),
        materials: input.materials.clone(),
        image: input.image.clone(),
        is_active: input.is_active,
        score: input.score,
        game_type_id: input.game_type_id,
        dataset_ids: input.dataset_ids.clone(),
        created_at,
        updated_at: OffsetDateTime::now_utc(),
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn list_games(&self) -> anyhow::Result<Vec<Game>> {
        Ok(self.tables.read().await.games.clone())
    }

    async fn find_game(&self, id: Uuid) -> anyhow::Result<Option<Game>> {
        let t = self.tables.read().await;
        Ok(t.games.iter().find(|g| g.id == id).cloned())
    }

    async fn create_game(&self, input: &GameInput) -> anyhow::Result<Game> {
        let game = game_from_input(Uuid::new_v4(), input, OffsetDateTime::now_utc());
        self.tables.write().await.games.push(game.clone());
        Ok(game)
    }

    async fn create_games(&self, inputs: &[GameInput]) -> anyhow::Result<Vec<Game>> {
        let now = OffsetDateTime::now_utc();
        let games: Vec<Game> = inputs
            .iter()
            .map(|input| game_from_input(Uuid::new_v4(), input, now))
            .collect();
        self.tables.write().await.games.extend(games.iter().cloned());
        Ok(games)
    }

    async fn update_game(&self, id: Uuid, input: &GameInput) -> anyhow::Result<Option<Game>> {
        let mut t = self.tables.write().await;
        let Some(slot) = t.games.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        *slot = game_from_input(id, input, slot.created_at);
        Ok(Some(slot.clone()))
    }

    async fn delete_game(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        let before = t.games.len();
        t.games.retain(|g| g.id != id);
        Ok(t.games.len() < before)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_entries(&self, kind: CatalogKind) -> anyhow::Result<Vec<CatalogEntry>> {
        let t = self.tables.read().await;
        let mut entries = t.catalog.get(&kind).cloned().unwrap_or_default();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn create_entry(
        &self,
        kind: CatalogKind,
        input: &CatalogInput,
    ) -> anyhow::Result<CatalogEntry> {
        let entry = CatalogEntry {
            id: Uuid::new_v4(),
            kind,
            name: input.name.clone(),
            name_en: input.name_en.clone(),
            description: input.description.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        self.tables
            .write()
            .await
            .catalog
            .entry(kind)
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        kind: CatalogKind,
        id: Uuid,
        input: &CatalogInput,
    ) -> anyhow::Result<Option<CatalogEntry>> {
        let mut t = self.tables.write().await;
        let Some(entry) = t
            .catalog
            .get_mut(&kind)
            .and_then(|v| v.iter_mut().find(|e| e.id == id))
        else {
            return Ok(None);
        };
        entry.name = input.name.clone();
        entry.name_en = input.name_en.clone();
        entry.description = input.description.clone();
        Ok(Some(entry.clone()))
    }

    async fn delete_entry(&self, kind: CatalogKind, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        let Some(entries) = t.catalog.get_mut(&kind) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() < before)
    }
}
