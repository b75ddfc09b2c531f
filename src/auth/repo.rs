use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{Role, Session, SessionWithUser, SessionWithUserRow, User, UserRow};
use crate::db::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, phone: &str, role: Role) -> anyhow::Result<User>;
    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks up a session by token, joined with its owning user.
    async fn find_with_user(&self, token: &str) -> anyhow::Result<Option<SessionWithUser>>;
    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<Session>;
    /// Deletes one session if it still exists. Returns the number of rows removed.
    async fn delete_session(&self, id: Uuid) -> anyhow::Result<u64>;
    /// Deletes every session carrying `token`.
    async fn delete_sessions_by_token(&self, token: &str) -> anyhow::Result<u64>;
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_phone(&self, phone: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, phone, role, created_at
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.db)
        .await
        .context("find user by phone")?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, phone: &str, role: Role) -> anyhow::Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, phone, role)
            VALUES ($1, $2, $3)
            RETURNING id, phone, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(phone)
        .bind(role.as_str())
        .fetch_one(&self.db)
        .await
        .context("create user")?;
        Ok(row.into())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role.as_str())
            .execute(&self.db)
            .await
            .context("update user role")?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn find_with_user(&self, token: &str) -> anyhow::Result<Option<SessionWithUser>> {
        let row = sqlx::query_as::<_, SessionWithUserRow>(
            r#"
            SELECT s.id, s.token, s.user_id, s.expires_at, s.created_at,
                   u.phone, u.role, u.created_at AS user_created_at
              FROM sessions s
              JOIN users u ON u.id = s.user_id
             WHERE s.token = $1
             LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .context("find session by token")?;
        Ok(row.map(SessionWithUser::from))
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<Session> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, token, user_id, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, token, user_id, expires_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await
        .context("create session")?;
        Ok(session)
    }

    async fn delete_session(&self, id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete session")?;
        Ok(res.rows_affected())
    }

    async fn delete_sessions_by_token(&self, token: &str) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await
            .context("delete sessions by token")?;
        Ok(res.rows_affected())
    }
}
