use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Access level of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Unknown values map to the least privileged role.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub phone: String,
    pub role: String,
    pub created_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            phone: r.phone,
            role: Role::parse(&r.role),
            created_at: r.created_at,
        }
    }
}

/// Session record. The token is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl Session {
    /// A session is valid only while `expires_at` is strictly in the future.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Session joined with its owning user.
#[derive(Debug, Clone)]
pub struct SessionWithUser {
    pub session: Session,
    pub user: User,
}

#[derive(Debug, FromRow)]
pub struct SessionWithUserRow {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub phone: String,
    pub role: String,
    pub user_created_at: OffsetDateTime,
}

impl From<SessionWithUserRow> for SessionWithUser {
    fn from(r: SessionWithUserRow) -> Self {
        Self {
            user: User {
                id: r.user_id,
                phone: r.phone,
                role: Role::parse(&r.role),
                created_at: r.user_created_at,
            },
            session: Session {
                id: r.id,
                token: r.token,
                user_id: r.user_id,
                expires_at: r.expires_at,
                created_at: r.created_at,
            },
        }
    }
}
