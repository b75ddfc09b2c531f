use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Reference lists administered next to the games.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    #[serde(rename = "categories")]
    Category,
    #[serde(rename = "game-types")]
    GameType,
    #[serde(rename = "items")]
    Item,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Category => "categories",
            CatalogKind::GameType => "game_types",
            CatalogKind::Item => "items",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub kind: CatalogKind,
    pub name: String,
    pub name_en: Option<String>,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct CatalogRow {
    pub id: Uuid,
    pub name: String,
    pub name_en: Option<String>,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

impl CatalogRow {
    pub fn into_entry(self, kind: CatalogKind) -> CatalogEntry {
        CatalogEntry {
            id: self.id,
            kind,
            name: self.name,
            name_en: self.name_en,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogInput {
    pub name: String,
    pub name_en: Option<String>,
    pub description: Option<String>,
}
