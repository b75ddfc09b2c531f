use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Game record as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub name: String,                // primary locale
    pub name_en: Option<String>,     // secondary locale
    pub category: String,
    pub min_players: i32,
    pub max_players: i32,
    pub difficulty: Difficulty,
    pub duration: String,
    pub materials: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,     // absent counts as active
    pub score: Option<f64>,          // selection weight
    pub game_type_id: Option<Uuid>,
    #[serde(default)]
    pub dataset_ids: Vec<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Game {
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }
}

#[derive(Debug, FromRow)]
pub struct GameRow {
    pub id: Uuid,
    pub name: String,
    pub name_en: Option<String>,
    pub category: String,
    pub min_players: i32,
    pub max_players: i32,
    pub difficulty: String,
    pub duration: String,
    pub materials: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub score: Option<f64>,
    pub game_type_id: Option<Uuid>,
    pub dataset_ids: Option<Vec<Uuid>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<GameRow> for Game {
    type Error = anyhow::Error;

    fn try_from(r: GameRow) -> Result<Self, Self::Error> {
        let difficulty = Difficulty::parse(&r.difficulty)
            .ok_or_else(|| anyhow::anyhow!("game {} has unknown difficulty {:?}", r.id, r.difficulty))?;
        Ok(Self {
            id: r.id,
            name: r.name,
            name_en: r.name_en,
            category: r.category,
            min_players: r.min_players,
            max_players: r.max_players,
            difficulty,
            duration: r.duration,
            materials: r.materials,
            image: r.image,
            is_active: r.is_active,
            score: r.score,
            game_type_id: r.game_type_id,
            dataset_ids: r.dataset_ids.unwrap_or_default(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Writable fields of a game, used for create, update and import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInput {
    pub name: String,
    pub name_en: Option<String>,
    pub category: String,
    pub min_players: i32,
    pub max_players: i32,
    pub difficulty: Difficulty,
    pub duration: String,
    pub materials: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    pub score: Option<f64>,
    pub game_type_id: Option<Uuid>,
    #[serde(default)]
    pub dataset_ids: Vec<Uuid>,
}
