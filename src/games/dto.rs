use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::games::repo_types::{Difficulty, Game};

/// Query filters for browsing and random picks.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct GameFilter {
    pub category: Option<String>,
    pub players: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub game_type_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GameListResponse {
    pub success: bool,
    pub games: Vec<Game>,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub success: bool,
    pub game: Game,
}

/// `game` is `None` when no active game matches.
#[derive(Debug, Serialize)]
pub struct RandomGameResponse {
    pub success: bool,
    pub game: Option<Game>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: usize,
}
