use crate::error::AppError;
use crate::games::dto::GameFilter;
use crate::games::repo_types::{Game, GameInput};

impl GameFilter {
    pub fn matches(&self, game: &Game) -> bool {
        if let Some(category) = &self.category {
            if &game.category != category {
                return false;
            }
        }
        if let Some(n) = self.players {
            if n < game.min_players || n > game.max_players {
                return false;
            }
        }
        if let Some(d) = self.difficulty {
            if game.difficulty != d {
                return false;
            }
        }
        if let Some(t) = self.game_type_id {
            if game.game_type_id != Some(t) {
                return false;
            }
        }
        true
    }
}

/// Active games that pass `filter`, in catalog order.
pub fn browse(games: Vec<Game>, filter: &GameFilter) -> Vec<Game> {
    games
        .into_iter()
        .filter(|g| g.is_active() && filter.matches(g))
        .collect()
}

/// Trims text fields and rejects inconsistent input.
pub fn validate_game_input(mut input: GameInput) -> Result<GameInput, AppError> {
    input.name = input.name.trim().to_string();
    input.category = input.category.trim().to_string();
    input.duration = input.duration.trim().to_string();
    input.name_en = input
        .name_en
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if input.name.is_empty() {
        return Err(AppError::BadRequest("Game name is required".into()));
    }
    if input.category.is_empty() {
        return Err(AppError::BadRequest("Category is required".into()));
    }
    if input.min_players < 1 {
        return Err(AppError::BadRequest("min_players must be at least 1".into()));
    }
    if input.max_players < input.min_players {
        return Err(AppError::BadRequest(
            "max_players must not be less than min_players".into(),
        ));
    }
    if let Some(score) = input.score {
        if !score.is_finite() || score < 0.0 {
            return Err(AppError::BadRequest(
                "score must be a non-negative number".into(),
            ));
        }
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::repo_types::Difficulty;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn input() -> GameInput {
        GameInput {
            name: "  Charades ".into(),
            name_en: Some("   ".into()),
            category: "acting".into(),
            min_players: 3,
            max_players: 12,
            difficulty: Difficulty::Easy,
            duration: "15 min".into(),
            materials: None,
            image: None,
            is_active: None,
            score: None,
            game_type_id: None,
            dataset_ids: vec![],
        }
    }

    fn game(category: &str, min: i32, max: i32, difficulty: Difficulty, active: Option<bool>) -> Game {
        let now = OffsetDateTime::now_utc();
        Game {
            id: Uuid::new_v4(),
            name: "g".into(),
            name_en: None,
            category: category.into(),
            min_players: min,
            max_players: max,
            difficulty,
            duration: "5 min".into(),
            materials: None,
            image: None,
            is_active: active,
            score: None,
            game_type_id: None,
            dataset_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn validation_trims_and_accepts() {
        let v = validate_game_input(input()).unwrap();
        assert_eq!(v.name, "Charades");
        assert_eq!(v.name_en, None);
    }

    #[test]
    fn validation_rejects_bad_player_bounds() {
        let mut i = input();
        i.min_players = 0;
        assert!(matches!(validate_game_input(i), Err(AppError::BadRequest(_))));

        let mut i = input();
        i.max_players = 2;
        assert!(matches!(validate_game_input(i), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn validation_accepts_zero_score_but_not_negative() {
        let mut i = input();
        i.score = Some(0.0);
        assert!(validate_game_input(i).is_ok());

        let mut i = input();
        i.score = Some(-1.0);
        assert!(validate_game_input(i).is_err());

        let mut i = input();
        i.score = Some(f64::INFINITY);
        assert!(validate_game_input(i).is_err());
    }

    #[test]
    fn browse_drops_inactive_and_filters() {
        let games = vec![
            game("acting", 3, 10, Difficulty::Easy, None),
            game("acting", 2, 4, Difficulty::Hard, Some(true)),
            game("acting", 2, 10, Difficulty::Easy, Some(false)),
            game("words", 2, 6, Difficulty::Medium, None),
        ];

        assert_eq!(browse(games.clone(), &GameFilter::default()).len(), 3);

        let f = GameFilter {
            category: Some("acting".into()),
            players: Some(5),
            ..Default::default()
        };
        let hits = browse(games.clone(), &f);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].min_players, 3);

        let f = GameFilter {
            difficulty: Some(Difficulty::Medium),
            ..Default::default()
        };
        assert_eq!(browse(games, &f)[0].category, "words");
    }
}
