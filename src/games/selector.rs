//! Weighted random game selection.
//!
//! Each active game is picked with probability `weight / total_weight`, where the
//! weight is the game's score when it is a positive finite number and
//! [`DEFAULT_WEIGHT`] otherwise. A score of zero therefore weighs the same as a
//! missing one.

use rand::Rng;

use crate::games::repo_types::Game;

pub const DEFAULT_WEIGHT: f64 = 5.0;

pub fn weight_of(game: &Game) -> f64 {
    match game.score {
        Some(score) if score.is_finite() && score > 0.0 => score,
        _ => DEFAULT_WEIGHT,
    }
}

/// Picks one active game using the thread-local random source.
pub fn select_random_game_by_weight(games: &[Game]) -> Option<&Game> {
    select_random_game_by_weight_with(games, &mut rand::thread_rng())
}

/// Picks one active game using `rng`. Returns `None` when no game is active.
pub fn select_random_game_by_weight_with<'a, R: Rng>(
    games: &'a [Game],
    rng: &mut R,
) -> Option<&'a Game> {
    let active: Vec<&Game> = games.iter().filter(|g| g.is_active()).collect();
    let first = *active.first()?;

    // Weights are scaled by the largest one so the sum stays finite for any
    // finite scores. Shares are unchanged.
    let largest = active.iter().map(|g| weight_of(g)).fold(0.0, f64::max);
    let scaled = |g: &Game| weight_of(g) / largest;

    let total: f64 = active.iter().map(|&g| scaled(g)).sum();
    let mut remaining = rng.gen::<f64>() * total;

    for &game in &active {
        remaining -= scaled(game);
        if remaining <= 0.0 {
            return Some(game);
        }
    }

    // Only reachable through float rounding.
    Some(first)
}
