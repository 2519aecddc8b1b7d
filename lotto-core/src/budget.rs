use crate::models::{GameInfo, GameSpec};
use crate::pricing::ticket_price;

pub const DEFAULT_BATCH_COUNT: usize = 10;
pub const MAX_BATCH_COUNT: usize = 500;

/// Coupe le lot à la première grille qui ferait dépasser le budget.
/// Pas de réordonnancement ; budget <= 0 : aucune contrainte.
pub fn apply_budget(games: Vec<GameInfo>, spec: &GameSpec, budget: f64) -> Vec<GameInfo> {
    if budget <= 0.0 {
        return games;
    }

    let mut spent = 0.0f64;
    let mut kept = Vec::with_capacity(games.len());
    for game in games {
        let price = ticket_price(game.ticket.len(), spec.ticket_min, spec.base_price);
        if spent + price > budget {
            break;
        }
        spent += price;
        kept.push(game);
    }
    kept
}

/// Nombre de grilles d'un même prix tenant dans le budget, borné à 1..=500.
pub fn tickets_within_budget(budget: f64, price: f64) -> usize {
    if budget <= 0.0 || price <= 0.0 {
        return DEFAULT_BATCH_COUNT;
    }
    ((budget / price).floor() as usize).clamp(1, MAX_BATCH_COUNT)
}
