use crate::models::Ticket;

/// C(n, k), 0 si k > n.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) est toujours divisible par (i + 1)
        acc = acc * (n - i) as u128 / (i + 1) as u128;
    }
    acc as u64
}

/// Une grille de `ticket_size` numéros vaut autant de paris de base que de
/// sous-ensembles de `ticket_min` numéros.
pub fn ticket_price(ticket_size: usize, ticket_min: usize, base_price: f64) -> f64 {
    if ticket_size < ticket_min {
        return 0.0;
    }
    binomial(ticket_size as u64, ticket_min as u64) as f64 * base_price
}

pub fn batch_cost<'a>(
    tickets: impl IntoIterator<Item = &'a Ticket>,
    ticket_min: usize,
    base_price: f64,
) -> f64 {
    tickets
        .into_iter()
        .map(|t| ticket_price(t.len(), ticket_min, base_price))
        .sum()
}

/// Probabilité approchée d'au moins un gain au premier rang : chaque
/// sous-pari est traité comme un essai de Bernoulli indépendant.
pub fn approx_top_prize_odds<'a>(
    tickets: impl IntoIterator<Item = &'a Ticket>,
    ticket_min: usize,
    target_combination_count: u64,
) -> f64 {
    if target_combination_count == 0 {
        return 0.0;
    }
    let miss: f64 = tickets
        .into_iter()
        .filter(|t| t.len() >= ticket_min)
        .map(|t| {
            let p = binomial(t.len() as u64, ticket_min as u64) as f64 / target_combination_count as f64;
            1.0 - p
        })
        .product();
    1.0 - miss
}

/// "1 sur 50.063.860", ou "N/A" quand la probabilité est nulle (lot vide).
pub fn format_odds(probability: f64) -> String {
    if probability <= 0.0 || !probability.is_finite() {
        return "N/A".to_string();
    }
    format!("1 sur {}", group_thousands((1.0 / probability).round() as u64))
}

pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    format!("R$ {},{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
