use std::collections::HashSet;

use crate::error::ConfigError;

/// Table fixe, utilisée telle quelle pour toutes les variantes (y compris 1-25).
pub const PRIMES_UP_TO_60: [u8; 17] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59];

pub fn is_prime(n: u8) -> bool {
    PRIMES_UP_TO_60.contains(&n)
}

pub fn count_evens(numbers: &[u8]) -> usize {
    numbers.iter().filter(|&&n| n % 2 == 0).count()
}

/// (pairs, impairs)
pub fn even_odd(numbers: &[u8]) -> (usize, usize) {
    let evens = count_evens(numbers);
    (evens, numbers.len() - evens)
}

/// (bas, hauts) : bas = 1..=threshold
pub fn low_high(numbers: &[u8], threshold: u8) -> (usize, usize) {
    let lows = numbers.iter().filter(|&&n| (1..=threshold).contains(&n)).count();
    (lows, numbers.len() - lows)
}

pub fn count_primes(numbers: &[u8]) -> usize {
    numbers.iter().filter(|&&n| is_prime(n)).count()
}

/// Vrai si la grille triée contient `limit` entiers consécutifs ou plus.
pub fn has_long_run(numbers: &[u8], limit: usize) -> bool {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();

    let mut current = 1;
    for w in sorted.windows(2) {
        if w[0].checked_add(1) == Some(w[1]) {
            current += 1;
            if current >= limit {
                return true;
            }
        } else {
            current = 1;
        }
    }
    false
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Lit une liste saisie ("10, 11 12;13"). Les doublons sont ignorés, l'ordre
/// de saisie est conservé, les jetons non numériques sont ignorés.
pub fn parse_number_list(text: &str) -> Result<Vec<u8>, ConfigError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for token in text.split(|c: char| c == ',' || c == ';' || c.is_whitespace()) {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        let n: u8 = token
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(token.to_string()))?;
        if seen.insert(n) {
            out.push(n);
        }
    }
    Ok(out)
}

/// Numéros dans 1..=universe_size et sans doublon.
pub fn validate_numbers(numbers: &[u8], universe_size: u8, label: &'static str) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for &n in numbers {
        if !seen.insert(n) {
            return Err(ConfigError::Duplicate { label, number: n });
        }
        if n < 1 || n > universe_size {
            return Err(ConfigError::OutOfRange {
                label,
                number: n,
                universe: universe_size,
            });
        }
    }
    Ok(())
}
