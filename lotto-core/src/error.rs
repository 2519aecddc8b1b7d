use thiserror::Error;

/// Erreurs de configuration, levées avant toute génération ou filtrage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Règles de jeu invalides : {0}")]
    InvalidSpec(String),

    #[error("{label} : numéro {number} hors limites (1-{universe})")]
    OutOfRange {
        label: &'static str,
        number: u8,
        universe: u8,
    },

    #[error("{label} : numéro en double ({number})")]
    Duplicate { label: &'static str, number: u8 },

    #[error("Numéro illisible : '{0}'")]
    InvalidNumber(String),

    #[error("Conflit fixes/interdits : {0:?}")]
    FixedForbiddenConflict(Vec<u8>),

    #[error("{label} : minimum {min} > maximum {max}")]
    InvalidBounds {
        label: &'static str,
        min: u32,
        max: u32,
    },

    #[error("Taille de grille {size} hors limites ({min}-{max})")]
    TicketSizeOutOfRange { size: usize, min: usize, max: usize },

    #[error("Limite de suite {0} invalide (minimum 2)")]
    InvalidRunLimit(usize),

    #[error("{fixed} numéros fixes pour des grilles de {size} numéros")]
    TooManyFixed { fixed: usize, size: usize },

    #[error("{count} grilles demandées (maximum {max} par stratégie)")]
    CountTooLarge { count: usize, max: usize },
}
