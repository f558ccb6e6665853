//! Error types

use super::{CardId, Rank};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("deck has {0} cards")]
    IncompleteDeck(usize),
    #[error("each side must be dealt {expect} cards, got {player} and {cpu}")]
    UnevenDeal {
        expect: usize,
        player: usize,
        cpu: usize,
    },
    #[error("duplicate card id {0}")]
    DuplicateCard(CardId),
    #[error("rank {rank} appears {count} times")]
    RankCount { rank: Rank, count: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("autoplay interval must be positive")]
    ZeroInterval,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
