use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("unrecognised rarity {rarity:?} for card {card}")]
    UnknownRarity { card: String, rarity: String },
    #[error("unrecognised colour symbol {symbol:?} for card {card}")]
    UnknownColour { card: String, symbol: char },
    #[error("expected {expected} hopper slots, found {found}")]
    SlotCount { expected: usize, found: usize },
    #[error("slot {slot}: {kind} takes {expected} reference(s), found {found}")]
    RefCount {
        slot: usize,
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("slot {slot} references slot {target}, which is not built before it")]
    BadRef { slot: usize, target: usize },
    #[error("slot {slot}: {kind} has no cards to draw from")]
    EmptyPool { slot: usize, kind: &'static str },
    #[error(
        "no valid draft found after {draft_attempts} draft attempts ({pack_attempts} pack attempts)"
    )]
    Infeasible {
        draft_attempts: u64,
        pack_attempts: u64,
    },
    #[error("{0}")]
    Flag(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Res<T> = Result<T, DraftError>;

pub fn flag_err<T, S: ToString>(message: S) -> Res<T> {
    Err(DraftError::Flag(message.to_string()))
}
