use std::path::Path;

use uuid::Uuid;

use crate::{
    cards::{Card, Rarity},
    draft::{Draft, ROUNDS, SEATS},
    error::Res,
};

/// Placeholder in a card's data that is swapped for its foil status.
pub const FOIL_MARKER: &str = "\"FOIL_STATUS\"";

pub fn resolve_foil_status(card: &Card) -> String {
    let status = if card.foil { "true" } else { "false" };
    card.data.replace(FOIL_MARKER, status)
}

#[derive(serde::Serialize)]
struct ExportCard<'a> {
    id: &'a str,
    rarity: Rarity,
    foil: bool,
    data: String,
}

#[derive(serde::Serialize)]
struct ExportSeat<'a> {
    position: usize,
    packs: Vec<Vec<ExportCard<'a>>>,
}

#[derive(serde::Serialize)]
struct ExportDraft<'a> {
    id: Uuid,
    name: &'a str,
    draft_attempts: u64,
    pack_attempts: u64,
    seats: Vec<ExportSeat<'a>>,
}

fn export<'a>(draft: &'a Draft, name: &'a str) -> ExportDraft<'a> {
    let seats = (0..SEATS)
        .map(|position| ExportSeat {
            position,
            packs: (0..ROUNDS)
                .map(|round| {
                    draft
                        .pack(position, round)
                        .iter()
                        .map(|card| ExportCard {
                            id: &card.id,
                            rarity: card.rarity,
                            foil: card.foil,
                            data: resolve_foil_status(card),
                        })
                        .collect()
                })
                .collect(),
        })
        .collect();

    ExportDraft {
        id: draft.id,
        name,
        draft_attempts: draft.draft_attempts,
        pack_attempts: draft.pack_attempts,
        seats,
    }
}

pub fn render_draft(draft: &Draft, name: &str) -> Res<String> {
    Ok(serde_json::to_string_pretty(&export(draft, name))?)
}

/// Write the draft out in one go, so a failure never leaves half a draft.
pub fn write_draft(path: &Path, draft: &Draft, name: &str) -> Res<()> {
    let raw = render_draft(draft, name)?;
    std::fs::write(path, raw)?;
    tracing::debug!("Wrote draft {} to {}.", draft.id, path.display());
    Ok(())
}
