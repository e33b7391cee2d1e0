use rand::Rng;

use super::{
    hopper::HopperRef,
    slots::{SlotDef, SlotPlan},
    validate::{DraftValidator, PackValidator},
    Draft, Pack, PACKS_PER_DRAFT,
};
use crate::{
    cards::Pools,
    config::Settings,
    error::{DraftError, Res},
};

enum Step {
    /// Rebuild every hopper and throw away any packs drawn so far.
    Reset,
    /// Draw pack `i` from the hoppers as they stand.
    Draw(usize),
    ValidatePack(usize, Pack),
    ValidateDraft,
}

/// Draws packs from the slot hoppers and keeps redrawing until a whole draft
/// satisfies the configured rules.
pub struct Generator<'a> {
    plan: SlotPlan<'a>,
    pack_validator: PackValidator<'a>,
    draft_validator: DraftValidator<'a>,
    settings: &'a Settings,
}

impl<'a> Generator<'a> {
    pub fn new(settings: &'a Settings, pools: &'a Pools, slots: Vec<SlotDef>) -> Res<Self> {
        Ok(Self {
            plan: SlotPlan::new(slots, pools, settings.foil_chance)?,
            pack_validator: PackValidator::new(settings),
            draft_validator: DraftValidator::new(settings),
            settings,
        })
    }

    /// Run until a draft passes. A failed pack is redrawn from the same
    /// hoppers; a hopper running dry or a failed draft starts over with fresh
    /// hoppers. Fails only when one of the attempt limits is reached.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Res<Draft> {
        let mut hoppers: Vec<HopperRef> = Vec::new();
        let mut packs: Vec<Pack> = Vec::with_capacity(PACKS_PER_DRAFT);
        let mut draft_attempts: u64 = 0;
        let mut pack_attempts: u64 = 0;

        let infeasible = |draft_attempts, pack_attempts| DraftError::Infeasible {
            draft_attempts,
            pack_attempts,
        };

        let mut step = Step::Reset;
        loop {
            step = match step {
                Step::Reset => {
                    if limit_reached(draft_attempts, self.settings.max_draft_attempts) {
                        return Err(infeasible(draft_attempts, pack_attempts));
                    }
                    draft_attempts += 1;
                    hoppers = self.plan.build(rng);
                    packs.clear();
                    Step::Draw(0)
                }
                Step::Draw(i) => {
                    if limit_reached(pack_attempts, self.settings.max_pack_attempts) {
                        return Err(infeasible(draft_attempts, pack_attempts));
                    }
                    pack_attempts += 1;
                    match draw_pack(&hoppers, rng) {
                        Some(pack) => Step::ValidatePack(i, pack),
                        None => {
                            tracing::debug!("Ran out of cards drawing pack {i}, resetting draft.");
                            Step::Reset
                        }
                    }
                }
                Step::ValidatePack(i, pack) => {
                    for card in &pack {
                        tracing::debug!("{}\t{}\t{}", card.rarity, card.foil, card.data);
                    }

                    if !self.pack_validator.check(&pack) {
                        Step::Draw(i)
                    } else {
                        packs.push(pack);
                        if packs.len() == PACKS_PER_DRAFT {
                            Step::ValidateDraft
                        } else {
                            Step::Draw(i + 1)
                        }
                    }
                }
                Step::ValidateDraft => {
                    if self.draft_validator.check(&packs) {
                        tracing::info!(
                            "Found draft after {draft_attempts} draft attempts and \
                             {pack_attempts} pack attempts."
                        );
                        let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
                        return Ok(Draft {
                            id,
                            packs,
                            draft_attempts,
                            pack_attempts,
                        });
                    }
                    tracing::debug!("Resetting draft.");
                    Step::Reset
                }
            };
        }
    }
}

/// Zero means no limit.
fn limit_reached(count: u64, max: u64) -> bool {
    max != 0 && count >= max
}

/// One card from each slot in order, or `None` as soon as a hopper is empty.
fn draw_pack<R: Rng>(hoppers: &[HopperRef], rng: &mut R) -> Option<Pack> {
    hoppers
        .iter()
        .map(|hopper| hopper.borrow_mut().pop(rng))
        .collect()
}
