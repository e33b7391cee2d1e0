use rand::Rng;

use super::{
    hopper::{BasicLandHopper, FoilHopper, Hopper, HopperRef, NormalHopper},
    PACK_SIZE,
};
use crate::{
    cards::{Card, CardSet, Pools},
    error::{DraftError, Res},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub enum SlotKind {
    RareHopper,
    RareRefillHopper,
    UncommonHopper,
    UncommonRefillHopper,
    CommonHopper,
    CommonRefillHopper,
    BasicLandHopper,
    CubeHopper,
    DfcHopper,
    DfcRefillHopper,
    FoilHopper,
    Pointer,
}

impl SlotKind {
    pub fn name(self) -> &'static str {
        match self {
            SlotKind::RareHopper => "RareHopper",
            SlotKind::RareRefillHopper => "RareRefillHopper",
            SlotKind::UncommonHopper => "UncommonHopper",
            SlotKind::UncommonRefillHopper => "UncommonRefillHopper",
            SlotKind::CommonHopper => "CommonHopper",
            SlotKind::CommonRefillHopper => "CommonRefillHopper",
            SlotKind::BasicLandHopper => "BasicLandHopper",
            SlotKind::CubeHopper => "CubeHopper",
            SlotKind::DfcHopper => "DfcHopper",
            SlotKind::DfcRefillHopper => "DfcRefillHopper",
            SlotKind::FoilHopper => "FoilHopper",
            SlotKind::Pointer => "Pointer",
        }
    }

    /// Number of earlier slots this kind of slot refers to.
    fn ref_count(self) -> usize {
        match self {
            SlotKind::Pointer => 1,
            SlotKind::FoilHopper => 3,
            _ => 0,
        }
    }

    fn refillable(self) -> bool {
        matches!(
            self,
            SlotKind::RareRefillHopper
                | SlotKind::UncommonRefillHopper
                | SlotKind::CommonRefillHopper
                | SlotKind::DfcRefillHopper
        )
    }
}

/// One pack slot as written in a set file.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct SlotDef {
    #[serde(rename = "type")]
    pub kind: SlotKind,
    #[serde(default)]
    pub refs: Vec<usize>,
}

#[cfg(test)]
impl SlotDef {
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            refs: Vec::new(),
        }
    }

    pub fn with_refs(kind: SlotKind, refs: &[usize]) -> Self {
        Self {
            kind,
            refs: refs.to_vec(),
        }
    }
}

/// Source lists for a shuffled hopper, repeated to weight rarities. `None`
/// for kinds that aren't plain shuffled hoppers.
fn normal_sources(kind: SlotKind, pools: &Pools) -> Option<Vec<&[Card]>> {
    let main = &pools.main;
    let dfc = &pools.dfc;
    let sources: Vec<&[Card]> = match kind {
        SlotKind::RareHopper | SlotKind::RareRefillHopper => {
            vec![&main.mythics[..], &main.rares[..], &main.rares[..]]
        }
        SlotKind::UncommonHopper | SlotKind::UncommonRefillHopper => {
            vec![&main.uncommons[..], &main.uncommons[..]]
        }
        SlotKind::CommonHopper | SlotKind::CommonRefillHopper => {
            vec![&main.commons[..], &main.commons[..]]
        }
        SlotKind::CubeHopper => vec![&main.all[..]],
        SlotKind::DfcHopper | SlotKind::DfcRefillHopper => {
            let mut sources = vec![&dfc.mythics[..]];
            sources.extend(std::iter::repeat(dfc.rares.as_slice()).take(2));
            sources.extend(std::iter::repeat(dfc.uncommons.as_slice()).take(6));
            sources.extend(std::iter::repeat(dfc.commons.as_slice()).take(11));
            sources
        }
        SlotKind::BasicLandHopper | SlotKind::FoilHopper | SlotKind::Pointer => return None,
    };
    Some(sources)
}

/// Foils are weighted roughly like a real booster's foil slot: four commons
/// and four basics for every three uncommons, two rares and one mythic.
fn foil_sources(set: &CardSet) -> Vec<&[Card]> {
    let mut sources = vec![&set.mythics[..]];
    sources.extend(std::iter::repeat(set.rares.as_slice()).take(2));
    sources.extend(std::iter::repeat(set.uncommons.as_slice()).take(3));
    sources.extend(std::iter::repeat(set.commons.as_slice()).take(4));
    sources.extend(std::iter::repeat(set.basics.as_slice()).take(4));
    sources
}

/// A checked list of pack slots, ready to be turned into live hoppers at the
/// start of each draft attempt.
pub struct SlotPlan<'a> {
    slots: Vec<SlotDef>,
    pools: &'a Pools,
    foil_chance: f64,
}

impl<'a> SlotPlan<'a> {
    pub fn new(slots: Vec<SlotDef>, pools: &'a Pools, foil_chance: f64) -> Res<Self> {
        if slots.len() != PACK_SIZE {
            return Err(DraftError::SlotCount {
                expected: PACK_SIZE,
                found: slots.len(),
            });
        }

        for (i, slot) in slots.iter().enumerate() {
            let expected = slot.kind.ref_count();
            if slot.refs.len() != expected {
                return Err(DraftError::RefCount {
                    slot: i,
                    kind: slot.kind.name(),
                    expected,
                    found: slot.refs.len(),
                });
            }

            // Slots are built in order, so a slot can only refer back.
            if let Some(&target) = slot.refs.iter().find(|&&r| r >= i) {
                return Err(DraftError::BadRef { slot: i, target });
            }

            let empty = match slot.kind {
                SlotKind::BasicLandHopper => pools.main.basics.is_empty(),
                kind => normal_sources(kind, pools)
                    .is_some_and(|sources| sources.iter().all(|s| s.is_empty())),
            };
            if empty {
                return Err(DraftError::EmptyPool {
                    slot: i,
                    kind: slot.kind.name(),
                });
            }
        }

        Ok(Self {
            slots,
            pools,
            foil_chance,
        })
    }

    /// Build a fresh set of hoppers, one handle per slot. Pointer slots share
    /// the handle of the slot they point at.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Vec<HopperRef> {
        let mut hoppers: Vec<HopperRef> = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let hopper = match slot.kind {
                SlotKind::Pointer => hoppers[slot.refs[0]].clone(),
                SlotKind::BasicLandHopper => {
                    Hopper::BasicLand(BasicLandHopper::new(&self.pools.main.basics)).shared()
                }
                SlotKind::FoilHopper => {
                    let wrapped = [0, 1, 2].map(|n| hoppers[slot.refs[n]].clone());
                    let foils = foil_sources(&self.pools.main);
                    Hopper::Foil(FoilHopper::new(wrapped, &foils, self.foil_chance, rng)).shared()
                }
                kind => {
                    let sources = normal_sources(kind, self.pools).unwrap_or_default();
                    Hopper::Normal(NormalHopper::new(kind.refillable(), &sources, rng)).shared()
                }
            };
            hoppers.push(hopper);
        }
        hoppers
    }
}

/// A typical booster: a rare, three uncommons from one hopper, ten commons
/// from another and a basic land.
#[cfg(test)]
pub fn standard_slots() -> Vec<SlotDef> {
    let mut slots = vec![
        SlotDef::new(SlotKind::RareRefillHopper),
        SlotDef::new(SlotKind::UncommonRefillHopper),
        SlotDef::with_refs(SlotKind::Pointer, &[1]),
        SlotDef::with_refs(SlotKind::Pointer, &[1]),
        SlotDef::new(SlotKind::CommonRefillHopper),
    ];
    for _ in 0..9 {
        slots.push(SlotDef::with_refs(SlotKind::Pointer, &[4]));
    }
    slots.push(SlotDef::new(SlotKind::BasicLandHopper));
    slots
}
