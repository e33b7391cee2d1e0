use std::{cell::RefCell, rc::Rc};

use rand::{seq::SliceRandom, Rng};

use crate::cards::Card;

/// A hopper shared between every pack slot that draws from it.
pub type HopperRef = Rc<RefCell<Hopper>>;

/// A source of cards for one or more pack slots. Hoppers are rebuilt from
/// scratch at the beginning of every draft attempt.
pub enum Hopper {
    Normal(NormalHopper),
    BasicLand(BasicLandHopper),
    Foil(FoilHopper),
}

impl Hopper {
    pub fn shared(self) -> HopperRef {
        Rc::new(RefCell::new(self))
    }

    /// Draw the next card. `None` means the hopper has run out for this draft
    /// attempt and will keep returning `None` until it is rebuilt.
    pub fn pop<R: Rng>(&mut self, rng: &mut R) -> Option<Card> {
        match self {
            Hopper::Normal(hopper) => hopper.pop(rng),
            Hopper::BasicLand(hopper) => hopper.pop(rng),
            Hopper::Foil(hopper) => hopper.pop(rng),
        }
    }
}

/// Deals from a shuffled pile made up of every source list. A list that
/// appears twice in the sources is twice as likely to be drawn from.
pub struct NormalHopper {
    refillable: bool,
    sources: Vec<Card>,
    pool: Vec<Card>,
}

impl NormalHopper {
    pub fn new<R: Rng>(refillable: bool, sources: &[&[Card]], rng: &mut R) -> Self {
        let sources: Vec<Card> = sources.iter().flat_map(|list| list.iter().cloned()).collect();
        let mut hopper = Self {
            refillable,
            pool: Vec::with_capacity(sources.len()),
            sources,
        };
        hopper.refill(rng);
        hopper
    }

    fn refill<R: Rng>(&mut self, rng: &mut R) {
        self.pool.clone_from(&self.sources);
        self.pool.shuffle(rng);
    }

    fn pop<R: Rng>(&mut self, rng: &mut R) -> Option<Card> {
        if self.pool.is_empty() && self.refillable {
            self.refill(rng);
        }
        self.pool.pop()
    }
}

/// Picks a basic land at random each time, so it can never run out.
pub struct BasicLandHopper {
    basics: Vec<Card>,
}

impl BasicLandHopper {
    pub fn new(basics: &[Card]) -> Self {
        Self {
            basics: basics.to_vec(),
        }
    }

    fn pop<R: Rng>(&mut self, rng: &mut R) -> Option<Card> {
        self.basics.choose(rng).cloned()
    }
}

/// Either hands out a foil from its own rarity weighted pile or passes the
/// draw through to one of three other slots' hoppers.
pub struct FoilHopper {
    wrapped: [HopperRef; 3],
    foils: NormalHopper,
    chance: f64,
}

impl FoilHopper {
    pub fn new<R: Rng>(
        wrapped: [HopperRef; 3],
        foil_sources: &[&[Card]],
        chance: f64,
        rng: &mut R,
    ) -> Self {
        Self {
            wrapped,
            foils: NormalHopper::new(true, foil_sources, rng),
            chance,
        }
    }

    fn pop<R: Rng>(&mut self, rng: &mut R) -> Option<Card> {
        if !self.foils.sources.is_empty() && rng.gen_bool(self.chance) {
            return self.foils.pop(rng).map(|mut card| {
                card.foil = true;
                card
            });
        }

        let index = rng.gen_range(0..self.wrapped.len());
        self.wrapped[index].borrow_mut().pop(rng)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::{BasicLandHopper, FoilHopper, Hopper, NormalHopper};
    use crate::cards::{Card, CardSet, Rarity};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xD4AF7)
    }

    #[test]
    fn test_normal_hopper_exhausts() {
        let rng = &mut rng();
        let cards = CardSet::sample(0, 0, 0, 4);
        let mut hopper = Hopper::Normal(NormalHopper::new(false, &[&cards.commons], rng));

        let drawn: HashSet<String> = (0..4).map(|_| hopper.pop(rng).unwrap().id).collect();
        assert_eq!(drawn.len(), 4);
        assert!(hopper.pop(rng).is_none());
        assert!(hopper.pop(rng).is_none());
    }

    #[test]
    fn test_normal_hopper_weights_sources() {
        let rng = &mut rng();
        let cards = CardSet::sample(0, 3, 0, 0);
        let mut hopper = NormalHopper::new(false, &[&cards.rares, &cards.rares], rng);

        let mut drawn: Vec<String> = (0..6).map(|_| hopper.pop(rng).unwrap().id).collect();
        drawn.sort();
        drawn.dedup();
        assert_eq!(drawn.len(), 3);
        assert!(hopper.pop(rng).is_none());
    }

    #[test]
    fn test_refill_hopper_never_exhausts() {
        let rng = &mut rng();
        let cards = CardSet::sample(0, 0, 0, 3);
        let mut hopper = Hopper::Normal(NormalHopper::new(true, &[&cards.commons], rng));

        let ids: HashSet<&str> = cards.commons.iter().map(|c| c.id.as_str()).collect();
        for _ in 0..100 {
            let card = hopper.pop(rng).unwrap();
            assert!(ids.contains(card.id.as_str()));
        }
    }

    #[test]
    fn test_basic_land_hopper() {
        let rng = &mut rng();
        let cards = CardSet::sample(1, 1, 1, 1);
        let mut hopper = Hopper::BasicLand(BasicLandHopper::new(&cards.basics));

        for _ in 0..10_000 {
            let card = hopper.pop(rng).expect("basic land hopper ran out");
            assert_eq!(card.rarity, Rarity::Basic);
            assert!(cards.basics.contains(&card));
        }
    }

    #[test]
    fn test_shared_hopper_advances_together() {
        let rng = &mut rng();
        let cards = CardSet::sample(0, 0, 0, 2);
        let hopper = Hopper::Normal(NormalHopper::new(false, &[&cards.commons], rng)).shared();
        let alias = hopper.clone();

        let first = hopper.borrow_mut().pop(rng).unwrap();
        let second = alias.borrow_mut().pop(rng).unwrap();
        assert_ne!(first.id, second.id);
        assert!(hopper.borrow_mut().pop(rng).is_none());
    }

    #[test]
    fn test_foil_hopper_always_foil() {
        let rng = &mut rng();
        let cards = CardSet::sample(2, 2, 2, 2);
        let wrapped = Hopper::Normal(NormalHopper::new(false, &[], rng)).shared();
        let mut hopper = Hopper::Foil(FoilHopper::new(
            [wrapped.clone(), wrapped.clone(), wrapped],
            &[&cards.all],
            1.0,
            rng,
        ));

        for _ in 0..50 {
            let card = hopper.pop(rng).unwrap();
            assert!(card.foil);
            assert!(cards.all.iter().any(|c| c.id == card.id));
        }
    }

    #[test]
    fn test_foil_hopper_delegates() {
        let rng = &mut rng();
        let cards = CardSet::sample(2, 2, 2, 6);
        let commons = Hopper::Normal(NormalHopper::new(false, &[&cards.commons], rng)).shared();
        let mut hopper = Hopper::Foil(FoilHopper::new(
            [commons.clone(), commons.clone(), commons.clone()],
            &[&cards.all],
            0.0,
            rng,
        ));

        // With no chance of a foil every draw comes from the shared commons,
        // including running them dry.
        for _ in 0..6 {
            let card = hopper.pop(rng).unwrap();
            assert!(!card.foil);
            assert_eq!(card.rarity, Rarity::Common);
        }
        assert!(hopper.pop(rng).is_none());
        assert!(commons.borrow_mut().pop(rng).is_none());
    }

    #[test]
    fn test_foil_flag_only_on_copy() {
        let rng = &mut rng();
        let cards = CardSet::sample(0, 0, 0, 1);
        let wrapped = Hopper::BasicLand(BasicLandHopper::new(&cards.basics)).shared();
        let mut hopper = FoilHopper::new(
            [wrapped.clone(), wrapped.clone(), wrapped],
            &[&cards.commons],
            1.0,
            rng,
        );
        assert!(hopper.pop(rng).unwrap().foil);
        assert!(cards.commons.iter().all(|c: &Card| !c.foil));
    }
}
