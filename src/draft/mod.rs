use uuid::Uuid;

use crate::cards::Card;

pub mod generate;
pub mod hopper;
pub mod slots;
pub mod stats;
pub mod validate;

/// Cards in a pack, and so hopper slots in a set file.
pub const PACK_SIZE: usize = 15;
pub const SEATS: usize = 8;
pub const ROUNDS: usize = 3;
pub const PACKS_PER_DRAFT: usize = SEATS * ROUNDS;

pub type Pack = Vec<Card>;

/// A full set of packs that passed every check, along with how much work it
/// took to find.
#[derive(Debug)]
pub struct Draft {
    pub id: Uuid,
    pub packs: Vec<Pack>,
    pub draft_attempts: u64,
    pub pack_attempts: u64,
}

impl Draft {
    /// The pack opened by a seat in a round. Seats open consecutive packs.
    pub fn pack(&self, seat: usize, round: usize) -> &Pack {
        &self.packs[seat * ROUNDS + round]
    }
}
