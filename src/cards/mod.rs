use std::fmt::{Debug, Display};

use crate::error::{DraftError, Res};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Mythic,
    Rare,
    Uncommon,
    Common,
    Basic,
}

impl Rarity {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "mythic" => Some(Rarity::Mythic),
            "rare" => Some(Rarity::Rare),
            "uncommon" => Some(Rarity::Uncommon),
            "common" => Some(Rarity::Common),
            "basic" => Some(Rarity::Basic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Mythic => "mythic",
            Rarity::Rare => "rare",
            Rarity::Uncommon => "uncommon",
            Rarity::Common => "common",
            Rarity::Basic => "basic",
        }
    }
}

impl Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Colour {
    W,
    U,
    B,
    R,
    G,
}

impl Colour {
    pub const ALL: [Colour; 5] = [Colour::W, Colour::U, Colour::B, Colour::R, Colour::G];

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'W' => Some(Colour::W),
            'U' => Some(Colour::U),
            'B' => Some(Colour::B),
            'R' => Some(Colour::R),
            'G' => Some(Colour::G),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A set of colour symbols, kept sorted in WUBRG order so that two cards of the
/// same colours compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Colours(Vec<Colour>);

impl Colours {
    fn parse(card: &str, symbols: &str) -> Res<Self> {
        let mut colours = Vec::new();
        for symbol in symbols.chars() {
            match Colour::from_symbol(symbol) {
                Some(colour) => colours.push(colour),
                None => {
                    return Err(DraftError::UnknownColour {
                        card: card.to_string(),
                        symbol,
                    })
                }
            }
        }
        colours.sort();
        colours.dedup();
        Ok(Self(colours))
    }

    pub fn iter(&self) -> impl Iterator<Item = Colour> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Display for Colours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for colour in &self.0 {
            write!(f, "{colour:?}")?;
        }
        Ok(())
    }
}

/// A card as listed in a set file, before its rarity and colours are checked.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct CardEntry {
    pub id: String,
    pub rarity: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, alias = "colorIdentity")]
    pub color_identity: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub dfc: bool,
    #[serde(default)]
    pub data: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: String,
    pub rarity: Rarity,
    pub colour: Colours,
    pub colour_identity: Colours,
    pub rating: f64,
    pub foil: bool,
    pub dfc: bool,
    /// Opaque payload, carried through to the output untouched apart from the
    /// foil marker.
    pub data: String,
}

impl Card {
    pub fn from_entry(entry: CardEntry) -> Res<Self> {
        let Some(rarity) = Rarity::from_label(&entry.rarity) else {
            return Err(DraftError::UnknownRarity {
                card: entry.id,
                rarity: entry.rarity,
            });
        };

        Ok(Self {
            colour: Colours::parse(&entry.id, &entry.color)?,
            colour_identity: Colours::parse(&entry.id, &entry.color_identity)?,
            id: entry.id,
            rarity,
            rating: entry.rating,
            foil: false,
            dfc: entry.dfc,
            data: entry.data,
        })
    }

    /// Whether this card counts towards duplicate and colour balance checks.
    /// Foils never do, DFCs don't when they have their own hoppers.
    pub fn counts_for_balance(&self, dfc_mode: bool) -> bool {
        !(self.foil || (dfc_mode && self.dfc))
    }

    #[cfg(test)]
    pub fn sample(rarity: Rarity) -> Self {
        static ID: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(1);

        let id = ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let colour = Colours(vec![Colour::ALL[id % 5]]);
        Self {
            id: format!("card-{id}"),
            rarity,
            colour: colour.clone(),
            colour_identity: colour,
            rating: 3.0,
            foil: false,
            dfc: false,
            data: format!("{{\"id\": {id}, \"foil\": \"FOIL_STATUS\"}}"),
        }
    }

    #[cfg(test)]
    pub fn with_colours(mut self, colours: &str, identity: &str) -> Self {
        self.colour = Colours::parse(&self.id, colours).unwrap();
        self.colour_identity = Colours::parse(&self.id, identity).unwrap();
        self
    }
}

/// Cards bucketed by rarity. `all` holds every card regardless of rarity.
#[derive(Clone, Default)]
pub struct CardSet {
    pub mythics: Vec<Card>,
    pub rares: Vec<Card>,
    pub uncommons: Vec<Card>,
    pub commons: Vec<Card>,
    pub basics: Vec<Card>,
    pub all: Vec<Card>,
}

impl CardSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, card: Card) {
        self.all.push(card.clone());
        match card.rarity {
            Rarity::Mythic => self.mythics.push(card),
            Rarity::Rare => self.rares.push(card),
            Rarity::Uncommon => self.uncommons.push(card),
            Rarity::Common => self.commons.push(card),
            Rarity::Basic => self.basics.push(card),
        }
    }

    pub fn size(&self) -> usize {
        self.all.len()
    }

    #[cfg(test)]
    pub fn sample(mythics: usize, rares: usize, uncommons: usize, commons: usize) -> Self {
        let mut set = Self::new();
        for _ in 0..mythics {
            set.add(Card::sample(Rarity::Mythic));
        }
        for _ in 0..rares {
            set.add(Card::sample(Rarity::Rare));
        }
        for _ in 0..uncommons {
            set.add(Card::sample(Rarity::Uncommon));
        }
        for _ in 0..commons {
            set.add(Card::sample(Rarity::Common));
        }
        for colour in ["W", "U", "B", "R", "G"] {
            set.add(Card::sample(Rarity::Basic).with_colours("", colour));
        }
        set
    }
}

impl Debug for CardSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CardSet {{ mythics: {}, rares: {}, uncommons: {}, commons: {}, basics: {} }}",
            self.mythics.len(),
            self.rares.len(),
            self.uncommons.len(),
            self.commons.len(),
            self.basics.len()
        )
    }
}

/// The main card pool, plus the double-faced cards split out of it when
/// `dfc_mode` is on.
#[derive(Debug, Default)]
pub struct Pools {
    pub main: CardSet,
    pub dfc: CardSet,
}

/// Sort catalog entries into rarity buckets. Any entry with a rarity or
/// colour that can't be understood aborts the whole run.
pub fn partition(entries: Vec<CardEntry>, dfc_mode: bool) -> Res<Pools> {
    let mut pools = Pools::default();
    for entry in entries {
        let card = Card::from_entry(entry)?;
        if dfc_mode && card.dfc {
            pools.dfc.add(card);
        } else {
            pools.main.add(card);
        }
    }

    tracing::debug!("Partitioned {} cards: {:?}", pools.main.size(), pools.main);
    if dfc_mode {
        tracing::debug!("Split out {} DFCs: {:?}", pools.dfc.size(), pools.dfc);
    }
    Ok(pools)
}

#[cfg(test)]
mod test {
    use super::{partition, CardEntry, Colour, Rarity};
    use crate::error::DraftError;

    fn entry(id: &str, rarity: &str, dfc: bool) -> CardEntry {
        CardEntry {
            id: id.to_string(),
            rarity: rarity.to_string(),
            color: "GW".to_string(),
            color_identity: "GWU".to_string(),
            rating: 2.5,
            dfc,
            data: String::new(),
        }
    }

    #[test]
    fn test_partition_buckets() {
        let entries = vec![
            entry("a", "mythic", false),
            entry("b", "rare", false),
            entry("c", "uncommon", false),
            entry("d", "common", false),
            entry("e", "common", false),
            entry("f", "basic", false),
        ];
        let pools = partition(entries, false).unwrap();
        assert_eq!(pools.main.mythics.len(), 1);
        assert_eq!(pools.main.rares.len(), 1);
        assert_eq!(pools.main.uncommons.len(), 1);
        assert_eq!(pools.main.commons.len(), 2);
        assert_eq!(pools.main.basics.len(), 1);
        assert_eq!(pools.main.size(), 6);
        assert_eq!(pools.dfc.size(), 0);
    }

    #[test]
    fn test_partition_dfc_mode() {
        let entries = vec![
            entry("a", "common", true),
            entry("b", "common", false),
            entry("c", "rare", true),
        ];

        let pools = partition(entries.clone(), true).unwrap();
        assert_eq!(pools.main.commons.len(), 1);
        assert!(pools.main.rares.is_empty());
        assert_eq!(pools.dfc.commons.len(), 1);
        assert_eq!(pools.dfc.rares.len(), 1);

        // Without DFC mode, DFCs are ordinary cards.
        let pools = partition(entries, false).unwrap();
        assert_eq!(pools.main.size(), 3);
        assert_eq!(pools.dfc.size(), 0);
    }

    #[test]
    fn test_partition_unknown_rarity() {
        let entries = vec![entry("a", "common", false), entry("b", "special", false)];
        match partition(entries, false) {
            Err(DraftError::UnknownRarity { card, rarity }) => {
                assert_eq!(card, "b");
                assert_eq!(rarity, "special");
            }
            other => panic!("expected unknown rarity, got {other:?}"),
        }
    }

    #[test]
    fn test_colours_sorted_and_deduplicated() {
        let pools = partition(vec![entry("a", "common", false)], false).unwrap();
        let card = &pools.main.commons[0];
        assert_eq!(
            card.colour_identity.iter().collect::<Vec<_>>(),
            vec![Colour::W, Colour::U, Colour::G]
        );
        assert_eq!(card.colour.to_string(), "WG");
        assert_eq!(card.rarity, Rarity::Common);
    }

    #[test]
    fn test_unknown_colour() {
        let mut bad = entry("a", "common", false);
        bad.color = "WX".to_string();
        assert!(matches!(
            partition(vec![bad], false),
            Err(DraftError::UnknownColour { symbol: 'X', .. })
        ));
    }
}
