use std::collections::HashMap;

use super::{stats::ColourTally, Pack};
use crate::{
    cards::{Card, Colours, Rarity},
    config::Settings,
};

/// Checks a single pack against the per-pack rules. Reasons for rejection are
/// logged at debug level.
pub struct PackValidator<'a> {
    settings: &'a Settings,
}

impl<'a> PackValidator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn check(&self, pack: &[Card]) -> bool {
        let settings = self.settings;
        let mut passes = true;

        let mut seen: HashMap<&str, u32> = HashMap::new();
        let mut uncommon_identities: HashMap<&Colours, u32> = HashMap::new();
        let mut colours = ColourTally::default();
        let mut identities = ColourTally::default();
        let mut ratings = Vec::new();

        for card in pack {
            if !card.counts_for_balance(settings.dfc_mode) {
                continue;
            }

            let copies = seen.entry(card.id.as_str()).or_default();
            *copies += 1;
            if *copies > 1 {
                tracing::debug!("Found duplicated card {}.", card.id);
                passes = false;
            }

            match card.rarity {
                Rarity::Common => {
                    colours.add(&card.colour);
                    identities.add(&card.colour_identity);
                    ratings.push(card.rating);
                }
                Rarity::Uncommon if settings.abort_duplicate_three_color_identity_uncommons => {
                    let count = uncommon_identities
                        .entry(&card.colour_identity)
                        .or_default();
                    *count += 1;
                    if *count > 1 && card.colour_identity.len() == 3 {
                        tracing::debug!(
                            "Found more than one {} uncommon.",
                            card.colour_identity
                        );
                        passes = false;
                    }
                    if *count >= 3 {
                        tracing::debug!("Three uncommons are {}.", card.colour_identity);
                        passes = false;
                    }
                }
                _ => {}
            }
        }

        if settings.abort_missing_common_color && !colours.all_present() {
            tracing::debug!("A colour is missing among commons.");
            passes = false;
        }
        if settings.abort_missing_common_color_identity && !identities.all_present() {
            tracing::debug!("A colour identity is missing among commons.");
            passes = false;
        }

        let colour_stdev = colours.stdev(settings.abort_missing_common_color);
        let identity_stdev = identities.stdev(settings.abort_missing_common_color_identity);
        let rating_mean = super::stats::mean(&ratings);
        tracing::debug!(
            "Colour stdev: {colour_stdev:?}, colour identity stdev: {identity_stdev:?}, \
             rating mean: {rating_mean:?}."
        );

        if exceeds(colour_stdev, settings.pack_common_color_stdev_max) {
            tracing::debug!("Colour stdev too high.");
            passes = false;
        }
        if exceeds(identity_stdev, settings.pack_common_color_identity_stdev_max) {
            tracing::debug!("Colour identity stdev too high.");
            passes = false;
        }

        // The minimum is only consulted when no maximum is configured.
        if let Some(mean) = rating_mean {
            if settings.pack_common_rating_max != 0.0 {
                if mean > settings.pack_common_rating_max {
                    tracing::debug!("Rating mean too high.");
                    passes = false;
                }
            } else if settings.pack_common_rating_min != 0.0
                && mean < settings.pack_common_rating_min
            {
                tracing::debug!("Rating mean too low.");
                passes = false;
            }
        }

        if passes {
            tracing::debug!("Pack passes.");
        } else {
            tracing::debug!("Pack fails.");
        }
        passes
    }
}

/// Checks the whole set of packs against the draft wide copy limits and colour
/// balance rules.
pub struct DraftValidator<'a> {
    settings: &'a Settings,
}

impl<'a> DraftValidator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Maximum copies of a single card of this rarity, zero for no limit.
    fn copy_limit(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Mythic => self.settings.max_mythic,
            Rarity::Rare => self.settings.max_rare,
            Rarity::Uncommon => self.settings.max_uncommon,
            Rarity::Common => self.settings.max_common,
            Rarity::Basic => 0,
        }
    }

    pub fn check(&self, packs: &[Pack]) -> bool {
        tracing::debug!("Analysing entire draft pool.");
        let settings = self.settings;
        let mut passes = true;

        let mut copies: HashMap<&str, u32> = HashMap::new();
        let mut most_copies: HashMap<Rarity, u32> = HashMap::new();
        let mut colours = ColourTally::default();
        let mut identities = ColourTally::default();

        for card in packs.iter().flatten() {
            let count = copies.entry(card.id.as_str()).or_default();
            *count += 1;
            let count = *count;

            let most = most_copies.entry(card.rarity).or_default();
            *most = (*most).max(count);

            let limit = self.copy_limit(card.rarity);
            if limit != 0 && count > limit {
                tracing::debug!(
                    "Found {count} copies of {} {}, more than {limit}.",
                    card.rarity,
                    card.id
                );
                passes = false;
            }

            if card.rarity == Rarity::Common && card.counts_for_balance(settings.dfc_mode) {
                colours.add(&card.colour);
                identities.add(&card.colour_identity);
            }
        }

        let colour_stdev = colours.stdev(false);
        let identity_stdev = identities.stdev(false);
        tracing::debug!("Most copies of a single card by rarity: {most_copies:?}.");
        tracing::debug!("All commons colour stdev: {colour_stdev:?} {colours}.");
        tracing::debug!("All commons colour identity stdev: {identity_stdev:?} {identities}.");

        if exceeds(colour_stdev, settings.draft_common_color_stdev_max) {
            tracing::debug!("Draft colour stdev too high.");
            passes = false;
        }
        if exceeds(identity_stdev, settings.draft_common_color_identity_stdev_max) {
            tracing::debug!("Draft colour identity stdev too high.");
            passes = false;
        }

        if passes {
            tracing::debug!("Draft passes.");
        } else {
            tracing::debug!("Draft fails.");
        }
        passes
    }
}

/// Whether a statistic breaks a maximum. A zero maximum is disabled and an
/// empty statistic never breaks anything.
fn exceeds(value: Option<f64>, max: f64) -> bool {
    max != 0.0 && value.is_some_and(|v| v > max)
}
