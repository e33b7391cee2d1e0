use std::path::{Path, PathBuf};

use crate::{
    cards::CardEntry,
    draft::slots::SlotDef,
    error::{flag_err, Res},
};

pub const USAGE: &str = "Usage: makedraft [-set <file>] [-output <file>] [-seed <n>] [-v] \
[-simulate] [-name <name>] [-max-mythic <n>] [-max-rare <n>] [-max-uncommon <n>] \
[-max-common <n>] [-pack-common-color-stdev-max <x>] \
[-pack-common-color-identity-stdev-max <x>] [-pack-common-rating-min <x>] \
[-pack-common-rating-max <x>] [-draft-common-color-stdev-max <x>] \
[-draft-common-color-identity-stdev-max <x>] [-dfc-mode] [-abort-missing-common-color] \
[-abort-missing-common-color-identity] [-abort-duplicate-three-color-identity-uncommons] \
[-foil-chance <p>] [-max-draft-attempts <n>] [-max-pack-attempts <n>]";

/// Every option for a run. Numeric thresholds of zero disable the rule they
/// control.
#[derive(Clone, Debug)]
pub struct Settings {
    pub set: PathBuf,
    pub output: PathBuf,
    /// Random seed. Zero seeds from entropy.
    pub seed: i64,
    pub verbose: bool,
    /// Generate without writing the draft out.
    pub simulate: bool,
    pub name: String,

    pub max_mythic: u32,
    pub max_rare: u32,
    pub max_uncommon: u32,
    pub max_common: u32,

    pub pack_common_color_stdev_max: f64,
    pub pack_common_color_identity_stdev_max: f64,
    pub pack_common_rating_min: f64,
    pub pack_common_rating_max: f64,
    pub draft_common_color_stdev_max: f64,
    pub draft_common_color_identity_stdev_max: f64,

    pub dfc_mode: bool,
    pub abort_missing_common_color: bool,
    pub abort_missing_common_color_identity: bool,
    pub abort_duplicate_three_color_identity_uncommons: bool,

    /// Probability that a foil hopper produces a foil rather than deferring
    /// to one of the hoppers it wraps.
    pub foil_chance: f64,
    pub max_draft_attempts: u64,
    pub max_pack_attempts: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            set: PathBuf::from("sets/cube.json"),
            output: PathBuf::from("draft.json"),
            seed: 0,
            verbose: false,
            simulate: false,
            name: "untitled draft".to_string(),
            max_mythic: 2,
            max_rare: 3,
            max_uncommon: 4,
            max_common: 6,
            pack_common_color_stdev_max: 0.0,
            pack_common_color_identity_stdev_max: 0.0,
            pack_common_rating_min: 0.0,
            pack_common_rating_max: 0.0,
            draft_common_color_stdev_max: 0.0,
            draft_common_color_identity_stdev_max: 0.0,
            dfc_mode: false,
            abort_missing_common_color: false,
            abort_missing_common_color_identity: false,
            abort_duplicate_three_color_identity_uncommons: false,
            foil_chance: 1.0 / 3.0,
            max_draft_attempts: 100_000,
            max_pack_attempts: 10_000_000,
        }
    }
}

impl Settings {
    /// Apply a list of flags in the style of Go's flag package: `-name value`,
    /// `-name=value`, either with one or two dashes, and bare booleans. A lone
    /// `--` ends the flags.
    pub fn apply_flags<I: IntoIterator<Item = String>>(&mut self, args: I) -> Res<()> {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--" {
                return match args.next() {
                    Some(extra) => flag_err(format!("Unexpected argument: {extra}")),
                    None => Ok(()),
                };
            }

            let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
                return flag_err(format!("Unexpected argument: {arg}"));
            };

            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (flag, None),
            };

            if let Some(target) = self.bool_flag(name) {
                *target = match inline {
                    Some(value) => parse_bool(name, value)?,
                    None => true,
                };
                continue;
            }

            let value = match inline {
                Some(value) => value.to_string(),
                None => match args.next() {
                    Some(value) => value,
                    None => return flag_err(format!("Flag needs an argument: -{name}")),
                },
            };
            self.set_value(name, &value)?;
        }
        Ok(())
    }

    fn bool_flag(&mut self, name: &str) -> Option<&mut bool> {
        match name {
            "v" => Some(&mut self.verbose),
            "simulate" => Some(&mut self.simulate),
            "dfc-mode" => Some(&mut self.dfc_mode),
            "abort-missing-common-color" => Some(&mut self.abort_missing_common_color),
            "abort-missing-common-color-identity" => {
                Some(&mut self.abort_missing_common_color_identity)
            }
            "abort-duplicate-three-color-identity-uncommons" => {
                Some(&mut self.abort_duplicate_three_color_identity_uncommons)
            }
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: &str) -> Res<()> {
        match name {
            "set" => self.set = PathBuf::from(value),
            "output" => self.output = PathBuf::from(value),
            "name" => self.name = value.to_string(),
            "seed" => self.seed = parse_num(name, value)?,
            "max-mythic" => self.max_mythic = parse_num(name, value)?,
            "max-rare" => self.max_rare = parse_num(name, value)?,
            "max-uncommon" => self.max_uncommon = parse_num(name, value)?,
            "max-common" => self.max_common = parse_num(name, value)?,
            "pack-common-color-stdev-max" => {
                self.pack_common_color_stdev_max = parse_num(name, value)?
            }
            "pack-common-color-identity-stdev-max" => {
                self.pack_common_color_identity_stdev_max = parse_num(name, value)?
            }
            "pack-common-rating-min" => self.pack_common_rating_min = parse_num(name, value)?,
            "pack-common-rating-max" => self.pack_common_rating_max = parse_num(name, value)?,
            "draft-common-color-stdev-max" => {
                self.draft_common_color_stdev_max = parse_num(name, value)?
            }
            "draft-common-color-identity-stdev-max" => {
                self.draft_common_color_identity_stdev_max = parse_num(name, value)?
            }
            "foil-chance" => match parse_num::<f64>(name, value)? {
                p if (0.0..=1.0).contains(&p) => self.foil_chance = p,
                _ => return flag_err(format!("Invalid foil chance: {value}")),
            },
            "max-draft-attempts" => self.max_draft_attempts = parse_num(name, value)?,
            "max-pack-attempts" => self.max_pack_attempts = parse_num(name, value)?,
            _ => return flag_err(format!("Unknown flag: -{name}")),
        }
        Ok(())
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, value: &str) -> Res<T> {
    match value.parse() {
        Ok(n) => Ok(n),
        Err(_) => flag_err(format!("Invalid value {value:?} for flag -{name}")),
    }
}

fn parse_bool(name: &str, value: &str) -> Res<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => flag_err(format!("Invalid boolean {value:?} for flag -{name}")),
    }
}

/// Split the `flags` entries of a set file into arguments. Entries are joined
/// with spaces and read as one space separated record, so double quotes group
/// a value containing spaces and `""` inside quotes is a literal quote.
pub fn split_flags(flags: &[String]) -> Res<Vec<String>> {
    let joined = flags.join(" ");
    let mut fields = Vec::new();
    let mut chars = joined.chars().peekable();

    while chars.peek().is_some() {
        let mut field = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        field.push('"');
                    }
                    Some('"') => break,
                    Some(c) => field.push(c),
                    None => return flag_err(format!("Unterminated quote in flags: {joined}")),
                }
            }
            match chars.next() {
                None | Some(' ') => {}
                Some(c) => return flag_err(format!("Unexpected {c:?} after quoted flag")),
            }
        } else {
            loop {
                match chars.next() {
                    None | Some(' ') => break,
                    Some('"') => return flag_err(format!("Bare quote in flags: {joined}")),
                    Some(c) => field.push(c),
                }
            }
        }

        if !field.is_empty() {
            fields.push(field);
        }
    }

    Ok(fields)
}

/// The contents of a set file: the card catalog, the fifteen pack slots, and
/// any flags the set wants applied by default.
#[derive(Debug, serde::Deserialize)]
pub struct SetFile {
    #[serde(default)]
    pub flags: Vec<String>,
    pub cards: Vec<CardEntry>,
    pub hoppers: Vec<SlotDef>,
}

pub fn load_set_file(path: &Path) -> Res<SetFile> {
    tracing::debug!("Reading set file {}.", path.display());
    let raw = std::fs::read(path)?;
    let set: SetFile = serde_json::from_slice(&raw)?;
    tracing::debug!(
        "Parsed set file with {} cards and {} hoppers.",
        set.cards.len(),
        set.hoppers.len()
    );
    Ok(set)
}
