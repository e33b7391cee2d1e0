use rand::{rngs::StdRng, SeedableRng};

use config::{Settings, USAGE};
use draft::generate::Generator;
use error::{DraftError, Res};

mod cards;
mod config;
mod draft;
mod error;
mod export;

/// Work out the full settings for the run. Flags embedded in the set file
/// are applied first so that the command line can override them.
fn load_settings(args: &[String]) -> Res<(Settings, config::SetFile)> {
    let mut settings = Settings::default();
    settings.apply_flags(args.iter().cloned())?;

    let set = config::load_set_file(&settings.set)?;
    if !set.flags.is_empty() {
        let mut combined = config::split_flags(&set.flags)?;
        combined.extend(args.iter().cloned());
        settings = Settings::default();
        settings.apply_flags(combined)?;
    }
    Ok((settings, set))
}

fn run(settings: &Settings, set: config::SetFile) -> Res<()> {
    tracing::info!("Generating draft {}.", settings.name);

    let mut rng = if settings.seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(settings.seed as u64)
    };

    let pools = cards::partition(set.cards, settings.dfc_mode)?;
    let generator = Generator::new(settings, &pools, set.hoppers)?;
    let draft = generator.generate(&mut rng)?;

    tracing::debug!("Draft attempts: {}.", draft.draft_attempts);
    tracing::debug!("Pack attempts: {}.", draft.pack_attempts);

    if settings.simulate {
        tracing::info!("Simulation only, not writing draft {}.", draft.id);
    } else {
        export::write_draft(&settings.output, &draft, &settings.name)?;
    }
    tracing::info!("Done!");
    Ok(())
}

fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // The set file may carry flags of its own, including -v, so everything is
    // loaded before logging starts.
    let (settings, set) = match load_settings(&args) {
        Ok(loaded) => loaded,
        Err(DraftError::Flag(e)) => {
            eprintln!("{e}\n{USAGE}");
            std::process::exit(2);
        }
        Err(e) => {
            init_logging(false);
            tracing::error!("Failed to load set: {e}");
            std::process::exit(1);
        }
    };

    init_logging(settings.verbose);

    if let Err(e) = run(&settings, set) {
        tracing::error!("Failed to generate draft: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::load_settings;
    use crate::error::DraftError;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_settings_errors() {
        assert!(matches!(
            load_settings(&args(&["-bogus"])),
            Err(DraftError::Flag(_))
        ));

        let missing = std::env::temp_dir().join("makedraft-no-such-set.json");
        let missing = missing.to_string_lossy().to_string();
        assert!(matches!(
            load_settings(&args(&["-set", missing.as_str()])),
            Err(DraftError::Io(_))
        ));
    }

    #[test]
    fn test_set_flags_then_command_line() {
        let path = std::env::temp_dir().join("makedraft-flags-set.json");
        let raw = r#"{
            "flags": ["-max-common 5 -max-rare 1"],
            "cards": [],
            "hoppers": []
        }"#;
        std::fs::write(&path, raw).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let (settings, set) =
            load_settings(&args(&["-set", path_arg.as_str(), "-max-rare", "2"])).unwrap();
        assert_eq!(settings.max_common, 5);
        assert_eq!(settings.max_rare, 2);
        assert_eq!(settings.max_uncommon, 4);
        assert!(set.cards.is_empty());

        std::fs::write(&path, raw.replace("-max-common 5", "-max-common x")).unwrap();
        assert!(matches!(
            load_settings(&args(&["-set", path_arg.as_str()])),
            Err(DraftError::Flag(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
