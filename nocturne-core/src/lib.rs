use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub mod builder;
pub mod catalog;
pub mod checked;
pub mod codec;
pub mod constants;
pub mod enemies;
pub mod info;
pub mod items;
pub mod options;
pub mod placement;
pub mod preset;
pub mod presets;
pub mod relics;
pub mod schema;
pub mod search;
pub mod seed;
pub mod solution;
pub mod url;
pub mod writes;

use catalog::Catalog;
use checked::Checked;
use constants::{DEFAULT_OPTIONS, RELIC_ATTEMPT_NONCE, RELIC_WRITES_NONCE, WRITES_NONCE};
use crate::info::{placement_info, Info, TOURNAMENT_VERBOSITY};
use options::{Feature, Options};
use placement::{LeakFlag, Placement};
use presets::PresetRegistry;
use search::{default_workers, search, Job};
use seed::phase_rng;

/// Attempts tried before the relic search gives up.
pub const DEFAULT_ATTEMPT_BUDGET: u64 = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomiserSettings {
    pub seed: String,
    /// Options string. Empty selects the default preset.
    pub options: String,
    /// Salt for every random stream.
    pub version: String,
    pub expected_checksum: Option<u32>,
    pub tournament: bool,
    pub verbosity: usize,
    /// Search threads; 0 picks from the core count.
    pub workers: usize,
    pub attempt_budget: u64,
    pub base_url: Option<String>,
    /// Disc image to patch. Patched in place unless an output is given.
    pub input_path: Option<PathBuf>,
    /// Patched image, or a PPF patch when there is no input image.
    pub output_path: Option<PathBuf>,
    /// Only validate the options and print their URL. Nothing is randomized.
    pub no_seed: bool,
}

impl Default for RandomiserSettings {
    fn default() -> Self {
        RandomiserSettings {
            seed: String::new(),
            options: DEFAULT_OPTIONS.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            expected_checksum: None,
            tournament: false,
            verbosity: 2,
            workers: 0,
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
            base_url: None,
            input_path: None,
            output_path: None,
            no_seed: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RandomiserError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("unknown enemy: {0}")]
    UnknownEnemy(String),
    #[error("unknown relic: {0}")]
    UnknownRelic(String),
    #[error("unknown zone: {0}")]
    UnknownZone(String),
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("unknown tile: {item} #{index} in {zone}")]
    UnknownTile { zone: String, item: String, index: usize },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("verification failed: {0}")]
    Verification(String),
    #[error("checksum mismatch: expected {expected:x}, got {actual:x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, RandomiserError>;

/// Everything one seed produces.
#[derive(Debug)]
pub struct Randomized {
    pub seed: String,
    /// Options after preset resolution.
    pub options: Options,
    /// Canonical options string, also the random stream salt.
    pub canonical: String,
    pub placement: Option<Placement>,
    pub leak_flags: Vec<LeakFlag>,
    pub checked: Checked,
    pub checksum: u32,
    pub url: String,
    pub info: Info,
}

impl Randomized {
    pub fn tournament(&self) -> bool {
        self.options.tournament_mode == Some(true)
    }

    pub fn spoilers(&self, verbosity: usize) -> String {
        let verbosity = if self.tournament() {
            verbosity.min(TOURNAMENT_VERBOSITY)
        } else {
            verbosity
        };
        self.info.format(verbosity)
    }

    pub fn to_patch(&self) -> Vec<u8> {
        self.checked
            .to_patch(&self.seed, self.options.preset.as_deref(), self.tournament())
    }
}

/// Generate one seed: resolve the options, place relics and collect every
/// write the seed makes.
pub fn randomize(registry: &PresetRegistry, settings: &RandomiserSettings) -> Result<Randomized> {
    let catalog: Catalog = *registry.catalog();
    let text = if settings.options.is_empty() {
        DEFAULT_OPTIONS
    } else {
        settings.options.as_str()
    };
    let mut options = codec::parse(&catalog, text)?;
    if settings.tournament {
        options.tournament_mode = Some(true);
    }
    if let Some(preset) = registry.override_preset() {
        warn!("preset {} overrides the selected options", preset.id);
        options.preset = Some(preset.id.clone());
    }
    let resolved = registry.resolve(&options)?;
    let canonical = registry.options_to_string(&options);
    info!("randomizing seed {} with {}", settings.seed, canonical);

    let mut info = Info::new();
    info.text(1, "Seed", settings.seed.as_str());
    if let Some(preset) = &resolved.preset {
        info.text(1, "Preset", preset.as_str());
    }

    let mut checked = Checked::new();
    let mut leak_flags = Vec::new();
    let placement = match &resolved.relic_locations {
        Feature::Custom(relics) => {
            let job = Job {
                catalog,
                relics: relics.clone(),
                version: settings.version.clone(),
                options: canonical.clone(),
                seed: settings.seed.clone(),
            };
            let workers = if settings.workers == 0 {
                default_workers()
            } else {
                settings.workers
            };
            let placement = search(Arc::new(job), workers, RELIC_ATTEMPT_NONCE, settings.attempt_budget)?;
            let mut rng = phase_rng(&settings.version, &canonical, &settings.seed, RELIC_WRITES_NONCE);
            checked.apply(&placement.relic_writes(&catalog, relics)?)?;
            if relics.leak_prevention() {
                leak_flags = placement.leak_flags(&catalog, &mut rng)?;
            }
            let goals = relics.goal.as_ref().map(|goal| goal.goals.as_slice());
            info.merge(&placement_info(&catalog, &placement, goals, &leak_flags, &BTreeMap::new())?);
            Some(placement)
        }
        _ => None,
    };

    if let Some(writes) = &resolved.writes {
        let mut rng = phase_rng(&settings.version, &canonical, &settings.seed, WRITES_NONCE);
        checked.apply(&writes::apply_writes(writes, &mut rng)?)?;
    }

    let checksum = checked.sum();
    if let Some(expected) = settings.expected_checksum {
        if expected != checksum {
            return Err(RandomiserError::ChecksumMismatch { expected, actual: checksum });
        }
    }
    let url = crate::url::options_to_url(
        &settings.version,
        &canonical,
        Some(checksum),
        &settings.seed,
        settings.base_url.as_deref(),
    );

    Ok(Randomized {
        seed: settings.seed.clone(),
        options: resolved,
        canonical,
        placement,
        leak_flags,
        checked,
        checksum,
        url,
        info,
    })
}

/// URL of the selected options without a checksum or seed.
pub fn seedless_url(registry: &PresetRegistry, settings: &RandomiserSettings) -> Result<String> {
    let text = if settings.options.is_empty() {
        DEFAULT_OPTIONS
    } else {
        settings.options.as_str()
    };
    let options = codec::parse(registry.catalog(), text)?;
    registry.resolve(&options)?;
    let canonical = registry.options_to_string(&options);
    Ok(crate::url::options_to_url(
        &settings.version,
        &canonical,
        None,
        "",
        settings.base_url.as_deref(),
    ))
}

/// Randomize and write the result to disk. Returns the run log: the seed
/// URL followed by the spoilers.
pub fn run(settings: RandomiserSettings) -> Result<String> {
    let registry = PresetRegistry::builtin(Catalog::standard())?;
    if settings.no_seed {
        return Ok(format!("{}\n", seedless_url(&registry, &settings)?));
    }
    let randomized = randomize(&registry, &settings)?;

    match (&settings.input_path, &settings.output_path) {
        (Some(input), output) => {
            if !input.exists() {
                return Err(RandomiserError::Config(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
            let mut image = fs::read(input)?;
            randomized.checked.apply_to_image(&mut image)?;
            let target = output.as_ref().unwrap_or(input);
            fs::write(target, &image)?;
            info!("patched image written to {}", target.display());
        }
        (None, Some(output)) => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(output, randomized.to_patch())?;
            info!("patch written to {}", output.display());
        }
        (None, None) => {}
    }

    let mut log = format!("{}\n", randomized.url);
    let spoilers = randomized.spoilers(settings.verbosity);
    if !spoilers.is_empty() {
        log.push_str(&spoilers);
        log.push('\n');
    }
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(options: &str, seed: &str) -> RandomiserSettings {
        RandomiserSettings {
            seed: seed.to_string(),
            options: options.to_string(),
            version: "1.0.0".to_string(),
            workers: 2,
            ..RandomiserSettings::default()
        }
    }

    fn registry() -> PresetRegistry {
        PresetRegistry::builtin(Catalog::standard()).unwrap()
    }

    #[test]
    fn writes_only_seeds_skip_the_relic_search() {
        let randomized = randomize(&registry(), &settings("w:0x10000:0xff", "plain")).unwrap();
        assert!(randomized.placement.is_none());
        assert_eq!(randomized.checked.len(), 1);
        assert!(randomized.url.starts_with("https://sotn.io/?w:0x00010000:0xff,"));
        assert!(randomized.url.ends_with(",plain"));
    }

    #[test]
    fn checksum_mismatches_are_reported() {
        let registry = registry();
        let mut settings = settings("w:0x10000:0xff", "plain");
        let checksum = randomize(&registry, &settings).unwrap().checksum;
        settings.expected_checksum = Some(checksum);
        assert!(randomize(&registry, &settings).is_ok());
        settings.expected_checksum = Some(checksum ^ 1);
        assert!(matches!(
            randomize(&registry, &settings),
            Err(RandomiserError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn tournament_caps_spoilers() {
        let mut settings = settings("p:casual", "cap");
        settings.tournament = true;
        let randomized = randomize(&registry(), &settings).unwrap();
        assert_eq!(randomized.canonical, "tp:casual");
        assert_eq!(randomized.spoilers(5), randomized.spoilers(2));
        assert!(!randomized.spoilers(5).contains("Attempts"));
    }

    #[test]
    fn seedless_urls_carry_only_the_options() {
        let registry = registry();
        let mut settings = settings("p:casual", "");
        settings.no_seed = true;
        assert_eq!(seedless_url(&registry, &settings).unwrap(), "https://casual.sotn.io/");
        settings.options = "w:0x10000:0xff".to_string();
        assert_eq!(
            seedless_url(&registry, &settings).unwrap(),
            "https://sotn.io/?w:0x00010000:0xff,,"
        );
        settings.options = "p:nothing".to_string();
        assert!(seedless_url(&registry, &settings).is_err());
    }

    #[test]
    fn errors_render_with_context() {
        let err = RandomiserError::UnknownTile {
            zone: "NO0".to_string(),
            item: "Life Vessel".to_string(),
            index: 3,
        };
        assert_eq!(err.to_string(), "unknown tile: Life Vessel #3 in NO0");
        let err = RandomiserError::ChecksumMismatch { expected: 0xabc, actual: 0x123 };
        assert_eq!(err.to_string(), "checksum mismatch: expected abc, got 123");
    }
}
