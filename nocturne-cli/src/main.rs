use clap::Parser;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

use nocturne_core::builder::PresetBuilder;
use nocturne_core::catalog::Catalog;
use nocturne_core::codec;
use nocturne_core::constants::{MapColor, DEFAULT_OPTIONS, DEFAULT_PRESET};
use nocturne_core::options::{Feature, Options};
use nocturne_core::presets::PresetRegistry;
use nocturne_core::schema::PresetDocument;
use nocturne_core::seed::random_seed;
use nocturne_core::url::options_from_url;
use nocturne_core::{run, RandomiserError, RandomiserSettings, Result, DEFAULT_ATTEMPT_BUDGET};

#[derive(Debug, Parser)]
#[command(name = "nocturne", version, about = "Relic and item randomizer for SotN disc images")]
struct Args {
    /// Randomization options string.
    #[arg(short, long)]
    options: Option<String>,

    /// Use a built-in preset.
    #[arg(short, long)]
    preset: Option<String>,

    /// Use a preset document (JSON) laid over the options.
    #[arg(short = 'f', long)]
    preset_file: Option<PathBuf>,

    /// Seed string. A random one is picked when omitted.
    #[arg(short, long)]
    seed: Option<String>,

    /// Reproduce a seed from its URL.
    #[arg(
        short,
        long,
        conflicts_with_all = [
            "seed", "preset_file", "complexity", "no_seed", "color_rando",
            "magic_max", "anti_freeze", "my_purse", "map_color",
        ]
    )]
    url: Option<String>,

    /// Fail unless the write set has this checksum (hex).
    #[arg(short = 'e', long, value_parser = parse_checksum)]
    expect_checksum: Option<u32>,

    /// Shortcut for the minimum depth of the selected completion goal.
    #[arg(short, long)]
    complexity: Option<u32>,

    /// Disc image to randomize.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output image, or PPF patch when no input image is given.
    #[arg(short = 'O', long)]
    output: Option<PathBuf>,

    /// Enable tournament mode.
    #[arg(short, long)]
    tournament: bool,

    /// Randomize palettes.
    #[arg(short = 'l', long)]
    color_rando: bool,

    /// Swap heart vessels for MP vessels.
    #[arg(short = 'x', long)]
    magic_max: bool,

    /// Remove the screen freeze on pickups and level up.
    #[arg(short = 'z', long)]
    anti_freeze: bool,

    /// Keep Death out of the entrance.
    #[arg(short = 'y', long)]
    my_purse: bool,

    /// Map colour theme: u, r, b, g, y, p or k.
    #[arg(short = 'm', long, value_parser = parse_map_color)]
    map_color: Option<MapColor>,

    /// Print the seed URL and spoilers at verbosity 2 unless told otherwise.
    #[arg(long)]
    race: bool,

    /// Only print the URL of the options. Nothing is randomized.
    #[arg(short = 'n', long, conflicts_with_all = ["seed", "expect_checksum"])]
    no_seed: bool,

    /// Spoiler verbosity, repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print nothing but errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search threads. Defaults to three quarters of the cores.
    #[arg(long, default_value_t = 0)]
    workers: usize,

    #[arg(long, default_value_t = DEFAULT_ATTEMPT_BUDGET, hide = true)]
    attempt_budget: u64,

    /// Base URL for the printed seed URL.
    #[arg(long)]
    base_url: Option<String>,
}

fn parse_checksum(text: &str) -> std::result::Result<u32, String> {
    u32::from_str_radix(text.trim_start_matches("0x"), 16).map_err(|err| err.to_string())
}

fn parse_map_color(text: &str) -> std::result::Result<MapColor, String> {
    MapColor::from_name(text)
        .ok_or_else(|| format!("map color must be one of u, r, b, g, y, p, k, got {}", text))
}

fn config(message: &str) -> RandomiserError {
    RandomiserError::Config(message.to_string())
}

fn setup_logging(level: LevelFilter) -> std::result::Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

/// Options named by the options string, the preset flag and the preset
/// file, in that order.
fn selected_options(args: &Args, registry: &PresetRegistry) -> Result<Option<Options>> {
    let catalog: Catalog = *registry.catalog();
    let mut options = match &args.options {
        Some(text) => Some(codec::parse(&catalog, text)?),
        None => None,
    };

    if let Some(preset) = &args.preset {
        let options = options.get_or_insert_with(Options::default);
        if options.preset.as_ref().map_or(false, |selected| selected != preset) {
            return Err(config("Command line option preset conflicts with options string preset"));
        }
        options.preset = Some(preset.clone());
    }

    if let Some(path) = &args.preset_file {
        if options.as_ref().map_or(false, |options| options.preset.is_some()) {
            return Err(config("Cannot specify options string preset when using a preset file"));
        }
        let doc = PresetDocument::from_json(&fs::read_to_string(path)?)?;
        let preset = PresetBuilder::from_schema(catalog, &doc, registry.presets())?.build()?;
        options.get_or_insert_with(Options::default).merge(&preset.options);
    }
    Ok(options)
}

/// Resolve `options` and move its completion goal to `complexity`.
fn with_complexity(registry: &PresetRegistry, options: &Options, complexity: u32) -> Result<Options> {
    let mut applied = if options.preset.is_none() && options.relic_locations == Feature::Unset {
        let mut options = options.clone();
        options.preset = Some(DEFAULT_PRESET.to_string());
        registry.resolve(&options)?
    } else {
        registry.resolve(options)?
    };
    let Feature::Custom(relics) = &mut applied.relic_locations else {
        return Err(config("Relic location randomization must be enabled to set complexity"));
    };
    let goal = relics
        .goal
        .as_mut()
        .ok_or_else(|| config("Completion goals must be preset to set complexity"))?;
    goal.min = complexity;
    goal.max = None;
    applied.preset = None;
    Ok(applied)
}

fn apply_mode_flags(args: &Args, options: &mut Options) {
    if args.color_rando {
        options.colorrando_mode = Some(true);
    }
    if args.magic_max {
        options.magicmax_mode = Some(true);
    }
    if args.anti_freeze {
        options.anti_freeze_mode = Some(true);
    }
    if args.my_purse {
        options.mypurse_mode = Some(true);
    }
    if let Some(color) = args.map_color {
        options.mapcolor_theme = Some(color);
    }
}

fn settings(args: &Args, registry: &PresetRegistry) -> Result<RandomiserSettings> {
    let race = args.race || args.url.is_some();
    let verbosity = match (args.quiet, args.verbose) {
        (true, _) => 0,
        (false, 0) if race => 2,
        (false, verbose) => verbose as usize,
    };
    let mut settings = RandomiserSettings {
        tournament: args.tournament,
        verbosity,
        workers: args.workers,
        attempt_budget: args.attempt_budget,
        base_url: args.base_url.clone(),
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        expected_checksum: args.expect_checksum,
        no_seed: args.no_seed,
        ..RandomiserSettings::default()
    };

    if let Some(url) = &args.url {
        let seed_url = options_from_url(url)?;
        let options_differ = args.options.as_ref().map_or(false, |options| *options != seed_url.options);
        let preset_differs = args
            .preset
            .as_ref()
            .map_or(false, |preset| format!("p:{}", preset) != seed_url.options);
        if options_differ || preset_differs {
            return Err(config("Argument randomizations are not url randomizations"));
        }
        if let (Some(expected), Some(actual)) = (args.expect_checksum, seed_url.checksum) {
            if expected != actual {
                return Err(config("Argument checksum is not url checksum"));
            }
        }
        settings.options = seed_url.options;
        settings.seed = seed_url.seed;
        settings.expected_checksum = settings.expected_checksum.or(seed_url.checksum);
        return Ok(settings);
    }

    let catalog: Catalog = *registry.catalog();
    let mut options = match selected_options(args, registry)? {
        Some(options) => options,
        None => codec::parse(&catalog, DEFAULT_OPTIONS)?,
    };
    if let Some(complexity) = args.complexity {
        options = with_complexity(registry, &options, complexity)?;
    }
    apply_mode_flags(args, &mut options);
    settings.options = codec::serialize(&catalog, &options);
    if !args.no_seed {
        settings.seed = args.seed.clone().unwrap_or_else(random_seed);
    }
    Ok(settings)
}

fn main() {
    let args = Args::parse();

    let level = match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1..=2) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    };
    if let Err(err) = setup_logging(level) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    let settings = match PresetRegistry::builtin(Catalog::standard())
        .and_then(|registry| settings(&args, &registry))
    {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let seed = settings.seed.clone();

    match run(settings) {
        Ok(log) => {
            if !args.quiet {
                print!("{log}");
            }
        }
        Err(err) => {
            eprintln!("Seed: {seed}");
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PresetRegistry {
        PresetRegistry::builtin(Catalog::standard()).unwrap()
    }

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("nocturne").chain(flags.iter().copied())).unwrap()
    }

    fn parsed_options(flags: &[&str]) -> Options {
        let settings = settings(&args(flags), &registry()).unwrap();
        codec::parse(&Catalog::standard(), &settings.options).unwrap()
    }

    #[test]
    fn conflicting_presets_are_rejected() {
        let err = settings(&args(&["--preset", "safe", "--options", "p:og"]), &registry()).unwrap_err();
        assert!(matches!(err, RandomiserError::Config(_)));
        assert!(err.to_string().contains("conflicts with options string preset"));
    }

    #[test]
    fn matching_presets_combine_with_overrides() {
        let options = parsed_options(&["--preset", "casual", "--options", "p:casual,~s", "-s", "x"]);
        assert_eq!(options.preset.as_deref(), Some("casual"));
        assert_eq!(options.stats, Some(false));
        let options = parsed_options(&["-p", "og", "-o", "~m", "-s", "x"]);
        assert_eq!(options.preset.as_deref(), Some("og"));
        assert_eq!(options.music, Some(false));
    }

    #[test]
    fn missing_options_fall_back_to_the_default() {
        let settings = settings(&args(&["-s", "abc"]), &registry()).unwrap();
        assert_eq!(settings.options, DEFAULT_OPTIONS);
        assert_eq!(settings.seed, "abc");
        assert_eq!(settings.verbosity, 0);
    }

    #[test]
    fn mode_flags_map_to_option_letters() {
        let options = parsed_options(&[
            "-p", "casual", "--color-rando", "--magic-max", "--anti-freeze", "--my-purse",
            "--map-color", "r", "-s", "x",
        ]);
        assert_eq!(options.colorrando_mode, Some(true));
        assert_eq!(options.magicmax_mode, Some(true));
        assert_eq!(options.anti_freeze_mode, Some(true));
        assert_eq!(options.mypurse_mode, Some(true));
        assert_eq!(options.mapcolor_theme, Some(MapColor::Crimson));
        let plain = parsed_options(&["-p", "casual", "-s", "x"]);
        assert_eq!(plain.colorrando_mode, None);
        assert_eq!(plain.mapcolor_theme, None);
        assert!(Args::try_parse_from(["nocturne", "--map-color", "q"]).is_err());
    }

    #[test]
    fn complexity_moves_the_goal() {
        let options = parsed_options(&["--preset", "safe", "--complexity", "12", "-s", "x"]);
        assert_eq!(options.preset, None);
        let relics = options.relic_locations.custom().unwrap();
        let goal = relics.goal.as_ref().unwrap();
        assert_eq!(goal.min, 12);
        assert_eq!(goal.max, None);
        assert_eq!(goal.goals, vec!["HATRNI".to_string()]);

        let defaulted = parsed_options(&["--complexity", "10", "-s", "x"]);
        assert_eq!(defaulted.relic_locations.custom().unwrap().goal.as_ref().unwrap().min, 10);
    }

    #[test]
    fn complexity_needs_a_goal_and_relic_randomization() {
        let err = settings(&args(&["-p", "casual", "--complexity", "5"]), &registry()).unwrap_err();
        assert!(err.to_string().contains("Completion goals must be preset"));
        let err = settings(&args(&["-o", "p:safe,~r", "--complexity", "5"]), &registry()).unwrap_err();
        assert!(err.to_string().contains("must be enabled"));
    }

    #[test]
    fn preset_files_are_laid_over_the_options() {
        let path = std::env::temp_dir().join(format!("nocturne-preset-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{
                "metadata": {"id": "local", "name": "Local"},
                "inherits": "casual",
                "enemyDrops": [{"enemy": "Zombie", "items": ["Cutlass"]}]
            }"#,
        )
        .unwrap();
        let file = path.to_string_lossy().to_string();
        let result = settings(&args(&["--preset-file", &file, "-s", "x"]), &registry());
        let conflict = settings(&args(&["-f", &file, "-p", "safe"]), &registry());
        fs::remove_file(&path).unwrap();

        let settings = result.unwrap();
        let options = codec::parse(&Catalog::standard(), &settings.options).unwrap();
        let drops = options.enemy_drops.custom().unwrap();
        assert_eq!(drops.drops["Zombie"], vec![Some("Cutlass".to_string())]);
        assert!(options.relic_locations.custom().is_some());
        assert!(matches!(conflict, Err(RandomiserError::Config(_))));
    }

    #[test]
    fn race_and_url_modes_default_to_verbosity_two() {
        let race = settings(&args(&["--race", "-p", "casual"]), &registry()).unwrap();
        assert_eq!(race.verbosity, 2);
        let loud = settings(&args(&["--race", "-vvv", "-p", "casual"]), &registry()).unwrap();
        assert_eq!(loud.verbosity, 3);
        let quiet = settings(&args(&["--race", "-q", "-p", "casual"]), &registry()).unwrap();
        assert_eq!(quiet.verbosity, 0);

        let url = settings(&args(&["-u", "https://casual.sotn.io/?,abc"]), &registry()).unwrap();
        assert_eq!(url.verbosity, 2);
        assert_eq!(url.options, "p:casual");
        assert_eq!(url.seed, "abc");
        assert!(settings(&args(&["-u", "https://casual.sotn.io/?,abc", "-p", "safe"]), &registry()).is_err());
        assert!(settings(&args(&["-u", "https://casual.sotn.io/?,abc", "-p", "casual"]), &registry()).is_ok());
    }

    #[test]
    fn seedless_runs_leave_the_seed_empty() {
        let settings = settings(&args(&["--no-seed", "-p", "casual"]), &registry()).unwrap();
        assert!(settings.no_seed);
        assert!(settings.seed.is_empty());
        assert!(Args::try_parse_from(["nocturne", "--no-seed", "-s", "abc"]).is_err());
    }
}
