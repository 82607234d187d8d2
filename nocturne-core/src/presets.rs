//! Built-in presets and the options resolution that depends on them.

use log::debug;

use crate::builder::PresetBuilder;
use crate::catalog::Catalog;
use crate::codec;
use crate::constants::DEFAULT_PRESET;
use crate::options::{Feature, Options, RelicLocations};
use crate::preset::Preset;
use crate::schema::PresetDocument;
use crate::{RandomiserError, Result};

/// Preset documents in build order. Parents come before their children.
pub(crate) const PRESET_DOCUMENTS: &[&str] = &[
    include_str!("../presets/casual.json"),
    include_str!("../presets/safe.json"),
    include_str!("../presets/og.json"),
    include_str!("../presets/guardedOg.json"),
    include_str!("../presets/stwosafe.json"),
    include_str!("../presets/grandTour.json"),
    include_str!("../presets/scavenger.json"),
    include_str!("../presets/ratRace.json"),
];

pub struct PresetRegistry {
    catalog: Catalog,
    presets: Vec<Preset>,
}

impl PresetRegistry {
    pub fn builtin(catalog: Catalog) -> Result<Self> {
        let docs = PRESET_DOCUMENTS
            .iter()
            .map(|text| PresetDocument::from_json(text))
            .collect::<Result<Vec<_>>>()?;
        PresetRegistry::from_documents(catalog, &docs)
    }

    /// Build documents in order; a document may only inherit from one before it.
    pub fn from_documents(catalog: Catalog, docs: &[PresetDocument]) -> Result<Self> {
        let mut presets: Vec<Preset> = Vec::with_capacity(docs.len());
        for doc in docs {
            if presets.iter().any(|preset| preset.id == doc.metadata.id) {
                return Err(RandomiserError::Config(format!("duplicate preset: {}", doc.metadata.id)));
            }
            let preset = PresetBuilder::from_schema(catalog, doc, &presets)?.build()?;
            debug!("built preset {}", preset.id);
            presets.push(preset);
        }
        Ok(PresetRegistry { catalog, presets })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn preset(&self, id: &str) -> Result<&Preset> {
        self.get(id)
            .ok_or_else(|| RandomiserError::Config(format!("unknown preset: {}", id)))
    }

    /// The first preset flagged to replace whatever the user selected.
    pub fn override_preset(&self) -> Option<&Preset> {
        self.presets.iter().find(|preset| preset.override_)
    }

    /// Presets offered for selection, by weight.
    pub fn visible(&self) -> Vec<&Preset> {
        let mut presets: Vec<&Preset> = self.presets.iter().filter(|preset| !preset.hidden).collect();
        presets.sort_by_key(|preset| preset.weight);
        presets
    }

    /// Lock table used wherever relic randomization is switched on without
    /// its own table.
    pub fn default_locks(&self) -> RelicLocations {
        self.get(DEFAULT_PRESET)
            .and_then(|preset| preset.options.relic_locations.custom())
            .cloned()
            .unwrap_or_default()
    }

    /// Fold the selected preset into `options`. Empty options select the
    /// default preset; a bare relic switch gets the default lock table.
    pub fn resolve(&self, options: &Options) -> Result<Options> {
        let mut resolved = if let Some(id) = &options.preset {
            self.preset(id)?.apply(options)
        } else if options.is_inert() {
            let mut resolved = self.preset(DEFAULT_PRESET)?.apply(options);
            resolved.tournament_mode = options.tournament_mode;
            resolved
        } else {
            options.clone()
        };
        if resolved.relic_locations == Feature::Enabled {
            resolved.relic_locations = Feature::Custom(self.default_locks());
        }
        Ok(resolved)
    }

    /// Canonical options string: `p:<id>` (with a leading `t` in tournament
    /// mode) when the options resolve to a built-in preset, otherwise the
    /// plain serialization.
    pub fn options_to_string(&self, options: &Options) -> String {
        let tournament = options.tournament_mode == Some(true);
        let mut bare = options.clone();
        bare.tournament_mode = None;
        if let Some(id) = self.matching_preset(&bare) {
            let prefix = if tournament { "t" } else { "" };
            return format!("{}p:{}", prefix, id);
        }
        codec::serialize(&self.catalog, options)
    }

    fn matching_preset(&self, options: &Options) -> Option<&str> {
        if options.is_inert() && options.preset.is_none() {
            return None;
        }
        let defaults = self.default_locks();
        let resolved = self.resolve(options).ok()?;
        let target = resolved.normalized(&defaults);
        let selected = options.preset.as_deref().and_then(|id| self.get(id));
        selected
            .into_iter()
            .chain(self.presets.iter())
            .find(|preset| preset.options.normalized(&defaults) == target)
            .map(|preset| preset.id.as_str())
    }

    /// Parse an options string and resolve it in one step.
    pub fn parse_and_resolve(&self, input: &str) -> Result<Options> {
        let options = codec::parse(&self.catalog, input)?;
        self.resolve(&options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ZoneKey;

    fn registry() -> PresetRegistry {
        PresetRegistry::builtin(Catalog::standard()).unwrap()
    }

    #[test]
    fn builtins_build_in_order() {
        let registry = registry();
        let ids: Vec<&str> = registry.presets().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["casual", "safe", "og", "guardedOg", "stwosafe", "grandTour", "scavenger", "ratRace"]
        );
        assert!(registry.override_preset().is_none());
        assert_eq!(registry.visible()[0].id, "casual");
    }

    #[test]
    fn safe_options_collapse_to_the_preset() {
        let registry = registry();
        let safe = registry.preset("safe").unwrap();
        assert_eq!(registry.options_to_string(&safe.options), "p:safe");
        let parsed = codec::parse(registry.catalog(), "p:safe").unwrap();
        assert_eq!(registry.options_to_string(&parsed), "p:safe");
    }

    #[test]
    fn restated_overrides_collapse() {
        let registry = registry();
        let options = codec::parse(registry.catalog(), "p:og,~s").unwrap();
        assert_eq!(registry.options_to_string(&options), "p:og");
        let options = codec::parse(registry.catalog(), "tp:og").unwrap();
        assert_eq!(registry.options_to_string(&options), "tp:og");
    }

    #[test]
    fn real_overrides_are_kept() {
        let registry = registry();
        let options = codec::parse(registry.catalog(), "p:og,m").unwrap();
        assert_eq!(registry.options_to_string(&options), "p:og,m");
    }

    #[test]
    fn inert_options_resolve_to_safe() {
        let registry = registry();
        let resolved = registry.resolve(&Options::default()).unwrap();
        assert_eq!(resolved.preset.as_deref(), Some("safe"));
        let goal = resolved.relic_locations.custom().unwrap().goal.clone().unwrap();
        assert_eq!(goal.min, 9);
    }

    #[test]
    fn bare_relic_switch_gets_default_locks() {
        let registry = registry();
        let resolved = registry.parse_and_resolve("r").unwrap();
        let relics = resolved.relic_locations.custom().unwrap();
        assert_eq!(relics, &registry.default_locks());
    }

    #[test]
    fn unknown_presets_are_configuration_errors() {
        let registry = registry();
        let options = codec::parse(registry.catalog(), "p:nope").unwrap();
        assert!(matches!(registry.resolve(&options), Err(RandomiserError::Config(_))));
    }

    #[test]
    fn safe_inherits_casual_locks_with_a_goal() {
        let registry = registry();
        let casual = registry.preset("casual").unwrap().options.relic_locations.custom().unwrap();
        let safe = registry.preset("safe").unwrap().options.relic_locations.custom().unwrap();
        assert_eq!(casual.locations, safe.locations);
        assert!(casual.goal.is_none());
        let goal = safe.goal.as_ref().unwrap();
        assert_eq!(goal.min, 9);
        assert_eq!(goal.max, None);
        assert_eq!(goal.goals, vec!["HATRNI".to_string()]);
        assert_eq!(registry.preset("safe").unwrap().options.colorrando_mode, Some(true));
    }

    #[test]
    fn children_extend_parent_maps() {
        let registry = registry();
        let scavenger = registry.preset("scavenger").unwrap();
        let drops = scavenger.options.enemy_drops.custom().unwrap();
        assert_eq!(drops.drops["*"], vec![None, None]);
        assert_eq!(drops.drops["Global"].len(), 32);
        let rat = registry.preset("ratRace").unwrap();
        let relics = rat.options.relic_locations.custom().unwrap();
        assert_eq!(relics.replaced[&'o'], "Zircon");
        let goal = relics.goal.as_ref().unwrap();
        assert_eq!((goal.min, goal.max, goal.goals.len()), (9, None, 1));
        assert_eq!(relics.placed["J"].len(), 5);
        let items = rat.options.item_locations.custom().unwrap();
        assert_eq!(items.blocked[&ZoneKey::All]["*"][&0].len(), 17);
        assert_eq!(rat.options.writes.as_ref().unwrap().len(), 11);
    }

    #[test]
    fn every_builtin_round_trips_through_the_codec() {
        let registry = registry();
        let defaults = registry.default_locks();
        for preset in registry.presets() {
            let text = codec::serialize(registry.catalog(), &preset.options);
            let parsed = codec::parse(registry.catalog(), &text).unwrap();
            assert_eq!(
                parsed.normalized(&defaults),
                preset.options.normalized(&defaults),
                "{}",
                preset.id
            );
            assert_eq!(codec::serialize(registry.catalog(), &parsed), text, "{}", preset.id);
        }
    }

    #[test]
    fn every_builtin_collapses_to_its_id() {
        let registry = registry();
        for preset in registry.presets() {
            assert_eq!(
                registry.options_to_string(&preset.options),
                format!("p:{}", preset.id)
            );
        }
    }
}
