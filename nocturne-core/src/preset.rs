use crate::options::Options;

/// A built, immutable configuration bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub weight: i32,
    pub hidden: bool,
    /// Forces this preset regardless of what the user selected.
    pub override_: bool,
    /// Every feature field is set. Relic locations are structured when enabled.
    pub options: Options,
}

impl Preset {
    /// Lay `options` over this preset field by field. The preset field of
    /// the result names this preset.
    pub fn apply(&self, options: &Options) -> Options {
        let mut over = options.clone();
        over.preset = None;
        let mut resolved = self.options.clone();
        resolved.merge(&over);
        resolved.preset = Some(self.id.clone());
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{EnemyDrops, Feature};
    use std::collections::BTreeMap;

    fn preset() -> Preset {
        Preset {
            id: "base".to_string(),
            name: "Base".to_string(),
            description: String::new(),
            author: String::new(),
            weight: 0,
            hidden: false,
            override_: false,
            options: Options {
                enemy_drops: Feature::Custom(EnemyDrops {
                    drops: BTreeMap::from([("Zombie".to_string(), vec![Some("Heart".to_string())])]),
                    blocked: BTreeMap::new(),
                }),
                stats: Some(true),
                music: Some(true),
                ..Options::default()
            },
        }
    }

    #[test]
    fn overrides_merge_onto_the_preset() {
        let options = Options {
            preset: Some("base".to_string()),
            enemy_drops: Feature::Custom(EnemyDrops {
                drops: BTreeMap::from([("Bat".to_string(), vec![None])]),
                blocked: BTreeMap::new(),
            }),
            music: Some(false),
            ..Options::default()
        };
        let resolved = preset().apply(&options);
        let drops = resolved.enemy_drops.custom().unwrap();
        assert_eq!(drops.drops.len(), 2);
        assert_eq!(resolved.music, Some(false));
        assert_eq!(resolved.stats, Some(true));
        assert_eq!(resolved.preset.as_deref(), Some("base"));
    }

    #[test]
    fn disabling_replaces_custom_values() {
        let options = Options {
            enemy_drops: Feature::Disabled,
            ..Options::default()
        };
        assert_eq!(preset().apply(&options).enemy_drops, Feature::Disabled);
    }
}
