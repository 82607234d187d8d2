use std::collections::BTreeMap;

use crate::constants::{Extension, MapColor, Reward, Slot, Zone};

/// A structured feature as it appears in options: untouched, switched off,
/// switched on with defaults, or switched on with custom settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Feature<T> {
    #[default]
    Unset,
    Disabled,
    Enabled,
    Custom(T),
}

impl<T> Feature<T> {
    pub fn from_bool(enabled: bool) -> Self {
        if enabled {
            Feature::Enabled
        } else {
            Feature::Disabled
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Feature::Unset)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Feature::Enabled | Feature::Custom(_))
    }

    pub fn custom(&self) -> Option<&T> {
        match self {
            Feature::Custom(value) => Some(value),
            _ => None,
        }
    }

    /// Switch to custom settings, starting from defaults if needed.
    pub fn custom_mut(&mut self) -> &mut T
    where
        T: Default,
    {
        if !matches!(self, Feature::Custom(_)) {
            *self = Feature::Custom(T::default());
        }
        match self {
            Feature::Custom(value) => value,
            _ => unreachable!("feature was just made custom"),
        }
    }
}

/// Key-wise overlay of one custom feature value onto another.
pub trait Merge {
    fn merge(&mut self, over: &Self);
}

impl<T: Merge + Clone> Feature<T> {
    pub fn merge(&mut self, over: &Feature<T>) {
        match over {
            Feature::Unset => {}
            Feature::Disabled => *self = Feature::Disabled,
            Feature::Enabled => *self = Feature::Enabled,
            Feature::Custom(value) => match self {
                Feature::Custom(base) => base.merge(value),
                _ => *self = Feature::Custom(value.clone()),
            },
        }
    }
}

fn merge_map<K: Ord + Clone, V: Clone>(base: &mut BTreeMap<K, V>, over: &BTreeMap<K, V>) {
    for (key, value) in over {
        base.insert(key.clone(), value.clone());
    }
}

fn merge_flag<T: Clone>(base: &mut Option<T>, over: &Option<T>) {
    if over.is_some() {
        base.clone_from(over);
    }
}

/// Enemy key `*`: every enemy.
pub const ALL_ENEMIES: &str = "*";
/// Enemy key `Global`: the pool of drops shared by all enemies.
pub const GLOBAL_DROP: &str = "Global";
/// Enemy key `Librarian`: the librarian's shop stock.
pub const LIBRARIAN_DROP: &str = "Librarian";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyDrops {
    /// `None` entries leave a drop slot empty.
    pub drops: BTreeMap<String, Vec<Option<String>>>,
    pub blocked: BTreeMap<String, Vec<String>>,
}

impl Merge for EnemyDrops {
    fn merge(&mut self, over: &Self) {
        merge_map(&mut self.drops, &over.drops);
        merge_map(&mut self.blocked, &over.blocked);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StartingEquipment {
    pub slots: BTreeMap<Slot, Vec<Option<String>>>,
    pub blocked: BTreeMap<Slot, Vec<String>>,
}

impl Merge for StartingEquipment {
    fn merge(&mut self, over: &Self) {
        merge_map(&mut self.slots, &over.slots);
        merge_map(&mut self.blocked, &over.blocked);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoneKey {
    All,
    Zone(Zone),
}

impl ZoneKey {
    pub fn code(&self) -> &'static str {
        match self {
            ZoneKey::All => "*",
            ZoneKey::Zone(zone) => zone.code(),
        }
    }
}

/// Replacement lists keyed by zone, then item name (`*` for any), then the
/// zero based tile index within that zone.
pub type TileOverrides = BTreeMap<ZoneKey, BTreeMap<String, BTreeMap<usize, Vec<String>>>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemLocations {
    pub zones: TileOverrides,
    pub blocked: TileOverrides,
}

fn merge_tiles(base: &mut TileOverrides, over: &TileOverrides) {
    for (zone, items) in over {
        let target = base.entry(*zone).or_default();
        for (item, indexes) in items {
            merge_map(target.entry(item.clone()).or_default(), indexes);
        }
    }
}

impl Merge for ItemLocations {
    fn merge(&mut self, over: &Self) {
        merge_tiles(&mut self.zones, &over.zones);
        merge_tiles(&mut self.blocked, &over.blocked);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrologueRewards {
    pub rewards: BTreeMap<Reward, Vec<Option<String>>>,
    pub blocked: BTreeMap<Reward, Vec<String>>,
}

impl Merge for PrologueRewards {
    fn merge(&mut self, over: &Self) {
        merge_map(&mut self.rewards, &over.rewards);
        merge_map(&mut self.blocked, &over.blocked);
    }
}

/// Access rules for one location. Each entry is a string of ability codes
/// that must all be held.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationLocks {
    pub locks: Vec<String>,
    pub escapes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexityGoal {
    pub min: u32,
    pub max: Option<u32>,
    /// Alternative ability sets; reaching any one of them completes the seed.
    pub goals: Vec<String>,
}

impl ComplexityGoal {
    /// Target key as written in options strings: `min` or `min-max`.
    pub fn target(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", self.min, max),
            None => self.min.to_string(),
        }
    }

    pub fn accepts(&self, depth: u32) -> bool {
        depth >= self.min && self.max.map_or(true, |max| depth <= max)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelicLocations {
    pub locations: BTreeMap<String, LocationLocks>,
    pub goal: Option<ComplexityGoal>,
    pub extension: Option<Extension>,
    pub leak_prevention: Option<bool>,
    pub thrust_sword_ability: Option<bool>,
    /// Candidates for a location; `None` allows it to stay empty.
    pub placed: BTreeMap<String, Vec<Option<char>>>,
    pub replaced: BTreeMap<char, String>,
    /// Relics a location must not hold; `None` forbids leaving it empty.
    pub blocked: BTreeMap<String, Vec<Option<char>>>,
}

impl RelicLocations {
    pub fn leak_prevention(&self) -> bool {
        self.leak_prevention.unwrap_or(true)
    }

    pub fn thrust_sword_ability(&self) -> bool {
        self.thrust_sword_ability.unwrap_or(false)
    }

    fn normalized(&self) -> RelicLocations {
        let mut out = self.clone();
        if out.leak_prevention == Some(true) {
            out.leak_prevention = None;
        }
        if out.thrust_sword_ability == Some(false) {
            out.thrust_sword_ability = None;
        }
        out.locations
            .retain(|_, locks| !locks.locks.is_empty() || !locks.escapes.is_empty());
        out
    }
}

impl Merge for RelicLocations {
    fn merge(&mut self, over: &Self) {
        merge_map(&mut self.locations, &over.locations);
        merge_flag(&mut self.goal, &over.goal);
        merge_flag(&mut self.extension, &over.extension);
        merge_flag(&mut self.leak_prevention, &over.leak_prevention);
        merge_flag(&mut self.thrust_sword_ability, &over.thrust_sword_ability);
        merge_map(&mut self.placed, &over.placed);
        merge_map(&mut self.replaced, &over.replaced);
        merge_map(&mut self.blocked, &over.blocked);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RandomValue {
    Char,
    Bit,
    UpTo3,
    UpTo10,
    UpTo99,
    Short,
    Word,
    Relic,
    Long,
}

impl RandomValue {
    pub const ALL: [RandomValue; 9] = [
        RandomValue::Char,
        RandomValue::Bit,
        RandomValue::UpTo3,
        RandomValue::UpTo10,
        RandomValue::UpTo99,
        RandomValue::Short,
        RandomValue::Word,
        RandomValue::Relic,
        RandomValue::Long,
    ];

    pub fn token(self) -> &'static str {
        match self {
            RandomValue::Char => "rc",
            RandomValue::Bit => "r1",
            RandomValue::UpTo3 => "r3",
            RandomValue::UpTo10 => "r10",
            RandomValue::UpTo99 => "r99",
            RandomValue::Short => "rs",
            RandomValue::Word => "rw",
            RandomValue::Relic => "rr",
            RandomValue::Long => "rl",
        }
    }

    pub fn from_token(token: &str) -> Option<RandomValue> {
        RandomValue::ALL.iter().copied().find(|v| v.token() == token)
    }

    /// Byte width of the value once rolled.
    pub fn len(self) -> usize {
        match self {
            RandomValue::Char
            | RandomValue::Bit
            | RandomValue::UpTo3
            | RandomValue::UpTo10
            | RandomValue::UpTo99 => 1,
            RandomValue::Short => 2,
            RandomValue::Word | RandomValue::Relic => 4,
            RandomValue::Long => 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteValue {
    Char(u8),
    Short(u16),
    Word(u32),
    Long(u64),
    Bytes(Vec<u8>),
    Random(RandomValue),
}

impl WriteValue {
    pub fn len(&self) -> usize {
        match self {
            WriteValue::Char(_) => 1,
            WriteValue::Short(_) => 2,
            WriteValue::Word(_) => 4,
            WriteValue::Long(_) => 8,
            WriteValue::Bytes(bytes) => bytes.len(),
            WriteValue::Random(kind) => kind.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Write {
    pub address: u32,
    pub value: WriteValue,
}

/// The user facing configuration. Every field may be left unset, in which
/// case the selected preset (or the defaults) decide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub preset: Option<String>,
    pub enemy_drops: Feature<EnemyDrops>,
    pub starting_equipment: Feature<StartingEquipment>,
    pub item_locations: Feature<ItemLocations>,
    pub prologue_rewards: Feature<PrologueRewards>,
    pub relic_locations: Feature<RelicLocations>,
    pub stats: Option<bool>,
    pub music: Option<bool>,
    pub turkey_mode: Option<bool>,
    pub tournament_mode: Option<bool>,
    pub colorrando_mode: Option<bool>,
    pub magicmax_mode: Option<bool>,
    pub anti_freeze_mode: Option<bool>,
    pub mypurse_mode: Option<bool>,
    pub mapcolor_theme: Option<MapColor>,
    pub writes: Option<Vec<Write>>,
}

impl Options {
    /// True when nothing would be randomized or patched.
    pub fn is_inert(&self) -> bool {
        self.preset.is_none()
            && !self.enemy_drops.is_enabled()
            && !self.starting_equipment.is_enabled()
            && !self.item_locations.is_enabled()
            && !self.prologue_rewards.is_enabled()
            && !self.relic_locations.is_enabled()
            && [
                self.stats,
                self.music,
                self.turkey_mode,
                self.colorrando_mode,
                self.magicmax_mode,
                self.anti_freeze_mode,
                self.mypurse_mode,
            ]
            .iter()
            .all(|flag| *flag != Some(true))
            && self.mapcolor_theme.is_none()
            && self.writes.as_ref().map_or(true, |writes| writes.is_empty())
    }

    /// Overlay `over` onto these options field by field.
    pub fn merge(&mut self, over: &Options) {
        merge_flag(&mut self.preset, &over.preset);
        self.enemy_drops.merge(&over.enemy_drops);
        self.starting_equipment.merge(&over.starting_equipment);
        self.item_locations.merge(&over.item_locations);
        self.prologue_rewards.merge(&over.prologue_rewards);
        self.relic_locations.merge(&over.relic_locations);
        merge_flag(&mut self.stats, &over.stats);
        merge_flag(&mut self.music, &over.music);
        merge_flag(&mut self.turkey_mode, &over.turkey_mode);
        merge_flag(&mut self.tournament_mode, &over.tournament_mode);
        merge_flag(&mut self.colorrando_mode, &over.colorrando_mode);
        merge_flag(&mut self.magicmax_mode, &over.magicmax_mode);
        merge_flag(&mut self.anti_freeze_mode, &over.anti_freeze_mode);
        merge_flag(&mut self.mypurse_mode, &over.mypurse_mode);
        merge_flag(&mut self.mapcolor_theme, &over.mapcolor_theme);
        merge_flag(&mut self.writes, &over.writes);
    }

    /// Comparable form: disabled and false fields dropped, the preset id
    /// ignored and a bare `relic_locations` replaced with `default_locks`.
    pub fn normalized(&self, default_locks: &RelicLocations) -> Options {
        fn feature<T: Clone>(value: &Feature<T>) -> Feature<T> {
            match value {
                Feature::Disabled => Feature::Unset,
                other => other.clone(),
            }
        }
        fn flag(value: Option<bool>) -> Option<bool> {
            value.filter(|v| *v)
        }
        let relic_locations = match &self.relic_locations {
            Feature::Enabled => Feature::Custom(default_locks.normalized()),
            Feature::Custom(locks) => Feature::Custom(locks.normalized()),
            _ => Feature::Unset,
        };
        Options {
            preset: None,
            enemy_drops: feature(&self.enemy_drops),
            starting_equipment: feature(&self.starting_equipment),
            item_locations: feature(&self.item_locations),
            prologue_rewards: feature(&self.prologue_rewards),
            relic_locations,
            stats: flag(self.stats),
            music: flag(self.music),
            turkey_mode: flag(self.turkey_mode),
            tournament_mode: flag(self.tournament_mode),
            colorrando_mode: flag(self.colorrando_mode),
            magicmax_mode: flag(self.magicmax_mode),
            anti_freeze_mode: flag(self.anti_freeze_mode),
            mypurse_mode: flag(self.mypurse_mode),
            mapcolor_theme: self.mapcolor_theme,
            writes: self.writes.clone().filter(|writes| !writes.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_merge_is_keywise() {
        let mut base = Feature::Custom(EnemyDrops {
            drops: BTreeMap::from([
                ("Zombie".to_string(), vec![Some("Cutlass".to_string())]),
                ("Bat".to_string(), vec![None]),
            ]),
            blocked: BTreeMap::new(),
        });
        let over = Feature::Custom(EnemyDrops {
            drops: BTreeMap::from([("Bat".to_string(), vec![Some("Heart".to_string())])]),
            blocked: BTreeMap::new(),
        });
        base.merge(&over);
        let drops = base.custom().unwrap();
        assert_eq!(drops.drops["Zombie"], vec![Some("Cutlass".to_string())]);
        assert_eq!(drops.drops["Bat"], vec![Some("Heart".to_string())]);
    }

    #[test]
    fn toggles_replace_custom_values() {
        let mut base: Feature<EnemyDrops> = Feature::Custom(EnemyDrops::default());
        base.merge(&Feature::Unset);
        assert!(base.custom().is_some());
        base.merge(&Feature::Disabled);
        assert_eq!(base, Feature::Disabled);
    }

    #[test]
    fn negated_everything_is_inert() {
        let options = Options {
            enemy_drops: Feature::Disabled,
            stats: Some(false),
            ..Options::default()
        };
        assert!(options.is_inert());
        let options = Options {
            music: Some(true),
            ..Options::default()
        };
        assert!(!options.is_inert());
    }

    #[test]
    fn normalization_fills_default_locks() {
        let defaults = RelicLocations {
            locations: BTreeMap::from([(
                "B".to_string(),
                LocationLocks {
                    locks: vec!["M".to_string()],
                    escapes: vec![],
                },
            )]),
            leak_prevention: Some(true),
            ..RelicLocations::default()
        };
        let options = Options {
            preset: Some("safe".to_string()),
            relic_locations: Feature::Enabled,
            stats: Some(false),
            ..Options::default()
        };
        let normalized = options.normalized(&defaults);
        assert_eq!(normalized.preset, None);
        assert_eq!(normalized.stats, None);
        let locks = normalized.relic_locations.custom().unwrap();
        assert_eq!(locks.leak_prevention, None);
        assert_eq!(locks.locations["B"].locks, vec!["M".to_string()]);
    }

    #[test]
    fn goal_bounds() {
        let goal = ComplexityGoal {
            min: 3,
            max: Some(5),
            goals: vec!["LV".to_string()],
        };
        assert_eq!(goal.target(), "3-5");
        assert!(goal.accepts(4));
        assert!(!goal.accepts(6));
        assert!(!goal.accepts(2));
    }
}
