//! Incremental preset construction.
//!
//! The builder keeps catalog references instead of names while a preset is
//! being assembled, so every name is checked once when it is first staged.
//! `build()` turns the staged state back into the name keyed [`Options`]
//! the codec understands.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::debug;

use crate::catalog::Catalog;
use crate::checked::next_address;
use crate::codec::{check_slot, check_tile, parse_hex_bytes, parse_number, MIN_WRITE_ADDRESS};
use crate::constants::{Extension, ItemType, MapColor, Reward, Slot, Zone};
use crate::enemies::Enemy;
use crate::items::Item;
use crate::options::{
    ComplexityGoal, EnemyDrops, Feature, ItemLocations, LocationLocks, Options, PrologueRewards,
    RandomValue, RelicLocations, StartingEquipment, TileOverrides, Write, WriteValue, ZoneKey,
    ALL_ENEMIES, GLOBAL_DROP, LIBRARIAN_DROP,
};
use crate::preset::Preset;
use crate::schema::{BoolOr, Metadata, NumberOrText, PresetDocument, WriteEntry, WriteKind};
use crate::{RandomiserError, Result};

/// Staged form of a structured feature.
#[derive(Clone, Debug)]
pub enum Staged<T> {
    Disabled,
    Enabled,
    Structured(T),
}

impl<T: Default> Staged<T> {
    fn structured_mut(&mut self) -> &mut T {
        if !matches!(self, Staged::Structured(_)) {
            *self = Staged::Structured(T::default());
        }
        match self {
            Staged::Structured(value) => value,
            _ => unreachable!("staged value was just made structured"),
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        *self = if enabled { Staged::Enabled } else { Staged::Disabled };
    }
}

/// Relic settings copied from a parent are dropped as a whole the first
/// time the child sets its own.
#[derive(Clone, Debug)]
enum Layer<T> {
    Inherited(T),
    Own(T),
}

impl<T: Default> Default for Layer<T> {
    fn default() -> Self {
        Layer::Own(T::default())
    }
}

impl<T: Default> Layer<T> {
    fn own_mut(&mut self) -> &mut T {
        if let Layer::Inherited(_) = self {
            *self = Layer::Own(T::default());
        }
        match self {
            Layer::Own(value) => value,
            Layer::Inherited(_) => unreachable!("layer was just made own"),
        }
    }

    fn get(&self) -> &T {
        match self {
            Layer::Inherited(value) | Layer::Own(value) => value,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum DropKey {
    All,
    Global,
    Librarian,
    Enemy(&'static Enemy),
}

impl DropKey {
    fn rank(&self) -> (u8, u16) {
        match self {
            DropKey::All => (0, 0),
            DropKey::Global => (1, 0),
            DropKey::Librarian => (2, 0),
            DropKey::Enemy(enemy) => (3, enemy.id),
        }
    }
}

impl PartialEq for DropKey {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl Eq for DropKey {}

impl PartialOrd for DropKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DropKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

#[derive(Copy, Clone, Debug)]
enum ItemKey {
    Any,
    Item(&'static Item),
}

impl ItemKey {
    fn rank(&self) -> (u8, u16) {
        match self {
            ItemKey::Any => (0, 0),
            ItemKey::Item(item) => (1, item.id),
        }
    }

    fn name(&self) -> String {
        match self {
            ItemKey::Any => "*".to_string(),
            ItemKey::Item(item) => item.name.to_string(),
        }
    }
}

impl PartialEq for ItemKey {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl Eq for ItemKey {}

impl PartialOrd for ItemKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ItemKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

#[derive(Clone, Debug, Default)]
struct StagedDrops {
    drops: BTreeMap<DropKey, Vec<Option<&'static Item>>>,
    blocked: BTreeMap<DropKey, Vec<&'static Item>>,
}

#[derive(Clone, Debug, Default)]
struct StagedEquipment {
    slots: BTreeMap<Slot, Vec<Option<&'static Item>>>,
    blocked: BTreeMap<Slot, Vec<&'static Item>>,
}

type StagedTiles = BTreeMap<ZoneKey, BTreeMap<ItemKey, BTreeMap<usize, Vec<&'static Item>>>>;

#[derive(Clone, Debug, Default)]
struct StagedItems {
    zones: StagedTiles,
    blocked: StagedTiles,
}

#[derive(Clone, Debug, Default)]
struct StagedRewards {
    rewards: BTreeMap<Reward, Vec<Option<&'static Item>>>,
    blocked: BTreeMap<Reward, Vec<&'static Item>>,
}

#[derive(Clone, Debug, Default)]
struct StagedRelics {
    locks: BTreeMap<String, Vec<String>>,
    escapes: BTreeMap<String, Vec<String>>,
    placed: Layer<BTreeMap<String, Vec<Option<char>>>>,
    replaced: Layer<BTreeMap<char, &'static Item>>,
    blocked: Layer<BTreeMap<String, Vec<Option<char>>>>,
}

#[derive(Clone, Debug, Default)]
struct Aliases {
    zones: BTreeMap<String, String>,
    enemies: BTreeMap<String, String>,
    relics: BTreeMap<String, String>,
    locations: BTreeMap<String, String>,
    items: BTreeMap<String, String>,
}

fn resolve<'a>(aliases: &'a BTreeMap<String, String>, name: &'a str) -> &'a str {
    aliases.get(name).map(String::as_str).unwrap_or(name)
}

fn config(message: impl Into<String>) -> RandomiserError {
    RandomiserError::Config(message.into())
}

/// Unique ability codes of a lock, in first-seen order.
fn dedup_lock(lock: &str) -> String {
    let mut out = String::new();
    for c in lock.chars() {
        if !out.contains(c) {
            out.push(c);
        }
    }
    out
}

/// Append alternatives, skipping any already present as the same set of abilities.
fn append_locks(target: &mut Vec<String>, locks: Vec<String>) {
    for lock in locks {
        if lock.is_empty() {
            continue;
        }
        let mut key: Vec<char> = lock.chars().collect();
        key.sort_unstable();
        let present = target.iter().any(|existing| {
            let mut other: Vec<char> = existing.chars().collect();
            other.sort_unstable();
            other == key
        });
        if !present {
            target.push(lock);
        }
    }
}

pub struct PresetBuilder {
    catalog: Catalog,
    metadata: Metadata,
    aliases: Aliases,
    drops: Staged<StagedDrops>,
    equipment: Staged<StagedEquipment>,
    items: Staged<StagedItems>,
    rewards: Staged<StagedRewards>,
    relics: Staged<StagedRelics>,
    extension: Option<Extension>,
    leak_prevention: bool,
    thrust_sword: bool,
    goal: Option<ComplexityGoal>,
    stats: bool,
    music: bool,
    turkey: bool,
    colorrando: bool,
    magicmax: bool,
    anti_freeze: bool,
    mypurse: bool,
    mapcolor: Option<MapColor>,
    writes: Vec<Write>,
}

impl PresetBuilder {
    pub fn new(catalog: Catalog, metadata: Metadata) -> Self {
        PresetBuilder {
            catalog,
            metadata,
            aliases: Aliases::default(),
            drops: Staged::Enabled,
            equipment: Staged::Enabled,
            items: Staged::Enabled,
            rewards: Staged::Enabled,
            relics: Staged::Enabled,
            extension: Some(Extension::Guarded),
            leak_prevention: true,
            thrust_sword: false,
            goal: None,
            stats: true,
            music: true,
            turkey: true,
            colorrando: false,
            magicmax: false,
            anti_freeze: false,
            mypurse: false,
            mapcolor: None,
            writes: Vec::new(),
        }
    }

    /// Walk a preset document. `built` holds the presets available as parents.
    pub fn from_schema(catalog: Catalog, doc: &PresetDocument, built: &[Preset]) -> Result<Self> {
        let mut builder = PresetBuilder::new(catalog, doc.metadata.clone());
        for alias in &doc.alias {
            if let Some(zone) = &alias.zone {
                builder.zone_alias(zone, &alias.alias);
            }
            if let Some(enemy) = &alias.enemy {
                builder.enemy_alias(enemy, &alias.alias);
            }
            if let Some(relic) = &alias.relic {
                builder.relic_alias(relic, &alias.alias);
            }
            if let Some(location) = &alias.location {
                builder.location_alias(location, &alias.alias);
            }
            if let Some(item) = &alias.item {
                builder.item_alias(item, &alias.alias);
            }
        }
        if let Some(parent) = &doc.inherits {
            let preset = built
                .iter()
                .find(|preset| &preset.id == parent)
                .ok_or_else(|| config(format!("unknown parent preset: {}", parent)))?;
            builder.inherits(preset)?;
        }
        match &doc.item_locations {
            Some(BoolOr::Bool(enabled)) => builder.item_locations_enabled(*enabled),
            Some(BoolOr::Value(entries)) => {
                for entry in entries {
                    let replacements = entry.replacement.to_vec();
                    let names: Vec<&str> = replacements.iter().map(String::as_str).collect();
                    builder.item_locations(&entry.zone, &entry.item, entry.index.unwrap_or(1), &names)?;
                }
            }
            None => {}
        }
        for entry in &doc.block_items {
            let replacements = entry.replacement.to_vec();
            let names: Vec<&str> = replacements.iter().map(String::as_str).collect();
            builder.block_item(&entry.zone, &entry.item, entry.index.unwrap_or(1), &names)?;
        }
        match &doc.enemy_drops {
            Some(BoolOr::Bool(enabled)) => builder.enemy_drops_enabled(*enabled),
            Some(BoolOr::Value(entries)) => {
                for entry in entries {
                    let items = entry.items.to_vec();
                    let names: Vec<Option<&str>> = items.iter().map(|item| item.as_deref()).collect();
                    builder.enemy_drops(&entry.enemy, entry.level, &names)?;
                }
            }
            None => {}
        }
        for entry in &doc.block_drops {
            let items: Vec<String> = entry.items.to_vec().into_iter().flatten().collect();
            let names: Vec<&str> = items.iter().map(String::as_str).collect();
            builder.block_drops(&entry.enemy, entry.level, &names)?;
        }
        match &doc.prologue_rewards {
            Some(BoolOr::Bool(enabled)) => builder.prologue_rewards_enabled(*enabled),
            Some(BoolOr::Value(entries)) => {
                for entry in entries {
                    let items = entry.replacement.to_vec();
                    let names: Vec<Option<&str>> = items.iter().map(|item| item.as_deref()).collect();
                    builder.prologue_rewards(&entry.item, &names)?;
                }
            }
            None => {}
        }
        for entry in &doc.block_rewards {
            let items: Vec<String> = entry.replacement.to_vec().into_iter().flatten().collect();
            let names: Vec<&str> = items.iter().map(String::as_str).collect();
            builder.block_reward(&entry.item, &names)?;
        }
        match &doc.starting_equipment {
            Some(BoolOr::Bool(enabled)) => builder.starting_equipment_enabled(*enabled),
            Some(BoolOr::Value(entries)) => {
                for entry in entries {
                    let slot = slot_from_name(&entry.slot)?;
                    let items = entry.item.to_vec();
                    let names: Vec<Option<&str>> = items.iter().map(|item| item.as_deref()).collect();
                    builder.starting_equipment(slot, &names)?;
                }
            }
            None => {}
        }
        for entry in &doc.block_equipment {
            let slot = slot_from_name(&entry.slot)?;
            let items: Vec<String> = entry.item.to_vec().into_iter().flatten().collect();
            let names: Vec<&str> = items.iter().map(String::as_str).collect();
            builder.block_equipment(slot, &names)?;
        }
        if let Some(enabled) = doc.relic_locations {
            builder.relic_locations(enabled);
        }
        if let Some(enabled) = doc.prevent_leaks {
            builder.prevent_leaks(enabled);
        }
        if let Some(enabled) = doc.thrust_sword_ability {
            builder.thrust_sword_ability(enabled);
        }
        match &doc.relic_locations_extension {
            Some(BoolOr::Bool(false)) => builder.relic_locations_extension(None),
            Some(BoolOr::Bool(true)) => builder.relic_locations_extension(Some(Extension::Guarded)),
            Some(BoolOr::Value(name)) => {
                let extension = Extension::from_name(name)
                    .ok_or_else(|| config(format!("invalid relic locations extension: {}", name)))?;
                builder.relic_locations_extension(Some(extension));
            }
            None => {}
        }
        for entry in &doc.lock_location {
            let location = entry.location.as_str();
            if let Some(locks) = &entry.locks {
                let locks = builder.locks_from_names(locks)?;
                let locks: Vec<&str> = locks.iter().map(String::as_str).collect();
                builder.lock_location(location, &locks)?;
            }
            if let Some(block) = &entry.block {
                let relics = builder.relics_from_names(&block.to_vec())?;
                builder.block_relic(location, &relics)?;
            }
            if let Some(escapes) = &entry.escape_requires {
                let escapes = builder.locks_from_names(escapes)?;
                let escapes: Vec<&str> = escapes.iter().map(String::as_str).collect();
                builder.escape_requires(location, &escapes)?;
            }
        }
        for entry in &doc.place_relic {
            let relics = builder.relics_from_names(&entry.relic.to_vec())?;
            builder.place_relic(&entry.location, &relics)?;
        }
        for entry in &doc.replace_relic {
            let relic = builder.relic_from_name(&entry.relic)?;
            builder.replace_relic(relic, &entry.item)?;
        }
        match &doc.complexity_goal {
            Some(BoolOr::Bool(false)) => builder.clear_complexity_goal(),
            Some(BoolOr::Bool(true)) => return Err(config("complexity goal needs a target")),
            Some(BoolOr::Value(goal)) => {
                let goals = builder.locks_from_names(&goal.goals)?;
                let goals: Vec<&str> = goals.iter().map(String::as_str).collect();
                builder.complexity_goal(goal.min, goal.max, &goals)?;
            }
            None => {}
        }
        if let Some(enabled) = doc.stats {
            builder.randomize_stats(enabled);
        }
        if let Some(enabled) = doc.music {
            builder.randomize_music(enabled);
        }
        if let Some(enabled) = doc.turkey_mode {
            builder.turkey_mode(enabled);
        }
        if let Some(enabled) = doc.colorrando_mode {
            builder.colorrando_mode(enabled);
        }
        if let Some(enabled) = doc.magicmax_mode {
            builder.magicmax_mode(enabled);
        }
        if let Some(enabled) = doc.anti_freeze_mode {
            builder.anti_freeze_mode(enabled);
        }
        if let Some(enabled) = doc.mypurse_mode {
            builder.mypurse_mode(enabled);
        }
        match &doc.mapcolor_theme {
            Some(BoolOr::Bool(false)) => builder.mapcolor_theme(None),
            Some(BoolOr::Bool(true)) => builder.mapcolor_theme(Some(MapColor::DarkBlue)),
            Some(BoolOr::Value(name)) => {
                let color = MapColor::from_name(name)
                    .ok_or_else(|| config(format!("unknown map color: {}", name)))?;
                builder.mapcolor_theme(Some(color));
            }
            None => {}
        }
        let mut last_address = 0;
        for entry in &doc.writes {
            let address = match &entry.address {
                Some(address) => number(address)? as u32,
                None => last_address,
            };
            last_address = if entry.enabled.unwrap_or(true) {
                builder.write(address, write_value(entry)?)?
            } else {
                address
            };
        }
        Ok(builder)
    }

    pub fn zone_alias(&mut self, what: &str, alias: &str) {
        self.aliases.zones.insert(alias.to_string(), what.to_string());
    }

    pub fn enemy_alias(&mut self, what: &str, alias: &str) {
        self.aliases.enemies.insert(alias.to_string(), what.to_string());
    }

    pub fn relic_alias(&mut self, what: &str, alias: &str) {
        self.aliases.relics.insert(alias.to_string(), what.to_string());
    }

    pub fn location_alias(&mut self, what: &str, alias: &str) {
        self.aliases.locations.insert(alias.to_string(), what.to_string());
    }

    pub fn item_alias(&mut self, what: &str, alias: &str) {
        self.aliases.items.insert(alias.to_string(), what.to_string());
    }

    fn item(&self, name: &str) -> Result<&'static Item> {
        self.catalog.item_by_name(resolve(&self.aliases.items, name))
    }

    fn relic_from_name(&self, name: &str) -> Result<char> {
        Ok(self
            .catalog
            .relic_by_name(resolve(&self.aliases.relics, name.trim()))?
            .ability)
    }

    /// `"Soul of Bat + Leap Stone"` style locks to ability code strings.
    fn locks_from_names(&self, locks: &[String]) -> Result<Vec<String>> {
        locks
            .iter()
            .map(|lock| {
                lock.split('+')
                    .filter(|name| !name.trim().is_empty())
                    .map(|name| self.relic_from_name(name))
                    .collect::<Result<String>>()
            })
            .collect()
    }

    fn relics_from_names(&self, names: &[Option<String>]) -> Result<Vec<Option<char>>> {
        names
            .iter()
            .map(|name| name.as_deref().map(|name| self.relic_from_name(name)).transpose())
            .collect()
    }

    fn location_id(&self, location: &str) -> Result<String> {
        Ok(self
            .catalog
            .location_by_id(resolve(&self.aliases.locations, location))?
            .id())
    }

    fn ability(&self, c: char) -> Result<char> {
        Ok(self.catalog.relic_by_ability(c)?.ability)
    }

    fn lock(&self, lock: &str) -> Result<String> {
        for c in lock.chars() {
            self.ability(c)?;
        }
        Ok(dedup_lock(lock))
    }

    fn drop_key(&self, enemy: &str, level: Option<u8>) -> Result<DropKey> {
        let enemy = resolve(&self.aliases.enemies, enemy);
        Ok(match enemy {
            ALL_ENEMIES => DropKey::All,
            GLOBAL_DROP => DropKey::Global,
            LIBRARIAN_DROP => DropKey::Librarian,
            _ => DropKey::Enemy(self.catalog.enemy_by_name_and_level(enemy, level)?),
        })
    }

    fn zone_key(&self, zone: &str) -> Result<ZoneKey> {
        let zone = resolve(&self.aliases.zones, zone);
        if zone == "*" {
            return Ok(ZoneKey::All);
        }
        Zone::from_code(zone)
            .map(ZoneKey::Zone)
            .ok_or_else(|| RandomiserError::UnknownZone(zone.to_string()))
    }

    /// Copy a built parent into the staged representation.
    pub fn inherits(&mut self, parent: &Preset) -> Result<()> {
        debug!("{} inherits {}", self.metadata.id, parent.id);
        let options = &parent.options;
        match &options.enemy_drops {
            Feature::Unset => {}
            Feature::Disabled => self.drops = Staged::Disabled,
            Feature::Enabled => self.drops = Staged::Enabled,
            Feature::Custom(drops) => {
                let mut staged = StagedDrops::default();
                for (key, items) in &drops.drops {
                    let items = items
                        .iter()
                        .map(|item| item.as_deref().map(|name| self.catalog.item_by_name(name)).transpose())
                        .collect::<Result<Vec<_>>>()?;
                    staged.drops.insert(self.drop_key_from_id(key)?, items);
                }
                for (key, items) in &drops.blocked {
                    staged.blocked.insert(self.drop_key_from_id(key)?, self.items_by_name(items)?);
                }
                self.drops = Staged::Structured(staged);
            }
        }
        match &options.starting_equipment {
            Feature::Unset => {}
            Feature::Disabled => self.equipment = Staged::Disabled,
            Feature::Enabled => self.equipment = Staged::Enabled,
            Feature::Custom(equipment) => {
                let mut staged = StagedEquipment::default();
                for (slot, items) in &equipment.slots {
                    staged.slots.insert(*slot, self.optional_items_by_name(items)?);
                }
                for (slot, items) in &equipment.blocked {
                    staged.blocked.insert(*slot, self.items_by_name(items)?);
                }
                self.equipment = Staged::Structured(staged);
            }
        }
        match &options.item_locations {
            Feature::Unset => {}
            Feature::Disabled => self.items = Staged::Disabled,
            Feature::Enabled => self.items = Staged::Enabled,
            Feature::Custom(locations) => {
                self.items = Staged::Structured(StagedItems {
                    zones: self.stage_tiles(&locations.zones)?,
                    blocked: self.stage_tiles(&locations.blocked)?,
                });
            }
        }
        match &options.prologue_rewards {
            Feature::Unset => {}
            Feature::Disabled => self.rewards = Staged::Disabled,
            Feature::Enabled => self.rewards = Staged::Enabled,
            Feature::Custom(rewards) => {
                let mut staged = StagedRewards::default();
                for (reward, items) in &rewards.rewards {
                    staged.rewards.insert(*reward, self.optional_items_by_name(items)?);
                }
                for (reward, items) in &rewards.blocked {
                    staged.blocked.insert(*reward, self.items_by_name(items)?);
                }
                self.rewards = Staged::Structured(staged);
            }
        }
        match &options.relic_locations {
            Feature::Unset => {}
            Feature::Disabled => self.relics = Staged::Disabled,
            Feature::Enabled => self.relics = Staged::Enabled,
            Feature::Custom(relics) => {
                let mut staged = StagedRelics::default();
                for (location, locks) in &relics.locations {
                    if !locks.locks.is_empty() {
                        staged.locks.insert(location.clone(), locks.locks.clone());
                    }
                    if !locks.escapes.is_empty() {
                        staged.escapes.insert(location.clone(), locks.escapes.clone());
                    }
                }
                staged.placed = Layer::Inherited(relics.placed.clone());
                let mut replaced = BTreeMap::new();
                for (relic, item) in &relics.replaced {
                    replaced.insert(*relic, self.catalog.item_by_name(item)?);
                }
                staged.replaced = Layer::Inherited(replaced);
                staged.blocked = Layer::Inherited(relics.blocked.clone());
                self.relics = Staged::Structured(staged);
                self.extension = relics.extension;
                self.leak_prevention = relics.leak_prevention();
                self.thrust_sword = relics.thrust_sword_ability();
                self.goal = relics.goal.clone();
            }
        }
        let flags = [
            (&mut self.stats, options.stats),
            (&mut self.music, options.music),
            (&mut self.turkey, options.turkey_mode),
            (&mut self.colorrando, options.colorrando_mode),
            (&mut self.magicmax, options.magicmax_mode),
            (&mut self.anti_freeze, options.anti_freeze_mode),
            (&mut self.mypurse, options.mypurse_mode),
        ];
        for (target, value) in flags {
            if let Some(value) = value {
                *target = value;
            }
        }
        if options.mapcolor_theme.is_some() {
            self.mapcolor = options.mapcolor_theme;
        }
        if let Some(writes) = &options.writes {
            self.writes.extend(writes.iter().cloned());
        }
        Ok(())
    }

    fn drop_key_from_id(&self, id: &str) -> Result<DropKey> {
        Ok(match id {
            ALL_ENEMIES => DropKey::All,
            GLOBAL_DROP => DropKey::Global,
            LIBRARIAN_DROP => DropKey::Librarian,
            _ => DropKey::Enemy(self.catalog.enemy_by_id(id)?),
        })
    }

    fn items_by_name(&self, names: &[String]) -> Result<Vec<&'static Item>> {
        names.iter().map(|name| self.catalog.item_by_name(name)).collect()
    }

    fn optional_items_by_name(&self, names: &[Option<String>]) -> Result<Vec<Option<&'static Item>>> {
        names
            .iter()
            .map(|name| name.as_deref().map(|name| self.catalog.item_by_name(name)).transpose())
            .collect()
    }

    fn stage_tiles(&self, tiles: &TileOverrides) -> Result<StagedTiles> {
        let mut staged = StagedTiles::new();
        for (zone, items) in tiles {
            for (item, indexes) in items {
                let key = if item == "*" {
                    ItemKey::Any
                } else {
                    ItemKey::Item(self.catalog.item_by_name(item)?)
                };
                for (index, replacements) in indexes {
                    staged
                        .entry(*zone)
                        .or_default()
                        .entry(key)
                        .or_default()
                        .insert(*index, self.items_by_name(replacements)?);
                }
            }
        }
        Ok(staged)
    }

    pub fn enemy_drops_enabled(&mut self, enabled: bool) {
        self.drops.set_enabled(enabled);
    }

    /// Set the drops of one enemy (or `*`, `Global`, `Librarian`).
    /// `None` leaves a drop slot empty.
    pub fn enemy_drops(&mut self, enemy: &str, level: Option<u8>, items: &[Option<&str>]) -> Result<()> {
        let key = self.drop_key(enemy, level)?;
        if key != DropKey::Global && items.len() > 2 {
            return Err(config(format!("too many drops for {}", enemy)));
        }
        let items = items
            .iter()
            .map(|item| item.map(|name| self.item(name)).transpose())
            .collect::<Result<Vec<_>>>()?;
        self.drops.structured_mut().drops.insert(key, items);
        Ok(())
    }

    pub fn block_drops(&mut self, enemy: &str, level: Option<u8>, items: &[&str]) -> Result<()> {
        let key = self.drop_key(enemy, level)?;
        let items = items.iter().map(|name| self.item(name)).collect::<Result<Vec<_>>>()?;
        self.drops.structured_mut().blocked.insert(key, items);
        Ok(())
    }

    pub fn starting_equipment_enabled(&mut self, enabled: bool) {
        self.equipment.set_enabled(enabled);
    }

    pub fn starting_equipment(&mut self, slot: Slot, items: &[Option<&str>]) -> Result<()> {
        let items = items
            .iter()
            .map(|item| item.map(|name| self.item(name)).transpose())
            .collect::<Result<Vec<_>>>()?;
        for item in items.iter().flatten() {
            check_slot(&self.catalog, slot, item.name)?;
            self.check_hands(slot, item)?;
        }
        self.equipment.structured_mut().slots.insert(slot, items);
        Ok(())
    }

    fn check_hands(&self, slot: Slot, item: &Item) -> Result<()> {
        let (Some(other), Staged::Structured(staged)) = (slot.other_hand(), &self.equipment) else {
            return Ok(());
        };
        for held in staged.slots.get(&other).into_iter().flatten().flatten() {
            if item.kind == ItemType::Weapon2 || held.kind == ItemType::Weapon2 {
                return Err(config(format!("cannot equip {} and {}", held.name, item.name)));
            }
        }
        Ok(())
    }

    pub fn block_equipment(&mut self, slot: Slot, items: &[&str]) -> Result<()> {
        let items = items.iter().map(|name| self.item(name)).collect::<Result<Vec<_>>>()?;
        for item in &items {
            check_slot(&self.catalog, slot, item.name)?;
        }
        self.equipment.structured_mut().blocked.insert(slot, items);
        Ok(())
    }

    pub fn item_locations_enabled(&mut self, enabled: bool) {
        self.items.set_enabled(enabled);
    }

    fn tile_entry(&self, zone: &str, item: &str, number: usize, replacements: &[&str]) -> Result<(ZoneKey, ItemKey, usize, Vec<&'static Item>)> {
        let zone = self.zone_key(zone)?;
        if number == 0 {
            return Err(config(format!("unknown item number: {}", number)));
        }
        let index = number - 1;
        let key = if item == "*" {
            ItemKey::Any
        } else {
            let item = self.item(item)?;
            check_tile(&self.catalog, zone, item.name, index)?;
            ItemKey::Item(item)
        };
        let replacements = replacements
            .iter()
            .map(|name| self.item(name))
            .collect::<Result<Vec<_>>>()?;
        Ok((zone, key, index, replacements))
    }

    /// Replace the `number`-th (one based) tile of `item` in `zone`.
    pub fn item_locations(&mut self, zone: &str, item: &str, number: usize, replacements: &[&str]) -> Result<()> {
        let (zone, key, index, replacements) = self.tile_entry(zone, item, number, replacements)?;
        self.items
            .structured_mut()
            .zones
            .entry(zone)
            .or_default()
            .entry(key)
            .or_default()
            .insert(index, replacements);
        Ok(())
    }

    pub fn block_item(&mut self, zone: &str, item: &str, number: usize, replacements: &[&str]) -> Result<()> {
        let (zone, key, index, replacements) = self.tile_entry(zone, item, number, replacements)?;
        self.items
            .structured_mut()
            .blocked
            .entry(zone)
            .or_default()
            .entry(key)
            .or_default()
            .insert(index, replacements);
        Ok(())
    }

    pub fn prologue_rewards_enabled(&mut self, enabled: bool) {
        self.rewards.set_enabled(enabled);
    }

    fn reward(&self, item: &str) -> Result<Reward> {
        let name = resolve(&self.aliases.items, item);
        Reward::from_item_name(name).ok_or_else(|| config(format!("unknown reward item: {}", name)))
    }

    pub fn prologue_rewards(&mut self, item: &str, replacements: &[Option<&str>]) -> Result<()> {
        let reward = self.reward(item)?;
        let items = replacements
            .iter()
            .map(|item| item.map(|name| self.item(name)).transpose())
            .collect::<Result<Vec<_>>>()?;
        self.rewards.structured_mut().rewards.insert(reward, items);
        Ok(())
    }

    pub fn block_reward(&mut self, item: &str, blocked: &[&str]) -> Result<()> {
        let reward = self.reward(item)?;
        let items = blocked.iter().map(|name| self.item(name)).collect::<Result<Vec<_>>>()?;
        self.rewards.structured_mut().blocked.insert(reward, items);
        Ok(())
    }

    pub fn relic_locations(&mut self, enabled: bool) {
        if !enabled {
            self.relics = Staged::Disabled;
        } else if matches!(self.relics, Staged::Disabled) {
            self.relics = Staged::Enabled;
        }
    }

    pub fn prevent_leaks(&mut self, enabled: bool) {
        self.leak_prevention = enabled;
    }

    pub fn thrust_sword_ability(&mut self, enabled: bool) {
        self.thrust_sword = enabled;
    }

    pub fn relic_locations_extension(&mut self, extension: Option<Extension>) {
        self.extension = extension;
    }

    /// Add access alternatives to a location. Each lock is a string of
    /// ability codes.
    pub fn lock_location(&mut self, location: &str, locks: &[&str]) -> Result<()> {
        let location = self.location_id(location)?;
        let locks = locks.iter().map(|lock| self.lock(lock)).collect::<Result<Vec<_>>>()?;
        append_locks(self.relics.structured_mut().locks.entry(location).or_default(), locks);
        Ok(())
    }

    /// Add escape alternatives: one of them must be obtainable without the location.
    pub fn escape_requires(&mut self, location: &str, escapes: &[&str]) -> Result<()> {
        let location = self.location_id(location)?;
        let escapes = escapes.iter().map(|lock| self.lock(lock)).collect::<Result<Vec<_>>>()?;
        append_locks(self.relics.structured_mut().escapes.entry(location).or_default(), escapes);
        Ok(())
    }

    /// Relics a location must not hold. `None` forbids leaving it empty.
    pub fn block_relic(&mut self, location: &str, relics: &[Option<char>]) -> Result<()> {
        let location = self.location_id(location)?;
        for relic in relics.iter().flatten() {
            self.ability(*relic)?;
        }
        self.relics
            .structured_mut()
            .blocked
            .own_mut()
            .insert(location, relics.to_vec());
        Ok(())
    }

    /// Candidates for a location; one is picked per seed. `None` allows it to stay empty.
    pub fn place_relic(&mut self, location: &str, relics: &[Option<char>]) -> Result<()> {
        let location = self.location_id(location)?;
        for relic in relics.iter().flatten() {
            self.ability(*relic)?;
        }
        self.relics
            .structured_mut()
            .placed
            .own_mut()
            .insert(location, relics.to_vec());
        Ok(())
    }

    pub fn replace_relic(&mut self, relic: char, item: &str) -> Result<()> {
        let relic = self.ability(relic)?;
        let item = self.item(item)?;
        self.relics.structured_mut().replaced.own_mut().insert(relic, item);
        Ok(())
    }

    pub fn complexity_goal(&mut self, min: u32, max: Option<u32>, goals: &[&str]) -> Result<()> {
        if max.map_or(false, |max| max < min) {
            return Err(config(format!("invalid complexity: {}-{:?}", min, max)));
        }
        let goals = goals
            .iter()
            .map(|lock| self.lock(lock))
            .filter(|lock| !matches!(lock, Ok(lock) if lock.is_empty()))
            .collect::<Result<Vec<_>>>()?;
        if goals.is_empty() {
            return Err(config("complexity goal has no abilities"));
        }
        self.goal = Some(ComplexityGoal { min, max, goals });
        Ok(())
    }

    pub fn clear_complexity_goal(&mut self) {
        self.goal = None;
    }

    pub fn randomize_stats(&mut self, enabled: bool) {
        self.stats = enabled;
    }

    pub fn randomize_music(&mut self, enabled: bool) {
        self.music = enabled;
    }

    pub fn turkey_mode(&mut self, enabled: bool) {
        self.turkey = enabled;
    }

    pub fn colorrando_mode(&mut self, enabled: bool) {
        self.colorrando = enabled;
    }

    pub fn magicmax_mode(&mut self, enabled: bool) {
        self.magicmax = enabled;
    }

    pub fn anti_freeze_mode(&mut self, enabled: bool) {
        self.anti_freeze = enabled;
    }

    pub fn mypurse_mode(&mut self, enabled: bool) {
        self.mypurse = enabled;
    }

    pub fn mapcolor_theme(&mut self, color: Option<MapColor>) {
        self.mapcolor = color;
    }

    /// Stage a raw write and return the address the next one continues from.
    pub fn write(&mut self, address: u32, value: WriteValue) -> Result<u32> {
        if address < MIN_WRITE_ADDRESS {
            return Err(config(format!("bad address: 0x{:08x}", address)));
        }
        let len = value.len() as u32;
        let next = match value {
            WriteValue::Bytes(_) => address + len,
            _ => next_address(address, len),
        };
        self.writes.push(Write { address, value });
        Ok(next)
    }

    pub fn write_char(&mut self, address: u32, value: u8) -> Result<u32> {
        self.write(address, WriteValue::Char(value))
    }

    pub fn write_short(&mut self, address: u32, value: u16) -> Result<u32> {
        self.write(address, WriteValue::Short(value))
    }

    pub fn write_word(&mut self, address: u32, value: u32) -> Result<u32> {
        self.write(address, WriteValue::Word(value))
    }

    pub fn write_long(&mut self, address: u32, value: u64) -> Result<u32> {
        self.write(address, WriteValue::Long(value))
    }

    pub fn write_string(&mut self, address: u32, bytes: &[u8]) -> Result<u32> {
        self.write(address, WriteValue::Bytes(bytes.to_vec()))
    }

    fn drop_id(&self, key: &DropKey) -> String {
        match key {
            DropKey::All => ALL_ENEMIES.to_string(),
            DropKey::Global => GLOBAL_DROP.to_string(),
            DropKey::Librarian => LIBRARIAN_DROP.to_string(),
            DropKey::Enemy(enemy) => self.catalog.enemy_id(enemy),
        }
    }

    fn build_relics(&self) -> Result<Feature<RelicLocations>> {
        let staged = match &self.relics {
            Staged::Disabled => {
                if self.goal.is_some() {
                    return Err(config(format!(
                        "{}: complexity goal set without relic location randomization",
                        self.metadata.id
                    )));
                }
                return Ok(Feature::Disabled);
            }
            // A bare switch resolves to the default lock table. A goal still
            // needs a table of its own to travel with.
            Staged::Enabled if self.goal.is_none() => return Ok(Feature::Enabled),
            Staged::Enabled => StagedRelics::default(),
            Staged::Structured(staged) => staged.clone(),
        };
        let mut locations: BTreeMap<String, LocationLocks> = BTreeMap::new();
        for location in self.catalog.locations() {
            let id = location.id();
            let locks = staged.locks.get(&id).cloned().unwrap_or_default();
            let escapes = staged.escapes.get(&id).cloned().unwrap_or_default();
            if !locks.is_empty() || !escapes.is_empty() {
                locations.insert(id, LocationLocks { locks, escapes });
            }
        }
        Ok(Feature::Custom(RelicLocations {
            locations,
            goal: self.goal.clone(),
            extension: self.extension,
            leak_prevention: if self.leak_prevention { None } else { Some(false) },
            thrust_sword_ability: if self.thrust_sword { Some(true) } else { None },
            placed: staged.placed.get().clone(),
            replaced: staged
                .replaced
                .get()
                .iter()
                .map(|(relic, item)| (*relic, item.name.to_string()))
                .collect(),
            blocked: staged.blocked.get().clone(),
        }))
    }

    pub fn build(&self) -> Result<Preset> {
        let enemy_drops = match &self.drops {
            Staged::Disabled => Feature::Disabled,
            Staged::Enabled => Feature::Enabled,
            Staged::Structured(staged) => Feature::Custom(EnemyDrops {
                drops: staged
                    .drops
                    .iter()
                    .map(|(key, items)| (self.drop_id(key), names_or_empty(items)))
                    .collect(),
                blocked: staged
                    .blocked
                    .iter()
                    .map(|(key, items)| (self.drop_id(key), names(items)))
                    .collect(),
            }),
        };
        let starting_equipment = match &self.equipment {
            Staged::Disabled => Feature::Disabled,
            Staged::Enabled => Feature::Enabled,
            Staged::Structured(staged) => Feature::Custom(StartingEquipment {
                slots: staged.slots.iter().map(|(slot, items)| (*slot, names_or_empty(items))).collect(),
                blocked: staged.blocked.iter().map(|(slot, items)| (*slot, names(items))).collect(),
            }),
        };
        let item_locations = match &self.items {
            Staged::Disabled => Feature::Disabled,
            Staged::Enabled => Feature::Enabled,
            Staged::Structured(staged) => Feature::Custom(ItemLocations {
                zones: tile_names(&staged.zones),
                blocked: tile_names(&staged.blocked),
            }),
        };
        let prologue_rewards = match &self.rewards {
            Staged::Disabled => Feature::Disabled,
            Staged::Enabled => Feature::Enabled,
            Staged::Structured(staged) => Feature::Custom(PrologueRewards {
                rewards: staged.rewards.iter().map(|(reward, items)| (*reward, names_or_empty(items))).collect(),
                blocked: staged.blocked.iter().map(|(reward, items)| (*reward, names(items))).collect(),
            }),
        };
        let options = Options {
            preset: None,
            enemy_drops,
            starting_equipment,
            item_locations,
            prologue_rewards,
            relic_locations: self.build_relics()?,
            stats: Some(self.stats),
            music: Some(self.music),
            turkey_mode: Some(self.turkey),
            tournament_mode: None,
            colorrando_mode: Some(self.colorrando),
            magicmax_mode: Some(self.magicmax),
            anti_freeze_mode: Some(self.anti_freeze),
            mypurse_mode: Some(self.mypurse),
            mapcolor_theme: self.mapcolor,
            writes: if self.writes.is_empty() { None } else { Some(self.writes.clone()) },
        };
        Ok(Preset {
            id: self.metadata.id.clone(),
            name: self.metadata.name.clone(),
            description: self.metadata.description.clone(),
            author: self.metadata.author.clone(),
            weight: self.metadata.weight,
            hidden: self.metadata.hidden,
            override_: self.metadata.override_,
            options,
        })
    }
}

fn names(items: &[&'static Item]) -> Vec<String> {
    items.iter().map(|item| item.name.to_string()).collect()
}

fn names_or_empty(items: &[Option<&'static Item>]) -> Vec<Option<String>> {
    items.iter().map(|item| item.map(|item| item.name.to_string())).collect()
}

fn tile_names(tiles: &StagedTiles) -> TileOverrides {
    tiles
        .iter()
        .map(|(zone, items)| {
            let items = items
                .iter()
                .map(|(key, indexes)| {
                    let indexes = indexes
                        .iter()
                        .map(|(index, replacements)| (*index, names(replacements)))
                        .collect();
                    (key.name(), indexes)
                })
                .collect();
            (*zone, items)
        })
        .collect()
}

fn slot_from_name(name: &str) -> Result<Slot> {
    Slot::from_name(name).ok_or_else(|| config(format!("unknown equipment slot: {}", name)))
}

fn number(value: &NumberOrText) -> Result<u64> {
    match value {
        NumberOrText::Number(n) => Ok(*n),
        NumberOrText::Text(text) => parse_number(text),
    }
}

fn write_value(entry: &WriteEntry) -> Result<WriteValue> {
    let random = match (&entry.kind, &entry.value) {
        (kind, NumberOrText::Text(text)) => match (kind, text.as_str()) {
            (WriteKind::Char, "random") => Some(RandomValue::Char),
            (WriteKind::Char, "random1") => Some(RandomValue::Bit),
            (WriteKind::Char, "random3") => Some(RandomValue::UpTo3),
            (WriteKind::Char, "random10") => Some(RandomValue::UpTo10),
            (WriteKind::Char, "random99") => Some(RandomValue::UpTo99),
            (WriteKind::Short, "random") => Some(RandomValue::Short),
            (WriteKind::Word, "random") => Some(RandomValue::Word),
            (WriteKind::Word, "randomRelic") => Some(RandomValue::Relic),
            (WriteKind::Long, "random") => Some(RandomValue::Long),
            _ => None,
        },
        _ => None,
    };
    if let Some(kind) = random {
        return Ok(WriteValue::Random(kind));
    }
    let out_of_range = |value: u64| config(format!("write value out of range: {}", value));
    Ok(match entry.kind {
        WriteKind::Char => {
            let value = number(&entry.value)?;
            WriteValue::Char(u8::try_from(value).map_err(|_| out_of_range(value))?)
        }
        WriteKind::Short => {
            let value = number(&entry.value)?;
            WriteValue::Short(u16::try_from(value).map_err(|_| out_of_range(value))?)
        }
        WriteKind::Word => {
            let value = number(&entry.value)?;
            WriteValue::Word(u32::try_from(value).map_err(|_| out_of_range(value))?)
        }
        WriteKind::Long => WriteValue::Long(number(&entry.value)?),
        WriteKind::String => match &entry.value {
            NumberOrText::Text(hex) => WriteValue::Bytes(parse_hex_bytes(hex)?),
            NumberOrText::Number(n) => return Err(config(format!("string write needs hex bytes, got {}", n))),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SECTOR_SIZE;

    fn metadata(id: &str) -> Metadata {
        Metadata {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            author: String::new(),
            weight: 0,
            hidden: false,
            override_: false,
        }
    }

    fn builder(id: &str) -> PresetBuilder {
        PresetBuilder::new(Catalog::standard(), metadata(id))
    }

    fn doc(json: &str) -> PresetDocument {
        PresetDocument::from_json(json).unwrap()
    }

    #[test]
    fn defaults_resolve_every_field() {
        let preset = builder("plain").build().unwrap();
        let options = &preset.options;
        assert_eq!(options.enemy_drops, Feature::Enabled);
        assert_eq!(options.stats, Some(true));
        assert_eq!(options.colorrando_mode, Some(false));
        assert_eq!(options.relic_locations, Feature::Enabled);
    }

    #[test]
    fn bare_relic_switch_stays_enabled_until_structured() {
        let mut b = builder("switch");
        b.relic_locations(true);
        assert_eq!(b.build().unwrap().options.relic_locations, Feature::Enabled);
        b.relic_locations_extension(Some(Extension::Spread));
        b.complexity_goal(3, None, &["LV"]).unwrap();
        let preset = b.build().unwrap();
        let relics = preset.options.relic_locations.custom().unwrap();
        assert_eq!(relics.extension, Some(Extension::Spread));
        assert_eq!(relics.goal.as_ref().unwrap().min, 3);
        assert!(relics.locations.is_empty());
    }

    #[test]
    fn equipment_slots_are_checked() {
        let mut b = builder("eq");
        assert!(b.starting_equipment(Slot::Head, &[Some("Claymore")]).is_err());
        b.starting_equipment(Slot::RightHand, &[Some("Claymore")]).unwrap();
        assert!(b.starting_equipment(Slot::LeftHand, &[Some("Leather shield")]).is_err());
        assert!(matches!(
            b.starting_equipment(Slot::Other, &[Some("Excalibur")]),
            Err(RandomiserError::UnknownItem(_))
        ));
    }

    #[test]
    fn unknown_names_fail_fast() {
        let mut b = builder("names");
        assert!(matches!(b.lock_location("B", &["Q"]), Err(RandomiserError::UnknownRelic(_))));
        assert!(matches!(
            b.enemy_drops("Dracula", None, &[Some("Heart")]),
            Err(RandomiserError::UnknownEnemy(_))
        ));
        assert!(matches!(
            b.item_locations("XYZ", "Heart", 1, &["Potion"]),
            Err(RandomiserError::UnknownZone(_))
        ));
        assert!(matches!(
            b.item_locations("NO0", "Life Vessel", 3, &["Potion"]),
            Err(RandomiserError::UnknownTile { .. })
        ));
        assert!(b.item_locations("NO0", "Life Vessel", 2, &["Potion"]).is_ok());
    }

    #[test]
    fn locks_accumulate_alternatives() {
        let mut b = builder("locks");
        b.lock_location("Soul of Bat", &["ML"]).unwrap();
        b.lock_location("B", &["MVV"]).unwrap();
        b.lock_location("B", &["LM", "VM"]).unwrap();
        b.escape_requires("B", &["J"]).unwrap();
        b.escape_requires("B", &["JJ"]).unwrap();
        let preset = b.build().unwrap();
        let relics = preset.options.relic_locations.custom().unwrap();
        assert_eq!(relics.locations["B"].locks, vec!["ML".to_string(), "MV".to_string()]);
        assert_eq!(relics.locations["B"].escapes, vec!["J".to_string()]);
    }

    #[test]
    fn inheritance_keeps_parent_maps() {
        let mut parent = builder("parent");
        parent.enemy_drops("Zombie", None, &[Some("Cutlass")]).unwrap();
        parent.lock_location("B", &["L"]).unwrap();
        parent.place_relic("J", &[Some('A')]).unwrap();
        parent.write_char(0x10000, 1).unwrap();
        let parent = parent.build().unwrap();

        let mut child = builder("child");
        child.inherits(&parent).unwrap();
        child.enemy_drops("Bat", None, &[None]).unwrap();
        child.lock_location("B", &["V"]).unwrap();
        child.place_relic("V", &[Some('T')]).unwrap();
        child.write_char(0x20000, 2).unwrap();
        let child = child.build().unwrap();

        let drops = child.options.enemy_drops.custom().unwrap();
        assert_eq!(drops.drops.len(), 2);
        assert_eq!(drops.drops["Zombie"], vec![Some("Cutlass".to_string())]);
        let relics = child.options.relic_locations.custom().unwrap();
        assert_eq!(relics.locations["B"].locks, vec!["L".to_string(), "V".to_string()]);
        assert_eq!(relics.placed.len(), 1);
        assert!(relics.placed.contains_key("V"));
        let writes = child.options.writes.unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].address, 0x10000);
    }

    #[test]
    fn inheriting_without_overrides_is_identity() {
        let mut parent = builder("parent");
        parent.block_drops("*", None, &["Zircon"]).unwrap();
        parent.prologue_rewards("Potion", &[Some("Elixir")]).unwrap();
        parent.complexity_goal(4, Some(6), &["LV"]).unwrap();
        parent.randomize_music(false);
        let parent = parent.build().unwrap();
        let mut child = builder("child");
        child.inherits(&parent).unwrap();
        assert_eq!(child.build().unwrap().options, parent.options);
    }

    #[test]
    fn goals_need_relic_randomization() {
        let mut b = builder("goal");
        b.complexity_goal(3, None, &["LV"]).unwrap();
        b.relic_locations(false);
        assert!(matches!(b.build(), Err(RandomiserError::Config(_))));
        assert!(b.complexity_goal(5, Some(3), &["LV"]).is_err());
    }

    #[test]
    fn aliases_are_substituted() {
        let doc = doc(
            r#"{
                "metadata": {"id": "aliased", "name": "Aliased"},
                "alias": [
                    {"relic": "Soul of Bat", "alias": "bat"},
                    {"location": "Jewel of Open", "alias": "shop"},
                    {"item": "Cutlass", "alias": "sword"},
                    {"zone": "NO0", "alias": "gallery"},
                    {"enemy": "Zombie", "alias": "walker"}
                ],
                "lockLocation": [{"location": "shop", "locks": ["bat + Leap Stone"]}],
                "enemyDrops": [{"enemy": "walker", "items": ["sword"]}],
                "itemLocations": [{"zone": "gallery", "item": "Life Vessel", "index": 2, "replacement": "sword"}]
            }"#,
        );
        let preset = PresetBuilder::from_schema(Catalog::standard(), &doc, &[])
            .unwrap()
            .build()
            .unwrap();
        let relics = preset.options.relic_locations.custom().unwrap();
        assert_eq!(relics.locations["J"].locks, vec!["BL".to_string()]);
        let drops = preset.options.enemy_drops.custom().unwrap();
        assert_eq!(drops.drops["Zombie"], vec![Some("Cutlass".to_string())]);
        let items = preset.options.item_locations.custom().unwrap();
        assert_eq!(
            items.zones[&ZoneKey::Zone(Zone::MarbleGallery)]["Life Vessel"][&1],
            vec!["Cutlass".to_string()]
        );
    }

    #[test]
    fn forward_references_fail() {
        let doc = doc(r#"{"metadata": {"id": "child", "name": "Child"}, "inherits": "later"}"#);
        assert!(matches!(
            PresetBuilder::from_schema(Catalog::standard(), &doc, &[]),
            Err(RandomiserError::Config(_))
        ));
    }

    #[test]
    fn schema_writes_continue_addresses() {
        let base = 0x40 * SECTOR_SIZE;
        let json = format!(
            r#"{{
                "metadata": {{"id": "w", "name": "W"}},
                "writes": [
                    {{"type": "word", "address": "{}", "value": "0x12345678"}},
                    {{"type": "char", "value": 7}},
                    {{"type": "string", "address": "{}", "value": "0102"}},
                    {{"type": "short", "value": "random"}},
                    {{"type": "char", "value": 1, "enabled": false}},
                    {{"type": "char", "value": "random10"}}
                ]
            }}"#,
            base + 2064,
            base + 3000
        );
        let preset = PresetBuilder::from_schema(Catalog::standard(), &doc(&json), &[])
            .unwrap()
            .build()
            .unwrap();
        let writes = preset.options.writes.unwrap();
        assert_eq!(writes.len(), 5);
        assert_eq!(writes[0].address, base + 2064);
        assert_eq!(writes[1].address, base + 2068);
        assert_eq!(writes[2].value, WriteValue::Bytes(vec![1, 2]));
        assert_eq!(writes[3].address, base + 3002);
        assert_eq!(writes[3].value, WriteValue::Random(RandomValue::Short));
        assert_eq!(writes[4].address, base + 3004);
        assert_eq!(writes[4].value, WriteValue::Random(RandomValue::UpTo10));
    }

    #[test]
    fn writes_step_over_sector_trailers() {
        let base = 0x40 * SECTOR_SIZE;
        let mut b = builder("w");
        let next = b.write_word(base + 2068, 1).unwrap();
        assert_eq!(next, base + 2376);
        assert!(b.write_char(0x100, 1).is_err());
    }
}
