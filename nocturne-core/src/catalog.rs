//! Immutable registry over the static game tables.
//!
//! Every component that resolves names takes a `&Catalog` instead of
//! reaching for the tables directly, so tests can swap in smaller worlds.

use crate::constants::{Extension, Zone};
use crate::enemies::{Enemy, ENEMIES};
use crate::items::{Item, Tile, ITEMS};
use crate::relics::{ExtensionLocation, Relic, EXTENSION_LOCATIONS, RELICS};
use crate::{RandomiserError, Result};

/// Lowercase alphanumeric form used to compare user supplied names.
pub fn name_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Copy, Clone, Debug)]
pub enum Location {
    Relic(&'static Relic),
    Extension(&'static ExtensionLocation),
}

impl Location {
    /// Key used in options: the vanilla relic's ability code, or the extension name.
    pub fn id(&self) -> String {
        match self {
            Location::Relic(relic) => relic.ability.to_string(),
            Location::Extension(location) => location.name.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Location::Relic(relic) => relic.name,
            Location::Extension(location) => location.name,
        }
    }

    pub fn zone(&self) -> Zone {
        match self {
            Location::Relic(relic) => relic.zone.unwrap_or(Zone::Prologue),
            Location::Extension(location) => location.zone,
        }
    }

    pub fn extension(&self) -> Option<Extension> {
        match self {
            Location::Relic(relic) => relic.extension,
            Location::Extension(location) => Some(location.extension),
        }
    }

    pub fn address(&self) -> u32 {
        match self {
            Location::Relic(relic) => relic.address,
            Location::Extension(location) => location.address,
        }
    }

    /// Whether the location takes part under the given extension setting.
    pub fn is_eligible(&self, extension: Option<Extension>) -> bool {
        match self.extension() {
            None => true,
            Some(tier) => extension.map_or(false, |ext| ext.includes(tier)),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Catalog {
    items: &'static [Item],
    enemies: &'static [Enemy],
    relics: &'static [Relic],
    extension: &'static [ExtensionLocation],
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}

impl Catalog {
    pub fn standard() -> Self {
        Catalog {
            items: ITEMS,
            enemies: ENEMIES,
            relics: RELICS,
            extension: EXTENSION_LOCATIONS,
        }
    }

    pub fn new(
        items: &'static [Item],
        enemies: &'static [Enemy],
        relics: &'static [Relic],
        extension: &'static [ExtensionLocation],
    ) -> Self {
        Catalog {
            items,
            enemies,
            relics,
            extension,
        }
    }

    pub fn items(&self) -> &'static [Item] {
        self.items
    }

    pub fn enemies(&self) -> &'static [Enemy] {
        self.enemies
    }

    pub fn relics(&self) -> &'static [Relic] {
        self.relics
    }

    pub fn extension_locations(&self) -> &'static [ExtensionLocation] {
        self.extension
    }

    /// Exact name lookup, as used by preset documents.
    pub fn item_by_name(&self, name: &str) -> Result<&'static Item> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .ok_or_else(|| RandomiserError::UnknownItem(name.to_string()))
    }

    /// Loose lookup for options strings ("HeartRefresh", "heartrefresh").
    pub fn item_by_key(&self, key: &str) -> Result<&'static Item> {
        let wanted = name_key(key);
        self.items
            .iter()
            .find(|item| name_key(item.name) == wanted)
            .ok_or_else(|| RandomiserError::UnknownItem(key.to_string()))
    }

    pub fn item_by_id(&self, id: u16) -> Option<&'static Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Resolve an enemy by loose name and optional level. Without a level
    /// the first enemy carrying the name wins.
    pub fn enemy_by_name_and_level(&self, name: &str, level: Option<u8>) -> Result<&'static Enemy> {
        let wanted = name_key(name);
        self.enemies
            .iter()
            .filter(|enemy| name_key(enemy.name) == wanted)
            .find(|enemy| level.map_or(true, |level| enemy.level == level))
            .ok_or_else(|| match level {
                Some(level) => RandomiserError::UnknownEnemy(format!("{}-{}", name, level)),
                None => RandomiserError::UnknownEnemy(name.to_string()),
            })
    }

    /// Canonical enemy key: name without punctuation, plus `-level` when
    /// another enemy shares the name and this one is not the first.
    pub fn enemy_id(&self, enemy: &Enemy) -> String {
        let key = name_key(enemy.name);
        let first = self
            .enemies
            .iter()
            .find(|other| name_key(other.name) == key)
            .map(|other| other.id);
        let stripped: String = enemy
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if first == Some(enemy.id) {
            stripped
        } else {
            format!("{}-{}", stripped, enemy.level)
        }
    }

    /// Parse a canonical or user supplied enemy key (`Name` or `Name-Level`).
    pub fn enemy_by_id(&self, id: &str) -> Result<&'static Enemy> {
        if let Some((name, level)) = id.rsplit_once('-') {
            if let Ok(level) = level.parse::<u8>() {
                return self.enemy_by_name_and_level(name, Some(level));
            }
        }
        self.enemy_by_name_and_level(id, None)
    }

    pub fn relic_by_ability(&self, ability: char) -> Result<&'static Relic> {
        self.relics
            .iter()
            .find(|relic| relic.ability == ability)
            .ok_or_else(|| RandomiserError::UnknownRelic(ability.to_string()))
    }

    pub fn relic_by_name(&self, name: &str) -> Result<&'static Relic> {
        let wanted = name_key(name);
        self.relics
            .iter()
            .find(|relic| name_key(relic.name) == wanted)
            .ok_or_else(|| RandomiserError::UnknownRelic(name.to_string()))
    }

    /// A single character is taken as an ability code, anything longer as a name.
    pub fn relic_by_ability_or_name(&self, key: &str) -> Result<&'static Relic> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ability), None) => self.relic_by_ability(ability),
            _ => self.relic_by_name(key),
        }
    }

    /// All relic locations in catalog order: vanilla relic spots first.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        self.relics
            .iter()
            .filter(|relic| relic.zone.is_some())
            .map(Location::Relic)
            .chain(self.extension.iter().map(Location::Extension))
    }

    pub fn location_by_id(&self, id: &str) -> Result<Location> {
        let mut chars = id.chars();
        if let (Some(ability), None) = (chars.next(), chars.next()) {
            return self
                .relics
                .iter()
                .find(|relic| relic.ability == ability && relic.zone.is_some())
                .map(Location::Relic)
                .ok_or_else(|| RandomiserError::UnknownLocation(id.to_string()));
        }
        self.location_by_name(id)
    }

    pub fn location_by_name(&self, name: &str) -> Result<Location> {
        let wanted = name_key(name);
        if let Some(relic) = self
            .relics
            .iter()
            .find(|relic| relic.zone.is_some() && name_key(relic.name) == wanted)
        {
            return Ok(Location::Relic(relic));
        }
        self.extension
            .iter()
            .find(|location| name_key(location.name) == wanted)
            .map(Location::Extension)
            .ok_or_else(|| RandomiserError::UnknownLocation(name.to_string()))
    }

    /// Position of a location in catalog order, used to sort output.
    pub fn location_index(&self, id: &str) -> Option<usize> {
        self.locations().position(|location| location.id() == id)
    }

    /// The `index`-th tile of `item` inside `zone`.
    pub fn tile_for_item_in_zone(
        &self,
        item: &'static Item,
        zone: Zone,
        index: usize,
    ) -> Result<&'static Tile> {
        item.tiles
            .iter()
            .filter(|tile| tile.zone == zone)
            .nth(index)
            .ok_or_else(|| RandomiserError::UnknownTile {
                zone: zone.code().to_string(),
                item: item.name.to_string(),
                index: index + 1,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_item_names_resolve() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.item_by_key("HeartRefresh").unwrap().name, "Heart Refresh");
        assert_eq!(catalog.item_by_key("manna-prism").unwrap().name, "Manna prism");
        assert!(matches!(
            catalog.item_by_key("Excalibur"),
            Err(RandomiserError::UnknownItem(_))
        ));
    }

    #[test]
    fn ambiguous_enemies_get_a_level_suffix() {
        let catalog = Catalog::standard();
        let first = catalog.enemy_by_name_and_level("Skeleton", None).unwrap();
        let second = catalog.enemy_by_name_and_level("Skeleton", Some(26)).unwrap();
        assert_eq!(catalog.enemy_id(first), "Skeleton");
        assert_eq!(catalog.enemy_id(second), "Skeleton-26");
        assert_eq!(catalog.enemy_by_id("Skeleton-26").unwrap().id, second.id);
        assert_eq!(catalog.enemy_id(catalog.enemy_by_id("BloodyZombie").unwrap()), "BloodyZombie");
    }

    #[test]
    fn locations_resolve_by_code_and_name() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.location_by_id("B").unwrap().name(), "Soul of Bat");
        assert_eq!(catalog.location_by_name("Gold ring").unwrap().id(), "G");
        assert_eq!(catalog.location_by_id("Crystal cloak").unwrap().id(), "Crystal cloak");
        assert!(catalog.location_by_id("D").is_err());
        assert_eq!(catalog.location_index("B"), Some(0));
    }

    #[test]
    fn extension_locations_follow_tiers() {
        let catalog = Catalog::standard();
        let trio = catalog.location_by_name("Trio").unwrap();
        let telescope = catalog.location_by_name("Telescope").unwrap();
        assert!(trio.is_eligible(Some(Extension::Guarded)));
        assert!(!trio.is_eligible(None));
        assert!(!telescope.is_eligible(Some(Extension::Equipment)));
        assert!(telescope.is_eligible(Some(Extension::Tourist)));
    }

    #[test]
    fn tiles_are_indexed_per_zone() {
        let catalog = Catalog::standard();
        let vessel = catalog.item_by_name("Life Vessel").unwrap();
        assert!(catalog.tile_for_item_in_zone(vessel, Zone::MarbleGallery, 1).is_ok());
        assert!(matches!(
            catalog.tile_for_item_in_zone(vessel, Zone::MarbleGallery, 2),
            Err(RandomiserError::UnknownTile { .. })
        ));
    }
}
