//! Relic placement: build the location graph, assign relics, and verify
//! that the result is completable and escape safe.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, Location};
use crate::checked::Checked;
use crate::constants::{TileKind, Zone};
use crate::options::{ComplexityGoal, RelicLocations};
use crate::relics::THRUST_SWORD;
use crate::{RandomiserError, Result};

/// Entity id of a relic pickup.
const RELIC_ENTITY: u16 = 0x000b;
/// Entity id of an item pickup.
const ITEM_ENTITY: u16 = 0x000c;
/// Decoy tiles flagged around each progression relic.
const LEAK_FLAGS_PER_RELIC: usize = 3;

fn verification(message: impl Into<String>) -> RandomiserError {
    RandomiserError::Verification(message.into())
}

#[derive(Clone, Debug)]
pub struct Node {
    pub location: Location,
    pub relic: Option<char>,
    /// Any one of these ability strings opens the location.
    pub locks: Vec<String>,
    /// One of these must stay obtainable without this location.
    pub escapes: Vec<String>,
    pub blocked: Vec<Option<char>>,
}

impl Node {
    fn blocks(&self, relic: Option<char>) -> bool {
        self.blocked.contains(&relic)
    }
}

/// Per node depths from the least fixpoint. A leaf is 1; a locked node is
/// one more than its cheapest lock.
#[derive(Clone, Debug)]
pub struct Depths {
    nodes: Vec<Option<u32>>,
    abilities: BTreeMap<char, u32>,
}

impl Depths {
    pub fn node(&self, index: usize) -> Option<u32> {
        self.nodes.get(index).copied().flatten()
    }

    pub fn ability(&self, ability: char) -> Option<u32> {
        self.abilities.get(&ability).copied()
    }

    /// Deepest ability of the set, or `None` if any is out of reach.
    pub fn requirement(&self, abilities: &str) -> Option<u32> {
        abilities
            .chars()
            .try_fold(0, |depth, ability| self.ability(ability).map(|d| depth.max(d)))
    }

    /// Cheapest goal set and its depth.
    pub fn goal<'a>(&self, goals: &'a [String]) -> Option<(u32, &'a str)> {
        goals
            .iter()
            .filter_map(|goal| self.requirement(goal).map(|depth| (depth, goal.as_str())))
            .min_by_key(|(depth, _)| *depth)
    }
}

/// Keeps an ability on the current search path for as long as it lives.
struct PathGuard<'a> {
    path: &'a mut BTreeSet<char>,
    ability: char,
}

impl<'a> PathGuard<'a> {
    fn enter(path: &'a mut BTreeSet<char>, ability: char) -> Self {
        path.insert(ability);
        PathGuard { path, ability }
    }
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.path.remove(&self.ability);
    }
}

#[derive(Clone, Debug)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Eligible locations in catalog order, no relics placed yet.
    pub fn new(catalog: &Catalog, relics: &RelicLocations) -> Graph {
        let nodes = catalog
            .locations()
            .filter(|location| location.is_eligible(relics.extension))
            .map(|location| {
                let id = location.id();
                let locks = relics.locations.get(&id);
                Node {
                    location,
                    relic: None,
                    locks: locks.map(|l| l.locks.clone()).unwrap_or_default(),
                    escapes: locks.map(|l| l.escapes.clone()).unwrap_or_default(),
                    blocked: relics.blocked.get(&id).cloned().unwrap_or_default(),
                }
            })
            .collect();
        Graph { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.location.id() == id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn place(&mut self, id: &str, relic: Option<char>) -> Result<()> {
        let index = self
            .index_of(id)
            .ok_or_else(|| RandomiserError::UnknownLocation(id.to_string()))?;
        self.nodes[index].relic = relic;
        Ok(())
    }

    /// Index of the node holding `ability`.
    pub fn provider(&self, ability: char) -> Option<usize> {
        self.nodes.iter().position(|node| node.relic == Some(ability))
    }

    /// Locks guarding `ability`, `None` when it is not placed.
    pub fn locks_for(&self, ability: char) -> Option<&[String]> {
        self.provider(ability).map(|index| self.nodes[index].locks.as_slice())
    }

    /// Depths of every node, optionally with one node taken out of the world.
    pub fn depths(&self, without: Option<usize>) -> Depths {
        let mut nodes: Vec<Option<u32>> = vec![None; self.nodes.len()];
        let mut abilities: BTreeMap<char, u32> = BTreeMap::new();
        let mut changed = true;
        while changed {
            changed = false;
            for (index, node) in self.nodes.iter().enumerate() {
                if Some(index) == without {
                    continue;
                }
                let depth = if node.locks.is_empty() {
                    Some(1)
                } else {
                    node.locks
                        .iter()
                        .filter_map(|lock| {
                            lock.chars()
                                .try_fold(0, |depth, ability| abilities.get(&ability).map(|d| depth.max(*d)))
                        })
                        .min()
                        .map(|depth| depth + 1)
                };
                if let Some(depth) = depth {
                    if nodes[index].map_or(true, |current| depth < current) {
                        nodes[index] = Some(depth);
                        if let Some(relic) = node.relic {
                            abilities.insert(relic, depth);
                        }
                        changed = true;
                    }
                }
            }
        }
        Depths { nodes, abilities }
    }

    /// Whether `ability` can be obtained without passing through anything
    /// already on `path`.
    pub fn has_non_circular_path(&self, ability: char, path: &mut BTreeSet<char>) -> bool {
        let Some(locks) = self.locks_for(ability) else {
            return false;
        };
        if locks.is_empty() {
            return true;
        }
        locks.iter().any(|lock| {
            if lock.chars().any(|required| path.contains(&required)) {
                return false;
            }
            lock.chars().all(|required| {
                let guard = PathGuard::enter(&mut *path, required);
                self.has_non_circular_path(required, guard.path)
            })
        })
    }

    /// Check the current assignment. Returns the goal depth when a goal is set.
    pub fn verify(&self, goal: Option<&ComplexityGoal>) -> Result<Option<u32>> {
        let depths = self.depths(None);
        let (depth, required) = match goal {
            Some(goal) => {
                let (depth, set) = depths
                    .goal(&goal.goals)
                    .ok_or_else(|| verification("goal unreachable"))?;
                if !goal.accepts(depth) {
                    return Err(verification(format!("goal depth {} outside {}", depth, goal.target())));
                }
                (Some(depth), set.chars().collect::<Vec<_>>())
            }
            None => {
                let placed: Vec<char> = self.nodes.iter().filter_map(|node| node.relic).collect();
                if let Some(missing) = placed.iter().find(|relic| depths.ability(**relic).is_none()) {
                    return Err(verification(format!("{} unreachable", missing)));
                }
                (None, placed)
            }
        };
        for ability in required {
            let mut path = BTreeSet::new();
            let guard = PathGuard::enter(&mut path, ability);
            if !self.has_non_circular_path(ability, guard.path) {
                return Err(verification(format!("{} only reachable through itself", ability)));
            }
        }
        self.verify_escapes(&depths)?;
        Ok(depth)
    }

    fn verify_escapes(&self, depths: &Depths) -> Result<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.escapes.is_empty() || depths.node(index).is_none() {
                continue;
            }
            let without = self.depths(Some(index));
            if !node.escapes.iter().any(|escape| without.requirement(escape).is_some()) {
                return Err(verification(format!("no escape from {}", node.location.name())));
            }
        }
        Ok(())
    }
}

/// An item tile near a progression relic that the item phase should clear.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LeakFlag {
    pub zone: Zone,
    pub item: &'static str,
    /// Zero based position among the item's tiles in the zone.
    pub index: usize,
}

#[derive(Clone, Debug)]
pub struct Placement {
    pub nonce: u64,
    pub graph: Graph,
    pub depth: Option<u32>,
}

impl Placement {
    /// `(location id, relic)` for every node, in catalog order.
    pub fn assignments(&self) -> Vec<(String, Option<char>)> {
        self.graph
            .nodes()
            .iter()
            .map(|node| (node.location.id(), node.relic))
            .collect()
    }

    /// Entity writes for every filled location. Relics that are really
    /// items, and relics replaced by an item, become item pickups.
    pub fn relic_writes(&self, catalog: &Catalog, relics: &RelicLocations) -> Result<Checked> {
        let mut checked = Checked::new();
        for node in self.graph.nodes() {
            let Some(ability) = node.relic else {
                continue;
            };
            let relic = catalog.relic_by_ability(ability)?;
            let item = match relics.replaced.get(&ability) {
                Some(name) => Some(catalog.item_by_name(name)?.id),
                None => relic.item_id,
            };
            let address = node.location.address();
            match item {
                Some(id) => {
                    checked.write_short(address, ITEM_ENTITY)?;
                    checked.write_short(address + 2, id)?;
                }
                None => {
                    checked.write_short(address, RELIC_ENTITY)?;
                    checked.write_short(address + 2, relic.id)?;
                }
            }
        }
        Ok(checked)
    }

    /// Pick decoy tiles in the zones of vanilla locations now holding a
    /// progression relic.
    pub fn leak_flags(&self, catalog: &Catalog, rng: &mut impl Rng) -> Result<Vec<LeakFlag>> {
        let mut flags: BTreeSet<LeakFlag> = BTreeSet::new();
        for node in self.graph.nodes() {
            let (Location::Relic(_), Some(ability)) = (node.location, node.relic) else {
                continue;
            };
            if !catalog.relic_by_ability(ability)?.progression {
                continue;
            }
            let zone = node.location.zone();
            let mut candidates: Vec<LeakFlag> = catalog
                .items()
                .iter()
                .filter(|item| !item.progression)
                .flat_map(|item| {
                    item.tiles_in(zone)
                        .enumerate()
                        .filter(|(_, tile)| !matches!(tile.kind, TileKind::Reward | TileKind::Shop))
                        .map(move |(index, _)| LeakFlag { zone, item: item.name, index })
                })
                .collect();
            candidates.shuffle(rng);
            flags.extend(candidates.into_iter().take(LEAK_FLAGS_PER_RELIC));
        }
        Ok(flags.into_iter().collect())
    }
}

/// Relics that fill the open locations: every relic with a vanilla home,
/// plus the thrust sword when enabled, minus the pre-placed ones.
fn relic_pool(catalog: &Catalog, relics: &RelicLocations, placed: &BTreeSet<char>) -> Vec<char> {
    catalog
        .relics()
        .iter()
        .filter(|relic| relic.zone.is_some() || (relic.ability == THRUST_SWORD && relics.thrust_sword_ability()))
        .map(|relic| relic.ability)
        .filter(|ability| !placed.contains(ability))
        .collect()
}

/// One placement attempt. Verification failures are routine and mean the
/// caller should try another nonce; configuration errors are final.
pub fn place_relics(catalog: &Catalog, relics: &RelicLocations, nonce: u64, rng: &mut impl Rng) -> Result<Placement> {
    let mut graph = Graph::new(catalog, relics);
    let mut used: BTreeSet<char> = BTreeSet::new();
    let mut fixed: BTreeSet<usize> = BTreeSet::new();
    for location in catalog.locations() {
        let id = location.id();
        let Some(candidates) = relics.placed.get(&id) else {
            continue;
        };
        let index = graph
            .index_of(&id)
            .ok_or_else(|| RandomiserError::Config(format!("{} is not an eligible location", location.name())))?;
        let node = &graph.nodes[index];
        let open: Vec<Option<char>> = candidates
            .iter()
            .copied()
            .filter(|relic| relic.map_or(true, |relic| !used.contains(&relic)) && !node.blocks(*relic))
            .collect();
        let relic = *open
            .choose(rng)
            .ok_or_else(|| verification(format!("nothing left to place at {}", location.name())))?;
        if let Some(relic) = relic {
            used.insert(relic);
        }
        graph.nodes[index].relic = relic;
        fixed.insert(index);
    }

    let mut pool = relic_pool(catalog, relics, &used);
    pool.shuffle(rng);
    let mut open: Vec<usize> = (0..graph.nodes.len()).filter(|index| !fixed.contains(index)).collect();
    if pool.len() > open.len() {
        return Err(RandomiserError::Config(format!(
            "{} relics for {} open locations",
            pool.len(),
            open.len()
        )));
    }
    open.shuffle(rng);
    // Locations that must not stay empty are filled first.
    open.sort_by_key(|index| !graph.nodes[*index].blocks(None));
    for relic in pool {
        let slot = open
            .iter()
            .position(|index| !graph.nodes[*index].blocks(Some(relic)))
            .ok_or_else(|| verification(format!("no open location accepts {}", relic)))?;
        let index = open.remove(slot);
        graph.nodes[index].relic = Some(relic);
    }
    if let Some(index) = open.iter().find(|index| graph.nodes[**index].blocks(None)) {
        return Err(verification(format!("{} must not stay empty", graph.nodes[*index].location.name())));
    }

    let depth = graph.verify(relics.goal.as_ref())?;
    debug!("attempt {} placed relics, depth {:?}", nonce, depth);
    Ok(Placement { nonce, graph, depth })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Extension;
    use crate::options::LocationLocks;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn locks(entries: &[(&str, &[&str], &[&str])]) -> BTreeMap<String, LocationLocks> {
        entries
            .iter()
            .map(|(id, locks, escapes)| {
                (
                    id.to_string(),
                    LocationLocks {
                        locks: locks.iter().map(|s| s.to_string()).collect(),
                        escapes: escapes.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect()
    }

    fn vanilla(entries: &[(&str, &[&str], &[&str])]) -> RelicLocations {
        RelicLocations {
            locations: locks(entries),
            ..RelicLocations::default()
        }
    }

    fn graph_with(relics: &RelicLocations, assignments: &[(&str, char)]) -> Graph {
        let catalog = Catalog::standard();
        let mut graph = Graph::new(&catalog, relics);
        for (id, relic) in assignments {
            graph.place(id, Some(*relic)).unwrap();
        }
        graph
    }

    #[test]
    fn vanilla_graph_covers_relic_homes() {
        let catalog = Catalog::standard();
        let graph = Graph::new(&catalog, &RelicLocations::default());
        assert_eq!(graph.nodes().len(), 34);
        let relics = RelicLocations {
            extension: Some(Extension::Guarded),
            ..RelicLocations::default()
        };
        assert_eq!(Graph::new(&catalog, &relics).nodes().len(), 46);
    }

    #[test]
    fn depths_follow_the_cheapest_lock() {
        let relics = vanilla(&[("B", &["L"], &[]), ("M", &["B", "LV"], &[])]);
        let graph = graph_with(&relics, &[("W", 'L'), ("B", 'V'), ("M", 'P')]);
        let depths = graph.depths(None);
        assert_eq!(depths.ability('L'), Some(1));
        assert_eq!(depths.ability('V'), Some(2));
        assert_eq!(depths.ability('P'), Some(3));
        assert_eq!(depths.requirement("LV"), Some(2));
        assert_eq!(depths.requirement("LQ"), None);
    }

    #[test]
    fn relics_behind_themselves_are_rejected() {
        let relics = RelicLocations {
            goal: Some(ComplexityGoal { min: 1, max: None, goals: vec!["LV".to_string()] }),
            ..vanilla(&[("B", &["L"], &[])])
        };
        let graph = graph_with(&relics, &[("B", 'L'), ("W", 'V')]);
        assert!(matches!(graph.verify(relics.goal.as_ref()), Err(RandomiserError::Verification(_))));
        let mut path = BTreeSet::new();
        assert!(!graph.has_non_circular_path('L', &mut path));
        assert!(path.is_empty());
        let graph = graph_with(&relics, &[("B", 'V'), ("W", 'L')]);
        assert_eq!(graph.verify(relics.goal.as_ref()).unwrap(), Some(2));
    }

    #[test]
    fn depth_bounds_are_enforced() {
        let relics = RelicLocations {
            goal: Some(ComplexityGoal { min: 3, max: None, goals: vec!["LV".to_string(), "MP".to_string()] }),
            ..vanilla(&[("B", &["L"], &[])])
        };
        let graph = graph_with(&relics, &[("W", 'L'), ("B", 'V')]);
        assert!(graph.verify(relics.goal.as_ref()).is_err());
    }

    #[test]
    fn escapes_need_a_way_out_without_the_location() {
        let relics = vanilla(&[("U", &[], &["L"])]);
        let graph = graph_with(&relics, &[("U", 'L')]);
        assert!(matches!(graph.verify(None), Err(RandomiserError::Verification(_))));
        let graph = graph_with(&relics, &[("U", 'V'), ("W", 'L')]);
        assert!(graph.verify(None).is_ok());
    }

    #[test]
    fn attempts_fill_every_vanilla_location() {
        let catalog = Catalog::standard();
        let relics = RelicLocations::default();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let placement = place_relics(&catalog, &relics, 0, &mut rng).unwrap();
        let placed: BTreeSet<char> = placement.assignments().iter().filter_map(|(_, r)| *r).collect();
        assert_eq!(placed.len(), 34);
        assert!(!placed.contains(&THRUST_SWORD));
        assert_eq!(placement.depth, None);
    }

    #[test]
    fn thrust_sword_overflows_vanilla_locations() {
        let catalog = Catalog::standard();
        let relics = RelicLocations {
            thrust_sword_ability: Some(true),
            ..RelicLocations::default()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(matches!(place_relics(&catalog, &relics, 0, &mut rng), Err(RandomiserError::Config(_))));
        let relics = RelicLocations {
            extension: Some(Extension::Guarded),
            ..relics
        };
        let placement = place_relics(&catalog, &relics, 0, &mut rng).unwrap();
        assert!(placement.graph.provider(THRUST_SWORD).is_some());
    }

    #[test]
    fn placed_and_blocked_relics_are_honoured() {
        let catalog = Catalog::standard();
        let mut relics = RelicLocations {
            extension: Some(Extension::Guarded),
            ..RelicLocations::default()
        };
        relics.placed.insert("J".to_string(), vec![Some('A')]);
        relics.blocked.insert("B".to_string(), vec![Some('L'), Some('V')]);
        relics.blocked.insert("Crystal cloak".to_string(), vec![None]);
        for seed in 0..20 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let placement = place_relics(&catalog, &relics, seed, &mut rng).unwrap();
            let graph = &placement.graph;
            assert_eq!(graph.node("J").unwrap().relic, Some('A'));
            let bat = graph.node("B").unwrap().relic;
            assert!(bat != Some('L') && bat != Some('V'));
            assert!(graph.node("Crystal cloak").unwrap().relic.is_some());
        }
    }

    #[test]
    fn relic_writes_use_entity_kinds() {
        let catalog = Catalog::standard();
        let mut relics = RelicLocations::default();
        relics.replaced.insert('o', "Zircon".to_string());
        let graph = graph_with(&relics, &[("B", 'L'), ("M", 'G'), ("W", 'o')]);
        let placement = Placement { nonce: 0, graph, depth: None };
        let checked = placement.relic_writes(&catalog, &relics).unwrap();
        let bat = catalog.relic_by_ability('B').unwrap().address;
        let leap = catalog.relic_by_ability('L').unwrap();
        assert_eq!(checked.get(bat).unwrap().to_bytes(), RELIC_ENTITY.to_le_bytes().to_vec());
        assert_eq!(checked.get(bat + 2).unwrap().to_bytes(), leap.id.to_le_bytes().to_vec());
        let mist = catalog.relic_by_ability('M').unwrap().address;
        assert_eq!(checked.get(mist).unwrap().to_bytes(), ITEM_ENTITY.to_le_bytes().to_vec());
        let wolf = catalog.relic_by_ability('W').unwrap().address;
        let zircon = catalog.item_by_name("Zircon").unwrap().id;
        assert_eq!(checked.get(wolf + 2).unwrap().to_bytes(), zircon.to_le_bytes().to_vec());
        assert_eq!(checked.len(), 6);
    }

    #[test]
    fn leak_flags_stay_in_the_relic_zone() {
        let catalog = Catalog::standard();
        let relics = RelicLocations::default();
        let graph = graph_with(&relics, &[("V", 'L')]);
        let placement = Placement { nonce: 0, graph, depth: None };
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let flags = placement.leak_flags(&catalog, &mut rng).unwrap();
        assert!(!flags.is_empty() && flags.len() <= LEAK_FLAGS_PER_RELIC);
        for flag in &flags {
            assert_eq!(flag.zone, Zone::MarbleGallery);
            let item = catalog.item_by_name(flag.item).unwrap();
            assert!(!item.progression);
            assert!(catalog.tile_for_item_in_zone(item, flag.zone, flag.index).is_ok());
        }
    }
}
