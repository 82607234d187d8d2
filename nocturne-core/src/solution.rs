//! Human readable route to the goal for spoiler output.
//!
//! The cheapest way to satisfy each lock is picked recursively, redundant
//! branches are pruned, single child chains are folded into one line and the
//! result is drawn as an indented tree:
//!
//! ```text
//! Gravity Boots < Form of Mist
//!                 ^ Leap Stone
//!                 ^ Jewel of Open
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::Catalog;
use crate::placement::Graph;
use crate::Result;

#[derive(Clone, Debug)]
struct Requirement {
    ability: char,
    depth: u32,
    solution: Option<Solution>,
}

#[derive(Clone, Debug)]
struct Solution {
    depth: u32,
    weight: u32,
    requirements: Vec<Requirement>,
}

impl Solution {
    fn new(requirements: Vec<Requirement>) -> Solution {
        let depth = requirements.iter().map(|r| r.depth).max().unwrap_or(0);
        let weight = requirements.iter().map(|r| r.depth).sum();
        Solution { depth, weight, requirements }
    }

    fn average(&self) -> f64 {
        f64::from(self.weight) / self.requirements.len().max(1) as f64
    }

    /// Shallower first, then lighter, then lighter on average.
    fn cheaper_than(&self, other: &Solution) -> bool {
        self.depth
            .cmp(&other.depth)
            .then(self.weight.cmp(&other.weight))
            .then(self.average().partial_cmp(&other.average()).unwrap_or(Ordering::Equal))
            == Ordering::Less
    }
}

/// A folded chain of abilities and the branches hanging off its last link.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Branch {
    abilities: Vec<char>,
    children: Vec<Branch>,
}

fn locks_of(graph: &Graph, ability: char) -> &[String] {
    graph.locks_for(ability).unwrap_or(&[])
}

/// Locks that can be opened without revisiting anything on `visited`.
fn open_locks<'a>(graph: &Graph, locks: &'a [String], visited: &mut BTreeSet<char>) -> Vec<&'a str> {
    locks
        .iter()
        .filter(|lock| {
            if lock.chars().any(|ability| visited.contains(&ability)) {
                return false;
            }
            lock.chars().all(|ability| {
                visited.insert(ability);
                let reachable = graph.has_non_circular_path(ability, visited);
                visited.remove(&ability);
                reachable
            })
        })
        .map(String::as_str)
        .collect()
}

fn minify(graph: &Graph, locks: &[&str], visited: &mut BTreeSet<char>) -> Option<Solution> {
    let mut best: Option<Solution> = None;
    for lock in locks {
        let requirements = lock
            .chars()
            .map(|ability| {
                let own = locks_of(graph, ability);
                if own.is_empty() {
                    return Requirement { ability, depth: 1, solution: None };
                }
                visited.insert(ability);
                let open = open_locks(graph, own, visited);
                let solution = minify(graph, &open, visited);
                visited.remove(&ability);
                Requirement {
                    ability,
                    depth: 1 + solution.as_ref().map_or(0, |s| s.depth),
                    solution,
                }
            })
            .collect();
        let solution = Solution::new(requirements);
        if best.as_ref().map_or(true, |min| solution.cheaper_than(min)) {
            best = Some(solution);
        }
    }
    best
}

fn collect_abilities(requirement: &Requirement, cache: &mut BTreeMap<char, BTreeSet<char>>) -> BTreeSet<char> {
    if let Some(abilities) = cache.get(&requirement.ability) {
        return abilities.clone();
    }
    let mut abilities = BTreeSet::from([requirement.ability]);
    if let Some(solution) = &requirement.solution {
        for child in &solution.requirements {
            abilities.extend(collect_abilities(child, cache));
        }
    }
    cache.insert(requirement.ability, abilities.clone());
    abilities
}

/// Drop sibling branches whose abilities are already gathered by a deeper one.
fn prune_subsets(requirement: &mut Requirement, cache: &mut BTreeMap<char, BTreeSet<char>>) {
    let Some(solution) = requirement.solution.as_mut() else {
        return;
    };
    let nodes = &mut solution.requirements;
    nodes.sort_by(|a, b| b.depth.cmp(&a.depth));
    let mut gathered = BTreeSet::new();
    let mut i = 0;
    while i < nodes.len() {
        prune_subsets(&mut nodes[i], cache);
        gathered.extend(collect_abilities(&nodes[i], cache));
        let mut j = i + 1;
        while j < nodes.len() {
            if collect_abilities(&nodes[j], cache).is_subset(&gathered) {
                nodes.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

fn collapse(requirement: &Requirement) -> Branch {
    let mut abilities = Vec::new();
    let mut current = requirement;
    loop {
        abilities.push(current.ability);
        match &current.solution {
            Some(solution) if solution.requirements.len() == 1 => current = &solution.requirements[0],
            Some(solution) => {
                return Branch {
                    abilities,
                    children: solution.requirements.iter().map(collapse).collect(),
                }
            }
            None => return Branch { abilities, children: Vec::new() },
        }
    }
}

fn display_name(catalog: &Catalog, renamed: &BTreeMap<u16, String>, ability: char) -> Result<String> {
    let relic = catalog.relic_by_ability(ability)?;
    let Some(item) = relic.item_id else {
        return Ok(relic.name.to_string());
    };
    if let Some(name) = renamed.get(&item) {
        return Ok(name.clone());
    }
    Ok(catalog
        .item_by_id(item)
        .map_or(relic.name, |item| item.name)
        .to_string())
}

fn render_branch(
    catalog: &Catalog,
    renamed: &BTreeMap<u16, String>,
    branch: &Branch,
    level: usize,
    sub: bool,
    lines: &mut Vec<String>,
) -> Result<()> {
    let names = branch
        .abilities
        .iter()
        .map(|ability| display_name(catalog, renamed, *ability))
        .collect::<Result<Vec<_>>>()?;
    let marker = if sub { "^ " } else { "" };
    lines.push(format!("{}{}{}", " ".repeat(level), marker, names.join(" < ")));
    // Children line up under the last name of the chain.
    let offset: usize = names[..names.len() - 1].iter().map(|name| name.len() + 3).sum();
    let level = level + if sub { 2 } else { 0 } + offset;
    for child in &branch.children {
        render_branch(catalog, renamed, child, level, true, lines)?;
    }
    Ok(())
}

/// Render the cheapest route to any of `goals`. Empty when no goal set is
/// reachable. `renamed` maps item ids to names given by the item phase.
pub fn render_solution(
    catalog: &Catalog,
    graph: &Graph,
    goals: &[String],
    renamed: &BTreeMap<u16, String>,
) -> Result<Vec<String>> {
    let reachable: Vec<&str> = goals
        .iter()
        .filter(|goal| {
            goal.chars().all(|ability| {
                let mut path = BTreeSet::from([ability]);
                graph.has_non_circular_path(ability, &mut path)
            })
        })
        .map(String::as_str)
        .collect();
    let Some(mut minified) = minify(graph, &reachable, &mut BTreeSet::new()) else {
        return Ok(Vec::new());
    };
    for requirement in &mut minified.requirements {
        prune_subsets(requirement, &mut BTreeMap::new());
    }
    let mut lines = Vec::new();
    for requirement in &minified.requirements {
        render_branch(catalog, renamed, &collapse(requirement), 0, false, &mut lines)?;
    }
    Ok(lines)
}
