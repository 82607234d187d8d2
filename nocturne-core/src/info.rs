//! Spoiler log collected per verbosity level.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::placement::{LeakFlag, Placement};
use crate::solution::render_solution;
use crate::Result;

pub const MAX_VERBOSITY: usize = 5;
/// Spoiler level that tournament mode never exceeds.
pub const TOURNAMENT_VERBOSITY: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Text(String),
    List(Vec<String>),
}

/// Named entries per level. Properties print in the order they first
/// appear, lower levels first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Info {
    levels: [Vec<(String, Entry)>; MAX_VERBOSITY + 1],
}

impl Info {
    pub fn new() -> Self {
        Info::default()
    }

    /// Set `prop` at `level`, replacing an earlier value. Levels past the
    /// maximum are clamped.
    pub fn set(&mut self, level: usize, prop: &str, entry: Entry) {
        let entries = &mut self.levels[level.min(MAX_VERBOSITY)];
        match entries.iter_mut().find(|(name, _)| name == prop) {
            Some((_, current)) => *current = entry,
            None => entries.push((prop.to_string(), entry)),
        }
    }

    pub fn text(&mut self, level: usize, prop: &str, text: impl Into<String>) {
        self.set(level, prop, Entry::Text(text.into()));
    }

    pub fn list(&mut self, level: usize, prop: &str, items: Vec<String>) {
        self.set(level, prop, Entry::List(items));
    }

    pub fn merge(&mut self, other: &Info) {
        for (level, entries) in other.levels.iter().enumerate() {
            for (prop, entry) in entries {
                self.set(level, prop, entry.clone());
            }
        }
    }

    pub fn format(&self, verbosity: usize) -> String {
        let levels = &self.levels[..=verbosity.min(MAX_VERBOSITY)];
        let mut props: Vec<&str> = Vec::new();
        for (prop, _) in levels.iter().flatten() {
            if !props.contains(&prop.as_str()) {
                props.push(prop);
            }
        }
        let mut lines = Vec::new();
        for prop in props {
            for entries in levels {
                let Some((_, entry)) = entries.iter().find(|(name, _)| name == prop) else {
                    continue;
                };
                match entry {
                    Entry::Text(text) if text.is_empty() => {}
                    Entry::Text(text) => lines.push(format!("{}: {}", prop, text)),
                    Entry::List(items) => {
                        let mut text = format!("{}:", prop);
                        for item in items {
                            text.push_str("\n  ");
                            text.push_str(item);
                        }
                        lines.push(text);
                    }
                }
            }
        }
        lines.join("\n")
    }
}

/// Spoilers for a finished placement.
pub fn placement_info(
    catalog: &Catalog,
    placement: &Placement,
    goals: Option<&[String]>,
    leaks: &[LeakFlag],
    renamed: &BTreeMap<u16, String>,
) -> Result<Info> {
    let mut info = Info::new();
    let mut mapping = Vec::new();
    for node in placement.graph.nodes() {
        let Some(ability) = node.relic else {
            continue;
        };
        let relic = catalog.relic_by_ability(ability)?;
        mapping.push(format!("{} at {}", relic.name, node.location.name()));
    }
    info.list(2, "Relic locations", mapping);
    if let Some(depth) = placement.depth {
        info.text(2, "Complexity", depth.to_string());
    }
    if let Some(goals) = goals {
        let solution = render_solution(catalog, &placement.graph, goals, renamed)?;
        if !solution.is_empty() {
            info.list(3, "Solution", solution);
        }
    }
    if !leaks.is_empty() {
        let flags = leaks
            .iter()
            .map(|flag| format!("{} {} #{}", flag.zone.code(), flag.item, flag.index + 1))
            .collect();
        info.list(4, "Leak prevention", flags);
    }
    info.text(4, "Attempts", placement.nonce.to_string());
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Info {
        let mut info = Info::new();
        info.text(1, "Seed", "abc");
        info.text(1, "Preset", "safe");
        info.list(2, "Relic locations", vec!["Soul of Bat at Soul of Bat".to_string()]);
        info.text(2, "Complexity", "9");
        info.list(3, "Solution", vec!["Gravity Boots".to_string(), "^ Leap Stone".to_string()]);
        info
    }

    #[test]
    fn levels_gate_output() {
        let info = sample();
        assert_eq!(info.format(0), "");
        assert_eq!(info.format(1), "Seed: abc\nPreset: safe");
        assert_eq!(
            info.format(2),
            "Seed: abc\nPreset: safe\nRelic locations:\n  Soul of Bat at Soul of Bat\nComplexity: 9"
        );
        assert!(info.format(3).ends_with("Solution:\n  Gravity Boots\n  ^ Leap Stone"));
    }

    #[test]
    fn props_keep_first_seen_order_across_levels() {
        let mut info = Info::new();
        info.text(2, "Seed", "late");
        info.text(1, "Preset", "safe");
        info.text(3, "Preset", "again");
        assert_eq!(info.format(3), "Preset: safe\nPreset: again\nSeed: late");
    }

    #[test]
    fn merge_replaces_matching_props() {
        let mut info = sample();
        let mut other = Info::new();
        other.text(1, "Seed", "xyz");
        other.text(1, "Empty", "");
        info.merge(&other);
        assert_eq!(info.format(1), "Seed: xyz\nPreset: safe");
    }

    #[test]
    fn verbosity_is_clamped() {
        let mut info = Info::new();
        info.text(9, "Deep", "value");
        assert_eq!(info.format(99), "Deep: value");
    }
}
