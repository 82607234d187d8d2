//! Compact options string codec.
//!
//! A string is a run of single letter feature tokens. A `~` prefix switches
//! a feature off, a `:` introduces feature arguments, and a `,` closes a
//! token that took arguments.

use std::collections::BTreeMap;

use log::trace;

use crate::catalog::{name_key, Catalog};
use crate::constants::{Extension, MapColor, Reward, Slot, Zone};
use crate::options::{
    ComplexityGoal, EnemyDrops, Feature, ItemLocations, LocationLocks, Options, PrologueRewards,
    RandomValue, RelicLocations, StartingEquipment, Write, WriteValue, ZoneKey, ALL_ENEMIES,
    GLOBAL_DROP, LIBRARIAN_DROP,
};
use crate::relics::THRUST_SWORD;
use crate::{RandomiserError, Result};

/// Lowest address a raw write may target.
pub const MIN_WRITE_ADDRESS: u32 = 0xffff;

fn parse_error(message: impl Into<String>) -> RandomiserError {
    RandomiserError::Parse(message.into())
}

pub(crate) fn parse_number(token: &str) -> Result<u64> {
    let parsed = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        token.parse::<u64>()
    };
    parsed.map_err(|err| parse_error(format!("invalid number '{}': {}", token, err)))
}

pub(crate) fn parse_address(token: &str) -> Result<u32> {
    let address = parse_number(token)?;
    if address < MIN_WRITE_ADDRESS as u64 || address > u32::MAX as u64 {
        return Err(parse_error(format!("invalid address: {}", token)));
    }
    Ok(address as u32)
}

pub(crate) fn parse_hex_bytes(hex: &str) -> Result<Vec<u8>> {
    if hex.is_empty() || hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(parse_error(format!("invalid value: {}", hex)));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|err| parse_error(format!("invalid value '{}': {}", hex, err)))
        })
        .collect()
}

/// Parse a write value: `0x` literal (width from digit count), a random
/// token, or a plain hex byte string.
pub(crate) fn parse_write_value(token: &str) -> Result<WriteValue> {
    if let Some(kind) = RandomValue::from_token(token) {
        return Ok(WriteValue::Random(kind));
    }
    if let Some(hex) = token.strip_prefix("0x") {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(parse_error(format!("invalid value: {}", token)));
        }
        let value = u64::from_str_radix(hex, 16)
            .map_err(|err| parse_error(format!("invalid value '{}': {}", token, err)))?;
        return match hex.len() {
            2 => Ok(WriteValue::Char(value as u8)),
            4 => Ok(WriteValue::Short(value as u16)),
            8 => Ok(WriteValue::Word(value as u32)),
            16 => Ok(WriteValue::Long(value)),
            _ => Err(parse_error(format!("invalid value: {}", token))),
        };
    }
    Ok(WriteValue::Bytes(parse_hex_bytes(token)?))
}

fn is_goal_key(arg: &str) -> bool {
    let mut parts = arg.splitn(2, '-');
    let min = parts.next().unwrap_or("");
    let max = parts.next();
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    digits(min) && max.map_or(true, digits)
}

struct Parser<'a> {
    catalog: &'a Catalog,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_run_end(&self) -> bool {
        matches!(self.peek(), None | Some(','))
    }

    fn read_arg(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ',' || c == ':' {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn expect_arg(&mut self, context: &str) -> Result<String> {
        let arg = self.read_arg();
        if arg.is_empty() {
            return Err(parse_error(format!("expected argument for {}", context)));
        }
        Ok(arg)
    }

    fn expect_colon(&mut self, context: &str) -> Result<()> {
        if self.eat(':') {
            Ok(())
        } else {
            Err(parse_error(format!("expected ':' after {}", context)))
        }
    }

    /// Iterate the `:`-separated entries of a feature, calling `entry` for each.
    fn each_entry(
        &mut self,
        feature: char,
        mut entry: impl FnMut(&mut Self) -> Result<()>,
    ) -> Result<usize> {
        let mut count = 0;
        while !self.at_run_end() {
            entry(self)?;
            self.eat(':');
            count += 1;
        }
        if count == 0 {
            return Err(parse_error(format!("expected argument for '{}'", feature)));
        }
        Ok(count)
    }

    fn item_name(&self, key: &str) -> Result<String> {
        Ok(self.catalog.item_by_key(key)?.name.to_string())
    }

    /// `a-b-` style list; empty entries become `None`.
    fn item_list(&self, arg: &str) -> Result<Vec<Option<String>>> {
        arg.split('-')
            .map(|name| {
                if name.is_empty() {
                    Ok(None)
                } else {
                    self.item_name(name).map(Some)
                }
            })
            .collect()
    }

    fn blocked_list(&self, arg: &str) -> Result<Vec<String>> {
        arg.split('-').map(|name| self.item_name(name)).collect()
    }

    fn parse(&mut self) -> Result<Options> {
        let mut options = Options::default();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == ',' {
                continue;
            }
            let (negate, letter) = if c == '~' {
                match self.peek() {
                    Some(letter) => {
                        self.pos += 1;
                        (true, letter)
                    }
                    None => return Err(parse_error("expected feature after '~'")),
                }
            } else {
                (false, c)
            };
            if negate && self.peek() == Some(':') {
                return Err(parse_error(format!("negated '{}' takes no arguments", letter)));
            }
            match letter {
                'p' => {
                    if negate {
                        return Err(parse_error("cannot negate preset"));
                    }
                    self.expect_colon("p")?;
                    options.preset = Some(self.expect_arg("preset")?);
                }
                'd' => self.parse_drops(negate, &mut options.enemy_drops)?,
                'e' => self.parse_equipment(negate, &mut options.starting_equipment)?,
                'i' => self.parse_items(negate, &mut options.item_locations)?,
                'b' => self.parse_rewards(negate, &mut options.prologue_rewards)?,
                'r' => self.parse_relics(negate, &mut options.relic_locations)?,
                's' => options.stats = Some(!negate),
                'm' => {
                    if !negate && self.eat(':') {
                        let arg = self.expect_arg("map color")?;
                        let color = MapColor::from_name(&arg)
                            .ok_or_else(|| parse_error(format!("unknown map color: {}", arg)))?;
                        options.mapcolor_theme = Some(color);
                    } else {
                        options.music = Some(!negate);
                    }
                }
                'k' => options.turkey_mode = Some(!negate),
                't' => options.tournament_mode = Some(!negate),
                'l' => options.colorrando_mode = Some(!negate),
                'x' => options.magicmax_mode = Some(!negate),
                'z' => options.anti_freeze_mode = Some(!negate),
                'y' => options.mypurse_mode = Some(!negate),
                'w' => {
                    if negate {
                        options.writes = Some(Vec::new());
                    } else {
                        let writes = options.writes.get_or_insert_with(Vec::new);
                        self.expect_colon("w")?;
                        self.parse_writes(writes)?;
                    }
                }
                other => return Err(parse_error(format!("invalid randomization: {}", other))),
            }
        }
        if options == Options::default() {
            return Err(parse_error("no randomizations"));
        }
        Ok(options)
    }

    fn parse_drops(&mut self, negate: bool, field: &mut Feature<EnemyDrops>) -> Result<()> {
        if negate {
            *field = Feature::Disabled;
            return Ok(());
        }
        if !self.eat(':') {
            if field.is_unset() || *field == Feature::Disabled {
                *field = Feature::Enabled;
            }
            return Ok(());
        }
        let mut drops = field.custom().cloned().unwrap_or_default();
        self.each_entry('d', |p| {
            let mut arg = p.expect_arg("enemy")?;
            let block = arg.starts_with('-');
            if block {
                arg.remove(0);
            }
            let key = match name_key(&arg).as_str() {
                _ if arg == ALL_ENEMIES => ALL_ENEMIES.to_string(),
                "global" => GLOBAL_DROP.to_string(),
                "librarian" => LIBRARIAN_DROP.to_string(),
                _ => {
                    let enemy = p.catalog.enemy_by_id(&arg)?;
                    p.catalog.enemy_id(enemy)
                }
            };
            let list = if p.eat(':') { p.read_arg() } else { String::new() };
            if block {
                if list.is_empty() {
                    return Err(parse_error(format!("expected items to block for {}", key)));
                }
                drops.blocked.insert(key, p.blocked_list(&list)?);
            } else {
                let items = if list.is_empty() { Vec::new() } else { p.item_list(&list)? };
                if key != GLOBAL_DROP && items.len() > 2 {
                    return Err(parse_error(format!("too many drops for {}", key)));
                }
                drops.drops.insert(key, items);
            }
            Ok(())
        })?;
        *field = Feature::Custom(drops);
        Ok(())
    }

    fn parse_equipment(&mut self, negate: bool, field: &mut Feature<StartingEquipment>) -> Result<()> {
        if negate {
            *field = Feature::Disabled;
            return Ok(());
        }
        if !self.eat(':') {
            if !field.is_enabled() {
                *field = Feature::Enabled;
            }
            return Ok(());
        }
        let mut equipment = field.custom().cloned().unwrap_or_default();
        self.each_entry('e', |p| {
            let mut arg = p.expect_arg("slot")?;
            let block = arg.starts_with('-');
            if block {
                arg.remove(0);
            }
            let mut chars = arg.chars();
            let slot = match (chars.next(), chars.next()) {
                (Some(code), None) => Slot::from_code(code),
                _ => None,
            }
            .ok_or_else(|| parse_error(format!("unknown equipment slot: {}", arg)))?;
            p.expect_colon("slot")?;
            let list = p.read_arg();
            if block {
                let items = p.blocked_list(&list)?;
                for name in &items {
                    check_slot(p.catalog, slot, name)?;
                }
                equipment.blocked.insert(slot, items);
            } else {
                let items = p.item_list(&list)?;
                for name in items.iter().flatten() {
                    check_slot(p.catalog, slot, name)?;
                    check_hands(p.catalog, &equipment.slots, slot, name)?;
                }
                equipment.slots.insert(slot, items);
            }
            Ok(())
        })?;
        *field = Feature::Custom(equipment);
        Ok(())
    }

    fn parse_items(&mut self, negate: bool, field: &mut Feature<ItemLocations>) -> Result<()> {
        if negate {
            *field = Feature::Disabled;
            return Ok(());
        }
        if !self.eat(':') {
            if !field.is_enabled() {
                *field = Feature::Enabled;
            }
            return Ok(());
        }
        let mut locations = field.custom().cloned().unwrap_or_default();
        self.each_entry('i', |p| {
            let mut arg = p.expect_arg("zone")?;
            let block = arg.starts_with('-');
            if block {
                arg.remove(0);
            }
            let zone = if arg == "*" {
                ZoneKey::All
            } else {
                ZoneKey::Zone(
                    Zone::from_code(&arg).ok_or_else(|| RandomiserError::UnknownZone(arg.clone()))?,
                )
            };
            p.expect_colon("zone")?;
            let arg = p.expect_arg("item")?;
            let (item, index) = if arg == "*" {
                ("*".to_string(), 0)
            } else {
                let (name, index) = match arg.rsplit_once('-') {
                    Some((name, number)) if !name.is_empty() => {
                        let number = number
                            .parse::<usize>()
                            .ok()
                            .filter(|n| *n > 0)
                            .ok_or_else(|| parse_error(format!("unknown item number: {}", number)))?;
                        (name, number - 1)
                    }
                    _ => (arg.as_str(), 0),
                };
                let item = p.catalog.item_by_key(name)?;
                check_tile(p.catalog, zone, item.name, index)?;
                (item.name.to_string(), index)
            };
            p.expect_colon("item")?;
            let list = p.expect_arg("replacement")?;
            let replacements = p.blocked_list(&list)?;
            let target = if block { &mut locations.blocked } else { &mut locations.zones };
            target
                .entry(zone)
                .or_default()
                .entry(item)
                .or_default()
                .insert(index, replacements);
            Ok(())
        })?;
        *field = Feature::Custom(locations);
        Ok(())
    }

    fn parse_rewards(&mut self, negate: bool, field: &mut Feature<PrologueRewards>) -> Result<()> {
        if negate {
            *field = Feature::Disabled;
            return Ok(());
        }
        if !self.eat(':') {
            if !field.is_enabled() {
                *field = Feature::Enabled;
            }
            return Ok(());
        }
        let mut rewards = field.custom().cloned().unwrap_or_default();
        self.each_entry('b', |p| {
            let mut arg = p.expect_arg("reward")?;
            let block = arg.starts_with('-');
            if block {
                arg.remove(0);
            }
            let mut chars = arg.chars();
            let reward = match (chars.next(), chars.next()) {
                (Some(code), None) => Reward::from_code(code),
                _ => None,
            }
            .ok_or_else(|| parse_error(format!("unknown reward: {}", arg)))?;
            p.expect_colon("reward")?;
            let list = p.read_arg();
            if block {
                rewards.blocked.insert(reward, p.blocked_list(&list)?);
            } else {
                rewards.rewards.insert(reward, p.item_list(&list)?);
            }
            Ok(())
        })?;
        *field = Feature::Custom(rewards);
        Ok(())
    }

    fn ability(&self, c: char) -> Result<char> {
        Ok(self.catalog.relic_by_ability(c)?.ability)
    }

    fn ability_set(&self, lock: &str) -> Result<String> {
        lock.chars().map(|c| self.ability(c)).collect()
    }

    /// Relic candidate list where `0` stands for "empty".
    fn relic_slots(&self, arg: &str) -> Result<Vec<Option<char>>> {
        arg.chars()
            .map(|c| if c == '0' { Ok(None) } else { self.ability(c).map(Some) })
            .collect()
    }

    /// `-`-separated lock list allowing at most one empty alternative.
    fn lock_list(&self, part: &str, context: &str) -> Result<Vec<String>> {
        let mut empty = 0;
        let mut locks = Vec::new();
        for lock in part.split('-') {
            if lock.is_empty() {
                empty += 1;
            } else {
                locks.push(self.ability_set(lock)?);
            }
        }
        if empty > 1 {
            return Err(parse_error(format!("invalid lock: {}", context)));
        }
        Ok(locks)
    }

    fn parse_relics(&mut self, negate: bool, field: &mut Feature<RelicLocations>) -> Result<()> {
        if negate {
            *field = Feature::Disabled;
            return Ok(());
        }
        if !self.eat(':') {
            if !field.is_enabled() {
                *field = Feature::Enabled;
            }
            return Ok(());
        }
        let mut relics = field.custom().cloned().unwrap_or_default();
        self.each_entry('r', |p| {
            let arg = p.expect_arg("relic location")?;
            match arg.as_str() {
                "x" => {
                    p.expect_colon("x")?;
                    let name = p.expect_arg("extension")?;
                    let ext = Extension::from_name(&name)
                        .ok_or_else(|| parse_error(format!("invalid relic locations extension: {}", name)))?;
                    relics.extension = Some(ext);
                    return Ok(());
                }
                "r" => {
                    relics.leak_prevention = Some(true);
                    return Ok(());
                }
                "~r" => {
                    relics.leak_prevention = Some(false);
                    return Ok(());
                }
                _ => {}
            }
            if arg == THRUST_SWORD.to_string() {
                relics.thrust_sword_ability = Some(true);
                return Ok(());
            }
            if arg == format!("~{}", THRUST_SWORD) {
                relics.thrust_sword_ability = Some(false);
                return Ok(());
            }
            if is_goal_key(&arg) {
                let (min, max) = match arg.split_once('-') {
                    Some((min, max)) => (min, Some(max)),
                    None => (arg.as_str(), None),
                };
                let min = parse_number(min)? as u32;
                let max = max.map(parse_number).transpose()?.map(|max| max as u32);
                if max.map_or(false, |max| max < min) {
                    return Err(parse_error(format!("invalid complexity: {}", arg)));
                }
                p.expect_colon("complexity")?;
                let goals_arg = p.expect_arg("complexity goal")?;
                if goals_arg.contains('+') {
                    return Err(parse_error(format!("invalid complexity goal: {}", goals_arg)));
                }
                let goals = p.lock_list(&goals_arg, &arg)?;
                if goals.is_empty() {
                    return Err(parse_error(format!("invalid complexity goal: {}", goals_arg)));
                }
                relics.goal = Some(ComplexityGoal { min, max, goals });
                return Ok(());
            }
            if let Some(rest) = arg.strip_prefix('@') {
                let location = p.catalog.location_by_id(rest)?.id();
                p.expect_colon("placement")?;
                let list = p.expect_arg("placement")?;
                relics.placed.insert(location, p.relic_slots(&list)?);
                return Ok(());
            }
            if let Some(rest) = arg.strip_prefix('=') {
                let relic = p.catalog.relic_by_ability_or_name(rest)?.ability;
                p.expect_colon("replacement")?;
                let item = p.expect_arg("replacement")?;
                relics.replaced.insert(relic, p.item_name(&item)?);
                return Ok(());
            }
            if let Some(rest) = arg.strip_prefix('-') {
                let location = p.catalog.location_by_id(rest)?.id();
                p.expect_colon("block")?;
                let list = p.expect_arg("block")?;
                relics.blocked.insert(location, p.relic_slots(&list)?);
                return Ok(());
            }
            let location = p.catalog.location_by_id(&arg)?.id();
            p.expect_colon("location")?;
            let spec = p.read_arg();
            let mut parts = spec.split('+');
            let locks = p.lock_list(parts.next().unwrap_or(""), &arg)?;
            let escapes = match parts.next() {
                Some(part) => p.lock_list(part, &arg)?,
                None => Vec::new(),
            };
            if parts.next().is_some() {
                return Err(parse_error(format!("invalid lock: {}:{}", arg, spec)));
            }
            let entry = relics.locations.entry(location).or_default();
            entry.locks.extend(locks);
            entry.escapes.extend(escapes);
            Ok(())
        })?;
        *field = if relics == RelicLocations::default() {
            Feature::Enabled
        } else {
            Feature::Custom(relics)
        };
        Ok(())
    }

    fn parse_writes(&mut self, writes: &mut Vec<Write>) -> Result<()> {
        self.each_entry('w', |p| {
            let address = parse_address(&p.expect_arg("address")?)?;
            p.expect_colon("address")?;
            let value = parse_write_value(&p.expect_arg("value")?)?;
            writes.push(Write { address, value });
            Ok(())
        })?;
        Ok(())
    }
}

pub(crate) fn check_slot(catalog: &Catalog, slot: Slot, name: &str) -> Result<()> {
    let item = catalog.item_by_name(name)?;
    if !slot.accepts(item.kind) {
        return Err(RandomiserError::Config(format!(
            "cannot equip {} in slot '{}'",
            item.name,
            slot.code()
        )));
    }
    Ok(())
}

/// Two-handed weapons leave the other hand empty.
pub(crate) fn check_hands(
    catalog: &Catalog,
    slots: &BTreeMap<Slot, Vec<Option<String>>>,
    slot: Slot,
    name: &str,
) -> Result<()> {
    let Some(other) = slot.other_hand() else {
        return Ok(());
    };
    let item = catalog.item_by_name(name)?;
    for held in slots.get(&other).into_iter().flatten().flatten() {
        let held_item = catalog.item_by_name(held)?;
        if item.kind == crate::constants::ItemType::Weapon2
            || held_item.kind == crate::constants::ItemType::Weapon2
        {
            return Err(RandomiserError::Config(format!(
                "cannot equip {} and {}",
                held_item.name, item.name
            )));
        }
    }
    Ok(())
}

pub(crate) fn check_tile(catalog: &Catalog, zone: ZoneKey, name: &str, index: usize) -> Result<()> {
    let item = catalog.item_by_name(name)?;
    match zone {
        ZoneKey::Zone(zone) => catalog.tile_for_item_in_zone(item, zone, index).map(|_| ()),
        ZoneKey::All if index < item.tiles.len() => Ok(()),
        ZoneKey::All => Err(RandomiserError::UnknownTile {
            zone: "*".to_string(),
            item: item.name.to_string(),
            index: index + 1,
        }),
    }
}

/// Parse an options string.
pub fn parse(catalog: &Catalog, input: &str) -> Result<Options> {
    trace!("parsing options '{}'", input);
    Parser {
        catalog,
        chars: input.chars().collect(),
        pos: 0,
    }
    .parse()
}

fn strip(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn item_list(items: &[Option<String>]) -> String {
    items
        .iter()
        .map(|item| item.as_deref().map(strip).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("-")
}

fn name_list(items: &[String]) -> String {
    items.iter().map(|item| strip(item)).collect::<Vec<_>>().join("-")
}

fn relic_slots(relics: &[Option<char>]) -> String {
    relics.iter().map(|relic| relic.unwrap_or('0')).collect()
}

/// Sort key for enemy drop keys: wildcards first, then catalog order.
fn enemy_rank(catalog: &Catalog, key: &str) -> (usize, usize) {
    match key {
        ALL_ENEMIES => (0, 0),
        GLOBAL_DROP => (1, 0),
        LIBRARIAN_DROP => (2, 0),
        _ => {
            let index = catalog
                .enemy_by_id(key)
                .ok()
                .and_then(|enemy| catalog.enemies().iter().position(|e| e.id == enemy.id))
                .unwrap_or(usize::MAX);
            (3, index)
        }
    }
}

fn location_rank(catalog: &Catalog, id: &str) -> usize {
    catalog.location_index(id).unwrap_or(usize::MAX)
}

fn toggle<T>(tokens: &mut Vec<String>, letter: char, feature: &Feature<T>, args: impl FnOnce(&T) -> String) {
    match feature {
        Feature::Unset => {}
        Feature::Disabled => tokens.push(format!("~{}", letter)),
        Feature::Enabled => tokens.push(letter.to_string()),
        Feature::Custom(value) => {
            let args = args(value);
            if args.is_empty() {
                tokens.push(letter.to_string());
            } else {
                tokens.push(format!("{}{}", letter, args));
            }
        }
    }
}

fn flag(tokens: &mut Vec<String>, letter: char, value: Option<bool>) {
    match value {
        Some(true) => tokens.push(letter.to_string()),
        Some(false) => tokens.push(format!("~{}", letter)),
        None => {}
    }
}

fn drops_args(catalog: &Catalog, drops: &EnemyDrops) -> String {
    let mut out = String::new();
    let mut blocked: Vec<_> = drops.blocked.iter().collect();
    blocked.sort_by_key(|(key, _)| enemy_rank(catalog, key));
    for (enemy, items) in blocked {
        out.push_str(&format!(":-{}:{}", enemy, name_list(items)));
    }
    let mut entries: Vec<_> = drops.drops.iter().collect();
    entries.sort_by_key(|(key, _)| enemy_rank(catalog, key));
    for (enemy, items) in entries {
        out.push_str(&format!(":{}:{}", enemy, item_list(items)));
    }
    out
}

fn equipment_args(equipment: &StartingEquipment) -> String {
    let mut out = String::new();
    for (slot, items) in &equipment.blocked {
        out.push_str(&format!(":-{}:{}", slot.code(), name_list(items)));
    }
    for (slot, items) in &equipment.slots {
        out.push_str(&format!(":{}:{}", slot.code(), item_list(items)));
    }
    out
}

fn tile_args(out: &mut String, prefix: &str, tiles: &crate::options::TileOverrides) {
    for (zone, items) in tiles {
        for (item, indexes) in items {
            let item = if item == "*" { item.clone() } else { strip(item) };
            for (index, replacements) in indexes {
                let number = if *index > 0 { format!("-{}", index + 1) } else { String::new() };
                out.push_str(&format!(
                    ":{}{}:{}{}:{}",
                    prefix,
                    zone.code(),
                    item,
                    number,
                    name_list(replacements)
                ));
            }
        }
    }
}

fn items_args(locations: &ItemLocations) -> String {
    let mut out = String::new();
    tile_args(&mut out, "-", &locations.blocked);
    tile_args(&mut out, "", &locations.zones);
    out
}

fn rewards_args(rewards: &PrologueRewards) -> String {
    let mut out = String::new();
    for (reward, items) in &rewards.blocked {
        out.push_str(&format!(":-{}:{}", reward.code(), name_list(items)));
    }
    for (reward, items) in &rewards.rewards {
        out.push_str(&format!(":{}:{}", reward.code(), item_list(items)));
    }
    out
}

fn lock_spec(locks: &LocationLocks) -> String {
    let mut spec = locks.locks.join("-");
    if !locks.escapes.is_empty() {
        spec.push('+');
        spec.push_str(&locks.escapes.join("-"));
    }
    spec
}

fn relics_args(catalog: &Catalog, relics: &RelicLocations) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(goal) = &relics.goal {
        parts.push(format!("{}:{}", goal.target(), goal.goals.join("-")));
    }
    if let Some(ext) = relics.extension {
        parts.push(format!("x:{}", ext.name()));
    }
    match relics.leak_prevention {
        Some(false) => parts.push("~r".to_string()),
        Some(true) => parts.push("r".to_string()),
        None => {}
    }
    match relics.thrust_sword_ability {
        Some(true) => parts.push(THRUST_SWORD.to_string()),
        Some(false) => parts.push(format!("~{}", THRUST_SWORD)),
        None => {}
    }
    let mut locations: Vec<_> = relics.locations.iter().collect();
    locations.sort_by_key(|(id, _)| location_rank(catalog, id));
    for (id, locks) in locations {
        parts.push(format!("{}:{}", strip(id), lock_spec(locks)));
    }
    let mut placed: Vec<_> = relics.placed.iter().collect();
    placed.sort_by_key(|(id, _)| location_rank(catalog, id));
    for (id, candidates) in placed {
        parts.push(format!("@{}:{}", strip(id), relic_slots(candidates)));
    }
    for (relic, item) in &relics.replaced {
        parts.push(format!("={}:{}", relic, strip(item)));
    }
    let mut blocked: Vec<_> = relics.blocked.iter().collect();
    blocked.sort_by_key(|(id, _)| location_rank(catalog, id));
    for (id, relics) in blocked {
        parts.push(format!("-{}:{}", strip(id), relic_slots(relics)));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(":{}", parts.join(":"))
    }
}

pub(crate) fn write_value_token(value: &WriteValue) -> String {
    match value {
        WriteValue::Char(v) => format!("0x{:02x}", v),
        WriteValue::Short(v) => format!("0x{:04x}", v),
        WriteValue::Word(v) => format!("0x{:08x}", v),
        WriteValue::Long(v) => format!("0x{:016x}", v),
        WriteValue::Bytes(bytes) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
        WriteValue::Random(kind) => kind.token().to_string(),
    }
}

fn writes_token(writes: &[Write]) -> String {
    if writes.is_empty() {
        return "~w".to_string();
    }
    let mut out = String::from("w");
    for write in writes {
        out.push_str(&format!(
            ":0x{:08x}:{}",
            write.address,
            write_value_token(&write.value)
        ));
    }
    out
}

/// Serialize options without collapsing onto a preset.
pub fn serialize(catalog: &Catalog, options: &Options) -> String {
    let mut tokens: Vec<String> = Vec::new();
    flag(&mut tokens, 't', options.tournament_mode);
    flag(&mut tokens, 'l', options.colorrando_mode);
    flag(&mut tokens, 'x', options.magicmax_mode);
    flag(&mut tokens, 'z', options.anti_freeze_mode);
    flag(&mut tokens, 'y', options.mypurse_mode);
    if let Some(color) = options.mapcolor_theme {
        tokens.push(format!("m:{}", color.code()));
    }
    if let Some(preset) = &options.preset {
        tokens.push(format!("p:{}", preset));
    }
    toggle(&mut tokens, 'd', &options.enemy_drops, |drops| drops_args(catalog, drops));
    toggle(&mut tokens, 'e', &options.starting_equipment, equipment_args);
    toggle(&mut tokens, 'i', &options.item_locations, items_args);
    toggle(&mut tokens, 'b', &options.prologue_rewards, rewards_args);
    toggle(&mut tokens, 'r', &options.relic_locations, |relics| relics_args(catalog, relics));
    flag(&mut tokens, 's', options.stats);
    flag(&mut tokens, 'm', options.music);
    flag(&mut tokens, 'k', options.turkey_mode);
    if let Some(writes) = &options.writes {
        tokens.push(writes_token(writes));
    }
    let last = tokens.len().saturating_sub(1);
    tokens
        .into_iter()
        .enumerate()
        .map(|(i, mut token)| {
            if token.len() > 1 && i < last {
                token.push(',');
            }
            token
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::standard()
    }

    fn round_trip(input: &str) -> String {
        let options = parse(&catalog(), input).unwrap();
        let output = serialize(&catalog(), &options);
        assert_eq!(parse(&catalog(), &output).unwrap(), options, "{}", output);
        output
    }

    #[test]
    fn enemy_drop_override_round_trips() {
        let options = parse(&catalog(), "d:Zombie:Cutlass-Bandanna").unwrap();
        let drops = options.enemy_drops.custom().unwrap();
        assert_eq!(
            drops.drops["Zombie"],
            vec![Some("Cutlass".to_string()), Some("Bandanna".to_string())]
        );
        assert_eq!(serialize(&catalog(), &options), "d:Zombie:Cutlass-Bandanna");
    }

    #[test]
    fn plain_letters_toggle_features() {
        let options = parse(&catalog(), "dsm~k").unwrap();
        assert_eq!(options.enemy_drops, Feature::Enabled);
        assert_eq!(options.stats, Some(true));
        assert_eq!(options.music, Some(true));
        assert_eq!(options.turkey_mode, Some(false));
        assert_eq!(round_trip("dsm~k"), "dsm~k");
    }

    #[test]
    fn extra_mode_flags_parse() {
        let options = parse(&catalog(), "lxzym:r,s").unwrap();
        assert_eq!(options.colorrando_mode, Some(true));
        assert_eq!(options.magicmax_mode, Some(true));
        assert_eq!(options.anti_freeze_mode, Some(true));
        assert_eq!(options.mypurse_mode, Some(true));
        assert_eq!(options.mapcolor_theme, Some(MapColor::Crimson));
        assert_eq!(options.music, None);
        round_trip("lxzym:r,s");
    }

    #[test]
    fn ambiguous_enemies_need_levels() {
        let options = parse(&catalog(), "d:Skeleton-26:Heart:*:-").unwrap();
        let drops = options.enemy_drops.custom().unwrap();
        assert_eq!(drops.drops["Skeleton-26"], vec![Some("Heart".to_string())]);
        assert_eq!(drops.drops["*"], vec![None, None]);
        assert_eq!(round_trip("d:Skeleton-26:Heart:*:-"), "d:*:-:Skeleton-26:Heart");
    }

    #[test]
    fn too_many_drops_are_rejected() {
        assert!(matches!(
            parse(&catalog(), "d:Zombie:Heart-Heart-Heart"),
            Err(RandomiserError::Parse(_))
        ));
        assert!(parse(&catalog(), "d:Global:Heart-Heart-Heart").is_ok());
    }

    #[test]
    fn unknown_names_are_reported() {
        assert!(matches!(
            parse(&catalog(), "d:Zombie:Excalibur"),
            Err(RandomiserError::UnknownItem(_))
        ));
        assert!(matches!(
            parse(&catalog(), "d:Dracula:Heart"),
            Err(RandomiserError::UnknownEnemy(_))
        ));
        assert!(matches!(
            parse(&catalog(), "i:XYZ:Heart:Potion"),
            Err(RandomiserError::UnknownZone(_))
        ));
        assert!(matches!(
            parse(&catalog(), "r:B:Q"),
            Err(RandomiserError::UnknownRelic(_))
        ));
        assert!(matches!(
            parse(&catalog(), "i:NO0:LifeVessel-3:Potion"),
            Err(RandomiserError::UnknownTile { .. })
        ));
    }

    #[test]
    fn malformed_strings_fail() {
        assert!(parse(&catalog(), "").is_err());
        assert!(parse(&catalog(), "q").is_err());
        assert!(parse(&catalog(), "~p:safe").is_err());
        assert!(parse(&catalog(), "p").is_err());
        assert!(parse(&catalog(), "d:").is_err());
        assert!(parse(&catalog(), "e:r").is_err());
        assert!(parse(&catalog(), "w:0x10:0x01").is_err());
        assert!(parse(&catalog(), "r:B:L--").is_err());
    }

    #[test]
    fn equipment_respects_slots_and_hands() {
        let options = parse(&catalog(), "e:r:Claymore:h:Velvethat:c:").unwrap();
        let equipment = options.starting_equipment.custom().unwrap();
        assert_eq!(equipment.slots[&Slot::RightHand], vec![Some("Claymore".to_string())]);
        assert_eq!(equipment.slots[&Slot::Cloak], vec![None]);
        assert!(parse(&catalog(), "e:h:Claymore").is_err());
        assert!(parse(&catalog(), "e:r:Claymore:l:Leathershield").is_err());
        assert!(parse(&catalog(), "e:l:Leathershield:r:Zweihander").is_err());
        round_trip("e:-o:Zircon:r:Claymore:h:Velvethat:c:");
    }

    #[test]
    fn item_locations_use_one_based_indexes() {
        let options = parse(&catalog(), "i:NO0:LifeVessel-2:Potion-Elixir:-*:*:Heart").unwrap();
        let items = options.item_locations.custom().unwrap();
        let zone = &items.zones[&ZoneKey::Zone(Zone::MarbleGallery)];
        assert_eq!(
            zone["Life Vessel"][&1],
            vec!["Potion".to_string(), "Elixir".to_string()]
        );
        assert_eq!(items.blocked[&ZoneKey::All]["*"][&0], vec!["Heart".to_string()]);
        round_trip("i:NO0:LifeVessel-2:Potion-Elixir:-*:*:Heart");
    }

    #[test]
    fn rewards_parse() {
        let options = parse(&catalog(), "b:h:Mannaprism:-p:Potion").unwrap();
        let rewards = options.prologue_rewards.custom().unwrap();
        assert_eq!(rewards.rewards[&Reward::HeartRefresh], vec![Some("Manna prism".to_string())]);
        assert_eq!(rewards.blocked[&Reward::Potion], vec!["Potion".to_string()]);
        assert_eq!(round_trip("b:h:Mannaprism:-p:Potion"), "b:-p:Potion:h:Mannaprism");
    }

    #[test]
    fn relic_location_rules() {
        let input = "r:3:LV-MP:x:spread:~r:D:B:L+M-J:Trio:HB:@J:ATR0:=o:Zircon:-V:0";
        let options = parse(&catalog(), input).unwrap();
        let relics = options.relic_locations.custom().unwrap();
        let goal = relics.goal.as_ref().unwrap();
        assert_eq!(goal.min, 3);
        assert_eq!(goal.max, None);
        assert_eq!(goal.goals, vec!["LV".to_string(), "MP".to_string()]);
        assert_eq!(relics.extension, Some(Extension::Spread));
        assert_eq!(relics.leak_prevention, Some(false));
        assert_eq!(relics.thrust_sword_ability, Some(true));
        assert_eq!(relics.locations["B"].locks, vec!["L".to_string()]);
        assert_eq!(relics.locations["B"].escapes, vec!["M".to_string(), "J".to_string()]);
        assert_eq!(relics.locations["Trio"].locks, vec!["HB".to_string()]);
        assert_eq!(relics.placed["J"], vec![Some('A'), Some('T'), Some('R'), None]);
        assert_eq!(relics.replaced[&'o'], "Zircon");
        assert_eq!(relics.blocked["V"], vec![None]);
        assert_eq!(round_trip(input), input);
    }

    #[test]
    fn bare_relic_randomization_is_enabled() {
        let options = parse(&catalog(), "r").unwrap();
        assert_eq!(options.relic_locations, Feature::Enabled);
        let options = parse(&catalog(), "~r").unwrap();
        assert_eq!(options.relic_locations, Feature::Disabled);
    }

    #[test]
    fn goal_ranges_parse() {
        let options = parse(&catalog(), "r:4-6:H").unwrap();
        let goal = options.relic_locations.custom().unwrap().goal.clone().unwrap();
        assert_eq!((goal.min, goal.max), (4, Some(6)));
        assert!(parse(&catalog(), "r:6-4:H").is_err());
        assert!(parse(&catalog(), "r:4:H+M").is_err());
    }

    #[test]
    fn writes_parse_every_value_form() {
        let input = "w:0x04389c6c:0x12:0x04389c70:0x1234:0x04389c74:0x12345678:\
                     0x04389c78:0x0102030405060708:0x04389c80:deadbeef:0x04389c84:r10:0x04389c88:rr";
        let options = parse(&catalog(), input).unwrap();
        let writes = options.writes.clone().unwrap();
        assert_eq!(writes.len(), 7);
        assert_eq!(writes[0].value, WriteValue::Char(0x12));
        assert_eq!(writes[1].value, WriteValue::Short(0x1234));
        assert_eq!(writes[2].value, WriteValue::Word(0x1234_5678));
        assert_eq!(writes[3].value, WriteValue::Long(0x0102_0304_0506_0708));
        assert_eq!(writes[4].value, WriteValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]));
        assert_eq!(writes[5].value, WriteValue::Random(RandomValue::UpTo10));
        assert_eq!(writes[6].value, WriteValue::Random(RandomValue::Relic));
        assert_eq!(round_trip(input), input);
        assert!(parse(&catalog(), "w:0x04389c6c:0x123").is_err());
        assert!(parse(&catalog(), "w:0x04389c6c:rq").is_err());
    }

    #[test]
    fn argument_tokens_are_comma_separated() {
        let output = round_trip("tp:safe,d:Zombie:Heart,s");
        assert_eq!(output, "tp:safe,d:Zombie:Heart,s");
    }

    #[test]
    fn serialization_is_idempotent() {
        for input in [
            "d:Bat:Heart:Zombie:Cutlass,rs",
            "r:B:L:3:LV-MP",
            "e:o:Medal,~s,k",
            "~w",
        ] {
            let once = serialize(&catalog(), &parse(&catalog(), input).unwrap());
            let twice = serialize(&catalog(), &parse(&catalog(), &once).unwrap());
            assert_eq!(once, twice);
        }
    }
}
