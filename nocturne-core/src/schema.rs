//! Declarative preset documents as stored in `presets/*.json`.
//!
//! The shapes here only describe the document; all name resolution and
//! validation happens in [`crate::builder::PresetBuilder::from_schema`].

use serde::Deserialize;

use crate::Result;

/// A field that is either a plain on/off switch or a structured value.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BoolOr<T> {
    Bool(bool),
    Value(T),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value.clone()],
            OneOrMany::Many(values) => values.clone(),
        }
    }
}

/// Numbers may be written as JSON numbers or as `"0x..."` strings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(u64),
    Text(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Metadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub weight: i32,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, rename = "override")]
    pub override_: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AliasEntry {
    pub zone: Option<String>,
    pub enemy: Option<String>,
    pub relic: Option<String>,
    pub location: Option<String>,
    pub item: Option<String>,
    pub alias: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ItemLocationEntry {
    pub zone: String,
    pub item: String,
    /// One based tile number within the zone.
    pub index: Option<usize>,
    pub replacement: OneOrMany<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EnemyDropEntry {
    pub enemy: String,
    pub level: Option<u8>,
    pub items: OneOrMany<Option<String>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RewardEntry {
    pub item: String,
    pub replacement: OneOrMany<Option<String>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EquipmentEntry {
    pub slot: String,
    pub item: OneOrMany<Option<String>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockLocationEntry {
    pub location: String,
    pub locks: Option<Vec<String>>,
    pub block: Option<OneOrMany<Option<String>>>,
    pub escape_requires: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PlaceRelicEntry {
    pub location: String,
    pub relic: OneOrMany<Option<String>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ReplaceRelicEntry {
    pub relic: String,
    pub item: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GoalEntry {
    pub min: u32,
    pub max: Option<u32>,
    pub goals: Vec<String>,
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WriteKind {
    Char,
    Short,
    Word,
    Long,
    String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WriteEntry {
    #[serde(rename = "type")]
    pub kind: WriteKind,
    /// Missing addresses continue where the previous write ended.
    pub address: Option<NumberOrText>,
    pub value: NumberOrText,
    pub enabled: Option<bool>,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetDocument {
    pub metadata: Metadata,
    #[serde(default)]
    pub alias: Vec<AliasEntry>,
    pub inherits: Option<String>,
    pub item_locations: Option<BoolOr<Vec<ItemLocationEntry>>>,
    #[serde(default)]
    pub block_items: Vec<ItemLocationEntry>,
    pub enemy_drops: Option<BoolOr<Vec<EnemyDropEntry>>>,
    #[serde(default)]
    pub block_drops: Vec<EnemyDropEntry>,
    pub prologue_rewards: Option<BoolOr<Vec<RewardEntry>>>,
    #[serde(default)]
    pub block_rewards: Vec<RewardEntry>,
    pub starting_equipment: Option<BoolOr<Vec<EquipmentEntry>>>,
    #[serde(default)]
    pub block_equipment: Vec<EquipmentEntry>,
    pub relic_locations: Option<bool>,
    pub prevent_leaks: Option<bool>,
    pub thrust_sword_ability: Option<bool>,
    pub relic_locations_extension: Option<BoolOr<String>>,
    #[serde(default)]
    pub lock_location: Vec<LockLocationEntry>,
    #[serde(default)]
    pub place_relic: Vec<PlaceRelicEntry>,
    #[serde(default)]
    pub replace_relic: Vec<ReplaceRelicEntry>,
    pub complexity_goal: Option<BoolOr<GoalEntry>>,
    pub stats: Option<bool>,
    pub music: Option<bool>,
    pub turkey_mode: Option<bool>,
    pub colorrando_mode: Option<bool>,
    pub magicmax_mode: Option<bool>,
    pub anti_freeze_mode: Option<bool>,
    pub mypurse_mode: Option<bool>,
    pub mapcolor_theme: Option<BoolOr<String>>,
    #[serde(default)]
    pub writes: Vec<WriteEntry>,
}

impl PresetDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
