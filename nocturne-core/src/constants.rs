use std::fmt;

/// Size of a raw CD sector in the disc image.
pub const SECTOR_SIZE: u32 = 2352;
/// Offset of the last byte of user data inside a raw sector.
pub const SECTOR_DATA_END: u32 = 2071;
/// Offset a write continues from after running off the end of a sector.
pub const SECTOR_NEXT_DATA: u32 = 2376;

/// Salt nonces for the sequential generation phases.
pub const DROPS_NONCE: u64 = 0;
pub const RELIC_WRITES_NONCE: u64 = 1;
pub const ITEMS_NONCE: u64 = 2;
pub const MUSIC_NONCE: u64 = 3;
pub const WRITES_NONCE: u64 = 4;
/// First nonce handed to relic placement attempts.
pub const RELIC_ATTEMPT_NONCE: u64 = 16;

pub const DEFAULT_OPTIONS: &str = "p:safe";
pub const DEFAULT_PRESET: &str = "safe";
pub const BASE_URL: &str = "https://sotn.io/";
pub const DEV_BASE_URL: &str = "https://dev.sotn.io/";

/// Options strings with a dedicated landing URL.
pub const OPTIONS_URLS: &[(&str, &str)] = &[
    ("p:safe", "https://sotn.io/"),
    ("p:casual", "https://casual.sotn.io/"),
    ("p:og", "https://og.sotn.io/"),
    ("p:guardedOg", "https://guarded-og.sotn.io/"),
    ("p:stwosafe", "https://stwosafe.sotn.io/"),
    ("p:grandTour", "https://grandtour.sotn.io/"),
    ("p:scavenger", "https://scavenger.sotn.io/"),
    ("p:ratRace", "https://ratrace.sotn.io/"),
];

pub fn url_for_options(options: &str) -> Option<&'static str> {
    OPTIONS_URLS
        .iter()
        .find(|(opts, _)| *opts == options)
        .map(|(_, url)| *url)
}

pub fn options_for_url(url: &str) -> Option<&'static str> {
    OPTIONS_URLS
        .iter()
        .find(|(_, base)| *base == url)
        .map(|(opts, _)| *opts)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Zone {
    Prologue,
    Colosseum,
    Catacombs,
    Center,
    AbandonedMine,
    RoyalChapel,
    LongLibrary,
    MarbleGallery,
    OuterWall,
    OlroxQuarters,
    Entrance,
    EntranceRevisited,
    UndergroundCaverns,
    AlchemyLab,
    ClockTower,
    CastleKeep,
    ReverseColosseum,
    FloatingCatacombs,
    ReverseCenter,
    CaveMine,
    AntiChapel,
    ForbiddenLibrary,
    BlackMarbleGallery,
    ReverseOuterWall,
    DeathWingsLair,
    ReverseEntrance,
    ReverseCaverns,
    NecromancyLab,
    ReverseClockTower,
    ReverseKeep,
}

impl Zone {
    pub const ALL: [Zone; 30] = [
        Zone::Prologue,
        Zone::Colosseum,
        Zone::Catacombs,
        Zone::Center,
        Zone::AbandonedMine,
        Zone::RoyalChapel,
        Zone::LongLibrary,
        Zone::MarbleGallery,
        Zone::OuterWall,
        Zone::OlroxQuarters,
        Zone::Entrance,
        Zone::EntranceRevisited,
        Zone::UndergroundCaverns,
        Zone::AlchemyLab,
        Zone::ClockTower,
        Zone::CastleKeep,
        Zone::ReverseColosseum,
        Zone::FloatingCatacombs,
        Zone::ReverseCenter,
        Zone::CaveMine,
        Zone::AntiChapel,
        Zone::ForbiddenLibrary,
        Zone::BlackMarbleGallery,
        Zone::ReverseOuterWall,
        Zone::DeathWingsLair,
        Zone::ReverseEntrance,
        Zone::ReverseCaverns,
        Zone::NecromancyLab,
        Zone::ReverseClockTower,
        Zone::ReverseKeep,
    ];

    /// Short stage code used in options strings and preset documents.
    pub fn code(self) -> &'static str {
        match self {
            Zone::Prologue => "ST0",
            Zone::Colosseum => "ARE",
            Zone::Catacombs => "CAT",
            Zone::Center => "CEN",
            Zone::AbandonedMine => "CHI",
            Zone::RoyalChapel => "DAI",
            Zone::LongLibrary => "LIB",
            Zone::MarbleGallery => "NO0",
            Zone::OuterWall => "NO1",
            Zone::OlroxQuarters => "NO2",
            Zone::Entrance => "NO3",
            Zone::EntranceRevisited => "NP3",
            Zone::UndergroundCaverns => "NO4",
            Zone::AlchemyLab => "NZ0",
            Zone::ClockTower => "NZ1",
            Zone::CastleKeep => "TOP",
            Zone::ReverseColosseum => "RARE",
            Zone::FloatingCatacombs => "RCAT",
            Zone::ReverseCenter => "RCEN",
            Zone::CaveMine => "RCHI",
            Zone::AntiChapel => "RDAI",
            Zone::ForbiddenLibrary => "RLIB",
            Zone::BlackMarbleGallery => "RNO0",
            Zone::ReverseOuterWall => "RNO1",
            Zone::DeathWingsLair => "RNO2",
            Zone::ReverseEntrance => "RNO3",
            Zone::ReverseCaverns => "RNO4",
            Zone::NecromancyLab => "RNZ0",
            Zone::ReverseClockTower => "RNZ1",
            Zone::ReverseKeep => "RTOP",
        }
    }

    pub fn from_code(code: &str) -> Option<Zone> {
        Zone::ALL
            .iter()
            .copied()
            .find(|zone| zone.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ItemType {
    Heart,
    Gold,
    Subweapon,
    Powerup,
    Weapon1,
    Weapon2,
    Shield,
    Helmet,
    Armor,
    Cloak,
    Accessory,
    Usable,
}

impl ItemType {
    pub fn is_equipment(self) -> bool {
        matches!(
            self,
            ItemType::Weapon1
                | ItemType::Weapon2
                | ItemType::Shield
                | ItemType::Helmet
                | ItemType::Armor
                | ItemType::Cloak
                | ItemType::Accessory
        )
    }
}

/// Where an item tile lives inside a zone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TileKind {
    Floor,
    Candle,
    Breakable,
    Shop,
    Reward,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Slot {
    RightHand,
    LeftHand,
    Head,
    Body,
    Cloak,
    Other,
    AxeArmor,
    LuckMode,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::RightHand,
        Slot::LeftHand,
        Slot::Head,
        Slot::Body,
        Slot::Cloak,
        Slot::Other,
        Slot::AxeArmor,
        Slot::LuckMode,
    ];

    pub fn code(self) -> char {
        match self {
            Slot::RightHand => 'r',
            Slot::LeftHand => 'l',
            Slot::Head => 'h',
            Slot::Body => 'b',
            Slot::Cloak => 'c',
            Slot::Other => 'o',
            Slot::AxeArmor => 'a',
            Slot::LuckMode => 'x',
        }
    }

    pub fn from_code(code: char) -> Option<Slot> {
        Slot::ALL.iter().copied().find(|slot| slot.code() == code)
    }

    /// Slot names as written in preset documents ("Right hand", "Luck mode").
    pub fn from_name(name: &str) -> Option<Slot> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "righthand" => Some(Slot::RightHand),
            "lefthand" => Some(Slot::LeftHand),
            "head" => Some(Slot::Head),
            "body" => Some(Slot::Body),
            "cloak" => Some(Slot::Cloak),
            "other" => Some(Slot::Other),
            "axearmor" => Some(Slot::AxeArmor),
            "luckmode" => Some(Slot::LuckMode),
            _ => None,
        }
    }

    pub fn accepts(self, kind: ItemType) -> bool {
        match self {
            Slot::RightHand => matches!(
                kind,
                ItemType::Weapon1 | ItemType::Weapon2 | ItemType::Shield | ItemType::Usable
            ),
            Slot::LeftHand => matches!(
                kind,
                ItemType::Weapon1 | ItemType::Shield | ItemType::Usable
            ),
            Slot::Head => kind == ItemType::Helmet,
            Slot::Body | Slot::AxeArmor => kind == ItemType::Armor,
            Slot::Cloak => kind == ItemType::Cloak,
            Slot::Other | Slot::LuckMode => kind == ItemType::Accessory,
        }
    }

    /// The hand that a two-handed weapon in this slot would also occupy.
    pub fn other_hand(self) -> Option<Slot> {
        match self {
            Slot::RightHand => Some(Slot::LeftHand),
            Slot::LeftHand => Some(Slot::RightHand),
            _ => None,
        }
    }
}

/// Items handed out during the prologue that can be swapped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Reward {
    HeartRefresh,
    NeutronBomb,
    Potion,
}

impl Reward {
    pub const ALL: [Reward; 3] = [Reward::HeartRefresh, Reward::NeutronBomb, Reward::Potion];

    pub fn code(self) -> char {
        match self {
            Reward::HeartRefresh => 'h',
            Reward::NeutronBomb => 'n',
            Reward::Potion => 'p',
        }
    }

    pub fn from_code(code: char) -> Option<Reward> {
        Reward::ALL.iter().copied().find(|r| r.code() == code)
    }

    pub fn item_name(self) -> &'static str {
        match self {
            Reward::HeartRefresh => "Heart Refresh",
            Reward::NeutronBomb => "Neutron bomb",
            Reward::Potion => "Potion",
        }
    }

    pub fn from_item_name(name: &str) -> Option<Reward> {
        Reward::ALL.iter().copied().find(|r| r.item_name() == name)
    }
}

/// Relic location extension tiers. Each tier also enables the tiers it builds on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Extension {
    Guarded,
    Spread,
    Equipment,
    Tourist,
    Wanderer,
}

impl Extension {
    pub const ALL: [Extension; 5] = [
        Extension::Guarded,
        Extension::Spread,
        Extension::Equipment,
        Extension::Tourist,
        Extension::Wanderer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Extension::Guarded => "guarded",
            Extension::Spread => "spread",
            Extension::Equipment => "equipment",
            Extension::Tourist => "tourist",
            Extension::Wanderer => "wanderer",
        }
    }

    pub fn from_name(name: &str) -> Option<Extension> {
        Extension::ALL
            .iter()
            .copied()
            .find(|ext| ext.name().eq_ignore_ascii_case(name))
    }

    /// Tiers whose locations are eligible when this extension is selected.
    pub fn tiers(self) -> &'static [Extension] {
        match self {
            Extension::Guarded => &[Extension::Guarded],
            Extension::Spread => &[Extension::Spread, Extension::Guarded],
            Extension::Equipment => &[Extension::Equipment, Extension::Spread, Extension::Guarded],
            Extension::Tourist => &[
                Extension::Tourist,
                Extension::Equipment,
                Extension::Spread,
                Extension::Guarded,
            ],
            Extension::Wanderer => &[Extension::Wanderer, Extension::Spread, Extension::Guarded],
        }
    }

    pub fn includes(self, tier: Extension) -> bool {
        self.tiers().contains(&tier)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map colour themes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum MapColor {
    DarkBlue,
    Crimson,
    Brown,
    Green,
    Gray,
    Purple,
    Black,
}

impl MapColor {
    pub const ALL: [MapColor; 7] = [
        MapColor::DarkBlue,
        MapColor::Crimson,
        MapColor::Brown,
        MapColor::Green,
        MapColor::Gray,
        MapColor::Purple,
        MapColor::Black,
    ];

    pub fn code(self) -> char {
        match self {
            MapColor::DarkBlue => 'u',
            MapColor::Crimson => 'r',
            MapColor::Brown => 'b',
            MapColor::Green => 'g',
            MapColor::Gray => 'y',
            MapColor::Purple => 'p',
            MapColor::Black => 'k',
        }
    }

    pub fn from_code(code: char) -> Option<MapColor> {
        MapColor::ALL.iter().copied().find(|c| c.code() == code)
    }

    pub fn from_name(name: &str) -> Option<MapColor> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => MapColor::from_code(code),
            _ => {
                let key = name.to_ascii_lowercase().replace([' ', '_'], "");
                MapColor::ALL.iter().copied().find(|c| {
                    format!("{:?}", c).to_ascii_lowercase() == key
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tourist_builds_on_equipment_spread_and_guarded() {
        let tourist = Extension::Tourist;
        assert!(tourist.includes(Extension::Equipment));
        assert!(tourist.includes(Extension::Guarded));
        assert!(!tourist.includes(Extension::Wanderer));
        assert!(Extension::Wanderer.includes(Extension::Spread));
        assert!(!Extension::Wanderer.includes(Extension::Equipment));
    }

    #[test]
    fn slots_parse_document_names() {
        assert_eq!(Slot::from_name("Right hand"), Some(Slot::RightHand));
        assert_eq!(Slot::from_name("Luck mode"), Some(Slot::LuckMode));
        assert_eq!(Slot::from_name("Axearmor"), Some(Slot::AxeArmor));
        assert_eq!(Slot::from_name("Feet"), None);
    }

    #[test]
    fn left_hand_rejects_two_handed_weapons() {
        assert!(Slot::RightHand.accepts(ItemType::Weapon2));
        assert!(!Slot::LeftHand.accepts(ItemType::Weapon2));
        assert!(Slot::LuckMode.accepts(ItemType::Accessory));
    }

    #[test]
    fn zone_codes_are_unique() {
        for (i, a) in Zone::ALL.iter().enumerate() {
            for b in &Zone::ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
            assert_eq!(Zone::from_code(a.code()), Some(*a));
        }
    }

    #[test]
    fn known_options_have_urls() {
        assert_eq!(url_for_options("p:safe"), Some("https://sotn.io/"));
        assert_eq!(options_for_url("https://og.sotn.io/"), Some("p:og"));
        assert_eq!(url_for_options("p:nope"), None);
    }
}
