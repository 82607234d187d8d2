use crate::constants::{Extension, Zone};

/// Ability code of the thrust sword pseudo relic.
pub const THRUST_SWORD: char = 'D';

#[derive(Debug)]
pub struct Relic {
    pub id: u16,
    pub name: &'static str,
    pub ability: char,
    /// Set for relics that are really equipment items.
    pub item_id: Option<u16>,
    pub extension: Option<Extension>,
    pub progression: bool,
    /// Zone of the vanilla location. `None` when the relic has no location of its own.
    pub zone: Option<Zone>,
    pub address: u32,
}

/// A non-relic pickup that can hold a relic when its tier is enabled.
#[derive(Debug)]
pub struct ExtensionLocation {
    pub name: &'static str,
    pub extension: Extension,
    pub zone: Zone,
    pub address: u32,
}

macro_rules! relic {
    ($id:expr, $name:expr, $ability:expr, $zone:expr, $address:expr, $progression:expr) => {
        Relic {
            id: $id,
            name: $name,
            ability: $ability,
            item_id: None,
            extension: None,
            progression: $progression,
            zone: Some($zone),
            address: $address,
        }
    };
}

pub(crate) const RELICS: &[Relic] = &[
    relic!(0, "Soul of Bat", 'B', Zone::LongLibrary, 0x047a_5b66, true),
    relic!(1, "Fire of Bat", 'f', Zone::ClockTower, 0x0557_4d2e, false),
    relic!(2, "Echo of Bat", 'E', Zone::OlroxQuarters, 0x04aa_4156, true),
    relic!(3, "Force of Echo", 'e', Zone::ReverseOuterWall, 0x0526_e6a8, false),
    relic!(4, "Soul of Wolf", 'W', Zone::Entrance, 0x0461_6f2c, true),
    relic!(5, "Power of Wolf", 'p', Zone::OuterWall, 0x0491_e6cc, false),
    relic!(6, "Skill of Wolf", 's', Zone::ClockTower, 0x0557_4f4e, false),
    relic!(7, "Form of Mist", 'M', Zone::Colosseum, 0x043c_578a, true),
    relic!(8, "Power of Mist", 'P', Zone::CastleKeep, 0x05af_fc6a, true),
    relic!(9, "Gas Cloud", 'c', Zone::FloatingCatacombs, 0x04cf_a0ba, false),
    relic!(10, "Cube of Zoe", 'z', Zone::AlchemyLab, 0x049d_6596, false),
    relic!(11, "Spirit Orb", 'o', Zone::MarbleGallery, 0x048f_d1fe, false),
    relic!(12, "Gravity Boots", 'V', Zone::MarbleGallery, 0x048f_c9c6, true),
    relic!(13, "Leap Stone", 'L', Zone::CastleKeep, 0x05f6_c8da, true),
    relic!(14, "Holy Symbol", 'y', Zone::UndergroundCaverns, 0x04c3_4ee6, true),
    relic!(15, "Faerie Scroll", 'l', Zone::LongLibrary, 0x047a_5720, false),
    relic!(16, "Jewel of Open", 'J', Zone::LongLibrary, 0x047a_321c, true),
    relic!(17, "Merman Statue", 'U', Zone::UndergroundCaverns, 0x04c3_4ba6, true),
    relic!(18, "Bat Card", 'b', Zone::AlchemyLab, 0x054b_1d5a, false),
    relic!(19, "Ghost Card", 'g', Zone::CastleKeep, 0x05af_fc8a, false),
    relic!(20, "Faerie Card", 'a', Zone::LongLibrary, 0x047a_5784, false),
    relic!(21, "Demon Card", 'd', Zone::AbandonedMine, 0x045e_a95e, false),
    relic!(22, "Sword Card", 'w', Zone::OlroxQuarters, 0x04aa_3f76, false),
    relic!(23, "Sprite Card", 't', Zone::ReverseEntrance, 0x0509_3adc, false),
    relic!(24, "Nosedevil Card", 'n', Zone::CaveMine, 0x04b6_ab74, false),
    relic!(25, "Heart of Vlad", 'A', Zone::CaveMine, 0x04b6_b946, false),
    relic!(26, "Tooth of Vlad", 'T', Zone::AntiChapel, 0x04d9_b0f2, false),
    relic!(27, "Rib of Vlad", 'R', Zone::DeathWingsLair, 0x050f_8a32, false),
    relic!(28, "Ring of Vlad", 'N', Zone::ReverseClockTower, 0x059b_c2aa, false),
    relic!(29, "Eye of Vlad", 'I', Zone::ReverseCaverns, 0x04da_65f2, false),
    Relic {
        id: 30,
        name: "Gold ring",
        ability: 'G',
        item_id: Some(106),
        extension: None,
        progression: true,
        zone: Some(Zone::UndergroundCaverns),
        address: 0x04c3_4cb4,
    },
    Relic {
        id: 31,
        name: "Silver ring",
        ability: 'S',
        item_id: Some(107),
        extension: None,
        progression: true,
        zone: Some(Zone::RoyalChapel),
        address: 0x0567_a0f8,
    },
    Relic {
        id: 32,
        name: "Spike Breaker",
        ability: 'K',
        item_id: Some(109),
        extension: None,
        progression: true,
        zone: Some(Zone::Catacombs),
        address: 0x04b6_7d9c,
    },
    Relic {
        id: 33,
        name: "Holy glasses",
        ability: 'H',
        item_id: Some(108),
        extension: None,
        progression: true,
        zone: Some(Zone::Center),
        address: 0x0456_e3a8,
    },
    Relic {
        id: 34,
        name: "Thrust sword",
        ability: THRUST_SWORD,
        item_id: Some(62),
        extension: Some(Extension::Equipment),
        progression: true,
        zone: None,
        address: 0,
    },
];

macro_rules! location {
    ($name:expr, $ext:ident, $zone:ident, $address:expr) => {
        ExtensionLocation {
            name: $name,
            extension: Extension::$ext,
            zone: Zone::$zone,
            address: $address,
        }
    };
}

pub(crate) const EXTENSION_LOCATIONS: &[ExtensionLocation] = &[
    location!("Crystal cloak", Guarded, AlchemyLab, 0x049d_6d30),
    location!("Mormegil", Guarded, CaveMine, 0x04b6_b9b4),
    location!("Dark Blade", Guarded, ReverseCaverns, 0x04da_6714),
    location!("Ring of Arcana", Guarded, ReverseColosseum, 0x04d1_5b44),
    location!("Trio", Guarded, DeathWingsLair, 0x050f_8ad4),
    location!("Holy mail", Guarded, UndergroundCaverns, 0x04c3_5174),
    location!("Jewel sword", Guarded, UndergroundCaverns, 0x04c3_4fd2),
    location!("Basilard", Guarded, NecromancyLab, 0x054f_0e12),
    location!("Sunglasses", Guarded, Colosseum, 0x043c_5d26),
    location!("Cloth cape", Guarded, OlroxQuarters, 0x04aa_4400),
    location!("Mystic pendant", Guarded, ForbiddenLibrary, 0x04ee_2218),
    location!("Ankh of Life", Guarded, ReverseClockTower, 0x059b_c6f8),
    location!("Forbidden Library Opal", Spread, ForbiddenLibrary, 0x04ee_2306),
    location!("Reverse Caverns Diamond", Spread, ReverseCaverns, 0x04da_6a84),
    location!("Reverse Caverns Opal", Spread, ReverseCaverns, 0x04da_6aa2),
    location!("Reverse Caverns Garnet", Spread, ReverseCaverns, 0x04da_6ac0),
    location!("Osafune katana", Spread, ReverseEntrance, 0x0509_3b7a),
    location!("Alucard shield", Spread, Center, 0x0456_e49c),
    location!("Platinum mail", Equipment, ReverseKeep, 0x0612_8fa8),
    location!("Gold plate", Equipment, RoyalChapel, 0x0567_a1a4),
    location!("Morningstar", Equipment, ReverseKeep, 0x0612_903a),
    location!("Goggles", Equipment, Catacombs, 0x04b6_7e2a),
    location!("Silver plate", Equipment, FloatingCatacombs, 0x04cf_a1f6),
    location!("Bekatowa", Equipment, NecromancyLab, 0x054f_0f08),
    location!("Telescope", Tourist, Entrance, 0x0461_70a8),
    location!("Cutlass", Tourist, Catacombs, 0x04b6_7f10),
    location!("Falchion", Tourist, ReverseEntrance, 0x0509_3c4e),
    location!("Holy rod", Tourist, ReverseClockTower, 0x059b_c8a2),
    location!("Jewel knuckles", Tourist, MarbleGallery, 0x048f_d3a0),
    location!("Bronze cuirass", Tourist, ReverseEntrance, 0x0509_3d12),
    location!("Library Onyx", Wanderer, LongLibrary, 0x047a_5a9e),
    location!("Bandanna", Wanderer, UndergroundCaverns, 0x04c3_52f0),
    location!("Secret boots", Wanderer, OlroxQuarters, 0x04aa_45b8),
    location!("Nunchaku", Wanderer, Entrance, 0x0461_7156),
];
