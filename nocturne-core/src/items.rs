use crate::constants::{ItemType, TileKind, Zone};

/// A placement site for an item inside a zone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tile {
    pub zone: Zone,
    pub kind: TileKind,
}

#[derive(Debug)]
pub struct Item {
    pub id: u16,
    pub name: &'static str,
    pub kind: ItemType,
    pub tiles: &'static [Tile],
    pub progression: bool,
}

impl Item {
    /// Tiles of this item inside `zone`, in declaration order.
    pub fn tiles_in(&self, zone: Zone) -> impl Iterator<Item = &'static Tile> + '_ {
        self.tiles.iter().filter(move |tile| tile.zone == zone)
    }
}

const fn floor(zone: Zone) -> Tile {
    Tile { zone, kind: TileKind::Floor }
}

const fn candle(zone: Zone) -> Tile {
    Tile { zone, kind: TileKind::Candle }
}

const fn breakable(zone: Zone) -> Tile {
    Tile { zone, kind: TileKind::Breakable }
}

const fn shop(zone: Zone) -> Tile {
    Tile { zone, kind: TileKind::Shop }
}

const fn reward(zone: Zone) -> Tile {
    Tile { zone, kind: TileKind::Reward }
}

pub(crate) const ITEMS: &[Item] = &[
    Item {
        id: 0,
        name: "Heart",
        kind: ItemType::Heart,
        tiles: &[
            candle(Zone::Entrance),
            candle(Zone::Entrance),
            candle(Zone::AlchemyLab),
            candle(Zone::MarbleGallery),
            candle(Zone::OuterWall),
            candle(Zone::LongLibrary),
            candle(Zone::ClockTower),
            candle(Zone::ReverseEntrance),
            candle(Zone::ReverseKeep),
        ],
        progression: false,
    },
    Item {
        id: 1,
        name: "Big heart",
        kind: ItemType::Heart,
        tiles: &[candle(Zone::Colosseum), candle(Zone::CastleKeep), candle(Zone::AntiChapel)],
        progression: false,
    },
    Item {
        id: 2,
        name: "$1",
        kind: ItemType::Gold,
        tiles: &[candle(Zone::Entrance), candle(Zone::Catacombs)],
        progression: false,
    },
    Item {
        id: 3,
        name: "$25",
        kind: ItemType::Gold,
        tiles: &[candle(Zone::AlchemyLab), candle(Zone::OuterWall), candle(Zone::RoyalChapel)],
        progression: false,
    },
    Item {
        id: 4,
        name: "$50",
        kind: ItemType::Gold,
        tiles: &[candle(Zone::OlroxQuarters), candle(Zone::AbandonedMine)],
        progression: false,
    },
    Item {
        id: 5,
        name: "$100",
        kind: ItemType::Gold,
        tiles: &[floor(Zone::UndergroundCaverns), candle(Zone::ReverseOuterWall)],
        progression: false,
    },
    Item {
        id: 6,
        name: "$250",
        kind: ItemType::Gold,
        tiles: &[floor(Zone::MarbleGallery), floor(Zone::ReverseColosseum)],
        progression: false,
    },
    Item {
        id: 7,
        name: "$400",
        kind: ItemType::Gold,
        tiles: &[floor(Zone::ClockTower), floor(Zone::FloatingCatacombs)],
        progression: false,
    },
    Item {
        id: 8,
        name: "$1000",
        kind: ItemType::Gold,
        tiles: &[floor(Zone::CaveMine), floor(Zone::DeathWingsLair)],
        progression: false,
    },
    Item {
        id: 9,
        name: "$2000",
        kind: ItemType::Gold,
        tiles: &[floor(Zone::ReverseCaverns)],
        progression: false,
    },
    Item {
        id: 10,
        name: "Dagger",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::Entrance), candle(Zone::MarbleGallery)],
        progression: false,
    },
    Item {
        id: 11,
        name: "Axe",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::AlchemyLab), candle(Zone::OuterWall)],
        progression: false,
    },
    Item {
        id: 12,
        name: "Holy water",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::Entrance), candle(Zone::LongLibrary)],
        progression: false,
    },
    Item {
        id: 13,
        name: "Cross",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::RoyalChapel), candle(Zone::ReverseKeep)],
        progression: false,
    },
    Item {
        id: 14,
        name: "Bible",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::LongLibrary), candle(Zone::ForbiddenLibrary)],
        progression: false,
    },
    Item {
        id: 15,
        name: "Stopwatch",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::ClockTower)],
        progression: false,
    },
    Item {
        id: 16,
        name: "Rebound Stone",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::OuterWall), candle(Zone::Catacombs)],
        progression: false,
    },
    Item {
        id: 17,
        name: "Vibhuti",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::AbandonedMine)],
        progression: false,
    },
    Item {
        id: 18,
        name: "Agunea",
        kind: ItemType::Subweapon,
        tiles: &[candle(Zone::UndergroundCaverns)],
        progression: false,
    },
    Item {
        id: 19,
        name: "Life Vessel",
        kind: ItemType::Powerup,
        tiles: &[
            floor(Zone::Entrance),
            floor(Zone::MarbleGallery),
            floor(Zone::MarbleGallery),
            floor(Zone::OuterWall),
            floor(Zone::CastleKeep),
            floor(Zone::ReverseCaverns),
        ],
        progression: false,
    },
    Item {
        id: 20,
        name: "Heart Vessel",
        kind: ItemType::Powerup,
        tiles: &[
            floor(Zone::AlchemyLab),
            floor(Zone::OlroxQuarters),
            floor(Zone::ClockTower),
            floor(Zone::RoyalChapel),
            floor(Zone::BlackMarbleGallery),
        ],
        progression: false,
    },
    Item {
        id: 21,
        name: "Potion",
        kind: ItemType::Usable,
        tiles: &[reward(Zone::Prologue), floor(Zone::Entrance), floor(Zone::AlchemyLab)],
        progression: false,
    },
    Item {
        id: 22,
        name: "High potion",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::OlroxQuarters), floor(Zone::ReverseKeep)],
        progression: false,
    },
    Item {
        id: 23,
        name: "Elixir",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::FloatingCatacombs)],
        progression: false,
    },
    Item {
        id: 24,
        name: "Manna prism",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::Colosseum), floor(Zone::NecromancyLab)],
        progression: false,
    },
    Item {
        id: 25,
        name: "Heart Refresh",
        kind: ItemType::Usable,
        tiles: &[reward(Zone::Prologue), floor(Zone::AbandonedMine)],
        progression: false,
    },
    Item {
        id: 26,
        name: "Antivenom",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::UndergroundCaverns), floor(Zone::ReverseEntrance)],
        progression: false,
    },
    Item {
        id: 27,
        name: "Uncurse",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::Catacombs)],
        progression: false,
    },
    Item {
        id: 28,
        name: "Neutron bomb",
        kind: ItemType::Usable,
        tiles: &[reward(Zone::Prologue), floor(Zone::ReverseCenter)],
        progression: false,
    },
    Item {
        id: 29,
        name: "Power of Sire",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::ReverseOuterWall)],
        progression: false,
    },
    Item {
        id: 30,
        name: "Buffalo star",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::ReverseClockTower)],
        progression: false,
    },
    Item {
        id: 31,
        name: "Turkey",
        kind: ItemType::Usable,
        tiles: &[breakable(Zone::OuterWall), breakable(Zone::ReverseOuterWall)],
        progression: false,
    },
    Item {
        id: 32,
        name: "TNT",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::AbandonedMine)],
        progression: false,
    },
    Item {
        id: 33,
        name: "Library card",
        kind: ItemType::Usable,
        tiles: &[shop(Zone::LongLibrary), floor(Zone::Colosseum), floor(Zone::ForbiddenLibrary)],
        progression: false,
    },
    Item {
        id: 34,
        name: "Meal ticket",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::MarbleGallery), floor(Zone::BlackMarbleGallery)],
        progression: false,
    },
    Item {
        id: 35,
        name: "Peanuts",
        kind: ItemType::Usable,
        tiles: &[breakable(Zone::ClockTower), breakable(Zone::ReverseClockTower)],
        progression: false,
    },
    Item {
        id: 36,
        name: "Hamburger",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::RoyalChapel)],
        progression: false,
    },
    Item {
        id: 37,
        name: "Green tea",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::Colosseum)],
        progression: false,
    },
    Item {
        id: 38,
        name: "Karma coin",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::AbandonedMine), floor(Zone::CaveMine)],
        progression: false,
    },
    Item {
        id: 39,
        name: "Boomerang",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::AntiChapel)],
        progression: false,
    },
    Item {
        id: 40,
        name: "Life apple",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::CaveMine)],
        progression: false,
    },
    Item {
        id: 41,
        name: "Telescope",
        kind: ItemType::Usable,
        tiles: &[floor(Zone::Entrance)],
        progression: false,
    },
    Item {
        id: 42,
        name: "Short sword",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::Entrance)],
        progression: false,
    },
    Item {
        id: 43,
        name: "Cutlass",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::Catacombs)],
        progression: false,
    },
    Item {
        id: 44,
        name: "Falchion",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::ReverseEntrance)],
        progression: false,
    },
    Item {
        id: 45,
        name: "Gladius",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::OuterWall)],
        progression: false,
    },
    Item {
        id: 46,
        name: "Jewel knuckles",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::MarbleGallery)],
        progression: false,
    },
    Item {
        id: 47,
        name: "Knuckle duster",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::AlchemyLab)],
        progression: false,
    },
    Item {
        id: 48,
        name: "Morningstar",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::ReverseKeep)],
        progression: false,
    },
    Item {
        id: 49,
        name: "Holy rod",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::ReverseClockTower)],
        progression: false,
    },
    Item {
        id: 50,
        name: "Mormegil",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::CaveMine)],
        progression: false,
    },
    Item {
        id: 51,
        name: "Dark Blade",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::ReverseCaverns)],
        progression: false,
    },
    Item {
        id: 52,
        name: "Osafune katana",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::ReverseEntrance)],
        progression: false,
    },
    Item {
        id: 53,
        name: "Crissaegrim",
        kind: ItemType::Weapon1,
        tiles: &[],
        progression: false,
    },
    Item {
        id: 54,
        name: "Alucard sword",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::Center)],
        progression: false,
    },
    Item {
        id: 55,
        name: "Basilard",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::NecromancyLab)],
        progression: false,
    },
    Item {
        id: 56,
        name: "Jewel sword",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::UndergroundCaverns)],
        progression: false,
    },
    Item {
        id: 57,
        name: "Nunchaku",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::Entrance)],
        progression: false,
    },
    Item {
        id: 58,
        name: "Bekatowa",
        kind: ItemType::Weapon1,
        tiles: &[floor(Zone::NecromancyLab)],
        progression: false,
    },
    Item {
        id: 59,
        name: "Marsil",
        kind: ItemType::Weapon1,
        tiles: &[],
        progression: false,
    },
    Item {
        id: 60,
        name: "Claymore",
        kind: ItemType::Weapon2,
        tiles: &[floor(Zone::OuterWall)],
        progression: false,
    },
    Item {
        id: 61,
        name: "Zweihander",
        kind: ItemType::Weapon2,
        tiles: &[floor(Zone::RoyalChapel)],
        progression: false,
    },
    Item {
        id: 62,
        name: "Estoc",
        kind: ItemType::Weapon2,
        tiles: &[floor(Zone::ClockTower)],
        progression: false,
    },
    Item {
        id: 63,
        name: "Obsidian sword",
        kind: ItemType::Weapon2,
        tiles: &[floor(Zone::ReverseCaverns)],
        progression: false,
    },
    Item {
        id: 64,
        name: "Leather shield",
        kind: ItemType::Shield,
        tiles: &[floor(Zone::Entrance)],
        progression: false,
    },
    Item {
        id: 65,
        name: "Iron shield",
        kind: ItemType::Shield,
        tiles: &[floor(Zone::ReverseOuterWall)],
        progression: false,
    },
    Item {
        id: 66,
        name: "Fire shield",
        kind: ItemType::Shield,
        tiles: &[floor(Zone::CastleKeep)],
        progression: false,
    },
    Item {
        id: 67,
        name: "Dark shield",
        kind: ItemType::Shield,
        tiles: &[floor(Zone::AntiChapel)],
        progression: false,
    },
    Item {
        id: 68,
        name: "Alucard shield",
        kind: ItemType::Shield,
        tiles: &[floor(Zone::Center)],
        progression: false,
    },
    Item {
        id: 69,
        name: "Medusa shield",
        kind: ItemType::Shield,
        tiles: &[floor(Zone::DeathWingsLair)],
        progression: false,
    },
    Item {
        id: 70,
        name: "Velvet hat",
        kind: ItemType::Helmet,
        tiles: &[floor(Zone::RoyalChapel)],
        progression: false,
    },
    Item {
        id: 71,
        name: "Sunglasses",
        kind: ItemType::Helmet,
        tiles: &[floor(Zone::Colosseum)],
        progression: false,
    },
    Item {
        id: 72,
        name: "Goggles",
        kind: ItemType::Helmet,
        tiles: &[floor(Zone::Catacombs)],
        progression: false,
    },
    Item {
        id: 73,
        name: "Dragon helm",
        kind: ItemType::Helmet,
        tiles: &[floor(Zone::ReverseKeep)],
        progression: false,
    },
    Item {
        id: 74,
        name: "Bandanna",
        kind: ItemType::Helmet,
        tiles: &[floor(Zone::UndergroundCaverns)],
        progression: false,
    },
    Item {
        id: 75,
        name: "Circlet",
        kind: ItemType::Helmet,
        tiles: &[floor(Zone::ForbiddenLibrary)],
        progression: false,
    },
    Item {
        id: 76,
        name: "Cloth tunic",
        kind: ItemType::Armor,
        tiles: &[],
        progression: false,
    },
    Item {
        id: 77,
        name: "Hide cuirass",
        kind: ItemType::Armor,
        tiles: &[floor(Zone::AlchemyLab)],
        progression: false,
    },
    Item {
        id: 78,
        name: "Bronze cuirass",
        kind: ItemType::Armor,
        tiles: &[floor(Zone::ReverseEntrance)],
        progression: false,
    },
    Item {
        id: 79,
        name: "Silver plate",
        kind: ItemType::Armor,
        tiles: &[floor(Zone::FloatingCatacombs)],
        progression: false,
    },
    Item {
        id: 80,
        name: "Gold plate",
        kind: ItemType::Armor,
        tiles: &[floor(Zone::RoyalChapel)],
        progression: false,
    },
    Item {
        id: 81,
        name: "Platinum mail",
        kind: ItemType::Armor,
        tiles: &[floor(Zone::ReverseKeep)],
        progression: false,
    },
    Item {
        id: 82,
        name: "Holy mail",
        kind: ItemType::Armor,
        tiles: &[floor(Zone::UndergroundCaverns)],
        progression: false,
    },
    Item {
        id: 83,
        name: "Alucard mail",
        kind: ItemType::Armor,
        tiles: &[floor(Zone::Center)],
        progression: false,
    },
    Item {
        id: 84,
        name: "Axe Lord armor",
        kind: ItemType::Armor,
        tiles: &[],
        progression: false,
    },
    Item {
        id: 85,
        name: "Cloth cape",
        kind: ItemType::Cloak,
        tiles: &[floor(Zone::OlroxQuarters)],
        progression: false,
    },
    Item {
        id: 86,
        name: "Reverse cloak",
        kind: ItemType::Cloak,
        tiles: &[floor(Zone::OuterWall)],
        progression: false,
    },
    Item {
        id: 87,
        name: "Crystal cloak",
        kind: ItemType::Cloak,
        tiles: &[floor(Zone::AlchemyLab)],
        progression: false,
    },
    Item {
        id: 88,
        name: "Twilight cloak",
        kind: ItemType::Cloak,
        tiles: &[floor(Zone::ReverseCenter)],
        progression: false,
    },
    Item {
        id: 89,
        name: "Royal cloak",
        kind: ItemType::Cloak,
        tiles: &[floor(Zone::ReverseColosseum)],
        progression: false,
    },
    Item {
        id: 90,
        name: "Zircon",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::Catacombs), floor(Zone::ReverseColosseum)],
        progression: false,
    },
    Item {
        id: 91,
        name: "Aquamarine",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::UndergroundCaverns)],
        progression: false,
    },
    Item {
        id: 92,
        name: "Turquoise",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::OlroxQuarters)],
        progression: false,
    },
    Item {
        id: 93,
        name: "Onyx",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::LongLibrary), floor(Zone::ForbiddenLibrary)],
        progression: false,
    },
    Item {
        id: 94,
        name: "Garnet",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::ReverseCaverns), floor(Zone::AbandonedMine)],
        progression: false,
    },
    Item {
        id: 95,
        name: "Opal",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::ForbiddenLibrary), floor(Zone::ReverseCaverns)],
        progression: false,
    },
    Item {
        id: 96,
        name: "Diamond",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::ReverseCaverns), floor(Zone::Colosseum)],
        progression: false,
    },
    Item {
        id: 97,
        name: "Lapis lazuli",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::ClockTower)],
        progression: false,
    },
    Item {
        id: 98,
        name: "Medal",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::OuterWall)],
        progression: false,
    },
    Item {
        id: 99,
        name: "Ring of Arcana",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::ReverseColosseum)],
        progression: false,
    },
    Item {
        id: 100,
        name: "Mystic pendant",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::ForbiddenLibrary)],
        progression: false,
    },
    Item {
        id: 101,
        name: "Ankh of Life",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::ReverseClockTower)],
        progression: false,
    },
    Item {
        id: 102,
        name: "Necklace of J",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::FloatingCatacombs)],
        progression: false,
    },
    Item {
        id: 103,
        name: "Secret boots",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::OlroxQuarters)],
        progression: false,
    },
    Item {
        id: 104,
        name: "Duplicator",
        kind: ItemType::Accessory,
        tiles: &[shop(Zone::LongLibrary)],
        progression: false,
    },
    Item {
        id: 105,
        name: "Trio",
        kind: ItemType::Accessory,
        tiles: &[floor(Zone::DeathWingsLair)],
        progression: false,
    },
    Item {
        id: 106,
        name: "Gold ring",
        kind: ItemType::Accessory,
        tiles: &[],
        progression: true,
    },
    Item {
        id: 107,
        name: "Silver ring",
        kind: ItemType::Accessory,
        tiles: &[],
        progression: true,
    },
    Item {
        id: 108,
        name: "Holy glasses",
        kind: ItemType::Accessory,
        tiles: &[],
        progression: true,
    },
    Item {
        id: 109,
        name: "Spike Breaker",
        kind: ItemType::Armor,
        tiles: &[],
        progression: true,
    },
];
