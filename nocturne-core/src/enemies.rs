#[derive(Debug)]
pub struct Enemy {
    pub id: u16,
    pub name: &'static str,
    pub level: u8,
}

pub(crate) const ENEMIES: &[Enemy] = &[
    Enemy { id: 1, name: "Zombie", level: 1 },
    Enemy { id: 2, name: "Bat", level: 1 },
    Enemy { id: 3, name: "Warg", level: 2 },
    Enemy { id: 4, name: "Merman", level: 2 },
    Enemy { id: 5, name: "Skeleton", level: 1 },
    Enemy { id: 6, name: "Bloody Zombie", level: 3 },
    Enemy { id: 7, name: "Axe Knight", level: 3 },
    Enemy { id: 8, name: "Spittle Bone", level: 4 },
    Enemy { id: 9, name: "Slinger", level: 4 },
    Enemy { id: 10, name: "Bone Scimitar", level: 2 },
    Enemy { id: 11, name: "Blood Skeleton", level: 4 },
    Enemy { id: 12, name: "Diplocephalus", level: 12 },
    Enemy { id: 13, name: "Skeleton Ape", level: 5 },
    Enemy { id: 14, name: "Gremlin", level: 20 },
    Enemy { id: 15, name: "Ghost", level: 4 },
    Enemy { id: 16, name: "Corner Guard", level: 12 },
    Enemy { id: 17, name: "Thornweed", level: 1 },
    Enemy { id: 18, name: "Ouija Table", level: 7 },
    Enemy { id: 19, name: "Spellbook", level: 10 },
    Enemy { id: 20, name: "Flea Man", level: 12 },
    Enemy { id: 21, name: "Sword Lord", level: 22 },
    Enemy { id: 22, name: "Medusa Head", level: 12 },
    Enemy { id: 23, name: "Harpy", level: 11 },
    Enemy { id: 24, name: "Killer Fish", level: 4 },
    Enemy { id: 25, name: "Frog", level: 2 },
    Enemy { id: 26, name: "Toad", level: 2 },
    Enemy { id: 27, name: "Bone Scimitar", level: 14 },
    Enemy { id: 28, name: "Skeleton", level: 26 },
    Enemy { id: 29, name: "Medusa Head", level: 23 },
    Enemy { id: 30, name: "Ghost Dancer", level: 35 },
    Enemy { id: 31, name: "Werewolf", level: 23 },
    Enemy { id: 32, name: "Imp", level: 41 },
    Enemy { id: 33, name: "Dodo Bird", level: 36 },
    Enemy { id: 34, name: "Tombstone", level: 37 },
    Enemy { id: 35, name: "Nova Skeleton", level: 40 },
    Enemy { id: 36, name: "Blade Master", level: 38 },
];
