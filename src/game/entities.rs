//! # Entities
//!
//! Player, enemy and item records, their stat blocks, and the roster that
//! holds enemies and items with fixed capacities.

use crate::{config, Position};
use serde::{Deserialize, Serialize};

/// Damage dealt by an attack: attack minus defense, never less than 1.
///
/// # Examples
///
/// ```
/// use delve::compute_damage;
///
/// assert_eq!(compute_damage(10, 3), 7);
/// assert_eq!(compute_damage(3, 10), 1);
/// ```
pub fn compute_damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(1)
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
}

impl Player {
    /// Creates a player with the default starting stats.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            health: config::DEFAULT_PLAYER_HEALTH,
            max_health: config::DEFAULT_PLAYER_HEALTH,
            attack: config::DEFAULT_PLAYER_ATTACK,
            defense: config::DEFAULT_PLAYER_DEFENSE,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Restores up to `amount` health without exceeding the maximum.
    ///
    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.health -= damage;
    }
}

/// Kinds of enemies that can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Rat,
    Goblin,
    Orc,
    Troll,
}

/// Immutable stat block for an enemy kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStats {
    pub name: &'static str,
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
    pub sight_range: u32,
    pub glyph: char,
}

const RAT: EnemyStats = EnemyStats {
    name: "Rat",
    health: 10,
    attack: 3,
    defense: 1,
    sight_range: 4,
    glyph: 'r',
};

const GOBLIN: EnemyStats = EnemyStats {
    name: "Goblin",
    health: 15,
    attack: 5,
    defense: 2,
    sight_range: 5,
    glyph: 'g',
};

const ORC: EnemyStats = EnemyStats {
    name: "Orc",
    health: 25,
    attack: 8,
    defense: 3,
    sight_range: 6,
    glyph: 'o',
};

const TROLL: EnemyStats = EnemyStats {
    name: "Troll",
    health: 40,
    attack: 12,
    defense: 5,
    sight_range: 4,
    glyph: 'T',
};

impl EnemyKind {
    pub fn stats(self) -> &'static EnemyStats {
        match self {
            EnemyKind::Rat => &RAT,
            EnemyKind::Goblin => &GOBLIN,
            EnemyKind::Orc => &ORC,
            EnemyKind::Troll => &TROLL,
        }
    }

    pub fn name(self) -> &'static str {
        self.stats().name
    }
}

/// A spawned enemy. Inactive enemies stay in their roster slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub position: Position,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    pub sight_range: u32,
    pub active: bool,
    /// Set once the enemy has spotted the player
    pub aggro: bool,
}

impl Enemy {
    /// Creates an active enemy with the stat block of `kind`.
    pub fn new(kind: EnemyKind, position: Position) -> Self {
        let stats = kind.stats();
        Self {
            position,
            kind,
            health: stats.health,
            max_health: stats.health,
            attack: stats.attack,
            defense: stats.defense,
            sight_range: stats.sight_range,
            active: true,
            aggro: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Applies damage and returns true only on the hit that defeats the enemy.
    ///
    /// Damage to an inactive enemy is ignored.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if !self.active {
            return false;
        }
        self.health -= damage;
        if self.health <= 0 {
            self.active = false;
            return true;
        }
        false
    }
}

/// Kinds of items that can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    HealthPotion,
    Weapon,
    Armor,
    Gold,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::HealthPotion => "Health Potion",
            ItemKind::Weapon => "Sword",
            ItemKind::Armor => "Armor",
            ItemKind::Gold => "Gold",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            ItemKind::HealthPotion => '!',
            ItemKind::Weapon => ')',
            ItemKind::Armor => '[',
            ItemKind::Gold => '$',
        }
    }
}

/// A spawned item. Picked-up items stay in their roster slot, inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub position: Position,
    pub kind: ItemKind,
    /// Healing, attack bonus, defense bonus or gold amount depending on kind
    pub value: i32,
    pub active: bool,
}

impl Item {
    pub fn new(kind: ItemKind, position: Position, value: i32) -> Self {
        Self {
            position,
            kind,
            value,
            active: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Enemies and items of a level, each held in a capacity-bounded list.
///
/// Spawns past capacity are silently dropped; the spawn methods report
/// whether the entity was kept. Slots are never compacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    max_enemies: usize,
    max_items: usize,
}

impl Roster {
    pub fn new(max_enemies: usize, max_items: usize) -> Self {
        Self {
            enemies: Vec::with_capacity(max_enemies),
            items: Vec::with_capacity(max_items),
            max_enemies,
            max_items,
        }
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Position) -> bool {
        if self.enemies.len() >= self.max_enemies {
            return false;
        }
        self.enemies.push(Enemy::new(kind, position));
        true
    }

    pub fn spawn_item(&mut self, kind: ItemKind, position: Position, value: i32) -> bool {
        if self.items.len() >= self.max_items {
            return false;
        }
        self.items.push(Item::new(kind, position, value));
        true
    }

    /// Slot index of the active enemy standing at `pos`.
    pub fn enemy_at(&self, pos: Position) -> Option<usize> {
        self.enemies
            .iter()
            .position(|enemy| enemy.active && enemy.position == pos)
    }

    /// Slot index of the first active item lying at `pos`.
    pub fn item_at(&self, pos: Position) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.active && item.position == pos)
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|enemy| enemy.active)
    }

    pub fn active_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.active)
    }
}
