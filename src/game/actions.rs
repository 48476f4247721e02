//! # Actions and Events
//!
//! Player actions fed into the turn driver and the events a turn produces.

use crate::{Direction, EnemyKind, ItemKind, Position};
use serde::{Deserialize, Serialize};

/// Something the player can do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Step one tile, or attack an enemy standing there
    Move(Direction),
    /// Pick up the item under the player
    Pickup,
    /// Let the turn pass
    Wait,
}

/// Something that happened while a turn was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player stepped onto a new tile
    PlayerMoved { from: Position, to: Position },
    /// The player's move was stopped by a wall or the grid edge
    MoveBlocked { target: Position },
    /// The player hit an enemy
    PlayerAttacked {
        enemy: EnemyKind,
        target: Position,
        damage: i32,
    },
    /// An enemy went down
    EnemyDefeated { enemy: EnemyKind, position: Position },
    /// An enemy spotted the player
    EnemyAggroed { enemy: EnemyKind, position: Position },
    /// An enemy moved one tile
    EnemyMoved {
        enemy: EnemyKind,
        from: Position,
        to: Position,
    },
    /// An adjacent enemy hit the player
    PlayerDamaged { enemy: EnemyKind, damage: i32 },
    /// The player used up an item
    ItemPickedUp { item: ItemKind, value: i32 },
    /// Pickup was attempted on a bare tile
    NothingToPickUp,
    /// The player waited
    Waited,
    /// The player's health reached zero
    PlayerDied,
}

impl GameEvent {
    /// Status-line text for this event, if it has any.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{EnemyKind, GameEvent, Position};
    ///
    /// let event = GameEvent::EnemyDefeated {
    ///     enemy: EnemyKind::Orc,
    ///     position: Position::new(3, 4),
    /// };
    /// assert_eq!(event.message().as_deref(), Some("You defeated the Orc!"));
    /// assert_eq!(GameEvent::Waited.message(), None);
    /// ```
    pub fn message(&self) -> Option<String> {
        let text = match self {
            GameEvent::PlayerAttacked { enemy, damage, .. } => {
                format!("You hit {} for {} damage!", enemy.name(), damage)
            }
            GameEvent::EnemyDefeated { enemy, .. } => format!("You defeated the {}!", enemy.name()),
            GameEvent::PlayerDamaged { enemy, damage } => {
                format!("{} attacks you for {} damage!", enemy.name(), damage)
            }
            GameEvent::ItemPickedUp { item, value } => match item {
                ItemKind::HealthPotion => {
                    format!("You drink a health potion and recover {value} HP!")
                }
                ItemKind::Weapon => format!("You equip a better weapon! Attack +{value}"),
                ItemKind::Armor => format!("You equip better armor! Defense +{value}"),
                ItemKind::Gold => format!("You found {value} gold pieces!"),
            },
            GameEvent::NothingToPickUp => "There's nothing here to pick up.".to_string(),
            GameEvent::PlayerDied => "Game Over! You were defeated!".to_string(),
            GameEvent::PlayerMoved { .. }
            | GameEvent::MoveBlocked { .. }
            | GameEvent::EnemyAggroed { .. }
            | GameEvent::EnemyMoved { .. }
            | GameEvent::Waited => return None,
        };
        Some(text)
    }
}

/// Outcome of one call to the turn driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action used up the player's turn
    pub consumed: bool,
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
}

impl ActionResult {
    /// An action that changed nothing and did not use the turn.
    pub fn rejected() -> Self {
        Self::default()
    }

    /// The message of the last event that has one.
    pub fn last_message(&self) -> Option<String> {
        self.events.iter().rev().find_map(GameEvent::message)
    }
}
