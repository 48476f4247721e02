//! # Game State Module
//!
//! Central game state and the turn driver.
//!
//! [`GameState`] owns the map, the player, the enemy and item roster, and the
//! random number generator that keeps rolling for enemy AI after generation.
//! One call to [`GameState::apply_player_action`] resolves a full turn: the
//! player's action, then every enemy once, then the game-over check.

use crate::{
    compute_damage, ActionResult, BspDungeonGenerator, DelveError, DelveResult, Direction,
    EncounterPlacer, GameEvent, GenerationConfig, GenerationStats, ItemKind, Map,
    PlacementReport, Player, PlayerAction, Position, Roster,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chance that an enemy without sight of the player wanders a step.
const WANDER_CHANCE: f64 = 0.20;

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Total steps taken
    pub steps_taken: u64,
    /// Total damage dealt to enemies
    pub damage_dealt: u64,
    /// Total damage taken from enemies
    pub damage_taken: u64,
    /// Number of enemies defeated
    pub enemies_defeated: u32,
    /// Number of items picked up
    pub items_collected: u32,
    /// Gold pieces found
    pub gold_collected: u64,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerMoved { .. } => {
                self.steps_taken += 1;
            }
            GameEvent::PlayerAttacked { damage, .. } => {
                self.damage_dealt += *damage as u64;
            }
            GameEvent::EnemyDefeated { .. } => {
                self.enemies_defeated += 1;
            }
            GameEvent::PlayerDamaged { damage, .. } => {
                self.damage_taken += *damage as u64;
            }
            GameEvent::ItemPickedUp { item, value } => {
                self.items_collected += 1;
                if *item == ItemKind::Gold {
                    self.gold_collected += *value as u64;
                }
            }
            _ => {}
        }
    }
}

/// Central game state containing all game data.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The current dungeon level
    pub map: Map,
    pub player: Player,
    /// Enemies and items of the level
    pub roster: Roster,
    /// Completed turns
    pub turn_number: u64,
    /// Whether the game is waiting for the player
    pub player_turn: bool,
    pub game_over: bool,
    /// Status-line text from the most recent turn
    pub message: String,
    pub statistics: GameStatistics,
    /// How the level was generated
    pub generation_stats: GenerationStats,
    /// How the level was populated
    pub placement: PlacementReport,
    rng: StdRng,
}

/// Serializable view of a game, used for JSON dumps.
#[derive(Serialize)]
struct GameSnapshot<'a> {
    turn_number: u64,
    game_over: bool,
    message: &'a str,
    player: &'a Player,
    map: &'a Map,
    roster: &'a Roster,
    statistics: &'a GameStatistics,
    generation_stats: &'a GenerationStats,
    placement: &'a PlacementReport,
}

impl GameState {
    /// Generates a level from `config` and starts a new game on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameState, GenerationConfig};
    ///
    /// let game = GameState::new(&GenerationConfig::new(42)).unwrap();
    /// assert_eq!(Some(game.player.position), game.map.player_start());
    /// assert_eq!(game.turn_number, 0);
    /// assert!(game.player_turn);
    /// ```
    pub fn new(config: &GenerationConfig) -> DelveResult<Self> {
        let mut rng = config.rng();
        let (map, generation_stats) =
            BspDungeonGenerator::new().generate_with_stats(config, &mut rng)?;
        let mut state = Self::with_map(map, config, rng)?;
        state.generation_stats = generation_stats;
        Ok(state)
    }

    /// Starts a new game on an existing map, placing the player at the center
    /// of the start room and populating every other room.
    pub fn with_map(map: Map, config: &GenerationConfig, mut rng: StdRng) -> DelveResult<Self> {
        let start = map.player_start().ok_or_else(|| {
            DelveError::InvalidState("Map has no start room for the player".to_string())
        })?;

        let mut roster = Roster::new(config.max_enemies, config.max_items);
        let placement = EncounterPlacer::from_config(config).place(&map.rooms, &mut roster, &mut rng);
        info!(
            "New game: player at {}, {} enemies, {} items",
            start, placement.enemies_spawned, placement.items_spawned
        );

        let mut state = Self::from_parts(map, Player::new(start), roster, rng);
        state.placement = placement;
        Ok(state)
    }

    /// Assembles a game from prepared pieces, without any placement.
    pub fn from_parts(map: Map, player: Player, roster: Roster, rng: StdRng) -> Self {
        Self {
            map,
            player,
            roster,
            turn_number: 0,
            player_turn: true,
            game_over: false,
            message: String::new(),
            statistics: GameStatistics::new(),
            generation_stats: GenerationStats::default(),
            placement: PlacementReport::default(),
            rng,
        }
    }

    /// Resolves one player action and, if it used the turn, the enemy turn.
    ///
    /// Actions are rejected without effect once the game is over.
    pub fn apply_player_action(&mut self, action: PlayerAction) -> ActionResult {
        if self.game_over || !self.player_turn {
            return ActionResult::rejected();
        }

        let (consumed, mut events) = match action {
            PlayerAction::Move(direction) => self.move_player(direction),
            PlayerAction::Pickup => (true, vec![self.pickup_item()]),
            PlayerAction::Wait => (true, vec![GameEvent::Waited]),
        };

        if consumed {
            self.player_turn = false;
            events.extend(self.update_enemies());
            self.player_turn = true;
            self.turn_number += 1;

            let was_over = self.game_over;
            if self.check_game_over() && !was_over {
                events.push(GameEvent::PlayerDied);
            }
        }

        for event in &events {
            self.statistics.update_from_event(event);
        }
        let result = ActionResult { consumed, events };
        if let Some(message) = result.last_message() {
            self.message = message;
        }
        debug!("Turn {}: {:?}", self.turn_number, action);
        result
    }

    /// Moves the player, attacking instead if an active enemy is in the way.
    ///
    /// Returns whether the turn was used and what happened. A move into a
    /// wall or off the grid does not use the turn.
    fn move_player(&mut self, direction: Direction) -> (bool, Vec<GameEvent>) {
        let from = self.player.position;
        let target = from.step(direction);

        if self.roster.enemy_at(target).is_some() {
            return (true, self.attack_at(target));
        }

        if self.map.step(&mut self.player.position, direction) {
            (true, vec![GameEvent::PlayerMoved { from, to: target }])
        } else {
            (false, vec![GameEvent::MoveBlocked { target }])
        }
    }

    /// The player attacks whatever active enemy stands at `target`.
    ///
    /// Returns no events when there is none, so a defeated enemy is never
    /// defeated twice.
    pub fn attack_at(&mut self, target: Position) -> Vec<GameEvent> {
        let Some(index) = self.roster.enemy_at(target) else {
            return Vec::new();
        };

        let enemy = &mut self.roster.enemies[index];
        let damage = compute_damage(self.player.attack, enemy.defense);
        let defeated = enemy.take_damage(damage);

        let mut events = vec![GameEvent::PlayerAttacked {
            enemy: enemy.kind,
            target,
            damage,
        }];
        if defeated {
            debug!("{} at {} defeated", enemy.name(), target);
            events.push(GameEvent::EnemyDefeated {
                enemy: enemy.kind,
                position: target,
            });
        }
        events
    }

    /// Picks up and applies the first active item under the player.
    pub fn pickup_item(&mut self) -> GameEvent {
        let Some(index) = self.roster.item_at(self.player.position) else {
            return GameEvent::NothingToPickUp;
        };

        let item = &mut self.roster.items[index];
        item.active = false;
        let (kind, value) = (item.kind, item.value);

        match kind {
            ItemKind::HealthPotion => {
                self.player.heal(value);
            }
            ItemKind::Weapon => self.player.attack += value,
            ItemKind::Armor => self.player.defense += value,
            ItemKind::Gold => {}
        }

        GameEvent::ItemPickedUp { item: kind, value }
    }

    /// Runs every active enemy once, in roster order.
    ///
    /// An enemy that can see the player within its sight range turns aggro;
    /// adjacent it attacks, otherwise it steps toward the player. Enemies
    /// without sight of the player sometimes wander.
    pub fn update_enemies(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for index in 0..self.roster.enemies.len() {
            let enemy = &self.roster.enemies[index];
            if !enemy.active {
                continue;
            }

            let (kind, pos) = (enemy.kind, enemy.position);
            let target = self.player.position;
            let distance = pos.manhattan_distance(target);

            if distance <= enemy.sight_range && self.map.is_visible(pos, target) {
                if !enemy.aggro {
                    events.push(GameEvent::EnemyAggroed {
                        enemy: kind,
                        position: pos,
                    });
                }
                self.roster.enemies[index].aggro = true;

                if distance == 1 {
                    let damage = compute_damage(self.roster.enemies[index].attack, self.player.defense);
                    self.player.take_damage(damage);
                    events.push(GameEvent::PlayerDamaged {
                        enemy: kind,
                        damage,
                    });
                } else if distance > 1 {
                    let dx = (target.x - pos.x).signum();
                    let dy = (target.y - pos.y).signum();
                    let steps = if self.rng.gen_bool(0.5) {
                        [(dx, 0), (0, dy)]
                    } else {
                        [(0, dy), (dx, 0)]
                    };
                    for (sx, sy) in steps {
                        if sx == 0 && sy == 0 {
                            continue;
                        }
                        if let Some(event) = self.try_enemy_step(index, sx, sy) {
                            events.push(event);
                            break;
                        }
                    }
                }
            } else if self.rng.gen_bool(WANDER_CHANCE) {
                let direction = Direction::all()[self.rng.gen_range(0..4)];
                let delta = direction.to_delta();
                events.extend(self.try_enemy_step(index, delta.x, delta.y));
            }
        }

        events
    }

    /// Moves enemy `index` by one tile if the destination is walkable and
    /// free of the player and other active enemies.
    fn try_enemy_step(&mut self, index: usize, dx: i32, dy: i32) -> Option<GameEvent> {
        let from = self.roster.enemies[index].position;
        let mut to = from;
        if !self.map.move_entity(&mut to, dx, dy) {
            return None;
        }
        if to == self.player.position || self.roster.enemy_at(to).is_some() {
            return None;
        }

        let enemy = &mut self.roster.enemies[index];
        enemy.position = to;
        Some(GameEvent::EnemyMoved {
            enemy: enemy.kind,
            from,
            to,
        })
    }

    /// Sets the game-over flag and message once the player's health is gone.
    ///
    /// Returns whether the game is over.
    pub fn check_game_over(&mut self) -> bool {
        if !self.game_over && !self.player.is_alive() {
            info!("Player defeated on turn {}", self.turn_number);
            self.game_over = true;
            if let Some(message) = GameEvent::PlayerDied.message() {
                self.message = message;
            }
        }
        self.game_over
    }

    /// Serializes the level, player, roster and statistics to JSON.
    pub fn to_json(&self) -> DelveResult<String> {
        let snapshot = GameSnapshot {
            turn_number: self.turn_number,
            game_over: self.game_over,
            message: &self.message,
            player: &self.player,
            map: &self.map,
            roster: &self.roster,
            statistics: &self.statistics,
            generation_stats: &self.generation_stats,
            placement: &self.placement,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}
