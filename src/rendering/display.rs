//! # Display Management
//!
//! Text rendering of the map and the entities on it.

use crate::{GameState, Map, Position};

/// Renders maps and game states as plain ASCII text.
///
/// The renderer only reads game data. It keeps a message history; when the
/// history is non-empty the last `log_lines` entries are drawn under the
/// status line, otherwise the game's current message is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiRenderer {
    /// Whether to print the player's stats under the map
    pub show_status: bool,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// How many of the most recent messages `render` draws
    pub log_lines: usize,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiRenderer {
    /// Creates a renderer with the status line enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{AsciiRenderer, Map, Position, TileType};
    ///
    /// let mut map = Map::new(3, 1, 1);
    /// map.tiles.set(Position::new(1, 0), TileType::Floor);
    /// assert_eq!(AsciiRenderer::new().render_map(&map), " . ");
    /// ```
    pub fn new() -> Self {
        Self {
            show_status: true,
            messages: Vec::new(),
            max_messages: 100,
            log_lines: 3,
        }
    }

    /// Draws the tiles of `map`, one text line per row.
    pub fn render_map(&self, map: &Map) -> String {
        Self::glyph_rows(map)
            .iter()
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Draws the map with items, enemies and the player on top, followed by
    /// the status line and the message log.
    pub fn render(&self, game_state: &GameState) -> String {
        let mut rows = Self::glyph_rows(&game_state.map);

        for item in game_state.roster.active_items() {
            Self::plot(&mut rows, item.position, item.kind.glyph());
        }
        for enemy in game_state.roster.active_enemies() {
            Self::plot(&mut rows, enemy.position, enemy.kind.stats().glyph);
        }
        Self::plot(&mut rows, game_state.player.position, '@');

        let mut lines: Vec<String> = rows.iter().map(|row| row.iter().collect()).collect();
        if self.show_status {
            lines.push(Self::status_line(game_state));
        }
        if self.messages.is_empty() {
            if !game_state.message.is_empty() {
                lines.push(game_state.message.clone());
            }
        } else {
            lines.extend(self.recent_messages(self.log_lines).iter().cloned());
        }
        lines.join("\n")
    }

    /// Player health, attack, defense, turn and gold on one line.
    pub fn status_line(game_state: &GameState) -> String {
        let player = &game_state.player;
        format!(
            "HP: {}/{}  ATK: {}  DEF: {}  Turn: {}  Gold: {}",
            player.health.max(0),
            player.max_health,
            player.attack,
            player.defense,
            game_state.turn_number,
            game_state.statistics.gold_collected
        )
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        // Keep only the most recent messages
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// The last `count` messages, oldest first.
    pub fn recent_messages(&self, count: usize) -> &[String] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    fn glyph_rows(map: &Map) -> Vec<Vec<char>> {
        map.tiles
            .rows()
            .map(|row| row.iter().map(|tile| tile.glyph()).collect())
            .collect()
    }

    fn plot(rows: &mut [Vec<char>], pos: Position, glyph: char) {
        if pos.x < 0 || pos.y < 0 {
            return;
        }
        if let Some(cell) = rows
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
        {
            *cell = glyph;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{stamp_room, EnemyKind, ItemKind, Player, Room, Roster};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_game() -> GameState {
        let mut map = Map::new(7, 5, 1);
        let room = Room::new(0, Position::new(1, 1), 5, 3);
        stamp_room(&mut map.tiles, &room);
        map.add_room(room);

        let mut roster = Roster::new(2, 2);
        roster.spawn_enemy(EnemyKind::Goblin, Position::new(4, 1));
        roster.spawn_item(ItemKind::Gold, Position::new(2, 3), 12);
        GameState::from_parts(
            map,
            Player::new(Position::new(1, 2)),
            roster,
            StdRng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_render_map_uses_tile_glyphs() {
        let game = small_game();
        let text = AsciiRenderer::new().render_map(&game.map);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "#######");
        assert_eq!(lines[2], "#.....#");
    }

    #[test]
    fn test_render_overlays_entities() {
        let mut game = small_game();
        game.message = "You found 12 gold pieces!".to_string();
        let text = AsciiRenderer::new().render(&game);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "#...g.#");
        assert_eq!(lines[2], "#@....#");
        assert_eq!(lines[3], "#.$...#");
        assert_eq!(lines[5], "HP: 100/100  ATK: 10  DEF: 5  Turn: 0  Gold: 0");
        assert_eq!(lines[6], "You found 12 gold pieces!");
    }

    #[test]
    fn test_inactive_entities_are_hidden() {
        let mut game = small_game();
        game.roster.enemies[0].active = false;
        game.roster.items[0].active = false;

        let renderer = AsciiRenderer {
            show_status: false,
            ..AsciiRenderer::new()
        };
        let text = renderer.render(&game);
        assert!(!text.contains('g'));
        assert!(!text.contains('$'));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_render_shows_recent_message_log() {
        let mut game = small_game();
        game.message = "You found 12 gold pieces!".to_string();
        let mut renderer = AsciiRenderer::new();
        renderer.log_lines = 2;
        for text in [
            "You hit Goblin for 8 damage!",
            "Goblin attacks you for 1 damage!",
            "You found 12 gold pieces!",
        ] {
            renderer.add_message(text.to_string());
        }

        let text = renderer.render(&game);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[6], "Goblin attacks you for 1 damage!");
        assert_eq!(lines[7], "You found 12 gold pieces!");
    }

    #[test]
    fn test_message_history_is_bounded() {
        let mut renderer = AsciiRenderer::new();
        renderer.max_messages = 3;
        for i in 0..5 {
            renderer.add_message(format!("message {i}"));
        }
        assert_eq!(renderer.messages.len(), 3);
        assert_eq!(renderer.recent_messages(2), ["message 3", "message 4"]);
        assert_eq!(renderer.recent_messages(10).len(), 3);
    }
}
