//! # Input Module
//!
//! Input handling and command parsing for player interactions.
//!
//! Input arrives as text lines from a terminal. Each line is parsed into a
//! [`PlayerInput`], which is then turned into a [`PlayerAction`] for the turn
//! driver when it maps onto one.

use crate::{Direction, PlayerAction, Position};

/// Input handler for processing player commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{InputHandler, PlayerInput, Position};
    ///
    /// let input_handler = InputHandler::new();
    /// assert_eq!(input_handler.parse("w"), Some(PlayerInput::Move(Position::new(0, -1))));
    /// assert_eq!(input_handler.parse("q"), Some(PlayerInput::Quit));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Parses one line of input. Surrounding whitespace and case are ignored.
    ///
    /// Returns None for blank or unknown commands.
    pub fn parse(&self, line: &str) -> Option<PlayerInput> {
        let command = line.trim().to_ascii_lowercase();

        let input = match command.as_str() {
            // Movement keys - WASD
            "w" | "up" => PlayerInput::Move(Position::new(0, -1)),
            "s" | "down" => PlayerInput::Move(Position::new(0, 1)),
            "a" | "left" => PlayerInput::Move(Position::new(-1, 0)),
            "d" | "right" => PlayerInput::Move(Position::new(1, 0)),

            // Movement keys - Vi style (hjkl) if enabled
            "h" if self.vi_keys_enabled => PlayerInput::Move(Position::new(-1, 0)),
            "j" if self.vi_keys_enabled => PlayerInput::Move(Position::new(0, 1)),
            "k" if self.vi_keys_enabled => PlayerInput::Move(Position::new(0, -1)),
            "l" if self.vi_keys_enabled => PlayerInput::Move(Position::new(1, 0)),

            "." | "wait" => PlayerInput::Wait,
            "g" | "," | "pickup" => PlayerInput::PickUp,
            "?" | "help" => PlayerInput::Help,
            "q" | "quit" => PlayerInput::Quit,
            _ => return None,
        };
        Some(input)
    }

    /// Converts player input to a game action.
    ///
    /// Inputs that are not turn actions, such as help or quit, give None.
    pub fn input_to_action(&self, input: PlayerInput) -> Option<PlayerAction> {
        match input {
            PlayerInput::Move(delta) => Direction::from_delta(delta).map(PlayerAction::Move),
            PlayerInput::Wait => Some(PlayerAction::Wait),
            PlayerInput::PickUp => Some(PlayerAction::Pickup),
            PlayerInput::Help | PlayerInput::Quit => None,
        }
    }

    /// Help text listing the accepted commands.
    pub fn help_text(&self) -> &'static str {
        if self.vi_keys_enabled {
            "move: w/a/s/d or h/j/k/l, g: pick up, .: wait, ?: help, q: quit"
        } else {
            "move: w/a/s/d, g: pick up, .: wait, ?: help, q: quit"
        }
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move in a given direction (relative position)
    Move(Position),
    /// Wait/rest for one turn
    Wait,
    /// Pick up item at current position
    PickUp,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}
