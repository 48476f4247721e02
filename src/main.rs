//! # Delve Main Entry Point
//!
//! Generates a dungeon from the command line, prints it as ASCII or JSON, and
//! optionally runs a line-driven game loop on stdin.

use clap::Parser;
use delve::{
    AsciiRenderer, DelveResult, GameState, GenerationConfig, InputHandler, PlayerInput,
};
use log::{debug, info};
use std::io::BufRead;
use std::path::PathBuf;

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "A turn-based dungeon crawler built on a BSP level generator")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with generation settings; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Depth budget of the BSP tree
    #[arg(long)]
    depth: Option<u32>,

    /// Print the generated level as JSON instead of ASCII
    #[arg(long)]
    json: bool,

    /// Play the level, reading one command per line from stdin
    #[arg(long)]
    play: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    // Initialize logging
    initialize_logging(&args.log_level);

    info!("Starting Delve v{}", delve::VERSION);

    let config = build_config(&args)?;
    info!("Generating dungeon level with seed: {}", config.seed);
    let mut game_state = GameState::new(&config)?;
    debug!("Generation stats: {:?}", game_state.generation_stats);

    if args.json {
        println!("{}", game_state.to_json()?);
    } else if !args.play {
        println!("{}", AsciiRenderer::new().render(&game_state));
    }

    if args.play {
        run_game_loop(&mut game_state)?;
    }

    Ok(())
}

/// Initializes env_logger with the given filter string.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .format_target(false)
        .init();
}

/// Loads the config file if one was given, then applies command line overrides.
fn build_config(args: &Args) -> DelveResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.grid_width = width;
    }
    if let Some(height) = args.height {
        config.grid_height = height;
    }
    if let Some(depth) = args.depth {
        config.bsp_max_depth = depth;
    }

    config.validate()?;
    Ok(config)
}

/// Main game loop: one command per stdin line, one turn per command.
fn run_game_loop(game_state: &mut GameState) -> DelveResult<()> {
    let input_handler = InputHandler::new();
    let mut renderer = AsciiRenderer::new();

    println!("{}", input_handler.help_text());
    println!("{}", renderer.render(game_state));

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let Some(input) = input_handler.parse(&line) else {
            println!("Unknown command. {}", input_handler.help_text());
            continue;
        };

        match input {
            PlayerInput::Quit => {
                info!("Player quit the game");
                break;
            }
            PlayerInput::Help => {
                println!("{}", input_handler.help_text());
                continue;
            }
            _ => {}
        }

        let Some(action) = input_handler.input_to_action(input) else {
            continue;
        };
        let result = game_state.apply_player_action(action);
        if let Some(message) = result.last_message() {
            renderer.add_message(message);
        }
        println!("{}", renderer.render(game_state));

        if game_state.game_over {
            break;
        }
    }

    info!(
        "Game loop ended after {} turns: {:?}",
        game_state.turn_number, game_state.statistics
    );
    Ok(())
}
