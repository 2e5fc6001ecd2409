//! Decode a Polytopia save file and print what it contains
//!
//! Run with: cargo run --bin save-dump -- game.state [--json]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use polytopia_save::codec::Generation;
use polytopia_save::{decode_save_file, DecodeOptions, WorldState};

#[derive(Parser)]
#[command(name = "save-dump")]
#[command(about = "Decode a Polytopia save file")]
struct Cli {
    /// Compressed save file
    input: PathBuf,

    /// Print the whole decoded state as JSON
    #[arg(long)]
    json: bool,

    /// Write the decompressed buffer to <input>.decomp
    #[arg(long)]
    dump_decompressed: bool,

    /// Fail if the replay turn count disagrees with the header
    #[arg(long)]
    strict: bool,

    /// Force a layout generation (legacy, standard, extended)
    #[arg(long)]
    generation: Option<Generation>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut options = DecodeOptions::from_env();
    options.dump_decompressed |= cli.dump_decompressed;
    options.strict_turn_check |= cli.strict;
    if cli.generation.is_some() {
        options.generation = cli.generation;
    }

    let world = match decode_save_file(&cli.input, &options) {
        Ok(world) => world,
        Err(e) => {
            error!(kind = ?e.kind(), "{}: {}", cli.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&world) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("failed to serialize: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&world);
    }
    ExitCode::SUCCESS
}

fn print_summary(world: &WorldState) {
    let header = &world.current_header;
    println!("Map: {:?} ({}x{})", header.map_name, world.map_width, world.map_height);
    println!("Version: {} ({})", header.version1, world.generation);
    println!("Turn: {} (replay reached {})", world.max_turn, world.replay_turns);

    let cities = world.tiles.tiles().iter().filter(|t| t.has_city()).count();
    let units = world.tiles.units().count();
    println!("Cities: {}  Units: {}", cities, units);

    println!("Players: {}", world.players.len());
    for player in &world.players {
        let status = if player.is_destroyed() {
            format!("destroyed on turn {}", player.destroyed_turn)
        } else {
            format!("score {}", player.score)
        };
        println!(
            "  [{:>3}] {:<20} tribe {:>2}  {} techs  {}",
            player.id,
            player.name,
            player.tribe,
            player.technologies.len(),
            status
        );
    }

    println!("Actions: {}", world.actions.len());
    for (turn, captures) in world.turn_captures.iter() {
        for capture in captures {
            println!(
                "  turn {:>3}: player {} captured ({}, {})",
                turn, capture.player, capture.coordinates.0, capture.coordinates.1
            );
        }
    }
}
