use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::action::read_action_log;
use super::frame::{decompress_frame, read_frame_file, write_diagnostic};
use super::map_header::MapHeader;
use super::player::{build_owner_tribe_map, read_player_roster};
use super::reader::BinaryReader;
use super::schema::Generation;
use super::tile::read_tile_grid;
use crate::error::{Error, Result};
use crate::state::world::WorldState;

/// Knobs for a single decode call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Decode with this layout instead of the one the version stamp selects
    pub generation: Option<Generation>,
    /// Write the decompressed buffer next to the input as `<input>.decomp`
    pub dump_decompressed: bool,
    /// Fail when the replay's turn count disagrees with the header
    pub strict_turn_check: bool,
}

impl DecodeOptions {
    pub fn from_env() -> Self {
        Self {
            generation: None,
            dump_decompressed: std::env::var("POLYTOPIA_SAVE_DUMP").is_ok(),
            strict_turn_check: std::env::var("POLYTOPIA_SAVE_STRICT").is_ok(),
        }
    }
}

/// Read, decompress and decode a save file
pub fn decode_save_file(path: &Path, options: &DecodeOptions) -> Result<WorldState> {
    let data = read_frame_file(path)?;
    debug!(path = %path.display(), len = data.len(), "decompressed save file");
    if options.dump_decompressed {
        write_diagnostic(path, &data)?;
    }
    decode_decompressed(&data, options)
}

/// Decode a framed, compressed save held in memory
pub fn decode_save(raw: &[u8], options: &DecodeOptions) -> Result<WorldState> {
    let data = decompress_frame(raw)?;
    decode_decompressed(&data, options)
}

/// Decode an already decompressed save buffer.
///
/// The buffer holds the initial state (header, tiles, players), a short
/// divider, the current state in the same shape, another divider, and the
/// replay action log. Everything is read in one forward pass.
pub fn decode_decompressed(data: &[u8], options: &DecodeOptions) -> Result<WorldState> {
    let mut reader = BinaryReader::new(data);

    let initial_header = MapHeader::read(&mut reader, options.generation)?;
    let generation = initial_header.generation;
    let layout = initial_header.layout();
    let initial_tiles = read_tile_grid(
        &mut reader,
        &layout,
        initial_header.map_width as usize,
        initial_header.map_height as usize,
    )?;
    let initial_players = read_player_roster(&mut reader, &layout)?;
    build_owner_tribe_map(&initial_players)?;
    reader.skip(layout.initial_divider_len)?;

    let current_header = MapHeader::read(&mut reader, options.generation)?;
    if current_header.generation != generation {
        return Err(Error::UnsupportedVersion { version: current_header.version1 });
    }
    let map_width = current_header.map_width as usize;
    let map_height = current_header.map_height as usize;
    let tiles = read_tile_grid(&mut reader, &layout, map_width, map_height)?;
    let players = read_player_roster(&mut reader, &layout)?;
    let owner_tribes = build_owner_tribe_map(&players)?;
    reader.skip(layout.current_divider_len)?;

    let log = read_action_log(&mut reader)?;
    if !reader.is_empty() {
        debug!(remaining = reader.remaining(), "trailing bytes after action log");
    }

    let max_turn = current_header.current_turn;
    if log.final_turn != max_turn {
        if options.strict_turn_check {
            return Err(Error::TurnMismatch { header: max_turn, replay: log.final_turn });
        }
        warn!(header = max_turn, replay = log.final_turn, "replay turn count disagrees with header");
    }

    info!(
        %generation,
        map_width,
        map_height,
        players = players.len(),
        actions = log.actions.len(),
        captures = log.captures.len(),
        turn = max_turn,
        "decoded save"
    );

    Ok(WorldState {
        generation,
        map_width,
        map_height,
        initial_header,
        current_header,
        initial_tiles,
        tiles,
        initial_players,
        players,
        owner_tribes,
        max_turn,
        replay_turns: log.final_turn,
        actions: log.actions,
        turn_captures: log.captures,
    })
}
