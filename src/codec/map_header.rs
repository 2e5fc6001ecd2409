use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::reader::BinaryReader;
use super::schema::{Generation, Layout};
use crate::error::Result;

/// Global map metadata preceding each tile grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapHeader {
    pub generation: Generation,
    pub version1: u32,
    pub version2: u32,
    pub total_actions: u16,
    pub current_turn: u32,
    pub current_player_index: u8,
    pub max_unit_id: Option<u32>,
    pub unknown_byte1: Option<u8>,
    pub seed: u32,
    pub turn_limit: u32,
    pub reserved: Vec<u8>,
    pub game_mode: (u8, u8),
    pub map_name: String,
    /// The map is square_size x square_size
    pub square_size: u32,
    pub disabled_tribes: Vec<u16>,
    /// Count as written in the file, which may not match `unlocked_tribes.len()`
    pub unlocked_tribe_count: u16,
    pub unlocked_tribes: Vec<u16>,
    pub difficulty: u16,
    pub num_opponents: u32,
    pub unknown: Vec<u8>,
    pub tribe_skins: IndexMap<u16, u16>,
    pub map_width: u16,
    pub map_height: u16,
}

impl MapHeader {
    /// Read a header, dispatching on its version stamp unless `forced` is set
    pub fn read(reader: &mut BinaryReader, forced: Option<Generation>) -> Result<Self> {
        let start = reader.position();
        let version1 = reader.read_u32_le()?;
        let generation = match forced {
            Some(generation) => generation,
            None => Generation::from_version(version1)?,
        };
        let layout = generation.layout();

        let version2 = reader.read_u32_le()?;
        let total_actions = reader.read_u16_le()?;
        let current_turn = reader.read_u32_le()?;
        let current_player_index = reader.read_u8()?;
        let (max_unit_id, unknown_byte1) = if layout.header_has_unit_counter {
            (Some(reader.read_u32_le()?), Some(reader.read_u8()?))
        } else {
            (None, None)
        };
        let seed = reader.read_u32_le()?;
        let turn_limit = reader.read_u32_le()?;
        let reserved = reader.read_vec(layout.header_reserved_len)?;
        let game_mode = (reader.read_u8()?, reader.read_u8()?);

        let map_name = reader.read_string()?;
        let square_size = reader.read_u32_le()?;

        let disabled_tribes = reader.read_u16_list()?;
        let (unlocked_tribe_count, unlocked_tribes) = read_unlocked_tribes(reader, &layout)?;

        let difficulty = reader.read_u16_le()?;
        let num_opponents = reader.read_u32_le()?;
        let unknown = reader.read_vec(5 + unlocked_tribe_count as usize)?;

        let skin_count = reader.read_u32_le()? as usize;
        let mut tribe_skins = IndexMap::with_capacity(skin_count.min(reader.remaining() / 4));
        for _ in 0..skin_count {
            let tribe = reader.read_u16_le()?;
            let skin = reader.read_u16_le()?;
            tribe_skins.insert(tribe, skin);
        }

        let (map_width, map_height) = read_dimensions(reader)?;

        debug!(
            offset = start,
            version = version1,
            %generation,
            turn = current_turn,
            map_width,
            map_height,
            "read map header"
        );

        Ok(Self {
            generation,
            version1,
            version2,
            total_actions,
            current_turn,
            current_player_index,
            max_unit_id,
            unknown_byte1,
            seed,
            turn_limit,
            reserved,
            game_mode,
            map_name,
            square_size,
            disabled_tribes,
            unlocked_tribe_count,
            unlocked_tribes,
            difficulty,
            num_opponents,
            unknown,
            tribe_skins,
            map_width,
            map_height,
        })
    }

    pub fn layout(&self) -> Layout {
        self.generation.layout()
    }
}

fn read_unlocked_tribes(reader: &mut BinaryReader, layout: &Layout) -> Result<(u16, Vec<u16>)> {
    let declared = reader.read_u16_le()?;
    let entries = layout.unlocked_tribe_entries(declared);
    let mut tribes = Vec::with_capacity(entries);
    for _ in 0..entries {
        tribes.push(reader.read_u16_le()?);
    }
    Ok((declared, tribes))
}

/// Some files carry an empty width/height pair before the real one
fn read_dimensions(reader: &mut BinaryReader) -> Result<(u16, u16)> {
    let width = reader.read_u16_le()?;
    let height = reader.read_u16_le()?;
    if width == 0 && height == 0 {
        return Ok((reader.read_u16_le()?, reader.read_u16_le()?));
    }
    Ok((width, height))
}
