use tracing::{debug, trace};

use super::reader::BinaryReader;
use super::schema::Layout;
use crate::error::{Error, Result};
use crate::state::player::{DiplomacyMessage, DiplomacyRelation, OwnerTribeMap, PlayerRecord, Task};

/// Trailing payload size for a task type, `None` for unknown types
pub fn task_payload_len(task_type: i16) -> Option<usize> {
    match task_type {
        // Pacifist and Killer keep a counter
        1 | 5 => Some(6),
        2..=4 | 6..=8 => Some(2),
        _ => None,
    }
}

/// Decode the u16-count-prefixed list of player records
pub fn read_player_roster(reader: &mut BinaryReader, layout: &Layout) -> Result<Vec<PlayerRecord>> {
    let start = reader.position();
    let count = reader.read_u16_le()? as usize;
    let mut players = Vec::with_capacity(count);
    for _ in 0..count {
        let player = read_player(reader, layout)?;
        trace!(id = player.id, tribe = player.tribe, name = %player.name, "player");
        players.push(player);
    }
    debug!(offset = start, count, "read player roster");
    Ok(players)
}

/// Map each player id to its tribe. Ids must be unique.
pub fn build_owner_tribe_map(players: &[PlayerRecord]) -> Result<OwnerTribeMap> {
    let mut map = OwnerTribeMap::new();
    for player in players {
        if let Some(&tribe) = map.get(&player.id) {
            return Err(Error::DuplicatePlayerId { id: player.id, tribe });
        }
        map.insert(player.id, player.tribe);
    }
    Ok(map)
}

fn read_player(reader: &mut BinaryReader, layout: &Layout) -> Result<PlayerRecord> {
    let id = reader.read_u8()?;
    let name = reader.read_string()?;
    let account_id = reader.read_string()?;
    let autoplay = reader.read_bool()?;
    let start_coordinates = reader.read_coords_i32()?;
    let tribe = reader.read_u16_le()?;
    let unknown_byte1 = reader.read_u8()?;
    let unknown_int1 = reader.read_u32_le()?;

    let unknown_len = reader.read_u16_le()? as usize;
    let mut unknown_list = Vec::with_capacity(unknown_len.min(reader.remaining() / 5));
    for _ in 0..unknown_len {
        unknown_list.push(reader.read_array::<5>()?);
    }

    let currency = reader.read_u32_le()?;
    let score = reader.read_u32_le()?;
    let unknown_int2 = reader.read_u32_le()?;
    let num_cities = reader.read_u16_le()?;

    let technologies = reader.read_u16_list()?;

    let encountered_len = reader.read_u16_le()? as usize;
    let encountered_players = reader.read_vec(encountered_len)?;

    let task_count = reader.read_i16_le()?;
    let mut tasks = Vec::with_capacity(task_count.max(0) as usize);
    for _ in 0..task_count.max(0) {
        tasks.push(read_task(reader, id)?);
    }

    let total_units_killed = reader.read_i32_le()?;
    let total_units_lost = reader.read_i32_le()?;
    let total_tribes_destroyed = reader.read_i32_le()?;
    let color_override = if layout.player_has_color_override {
        Some(reader.read_array()?)
    } else {
        None
    };
    let unknown_byte2 = reader.read_u8()?;

    let unique_improvements = reader.read_u16_list()?;

    let diplomacy_len = reader.read_u16_le()? as usize;
    let mut diplomacy = Vec::with_capacity(diplomacy_len.min(reader.remaining() / 23));
    for _ in 0..diplomacy_len {
        diplomacy.push(read_diplomacy_relation(reader)?);
    }

    let message_len = reader.read_u16_le()? as usize;
    let mut diplomacy_messages = Vec::with_capacity(message_len.min(reader.remaining() / 2));
    for _ in 0..message_len {
        diplomacy_messages.push(DiplomacyMessage {
            message_type: reader.read_u8()?,
            sender: reader.read_u8()?,
        });
    }

    let destroyed_by_tribe = reader.read_u8()?;
    let destroyed_turn = reader.read_u32_le()?;
    let trailing = reader.read_vec(layout.player_trailer_len)?;

    Ok(PlayerRecord {
        id,
        name,
        account_id,
        autoplay,
        start_coordinates,
        tribe,
        unknown_byte1,
        unknown_int1,
        unknown_list,
        currency,
        score,
        unknown_int2,
        num_cities,
        technologies,
        encountered_players,
        tasks,
        total_units_killed,
        total_units_lost,
        total_tribes_destroyed,
        color_override,
        unknown_byte2,
        unique_improvements,
        diplomacy,
        diplomacy_messages,
        destroyed_by_tribe,
        destroyed_turn,
        trailing,
    })
}

fn read_task(reader: &mut BinaryReader, player: u8) -> Result<Task> {
    let task_type = reader.read_i16_le()?;
    let len = task_payload_len(task_type).ok_or(Error::UnknownTaskType { task_type, player })?;
    Ok(Task { task_type, payload: reader.read_vec(len)? })
}

fn read_diplomacy_relation(reader: &mut BinaryReader) -> Result<DiplomacyRelation> {
    Ok(DiplomacyRelation {
        player_id: reader.read_u8()?,
        state: reader.read_u8()?,
        last_attack_turn: reader.read_i32_le()?,
        embassy_level: reader.read_u8()?,
        last_peace_broken_turn: reader.read_i32_le()?,
        first_meet_turn: reader.read_i32_le()?,
        embassy_build_turn: reader.read_i32_le()?,
        previous_attack_turn: reader.read_i32_le()?,
    })
}
